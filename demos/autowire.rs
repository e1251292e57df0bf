//! Example assembling a small application with `#[derive(Component)]`
//!
//! Run with:
//!   cargo run --example autowire --features derive

use dependency_assembler::{
    Component, Container, GenericFamily, Registrar, Result, Specialization, SpecializationError,
    Specialize, register_module,
};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

// Interfaces
trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

trait Repository<T>: Send + Sync {
    fn describe(&self) -> String;
}

// Implementations
#[derive(Component)]
#[component(implements(dyn Clock), lifetime = "container_singleton")]
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        1_700_000_000
    }
}

struct MemoryRepository<T>(PhantomData<fn() -> T>);

impl<T: 'static> Repository<T> for MemoryRepository<T> {
    fn describe(&self) -> String {
        format!("in-memory repository of {}", std::any::type_name::<T>())
    }
}

struct User;
struct Order;

struct Repositories;

impl GenericFamily for Repositories {
    type Closed<A: Send + Sync + 'static> = dyn Repository<A>;
    type Arguments = (User, Order);
}

struct InMemory;

impl Specialize<Repositories> for InMemory {
    fn specialize<A: Send + Sync + 'static>()
    -> std::result::Result<Specialization<dyn Repository<A>>, SpecializationError> {
        Ok(Specialization::new::<MemoryRepository<A>, _>(|_| {
            Ok(Arc::new(MemoryRepository::<A>(PhantomData)) as Arc<dyn Repository<A>>)
        }))
    }
}

// Never registered: wired on first resolve
#[derive(Component)]
#[component(lifetime = "container_singleton")]
struct CheckoutService {
    #[inject]
    clock: Arc<dyn Clock>,
    #[inject]
    users: Arc<dyn Repository<User>>,
    #[inject]
    orders: Arc<dyn Repository<Order>>,
    checkouts: AtomicU64,
}

impl CheckoutService {
    fn checkout(&self) -> u64 {
        self.checkouts.fetch_add(1, Ordering::SeqCst) + 1
    }
}

// Bindings published by this module, collected by the bootstrap
#[derive(Default)]
struct AppModule;

impl Registrar for AppModule {
    fn register_in(&self, container: &Container) -> Result<()> {
        container.register_class::<SystemClock>()?;
        container
            .register_open_generic::<Repositories, InMemory>()
            .as_container_singleton();
        Ok(())
    }
}

register_module!(AppModule);

fn main() {
    let container = Container::global();

    let checkout = container.resolve::<CheckoutService>().unwrap();
    println!("clock:  {}", checkout.clock.now());
    println!("users:  {}", checkout.users.describe());
    println!("orders: {}", checkout.orders.describe());
    println!("checkout #{}", checkout.checkout());

    // The wired service kept its declared lifetime
    let again = container.resolve::<CheckoutService>().unwrap();
    println!("checkout #{}", again.checkout());

    for key in container.registered_keys() {
        let registration = container.get_registration(&key).unwrap();
        println!(
            "{:<60} {:?} {}",
            key.to_string(),
            registration.origin(),
            registration.strategy_name()
        );
    }
}
