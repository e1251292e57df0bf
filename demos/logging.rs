//! Example demonstrating logging capabilities
//!
//! Run with JSON logging (production):
//! ```bash
//! cargo run --example logging --features logging-json
//! ```
//!
//! Run with pretty logging (development):
//! ```bash
//! cargo run --example logging --features logging-pretty
//! ```

use dependency_assembler::{Container, ROUTED, Reflect, TypeInfo};
use std::sync::Arc;
use std::time::Duration;

#[allow(dead_code)]
struct Database {
    url: String,
}

#[allow(dead_code)]
struct UserService {
    db: Arc<Database>,
}

impl Reflect for UserService {
    fn type_info() -> TypeInfo {
        TypeInfo::class::<UserService>()
            .constructor(|db: Arc<Database>| UserService { db })
            .build()
    }
}

#[allow(dead_code)]
struct RequestContext {
    request_id: String,
}

fn main() {
    // JSON under logging-json, pretty under logging-pretty, nothing otherwise
    dependency_assembler::logging::init();

    println!("=== Dependency Assembler Logging Demo ===\n");

    // logs: "Creating new container"
    let container = Container::new();

    // logs: "Registering service", "Attaching creation strategy"
    container
        .register_factory(|_| {
            Ok(Arc::new(Database {
                url: "postgres://localhost/mydb".into(),
            }))
        })
        .as_container_singleton();

    container
        .register_factory(|_| {
            Ok(Arc::new(RequestContext {
                request_id: "default".into(),
            }))
        })
        .as_expiring_cache_for(Duration::from_secs(60));

    // logs: "Compiled constructor wiring", "Auto-registered service"
    container.describe::<UserService>();
    let _users = container.resolve::<UserService>().unwrap();

    // logs: "Service not found and no auto-registration applies"
    assert!(container.try_resolve::<i32>().is_none());

    // logs: "Pushed configuration scope", "Resolved routed service from configuration scope"
    {
        let scope = container.preconfigure();
        scope.set(Arc::new(RequestContext {
            request_id: "req-12345".into(),
        }));
        let _ctx = container.resolve_named::<RequestContext>(ROUTED).unwrap();
    } // logs: "Popped configuration scope"

    // logs: "Container disposed"
    container.dispose();

    println!("\n=== Demo Complete ===");
    println!("Check the log output above to see structured logging in action!");
    println!("\nTip: Use --features logging-json for production (JSON output)");
    println!("     Use --features logging-pretty for development (colorful output)");
}
