//! Derive macro for dependency-assembler
//!
//! `#[derive(Component)]` implements `Reflect` for a struct with named fields:
//! one constructor whose parameters are the `#[inject]` fields, plus the
//! interfaces, lifetime and disposal declared in `#[component(...)]`.
//! Non-generic types are also exported, so every container can auto-wire
//! them without a registration.
//!
//! ```rust,ignore
//! use dependency_assembler::{Component, Container};
//! use std::sync::Arc;
//!
//! trait Notifier: Send + Sync {
//!     fn notify(&self, message: &str);
//! }
//!
//! #[derive(Component)]
//! struct Mailer;
//!
//! #[derive(Component)]
//! #[component(implements(dyn Notifier), lifetime = "container_singleton")]
//! struct EmailNotifier {
//!     #[inject]
//!     mailer: Arc<Mailer>,
//!     // Fields without #[inject] use Default
//!     sent: std::sync::atomic::AtomicU64,
//! }
//!
//! let container = Container::new();
//! container.register_class::<EmailNotifier>().unwrap();
//! let notifier = container.resolve::<dyn Notifier>().unwrap();
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::parse::Parse;
use syn::punctuated::Punctuated;
use syn::{Attribute, Data, DeriveInput, Fields, LitInt, LitStr, Token, Type, parse_macro_input};

/// Most parameters a constructor closure may take
const MAX_INJECTED: usize = 8;

/// Derive `Reflect`.
///
/// # Attributes
///
/// - `#[inject]` on a field of type `Arc<T>`: resolve `T` from the container.
/// - `#[component(implements(dyn A, dyn B))]`: interfaces the type can be
///   resolved as. Each must be a trait the type implements.
/// - `#[component(lifetime = "...")]`: one of `always_new`,
///   `container_singleton`, `thread_singleton`, `expiring_cache`; used when the
///   type is auto-registered or registered with `register_class`.
/// - `#[component(expires_after_secs = N)]`: expiration of `expiring_cache`.
/// - `#[component(disposable)]`: the type implements `Dispose` and its
///   instances are disposed with the container.
#[proc_macro_derive(Component, attributes(component, inject))]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let options = ComponentOptions::parse(&input.attrs)?;

    let (parameters, construct) = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => {
                let mut parameters = Vec::new();
                let mut field_inits = Vec::new();
                for field in fields.named.iter() {
                    let Some(field_name) = field.ident.as_ref() else {
                        continue;
                    };
                    let field_type = &field.ty;

                    if has_inject_attr(&field.attrs) {
                        if extract_arc_inner_type(field_type).is_none() {
                            return Err(syn::Error::new_spanned(
                                field_type,
                                "Fields marked with #[inject] must have type Arc<T>",
                            ));
                        }
                        parameters.push(quote! { #field_name: #field_type });
                        field_inits.push(quote! { #field_name });
                    } else {
                        field_inits.push(quote! {
                            #field_name: ::std::default::Default::default()
                        });
                    }
                }
                (parameters, quote! { Self { #(#field_inits),* } })
            }
            Fields::Unit => (Vec::new(), quote! { Self }),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Component can only be derived for structs with named fields or unit structs",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(input, "Component can only be derived for structs"));
        }
    };

    if parameters.len() > MAX_INJECTED {
        return Err(syn::Error::new_spanned(
            input,
            format!("Component supports at most {MAX_INJECTED} #[inject] fields"),
        ));
    }

    let interfaces = options.interfaces.iter().map(|interface| {
        quote! { .implements::<#interface>(|it| it) }
    });
    let lifetime = options.lifetime()?.map(|lifetime| quote! { .lifetime(#lifetime) });
    let disposable = options.disposable.then(|| quote! { .disposable() });

    let describe = quote! {
        impl #impl_generics ::dependency_assembler::Reflect for #name #ty_generics #where_clause {
            fn type_info() -> ::dependency_assembler::TypeInfo {
                ::dependency_assembler::TypeInfo::class::<Self>()
                    .constructor(|#(#parameters),*| #construct)
                    #(#interfaces)*
                    #lifetime
                    #disposable
                    .build()
            }
        }
    };

    // Generic types cannot be exported; containers learn them via `describe`
    let export = input
        .generics
        .params
        .is_empty()
        .then(|| quote! { ::dependency_assembler::export_type!(#name); });

    Ok(quote! {
        #describe
        #export
    })
}

#[derive(Default)]
struct ComponentOptions {
    interfaces: Vec<Type>,
    lifetime: Option<LitStr>,
    expires_after_secs: Option<LitInt>,
    disposable: bool,
}

impl ComponentOptions {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in attrs.iter().filter(|attr| attr.path().is_ident("component")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("implements") {
                    let content;
                    syn::parenthesized!(content in meta.input);
                    let types: Punctuated<Type, Token![,]> =
                        content.parse_terminated(Type::parse, Token![,])?;
                    options.interfaces.extend(types);
                    Ok(())
                } else if meta.path.is_ident("lifetime") {
                    options.lifetime = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("expires_after_secs") {
                    options.expires_after_secs = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("disposable") {
                    options.disposable = true;
                    Ok(())
                } else {
                    Err(meta.error("expected `implements`, `lifetime`, `expires_after_secs` or `disposable`"))
                }
            })?;
        }
        Ok(options)
    }

    fn lifetime(&self) -> syn::Result<Option<TokenStream2>> {
        let expiration = match &self.expires_after_secs {
            Some(secs) => {
                quote! { ::std::option::Option::Some(::std::time::Duration::from_secs(#secs)) }
            }
            None => quote! { ::std::option::Option::None },
        };

        let Some(lifetime) = &self.lifetime else {
            if let Some(secs) = &self.expires_after_secs {
                return Err(syn::Error::new_spanned(
                    secs,
                    "expires_after_secs requires lifetime = \"expiring_cache\"",
                ));
            }
            return Ok(None);
        };

        let path = quote! { ::dependency_assembler::Lifetime };
        let tokens = match lifetime.value().as_str() {
            "always_new" => quote! { #path::AlwaysNew },
            "container_singleton" => quote! { #path::ContainerSingleton },
            "thread_singleton" => quote! { #path::ThreadSingleton },
            "expiring_cache" => quote! { #path::ExpiringCache { expiration: #expiration } },
            other => {
                return Err(syn::Error::new_spanned(
                    lifetime,
                    format!(
                        "unknown lifetime `{other}`, expected always_new, container_singleton, \
                         thread_singleton or expiring_cache"
                    ),
                ));
            }
        };

        if self.expires_after_secs.is_some() && lifetime.value() != "expiring_cache" {
            return Err(syn::Error::new_spanned(
                lifetime,
                "expires_after_secs requires lifetime = \"expiring_cache\"",
            ));
        }
        Ok(Some(tokens))
    }
}

fn has_inject_attr(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident("inject"))
}

/// Extract T from Arc<T>
fn extract_arc_inner_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        let segment = type_path.path.segments.last()?;
        if segment.ident == "Arc" {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                    return Some(inner);
                }
            }
        }
    }
    None
}
