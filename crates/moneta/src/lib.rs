//! Facade crate for `Moneta` contexts and the extension registry.
//! Re-exports domain primitives, attribute contexts, and registry plumbing.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Build configuration with [`context::RoundingContext`] / [`context::CurrencyContext`].
//! - Assemble provider registrations into a [`registry::StaticDiscoveryBackend`]
//!   at startup and share one [`registry::ExtensionRegistry`] across the process.

pub use moneta_context as context;
pub use moneta_domain as domain;
pub use moneta_registry as registry;

pub use moneta_context::{
    Context, ContextBuilder, ContextError, CurrencyContext, CurrencyContextBuilder,
    RoundingContext, RoundingContextBuilder,
};
pub use moneta_domain::CurrencyUnit;
pub use moneta_registry::{
    AmbiguityPolicy, DiscoveryBackend, ExtensionRecord, ExtensionRegistry, MarkerSet,
    ProviderRecord, RegistryError, StaticDiscoveryBackend,
};

pub mod prelude {
    pub use moneta_context::prelude::*;
    pub use moneta_domain::CurrencyUnit;
    pub use moneta_registry::prelude::*;
}
