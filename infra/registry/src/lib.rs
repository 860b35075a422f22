//! # Extension Registry
//!
//! Process-wide registry resolving capability interfaces to singleton
//! implementations through a pluggable [`DiscoveryBackend`].
//!
//! Capabilities resolve lazily and cache forever; extensions load eagerly at
//! registry construction and are indexed by their exposed type. The default
//! backend is an explicit registration list assembled at startup:
//!
//! ```
//! use moneta_registry::{ExtensionRegistry, ProviderRecord, StaticDiscoveryBackend};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> &'static str;
//! }
//!
//! #[derive(Debug)]
//! struct English;
//!
//! impl Greeter for English {
//!     fn greet(&self) -> &'static str {
//!         "hello"
//!     }
//! }
//!
//! let seed = StaticDiscoveryBackend::builder()
//!     .provider(ProviderRecord::implements::<dyn Greeter>(Arc::new(English), "english"))
//!     .build();
//! let registry = ExtensionRegistry::new(seed);
//!
//! let greeter = registry.capability::<dyn Greeter>()?;
//! assert_eq!(greeter.greet(), "hello");
//! # Ok::<(), moneta_registry::RegistryError>(())
//! ```

mod discovery;
mod error;
mod record;
mod registry;

pub use self::{
    discovery::{DiscoveryBackend, StaticBackendBuilder, StaticDiscoveryBackend},
    error::{RegistryError, RegistryErrorExt},
    record::{ExtensionRecord, MarkerSet, ProviderRecord, TypeKey},
    registry::{AmbiguityPolicy, ExtensionRegistry},
};

pub mod prelude {
    pub use crate::{
        AmbiguityPolicy, DiscoveryBackend, ExtensionRecord, ExtensionRegistry, MarkerSet,
        ProviderRecord, RegistryError, RegistryErrorExt, StaticDiscoveryBackend, TypeKey,
    };
}
