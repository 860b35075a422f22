use crate::error::RegistryError;
use crate::record::{ExtensionRecord, MarkerSet, ProviderRecord};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Abstraction over "find all registered implementations of a capability,
/// optionally filtered by markers".
///
/// Implementations guarantee ordering that is stable across calls within one
/// process run and nothing stronger; ambiguity resolution is the caller's
/// concern. Marker filtering is logical AND (see [`MarkerSet::contains_all`]).
pub trait DiscoveryBackend: fmt::Debug + Send + Sync {
    /// One-time initialization hook, invoked when the registry selects this
    /// backend. A failure here is non-fatal: the registry logs it and falls
    /// back to the default backend.
    ///
    /// # Errors
    /// Returns [`RegistryError::Backend`] when the backend cannot start.
    fn init(&self) -> Result<(), RegistryError> {
        Ok(())
    }

    /// All providers of `capability` carrying every requested marker.
    fn find(&self, capability: TypeId, markers: &MarkerSet) -> Vec<Arc<ProviderRecord>>;

    /// Extension candidates for the eager load pass, surfaced per candidate so
    /// one bad registration never aborts the rest.
    fn extensions(&self) -> Vec<Result<Arc<ExtensionRecord>, RegistryError>>;
}

#[derive(Debug)]
enum ExtensionEntry {
    Ready(Arc<ExtensionRecord>),
    Failed { provider_name: &'static str, message: String },
}

/// The default discovery backend: an explicit, in-memory registration list.
///
/// This is the platform component-registration stand-in—applications list
/// their providers and extensions at startup through
/// [`StaticDiscoveryBackend::builder`]. Records are returned in registration
/// order, which is all the "first discovered" policies may rely on.
#[derive(Debug, Default)]
pub struct StaticDiscoveryBackend {
    providers: Vec<Arc<ProviderRecord>>,
    extensions: Vec<ExtensionEntry>,
}

impl StaticDiscoveryBackend {
    /// Starts an empty registration list.
    #[must_use]
    pub fn builder() -> StaticBackendBuilder {
        StaticBackendBuilder::default()
    }
}

impl DiscoveryBackend for StaticDiscoveryBackend {
    fn find(&self, capability: TypeId, markers: &MarkerSet) -> Vec<Arc<ProviderRecord>> {
        self.providers
            .iter()
            .filter(|record| {
                record.capability().id() == capability && record.markers().contains_all(markers)
            })
            .cloned()
            .collect()
    }

    fn extensions(&self) -> Vec<Result<Arc<ExtensionRecord>, RegistryError>> {
        self.extensions
            .iter()
            .map(|entry| match entry {
                ExtensionEntry::Ready(record) => Ok(record.clone()),
                ExtensionEntry::Failed { provider_name, message } => {
                    Err(RegistryError::Backend {
                        message: message.clone().into(),
                        context: Some((*provider_name).into()),
                    })
                }
            })
            .collect()
    }
}

/// Builder collecting provider and extension registrations.
#[derive(Debug, Default)]
pub struct StaticBackendBuilder {
    providers: Vec<Arc<ProviderRecord>>,
    extensions: Vec<ExtensionEntry>,
}

impl StaticBackendBuilder {
    /// Registers a capability provider.
    #[must_use]
    pub fn provider(mut self, record: ProviderRecord) -> Self {
        self.providers.push(Arc::new(record));
        self
    }

    /// Registers an extension.
    #[must_use]
    pub fn extension(mut self, record: ExtensionRecord) -> Self {
        self.extensions.push(ExtensionEntry::Ready(Arc::new(record)));
        self
    }

    /// Registers an extension through a fallible factory, evaluated here.
    /// A failure is recorded and later surfaced (and skipped) per candidate
    /// during the registry's eager load.
    #[must_use]
    pub fn extension_with(
        mut self,
        provider_name: &'static str,
        factory: impl FnOnce() -> Result<ExtensionRecord, RegistryError>,
    ) -> Self {
        let entry = match factory() {
            Ok(record) => ExtensionEntry::Ready(Arc::new(record)),
            Err(err) => ExtensionEntry::Failed { provider_name, message: err.to_string() },
        };
        self.extensions.push(entry);
        self
    }

    /// Finalizes the registration list.
    #[must_use]
    pub fn build(self) -> StaticDiscoveryBackend {
        StaticDiscoveryBackend { providers: self.providers, extensions: self.extensions }
    }
}
