use crate::discovery::{DiscoveryBackend, StaticDiscoveryBackend};
use crate::error::RegistryError;
use crate::record::{ExtensionRecord, MarkerSet, ProviderRecord, TypeKey};
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{trace, warn};

/// How [`ExtensionRegistry::capability`] reacts when discovery returns more
/// than one implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AmbiguityPolicy {
    /// Deterministically pick the first discovered implementation.
    ///
    /// "First" follows backend registration order, which is stable within a
    /// process run but otherwise unspecified—treat the pick as
    /// non-authoritative.
    #[default]
    PickFirst,
    /// Refuse to resolve and fail with [`RegistryError::AmbiguousCapability`].
    Fail,
}

/// A process-wide cache mapping capability interfaces to their resolved
/// singleton implementations.
///
/// Construct one instance at process start and share it (`Arc`) with every
/// consumer; there is deliberately no implicit global access. Capability slots
/// populate lazily, at most once each, and are never evicted or updated in
/// place—repeated lookups return the identical cached `Arc`. The extension
/// index is populated eagerly during construction and is read-only afterward.
#[derive(Debug)]
pub struct ExtensionRegistry {
    backend: Arc<dyn DiscoveryBackend>,
    ambiguity: AmbiguityPolicy,
    capabilities: RwLock<FxHashMap<TypeId, Arc<ProviderRecord>>>,
    extensions: FxHashMap<TypeKey, Arc<ExtensionRecord>>,
}

impl ExtensionRegistry {
    /// Creates a registry over the given registration seed with the default
    /// ambiguity policy.
    ///
    /// Backend selection happens once, here: when the seed registers a custom
    /// `dyn DiscoveryBackend` capability, the first one found is initialized
    /// and used; an initialization failure is logged and degraded to the seed
    /// backend, never fatal.
    #[must_use]
    pub fn new(seed: StaticDiscoveryBackend) -> Self {
        Self::with_policy(seed, AmbiguityPolicy::default())
    }

    /// Creates a registry with an explicit ambiguity policy.
    #[must_use]
    pub fn with_policy(seed: StaticDiscoveryBackend, ambiguity: AmbiguityPolicy) -> Self {
        let backend = select_backend(seed);
        let extensions = load_extensions(backend.as_ref());
        Self { backend, ambiguity, capabilities: RwLock::default(), extensions }
    }

    /// Resolves and caches exactly one implementation of capability `T`.
    ///
    /// The first call per capability runs backend discovery under mutual
    /// exclusion; afterwards lookups are pure map reads and every caller
    /// observes the identical `Arc`.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnsupportedCapability`] when no implementation
    /// is discoverable, and [`RegistryError::AmbiguousCapability`] when
    /// several are and the [`AmbiguityPolicy::Fail`] policy is active.
    pub fn capability<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let id = TypeId::of::<T>();

        if let Some(record) = self.capabilities.read().get(&id) {
            return open_handle::<T>(record);
        }

        let mut slots = self.capabilities.write();
        // Re-check: another caller may have populated the slot while we
        // were waiting for the write lock.
        if let Some(record) = slots.get(&id) {
            return open_handle::<T>(record);
        }

        let mut found = self.backend.find(id, &MarkerSet::new());
        if found.is_empty() {
            return Err(RegistryError::UnsupportedCapability {
                message: format!(
                    "No implementation discoverable for capability {}",
                    std::any::type_name::<T>()
                )
                .into(),
                context: None,
            });
        }
        if found.len() > 1 {
            match self.ambiguity {
                AmbiguityPolicy::PickFirst => warn!(
                    capability = std::any::type_name::<T>(),
                    candidates = found.len(),
                    picked = found[0].provider_name(),
                    "Capability is ambiguous; picking the first discovered implementation"
                ),
                AmbiguityPolicy::Fail => {
                    return Err(RegistryError::AmbiguousCapability {
                        message: format!(
                            "{} implementations discoverable for capability {}",
                            found.len(),
                            std::any::type_name::<T>()
                        )
                        .into(),
                        context: None,
                    });
                }
            }
        }

        let record = found.swap_remove(0);
        trace!(
            capability = std::any::type_name::<T>(),
            provider = record.provider_name(),
            "Capability resolved and cached"
        );
        let handle = open_handle::<T>(&record)?;
        slots.insert(id, record);
        Ok(handle)
    }

    /// Uncached discovery of the first implementation of `T` carrying every
    /// requested marker, in backend order.
    #[must_use]
    pub fn discover_one<T: ?Sized + Send + Sync + 'static>(
        &self,
        markers: &MarkerSet,
    ) -> Option<Arc<T>> {
        self.discover_all(markers).into_iter().next()
    }

    /// Uncached discovery of all implementations of `T` carrying every
    /// requested marker, in backend order.
    #[must_use]
    pub fn discover_all<T: ?Sized + Send + Sync + 'static>(
        &self,
        markers: &MarkerSet,
    ) -> Vec<Arc<T>> {
        self.backend
            .find(TypeId::of::<T>(), markers)
            .iter()
            .filter_map(|record| {
                let handle = record.handle::<T>();
                if handle.is_none() {
                    warn!(
                        capability = std::any::type_name::<T>(),
                        provider = record.provider_name(),
                        "Skipping provider record whose handle does not match its capability"
                    );
                }
                handle
            })
            .collect()
    }

    /// Looks up the extension registered under exposed type `T`.
    ///
    /// # Errors
    /// Returns [`RegistryError::UnknownExtension`] when no extension was
    /// loaded for that type.
    pub fn extension<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, RegistryError> {
        let key = TypeKey::of::<T>();
        match self.extensions.get(&key) {
            Some(record) => record.handle::<T>().ok_or_else(|| RegistryError::TypeMismatch {
                message: "Extension record handle does not match its exposed type".into(),
                context: Some(key.name().into()),
            }),
            None => Err(RegistryError::UnknownExtension {
                message: format!("No extension registered for exposed type {}", key.name()).into(),
                context: None,
            }),
        }
    }

    /// Whether an extension is loaded under exposed type `T`. Pure query.
    #[must_use]
    pub fn is_extension_available<T: ?Sized + 'static>(&self) -> bool {
        self.extensions.contains_key(&TypeKey::of::<T>())
    }

    /// The exposed types of all loaded extensions, sorted by type name for
    /// stable output. Pure query.
    #[must_use]
    pub fn loaded_extension_types(&self) -> Vec<TypeKey> {
        let mut types: Vec<TypeKey> = self.extensions.keys().copied().collect();
        types.sort_by_key(TypeKey::name);
        types
    }

    /// The discovery backend selected for this registry.
    #[must_use]
    pub fn backend(&self) -> &Arc<dyn DiscoveryBackend> {
        &self.backend
    }
}

fn open_handle<T: ?Sized + Send + Sync + 'static>(
    record: &Arc<ProviderRecord>,
) -> Result<Arc<T>, RegistryError> {
    record.handle::<T>().ok_or_else(|| RegistryError::TypeMismatch {
        message: "Provider record handle does not match its capability".into(),
        context: Some(record.provider_name().into()),
    })
}

/// Backend selection: prefer a custom backend registered in the seed, fall
/// back to the seed itself when none is found or its initialization fails.
fn select_backend(seed: StaticDiscoveryBackend) -> Arc<dyn DiscoveryBackend> {
    let custom = seed
        .find(TypeId::of::<dyn DiscoveryBackend>(), &MarkerSet::new())
        .into_iter()
        .next()
        .and_then(|record| {
            let handle = record.handle::<dyn DiscoveryBackend>();
            if handle.is_none() {
                warn!(
                    provider = record.provider_name(),
                    "Custom discovery backend record does not hold a backend handle"
                );
            }
            handle.map(|backend| (record.provider_name(), backend))
        });

    match custom {
        Some((name, backend)) => match backend.init() {
            Ok(()) => {
                trace!(backend = name, "Using custom discovery backend");
                backend
            }
            Err(err) => {
                warn!(
                    backend = name,
                    error = %err,
                    "Custom discovery backend failed to initialize; using the default backend"
                );
                Arc::new(seed)
            }
        },
        None => Arc::new(seed),
    }
}

/// Eager extension load: index every candidate by its exposed type.
/// Per-candidate failures are logged and skipped; a second registrant for an
/// occupied exposed type is discarded with a diagnostic (first wins).
fn load_extensions(backend: &dyn DiscoveryBackend) -> FxHashMap<TypeKey, Arc<ExtensionRecord>> {
    let mut index = FxHashMap::default();
    for candidate in backend.extensions() {
        match candidate {
            Ok(record) => {
                let key = record.exposed();
                if !record.is_declared() {
                    warn!(
                        provider = record.provider_name(),
                        exposed = key.name(),
                        "Extension exposes no interface type; indexing by its concrete type defeats decoupling"
                    );
                }
                match index.entry(key) {
                    Entry::Occupied(existing) => {
                        let existing: &Arc<ExtensionRecord> = existing.get();
                        warn!(
                            exposed = key.name(),
                            kept = existing.provider_name(),
                            discarded = record.provider_name(),
                            "Exposed type already claimed; discarding later registrant"
                        );
                    }
                    Entry::Vacant(slot) => {
                        trace!(
                            exposed = key.name(),
                            provider = record.provider_name(),
                            "Extension loaded"
                        );
                        slot.insert(record);
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "Skipping extension candidate that failed to load");
            }
        }
    }
    index
}
