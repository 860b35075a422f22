use moneta_registry::{
    AmbiguityPolicy, DiscoveryBackend, ExtensionRecord, ExtensionRegistry, MarkerSet,
    ProviderRecord, RegistryError, StaticDiscoveryBackend,
};
use std::any::TypeId;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

trait RoundingProvider: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;
}

#[derive(Debug)]
struct HalfUp;

impl RoundingProvider for HalfUp {
    fn name(&self) -> &'static str {
        "half-up"
    }
}

#[derive(Debug)]
struct HalfEven;

impl RoundingProvider for HalfEven {
    fn name(&self) -> &'static str {
        "half-even"
    }
}

trait UserExtension: Send + Sync + std::fmt::Debug {
    fn label(&self) -> &'static str;
}

#[derive(Debug)]
struct DefaultUserExtension(&'static str);

impl UserExtension for DefaultUserExtension {
    fn label(&self) -> &'static str {
        self.0
    }
}

fn single_provider_seed() -> StaticDiscoveryBackend {
    StaticDiscoveryBackend::builder()
        .provider(ProviderRecord::implements::<dyn RoundingProvider>(Arc::new(HalfUp), "half-up"))
        .build()
}

#[test]
fn capability_resolves_registered_implementation() {
    let registry = ExtensionRegistry::new(single_provider_seed());

    let provider = registry.capability::<dyn RoundingProvider>().unwrap();
    assert_eq!(provider.name(), "half-up");
}

#[test]
fn missing_capability_is_unsupported() {
    let registry = ExtensionRegistry::new(StaticDiscoveryBackend::builder().build());

    let err = registry.capability::<dyn RoundingProvider>().unwrap_err();
    assert!(matches!(err, RegistryError::UnsupportedCapability { .. }));
    assert!(err.to_string().contains("RoundingProvider"));
}

#[test]
fn capability_is_cached_with_stable_identity() {
    let registry = ExtensionRegistry::new(single_provider_seed());

    let first = registry.capability::<dyn RoundingProvider>().unwrap();
    let second = registry.capability::<dyn RoundingProvider>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn ambiguity_defaults_to_first_registered() {
    let seed = StaticDiscoveryBackend::builder()
        .provider(ProviderRecord::implements::<dyn RoundingProvider>(Arc::new(HalfUp), "half-up"))
        .provider(ProviderRecord::implements::<dyn RoundingProvider>(
            Arc::new(HalfEven),
            "half-even",
        ))
        .build();
    let registry = ExtensionRegistry::new(seed);

    let provider = registry.capability::<dyn RoundingProvider>().unwrap();
    assert_eq!(provider.name(), "half-up");
}

#[test]
fn strict_ambiguity_policy_fails() {
    let seed = StaticDiscoveryBackend::builder()
        .provider(ProviderRecord::implements::<dyn RoundingProvider>(Arc::new(HalfUp), "half-up"))
        .provider(ProviderRecord::implements::<dyn RoundingProvider>(
            Arc::new(HalfEven),
            "half-even",
        ))
        .build();
    let registry = ExtensionRegistry::with_policy(seed, AmbiguityPolicy::Fail);

    let err = registry.capability::<dyn RoundingProvider>().unwrap_err();
    assert!(matches!(err, RegistryError::AmbiguousCapability { .. }));
}

#[test]
fn extension_lookup_by_exposed_type() {
    let seed = StaticDiscoveryBackend::builder()
        .extension(ExtensionRecord::exposes::<dyn UserExtension>(
            Arc::new(DefaultUserExtension("default")),
            "default-user",
        ))
        .build();
    let registry = ExtensionRegistry::new(seed);

    assert!(registry.is_extension_available::<dyn UserExtension>());
    let ext = registry.extension::<dyn UserExtension>().unwrap();
    assert_eq!(ext.label(), "default");
}

#[test]
fn unknown_extension_lookup_fails() {
    let registry = ExtensionRegistry::new(StaticDiscoveryBackend::builder().build());

    assert!(!registry.is_extension_available::<dyn UserExtension>());
    let err = registry.extension::<dyn UserExtension>().unwrap_err();
    assert!(matches!(err, RegistryError::UnknownExtension { .. }));
}

#[test]
fn first_extension_registrant_wins() {
    let seed = StaticDiscoveryBackend::builder()
        .extension(ExtensionRecord::exposes::<dyn UserExtension>(
            Arc::new(DefaultUserExtension("first")),
            "first",
        ))
        .extension(ExtensionRecord::exposes::<dyn UserExtension>(
            Arc::new(DefaultUserExtension("second")),
            "second",
        ))
        .build();
    let registry = ExtensionRegistry::new(seed);

    let ext = registry.extension::<dyn UserExtension>().unwrap();
    assert_eq!(ext.label(), "first");
}

#[test]
fn failing_extension_candidate_does_not_abort_load() {
    let seed = StaticDiscoveryBackend::builder()
        .extension_with("broken", || {
            Err(RegistryError::Backend { message: "boom".into(), context: None })
        })
        .extension(ExtensionRecord::exposes::<dyn UserExtension>(
            Arc::new(DefaultUserExtension("survivor")),
            "survivor",
        ))
        .build();
    let registry = ExtensionRegistry::new(seed);

    let ext = registry.extension::<dyn UserExtension>().unwrap();
    assert_eq!(ext.label(), "survivor");
    assert_eq!(registry.loaded_extension_types().len(), 1);
}

#[test]
fn undeclared_extension_indexes_by_concrete_type() {
    let seed = StaticDiscoveryBackend::builder()
        .extension(ExtensionRecord::concrete(Arc::new(DefaultUserExtension("raw")), "raw"))
        .build();
    let registry = ExtensionRegistry::new(seed);

    assert!(!registry.is_extension_available::<dyn UserExtension>());
    let ext = registry.extension::<DefaultUserExtension>().unwrap();
    assert_eq!(ext.label(), "raw");
}

/// Backend wrapper counting `find` invocations, registered in the seed as a
/// custom discovery backend.
#[derive(Debug)]
struct CountingBackend {
    inner: StaticDiscoveryBackend,
    finds: AtomicUsize,
}

impl DiscoveryBackend for CountingBackend {
    fn find(&self, capability: TypeId, markers: &MarkerSet) -> Vec<Arc<ProviderRecord>> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(capability, markers)
    }

    fn extensions(&self) -> Vec<Result<Arc<ExtensionRecord>, RegistryError>> {
        self.inner.extensions()
    }
}

#[test]
fn concurrent_first_access_resolves_once() {
    let counting = Arc::new(CountingBackend {
        inner: single_provider_seed(),
        finds: AtomicUsize::new(0),
    });
    let seed = StaticDiscoveryBackend::builder()
        .provider(ProviderRecord::implements::<dyn DiscoveryBackend>(
            counting.clone(),
            "counting",
        ))
        .build();
    let registry = ExtensionRegistry::new(seed);

    const CALLERS: usize = 8;
    let barrier = Barrier::new(CALLERS);
    let handles: Vec<Arc<dyn RoundingProvider>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..CALLERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    registry.capability::<dyn RoundingProvider>().unwrap()
                })
            })
            .collect();
        workers.into_iter().map(|worker| worker.join().unwrap()).collect()
    });

    assert_eq!(counting.finds.load(Ordering::SeqCst), 1);
    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(&handles[0], handle));
    }
}

/// Backend whose initialization always fails; the registry must fall back to
/// the seed.
#[derive(Debug)]
struct BrokenBackend;

impl DiscoveryBackend for BrokenBackend {
    fn init(&self) -> Result<(), RegistryError> {
        Err(RegistryError::Backend { message: "cannot start".into(), context: None })
    }

    fn find(&self, _capability: TypeId, _markers: &MarkerSet) -> Vec<Arc<ProviderRecord>> {
        Vec::new()
    }

    fn extensions(&self) -> Vec<Result<Arc<ExtensionRecord>, RegistryError>> {
        Vec::new()
    }
}

#[test]
fn failed_backend_init_falls_back_to_seed() {
    let seed = StaticDiscoveryBackend::builder()
        .provider(ProviderRecord::implements::<dyn DiscoveryBackend>(
            Arc::new(BrokenBackend),
            "broken",
        ))
        .provider(ProviderRecord::implements::<dyn RoundingProvider>(Arc::new(HalfUp), "half-up"))
        .build();
    let registry = ExtensionRegistry::new(seed);

    // BrokenBackend would have found nothing; resolving proves the seed won.
    let provider = registry.capability::<dyn RoundingProvider>().unwrap();
    assert_eq!(provider.name(), "half-up");
}

#[test]
fn custom_backend_serves_discovery() {
    let counting = Arc::new(CountingBackend {
        inner: StaticDiscoveryBackend::builder()
            .provider(ProviderRecord::implements::<dyn RoundingProvider>(
                Arc::new(HalfEven),
                "half-even",
            ))
            .build(),
        finds: AtomicUsize::new(0),
    });
    let seed = StaticDiscoveryBackend::builder()
        .provider(ProviderRecord::implements::<dyn DiscoveryBackend>(counting, "counting"))
        .build();
    let registry = ExtensionRegistry::new(seed);

    // The seed never registered a rounding provider; only the custom backend did.
    let provider = registry.capability::<dyn RoundingProvider>().unwrap();
    assert_eq!(provider.name(), "half-even");
}
