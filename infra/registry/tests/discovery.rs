use moneta_registry::{
    DiscoveryBackend, ExtensionRegistry, MarkerSet, ProviderRecord, StaticDiscoveryBackend,
};
use std::any::TypeId;
use std::sync::Arc;

trait FormatProvider: Send + Sync {
    fn id(&self) -> &'static str;
}

#[derive(Debug)]
struct Named(&'static str);

impl FormatProvider for Named {
    fn id(&self) -> &'static str {
        self.0
    }
}

fn marked_seed() -> StaticDiscoveryBackend {
    StaticDiscoveryBackend::builder()
        .provider(
            ProviderRecord::implements::<dyn FormatProvider>(Arc::new(Named("iso")), "iso")
                .with_marker("iso")
                .with_marker("strict"),
        )
        .provider(
            ProviderRecord::implements::<dyn FormatProvider>(Arc::new(Named("locale")), "locale")
                .with_marker("locale"),
        )
        .provider(ProviderRecord::implements::<dyn FormatProvider>(
            Arc::new(Named("plain")),
            "plain",
        ))
        .build()
}

#[test]
fn empty_marker_set_matches_everything() {
    let backend = marked_seed();
    let found = backend.find(TypeId::of::<dyn FormatProvider>(), &MarkerSet::new());
    assert_eq!(found.len(), 3);
}

#[test]
fn marker_filtering_is_logical_and() {
    let backend = marked_seed();

    let iso = backend.find(TypeId::of::<dyn FormatProvider>(), &MarkerSet::of(["iso"]));
    assert_eq!(iso.len(), 1);
    assert_eq!(iso[0].provider_name(), "iso");

    let strict_iso =
        backend.find(TypeId::of::<dyn FormatProvider>(), &MarkerSet::of(["iso", "strict"]));
    assert_eq!(strict_iso.len(), 1);

    let impossible =
        backend.find(TypeId::of::<dyn FormatProvider>(), &MarkerSet::of(["iso", "locale"]));
    assert!(impossible.is_empty());
}

#[test]
fn results_follow_registration_order() {
    let backend = marked_seed();
    let found = backend.find(TypeId::of::<dyn FormatProvider>(), &MarkerSet::new());
    let names: Vec<_> = found.iter().map(|record| record.provider_name()).collect();
    assert_eq!(names, ["iso", "locale", "plain"]);
}

#[test]
fn discover_all_returns_handles_in_order() {
    let registry = ExtensionRegistry::new(marked_seed());
    let providers = registry.discover_all::<dyn FormatProvider>(&MarkerSet::new());
    let ids: Vec<_> = providers.iter().map(|provider| provider.id()).collect();
    assert_eq!(ids, ["iso", "locale", "plain"]);
}

#[test]
fn discover_one_applies_markers() {
    let registry = ExtensionRegistry::new(marked_seed());

    let locale = registry
        .discover_one::<dyn FormatProvider>(&MarkerSet::of(["locale"]))
        .expect("marked provider");
    assert_eq!(locale.id(), "locale");

    assert!(registry.discover_one::<dyn FormatProvider>(&MarkerSet::of(["missing"])).is_none());
}

#[test]
fn unfiltered_discovery_of_unknown_capability_is_empty() {
    trait Unregistered: Send + Sync {}

    let registry = ExtensionRegistry::new(marked_seed());
    assert!(registry.discover_all::<dyn Unregistered>(&MarkerSet::new()).is_empty());
}
