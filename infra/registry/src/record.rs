use fxhash::FxHashSet;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Capability tags attached to a provider registration.
///
/// Markers are pure metadata used for filtering during discovery; they never
/// influence behavior. Filtering is logical AND: a provider matches a request
/// only if it carries **every** requested marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerSet {
    tags: FxHashSet<Cow<'static, str>>,
}

impl MarkerSet {
    /// Creates an empty marker set (matches every request with no markers).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a marker set from a list of tags.
    pub fn of<I>(tags: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Cow<'static, str>>,
    {
        Self { tags: tags.into_iter().map(Into::into).collect() }
    }

    /// Adds a tag, returning the set for chaining.
    #[must_use]
    pub fn with(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Whether the given tag is present.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether every tag of `requested` is present in this set (logical AND).
    #[must_use]
    pub fn contains_all(&self, requested: &Self) -> bool {
        requested.tags.iter().all(|tag| self.tags.contains(tag))
    }

    /// Number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Whether the set holds no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates over the tags.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(Cow::as_ref)
    }
}

/// Identity of a capability or exposed-extension type: its [`TypeId`] plus the
/// type name for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// The key of type `T` (typically a `dyn Trait` capability interface).
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self { id: TypeId::of::<T>(), name: std::any::type_name::<T>() }
    }

    /// The underlying type id.
    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    /// The type name, for diagnostics only.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Type-erased registration of one capability implementation.
///
/// The handle is an `Arc<T>` where `T` is the capability interface (usually a
/// `dyn Trait`); the registry hands out clones of that `Arc`, so every caller
/// observes the identical instance.
pub struct ProviderRecord {
    capability: TypeKey,
    provider_name: &'static str,
    handle: Box<dyn Any + Send + Sync>,
    markers: MarkerSet,
}

impl ProviderRecord {
    /// Registers `handle` as an implementation of capability `T`.
    #[must_use]
    pub fn implements<T: ?Sized + Send + Sync + 'static>(
        handle: Arc<T>,
        provider_name: &'static str,
    ) -> Self {
        Self {
            capability: TypeKey::of::<T>(),
            provider_name,
            handle: Box::new(handle),
            markers: MarkerSet::default(),
        }
    }

    /// Attaches capability markers to this registration.
    #[must_use]
    pub fn with_markers(mut self, markers: MarkerSet) -> Self {
        self.markers = markers;
        self
    }

    /// Adds a single capability marker.
    #[must_use]
    pub fn with_marker(mut self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.markers = self.markers.with(tag);
        self
    }

    /// The capability interface this record implements.
    #[must_use]
    pub const fn capability(&self) -> TypeKey {
        self.capability
    }

    /// The implementation name, for diagnostics.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// The markers attached to this registration.
    #[must_use]
    pub const fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub(crate) fn handle<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.handle.downcast_ref::<Arc<T>>().map(Arc::clone)
    }
}

impl fmt::Debug for ProviderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRecord")
            .field("capability", &self.capability.name())
            .field("provider_name", &self.provider_name)
            .field("markers", &self.markers)
            .finish_non_exhaustive()
    }
}

/// Registration scanned eagerly at registry construction and indexed by its
/// declared exposed type.
///
/// Extensions without a declared exposed type are indexed by their concrete
/// type instead; that still works but couples callers to the implementation,
/// so loading such a record emits a warning.
pub struct ExtensionRecord {
    exposed: TypeKey,
    declared: bool,
    provider_name: &'static str,
    handle: Box<dyn Any + Send + Sync>,
}

impl ExtensionRecord {
    /// Registers `handle` under the declared exposed type `T`.
    #[must_use]
    pub fn exposes<T: ?Sized + Send + Sync + 'static>(
        handle: Arc<T>,
        provider_name: &'static str,
    ) -> Self {
        Self { exposed: TypeKey::of::<T>(), declared: true, provider_name, handle: Box::new(handle) }
    }

    /// Registers `handle` with no exposed type, indexing it by its concrete type.
    #[must_use]
    pub fn concrete<T: Send + Sync + 'static>(handle: Arc<T>, provider_name: &'static str) -> Self {
        Self {
            exposed: TypeKey::of::<T>(),
            declared: false,
            provider_name,
            handle: Box::new(handle),
        }
    }

    /// The type this extension is indexed under.
    #[must_use]
    pub const fn exposed(&self) -> TypeKey {
        self.exposed
    }

    /// Whether the exposed type was declared (as opposed to the concrete fallback).
    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.declared
    }

    /// The implementation name, for diagnostics.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    pub(crate) fn handle<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        self.handle.downcast_ref::<Arc<T>>().map(Arc::clone)
    }
}

impl fmt::Debug for ExtensionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRecord")
            .field("exposed", &self.exposed.name())
            .field("declared", &self.declared)
            .field("provider_name", &self.provider_name)
            .finish_non_exhaustive()
    }
}
