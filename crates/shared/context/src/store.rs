use crate::builder::ContextBuilder;
use crate::error::ContextError;
use crate::types::{AttributeKey, AttributeType, AttributeValue, TypeTag};
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use moneta_domain::constants;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// An immutable, heterogeneously-typed attribute container.
///
/// Attributes are keyed by `(name, declared type)`; insertion order is
/// irrelevant. Once built a context is never mutated—"modification" goes
/// through [`Context::to_builder`], which yields an independent draft. Cloning
/// a context aliases the shared attribute map, which is always safe because
/// the map is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    id_attribute: &'static str,
    attributes: Arc<FxHashMap<AttributeKey, AttributeValue>>,
}

impl Context {
    pub(crate) fn new(
        id_attribute: &'static str,
        attributes: FxHashMap<AttributeKey, AttributeValue>,
    ) -> Self {
        Self { id_attribute, attributes: Arc::new(attributes) }
    }

    /// Name of the specialization identifier attribute this context validates.
    #[must_use]
    pub const fn id_attribute(&self) -> &'static str {
        self.id_attribute
    }

    /// Strict typed read.
    ///
    /// Returns `Ok(None)` when no attribute exists under `name` at all, and
    /// [`ContextError::TypeMismatch`] when the name is present only under a
    /// different declared type.
    ///
    /// # Errors
    /// Returns [`ContextError::TypeMismatch`] on a differently-typed attribute.
    pub fn try_get<T: AttributeType>(&self, name: &str) -> Result<Option<T>, ContextError> {
        let key = AttributeKey::new(name.to_owned(), T::tag());
        match self.attributes.get(&key) {
            Some(value) => T::from_value(value).map(Some).ok_or_else(|| {
                ContextError::Internal {
                    message: "Attribute value variant diverged from its key tag".into(),
                    context: Some(name.to_owned().into()),
                }
            }),
            None => self.mismatch_or_absent(name, T::tag()),
        }
    }

    /// Defaulted typed read: absence and type mismatch both read as `None`.
    #[must_use]
    pub fn get<T: AttributeType>(&self, name: &str) -> Option<T> {
        self.try_get(name).unwrap_or(None)
    }

    /// Defaulted typed read with an explicit fallback.
    #[must_use]
    pub fn get_or<T: AttributeType>(&self, name: &str, default: T) -> T {
        self.get(name).unwrap_or(default)
    }

    /// Borrowed text attribute access.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        let key = AttributeKey::new(name.to_owned(), TypeTag::Text);
        match self.attributes.get(&key) {
            Some(AttributeValue::Text(text)) => Some(text.as_ref()),
            _ => None,
        }
    }

    /// 64-bit integer attribute access.
    #[must_use]
    pub fn int64(&self, name: &str) -> Option<i64> {
        self.get(name)
    }

    /// 32-bit integer attribute access.
    #[must_use]
    pub fn int32(&self, name: &str) -> Option<i32> {
        self.get(name)
    }

    /// Boolean attribute access.
    #[must_use]
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name)
    }

    /// 64-bit float attribute access.
    #[must_use]
    pub fn float64(&self, name: &str) -> Option<f64> {
        self.get(name)
    }

    /// Strict cast-or-fail access to an opaque object attribute.
    ///
    /// # Errors
    /// Returns [`ContextError::TypeMismatch`] when `name` exists only under a
    /// different declared type.
    pub fn try_object<T: Any + Send + Sync>(
        &self,
        name: &str,
    ) -> Result<Option<Arc<T>>, ContextError> {
        let key = AttributeKey::new(name.to_owned(), TypeTag::Object(TypeId::of::<T>()));
        match self.attributes.get(&key) {
            Some(AttributeValue::Object(obj)) => {
                obj.downcast::<T>().map(Some).ok_or_else(|| ContextError::Internal {
                    message: "Opaque attribute diverged from its key type id".into(),
                    context: Some(name.to_owned().into()),
                })
            }
            Some(_) => Err(ContextError::Internal {
                message: "Attribute value variant diverged from its key tag".into(),
                context: Some(name.to_owned().into()),
            }),
            None => self.mismatch_or_absent(name, TypeTag::Object(TypeId::of::<T>())),
        }
    }

    /// Defaulted access to an opaque object attribute.
    #[must_use]
    pub fn object<T: Any + Send + Sync>(&self, name: &str) -> Option<Arc<T>> {
        self.try_object(name).unwrap_or(None)
    }

    /// The component that produced this context. Mandatory on every
    /// validly-built context, so this only returns `None` for drafts that
    /// bypassed validation (which the builder does not allow).
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        self.text(constants::PROVIDER)
    }

    /// The point in time of this context in UTC milliseconds.
    ///
    /// Looks for the integer-milliseconds attribute first; when absent, the
    /// value is **derived** from the temporal attribute as
    /// `seconds-since-epoch * 1000 + millisecond-of-second`. Together with
    /// [`Context::timestamp`] this is the one documented place the store
    /// returns a derived rather than literally stored value; the derivation is
    /// exact and round-trips at millisecond resolution.
    #[must_use]
    pub fn timestamp_millis(&self) -> Option<i64> {
        if let Some(millis) = self.get::<i64>(constants::TIMESTAMP) {
            return Some(millis);
        }
        self.get::<DateTime<Utc>>(constants::TIMESTAMP).map(|dt| dt.timestamp_millis())
    }

    /// The point in time of this context as a temporal value.
    ///
    /// Symmetric inverse of [`Context::timestamp_millis`]: when only the
    /// integer-milliseconds attribute is stored, the temporal value is derived
    /// from it exactly.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        if let Some(dt) = self.get::<DateTime<Utc>>(constants::TIMESTAMP) {
            return Some(dt);
        }
        self.get::<i64>(constants::TIMESTAMP).and_then(DateTime::from_timestamp_millis)
    }

    /// Exports every attribute into a fresh, independent builder.
    ///
    /// Mutating the returned builder never affects this context.
    #[must_use]
    pub fn to_builder(&self) -> ContextBuilder {
        let mut builder = ContextBuilder::new(self.id_attribute);
        builder.import(self);
        builder
    }

    /// Number of stored attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Whether the context holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterates over the stored attribute keys.
    pub fn keys(&self) -> impl Iterator<Item = &AttributeKey> {
        self.attributes.keys()
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&AttributeKey, &AttributeValue)> {
        self.attributes.iter()
    }

    fn mismatch_or_absent<T>(
        &self,
        name: &str,
        requested: TypeTag,
    ) -> Result<Option<T>, ContextError> {
        let stored = self.attributes.keys().find(|key| key.name() == name);
        match stored {
            Some(key) => Err(ContextError::TypeMismatch {
                message: format!(
                    "Attribute '{name}' is stored as {:?}, requested {requested:?}",
                    key.tag()
                )
                .into(),
                context: None,
            }),
            None => Ok(None),
        }
    }
}
