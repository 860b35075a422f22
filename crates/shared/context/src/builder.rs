use crate::error::ContextError;
use crate::store::Context;
use crate::types::{AttributeKey, AttributeType, AttributeValue, OpaqueObject, TypeTag};
use chrono::{DateTime, Utc};
use fxhash::FxHashMap;
use moneta_domain::constants;
use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

/// A mutable staging area that accumulates attributes and freezes them into a
/// [`Context`].
///
/// Writes are last-write-wins per `(name, declared type)` key; no conflict
/// detection is performed. [`ContextBuilder::build`] snapshots the current
/// draft, so a builder stays reusable—building twice yields two equal,
/// independently-owned contexts.
///
/// Note this type is NOT meant to be shared across threads.
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    id_attribute: &'static str,
    attributes: FxHashMap<AttributeKey, AttributeValue>,
}

impl ContextBuilder {
    /// Creates an empty builder that will validate the given specialization
    /// identifier attribute (besides `provider`) at build time.
    #[must_use]
    pub fn new(id_attribute: &'static str) -> Self {
        Self { id_attribute, attributes: FxHashMap::default() }
    }

    /// Sets a scalar attribute, overwriting any previous value under the same
    /// `(name, type)` key.
    pub fn set<T: AttributeType>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) -> &mut Self {
        self.attributes.insert(AttributeKey::new(name, T::tag()), value.into_value());
        self
    }

    /// Sets an opaque object attribute under its concrete type.
    pub fn set_object<T: Any + Send + Sync>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: Arc<T>,
    ) -> &mut Self {
        let object = OpaqueObject::new(value);
        let key = AttributeKey::new(name, TypeTag::Object(object.type_id()));
        self.attributes.insert(key, AttributeValue::Object(object));
        self
    }

    /// Sets the context timestamp as UTC milliseconds.
    pub fn set_timestamp_millis(&mut self, millis: i64) -> &mut Self {
        self.set(constants::TIMESTAMP, millis)
    }

    /// Sets the context timestamp as a temporal value.
    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
        self.set(constants::TIMESTAMP, timestamp)
    }

    /// Imports every attribute of an existing context into this draft,
    /// overwriting entries under the same keys. This copies key/value pairs;
    /// no state is shared with the source context afterwards.
    pub fn import(&mut self, context: &Context) -> &mut Self {
        for (key, value) in context.entries() {
            self.attributes.insert(key.clone(), value.clone());
        }
        self
    }

    /// Freezes the current draft into an immutable [`Context`].
    ///
    /// Deferred validation: the draft must contain `provider` and the
    /// specialization identifier as text attributes. The builder itself is
    /// untouched and can keep accumulating attributes or build again.
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] when a mandatory identifying
    /// attribute is missing.
    pub fn build(&self) -> Result<Context, ContextError> {
        self.require_text(constants::PROVIDER)?;
        self.require_text(self.id_attribute)?;
        Ok(Context::new(self.id_attribute, self.attributes.clone()))
    }

    fn require_text(&self, name: &'static str) -> Result<(), ContextError> {
        let key = AttributeKey::new(name, TypeTag::Text);
        if self.attributes.contains_key(&key) {
            return Ok(());
        }
        Err(ContextError::Validation {
            message: format!("Mandatory text attribute '{name}' is not set").into(),
            context: None,
        })
    }
}
