use crate::builder::ContextBuilder;
use crate::error::ContextError;
use crate::store::Context;
use crate::types::AttributeType;
use chrono::{DateTime, Utc};
use moneta_domain::{CurrencyUnit, constants};
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

/// Configuration for a rounding operation.
///
/// Each instance carries a `rounding_id` linking it to the rounding provider
/// that must create the matching rounding operator, plus arbitrary further
/// attributes documented by that provider (scale, cash rounding, a target
/// currency, ...). Immutable and freely shareable.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundingContext(Context);

impl RoundingContext {
    /// Starts a builder; `provider` and `rounding_id` are validated eagerly.
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] when either identity field is blank.
    pub fn builder(
        provider: impl Into<String>,
        rounding_id: impl Into<String>,
    ) -> Result<RoundingContextBuilder, ContextError> {
        RoundingContextBuilder::new(provider, rounding_id)
    }

    /// The component that produced this context.
    #[must_use]
    pub fn provider(&self) -> &str {
        self.text(constants::PROVIDER).unwrap_or_default()
    }

    /// The rounding id this configuration belongs to.
    #[must_use]
    pub fn rounding_id(&self) -> &str {
        self.text(constants::ROUNDING_ID).unwrap_or_default()
    }

    /// The currency unit this rounding is based on, if any.
    #[must_use]
    pub fn currency_unit(&self) -> Option<Arc<CurrencyUnit>> {
        self.object(constants::CURRENCY_UNIT)
    }

    /// The rounding's target scale, if set.
    #[must_use]
    pub fn scale(&self) -> Option<i32> {
        self.int32(constants::SCALE)
    }

    /// The rounding's target precision, if set.
    #[must_use]
    pub fn precision(&self) -> Option<i32> {
        self.int32(constants::PRECISION)
    }

    /// Whether this rounding targets cash (physical denomination) rounding.
    #[must_use]
    pub fn cash_rounding(&self) -> Option<bool> {
        self.boolean(constants::CASH_ROUNDING)
    }

    /// Exports this context into a pre-populated builder.
    #[must_use]
    pub fn to_builder(&self) -> RoundingContextBuilder {
        RoundingContextBuilder { inner: self.0.to_builder() }
    }
}

impl Deref for RoundingContext {
    type Target = Context;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builder for [`RoundingContext`] instances.
///
/// Identity fields are validated at construction; structural completeness is
/// re-checked at [`RoundingContextBuilder::build`] like every context builder.
///
/// Note this type is NOT meant to be shared across threads.
#[derive(Debug, Clone)]
pub struct RoundingContextBuilder {
    inner: ContextBuilder,
}

impl RoundingContextBuilder {
    /// Creates a builder with the mandatory identity fields set up front.
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] when `provider` or `rounding_id`
    /// is blank. This is deliberately earlier than the generic builder's
    /// deferred check.
    pub fn new(
        provider: impl Into<String>,
        rounding_id: impl Into<String>,
    ) -> Result<Self, ContextError> {
        let provider = require_identity(constants::PROVIDER, provider.into())?;
        let rounding_id = require_identity(constants::ROUNDING_ID, rounding_id.into())?;

        let mut inner = ContextBuilder::new(constants::ROUNDING_ID);
        inner.set(constants::PROVIDER, provider).set(constants::ROUNDING_ID, rounding_id);
        Ok(Self { inner })
    }

    /// Sets the currency unit this rounding is based on.
    pub fn set_currency_unit(&mut self, currency_unit: Arc<CurrencyUnit>) -> &mut Self {
        self.inner.set_object(constants::CURRENCY_UNIT, currency_unit);
        self
    }

    /// Sets the rounding's target scale.
    pub fn set_scale(&mut self, scale: i32) -> &mut Self {
        self.inner.set(constants::SCALE, scale);
        self
    }

    /// Sets the rounding's target precision.
    pub fn set_precision(&mut self, precision: i32) -> &mut Self {
        self.inner.set(constants::PRECISION, precision);
        self
    }

    /// Marks this rounding as cash rounding.
    pub fn set_cash_rounding(&mut self, cash_rounding: bool) -> &mut Self {
        self.inner.set(constants::CASH_ROUNDING, cash_rounding);
        self
    }

    /// Sets the context timestamp as UTC milliseconds.
    pub fn set_timestamp_millis(&mut self, millis: i64) -> &mut Self {
        self.inner.set_timestamp_millis(millis);
        self
    }

    /// Sets the context timestamp as a temporal value.
    pub fn set_timestamp(&mut self, timestamp: DateTime<Utc>) -> &mut Self {
        self.inner.set_timestamp(timestamp);
        self
    }

    /// Sets an arbitrary provider-documented attribute.
    pub fn set<T: AttributeType>(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        value: T,
    ) -> &mut Self {
        self.inner.set(name, value);
        self
    }

    /// Imports every attribute of an existing context into this draft.
    pub fn import(&mut self, context: &Context) -> &mut Self {
        self.inner.import(context);
        self
    }

    /// Freezes the draft into an immutable [`RoundingContext`].
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] if a mandatory identifying
    /// attribute went missing, which cannot happen for builders created
    /// through [`RoundingContextBuilder::new`].
    pub fn build(&self) -> Result<RoundingContext, ContextError> {
        self.inner.build().map(RoundingContext)
    }
}

pub(crate) fn require_identity(
    field: &'static str,
    value: String,
) -> Result<String, ContextError> {
    if value.trim().is_empty() {
        return Err(ContextError::Validation {
            message: format!("Identity field '{field}' must not be blank").into(),
            context: None,
        });
    }
    Ok(value)
}
