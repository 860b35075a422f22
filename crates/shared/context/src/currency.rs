use crate::builder::ContextBuilder;
use crate::error::ContextError;
use crate::rounding::require_identity;
use crate::store::Context;
use crate::types::AttributeType;
use chrono::{DateTime, Utc};
use moneta_domain::constants;
use std::borrow::Cow;
use std::ops::Deref;

/// Configuration attached to a currency definition.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyContext(Context);

impl CurrencyContext {
    /// Starts a builder; `provider` and `currency_code` are validated eagerly.
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] when either identity field is blank.
    pub fn builder(
        provider: impl Into<String>,
        currency_code: impl Into<String>,
    ) -> Result<CurrencyContextBuilder, ContextError> {
        CurrencyContextBuilder::new(provider, currency_code)
    }

    /// The component that produced this context.
    #[must_use]
    pub fn provider(&self) -> &str {
        self.text(constants::PROVIDER).unwrap_or_default()
    }

    /// The currency code this configuration belongs to.
    #[must_use]
    pub fn currency_code(&self) -> &str {
        self.text(constants::CURRENCY_CODE).unwrap_or_default()
    }

    /// The numeric ISO-4217 code, if set.
    #[must_use]
    pub fn numeric_code(&self) -> Option<i32> {
        self.int32(constants::NUMERIC_CODE)
    }

    /// The default number of fraction digits, if set.
    #[must_use]
    pub fn default_fraction_digits(&self) -> Option<i32> {
        self.int32(constants::FRACTION_DIGITS)
    }

    /// Whether amounts in this currency round to cash denominations.
    #[must_use]
    pub fn cash_rounding(&self) -> Option<bool> {
        self.boolean(constants::CASH_ROUNDING)
    }

    /// Exports this context into a pre-populated builder.
    #[must_use]
    pub fn to_builder(&self) -> CurrencyContextBuilder {
        CurrencyContextBuilder { inner: self.0.to_builder() }
    }
}

impl Deref for CurrencyContext {
    type Target = Context;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Builder for [`CurrencyContext`] instances.
///
/// Note this type is NOT meant to be shared across threads.
#[derive(Debug, Clone)]
pub struct CurrencyContextBuilder {
    inner: ContextBuilder,
}

impl CurrencyContextBuilder {
    /// Creates a builder with the mandatory identity fields set up front.
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] when `provider` or `currency_code`
    /// is blank.
    pub fn new(
        provider: impl Into<String>,
        currency_code: impl Into<String>,
    ) -> Result<Self, ContextError> {
        let provider = require_identity(constants::PROVIDER, provider.into())?;
        let currency_code = require_identity(constants::CURRENCY_CODE, currency_code.into())?;

        let mut inner = ContextBuilder::new(constants::CURRENCY_CODE);
        inner.set(constants::PROVIDER, provider).set(constants::CURRENCY_CODE, currency_code);
        Ok(Self { inner })
    }

    /// Sets the numeric ISO-4217 code.
    pub fn set_numeric_code(&mut self, numeric_code: i32) -> &mut Self {
        self.inner.set(constants::NUMERIC_CODE, numeric_code);
        self
    }

    /// Sets the default number of fraction digits.
    pub fn set_default_fraction_digits(&mut self, fraction_digits: i32) -> &mut Self {
        self.inner.set(constants::FRACTION_DIGITS, fraction_digits);
        self
    }

    /// Marks this currency as cash-rounded.
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

    /// Freezes the draft into an immutable [`CurrencyContext`].
    ///
    /// # Errors
    /// Returns [`ContextError::Validation`] if a mandatory identifying
    /// attribute went missing, which cannot happen for builders created
    /// through [`CurrencyContextBuilder::new`].
    pub fn build(&self) -> Result<CurrencyContext, ContextError> {
        self.inner.build().map(CurrencyContext)
    }
}
