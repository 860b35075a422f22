//! # Typed Attribute Contexts
//!
//! Immutable, heterogeneously-typed attribute containers carrying
//! configuration for monetary domain objects, plus their builders.
//!
//! ## Overview
//!
//! A [`Context`] maps `(name, declared type)` keys to typed values. Storage
//! preserves the declared type, so reading an attribute back under a different
//! type is a detectable error rather than a silent coercion; the one
//! documented exception is the bidirectional millisecond/temporal timestamp
//! derivation on [`Context::timestamp_millis`] / [`Context::timestamp`].
//!
//! Specializations ([`RoundingContext`], [`CurrencyContext`]) are pure
//! projections: named, typed accessors over the same store, with their
//! identity fields (`provider` plus a specialization id) validated eagerly at
//! builder construction.
//!
//! ## Example
//!
//! ```rust
//! use moneta_context::RoundingContext;
//!
//! # fn main() -> Result<(), moneta_context::ContextError> {
//! let mut builder = RoundingContext::builder("default", "cash")?;
//! let ctx = builder.set_scale(2).set_cash_rounding(true).build()?;
//!
//! assert_eq!(ctx.provider(), "default");
//! assert_eq!(ctx.rounding_id(), "cash");
//! assert_eq!(ctx.scale(), Some(2));
//! # Ok(())
//! # }
//! ```

mod builder;
mod currency;
mod error;
mod rounding;
mod store;
mod types;

pub use builder::ContextBuilder;
pub use currency::{CurrencyContext, CurrencyContextBuilder};
pub use error::{ContextError, ContextErrorExt};
pub use rounding::{RoundingContext, RoundingContextBuilder};
pub use store::Context;
pub use types::{AttributeKey, AttributeType, AttributeValue, OpaqueObject, TypeTag};

pub mod prelude {
    pub use crate::builder::ContextBuilder;
    pub use crate::currency::{CurrencyContext, CurrencyContextBuilder};
    pub use crate::error::{ContextError, ContextErrorExt};
    pub use crate::rounding::{RoundingContext, RoundingContextBuilder};
    pub use crate::store::Context;
    pub use crate::types::{AttributeKey, AttributeValue, TypeTag};
}
