//! # Domain Models
//!
//! This crate contains pure domain types with a single dependency (`serde`).
//! Keep it lean: no I/O, no registries, no heavy logic—just data and simple helpers.

pub mod constants;
pub mod currency;

pub use currency::CurrencyUnit;
