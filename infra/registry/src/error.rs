//! # Registry Errors
//!
//! This module defines the [`RegistryError`] enum used throughout the registry
//! crate for reporting discovery and lookup failures.

use std::borrow::Cow;

/// A specialized [`RegistryError`] enum for registry-related failures.
#[moneta_derive::moneta_error]
pub enum RegistryError {
    /// No implementation is discoverable for a required capability.
    #[error("Unsupported capability{}: {message}", format_context(.context))]
    UnsupportedCapability { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Several implementations were found and the strict ambiguity policy is active.
    #[error("Ambiguous capability{}: {message}", format_context(.context))]
    AmbiguousCapability { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A lookup by exposed type that was never registered.
    #[error("Unknown extension{}: {message}", format_context(.context))]
    UnknownExtension { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A discovery-backend candidate failed to produce its registration.
    /// Non-fatal during bulk discovery: logged and skipped per candidate.
    #[error("Discovery backend error{}: {message}", format_context(.context))]
    Backend { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Occurs when an internal dynamic cast fails.
    /// This usually indicates an invariant violation in a registration record.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal registry error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
