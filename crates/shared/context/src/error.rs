//! # Context Errors
//!
//! This module defines the [`ContextError`] enum used throughout the context
//! crate for reporting validation and typed-access failures.

use std::borrow::Cow;

/// A specialized [`ContextError`] enum for attribute-context failures.
#[moneta_derive::moneta_error]
pub enum ContextError {
    /// A mandatory identifying attribute is missing or blank.
    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A strict typed read hit an attribute stored under a different type.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal context error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
