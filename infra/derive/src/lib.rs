#![allow(unreachable_pub)]

//! # Macros
//!
//! Procedural macros for the moneta infrastructure crates.
//!
//! Currently this crate provides a single attribute macro, [`macro@moneta_error`],
//! which removes the boilerplate around the workspace error convention:
//! every error enum carries a `message`/`context` pair of `Cow<'static, str>`
//! fields and exposes a `.context(..)` combinator through a generated
//! extension trait.

mod macros;

use proc_macro::TokenStream;
use syn::{ItemEnum, parse_macro_input};

/// Attribute macro that turns a plain enum into a workspace error type.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` on the annotated enum.
/// * A `<Name>Ext` trait with a `.context(..)` method, implemented for
///   `Result<T, Name>`; it fills the `context` field of the error in flight.
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists.
/// * For variants carrying a `source` field: `From<SourceType>` plus a
///   `.context(..)` impl lifting `Result<T, SourceType>` into `Result<T, Name>`.
/// * A `format_context` helper used by the `#[error(..)]` display strings.
///
/// # Requirements
///
/// Variants must use named fields. A variant with a `source` field must also
/// carry a `context: Option<Cow<'static, str>>` field.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[moneta_derive::moneta_error]
/// pub enum StoreError {
///     #[error("Validation error{}: {message}", format_context(.context))]
///     Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///     #[error("Internal store error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn moneta_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemEnum);
    macros::error::expand(&input).into()
}
