use serde::{Deserialize, Serialize};

/// A minimal, opaque currency descriptor.
///
/// Contexts store this type through their opaque object attribute; nothing in
/// the core inspects it beyond equality. Currency data correctness (ISO
/// tables, locale mappings) is deliberately out of scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyUnit {
    /// Alphabetic code, e.g. `"EUR"`.
    pub code: String,
    /// Numeric ISO-4217 code, when assigned.
    pub numeric_code: Option<u16>,
    /// Default number of fraction digits.
    pub fraction_digits: u8,
}

impl CurrencyUnit {
    /// Creates a currency unit with the given code and fraction digits.
    #[must_use]
    pub fn new(code: impl Into<String>, fraction_digits: u8) -> Self {
        Self { code: code.into(), numeric_code: None, fraction_digits }
    }

    /// Sets the numeric ISO-4217 code.
    #[must_use]
    pub fn with_numeric_code(mut self, numeric_code: u16) -> Self {
        self.numeric_code = Some(numeric_code);
        self
    }
}

impl std::fmt::Display for CurrencyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}
