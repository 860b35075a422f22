//! Well-known attribute names shared by context producers and consumers.

/// Identifies the component that produced a context. Mandatory on every context.
pub const PROVIDER: &str = "provider";

/// Identifier of a rounding configuration. Mandatory on rounding contexts.
pub const ROUNDING_ID: &str = "rounding_id";

/// ISO-4217 style currency code. Mandatory on currency contexts.
pub const CURRENCY_CODE: &str = "currency_code";

/// Currency unit a rounding is based on, stored as an opaque object.
pub const CURRENCY_UNIT: &str = "currency_unit";

/// Point-in-time attribute; stored either as UTC milliseconds or as a temporal value.
pub const TIMESTAMP: &str = "timestamp";

/// Target scale of a rounding.
pub const SCALE: &str = "scale";

/// Target precision of a rounding.
pub const PRECISION: &str = "precision";

/// Numeric currency code as assigned by ISO-4217.
pub const NUMERIC_CODE: &str = "numeric_code";

/// Default number of fraction digits of a currency.
pub const FRACTION_DIGITS: &str = "fraction_digits";

/// Marks a rounding as targeting cash (physical denomination) rounding.
pub const CASH_ROUNDING: &str = "cash_rounding";
