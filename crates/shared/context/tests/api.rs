use moneta_context::prelude::*;
use moneta_domain::{CurrencyUnit, constants};
use std::sync::Arc;

#[test]
fn rounding_builder_carries_identity_fields() {
    let ctx = RoundingContext::builder("default", "cash")
        .expect("valid identity")
        .build()
        .expect("build");

    assert_eq!(ctx.provider(), "default");
    assert_eq!(ctx.rounding_id(), "cash");
}

#[test]
fn blank_identity_fields_fail_eagerly() {
    let blank_provider = RoundingContextBuilder::new("", "cash");
    assert!(matches!(blank_provider, Err(ContextError::Validation { .. })));

    let blank_id = RoundingContextBuilder::new("default", "   ");
    assert!(matches!(blank_id, Err(ContextError::Validation { .. })));
}

#[test]
fn generic_builder_defers_validation_to_build() {
    let empty = ContextBuilder::new(constants::ROUNDING_ID).build();
    assert!(matches!(empty, Err(ContextError::Validation { .. })));

    let mut builder = ContextBuilder::new(constants::ROUNDING_ID);
    builder.set(constants::PROVIDER, "default".to_owned());
    let missing_id = builder.build();
    assert!(matches!(missing_id, Err(ContextError::Validation { .. })));

    builder.set(constants::ROUNDING_ID, "half-up".to_owned());
    assert!(builder.build().is_ok());
}

#[test]
fn last_write_wins_per_key() {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_scale(2);
    builder.set_scale(5);

    let ctx = builder.build().expect("build");
    assert_eq!(ctx.scale(), Some(5));
    // One entry under (scale, i32): provider + rounding_id + scale.
    assert_eq!(ctx.len(), 3);
}

#[test]
fn same_name_different_type_are_distinct_entries() {
    let mut builder = ContextBuilder::new(constants::ROUNDING_ID);
    builder
        .set(constants::PROVIDER, "default".to_owned())
        .set(constants::ROUNDING_ID, "cash".to_owned())
        .set("window", 10i32)
        .set("window", 10i64);

    let ctx = builder.build().expect("build");
    assert_eq!(ctx.int32("window"), Some(10));
    assert_eq!(ctx.int64("window"), Some(10));
    assert_eq!(ctx.len(), 4);
}

#[test]
fn strict_read_distinguishes_absent_from_mismatched() {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set("threshold", 5i64);
    let ctx = builder.build().expect("build");

    // Absent name reads as Ok(None).
    let absent = ctx.try_get::<i64>("nope");
    assert!(matches!(absent, Ok(None)));

    // Present under a different type fails loudly.
    let mismatch = ctx.try_get::<bool>("threshold");
    assert!(matches!(mismatch, Err(ContextError::TypeMismatch { .. })));

    // The defaulted accessor folds both into "not present".
    assert_eq!(ctx.get::<bool>("threshold"), None);
    assert!(ctx.get_or("threshold", true));
}

#[test]
fn opaque_object_cast_or_fail() {
    let eur = Arc::new(CurrencyUnit::new("EUR", 2));
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_currency_unit(eur.clone());
    let ctx = builder.build().expect("build");

    let stored = ctx.currency_unit().expect("currency unit present");
    assert!(Arc::ptr_eq(&stored, &eur));

    // Same name, wrong concrete type: strict read reports the mismatch.
    let wrong = ctx.try_object::<String>(constants::CURRENCY_UNIT);
    assert!(matches!(wrong, Err(ContextError::TypeMismatch { .. })));
    assert!(ctx.object::<String>(constants::CURRENCY_UNIT).is_none());
}

#[test]
fn to_builder_roundtrips_and_stays_independent() {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_scale(2).set_cash_rounding(true);
    let original = builder.build().expect("build");

    let roundtripped = original.to_builder().build().expect("rebuild");
    assert_eq!(original, roundtripped);

    // Mutating the exported builder never affects the source context.
    let mut exported = original.to_builder();
    exported.set_scale(9);
    let changed = exported.build().expect("rebuild");
    assert_eq!(original.scale(), Some(2));
    assert_eq!(changed.scale(), Some(9));
}

#[test]
fn builder_reuse_yields_equal_independent_contexts() {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_scale(4);

    let first = builder.build().expect("first build");
    let second = builder.build().expect("second build");
    assert_eq!(first, second);

    // Further mutation only shows up in later builds.
    builder.set_scale(7);
    let third = builder.build().expect("third build");
    assert_eq!(first.scale(), Some(4));
    assert_eq!(third.scale(), Some(7));
}

#[test]
fn currency_context_projections() {
    let mut builder = CurrencyContext::builder("iso", "EUR").expect("valid identity");
    builder.set_numeric_code(978).set_default_fraction_digits(2).set_cash_rounding(false);
    let ctx = builder.build().expect("build");

    assert_eq!(ctx.provider(), "iso");
    assert_eq!(ctx.currency_code(), "EUR");
    assert_eq!(ctx.numeric_code(), Some(978));
    assert_eq!(ctx.default_fraction_digits(), Some(2));
    assert_eq!(ctx.cash_rounding(), Some(false));
}
