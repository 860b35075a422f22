use chrono::{DateTime, Utc};
use moneta_context::RoundingContext;

fn context_with_millis(millis: i64) -> RoundingContext {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_timestamp_millis(millis);
    builder.build().expect("build")
}

fn context_with_temporal(dt: DateTime<Utc>) -> RoundingContext {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_timestamp(dt);
    builder.build().expect("build")
}

#[test]
fn millis_derive_temporal_exactly() {
    for millis in [0i64, 1, 1_700_000_000_000] {
        let ctx = context_with_millis(millis);

        assert_eq!(ctx.timestamp_millis(), Some(millis));
        let derived = ctx.timestamp().expect("derived temporal");
        assert_eq!(derived.timestamp_millis(), millis);
    }
}

#[test]
fn temporal_derives_millis_exactly() {
    for millis in [0i64, 1, 1_700_000_000_000] {
        let dt = DateTime::from_timestamp_millis(millis).expect("valid instant");
        let ctx = context_with_temporal(dt);

        assert_eq!(ctx.timestamp(), Some(dt));
        assert_eq!(ctx.timestamp_millis(), Some(millis));
    }
}

#[test]
fn stored_millis_take_precedence_over_temporal() {
    let mut builder = RoundingContext::builder("default", "cash").expect("valid identity");
    builder.set_timestamp_millis(42);
    builder.set_timestamp(DateTime::from_timestamp_millis(43).expect("valid instant"));
    let ctx = builder.build().expect("build");

    // Both entries coexist (same name, different declared type); the
    // millisecond accessor prefers the literally stored integer.
    assert_eq!(ctx.timestamp_millis(), Some(42));
    assert_eq!(ctx.timestamp().map(|dt| dt.timestamp_millis()), Some(43));
}

#[test]
fn no_timestamp_reads_as_none() {
    let ctx = RoundingContext::builder("default", "cash")
        .expect("valid identity")
        .build()
        .expect("build");

    assert_eq!(ctx.timestamp_millis(), None);
    assert_eq!(ctx.timestamp(), None);
}
