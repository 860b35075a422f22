use moneta_domain::CurrencyUnit;

#[test]
fn currency_unit_serde_roundtrip() {
    let eur = CurrencyUnit::new("EUR", 2).with_numeric_code(978);

    let json = serde_json::to_string(&eur).expect("serialize");
    let back: CurrencyUnit = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(eur, back);
}

#[test]
fn currency_unit_display_is_code() {
    let chf = CurrencyUnit::new("CHF", 2);
    assert_eq!(chf.to_string(), "CHF");
}
