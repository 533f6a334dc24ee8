use loan_emi_core::catalog::{Bounds, LoanProductSpec, ProductCatalog, ProductKey};
use loan_emi_core::engine::{LoanCommand, LoanEngine, LoanState};
use loan_emi_core::{emi, LoanError};
use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const EPS: Decimal = dec!(0.000000001);

fn assert_consistent(s: &LoanState) {
    let n = Decimal::from(s.installments);
    assert!(
        (s.total_payment - s.monthly_payment * n).abs() < EPS,
        "total_payment {} != monthly {} x {}",
        s.total_payment,
        s.monthly_payment,
        n
    );
    assert!((s.total_interest + s.principal - s.total_payment).abs() < EPS);
    let expected = emi::compute_emi(s.principal, s.annual_rate_percent, s.tenure_years).unwrap();
    assert_eq!(s.monthly_payment, expected.monthly_payment);
}

fn assert_in_range(engine: &LoanEngine) {
    let s = engine.state();
    let p = engine.active_product().unwrap();
    assert!(p.amount_range.contains(s.principal));
    assert!(p.rate_range.contains(s.annual_rate_percent));
    assert!(p.tenure_range.contains(s.tenure_years));
}

/// Personal loan whose tenure can go as low as a few days.
fn short_tenure_catalog() -> ProductCatalog {
    let mut personal = ProductCatalog::standard()
        .get(ProductKey::Personal)
        .unwrap()
        .clone();
    personal.tenure_range = Bounds::new(dec!(0.01), dec!(7), dec!(3), dec!(0.01));
    ProductCatalog::new(vec![personal]).unwrap()
}

// ===========================================================================
// Reference scenarios
// ===========================================================================

#[test]
fn test_reference_housing_defaults() {
    let engine = LoanEngine::standard().unwrap();
    let s = engine.state();
    assert_eq!(s.installments, 60);
    // 1,000,000 at 6.5% over 5 years
    assert!((s.monthly_payment - dec!(19566.15)).abs() < dec!(0.01));
    assert!((s.total_payment - dec!(1173968.89)).abs() < dec!(0.01));
    assert!((s.total_interest - dec!(173968.89)).abs() < dec!(0.01));
    assert_consistent(s);
}

#[test]
fn test_zero_rate_personal_loan() {
    let mut engine = LoanEngine::standard().unwrap();
    engine.select_product("personal").unwrap();
    engine.set_principal(dec!(120_000)).unwrap();
    engine.set_annual_rate(dec!(0)).unwrap();
    let s = engine.set_tenure(dec!(1)).unwrap();
    assert_eq!(s.installments, 12);
    assert_eq!(s.monthly_payment, dec!(10_000));
    assert_eq!(s.total_interest, Decimal::ZERO);
}

#[test]
fn test_every_product_switch_resets_to_defaults() {
    let mut engine = LoanEngine::standard().unwrap();
    let products: Vec<LoanProductSpec> = engine.catalog().list_products().to_vec();
    for product in &products {
        engine.set_principal(dec!(999_999_999)).unwrap();
        engine.set_tenure(dec!(2)).unwrap();
        let s = engine.select_product(product.key.as_str()).unwrap();
        assert_eq!(s.active_product, product.key);
        assert_eq!(s.principal, product.amount_range.default);
        assert_eq!(s.annual_rate_percent, product.rate_range.default);
        assert_eq!(s.tenure_years, product.tenure_range.default);
        assert_consistent(s);
    }
}

#[test]
fn test_unknown_product_is_atomic() {
    let mut engine = LoanEngine::standard().unwrap();
    engine.select_product("vehicle").unwrap();
    engine.set_annual_rate(dec!(11.2)).unwrap();
    let before = engine.snapshot();

    let err = engine.select_product("nonexistent").unwrap_err();
    assert!(matches!(err, LoanError::UnknownProduct(ref k) if k == "nonexistent"));
    assert_eq!(engine.state(), &before);

    let err = engine
        .apply(&LoanCommand::SelectProduct { key: "boat".into() })
        .unwrap_err();
    assert!(matches!(err, LoanError::UnknownProduct(_)));
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_absent_product_in_custom_catalog() {
    let mut engine = LoanEngine::new(short_tenure_catalog()).unwrap();
    let before = engine.snapshot();
    assert!(matches!(
        engine.select_product("housing"),
        Err(LoanError::UnknownProduct(_))
    ));
    assert_eq!(engine.state(), &before);
}

#[test]
fn test_zero_month_tenure_is_rejected_and_atomic() {
    let mut engine = LoanEngine::new(short_tenure_catalog()).unwrap();
    assert_eq!(engine.state().active_product, ProductKey::Personal);
    let before = engine.snapshot();

    // 0.01 years rounds to zero installments
    let err = engine.set_tenure(dec!(0.01)).unwrap_err();
    assert!(matches!(err, LoanError::InvalidTenure { installments: 0, .. }));
    assert_eq!(engine.state(), &before);

    // negative input clamps to the minimum, which still rounds to zero
    assert!(matches!(
        engine.set_tenure(dec!(-1)),
        Err(LoanError::InvalidTenure { .. })
    ));
    assert_eq!(engine.state(), &before);

    // half a month rounds up to one installment
    let s = engine.set_tenure(dec!(0.05)).unwrap();
    assert_eq!(s.installments, 1);
    assert_consistent(s);
}

#[test]
fn test_fractional_tenure_rounds_to_months() {
    let mut engine = LoanEngine::new(short_tenure_catalog()).unwrap();
    let s = engine.set_tenure(dec!(2.5)).unwrap();
    assert_eq!(s.installments, 30);
    let s = engine.set_tenure(dec!(2.54)).unwrap();
    assert_eq!(s.installments, 30);
    assert_eq!(s.tenure_years, dec!(2.54));
    assert_consistent(s);
}

#[test]
fn test_state_serializes_decimals_as_strings() {
    let engine = LoanEngine::standard().unwrap();
    let v = serde_json::to_value(engine.state()).unwrap();
    assert_eq!(v["active_product"], "housing");
    assert_eq!(v["principal"], "1000000");
    assert_eq!(v["installments"], 60);
    let back: LoanState = serde_json::from_value(v).unwrap();
    assert_eq!(&back, engine.state());
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn prop_state_consistent_and_in_range_after_any_op(
        product_idx in 0usize..3,
        principal in -1_000_000i64..20_000_000,
        rate_tenths in -50i64..400,
        tenure in -5i64..50,
    ) {
        let mut engine = LoanEngine::standard().unwrap();
        let key = engine.catalog().list_products()[product_idx].key;
        engine.select_product(key.as_str()).unwrap();
        assert_in_range(&engine);
        assert_consistent(engine.state());

        engine.set_principal(Decimal::from(principal)).unwrap();
        assert_in_range(&engine);
        assert_consistent(engine.state());

        engine.set_annual_rate(Decimal::new(rate_tenths, 1)).unwrap();
        assert_in_range(&engine);
        assert_consistent(engine.state());

        engine.set_tenure(Decimal::from(tenure)).unwrap();
        assert_in_range(&engine);
        assert_consistent(engine.state());
        prop_assert_eq!(engine.state().active_product, key);
    }

    #[test]
    fn prop_payment_increases_with_principal(
        principal in 50_000i64..4_000_000,
        delta in 1i64..1_000_000,
        rate_tenths in 10i64..150,
        tenure in 1i64..30,
    ) {
        let mut engine = LoanEngine::standard().unwrap();
        engine.set_annual_rate(Decimal::new(rate_tenths, 1)).unwrap();
        engine.set_tenure(Decimal::from(tenure)).unwrap();

        let low = engine.set_principal(Decimal::from(principal)).unwrap().clone();
        // may clamp to the 5,000,000 ceiling, still above `principal`
        let high = engine.set_principal(Decimal::from(principal + delta)).unwrap().clone();
        prop_assert!(high.principal > low.principal);

        prop_assert!(high.monthly_payment > low.monthly_payment);
        prop_assert!(high.total_payment > low.total_payment);
        prop_assert!(high.total_interest > low.total_interest);
    }
}

