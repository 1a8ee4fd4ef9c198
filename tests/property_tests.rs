// tests/property_tests.rs

use hcl_read::{GenericValue, ResultSet, TypedList, TypedValue, convert, format};
use proptest::prelude::*;
use rust_decimal::Decimal;
use serde_json::json;

fn single(key: &str, value: GenericValue) -> ResultSet {
    let mut results = ResultSet::new();
    results.insert(key.to_string(), value);
    results
}

// ============================================================================
// Numbers
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        ..ProptestConfig::default()
    })]

    /// The converted double is the one the float parser picks for the same
    /// value written in exponent form.
    #[test]
    fn prop_decimal_converts_to_nearest_double(
        mantissa in -999_999_999_999_999_999i64..=999_999_999_999_999_999,
        scale in 0u32..=18,
    ) {
        let expected: f64 = format!("{}e-{}", mantissa, scale).parse().unwrap();
        let converted = convert(TypedValue::Number(Decimal::new(mantissa, scale)));
        prop_assert_eq!(converted, GenericValue::Number(expected));
    }

    /// Integers that doubles hold exactly are written without a fraction.
    #[test]
    fn prop_exact_integers_encode_as_json_integers(
        n in -(1i64 << 53) + 1..(1i64 << 53),
    ) {
        let output = format(&single("n", GenericValue::Number(n as f64)), "json").unwrap();
        prop_assert_eq!(output, format!(r#"{{"n":{}}}"#, n));
    }
}

// ============================================================================
// Lists
// ============================================================================

proptest! {
    #[test]
    fn prop_bool_list_is_homogeneous(flags in prop::collection::vec(any::<bool>(), 1..32)) {
        let value = convert(TypedValue::List(
            flags.iter().copied().map(TypedValue::Bool).collect(),
        ));
        prop_assert_eq!(value.as_typed_list(), Some(TypedList::Booleans(flags.clone())));

        let output = format(&single("flags", value), "json").unwrap();
        prop_assert_eq!(output, json!({ "flags": flags }).to_string());
    }

    #[test]
    fn prop_string_list_keeps_order(
        items in prop::collection::vec("[a-z0-9 ]{0,8}", 1..16),
    ) {
        let value = GenericValue::List(
            items.iter().cloned().map(GenericValue::String).collect(),
        );
        let expected: Vec<&str> = items.iter().map(String::as_str).collect();
        prop_assert_eq!(value.as_typed_list(), Some(TypedList::Strings(expected)));

        let output = format(&single("zones", value), "json").unwrap();
        prop_assert_eq!(output, json!({ "zones": items }).to_string());
    }
}
