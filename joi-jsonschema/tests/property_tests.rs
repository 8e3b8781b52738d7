//! Property-based tests for the converter.
//!
//! Properties tested:
//! - Common keywords appear exactly when their input field is present
//! - Relative `extractPath` values are always rejected
//! - String `min` always maps to `minLength`
//! - `positive()` / `negative()` never loosen an existing bound
//! - `port()` always lands inside `[0, 65535]`
//! - Re-extracting a name never changes the stored schema
//! - Rejected constructs fail whatever the tolerance flags

use proptest::prelude::*;
use serde_json::{json, Value};

use joi_jsonschema::{ConversionOptions, ConvertError, Converter};

// =============================================================================
// Generators
// =============================================================================

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][a-zA-Z0-9]{0,12}"
}

fn arb_builtin_type() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["string", "number", "boolean", "binary", "date", "object", "array"])
}

fn arb_tolerance() -> impl Strategy<Value = ConversionOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(rules, types)| {
        ConversionOptions::new()
            .ignore_unknown_rules(rules)
            .ignore_unknown_types(types)
    })
}

fn convert(options: ConversionOptions, description: &Value) -> Result<Option<Value>, ConvertError> {
    Converter::new(options).unwrap().convert(description)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_common_keywords_present_iff_input_present(
        type_name in arb_builtin_type(),
        label in proptest::option::of("[a-z ]{1,10}"),
        description in proptest::option::of("[a-z ]{1,20}"),
        default in proptest::option::of(any::<i32>()),
        nullable in any::<bool>(),
    ) {
        let mut input = json!({"type": type_name});
        if let Some(label) = &label {
            input["label"] = json!(label);
        }
        if let Some(description) = &description {
            input["description"] = json!(description);
        }
        if let Some(default) = default {
            input["flags"] = json!({"default": default});
        }
        if nullable {
            input["valids"] = json!([null]);
        }

        let out = convert(ConversionOptions::new(), &input).unwrap().unwrap();

        prop_assert_eq!(out.get("title").and_then(Value::as_str), label.as_deref());
        prop_assert_eq!(out.get("description").and_then(Value::as_str), description.as_deref());
        prop_assert_eq!(out.get("default").and_then(Value::as_i64), default.map(i64::from));
        prop_assert_eq!(out.get("nullable").is_some(), nullable);
        prop_assert!(out.get("enum").is_none());
        prop_assert!(out.get("meta").is_none());
        prop_assert!(out.get("examples").is_none());
    }

    #[test]
    fn prop_relative_extract_path_is_rejected(path in "[a-zA-Z0-9_.-][a-zA-Z0-9_./-]{0,20}") {
        let result = Converter::new(ConversionOptions::new().with_extract_path(path));
        prop_assert!(result.is_err());
    }

    #[test]
    fn prop_absolute_extract_path_is_accepted(path in "/[a-zA-Z0-9_/]{0,20}") {
        prop_assert!(Converter::new(ConversionOptions::new().with_extract_path(path)).is_ok());
    }

    #[test]
    fn prop_string_min_maps_to_min_length(n in 0u32..10_000) {
        let out = convert(
            ConversionOptions::new(),
            &json!({"type": "string", "rules": [{"name": "min", "arg": n}]}),
        )
        .unwrap();

        prop_assert_eq!(out, Some(json!({"type": "string", "minLength": n})));
    }

    #[test]
    fn prop_positive_never_loosens(bound in -1_000i64..1_000) {
        let out = convert(
            ConversionOptions::new(),
            &json!({"type": "number", "rules": [{"name": "greater", "arg": bound}, {"name": "positive"}]}),
        )
        .unwrap()
        .unwrap();

        prop_assert_eq!(out["exclusiveMinimum"].as_i64(), Some(bound.max(0)));
    }

    #[test]
    fn prop_negative_never_loosens(bound in -1_000i64..1_000) {
        let out = convert(
            ConversionOptions::new(),
            &json!({"type": "number", "rules": [{"name": "less", "arg": bound}, {"name": "negative"}]}),
        )
        .unwrap()
        .unwrap();

        prop_assert_eq!(out["exclusiveMaximum"].as_i64(), Some(bound.min(0)));
    }

    #[test]
    fn prop_port_stays_in_range(min in -100_000i64..100_000, max in -100_000i64..100_000) {
        let out = convert(
            ConversionOptions::new(),
            &json!({
                "type": "number",
                "rules": [{"name": "min", "arg": min}, {"name": "max", "arg": max}, {"name": "port"}]
            }),
        )
        .unwrap()
        .unwrap();

        prop_assert_eq!(&out["type"], "integer");
        prop_assert_eq!(out["minimum"].as_i64(), Some(min.max(0)));
        prop_assert_eq!(out["maximum"].as_i64(), Some(max.min(65_535)));
    }

    #[test]
    fn prop_reextraction_is_idempotent(name in arb_name(), first in 0u32..100, second in 0u32..100) {
        let mut converter = Converter::new(
            ConversionOptions::new()
                .with_extract(true)
                .with_extract_path("/components/schemas/"),
        )
        .unwrap();

        let named = |n: u32| json!({
            "type": "string",
            "meta": [{"extract": name.clone()}],
            "rules": [{"name": "max", "arg": n}]
        });

        let expected_ref = json!({"$ref": format!("#/components/schemas/{name}")});
        let path = format!("/components/schemas/{name}");

        prop_assert_eq!(converter.convert(&named(first)).unwrap(), Some(expected_ref.clone()));
        let stored = converter.schemas().get(&path).cloned();

        prop_assert_eq!(converter.convert(&named(second)).unwrap(), Some(expected_ref));
        prop_assert_eq!(converter.schemas().get(&path).cloned(), stored);
        prop_assert_eq!(converter.schemas().len(), 1);
    }

    #[test]
    fn prop_rejected_constructs_ignore_tolerance(options in arb_tolerance(), pick in 0usize..4) {
        let description = [
            json!({"type": "array", "flags": {"sparse": true}}),
            json!({"type": "string", "flags": {"insensitive": true}}),
            json!({"type": "date", "flags": {"timestamp": "javascript"}}),
            json!({"type": "object", "dependencies": [{"type": "xor", "peers": ["a", "b"]}]}),
        ];

        let err = convert(options, &description[pick]).unwrap_err();
        let unsupported = matches!(err, ConvertError::Unsupported { .. });
        prop_assert!(unsupported, "expected an unsupported construct, got {}", err);
    }
}
