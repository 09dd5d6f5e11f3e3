use chrono::NaiveDate;
use datalize::{Datalize, Datetime, Deserializer, ErrorKind, from_value, to_value};
use facet_testhelpers::test;
use serde_json::json;

datalize::one_of! {
    #[derive(Debug, PartialEq)]
    enum TextOrInt {
        Text(String),
        Int(i64),
    }
}

datalize::one_of! {
    #[derive(Debug, PartialEq)]
    enum FloatOrInt {
        Float(f64),
        Int(i64),
    }
}

datalize::one_of! {
    #[derive(Debug, PartialEq)]
    enum TextFirst {
        Text(String),
        When(Datetime),
    }
}

datalize::one_of! {
    #[derive(Debug, PartialEq)]
    enum WhenFirst {
        When(Datetime),
        Text(String),
    }
}

datalize::one_of! {
    #[derive(Debug, PartialEq)]
    enum Numberish {
        Float(f64),
        Int(i64),
        Nothing(()),
    }
}

datalize::record! {
    #[derive(Debug, PartialEq)]
    struct HasUnion {
        name: String,
        val: TextOrInt,
    }
}

datalize::record! {
    #[derive(Debug, PartialEq)]
    struct HasUnionNum {
        name: String,
        val: FloatOrInt,
    }
}

datalize::record! {
    #[derive(Debug, PartialEq)]
    struct IsNotOptional {
        name: String,
        val: Numberish,
    }
}

#[test]
fn union_of_string_and_int() {
    let obj = HasUnion {
        name: "union_int".to_string(),
        val: TextOrInt::Int(123),
    };
    let expected = json!({"name": "union_int", "val": 123});
    assert_eq!(to_value(&obj), expected);
    assert_eq!(from_value::<HasUnion>(&expected).unwrap(), obj);

    let obj = HasUnion {
        name: "union_val_is_str".to_string(),
        val: TextOrInt::Text("123".to_string()),
    };
    let expected = json!({"name": "union_val_is_str", "val": "123"});
    assert_eq!(to_value(&obj), expected);
    assert_eq!(from_value::<HasUnion>(&expected).unwrap(), obj);
}

#[test]
fn native_int_is_not_taken_as_float() {
    let obj = HasUnionNum {
        name: "union_minor_int".to_string(),
        val: FloatOrInt::Int(123),
    };
    let expected = json!({"name": "union_minor_int", "val": 123});
    assert_eq!(to_value(&obj), expected);
    assert_eq!(from_value::<HasUnionNum>(&expected).unwrap(), obj);
}

#[test]
fn native_float_is_not_taken_as_int() {
    let obj = HasUnionNum {
        name: "union_minor_float".to_string(),
        val: FloatOrInt::Float(123.12),
    };
    let expected = json!({"name": "union_minor_float", "val": 123.12});
    assert_eq!(to_value(&obj), expected);
    assert_eq!(from_value::<HasUnionNum>(&expected).unwrap(), obj);
}

#[test]
fn numeric_string_goes_through_the_float_constructor() {
    let obj = from_value::<HasUnionNum>(&json!({"name": "stringy", "val": "12.3"})).unwrap();
    assert_eq!(obj.val, FloatOrInt::Float(12.3));
}

#[test]
fn exhausted_union() {
    let err =
        from_value::<HasUnionNum>(&json!({"name": "union_string_error", "val": "abc123"}))
            .unwrap_err();
    let ErrorKind::UnionExhausted {
        union,
        attempted,
        failures,
    } = &err.kind
    else {
        panic!("expected UnionExhausted, got {:?}", err.kind);
    };
    assert_eq!(union, "float | int");
    assert_eq!(attempted, &["float", "int"]);
    assert_eq!(failures.len(), 2);
    assert!(matches!(
        failures[0].kind,
        ErrorKind::ConversionError { target: "float", .. }
    ));
    assert_eq!(err.path.to_string(), "val");
}

#[test]
fn string_first_always_wins() {
    let input = json!("2020-05-18T13:37:00.000666");
    assert_eq!(
        from_value::<TextFirst>(&input).unwrap(),
        TextFirst::Text("2020-05-18T13:37:00.000666".to_string())
    );
}

#[test]
fn stricter_candidate_first_parses() {
    let input = json!("2020-05-18T13:37:00.000666");
    let expected = NaiveDate::from_ymd_opt(2020, 5, 18)
        .unwrap()
        .and_hms_micro_opt(13, 37, 0, 666)
        .unwrap();
    assert_eq!(
        from_value::<WhenFirst>(&input).unwrap(),
        WhenFirst::When(Datetime::Naive(expected))
    );

    // Falls back to the string candidate when the datetime parse fails.
    assert_eq!(
        from_value::<WhenFirst>(&json!("tomorrow")).unwrap(),
        WhenFirst::Text("tomorrow".to_string())
    );
}

#[test]
fn null_matches_the_none_like_candidate() {
    let obj = from_value::<IsNotOptional>(&json!({"name": "not_optional", "val": null})).unwrap();
    assert_eq!(
        obj,
        IsNotOptional {
            name: "not_optional".to_string(),
            val: Numberish::Nothing(()),
        }
    );
    assert_eq!(to_value(&obj), json!({"name": "not_optional", "val": null}));

    let obj = from_value::<IsNotOptional>(&json!({"name": "x", "val": 4})).unwrap();
    assert_eq!(obj.val, Numberish::Int(4));
}

#[test]
fn string_candidate_raises_an_advisory() {
    let descriptor = TextOrInt::describe();

    let mut deserializer = Deserializer::new();
    deserializer.convert(&json!(7), &descriptor).unwrap();
    assert!(deserializer.advisories().is_empty());

    deserializer.convert(&json!("seven"), &descriptor).unwrap();
    let advisories = deserializer.into_advisories();
    assert_eq!(advisories.len(), 1);
    assert_eq!(advisories[0].union, "str | int");
    insta::assert_snapshot!(
        advisories[0].to_string(),
        @"ambiguous union `str | int` at <root>: string candidate may shadow other matches"
    );
}

#[test]
fn advisories_of_rejected_candidates_are_dropped() {
    datalize::record! {
        #[derive(Debug)]
        struct Tagged {
            tag: TextOrInt,
            weight: f64,
        }
    }

    datalize::one_of! {
        #[derive(Debug)]
        enum TaggedOrFlag {
            Tagged(Tagged),
            Flag(bool),
        }
    }

    let mut deserializer = Deserializer::new();
    let value = json!({"tag": "heavy", "weight": "unknown"});
    assert!(deserializer.convert(&value, &TaggedOrFlag::describe()).is_err());
    assert!(deserializer.advisories().is_empty());
}
