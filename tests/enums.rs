use datalize::{Datalize, ErrorKind, MemberValue, TypeDescriptor, from_value, to_value};
use facet_testhelpers::test;
use miette::Diagnostic;
use serde_json::json;

datalize::enumeration! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum TrollCount {
        One as "one" = 1,
        Two as "two" = 2,
        Many as "many" = 3,
    }
}

datalize::enumeration! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Alphabet {
        A as "a" = "alpha",
        B as "b" = "beta",
        G as "g" = "gamma",
    }
}

datalize::enumeration! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Portion {
        Half as "half" = 0.5,
        Whole as "whole" = 1.0,
    }
}

datalize::record! {
    #[derive(Debug, PartialEq)]
    struct Party {
        trolls: TrollCount,
        letters: Vec<Alphabet>,
    }
}

#[test]
fn string_enums() {
    assert_eq!(to_value(&Alphabet::G), json!("gamma"));
    // pass by value
    assert_eq!(from_value::<Alphabet>(&json!("gamma")).unwrap(), Alphabet::G);
    // pass by name
    assert_eq!(from_value::<Alphabet>(&json!("g")).unwrap(), Alphabet::G);
}

#[test]
fn int_enums() {
    assert_eq!(to_value(&TrollCount::Many), json!(3));
    // pass by value
    assert_eq!(
        from_value::<TrollCount>(&json!(3)).unwrap(),
        TrollCount::Many
    );
    // pass by name
    assert_eq!(
        from_value::<TrollCount>(&json!("many")).unwrap(),
        TrollCount::Many
    );
}

#[test]
fn integral_floats_match_int_members() {
    assert_eq!(
        from_value::<TrollCount>(&json!(3.0)).unwrap(),
        TrollCount::Many
    );
    assert!(from_value::<TrollCount>(&json!(2.5)).is_err());
}

#[test]
fn float_enums() {
    assert_eq!(to_value(&Portion::Half), json!(0.5));
    assert_eq!(from_value::<Portion>(&json!(0.5)).unwrap(), Portion::Half);
    assert_eq!(from_value::<Portion>(&json!("half")).unwrap(), Portion::Half);
    // An integer matches an equal float member.
    assert_eq!(from_value::<Portion>(&json!(1)).unwrap(), Portion::Whole);
    assert_eq!(to_value(&Portion::Whole), json!(1.0));

    let err = from_value::<Portion>(&json!(0.25)).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::EnumLookupFailed {
            enum_name: "Portion",
            ..
        }
    ));
}

#[test]
fn unknown_members_fail() {
    for input in [json!(5), json!("3"), json!("three"), json!(null)] {
        let err = from_value::<TrollCount>(&input).unwrap_err();
        assert!(
            matches!(
                &err.kind,
                ErrorKind::EnumLookupFailed {
                    enum_name: "TrollCount",
                    value,
                    ..
                } if *value == input
            ),
            "unexpected error for {input}: {err}"
        );
    }
}

#[test]
fn close_names_get_a_suggestion() {
    let err = from_value::<TrollCount>(&json!("mnay")).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::EnumLookupFailed {
            suggestion: Some("many"),
            ..
        }
    ));
    assert_eq!(err.help().unwrap().to_string(), "did you mean `many`?");

    let err = from_value::<TrollCount>(&json!("zzzzzz")).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::EnumLookupFailed {
            suggestion: None,
            ..
        }
    ));
}

#[test]
fn enums_inside_records() {
    let party = Party {
        trolls: TrollCount::Two,
        letters: vec![Alphabet::A, Alphabet::B],
    };
    let expected = json!({"trolls": 2, "letters": ["alpha", "beta"]});
    assert_eq!(to_value(&party), expected);
    assert_eq!(from_value::<Party>(&expected).unwrap(), party);

    // Names and values can be mixed freely on input.
    let mixed = json!({"trolls": "two", "letters": ["a", "beta"]});
    assert_eq!(from_value::<Party>(&mixed).unwrap(), party);
}

#[test]
fn descriptor_lists_members() {
    let TypeDescriptor::Enum(descriptor) = Alphabet::describe() else {
        panic!("expected an enum descriptor");
    };
    let names: Vec<&str> = descriptor.member_names().collect();
    assert_eq!(names, ["a", "b", "g"]);
    assert_eq!(descriptor.by_str_value("beta").unwrap().name, "b");
    assert_eq!(descriptor.by_name("g").unwrap().value, MemberValue::Str("gamma"));
    assert_eq!(Alphabet::G.member_name(), "g");
}

#[test]
#[should_panic(expected = "duplicate member value")]
fn duplicate_values_are_rejected() {
    datalize::EnumDescriptor::new(
        "Broken",
        vec![
            datalize::EnumMember::new("first", 1),
            datalize::EnumMember::new("second", 1),
        ],
    );
}

#[test]
#[should_panic(expected = "duplicate member value")]
fn equal_int_and_float_values_are_rejected() {
    datalize::EnumDescriptor::new(
        "Broken",
        vec![
            datalize::EnumMember::new("three", 3),
            datalize::EnumMember::new("also_three", 3.0),
        ],
    );
}
