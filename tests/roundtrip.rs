use datalize::{Datalize, Datetime, convert, emit, from_str, from_value, to_string, to_value};
use facet_testhelpers::test;
use serde_json::{Value, json};
use uuid::Uuid;

datalize::enumeration! {
    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Status {
        Active as "active" = 1,
        Retired as "retired" = 2,
    }
}

datalize::one_of! {
    #[derive(Debug, PartialEq)]
    enum Reading {
        When(Datetime),
        Count(i64),
        Note(String),
    }
}

datalize::record! {
    #[derive(Debug, PartialEq)]
    struct Point {
        val: String,
        ts: Datetime,
    }
}

datalize::record! {
    #[derive(Debug, PartialEq)]
    struct Station {
        id: Uuid,
        status: Status,
        points: Vec<Point>,
        readings: Vec<Reading>,
        ratio: f64,
        enabled: bool,
        name: Option<String> = Some("Example".to_string()),
    }
}

fn station_json() -> Value {
    json!({
        "id": "029affa6814e439aa61d2614ad184e0d",
        "status": 2,
        "points": [
            {"val": "timestamps", "ts": "2020-05-18T13:39:00.000666"},
            {"val": "with timezone", "ts": "2020-05-18T13:37:00.000666+03:00"}
        ],
        "readings": ["2021-01-01T00:00:00.000000", 12, "calibrated"],
        "ratio": 0.25,
        "enabled": true,
        "name": null
    })
}

#[test]
fn typed_round_trip() {
    let input = station_json();
    let station = from_value::<Station>(&input).unwrap();
    assert_eq!(station.status, Status::Retired);
    assert_eq!(station.name, None);
    assert_eq!(station.readings[1], Reading::Count(12));
    assert_eq!(station.readings[2], Reading::Note("calibrated".to_string()));
    assert_eq!(to_value(&station), input);
}

#[test]
fn untyped_round_trip() {
    let input = station_json();
    let instance = convert(&input, &Station::describe()).unwrap();
    assert_eq!(emit(&instance), input);
}

#[test]
fn text_round_trip() {
    let station = from_str::<Station>(&station_json().to_string()).unwrap();
    let text = to_string(&station);
    assert_eq!(from_str::<Station>(&text).unwrap(), station);
}

#[test]
fn defaults_are_emitted() {
    let mut input = station_json();
    input.as_object_mut().unwrap().remove("name");

    let station = from_value::<Station>(&input).unwrap();
    assert_eq!(station.name.as_deref(), Some("Example"));
    assert_eq!(to_value(&station)["name"], json!("Example"));
}

#[test]
fn example_program() {
    let from_json = json!({
        "my_id": "029affa6-814e-439a-a61d-2614ad184e0d",
        "points": [
            {"val": "timestamps", "ts": "2020-05-18T13:39:00.000666"},
            {"val": "with timezone", "ts": "2020-05-18T13:37:00.000666+03:00"},
        ],
    });

    datalize::record! {
        #[derive(Debug)]
        struct OneExample {
            my_id: Uuid,
            points: Vec<Point>,
            name: Option<String> = Some("Example".to_string()),
        }
    }

    let obj = from_value::<OneExample>(&from_json).unwrap();
    assert_eq!(obj.name.as_deref(), Some("Example"));
    assert_eq!(obj.points[1].val, "with timezone");
    assert!(obj.points[1].ts.is_aware());
    assert!(!obj.points[0].ts.is_aware());
}

#[test]
fn unrepresentable_floats_become_null() {
    assert_eq!(to_value(&f64::NAN), Value::Null);
    assert_eq!(to_value(&f64::INFINITY), Value::Null);
    assert_eq!(to_value(&f64::NEG_INFINITY), Value::Null);
    assert_eq!(to_value(&vec![1.5, f64::NAN]), json!([1.5, null]));
}

#[test]
fn unsigned_extremes_round_trip() {
    let values: Vec<u64> = vec![0, i64::MAX as u64, i64::MAX as u64 + 1, u64::MAX];
    let emitted = to_value(&values);
    assert_eq!(
        to_string(&values),
        "[0,9223372036854775807,9223372036854775808,18446744073709551615]"
    );
    assert_eq!(from_value::<Vec<u64>>(&emitted).unwrap(), values);
}
