//! Dynamic `Value` elements: hashability, ordering, and display.

use seqlinq::prelude::*;

fn mixed() -> Vec<Value> {
    vec![
        Value::Int(3),
        Value::from("three"),
        Value::Float(3.0),
        Value::tuple([Value::Int(1), Value::from("a")]),
        Value::Null,
    ]
}

#[test]
fn test_distinct_over_values() {
    let out = mixed().query().distinct().to_list().expect("query failed");
    assert_eq!(out.len(), 4);
    assert_eq!(out[0], Value::Int(3));
}

#[test]
fn test_unhashable_surfaces_when_element_flows() {
    let values = vec![Value::Int(1), Value::list([1]), Value::Int(2)];
    let mut iter = values.query().distinct().into_iter();
    assert_eq!(iter.next(), Some(Ok(Value::Int(1))));
    assert!(matches!(iter.next(), Some(Err(Error::Unhashable(_)))));
    assert_eq!(iter.next(), Some(Ok(Value::Int(2))));
}

#[test]
fn test_list_nested_in_tuple_is_unhashable() {
    let nested = Value::tuple([Value::Int(1), Value::list([2])]);
    assert!(nested.hash_key().is_err());
    assert!(Value::tuple([Value::Int(1)]).hash_key().is_ok());
}

#[test]
fn test_numeric_values_order_across_kinds() {
    let values = vec![Value::Float(2.5), Value::Int(1), Value::Int(3)];
    let out = values.query().order().to_list().expect("query failed");
    assert_eq!(out, vec![Value::Int(1), Value::Float(2.5), Value::Int(3)]);
}

#[test]
fn test_max_over_mixed_kinds_is_incomparable() {
    let err = mixed().query().max().unwrap_err();
    assert!(matches!(err, Error::Incomparable(_)));
}

#[test]
fn test_value_keyed_dictionary() {
    let dict = vec![Value::from("x"), Value::from("y")]
        .query()
        .to_dictionary_with(|v: &Value| v.clone(), |v: Value| v.to_string())
        .expect("query failed");
    let key = Value::from("y").hash_key().expect("hashable");
    assert_eq!(dict.get(&key).map(String::as_str), Some("'y'"));
}

#[test]
fn test_value_serde_round_trip_through_grouping() {
    let groups = vec![Value::Int(1), Value::Int(1)]
        .query()
        .group_by(|v: &Value| v.as_int())
        .to_list()
        .expect("query failed");
    let json = serde_json::to_string(&groups[0]).expect("serialize");
    let back: Grouping<Option<i64>, Value> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, groups[0]);
}

#[test]
fn test_large_int_and_float_agree_across_operators() {
    let big = Value::Int((1 << 53) + 1);
    let float = Value::Float(9_007_199_254_740_992.0);
    let values = || vec![big.clone(), float.clone()];

    assert!(!vec![float.clone()].query().contains(&big).expect("query failed"));
    assert_eq!(values().query().distinct().count().expect("query failed"), 2);
    assert_eq!(values().query().max().expect("query failed"), big);
    assert_eq!(
        values().query().order().to_list().expect("query failed"),
        vec![float.clone(), big.clone()]
    );
}
