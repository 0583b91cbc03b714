//! Terminal materializers over full chains.

use std::collections::BTreeMap;

use seqlinq::prelude::*;

#[test]
fn test_string_to_list_and_count() {
    let text = "abcdef";
    let chars = text.chars().query().to_list().expect("query failed");
    assert_eq!(chars, vec!['a', 'b', 'c', 'd', 'e', 'f']);
    assert_eq!(text.chars().query().count().expect("query failed"), text.len());
}

#[test]
fn test_to_set_deduplicates() {
    let set = vec![3, 1, 3, 2, 1].query().to_set().expect("query failed");
    assert_eq!(set.len(), 3);
    assert!(set.contains(&2));
}

#[test]
fn test_to_dictionary_by_prefix() {
    let dict = "Australia Canada Russia"
        .split_whitespace()
        .query()
        .to_dictionary(|s: &&str| s[..2].to_uppercase())
        .expect("query failed");
    assert_eq!(
        dict.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["AU", "CA", "RU"]
    );
    assert_eq!(dict["RU"], "Russia");
}

#[test]
fn test_dictionary_collision_policy() {
    let words = || vec!["apple", "bean", "avocado"];

    let err = words()
        .query()
        .to_dictionary(|w: &&str| w.chars().next())
        .unwrap_err();
    assert!(matches!(err, Error::DuplicateKey(_)));

    let config = QueryConfig::default().with_duplicate_keys(DuplicateKeyPolicy::LastWins);
    let dict = words()
        .query()
        .with_config(config)
        .to_dictionary(|w: &&str| w.chars().next())
        .expect("query failed");
    let entries: Vec<_> = dict.into_iter().collect();
    assert_eq!(entries, vec![(Some('a'), "avocado"), (Some('b'), "bean")]);
}

#[test]
fn test_all_alphanumeric() {
    assert!("Formula1"
        .chars()
        .query()
        .all(|c| c.is_alphanumeric())
        .expect("query failed"));
    assert!(!"Formula 1"
        .chars()
        .query()
        .all(|c| c.is_alphanumeric())
        .expect("query failed"));
}

#[test]
fn test_dict_keys_sum_and_values() {
    let dict: BTreeMap<i32, i32> = [(12, 22), (20, 2), (30, 3), (88, 2)].into_iter().collect();
    assert_eq!(dict.keys().copied().query().sum().expect("query failed"), 150);

    let values = dict
        .values()
        .copied()
        .query()
        .distinct()
        .order()
        .to_list()
        .expect("query failed");
    assert_eq!(values, vec![2, 3, 22]);
}

#[test]
fn test_terminals_stop_early() {
    // An infinite source is fine for short-circuiting terminals.
    assert!((0..).query().any().expect("query failed"));
    assert!((0..).query().any_where(|x| *x > 5).expect("query failed"));
    assert!(!(0..).query().all(|x| *x < 5).expect("query failed"));
    assert_eq!((0..).query().first_where(|x| x % 7 == 6).expect("query failed"), 6);
    assert_eq!((10..).query().element_at(3).expect("query failed"), 13);
}

#[test]
fn test_empty_sequence_errors() {
    let empty = || Vec::<i32>::new().query();
    assert_eq!(empty().first(), Err(Error::EmptySequence("first")));
    assert_eq!(empty().last(), Err(Error::EmptySequence("last")));
    assert_eq!(empty().min(), Err(Error::EmptySequence("min")));
    assert_eq!(empty().average(), Err(Error::EmptySequence("average")));
    assert_eq!(empty().first_or_none(), Ok(None));
    assert_eq!(empty().count(), Ok(0));
}

#[test]
fn test_min_max_average_over_chain() {
    let q = || vec![4, 9, 1, 6].query().where_by(|x| *x > 1);
    assert_eq!(q().min().expect("query failed"), 4);
    assert_eq!(q().max().expect("query failed"), 9);
    assert_eq!(q().average().expect("query failed"), 19.0 / 3.0);
}

#[test]
fn test_terminal_returns_first_error_only() {
    let items: Vec<seqlinq::Result<i32>> = vec![
        Ok(1),
        Err(Error::callback("first")),
        Err(Error::callback("second")),
    ];
    assert_eq!(
        Query::from_results(items).count(),
        Err(Error::Callback("first".into()))
    );
}
