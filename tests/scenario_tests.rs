//! End-to-end query scenarios combining several operators.

use seqlinq::prelude::*;

#[test]
fn test_most_frequent_words() {
    let text = "A box of biscuits, a box of mixed biscuits, and a biscuit mixer.";
    let top = text
        .split_whitespace()
        .query()
        .group_by(|w: &&str| w.to_lowercase())
        .select(|g| (g.key().clone(), g.count()))
        .order_by_descending(|p: &(String, usize)| p.1)
        .then_by(|p: &(String, usize)| p.0.clone())
        .take(4)
        .expect("valid count")
        .to_list()
        .expect("query failed");

    let expected = vec![
        ("a".to_string(), 3),
        ("biscuits,".to_string(), 2),
        ("box".to_string(), 2),
        ("of".to_string(), 2),
    ];
    assert_eq!(top, expected);
}

#[test]
fn test_order_summary_report() {
    #[derive(Debug, Clone)]
    struct Order {
        customer: &'static str,
        amount: u32,
    }
    let orders = vec![
        Order { customer: "zoe", amount: 40 },
        Order { customer: "ann", amount: 15 },
        Order { customer: "zoe", amount: 5 },
        Order { customer: "bob", amount: 60 },
        Order { customer: "ann", amount: 45 },
    ];
    let customers = vec![("ann", "Oslo"), ("bob", "Lima"), ("zoe", "Kyiv")];

    let report = orders
        .query()
        .group_by(|o: &Order| o.customer)
        .select(|g| (*g.key(), g.iter().map(|o| o.amount).sum::<u32>()))
        .join_with(
            customers,
            |total: &(&'static str, u32)| total.0,
            |c: &(&'static str, &'static str)| c.0,
            |total: &(&'static str, u32), c: &(&'static str, &'static str)| {
                format!("{}@{}={}", total.0, c.1, total.1)
            },
        )
        .order()
        .to_list()
        .expect("query failed");

    assert_eq!(report, vec!["ann@Oslo=60", "bob@Lima=60", "zoe@Kyiv=45"]);
}

#[test]
fn test_explain_reports_buffering_stages() {
    let q = (1..=10)
        .query()
        .where_by(|x| x % 3 != 0)
        .group_by(|x: &i32| x % 2)
        .select(|g| g.count())
        .order();
    let plan = q.explain();
    assert_eq!(plan.buffering_ops(), vec!["order_by", "group_by"]);
    assert!(!plan.is_streaming());
    let rendered = plan.to_string();
    assert!(rendered.starts_with("order_by"));
    assert!(rendered.ends_with("source"));
    assert_eq!(q.to_list().expect("query failed"), vec![3, 4]);
}

#[test]
fn test_config_from_environment_defaults() {
    // Unset variables fall back to defaults.
    std::env::remove_var("SEQLINQ_DUPLICATE_KEYS");
    std::env::remove_var("SEQLINQ_MAX_BUFFERED");
    let config = QueryConfig::from_env();
    assert_eq!(config, QueryConfig::default());
    assert_eq!(config.duplicate_keys, DuplicateKeyPolicy::Reject);
    assert_eq!(config.max_buffered, None);
}
