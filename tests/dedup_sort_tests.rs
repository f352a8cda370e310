use chrono::NaiveDate;
use orderscope::record::{dedup_and_sort, Record};

fn rec(order_id: &str, service_code: &str, date: Option<(i32, u32, u32)>, name: &str) -> Record {
    Record {
        order_id: order_id.to_string(),
        service_code: service_code.to_string(),
        customer_name: name.to_string(),
        status: "Open".to_string(),
        category: "MO".to_string(),
        order_date: date.map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap()),
        order_date_raw: String::new(),
        last_updated_raw: String::new(),
        branch: None,
    }
}

#[test]
fn first_occurrence_wins_on_composite_key() {
    let out = dedup_and_sort(vec![
        rec("A1", "S1", Some((2024, 1, 5)), "first"),
        rec("A1", "S1", Some((2024, 1, 5)), "second"),
        rec("A1", "S2", Some((2024, 1, 5)), "different sc"),
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].customer_name, "first");
    assert_eq!(out[1].customer_name, "different sc");
}

#[test]
fn sorts_ascending_with_absent_dates_first() {
    let out = dedup_and_sort(vec![
        rec("A1", "S1", Some((2024, 3, 1)), "march"),
        rec("A2", "S2", None, "undated"),
        rec("A3", "S3", Some((2024, 1, 1)), "january"),
    ]);
    let names: Vec<&str> = out.iter().map(|r| r.customer_name.as_str()).collect();
    assert_eq!(names, vec!["undated", "january", "march"]);
}

#[test]
fn equal_dates_keep_input_order() {
    let out = dedup_and_sort(vec![
        rec("A1", "S1", Some((2024, 1, 5)), "one"),
        rec("A2", "S2", Some((2024, 1, 5)), "two"),
        rec("A3", "S3", Some((2024, 1, 5)), "three"),
    ]);
    let names: Vec<&str> = out.iter().map(|r| r.customer_name.as_str()).collect();
    assert_eq!(names, vec!["one", "two", "three"]);
}

#[test]
fn dedup_and_sort_is_idempotent() {
    let input = vec![
        rec("A1", "S1", Some((2024, 3, 1)), "a"),
        rec("A2", "S2", None, "b"),
        rec("A1", "S1", Some((2024, 3, 1)), "dup"),
        rec("A3", "S3", Some((2024, 1, 1)), "c"),
    ];
    let once = dedup_and_sort(input);
    let twice = dedup_and_sort(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn empty_identity_fields_still_dedup() {
    let out = dedup_and_sort(vec![
        rec("", "", None, "first blank"),
        rec("", "", None, "second blank"),
    ]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].customer_name, "first blank");
}
