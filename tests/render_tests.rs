use chrono::NaiveDate;
use orderscope::filter::FilterSpec;
use orderscope::record::Record;
use orderscope::render::{days_label, format_record, pending_header, summary_text};
use orderscope::summary::summarize;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn sample_record() -> Record {
    Record {
        order_id: "A1".to_string(),
        service_code: "S1".to_string(),
        customer_name: "Budi".to_string(),
        status: "Open".to_string(),
        category: "MO".to_string(),
        order_date: Some(d(2025, 8, 15)),
        order_date_raw: "2025-08-15".to_string(),
        last_updated_raw: "2025-08-20".to_string(),
        branch: Some("JAMBI".to_string()),
    }
}

#[test]
fn days_label_formats_deltas() {
    let today = d(2025, 8, 25);
    assert_eq!(days_label(Some(d(2025, 8, 15)), today), "10d");
    assert_eq!(days_label(Some(today), today), "0d");
    assert_eq!(days_label(Some(d(2025, 9, 1)), today), "-");
    assert_eq!(days_label(None, today), "-");
}

#[test]
fn record_block_carries_age_and_stale() {
    let text = format_record(3, &sample_record(), d(2025, 8, 25));
    assert!(text.starts_with("3. Budi\n"));
    assert!(text.contains("order id: A1 | service code: S1"));
    assert!(text.contains("status: Open | category: MO"));
    assert!(text.contains("ordered: 2025-08-15 | last updated: 2025-08-20"));
    assert!(text.contains("age: 10d | stale: 5d"));
}

#[test]
fn missing_dates_render_as_dashes() {
    let mut rec = sample_record();
    rec.order_date = None;
    rec.order_date_raw = String::new();
    rec.last_updated_raw = String::new();
    let text = format_record(1, &rec, d(2025, 8, 25));
    assert!(text.contains("ordered: - | last updated: -"));
    assert!(text.contains("age: - | stale: -"));
}

#[test]
fn stale_falls_back_to_the_order_date() {
    let mut rec = sample_record();
    rec.last_updated_raw = String::new();
    let text = format_record(1, &rec, d(2025, 8, 25));
    assert!(text.contains("age: 10d | stale: 10d"));
}

#[test]
fn pending_header_names_only_active_filters() {
    assert_eq!(pending_header(&FilterSpec::default()), "Pending orders");

    let spec = FilterSpec {
        branch: Some("MUARO JAMBI".to_string()),
        keyword: Some("indihome".to_string()),
        year_month: Some((2025, 8)),
        ..FilterSpec::default()
    };
    let text = pending_header(&spec);
    assert!(text.contains("branch: MUARO JAMBI"));
    assert!(text.contains("keyword: indihome"));
    assert!(text.contains("month: 2025-08"));
    assert!(!text.contains("period:"));

    let spec = FilterSpec {
        date_start: Some(d(2025, 7, 1)),
        date_end: Some(d(2025, 8, 15)),
        ..FilterSpec::default()
    };
    assert!(pending_header(&spec).contains("period: 2025-07-01 to 2025-08-15"));
}

#[test]
fn summary_text_lists_statuses_categories_and_total() {
    let rows: Vec<Vec<String>> = [
        ["branch", "status do", "jenis order", "order_date"],
        ["JAMBI", "Open", "MO", "2025-08-01"],
        ["JAMBI", "Open", "MO", "2025-08-02"],
        ["JAMBI", "Complete", "xyz", "2025-08-03"],
    ]
    .iter()
    .map(|r| r.iter().map(|c| c.to_string()).collect())
    .collect();
    let summary = summarize(&rows, None, None, None).unwrap();

    let text = summary_text("SUMMARY 2025-08", &summary);
    assert!(text.starts_with("SUMMARY 2025-08\nOpen: 2\nComplete: 1"));
    assert!(text.contains("MO: 2 | DO: 0"));
    assert!(text.contains("TOTAL: 3"));
}
