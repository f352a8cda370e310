use chrono::NaiveDate;
use orderscope::digest::{digest_range, run_digest, DeliveryError, Destination};
use orderscope::engine::Engine;
use orderscope::source::{MemorySource, RowSource, SourceError};
use std::sync::Mutex;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

struct Recorder {
    name: String,
    messages: Mutex<Vec<String>>,
}

impl Recorder {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            messages: Mutex::new(Vec::new()),
        }
    }

    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Destination for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        self.messages.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

struct Broken;

impl Destination for Broken {
    fn name(&self) -> &str {
        "broken"
    }

    fn deliver(&self, _text: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError {
            destination: "broken".to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

struct FailingSource;

impl RowSource for FailingSource {
    fn rows(&self, _sheet: Option<&str>) -> Result<Vec<Vec<String>>, SourceError> {
        Err(SourceError::SheetNotFound("orders".to_string()))
    }
}

fn pending_engine() -> Engine<MemorySource> {
    let rows: Vec<Vec<String>> = [
        ["order_id", "no sc", "status do", "jenis order", "order_date", "customer_name"],
        ["A1", "S1", "Open", "MO", "2025-08-10", "Budi"],
        ["A2", "S2", "Open", "DO", "2025-07-15", "Sari"],
        ["A3", "S3", "Complete", "MO", "2025-08-01", "Tono"],
        ["A4", "S4", "Open", "MO", "2025-05-01", "Rina"],
    ]
    .iter()
    .map(|r| r.iter().map(|c| c.to_string()).collect())
    .collect();
    Engine::new(MemorySource::new(rows))
}

#[test]
fn range_is_first_of_previous_month_through_today() {
    assert_eq!(
        digest_range(d(2025, 8, 25)),
        (d(2025, 7, 1), d(2025, 8, 25))
    );
    // January wraps to December of the previous year
    assert_eq!(
        digest_range(d(2025, 1, 15)),
        (d(2024, 12, 1), d(2025, 1, 15))
    );
}

#[test]
fn digest_delivers_header_then_chunks() {
    let engine = pending_engine();
    let dest = Recorder::new("ops");
    let reports = run_digest(&engine, &[&dest], d(2025, 8, 25), 5000);

    let messages = dest.messages();
    // window excludes the closed A3 and the out-of-range A4
    assert!(messages[0].starts_with("Pending digest\nperiod: 2025-07-01 to 2025-08-25"));
    assert!(messages[0].contains("total: 2"));
    assert_eq!(messages.len(), 2);
    assert!(messages[1].contains("Sari"));
    assert!(messages[1].contains("Budi"));

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].sent, 2);
    assert_eq!(reports[0].failed, 0);
}

#[test]
fn one_broken_destination_does_not_block_the_others() {
    let engine = pending_engine();
    let good = Recorder::new("ops");
    let broken = Broken;
    let reports = run_digest(&engine, &[&broken, &good], d(2025, 8, 25), 5000);

    assert_eq!(good.messages().len(), 2);
    let broken_report = reports.iter().find(|r| r.destination == "broken").unwrap();
    assert_eq!(broken_report.sent, 0);
    assert_eq!(broken_report.failed, 2);
    let good_report = reports.iter().find(|r| r.destination == "ops").unwrap();
    assert_eq!(good_report.failed, 0);
}

#[test]
fn duplicate_destinations_are_delivered_once() {
    let engine = pending_engine();
    let first = Recorder::new("ops");
    let second = Recorder::new("ops");
    run_digest(&engine, &[&first, &second], d(2025, 8, 25), 5000);
    assert_eq!(first.messages().len(), 2);
    assert!(second.messages().is_empty());
}

#[test]
fn source_failure_is_reported_to_every_destination() {
    let engine = Engine::new(FailingSource);
    let a = Recorder::new("a");
    let b = Recorder::new("b");
    let reports = run_digest(&engine, &[&a, &b], d(2025, 8, 25), 5000);

    for dest in [&a, &b] {
        let messages = dest.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("failed to read rows"));
        assert!(messages[0].contains("sheet not found: orders"));
    }
    assert!(reports.iter().all(|r| r.sent == 1 && r.failed == 0));
}
