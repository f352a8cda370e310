use crate::chunker;
use crate::engine::Engine;
use crate::render;
use crate::source::RowSource;
use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("delivery to {destination} failed: {reason}")]
pub struct DeliveryError {
    pub destination: String,
    pub reason: String,
}

/// One outbound channel for the scheduled digest. Delivery is fire-and-
/// forget per destination: a failure here never blocks the others.
pub trait Destination {
    fn name(&self) -> &str;
    fn deliver(&self, text: &str) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub destination: String,
    pub sent: usize,
    pub failed: usize,
}

/// Digest window: first day of the previous calendar month through today.
pub fn digest_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let (year, month) = if today.month() > 1 {
        (today.year(), today.month() - 1)
    } else {
        (today.year() - 1, 12)
    };
    let start = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today);
    (start, today)
}

/// Build the pending digest for the last two calendar months and deliver it
/// to every destination. Duplicate destination names are delivered once
/// (first occurrence wins). A row-source failure becomes a single failure
/// message delivered to all destinations instead of the report. Individual
/// delivery failures are logged and skipped.
pub fn run_digest<S: RowSource>(
    engine: &Engine<S>,
    destinations: &[&dyn Destination],
    today: NaiveDate,
    limit: usize,
) -> Vec<DeliveryReport> {
    let (start, end) = digest_range(today);

    let mut seen = HashSet::new();
    let targets: Vec<&dyn Destination> = destinations
        .iter()
        .copied()
        .filter(|d| seen.insert(d.name().to_string()))
        .collect();

    let messages = match engine.list_pending_in_range(Some(start), Some(end), limit) {
        Ok(records) => {
            let mut msgs = vec![format!(
                "Pending digest\nperiod: {start} to {end}\ntotal: {}",
                records.len()
            )];
            let blocks: Vec<String> = records
                .iter()
                .enumerate()
                .map(|(i, r)| render::format_record(i + 1, r, today))
                .collect();
            msgs.extend(chunker::chunk_blocks(None, &blocks, chunker::DEFAULT_BUDGET));
            msgs
        }
        Err(e) => vec![format!(
            "Pending digest\nperiod: {start} to {end}\nfailed to read rows: {e}"
        )],
    };

    let mut reports = Vec::new();
    for dest in targets {
        let mut sent = 0;
        let mut failed = 0;
        for msg in &messages {
            match dest.deliver(msg) {
                Ok(()) => sent += 1,
                Err(e) => {
                    failed += 1;
                    log::warn!("digest delivery failed: {e}");
                }
            }
        }
        reports.push(DeliveryReport {
            destination: dest.name().to_string(),
            sent,
            failed,
        });
    }
    reports
}
