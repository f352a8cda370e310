use crate::dates;
use crate::filter::FilterSpec;
use crate::record::Record;
use crate::summary::Summary;
use chrono::NaiveDate;
use itertools::Itertools;

/// Calendar-day delta rendered as "Xd", or "-" when either side is absent
/// or the delta is negative.
pub fn days_label(from: Option<NaiveDate>, to: NaiveDate) -> String {
    match from {
        Some(a) => {
            let d = (to - a).num_days();
            if d >= 0 {
                format!("{d}d")
            } else {
                "-".to_string()
            }
        }
        None => "-".to_string(),
    }
}

/// One record as a plain-text block. Age counts from the order date, stale
/// from the last update (falling back to the order date).
pub fn format_record(index: usize, rec: &Record, today: NaiveDate) -> String {
    let last_updated = if rec.last_updated_raw.trim().is_empty() {
        "-"
    } else {
        rec.last_updated_raw.as_str()
    };
    let age = days_label(rec.order_date, today);
    let updated = dates::parse_date(&rec.last_updated_raw).or(rec.order_date);
    let stale = days_label(updated, today);
    format!(
        "{index}. {name}\n  \
         order id: {order_id} | service code: {service_code}\n  \
         status: {status} | category: {category}\n  \
         ordered: {ordered} | last updated: {last_updated}\n  \
         age: {age} | stale: {stale}",
        name = rec.customer_name,
        order_id = rec.order_id,
        service_code = rec.service_code,
        status = rec.status,
        category = rec.category,
        ordered = if rec.order_date_raw.trim().is_empty() {
            "-"
        } else {
            rec.order_date_raw.as_str()
        },
    )
}

/// Header block for a pending listing, naming only the active filters.
pub fn pending_header(spec: &FilterSpec) -> String {
    let mut out = String::from("Pending orders");
    if let Some(branch) = spec.branch.as_deref() {
        out.push_str(&format!("\nbranch: {branch}"));
    }
    if let Some(kw) = spec.keyword.as_deref().filter(|k| !k.is_empty()) {
        out.push_str(&format!("\nkeyword: {kw}"));
    }
    if let Some((y, m)) = spec.year_month {
        out.push_str(&format!("\nmonth: {y}-{m:02}"));
    } else if spec.date_start.is_some() || spec.date_end.is_some() {
        let fmt = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        out.push_str(&format!(
            "\nperiod: {} to {}",
            fmt(spec.date_start),
            fmt(spec.date_end)
        ));
    }
    out
}

/// Summary report: every status with its count, the fixed-category totals
/// on one line, and the grand total.
pub fn summary_text(title: &str, summary: &Summary) -> String {
    let mut lines = vec![title.to_string()];
    for (status, n) in &summary.per_status {
        lines.push(format!("{status}: {n}"));
    }
    let categories = summary
        .totals_by_category
        .iter()
        .map(|(c, n)| format!("{c}: {n}"))
        .join(" | ");
    lines.push(format!("\nTotals by category\n{categories}"));
    lines.push(format!("\nTOTAL: {}", summary.grand_total));
    lines.join("\n")
}
