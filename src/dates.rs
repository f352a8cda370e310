use chrono::{FixedOffset, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Spreadsheet placeholder artifacts (epoch zero, serial 0) parse to years
/// before this and are treated as absent.
const MIN_YEAR: i32 = 1971;

// All "today" computations use one fixed civil timezone (UTC+7).
const TZ_OFFSET_SECS: i32 = 7 * 3600;

pub fn today() -> NaiveDate {
    let tz = FixedOffset::east_opt(TZ_OFFSET_SECS).unwrap();
    Utc::now().with_timezone(&tz).date_naive()
}

static RE_YMD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})$").unwrap());
static RE_DMY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[-/.](\d{1,2})[-/.](\d{2}|\d{4})$").unwrap());
static RE_D_MON_Y: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[\s.,/-]+([A-Za-z]+)[\s.,/-]+(\d{2}|\d{4})$").unwrap());
static RE_MON_D_Y: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)[\s.,/-]+(\d{1,2})[\s.,/-]+(\d{2}|\d{4})$").unwrap());

/// Parse one date cell into a calendar date, or `None` for anything empty,
/// placeholder-like, implausibly old, or unparseable. Numeric forms that are
/// ambiguous between day-first and month-first read day-first.
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    if s.is_empty() || s == "-" || s == "0" {
        return None;
    }
    if let Some(d) = parse_full(s) {
        return Some(d);
    }
    // Spreadsheet exports often append a time of day after the date.
    let head = s.split_whitespace().next()?;
    if head.len() < s.len() {
        parse_full(head)
    } else {
        None
    }
}

fn parse_full(s: &str) -> Option<NaiveDate> {
    if let Some(c) = RE_YMD.captures(s) {
        return mk_date(int(&c, 1), int(&c, 2) as u32, int(&c, 3) as u32);
    }
    if let Some(c) = RE_DMY.captures(s) {
        let a = int(&c, 1) as u32;
        let b = int(&c, 2) as u32;
        let y = expand_year(int(&c, 3));
        // day-first; fall back to month-first only when day-first is impossible
        return mk_date(y, b, a).or_else(|| mk_date(y, a, b));
    }
    if let Some(c) = RE_D_MON_Y.captures(s) {
        let day = int(&c, 1) as u32;
        let month = month_from_name(c.get(2)?.as_str())?;
        return mk_date(expand_year(int(&c, 3)), month, day);
    }
    if let Some(c) = RE_MON_D_Y.captures(s) {
        let month = month_from_name(c.get(1)?.as_str())?;
        let day = int(&c, 2) as u32;
        return mk_date(expand_year(int(&c, 3)), month, day);
    }
    None
}

fn int(c: &regex::Captures, i: usize) -> i32 {
    c.get(i).and_then(|m| m.as_str().parse().ok()).unwrap_or(0)
}

// Two-digit years pivot at 1970..=2069.
fn expand_year(y: i32) -> i32 {
    match y {
        0..=69 => 2000 + y,
        70..=99 => 1900 + y,
        _ => y,
    }
}

fn mk_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if year < MIN_YEAR {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

fn month_from_name(token: &str) -> Option<u32> {
    let t = token.to_lowercase();
    if t.len() < 3 {
        return None;
    }
    for (i, name) in MONTHS.iter().enumerate() {
        if t == name[..3] || name.starts_with(t.as_str()) {
            return Some(i as u32 + 1);
        }
    }
    None
}

/// First-to-last-day range of a calendar month. `None` for an invalid month.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }?;
    Some((start, next.pred_opt()?))
}

/// Inclusive range check. An absent date fails any active bound.
pub fn within(d: Option<NaiveDate>, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(s) = start {
        match d {
            Some(d) if d >= s => {}
            _ => return false,
        }
    }
    if let Some(e) = end {
        match d {
            Some(d) if d <= e => {}
            _ => return false,
        }
    }
    true
}
