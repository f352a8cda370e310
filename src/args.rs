use crate::dates;
use crate::filter::FilterSpec;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_YEAR_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})[-/](\d{2})$").unwrap());

fn parse_year_month(token: &str) -> Option<(i32, u32)> {
    let c = RE_YEAR_MONTH.captures(token)?;
    Some((c[1].parse().ok()?, c[2].parse().ok()?))
}

/// Classify a free-text token sequence into a filter spec. One greedy
/// left-to-right pass; per token the first matching rule wins:
/// 1. `YYYY-MM` / `YYYY/MM` captures the year-month (last occurrence wins)
/// 2. a `kw:` prefix (case-insensitive) captures the keyword (last wins)
/// 3. a full date fills the start slot, then the end slot; further dates
///    fall through to the branch tokens
/// 4. anything else is a branch token
/// Afterwards a lone start date gets `today` as its end, an inverted range
/// is swapped, and the branch tokens join into one space-separated name.
pub fn classify_tokens(tokens: &[String], today: NaiveDate) -> FilterSpec {
    let mut spec = FilterSpec::default();
    let mut branch_tokens: Vec<&str> = Vec::new();

    for raw in tokens {
        let tok = raw.trim();
        if tok.is_empty() {
            continue;
        }
        if let Some(ym) = parse_year_month(tok) {
            spec.year_month = Some(ym);
            continue;
        }
        if let Some(prefix) = tok.get(..3) {
            if prefix.eq_ignore_ascii_case("kw:") {
                spec.keyword = Some(tok[3..].trim().to_string());
                continue;
            }
        }
        if let Some(d) = dates::parse_date(tok) {
            if spec.date_start.is_none() {
                spec.date_start = Some(d);
            } else if spec.date_end.is_none() {
                spec.date_end = Some(d);
            } else {
                branch_tokens.push(tok);
            }
            continue;
        }
        branch_tokens.push(tok);
    }

    if spec.date_start.is_some() && spec.date_end.is_none() {
        spec.date_end = Some(today);
    }
    if let (Some(s), Some(e)) = (spec.date_start, spec.date_end) {
        if e < s {
            spec.date_start = Some(e);
            spec.date_end = Some(s);
        }
    }
    if !branch_tokens.is_empty() {
        spec.branch = Some(branch_tokens.join(" "));
    }
    spec
}

/// Token rule for the summary command: a year-month token selects the month
/// (last wins), everything else is part of the branch name.
pub fn classify_summary_tokens(tokens: &[String]) -> (Option<String>, Option<(i32, u32)>) {
    let mut branch_tokens: Vec<&str> = Vec::new();
    let mut year_month = None;
    for raw in tokens {
        let tok = raw.trim();
        if tok.is_empty() {
            continue;
        }
        if let Some(ym) = parse_year_month(tok) {
            year_month = Some(ym);
        } else {
            branch_tokens.push(tok);
        }
    }
    let branch = if branch_tokens.is_empty() {
        None
    } else {
        Some(branch_tokens.join(" "))
    };
    (branch, year_month)
}
