/// A record is closed when its status denotes completion or cancellation.
/// Prefix match on "complete" covers variants like "Completed (PS)"; the
/// cancel spellings are an exact enumeration, not a stemmer.
pub fn is_closed(status: &str) -> bool {
    let s = status.trim().to_lowercase();
    s.starts_with("complete") || matches!(s.as_str(), "cancel" | "canceled" | "cancelled")
}
