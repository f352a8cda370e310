/// Message size budget, in characters, that the chat transports tolerate.
pub const DEFAULT_BUDGET: usize = 3500;

const SEPARATOR: &str = "\n\n";

/// Greedily pack pre-rendered record blocks into chunks of at most `budget`
/// characters (counted as chars, not bytes), joining blocks inside a chunk
/// with a blank line. An optional header leads the first chunk and counts
/// against its budget. A block is never split: one block longer than the
/// budget becomes its own oversized chunk.
pub fn chunk_blocks(header: Option<&str>, blocks: &[String], budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buf = header.unwrap_or("").to_string();
    let mut buf_len = buf.chars().count();
    for block in blocks {
        let block_len = block.chars().count();
        if buf.is_empty() {
            buf = block.clone();
            buf_len = block_len;
        } else if buf_len + SEPARATOR.len() + block_len > budget {
            chunks.push(std::mem::take(&mut buf));
            buf = block.clone();
            buf_len = block_len;
        } else {
            buf.push_str(SEPARATOR);
            buf.push_str(block);
            buf_len += SEPARATOR.len() + block_len;
        }
    }
    if !buf.is_empty() {
        chunks.push(buf);
    }
    chunks
}
