pub mod schema;
pub mod dates;
pub mod status;
pub mod record;
pub mod filter;
pub mod args;
pub mod summary;
pub mod chunker;
pub mod source;
pub mod engine;
pub mod render;
pub mod digest;
