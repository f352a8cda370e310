use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use orderscope::digest::{self, DeliveryError, Destination};
use orderscope::engine::Engine;
use orderscope::source::{shared, JsonRowsFile};
use orderscope::{args, chunker, dates, render};
use std::cell::Cell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orderscope", version, about = "Order queries and pending reports over spreadsheet exports")]
struct Cli {
    /// Rows file: one JSON array per line, first line is the header row
    #[arg(long = "rows")]
    rows: PathBuf,

    /// Sheet name (maps to a sibling <name>.jsonl file)
    #[arg(long = "sheet")]
    sheet: Option<String>,

    /// Output format: json | text
    #[arg(long = "format", default_value = "json")]
    format: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Look up one order by order id or service code
    Order { key: String },
    /// Search orders by customer name substring
    Search {
        #[arg(required = true)]
        query: Vec<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// List pending orders. Tokens mix freely: branch words, kw:<keyword>,
    /// YYYY-MM, and up to two dates (start, end)
    Pending {
        tokens: Vec<String>,
        #[arg(long, default_value_t = 2000)]
        limit: usize,
    },
    /// Status and category summary. Tokens: branch words and/or YYYY-MM
    /// (defaults to the current month)
    Summary { tokens: Vec<String> },
    /// Pending digest over the last two calendar months
    Digest {
        /// Write digest messages to numbered files in this directory
        /// instead of stdout
        #[arg(long = "out")]
        out: Option<PathBuf>,
        #[arg(long, default_value_t = 5000)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let json = match cli.format.as_str() {
        "json" => true,
        "text" => false,
        other => bail!("unknown format: {other}"),
    };

    let source: &'static JsonRowsFile = shared(&cli.rows);
    let engine = match cli.sheet {
        Some(sheet) => Engine::with_sheet(source, sheet),
        None => Engine::new(source),
    };
    let today = dates::today();

    match cli.cmd {
        Cmd::Order { key } => match engine.find_by_key(&key)? {
            Some(rec) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&rec)?);
                } else {
                    println!("{}", render::format_record(1, &rec, today));
                }
            }
            None => println!("order {key} not found"),
        },
        Cmd::Search { query, limit } => {
            let q = query.join(" ");
            let records = engine.search_by_name(&q, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let blocks: Vec<String> = records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| render::format_record(i + 1, r, today))
                    .collect();
                let header = format!("Search: {q}\nmatches: {}", records.len());
                for chunk in chunker::chunk_blocks(Some(&header), &blocks, chunker::DEFAULT_BUDGET)
                {
                    println!("{chunk}\n");
                }
            }
        }
        Cmd::Pending { tokens, limit } => {
            let spec = args::classify_tokens(&tokens, today);
            let records = engine.list_pending(&spec, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                let blocks: Vec<String> = records
                    .iter()
                    .enumerate()
                    .map(|(i, r)| render::format_record(i + 1, r, today))
                    .collect();
                let header = format!("{}\ntotal: {}", render::pending_header(&spec), records.len());
                for chunk in chunker::chunk_blocks(Some(&header), &blocks, chunker::DEFAULT_BUDGET)
                {
                    println!("{chunk}\n");
                }
            }
        }
        Cmd::Summary { tokens } => {
            let (branch, year_month) = args::classify_summary_tokens(&tokens);
            let (year, month) = year_month.unwrap_or((today.year(), today.month()));
            let (start, end) = dates::month_range(year, month)
                .with_context(|| format!("invalid month: {year}-{month:02}"))?;
            let summary = engine.summarize(branch.as_deref(), Some(start), Some(end))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                let title = format!(
                    "SUMMARY {year}-{month:02}\nbranch: {}\nperiod: {start} to {end}\n",
                    branch.as_deref().unwrap_or("ALL")
                );
                println!("{}", render::summary_text(&title, &summary));
            }
        }
        Cmd::Digest { out, limit } => {
            let reports = match out {
                Some(dir) => {
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("creating {}", dir.display()))?;
                    let dest = FileDestination::new(dir);
                    digest::run_digest(&engine, &[&dest], today, limit)
                }
                None => digest::run_digest(&engine, &[&StdoutDestination], today, limit),
            };
            for r in reports {
                eprintln!("{}: sent {}, failed {}", r.destination, r.sent, r.failed);
            }
        }
    }
    Ok(())
}

struct StdoutDestination;

impl Destination for StdoutDestination {
    fn name(&self) -> &str {
        "stdout"
    }

    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        println!("{text}\n");
        Ok(())
    }
}

struct FileDestination {
    dir: PathBuf,
    counter: Cell<usize>,
}

impl FileDestination {
    fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            counter: Cell::new(0),
        }
    }
}

impl Destination for FileDestination {
    fn name(&self) -> &str {
        "files"
    }

    fn deliver(&self, text: &str) -> Result<(), DeliveryError> {
        let n = self.counter.get() + 1;
        self.counter.set(n);
        let path = self.dir.join(format!("digest-{n:03}.txt"));
        std::fs::write(&path, text).map_err(|e| DeliveryError {
            destination: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
