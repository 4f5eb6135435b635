//! Decoded record feed: JSON lines from a file or stdin.

use anyhow::{Context, Result};
use record_assembler::{Outcome, Record, Session};
use tokio::io::{AsyncRead, BufReader};
use tracing::debug;

/// Counters for one feed run.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeedStats {
    pub accepted: u64,
    pub skipped: u64,
}

/// Stream records from `path` ("-" for stdin) into the session.
///
/// A malformed line is a decoder bug rather than instrument noise, so
/// it fails the run with the offending line number.
pub async fn run(session: &mut Session, path: &str) -> Result<FeedStats> {
    let mut stats = FeedStats::default();
    if path == "-" {
        consume(session, BufReader::new(tokio::io::stdin()), &mut stats).await?;
    } else {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("opening record feed {path}"))?;
        consume(session, BufReader::new(file), &mut stats).await?;
    }
    Ok(stats)
}

async fn consume<R>(
    session: &mut Session,
    reader: BufReader<R>,
    stats: &mut FeedStats,
) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    use tokio::io::AsyncBufReadExt;

    let mut lines = reader.lines();
    let mut line_no = 0u64;
    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record: Record = serde_json::from_str(trimmed)
            .with_context(|| format!("parsing record on line {line_no}"))?;

        match session.process(&record)? {
            Outcome::Accepted => stats.accepted += 1,
            Outcome::Skipped { type_id } => {
                stats.skipped += 1;
                debug!(
                    line = line_no,
                    type_id = %format!("0x{type_id:04X}"),
                    "skipped record"
                );
            }
        }
    }
    Ok(())
}
