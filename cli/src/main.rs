mod args;
mod render;

use std::io::Write;

use anyhow::Context;
use args::Args;
use clap::Parser;
use learnpath_retrieval::{Level, Query, RetrievalService};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout only carries rendered paths.
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.retrieval_config()?;

    info!("Starting learnpath v{}", env!("CARGO_PKG_VERSION"));
    let service = RetrievalService::start(config)
        .await
        .context("failed to start retrieval service")?;
    let stats = service.stats();
    info!(
        "Indexed {} documents ({} dims, {} metric, model {})",
        stats.indexed, stats.dimension, stats.metric, stats.model
    );

    let mut stdout = std::io::stdout();
    if args.interactive {
        let stdin = BufReader::new(tokio::io::stdin());
        run_interactive(&service, args.level, stdin, &mut stdout).await
    } else {
        answer(&service, &Query::new(args.query, args.level), &mut stdout).await
    }
}

/// `info` unless `RUST_LOG` says otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

async fn answer(
    service: &RetrievalService,
    query: &Query,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let outcome = service.recommend(query).await?;
    write!(out, "{}", render::render(&outcome))?;
    Ok(())
}

/// A line read in interactive mode.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Blank,
    SetLevel(Level),
    BadCommand(String),
    Query(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Blank;
    }
    match line.strip_prefix(":level") {
        Some(rest) => match rest.parse() {
            Ok(level) => Input::SetLevel(level),
            Err(e) => Input::BadCommand(e),
        },
        None => Input::Query(line),
    }
}

/// Answer one query per line until EOF. A failed query is reported and the
/// loop moves on to the next line.
async fn run_interactive<R, W>(
    service: &RetrievalService,
    mut level: Level,
    input: R,
    out: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(
        out,
        "Level: {level}. Type a question, `:level <name>` to switch, Ctrl+D to exit."
    )?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Blank => {}
            Input::SetLevel(new_level) => {
                level = new_level;
                writeln!(out, "Level set to {level}.")?;
            }
            Input::BadCommand(message) => writeln!(out, "{message}")?,
            Input::Query(text) => {
                if let Err(e) = answer(service, &Query::new(text, level), out).await {
                    error!("Query failed: {e:#}");
                    writeln!(out, "Error: {e}")?;
                }
            }
        }
    }

    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnpath_retrieval::{EmbeddingConfig, ProviderKind, RetrievalConfig};
    use pretty_assertions::assert_eq;

    async fn hashing_service() -> RetrievalService {
        let config = RetrievalConfig::default()
            .with_embedding(EmbeddingConfig::new(ProviderKind::Hashing));
        RetrievalService::start(config).await.unwrap()
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Blank);
        assert_eq!(
            parse_input(":level intermediate"),
            Input::SetLevel(Level::Intermediate)
        );
        assert_eq!(
            parse_input("  What is a loop?  "),
            Input::Query("What is a loop?")
        );
        assert!(matches!(parse_input(":level expert"), Input::BadCommand(_)));
    }

    #[test]
    fn test_log_filter_defaults_to_info() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(log_filter(Some("")).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_log_filter_honours_rust_log() {
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
    }

    #[tokio::test]
    async fn test_interactive_session_survives_failed_query() {
        let service = hashing_service().await;
        let too_long = "word ".repeat(300);
        let input =
            format!(":level expert\n{too_long}\n\n:level advanced\nblueprint for objects\n");

        let mut out = Vec::new();
        run_interactive(&service, Level::Beginner, input.as_bytes(), &mut out)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("unknown level `expert`"), "{out}");
        assert!(out.contains("Error: embedding error: text too long"), "{out}");
        assert!(out.contains("Level set to Advanced."), "{out}");
        assert!(
            out.contains("Step 1: Python Classes (Level: Advanced)"),
            "{out}"
        );
        assert!(out.ends_with("> \n"), "{out}");
    }

    #[tokio::test]
    async fn test_beginner_answer_leaves_out_advanced_topics() {
        let service = hashing_service().await;
        let mut out = Vec::new();
        let query = Query::new("blueprint for objects", Level::Beginner);
        answer(&service, &query, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(!out.contains("Python Classes"), "{out}");
    }
}
