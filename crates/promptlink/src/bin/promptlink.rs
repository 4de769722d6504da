// ABOUTME: CLI binary for the promptlink scraper.
// ABOUTME: Scrapes URLs (given directly or detected in text) and prints prompt blocks or JSON.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use promptlink::{LinkScraper, ScrapeRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "promptlink")]
#[command(about = "Extract prompt-ready content from URLs")]
struct Args {
    /// Output full documents as JSON instead of prompt blocks
    #[arg(long = "json")]
    json_output: bool,

    /// Scan free text from this argument for URLs instead of taking URLs directly
    #[arg(long = "text")]
    text: Option<String>,

    /// Per-fetch timeout in seconds
    #[arg(long = "timeout", default_value_t = 15)]
    timeout_secs: u64,

    /// Bounded fan-out width for the batch
    #[arg(long = "concurrency", default_value_t = 4)]
    concurrency: usize,

    /// Maximum body length in characters before truncation
    #[arg(long = "max-length", default_value_t = 10_000)]
    max_length: usize,

    /// Disable the extraction cache
    #[arg(long = "no-cache")]
    no_cache: bool,

    /// Requester identity recorded with the batch
    #[arg(long = "requester", default_value = "cli")]
    requester: String,

    /// URLs to scrape
    #[arg()]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.text.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --text");
        return ExitCode::from(1);
    }
    if args.text.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --text and positional URLs");
        return ExitCode::from(1);
    }

    let scraper = LinkScraper::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .concurrency(args.concurrency)
        .max_content_length(args.max_length)
        .cache_results(!args.no_cache)
        .build();

    let result = if let Some(text) = &args.text {
        scraper.scrape_text(text, &args.requester).await
    } else {
        scraper
            .scrape_batch(ScrapeRequest::new(args.urls.clone(), &args.requester))
            .await
    };

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(1);
        }
    };

    if args.json_output {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("error serializing result: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        for doc in &result.documents {
            println!("{}", doc.to_prompt_block());
            println!("---");
        }
        eprintln!(
            "{} total, {} succeeded, {} failed",
            result.summary.total, result.summary.succeeded, result.summary.failed
        );
    }

    if result.summary.failed > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
