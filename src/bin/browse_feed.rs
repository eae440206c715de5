//! フィードをターミナルで読み進める
//!
//! Usage: browse_feed [--all] [--max-pages N]

use anyhow::{Context, Result};
use dotenv::dotenv;
use feed_core::Post;
use fellowship_feeds::state::AppConfig;
use std::env;
use timeline::{ApiClient, FeedController, Interstitial, LoadOutcome, ReflectionChoice};

struct Options {
    load_all: bool,
    max_pages: usize,
}

fn parse_args() -> Result<Options> {
    let mut options = Options {
        load_all: false,
        max_pages: usize::MAX,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--all" => options.load_all = true,
            "--max-pages" => {
                let value = args.next().context("--max-pages needs a value")?;
                options.max_pages = value.parse().context("--max-pages must be a number")?;
            }
            other => anyhow::bail!("Unknown argument: {}", other),
        }
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    fellowship_feeds::init_tracing();

    let options = parse_args()?;
    let config = AppConfig::from_env();
    let api = ApiClient::new(fellowship_feeds::build_http_client()?, config.feed_api_url);

    let mut controller = FeedController::new();

    if options.load_all {
        controller.load_all(&api).await?;
    } else {
        controller.load_first_page(&api).await?;
        while controller.has_more() && controller.page() < options.max_pages {
            match controller.load_more(&api).await {
                Ok(LoadOutcome::Skipped) => break,
                Ok(_) => {}
                Err(e) => {
                    // Already-loaded posts stay valid; stop paging and show them.
                    tracing::error!("Stopped paging: {:#}", e);
                    break;
                }
            }
        }
    }

    for line in render_timeline(&mut controller) {
        println!("{}", line);
    }

    println!(
        "{} posts, page {}, has_more={}",
        controller.timeline().len(),
        controller.page(),
        controller.has_more()
    );

    Ok(())
}

/// タイムラインを表示行にし、閲覧件数に応じた案内を差し込む。
/// 「ひと休み」は続行として解決する。
fn render_timeline(controller: &mut FeedController) -> Vec<String> {
    let rows: Vec<Row> = controller.timeline().iter().map(Row::from).collect();
    let mut lines = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        lines.push(format!("[{:>4}] #{} ({}) {}", index + 1, row.id, row.kind, row.first_line));
        if let Some(reference) = &row.reference {
            lines.push(format!("       📖 {}", reference));
        }

        controller.record_viewed(index + 1);
        match controller.interstitial() {
            Some(Interstitial::ReflectionBreak) => {
                lines.push("------ time for a short reflection break ------".to_string());
                controller.resolve_reflection_break(ReflectionChoice::Continue);
            }
            Some(Interstitial::Milestone { count }) => {
                lines.push(format!("------ {} posts read ------", count));
            }
            None => {}
        }
    }

    lines
}

/// 表示用に投稿から取り出した 1 行分
struct Row {
    id: i64,
    kind: &'static str,
    first_line: String,
    reference: Option<String>,
}

impl From<&Post> for Row {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            kind: post.kind.as_str(),
            first_line: post.content.lines().next().unwrap_or_default().to_string(),
            reference: post.soap_data.as_ref().map(|soap| soap.scripture_reference.clone()),
        }
    }
}
