//! Locate subcommand handler for ACC.

use std::path::Path;
use std::sync::Arc;

use anyhow::bail;
use parking_lot::Mutex;

use acc_anchor::{HtmlPage, Outcome, Page, Resolution, Resolver};
use acc_config::{Config, ResolverConfig};

use crate::cmd_store::{load_page, selectors};

/// Fragment part of a link, or the input itself when it has none.
fn fragment_of(input: &str) -> &str {
    input.find('#').map_or(input, |at| &input[at..])
}

/// Resolver settings for a page read once from disk.
///
/// Nothing re-renders a file, so a miss on the first lookup is final.
fn single_pass(config: &ResolverConfig) -> ResolverConfig {
    ResolverConfig {
        id_attempts: 1,
        index_attempts: 1,
        ..config.clone()
    }
}

async fn locate(
    config: &Config,
    page: HtmlPage,
    fragment: &str,
) -> anyhow::Result<(Resolution, Arc<Mutex<HtmlPage>>)> {
    let page = Arc::new(Mutex::new(page));
    let resolver = Resolver::new(page.clone(), selectors(config)?, &single_pass(&config.resolver));
    let resolution = resolver.resolve(fragment_of(fragment)).await;
    Ok((resolution, page))
}

pub(crate) async fn handle_locate(
    config: &Config,
    page_path: &Path,
    fragment: &str,
) -> anyhow::Result<()> {
    let (resolution, page) = locate(config, load_page(page_path)?, fragment).await?;

    let strategy = resolution
        .strategy
        .map_or_else(|| "-".to_string(), |s| s.to_string());
    println!("{:<12} {:?}", "OUTCOME", resolution.outcome);
    println!("{:<12} {}", "STRATEGY", strategy);
    println!("{:<12} {}", "ATTEMPTS", resolution.attempts);

    if let Some(target) = resolution.target {
        let page = page.lock();
        println!("{:<12} {}", "NODE", page.describe(target));
        if let Some(style) = page.inline_style(target) {
            println!("{:<12} {}", "STYLE", style);
        }
    }

    match resolution.outcome {
        Outcome::Found => Ok(()),
        Outcome::Malformed(reason) => bail!("malformed anchor: {reason}"),
        other => bail!("anchor not located ({other:?})"),
    }
}
