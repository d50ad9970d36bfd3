//! Excerpt subcommand handlers for ACC.
//!
//! Every change goes through the [`Router`] so the CLI sees exactly the
//! replies a browser surface would.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use tracing::info;

use acc_anchor::{
    CandidateSelectors, Encoder, HtmlPage, Page, enumerate_candidates, is_user_message, link_for,
};
use acc_config::Config;
use acc_core::{CaptureAgent, Router};
use acc_protocols::{EntryStore, Request, Response, SavedExcerpt};
use acc_store_sqlite::SqliteEntryStore;

use crate::cli::{OutputFormat, SaveArgs};

const PREVIEW_CHARS: usize = 48;

/// Open the configured store behind a router.
pub(crate) async fn open_router(config: &Config) -> anyhow::Result<Arc<Router>> {
    let store = SqliteEntryStore::from_config(&config.store)
        .await
        .with_context(|| format!("failed to open store at {}", config.store.path))?;
    Ok(Arc::new(Router::new(Arc::new(store))))
}

pub(crate) fn selectors(config: &Config) -> anyhow::Result<Arc<CandidateSelectors>> {
    let selectors = CandidateSelectors::new(config.selectors.candidates.iter().cloned())?;
    Ok(Arc::new(selectors))
}

pub(crate) fn load_page(path: &Path) -> anyhow::Result<HtmlPage> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read page {}", path.display()))?;
    Ok(HtmlPage::parse(source))
}

/// Turn an error reply into an error.
fn accepted(response: Response) -> anyhow::Result<Response> {
    if response.ok {
        Ok(response)
    } else {
        Err(anyhow!(
            response.error.unwrap_or_else(|| "request failed".to_string())
        ))
    }
}

fn preview(content: &str) -> String {
    let flat = acc_anchor::plain_text(content)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS).collect();
        format!("{cut}…")
    } else {
        flat
    }
}

/// List the page's candidates with the rank `save --node-index` expects.
pub(crate) fn handle_nodes(config: &Config, page_path: &Path) -> anyhow::Result<()> {
    let page = load_page(page_path)?;
    let selectors = selectors(config)?;
    let candidates = enumerate_candidates(&page, &selectors);

    if candidates.is_empty() {
        println!("No message nodes found.");
        return Ok(());
    }

    println!("{:<6} {:<6} {:<40} {}", "RANK", "USER", "NODE", "PREVIEW");
    println!("{}", "-".repeat(100));
    for (rank, node) in candidates.iter().enumerate() {
        let user = if is_user_message(&page, *node) { "yes" } else { "-" };
        let content = page.inner_html(*node).unwrap_or_default();
        println!(
            "{:<6} {:<6} {:<40} {}",
            rank,
            user,
            page.describe(*node),
            preview(&content)
        );
    }
    Ok(())
}

pub(crate) async fn handle_save(config: &Config, args: SaveArgs) -> anyhow::Result<()> {
    let router = open_router(config).await?;
    let agent = CaptureAgent::new(router, Encoder::new(selectors(config)?));

    let mut capture = match (args.node_index, args.selection.as_deref()) {
        (Some(rank), _) => {
            let path = args.page.as_deref().context("--page is required with --node-index")?;
            let page = load_page(path)?;
            let candidates = enumerate_candidates(&page, agent.encoder().selectors());
            let node = *candidates.get(rank).with_context(|| {
                format!("node {rank} not found ({} candidates on page)", candidates.len())
            })?;
            if is_user_message(&page, node) {
                bail!("node {rank} is a user message and cannot be saved");
            }
            agent.encoder().capture_node(&page, node)?
        }
        (None, Some(text)) => agent.encoder().capture_selection(text)?,
        (None, None) => bail!("either --node-index or --selection is required"),
    };
    capture.tags.extend(args.tags);
    capture.title = args.title;

    let fragment = capture.fragment();
    let response = accepted(agent.submit(capture, &args.url).await)?;
    let id = response.id.context("store did not return an id")?;

    info!("Saved {} with anchor {}", id, fragment);
    println!("{id}");
    Ok(())
}

fn print_excerpts(excerpts: &[SavedExcerpt], format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(excerpts)?);
        return Ok(());
    }

    if excerpts.is_empty() {
        println!("No excerpts found.");
        return Ok(());
    }

    println!(
        "{:<36} {:<17} {:<24} {:<10} {}",
        "ID", "SAVED", "TITLE", "ANCHOR", "PREVIEW"
    );
    println!("{}", "-".repeat(120));
    for excerpt in excerpts {
        println!(
            "{:<36} {:<17} {:<24} {:<10} {}",
            excerpt.id,
            excerpt.created_at.format("%Y-%m-%d %H:%M").to_string(),
            excerpt.display_title(),
            excerpt.anchor.kind().as_str(),
            preview(&excerpt.content)
        );
    }
    println!("\nTotal: {} excerpt(s)", excerpts.len());
    Ok(())
}

pub(crate) async fn handle_search(
    config: &Config,
    keyword: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let router = open_router(config).await?;
    let response = accepted(
        router
            .handle(Request::Search {
                keyword: keyword.to_string(),
            })
            .await,
    )?;
    print_excerpts(&response.results.unwrap_or_default(), format)
}

pub(crate) async fn handle_delete(config: &Config, ids: Vec<String>) -> anyhow::Result<()> {
    let router = open_router(config).await?;
    let count = ids.len();
    let request = match <[String; 1]>::try_from(ids) {
        Ok([id]) => Request::DeleteEntry { id },
        Err(ids) => Request::BatchDelete { ids },
    };
    accepted(router.handle(request).await)?;
    println!("Deleted {count} excerpt(s).");
    Ok(())
}

pub(crate) async fn handle_clear(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes {
        bail!("refusing to delete every excerpt without --yes");
    }
    let router = open_router(config).await?;
    accepted(router.handle(Request::ClearAll).await)?;
    println!("All excerpts deleted.");
    Ok(())
}

pub(crate) async fn handle_retitle(
    config: &Config,
    id: String,
    title: Option<String>,
) -> anyhow::Result<()> {
    let router = open_router(config).await?;
    accepted(router.handle(Request::SetTitle { id: id.clone(), title }).await)?;

    let saved = router
        .store()
        .get(&id)
        .await?
        .with_context(|| format!("excerpt {id} disappeared"))?;
    println!("{}", saved.display_title());
    Ok(())
}

pub(crate) async fn handle_link(config: &Config, id: &str) -> anyhow::Result<()> {
    let router = open_router(config).await?;
    let saved = router
        .store()
        .get(id)
        .await?
        .with_context(|| format!("excerpt {id} not found"))?;
    println!("{}", link_for(&saved));
    Ok(())
}
