//! CLI definitions for ACC.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// ACC CLI.
#[derive(Parser)]
#[command(name = "acc")]
#[command(about = "Excerpt collector with source re-anchoring")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.acc/config.toml)
    #[arg(short, long, global = true, env = "ACC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List the message nodes of a saved page that can be captured
    Nodes {
        /// HTML file of the page
        #[arg(long)]
        page: PathBuf,
    },

    /// Capture an excerpt from a page and store it
    Save(SaveArgs),

    /// List all stored excerpts, newest first
    List {
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Search excerpts by content, tag or title
    Search {
        keyword: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Delete one or more excerpts
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete every excerpt
    Clear {
        /// Skip the confirmation guard
        #[arg(long)]
        yes: bool,
    },

    /// Set or reset the title of an excerpt
    Retitle {
        id: String,

        /// New title; omit to reset to "Untitled"
        title: Option<String>,
    },

    /// Print the link back to an excerpt's source
    Link { id: String },

    /// Re-locate an anchor on a page and report the outcome
    Locate {
        /// HTML file of the page
        #[arg(long)]
        page: PathBuf,

        /// Fragment (`#acc-…`) or a full link containing one
        fragment: String,
    },
}

#[derive(Args)]
#[command(group = clap::ArgGroup::new("source").required(true).args(["node_index", "selection"]))]
pub(crate) struct SaveArgs {
    /// HTML file of the page (required with --node-index)
    #[arg(long)]
    pub page: Option<PathBuf>,

    /// URL the page was loaded from
    #[arg(long)]
    pub url: String,

    /// Rank of the message among the page's candidates (see `acc nodes`)
    #[arg(long, requires = "page")]
    pub node_index: Option<usize>,

    /// Manually selected text
    #[arg(long)]
    pub selection: Option<String>,

    /// Tag to attach (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Initial title
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Table,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_save_requires_a_source() {
        assert!(Cli::try_parse_from(["acc", "save", "--url", "https://a.example/"]).is_err());
        assert!(
            Cli::try_parse_from([
                "acc",
                "save",
                "--url",
                "https://a.example/",
                "--selection",
                "text",
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_save_node_parses() {
        let cli = Cli::try_parse_from([
            "acc",
            "save",
            "--page",
            "page.html",
            "--url",
            "https://a.example/",
            "--node-index",
            "2",
            "--tag",
            "rust",
            "--tag",
            "async",
        ])
        .unwrap();
        match cli.command {
            Commands::Save(args) => {
                assert_eq!(args.node_index, Some(2));
                assert_eq!(args.tags, vec!["rust", "async"]);
            }
            _ => panic!("expected save"),
        }
    }

    #[test]
    fn test_delete_needs_ids() {
        assert!(Cli::try_parse_from(["acc", "delete"]).is_err());
        assert!(Cli::try_parse_from(["acc", "delete", "a", "b"]).is_ok());
    }
}
