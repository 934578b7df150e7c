//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve stylesheet aliases and print the HTML to include them
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, default_value = csslink::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print resolution details
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Report errors as warnings and keep going
    #[arg(short, long, global = true)]
    pub warn_only: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the href of an alias
    Href {
        alias: String,

        #[command(flatten)]
        overrides: ConfigArgs,
    },

    /// Print `<link>` markup
    #[command(visible_alias = "l")]
    Link {
        #[arg(required = true, value_name = "ALIAS")]
        aliases: Vec<String>,

        #[command(flatten)]
        overrides: ConfigArgs,
    },

    /// Print `<style>` markup with the file contents inlined
    #[command(visible_alias = "i")]
    Inline {
        #[arg(required = true, value_name = "ALIAS")]
        aliases: Vec<String>,
    },

    /// Inline small stylesheets and link (or preload) the rest
    #[command(visible_alias = "r")]
    Render {
        #[arg(required = true, value_name = "ALIAS")]
        aliases: Vec<String>,

        /// Preload large stylesheets with a noscript and script fallback
        #[arg(short, long)]
        defer: bool,

        #[command(flatten)]
        overrides: ConfigArgs,
    },

    /// Validate the config and list resolved aliases
    #[command(visible_alias = "c")]
    Check,
}

/// Config values that can be overridden per invocation.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Cache-busting token appended to local hrefs
    #[arg(long)]
    pub asset_id: Option<String>,

    /// Largest file size (bytes) still inlined
    #[arg(long)]
    pub inline_max: Option<u64>,

    /// Use (or ignore) configured CDN links
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub cdn: Option<bool>,
}
