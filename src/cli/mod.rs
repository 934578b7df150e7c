//! Command-line interface module.

mod args;

pub use args::{Cli, Commands, ConfigArgs};

use anyhow::{Context, Result, anyhow};
use csslink::config::util::find_config_file;
use csslink::{Asset, StylesheetConfig, Stylesheets, WarnOnly, log};
use std::path::PathBuf;

/// Run the parsed command, printing markup to stdout.
pub fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;
    if let Some(overrides) = cli.command.overrides() {
        apply_overrides(&mut config, overrides);
    }

    let mut builder = Stylesheets::builder(config);
    if cli.warn_only {
        builder = builder.log_sink(WarnOnly);
    }
    let sheets = builder.build()?;

    match &cli.command {
        Commands::Href { alias, .. } => println!("{}", sheets.href(alias)?),
        Commands::Link { aliases, .. } => {
            let html = aliases
                .iter()
                .map(|alias| sheets.link_html(alias))
                .collect::<csslink::Result<Vec<_>>>()?;
            println!("{}", html.concat());
        }
        Commands::Inline { aliases } => {
            let html = aliases
                .iter()
                .map(|alias| sheets.inline_html(alias))
                .collect::<csslink::Result<Vec<_>>>()?;
            println!("{}", html.concat());
        }
        Commands::Render { aliases, defer, .. } => {
            let html = if *defer {
                sheets.deferred_link_html(aliases.as_slice())?
            } else {
                sheets.link_or_inline_html(aliases.as_slice())?
            };
            println!("{html}");
        }
        Commands::Check => check(&sheets)?,
    }
    Ok(())
}

/// Locate, parse and validate the config file.
fn load_config(cli: &Cli) -> Result<StylesheetConfig> {
    let cwd = std::env::current_dir().context("Failed to get current working directory")?;
    let path: PathBuf = find_config_file(&cwd, &cli.config)
        .ok_or_else(|| anyhow!("config file '{}' not found", cli.config.display()))?;
    csslink::debug!("config"; "using {}", path.display());
    Ok(StylesheetConfig::load(&path)?)
}

/// Apply CLI overrides on top of the file config.
fn apply_overrides(config: &mut StylesheetConfig, args: &ConfigArgs) {
    if let Some(id) = &args.asset_id {
        config.asset_id = Some(id.clone());
    }
    if let Some(max) = args.inline_max {
        config.inline_max = max;
    }
    if args.cdn.is_some() {
        config.use_cdn_links = args.cdn;
    }
}

/// Resolve everything and print one line per alias.
fn check(sheets: &Stylesheets) -> Result<()> {
    sheets.check()?;
    let table = sheets.css_files()?;
    for (name, asset) in table.sorted() {
        match asset {
            Asset::Local { name: file, size, .. } => {
                log!("check"; "{name} -> {file} ({size} bytes) {}", sheets.href(name)?);
            }
            Asset::Remote { url } => log!("check"; "{name} -> {url} (remote)"),
        }
    }
    log!("check"; "{} alias(es) resolved", table.len());
    Ok(())
}

impl Commands {
    fn overrides(&self) -> Option<&ConfigArgs> {
        match self {
            Self::Href { overrides, .. }
            | Self::Link { overrides, .. }
            | Self::Render { overrides, .. } => Some(overrides),
            Self::Inline { .. } | Self::Check => None,
        }
    }
}
