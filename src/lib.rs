//! Stylesheet alias resolution and HTML rendering.
//!
//! Declare logical names ("aliases") for stylesheets, resolve them once against
//! a CSS directory (or pass remote URLs through), then render `<link>`,
//! inlined `<style>`, or deferred preload markup for them.
//!
//! ```ignore
//! use csslink::{StylesheetConfig, Stylesheets};
//!
//! let config = StylesheetConfig::new("public/css")
//!     .alias("reset", true)
//!     .alias("main", "site/main")
//!     .alias("fonts", "https://fonts.example.com/css");
//! let sheets = Stylesheets::builder(config).build()?;
//!
//! let head = sheets.deferred_link_html(&["reset", "main"])?;
//! ```

pub mod asset;
pub mod config;
pub mod embed;
pub mod error;
pub mod logger;
pub mod render;
pub mod sink;

pub use asset::{Asset, FileSystem, ResolvedTable, StdFs};
pub use config::{AliasSpec, StylesheetConfig};
pub use embed::{AssetLocator, BundledLocator, FixedLocator};
pub use error::{Result, StyleError};
pub use render::{HtmlTemplate, Stylesheets, StylesheetsBuilder};
pub use sink::{LogSink, MemorySink, RaiseOnError, Severity, Strict, WarnOnly};
