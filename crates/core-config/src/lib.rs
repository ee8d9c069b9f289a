//! Configuration loading and parsing.
//!
//! Parses `logmark.toml` (or an override path provided by the binary):
//!
//! ```toml
//! [highlight]
//! class = "bg-yellow-200 text-black"
//!
//! [view]
//! page_size = 100
//! viewport_rows = 20
//!
//! [scroll]
//! behavior = "smooth"   # smooth | instant | auto
//! block = "center"      # start | center | end | nearest
//! ```
//!
//! Every field is optional. A missing or unreadable file yields defaults, as
//! does a file that fails to parse (logged on the `config` target). Unknown
//! fields are ignored. `page_size = 0` is clamped to 1 by
//! [`Config::effective_page_size`]; the raw value is kept as parsed.

use anyhow::{Context, Result};
use core_highlight::{DEFAULT_MARK_CLASS, Marker};
use core_viewport::{ScrollBehavior, ScrollBlock, ScrollIntoViewOptions};
use serde::Deserialize;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::{fs, path::Path, path::PathBuf};
use tracing::{debug, info, warn};

const CONFIG_FILE: &str = "logmark.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct HighlightConfig {
    #[serde(default = "HighlightConfig::default_class")]
    pub class: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            class: Self::default_class(),
        }
    }
}

impl HighlightConfig {
    fn default_class() -> String {
        DEFAULT_MARK_CLASS.to_owned()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_page_size")] // page limit of the log API
    pub page_size: usize,
    #[serde(default = "ViewConfig::default_viewport_rows")]
    pub viewport_rows: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            viewport_rows: Self::default_viewport_rows(),
        }
    }
}

impl ViewConfig {
    const fn default_page_size() -> usize {
        100
    }
    const fn default_viewport_rows() -> usize {
        20
    }
}

#[derive(Debug, Deserialize, Default, Clone, Copy)]
pub struct ScrollConfig {
    #[serde(default)]
    pub behavior: ScrollBehavior,
    #[serde(default)]
    pub block: ScrollBlock,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path: `./logmark.toml`, then the platform config dir
/// (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("logmark").join(CONFIG_FILE);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(parse(&path, content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(target: "config", path = %path.display(), "config_absent");
            Ok(Config::default())
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_unreadable");
            Ok(Config::default())
        }
    }
}

/// Parse a config file strictly, surfacing TOML errors instead of falling
/// back to defaults.
pub fn load_strict(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file = toml::from_str::<ConfigFile>(&content)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Config {
        raw: Some(content),
        file,
    })
}

fn parse(path: &Path, content: String) -> Config {
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Config {
            raw: Some(content),
            file,
        },
        Err(e) => {
            warn!(
                target: "config",
                path = %path.display(),
                error = %e,
                "config_parse_failed_using_defaults"
            );
            Config::default()
        }
    }
}

impl Config {
    pub fn marker(&self) -> Marker {
        Marker::with_class(&self.file.highlight.class)
    }

    /// Configured page size, raised to 1 when zero.
    pub fn effective_page_size(&self) -> NonZeroUsize {
        let raw = self.file.view.page_size;
        match NonZeroUsize::new(raw) {
            Some(size) => size,
            None => {
                info!(target: "config", raw, clamped = 1, "page_size_clamped");
                NonZeroUsize::MIN
            }
        }
    }

    pub fn scroll_options(&self) -> ScrollIntoViewOptions {
        ScrollIntoViewOptions::new(self.file.scroll.behavior, self.file.scroll.block)
    }
}
