use crate::data::record::DEFAULT_REFERENCE_YEAR;
use crate::view::page_window::{
    DEFAULT_INITIAL_ROWS, DEFAULT_ROWS_PER_PAGE, DEFAULT_SCROLL_TOLERANCE,
};
use crate::view::sorter::SortKey;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const GLYPH_CURRENCY: &str = "₹";
const ASCII_CURRENCY: &str = "Rs.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs for icons and currency
    pub use_glyphs: bool,

    /// Prefix for fee and package amounts
    pub currency_symbol: String,

    /// Show a row number column
    pub show_row_numbers: bool,

    pub icons: IconConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub featured: String,
    pub ascending: String,
    pub descending: String,
    pub check: String,
    pub search: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Rows shown before any scrolling
    pub initial_rows: usize,

    /// Rows added each time the view is scrolled to the bottom
    pub rows_per_page: usize,

    /// Slack (in rows) when detecting the bottom of the view
    pub scroll_tolerance: f64,

    /// Year consulted for placements and ranking
    pub reference_year: i32,

    /// Shrink back to `initial_rows` whenever the query or sort changes
    pub reset_window_on_change: bool,

    /// Sort applied when the table opens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortKey>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            currency_symbol: GLYPH_CURRENCY.to_string(),
            show_row_numbers: false,
            icons: IconConfig::default(),
        }
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            featured: "★".to_string(),
            ascending: "▲".to_string(),
            descending: "▼".to_string(),
            check: "✓".to_string(),
            search: "🔍".to_string(),
        }
    }
}

impl IconConfig {
    /// ASCII alternatives for terminals without glyph support
    pub fn simple() -> Self {
        Self {
            featured: "*".to_string(),
            ascending: "^".to_string(),
            descending: "v".to_string(),
            check: "+".to_string(),
            search: ">".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            initial_rows: DEFAULT_INITIAL_ROWS,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            scroll_tolerance: DEFAULT_SCROLL_TOLERANCE,
            reference_year: DEFAULT_REFERENCE_YEAR,
            reset_window_on_change: true,
            default_sort: None,
        }
    }
}

impl DisplayConfig {
    /// Switch icons (and the default currency glyph) to ASCII
    pub fn apply_simple_mode(&mut self) {
        self.use_glyphs = false;
        self.icons = IconConfig::simple();
        if self.currency_symbol == GLYPH_CURRENCY {
            self.currency_symbol = ASCII_CURRENCY.to_string();
        }
    }
}

impl Config {
    /// Load config from the default location. A missing file means defaults.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            debug!(target: "config", "No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if !config.display.use_glyphs {
            config.display.apply_simple_mode();
        }

        debug!(target: "config", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("college-table").join("config.toml"))
    }

    /// Write the commented default file to `path`
    pub fn write_default_with_comments(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, Self::create_default_with_comments())
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# College Table Configuration File
# Location: ~/.config/college-table/config.toml (Linux)
#           ~/Library/Application Support/college-table/config.toml (macOS)
#           %APPDATA%\college-table\config.toml (Windows)

[display]
# Use Unicode glyphs for icons and the currency sign
# Set to false for ASCII-only mode (better compatibility)
use_glyphs = true

# Prefix for fee and package amounts
currency_symbol = "₹"

# Show a row number column
show_row_numbers = false

# Icon configuration
# These are automatically set to ASCII when use_glyphs = false
[display.icons]
featured = "★"
ascending = "▲"
descending = "▼"
check = "✓"
search = "🔍"

[behavior]
# Rows shown before scrolling
initial_rows = 10

# Rows added each time the table is scrolled to the bottom
rows_per_page = 10

# Slack (in rows) when detecting the bottom of the table
scroll_tolerance = 1.0

# Year consulted for placements and ranking
reference_year = 2023

# Shrink the table back to initial_rows when the search or sort changes
reset_window_on_change = true

# Sort applied on startup: cd_rank, fees, placements, userReview, ranking, name
# default_sort = "cd_rank"
"#
        .to_string()
    }
}
