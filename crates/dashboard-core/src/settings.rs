use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Output / recommendation modes ──────────────────────────────────────────────

/// Where the dashboard is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Interactive terminal dashboard.
    #[default]
    Tui,
    /// Plain text report on stdout.
    Text,
    /// Markdown report on stdout.
    Markdown,
    /// Chart specifications as JSON on stdout.
    Json,
}

/// How each view's closing recommendation is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationMode {
    /// Pick the variant matching the data (dominant sentiment, trend direction).
    #[default]
    Adaptive,
    /// Always emit the general-purpose text covering every case.
    Consolidated,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Media intelligence dashboard for media-monitoring CSV exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "media-dashboard",
    about = "Media intelligence dashboard for media-monitoring CSV exports",
    version
)]
pub struct Settings {
    /// CSV file with Date, Platform, Sentiment, Location, Engagements and Media Type columns
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output mode
    #[arg(long, value_enum, default_value_t = OutputMode::Tui, env = "MEDIA_DASHBOARD_OUTPUT")]
    pub output: OutputMode,

    /// Also write the rendered report to this path (format follows the extension: .md, .json, otherwise text)
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Display theme
    #[arg(long, default_value = "auto", env = "MEDIA_DASHBOARD_THEME", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Convert timestamps that carry a UTC offset into this timezone before taking the day
    /// ("auto" = system zone); by default each timestamp keeps the day it was written with
    #[arg(long, env = "MEDIA_DASHBOARD_TIMEZONE")]
    pub timezone: Option<String>,

    /// Field delimiter: a single ASCII character, or "tab"
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Recommendation mode
    #[arg(long, value_enum, default_value_t = RecommendationMode::Adaptive)]
    pub recommendations: RecommendationMode,

    /// Logging level
    #[arg(long, default_value = "INFO", env = "MEDIA_DASHBOARD_LOG_LEVEL", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and apply overrides.
    pub fn load() -> Self {
        Self::resolve(Self::parse())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Self::parse_from(args))
    }

    /// `--debug` wins over `--log-level`.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Accept `,` `;` `|` and friends, `tab`, or a literal `\t`.
fn parse_delimiter(raw: &str) -> Result<u8, String> {
    match raw {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !c.is_ascii_alphanumeric() && c != '"' => Ok(c as u8),
        _ => Err(format!(
            "delimiter must be a single ASCII punctuation character or \"tab\", got {raw:?}"
        )),
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
