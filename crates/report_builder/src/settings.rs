//! Report settings file (`config.json`).
//!
//! ```json
//! {
//!   "MATCH_SETTINGS": { "DATA_DIR": "./data", "OUTPUT_FILE_REPORT": "match_report.json" },
//!   "TEAM_COLORS": { "HOME_NAME": "Arsenal", "AWAY_NAME": "Chelsea",
//!                    "HOME_COLOR": "#EF0107", "AWAY_COLOR": "#034694" },
//!   "AESTHETICS": { "BG_COLOR": "#0C0D0E", "LINE_COLOR": "white" }
//! }
//! ```

use anyhow::{Context, Result};
use match_core::{AnalyticsConfig, ReceiverPolicy, StyleConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_FILE: &str = "match_report.json";
pub const EVENTS_FILE: &str = "df_events.csv";
pub const MATCH_DICT_FILE: &str = "matchdict.json";
pub const XT_GRID_FILE: &str = "xT_grid.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MatchSettings {
    pub data_dir: PathBuf,
    /// Source page of the match, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whoscored_url: Option<String>,
    /// Image file name used by the rendering layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file_dashboard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file_report: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TeamColors {
    pub home_name: String,
    pub away_name: String,
    pub home_color: String,
    pub away_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Aesthetics {
    pub bg_color: String,
    pub line_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ReportSettings {
    pub match_settings: MatchSettings,
    pub team_colors: TeamColors,
    pub aesthetics: Aesthetics,
    /// Receiver inference for pass networks.
    #[serde(default)]
    pub receiver_policy: ReceiverPolicy,
}

impl ReportSettings {
    /// Read and parse a settings file. Missing keys are fatal.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid settings file: {}", path.display()))
    }

    pub fn analytics_config(&self) -> AnalyticsConfig {
        AnalyticsConfig {
            style: StyleConfig {
                background_color: self.aesthetics.bg_color.clone(),
                line_color: self.aesthetics.line_color.clone(),
                home_color: self.team_colors.home_color.clone(),
                away_color: self.team_colors.away_color.clone(),
            },
            receiver: self.receiver_policy,
        }
    }

    pub fn data_path(&self, file_name: &str) -> PathBuf {
        self.match_settings.data_dir.join(file_name)
    }

    pub fn report_path(&self) -> PathBuf {
        let name = self
            .match_settings
            .output_file_report
            .as_deref()
            .unwrap_or(DEFAULT_REPORT_FILE);
        self.data_path(name)
    }
}
