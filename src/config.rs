//! JSON configuration for boards and the terminal demo
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::line::BlankPalette;
use crate::core::style::FormatCode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub demo: DemoConfig,
}

/// Settings shared by every board a registry creates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub title: String,
    pub title_color: FormatCode,
    pub blank_key_prefix: String,
    pub blank_palette_size: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            title: "Game Stats".to_string(),
            title_color: FormatCode::Green,
            blank_key_prefix: "__blank_".to_string(),
            blank_palette_size: BlankPalette::MAX,
        }
    }
}

impl BoardConfig {
    pub fn with_title(title: impl Into<String>) -> Self {
        Self { title: title.into(), ..Self::default() }
    }

    /// Title as it appears on every display, colour code included
    pub fn rendered_title(&self) -> String {
        format!("{}{}", self.title_color, self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub players: usize,
    pub tick_ms: u64,
    pub line_width: usize,
    pub seed: Option<u64>,
}

impl DemoConfig {
    /// Accepted range for `line_width`
    pub const LINE_WIDTH: std::ops::RangeInclusive<usize> = 1..=200;
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            players: 4,
            tick_ms: 400,
            line_width: 18,
            seed: None,
        }
    }
}

impl Config {
    /// Read a config file; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config.sanitized())
    }

    /// Load `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Clamp out-of-range values instead of rejecting the file
    pub fn sanitized(mut self) -> Self {
        let palette = BlankPalette::new(self.board.blank_palette_size);
        if palette.size() != self.board.blank_palette_size {
            warn!(
                requested = self.board.blank_palette_size,
                used = palette.size(),
                "blank_palette_size out of range"
            );
            self.board.blank_palette_size = palette.size();
        }
        if self.board.blank_key_prefix.is_empty() {
            warn!("empty blank_key_prefix, using default");
            self.board.blank_key_prefix = BoardConfig::default().blank_key_prefix;
        }
        if self.demo.tick_ms == 0 {
            warn!("tick_ms must be positive, using 1");
            self.demo.tick_ms = 1;
        }
        let width = self
            .demo
            .line_width
            .clamp(*DemoConfig::LINE_WIDTH.start(), *DemoConfig::LINE_WIDTH.end());
        if width != self.demo.line_width {
            warn!(
                requested = self.demo.line_width,
                used = width,
                "line_width out of range"
            );
            self.demo.line_width = width;
        }
        self
    }

    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_host_conventions() {
        let config = Config::default();
        assert_eq!(config.board.rendered_title(), "§aGame Stats");
        assert_eq!(config.board.blank_key_prefix, "__blank_");
        assert_eq!(config.board.blank_palette_size, 22);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "board": {{ "title": "Arena", "title_color": "gold" }} }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.board.rendered_title(), "§6Arena");
        assert_eq!(config.demo, DemoConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "board": {{ "blank_palette_size": 0, "blank_key_prefix": "" }}, "demo": {{ "tick_ms": 0, "line_width": 0 }} }}"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.board.blank_palette_size, 1);
        assert_eq!(config.board.blank_key_prefix, "__blank_");
        assert_eq!(config.demo.tick_ms, 1);
        assert_eq!(config.demo.line_width, 1);
    }

    #[test]
    fn oversized_line_width_is_capped() {
        let mut config = Config::default();
        config.demo.line_width = 65533;
        assert_eq!(config.sanitized().demo.line_width, 200);
    }

    #[test]
    fn bad_json_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }

    #[test]
    fn missing_path_uses_defaults() {
        assert_eq!(Config::load_or_default(None).unwrap(), Config::default());
    }
}
