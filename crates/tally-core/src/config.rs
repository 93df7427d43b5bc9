use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::counter::CounterSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub counter: CounterConfig,
    #[serde(default)]
    pub section: SectionConfig,
    #[serde(default = "default_stats")]
    pub stats: Vec<StatEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds while no counter is animating
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Frame rate used while at least one counter is animating
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Height of the hero block above the stats grid, in rows
    #[serde(default = "default_hero_height")]
    pub hero_height: u16,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            animation_fps: default_animation_fps(),
            hero_height: default_hero_height(),
        }
    }
}

/// Easing curve applied to the count-up progress.
///
/// Every variant is an ease-out curve: strictly increasing and concave on
/// `[0, 1]`, so most of the value is reached early.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EasingType {
    /// f(t) = 1 - (1-t)³
    Cubic,
    /// f(t) = 1 - (1-t)⁴
    #[default]
    Quartic,
    /// f(t) = 1 - (1-t)⁵
    Quintic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CounterConfig {
    /// Count-up duration in milliseconds; zero or negative jumps straight to the end value
    #[serde(default = "default_duration_ms")]
    pub duration_ms: i64,
    /// Visible fraction of a card that triggers its counter
    #[serde(default = "default_visibility_threshold")]
    pub visibility_threshold: f64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
    /// Thousands separator used when rendering values
    #[serde(default = "default_thousands_separator")]
    pub thousands_separator: String,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            visibility_threshold: default_visibility_threshold(),
            easing: EasingType::default(),
            thousands_separator: default_thousands_separator(),
        }
    }
}

impl CounterConfig {
    /// Animation duration, with negative values clamped to zero
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms.max(0) as u64)
    }
}

/// Heading block rendered above the stat cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    #[serde(default = "default_section_title")]
    pub title: String,
    #[serde(default = "default_section_subtitle")]
    pub subtitle: String,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            title: default_section_title(),
            subtitle: default_section_subtitle(),
        }
    }
}

/// One stat card on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    /// Target value; negative values are rejected by [`AppConfig::validate`]
    pub value: i64,
    pub label: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Per-card duration override in milliseconds
    #[serde(default)]
    pub duration_ms: Option<i64>,
}

impl StatEntry {
    pub fn new(value: i64, label: &str, prefix: &str, suffix: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            duration_ms: None,
        }
    }

    /// Build the counter spec for this card, falling back to the global duration
    pub fn counter_spec(&self, counter: &CounterConfig) -> crate::Result<CounterSpec> {
        let end_value = u64::try_from(self.value).map_err(|_| {
            crate::Error::InvalidCounter(format!(
                "stat '{}' has negative value {}",
                self.label, self.value
            ))
        })?;
        let duration = match self.duration_ms {
            Some(ms) => Duration::from_millis(ms.max(0) as u64),
            None => counter.duration(),
        };
        Ok(CounterSpec {
            end_value,
            duration,
            prefix: self.prefix.clone(),
            suffix: self.suffix.clone(),
        })
    }
}

fn default_stats() -> Vec<StatEntry> {
    vec![
        StatEntry::new(117, "Participants", "", "+"),
        StatEntry::new(27, "Teams", "", ""),
        StatEntry::new(27, "Projects", "", "+"),
        StatEntry::new(12, "Finalist", "", ""),
    ]
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

fn default_animation_fps() -> u32 {
    60
}

fn default_hero_height() -> u16 {
    30
}

fn default_duration_ms() -> i64 {
    2000
}

fn default_visibility_threshold() -> f64 {
    0.1
}

fn default_thousands_separator() -> String {
    ",".to_string()
}

fn default_section_title() -> String {
    "Our Impact".to_string()
}

fn default_section_subtitle() -> String {
    concat!(
        "Since 2023, we've been empowering students worldwide ",
        "to create positive change through social entrepreneurship."
    )
    .to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            ui: UiConfig::default(),
            counter: CounterConfig::default(),
            section: SectionConfig::default(),
            stats: default_stats(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file; a missing file yields defaults
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as TOML, creating parent directories
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/tally/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("tally")
            .join("config.toml")
    }

    /// Reject values the counter engine cannot animate
    pub fn validate(&self) -> crate::Result<()> {
        let threshold = self.counter.visibility_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(crate::Error::Config(format!(
                "visibility_threshold must be within [0, 1], got {}",
                threshold
            )));
        }
        for stat in &self.stats {
            stat.counter_spec(&self.counter)?;
        }
        Ok(())
    }

    /// Counter specs for every configured stat, in display order
    pub fn counter_specs(&self) -> crate::Result<Vec<CounterSpec>> {
        self.stats
            .iter()
            .map(|stat| stat.counter_spec(&self.counter))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.counter.duration_ms, 2000);
        assert_eq!(config.counter.easing, EasingType::Quartic);
        assert!((config.counter.visibility_threshold - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.stats.len(), 4);
        assert_eq!(config.stats[0], StatEntry::new(117, "Participants", "", "+"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [counter]
            duration_ms = 500
            easing = "cubic"

            [[stats]]
            value = 12000
            label = "Downloads"
            suffix = "+"
            "#,
        )
        .unwrap();

        assert_eq!(config.counter.duration(), Duration::from_millis(500));
        assert_eq!(config.counter.easing, EasingType::Cubic);
        assert_eq!(config.counter.thousands_separator, ",");
        assert_eq!(config.ui.animation_fps, 60);
        assert_eq!(config.stats.len(), 1);
        assert_eq!(config.stats[0].prefix, "");
        assert_eq!(config.stats[0].suffix, "+");
    }

    #[test]
    fn test_negative_duration_clamps_to_zero() {
        let counter = CounterConfig {
            duration_ms: -50,
            ..Default::default()
        };
        assert_eq!(counter.duration(), Duration::ZERO);
    }

    #[test]
    fn test_negative_value_rejected() {
        let config = AppConfig {
            stats: vec![StatEntry::new(-5, "Broken", "", "")],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(crate::Error::InvalidCounter(_))
        ));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let mut config = AppConfig::default();
        config.counter.visibility_threshold = 1.5;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_per_stat_duration_override() {
        let counter = CounterConfig::default();
        let mut stat = StatEntry::new(27, "Teams", "", "");
        stat.duration_ms = Some(750);

        let spec = stat.counter_spec(&counter).unwrap();
        assert_eq!(spec.end_value, 27);
        assert_eq!(spec.duration, Duration::from_millis(750));
    }

    #[test]
    fn test_save_and_load_roundtrip_file() {
        let path = std::env::temp_dir()
            .join(format!("tally-config-test-{}", std::process::id()))
            .join("config.toml");

        let mut config = AppConfig::default();
        config.section.title = "Numbers".to_string();
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.section.title, "Numbers");
        assert_eq!(loaded.stats, config.stats);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let dir = std::env::temp_dir().join(format!("tally-bad-toml-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[counter\nduration_ms = ").unwrap();

        let result = AppConfig::load_from(&path);
        assert!(matches!(result, Err(crate::Error::Config(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        // A directory exists but cannot be read as a file
        let dir = std::env::temp_dir().join(format!("tally-dir-as-file-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let result = AppConfig::load_from(&dir);
        assert!(matches!(result, Err(crate::Error::Io(_))));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("tally-definitely-missing/config.toml");
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.stats.len(), 4);
    }
}
