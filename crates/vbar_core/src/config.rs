//! Scrollbar options.
//!
//! Options arrive from the host as a loose JSON-like object. Every key is
//! optional; missing keys keep their defaults, unknown keys are ignored. The
//! legacy option names (`el1Class`, `el2Class`, ...) are
//! accepted as aliases.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

use crate::constants::*;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Get the display name for this log level.
    pub fn name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    /// Get all log levels in order from least to most verbose.
    pub fn all() -> &'static [LogLevel] {
        &[
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ]
    }

    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LogLevel::all()
            .iter()
            .find(|level| level.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| ConfigError::InvalidValue {
                option: "logLevel".to_string(),
                reason: format!("unknown log level '{}'", s),
            })
    }
}

/// CSS class names for every element and visual state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    #[serde(alias = "el1Class")]
    pub container_class: String,
    #[serde(alias = "el1ScrollVisibleClass")]
    pub container_visible_class: String,
    #[serde(alias = "el1ScrollInvisibleClass")]
    pub container_invisible_class: String,
    #[serde(alias = "el1ScrollingClass")]
    pub container_scrolling_class: String,
    #[serde(alias = "el1ScrollingPhantomClass")]
    pub container_scrolling_phantom_class: String,
    #[serde(alias = "el1DraggingClass")]
    pub container_dragging_class: String,
    #[serde(alias = "el1DraggingPhantomClass")]
    pub container_dragging_phantom_class: String,
    #[serde(alias = "el2Class")]
    pub content_class: String,
    pub dragger_class: String,
    pub dragger_styler_class: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            container_class: CONTAINER_CLASS.to_string(),
            container_visible_class: CONTAINER_VISIBLE_CLASS.to_string(),
            container_invisible_class: CONTAINER_INVISIBLE_CLASS.to_string(),
            container_scrolling_class: CONTAINER_SCROLLING_CLASS.to_string(),
            container_scrolling_phantom_class: CONTAINER_SCROLLING_PHANTOM_CLASS.to_string(),
            container_dragging_class: CONTAINER_DRAGGING_CLASS.to_string(),
            container_dragging_phantom_class: CONTAINER_DRAGGING_PHANTOM_CLASS.to_string(),
            content_class: CONTENT_CLASS.to_string(),
            dragger_class: DRAGGER_CLASS.to_string(),
            dragger_styler_class: DRAGGER_STYLER_CLASS.to_string(),
        }
    }
}

impl ClassNames {
    /// Every class that may be put on the container, with its option name.
    pub fn container_states(&self) -> [(&'static str, &str); 7] {
        [
            ("containerClass", &self.container_class),
            ("containerVisibleClass", &self.container_visible_class),
            ("containerInvisibleClass", &self.container_invisible_class),
            ("containerScrollingClass", &self.container_scrolling_class),
            (
                "containerScrollingPhantomClass",
                &self.container_scrolling_phantom_class,
            ),
            ("containerDraggingClass", &self.container_dragging_class),
            (
                "containerDraggingPhantomClass",
                &self.container_dragging_phantom_class,
            ),
        ]
    }

    fn all(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.container_states().into_iter().chain([
            ("contentClass", self.content_class.as_str()),
            ("draggerClass", self.dragger_class.as_str()),
            ("draggerStylerClass", self.dragger_styler_class.as_str()),
        ])
    }
}

/// Scrollbar configuration, fixed once an instance is initialized.
///
/// Intervals and delays are in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Throttle interval for native scroll handling
    pub scroll_throttle: u64,
    /// Throttle interval for drag-move handling
    pub dragger_throttle: u64,
    /// Refresh when the window resizes
    pub resize_refresh: bool,
    /// Debounce delay for resize refreshes
    pub resize_debounce: u64,
    /// Throttle interval for content mutation refreshes
    pub observer_throttle: u64,
    /// Also disable text selection on the page body while dragging
    pub unselectable_body: bool,
    /// Hide overlay scrollbars too, using the fallback width
    pub override_floating_scrollbar: bool,
    /// How long the scrolling-phantom class outlives the last scroll
    pub scrolling_phantom_delay: u64,
    /// How long the dragging-phantom class outlives the end of a drag
    pub dragging_phantom_delay: u64,
    /// Keep wheel events at the scroll edges from scrolling outer areas
    pub prevent_parent_scroll: bool,
    #[serde(flatten)]
    pub classes: ClassNames,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scroll_throttle: DEFAULT_SCROLL_THROTTLE_MS,
            dragger_throttle: DEFAULT_DRAGGER_THROTTLE_MS,
            resize_refresh: true,
            resize_debounce: DEFAULT_RESIZE_DEBOUNCE_MS,
            observer_throttle: DEFAULT_OBSERVER_THROTTLE_MS,
            unselectable_body: true,
            override_floating_scrollbar: true,
            scrolling_phantom_delay: DEFAULT_SCROLLING_PHANTOM_DELAY_MS,
            dragging_phantom_delay: DEFAULT_DRAGGING_PHANTOM_DELAY_MS,
            prevent_parent_scroll: false,
            classes: ClassNames::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse host options. Empty input and `null` give the defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let trimmed = json.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(Self::default());
        }

        let config: Self = serde_json::from_str(trimmed)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check values the document would reject.
    ///
    /// Intervals are capped at [`MAX_INTERVAL_MS`]. Class names must be
    /// single non-empty tokens, `classList` throws on anything else.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (option, value) in self.intervals() {
            if value > MAX_INTERVAL_MS {
                return Err(ConfigError::InvalidValue {
                    option: option.to_string(),
                    reason: format!("{}ms exceeds the {}ms limit", value, MAX_INTERVAL_MS),
                });
            }
        }
        for (option, class) in self.classes.all() {
            if class.is_empty() {
                return Err(ConfigError::InvalidValue {
                    option: option.to_string(),
                    reason: "class name is empty".to_string(),
                });
            }
            if class.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue {
                    option: option.to_string(),
                    reason: format!("class name '{}' contains whitespace", class),
                });
            }
        }
        Ok(())
    }

    pub fn scroll_interval(&self) -> Duration {
        millis(self.scroll_throttle)
    }

    pub fn drag_interval(&self) -> Duration {
        millis(self.dragger_throttle)
    }

    pub fn resize_delay(&self) -> Duration {
        millis(self.resize_debounce)
    }

    pub fn observer_interval(&self) -> Duration {
        millis(self.observer_throttle)
    }

    /// How long the scrolling class stays on after a scroll
    pub fn scrolling_class_delay(&self) -> Duration {
        self.scroll_interval() + millis(SCROLLING_CLASS_GRACE_MS)
    }

    /// How long the scrolling-phantom class stays on after a scroll
    pub fn scrolling_phantom_class_delay(&self) -> Duration {
        self.scroll_interval() + millis(self.scrolling_phantom_delay)
    }

    /// How long the dragging-phantom class stays on after a drag
    pub fn dragging_phantom_class_delay(&self) -> Duration {
        millis(self.dragging_phantom_delay)
    }

    fn intervals(&self) -> [(&'static str, u64); 6] {
        [
            ("scrollThrottle", self.scroll_throttle),
            ("draggerThrottle", self.dragger_throttle),
            ("resizeDebounce", self.resize_debounce),
            ("observerThrottle", self.observer_throttle),
            ("scrollingPhantomDelay", self.scrolling_phantom_delay),
            ("draggingPhantomDelay", self.dragging_phantom_delay),
        ]
    }
}

/// Options built in code skip [`Config::validate`], so durations are capped
/// here as well.
fn millis(value: u64) -> Duration {
    Duration::from_millis(value.min(MAX_INTERVAL_MS))
}

/// Errors that can occur when reading options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse options: {0}")]
    Parse(#[from] serde_json::Error),

    /// Option present but unusable
    #[error("Invalid value for option '{option}': {reason}")]
    InvalidValue { option: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_null_give_defaults() {
        assert_eq!(Config::from_json("").unwrap(), Config::default());
        assert_eq!(Config::from_json("  null ").unwrap(), Config::default());
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_overrides_merge_onto_defaults() {
        let config = Config::from_json(
            r#"{ "scrollThrottle": 30, "preventParentScroll": true, "draggerClass": "thumb" }"#,
        )
        .unwrap();

        assert_eq!(config.scroll_throttle, 30);
        assert!(config.prevent_parent_scroll);
        assert_eq!(config.classes.dragger_class, "thumb");
        assert_eq!(config.dragger_throttle, DEFAULT_DRAGGER_THROTTLE_MS);
        assert_eq!(config.classes.container_class, CONTAINER_CLASS);
        assert!(config.resize_refresh);
    }

    #[test]
    fn test_legacy_option_names() {
        let config =
            Config::from_json(r#"{ "el1Class": "scroller", "el2Class": "scroller-body" }"#).unwrap();
        assert_eq!(config.classes.container_class, "scroller");
        assert_eq!(config.classes.content_class, "scroller-body");
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let config = Config::from_json(r#"{ "somethingElse": [1, 2, 3] }"#).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_options() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{ "scrollThrottle": "fast" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_unusable_class_names() {
        let err = Config::from_json(r#"{ "draggerClass": "" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref option, .. } if option == "draggerClass"));

        let err = Config::from_json(r#"{ "el1Class": "two words" }"#).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref option, .. } if option == "containerClass")
        );
    }

    #[test]
    fn test_json_roundtrip_keeps_camel_case_keys() {
        let json = Config::default().to_json().unwrap();
        assert!(json.contains("\"scrollThrottle\": 10"));
        assert!(json.contains("\"draggerStylerClass\": \"vb-dragger-styler\""));
        assert_eq!(Config::from_json(&json).unwrap(), Config::default());
    }

    #[test]
    fn test_derived_delays() {
        let config = Config::default();
        assert_eq!(config.scrolling_class_delay(), Duration::from_millis(15));
        assert_eq!(
            config.scrolling_phantom_class_delay(),
            Duration::from_millis(1010)
        );
        assert_eq!(
            config.dragging_phantom_class_delay(),
            Duration::from_millis(1000)
        );
    }

    #[test]
    fn test_rejects_intervals_past_limit() {
        let err = Config::from_json(r#"{ "scrollThrottle": 18446744073709551615 }"#).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref option, .. } if option == "scrollThrottle")
        );

        let err = Config::from_json(r#"{ "draggingPhantomDelay": 4294967296 }"#).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref option, .. } if option == "draggingPhantomDelay")
        );

        let config = Config::from_json(r#"{ "resizeDebounce": 4294967295 }"#).unwrap();
        assert_eq!(config.resize_delay(), Duration::from_millis(MAX_INTERVAL_MS));
    }

    #[test]
    fn test_derived_delays_saturate() {
        let config = Config {
            scroll_throttle: u64::MAX,
            scrolling_phantom_delay: u64::MAX,
            ..Config::default()
        };
        let limit = Duration::from_millis(MAX_INTERVAL_MS);

        assert_eq!(config.scroll_interval(), limit);
        assert_eq!(
            config.scrolling_class_delay(),
            limit + Duration::from_millis(SCROLLING_CLASS_GRACE_MS)
        );
        assert_eq!(config.scrolling_phantom_class_delay(), limit * 2);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("debug".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" TRACE ".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(
            LogLevel::Info.to_level_filter(),
            log::LevelFilter::Info
        );
    }
}
