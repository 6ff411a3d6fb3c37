//! Animation-wide defaults: timeline display metadata and control settings.

use serde::{Deserialize, Serialize};

use crate::controls::{SliderConfig, ToggleConfig};
use crate::error::AnimationError;
use crate::timeline::TimelineOptions;
use crate::Result;

/// Settings applied when an [`Animation`](crate::Animation) builds its own
/// timeline or controls. Every field has a default, so a partial JSON
/// document is enough.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timeline: TimelineOptions,
    pub slider: SliderConfig,
    pub toggle: ToggleConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| AnimationError::invalid(format!("invalid animation config: {e}")))
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(AnimationError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = Config::from_json_str(r#"{ "timeline": { "fps": 24, "units": "s" } }"#).unwrap();
        assert_eq!(cfg.timeline.fps, 24.0);
        assert_eq!(cfg.timeline.units, "s");
        assert!(!cfg.timeline.log);
        assert_eq!(cfg.slider.text, "Time");
        assert_eq!(cfg.toggle.play_label, "Play");
    }

    #[test]
    fn round_trips_through_json() {
        let mut cfg = Config::default();
        cfg.slider.valfmt = Some("%.3f".into());
        let back = Config::from_json_str(&cfg.to_json_string().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn rejects_malformed_json() {
        let err = Config::from_json_str("{ timeline: ").unwrap_err();
        assert_eq!(err.category(), "validation");
    }
}
