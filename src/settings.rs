use crate::error::DlaError;
use serde::{Deserialize, Serialize};

/// All simulation settings consolidated into one struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Probability that a particle touching the cluster attaches, per step (0-1]
    pub stickiness: f64,
    /// Extra columns swept on each side when building the launch annulus (>= 1)
    pub annulus_margin: usize,
    /// Slack beyond the cluster radius before a walker is abandoned and re-seeded
    pub escape_margin: usize,
    /// Optional cap on steps per launch; a walker that hits it is re-seeded
    pub max_walk_steps: Option<usize>,
    /// Fixed RNG seed for reproducible runs
    pub rng_seed: Option<u64>,
    /// Log progress every this many depositions (0 disables)
    pub progress_interval: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            stickiness: 1.0,
            annulus_margin: 10,
            escape_margin: 15,
            max_walk_steps: None,
            rng_seed: None,
            progress_interval: 100,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), DlaError> {
        if !(self.stickiness > 0.0 && self.stickiness <= 1.0) {
            return Err(DlaError::InvalidConfig(format!(
                "stickiness must be in (0, 1], got {}",
                self.stickiness
            )));
        }
        if self.annulus_margin == 0 {
            return Err(DlaError::InvalidConfig("annulus margin must be at least 1".into()));
        }
        if self.max_walk_steps == Some(0) {
            return Err(DlaError::InvalidConfig("max walk steps must be positive".into()));
        }
        Ok(())
    }

    /// Squared distance from the cluster center beyond which a walker has escaped
    pub fn escape_radius_sq(&self, radius: usize) -> i64 {
        let r = (radius + self.escape_margin) as i64;
        r * r
    }

    /// Adjust stickiness (clamped to 0.01-1.0)
    pub fn adjust_stickiness(&mut self, delta: f64) {
        self.stickiness = (self.stickiness + delta).clamp(0.01, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.annulus_margin, 10);
        assert_eq!(settings.escape_margin, 15);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_stickiness_bounds() {
        for k in [0.0, -0.5, 1.5, f64::NAN] {
            let settings = SimulationSettings {
                stickiness: k,
                ..Default::default()
            };
            assert!(matches!(settings.validate(), Err(DlaError::InvalidConfig(_))), "k = {k}");
        }
        let settings = SimulationSettings {
            stickiness: 0.01,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_margin_and_step_cap_rejected() {
        let settings = SimulationSettings {
            annulus_margin: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        let settings = SimulationSettings {
            max_walk_steps: Some(0),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_escape_radius() {
        let settings = SimulationSettings::default();
        assert_eq!(settings.escape_radius_sq(0), 225);
        assert_eq!(settings.escape_radius_sq(5), 400);
    }

    #[test]
    fn test_adjust_stickiness_clamps() {
        let mut settings = SimulationSettings::default();
        settings.adjust_stickiness(0.5);
        assert_eq!(settings.stickiness, 1.0);
        settings.adjust_stickiness(-5.0);
        assert_eq!(settings.stickiness, 0.01);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: SimulationSettings = serde_json::from_str(r#"{ "stickiness": 0.3 }"#).unwrap();
        assert_eq!(settings.stickiness, 0.3);
        assert_eq!(settings.escape_margin, 15);
        assert_eq!(settings.max_walk_steps, None);
    }
}
