use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

/// Capacity limits and CCD tuning, carried by the world instead of global
/// constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub max_bodies: usize,
    pub max_joints: usize,
    pub max_contacts: usize,
    pub max_fixtures_per_body: usize,
    /// Time-of-impact resolutions allowed per contact in one step.
    pub max_toi_sub_steps: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            max_bodies: 1024,
            max_joints: 1024,
            max_contacts: 8192,
            max_fixtures_per_body: 16,
            max_toi_sub_steps: 8,
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_bodies", self.max_bodies),
            ("max_joints", self.max_joints),
            ("max_contacts", self.max_contacts),
            ("max_fixtures_per_body", self.max_fixtures_per_body),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ConfigError::Invalid(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);

        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;

        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);

        serde_json::to_writer_pretty(writer, self)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = WorldConfig::from_json_str(r#"{ "max_joints": 3 }"#).unwrap();
        assert_eq!(config.max_joints, 3);
        assert_eq!(config.max_bodies, WorldConfig::default().max_bodies);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = WorldConfig::from_json_str(r#"{ "max_bodies": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(matches!(
            WorldConfig::from_json_str("{ not json"),
            Err(ConfigError::Serde(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir().join(format!(
            "linkworld-config-{}.json",
            std::process::id()
        ));
        let config = WorldConfig {
            max_contacts: 12,
            ..WorldConfig::default()
        };
        config.save(&path).unwrap();
        let loaded = WorldConfig::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
