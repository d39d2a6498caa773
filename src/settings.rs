use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use odoline_kinematics::{RobotConfig, SlipModel};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "ODOLINE";

/// Everything the front-end needs, read once at start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub robot: RobotConfig,
    #[serde(default)]
    pub slip: SlipModel,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// 0 means "seed from OS entropy".
    pub seed: u64,
}

impl SimulationSettings {
    pub fn fixed_seed(&self) -> Option<u64> {
        (self.seed != 0).then_some(self.seed)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Pixels per workspace unit.
    pub scale: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub heading_length: f32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            scale: 1.0,
            body_width: 40.0,
            body_height: 20.0,
            heading_length: 15.0,
        }
    }
}

impl DisplaySettings {
    /// Scale and sizes must be finite. Scale must also be positive, or the
    /// window would have no area.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ConfigError::Message(format!(
                "display.scale must be positive and finite, got {}",
                self.scale
            )));
        }
        let sizes = [
            ("display.body_width", self.body_width),
            ("display.body_height", self.body_height),
            ("display.heading_length", self.heading_length),
        ];
        for (name, value) in sizes {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Message(format!(
                    "{} must be non-negative and finite, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// `ODOLINE__SECTION__KEY` environment overrides.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Load `config/default.toml`, then apply `ODOLINE__SECTION__KEY` overrides.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_PATH, environment())
}

fn load_config_from(path: &str, overrides: Environment) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let builder = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .add_source(overrides);

    match build_settings(builder) {
        Ok(settings) => {
            info!(
                robot = %settings.robot,
                slip = %settings.slip,
                seed = settings.simulation.seed,
                "Successfully loaded configuration"
            );
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

fn build_settings(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.display.validate()?;
    Ok(settings)
}

#[cfg(test)]
fn parse_settings(toml: &str) -> Result<Settings, ConfigError> {
    build_settings(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
}
