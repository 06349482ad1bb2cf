use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, rename = "match")]
    pub match_defaults: MatchDefaults,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub inputs: InputConfig,
    #[serde(default)]
    pub rating: RatingConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchDefaults {
    #[serde(default = "default_minute")]
    pub minute: u32,
    #[serde(default = "default_wbgt")]
    pub wbgt: f64,
    #[serde(default)]
    pub altitude_m: f64,
    #[serde(default = "default_risk_aversion")]
    pub risk_aversion: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_base_fatigue_min")]
    pub base_fatigue_min: f64,
    #[serde(default = "default_base_fatigue_max")]
    pub base_fatigue_max: f64,
    #[serde(default)]
    pub fatigue_seed: String,
    #[serde(default = "default_stamina_floor")]
    pub stamina_floor: f64,
    #[serde(default = "default_base_hazard")]
    pub base_hazard: f64,
    #[serde(default = "default_value_scale")]
    pub value_scale: f64,
    #[serde(default = "default_wbgt")]
    pub reference_wbgt: f64,
    #[serde(default = "default_heat_penalty")]
    pub heat_penalty_per_10c: f64,
    #[serde(default = "default_altitude_penalty")]
    pub altitude_penalty_per_1000m: f64,
    #[serde(default = "default_physicality_reference")]
    pub physicality_reference: f64,
    #[serde(default = "default_physicality_slope")]
    pub physicality_slope: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InputPolicy {
    #[default]
    Clamp,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default)]
    pub policy: InputPolicy,
    #[serde(default = "default_max_wbgt")]
    pub max_wbgt: f64,
    #[serde(default = "default_max_altitude")]
    pub max_altitude_m: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RatingConfig {
    #[serde(default)]
    pub model_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RosterConfig {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub roster_path: Option<String>,
    pub rating_model_path: Option<String>,
    pub input_policy: Option<InputPolicy>,
    pub fatigue_seed: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/substitution-advisor/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        parsed
            .model
            .validate()
            .with_context(|| format!("invalid [model] section: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.roster_path {
            self.roster.path = path;
        }
        if let Some(path) = overrides.rating_model_path {
            self.rating.model_path = path;
        }
        if let Some(policy) = overrides.input_policy {
            self.inputs.policy = policy;
        }
        if let Some(seed) = overrides.fatigue_seed {
            self.model.fatigue_seed = seed;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_roster_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.roster.path)
    }

    pub fn resolved_rating_model_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.rating.model_path)
    }

    pub fn default_template() -> String {
        let template = r#"# Defaults for any match-state field a request leaves out.
[match]
minute = 65
wbgt = 25.0
altitude_m = 0.0
risk_aversion = 1.0

[model]
base_fatigue_min = 0.005
base_fatigue_max = 0.008
# Mixed into each player's base fatigue rate. Change it to reshuffle rates.
fatigue_seed = ""
stamina_floor = 0.01
base_hazard = 0.0001
value_scale = 1000.0
reference_wbgt = 25.0
heat_penalty_per_10c = 0.5
altitude_penalty_per_1000m = 0.1
physicality_reference = 75.0
physicality_slope = 0.01

[inputs]
# "clamp" pulls out-of-range inputs back into range, "reject" fails the request.
policy = "clamp"
max_wbgt = 50.0
max_altitude_m = 5000.0

[rating]
# JSON linear rating model. Empty means mean-of-skills fallback.
model_path = ""

[roster]
# JSON roster file. Empty means the built-in sample roster.
path = ""

[server]
host = "127.0.0.1"
port = 3001
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

fn non_empty_path(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(expand_tilde(trimmed))
    }
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            minute: default_minute(),
            wbgt: default_wbgt(),
            altitude_m: 0.0,
            risk_aversion: default_risk_aversion(),
        }
    }
}

impl ModelConfig {
    pub fn validate(&self) -> Result<()> {
        let coefficients = [
            ("base_fatigue_min", self.base_fatigue_min),
            ("base_fatigue_max", self.base_fatigue_max),
            ("stamina_floor", self.stamina_floor),
            ("base_hazard", self.base_hazard),
            ("value_scale", self.value_scale),
            ("reference_wbgt", self.reference_wbgt),
            ("heat_penalty_per_10c", self.heat_penalty_per_10c),
            ("altitude_penalty_per_1000m", self.altitude_penalty_per_1000m),
            ("physicality_reference", self.physicality_reference),
            ("physicality_slope", self.physicality_slope),
        ];
        if let Some((name, value)) = coefficients.iter().find(|(_, v)| !v.is_finite()) {
            return Err(anyhow!("model.{name} must be finite, got {value}"));
        }
        if !(self.stamina_floor > 0.0 && self.stamina_floor <= 1.0) {
            return Err(anyhow!(
                "model.stamina_floor must be in (0, 1], got {}",
                self.stamina_floor
            ));
        }
        if self.base_fatigue_min < 0.0 || self.base_fatigue_min > self.base_fatigue_max {
            return Err(anyhow!(
                "model.base_fatigue_min ({}) must be >= 0 and <= base_fatigue_max ({})",
                self.base_fatigue_min,
                self.base_fatigue_max
            ));
        }
        if self.base_hazard < 0.0 {
            return Err(anyhow!("model.base_hazard must be >= 0, got {}", self.base_hazard));
        }
        if self.value_scale <= 0.0 {
            return Err(anyhow!("model.value_scale must be > 0, got {}", self.value_scale));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_fatigue_min: default_base_fatigue_min(),
            base_fatigue_max: default_base_fatigue_max(),
            fatigue_seed: String::new(),
            stamina_floor: default_stamina_floor(),
            base_hazard: default_base_hazard(),
            value_scale: default_value_scale(),
            reference_wbgt: default_wbgt(),
            heat_penalty_per_10c: default_heat_penalty(),
            altitude_penalty_per_1000m: default_altitude_penalty(),
            physicality_reference: default_physicality_reference(),
            physicality_slope: default_physicality_slope(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            policy: InputPolicy::default(),
            max_wbgt: default_max_wbgt(),
            max_altitude_m: default_max_altitude(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_minute() -> u32 {
    65
}

fn default_wbgt() -> f64 {
    25.0
}

fn default_risk_aversion() -> f64 {
    1.0
}

fn default_base_fatigue_min() -> f64 {
    0.005
}

fn default_base_fatigue_max() -> f64 {
    0.008
}

fn default_stamina_floor() -> f64 {
    0.01
}

fn default_base_hazard() -> f64 {
    0.0001
}

fn default_value_scale() -> f64 {
    1000.0
}

fn default_heat_penalty() -> f64 {
    0.5
}

fn default_altitude_penalty() -> f64 {
    0.1
}

fn default_physicality_reference() -> f64 {
    75.0
}

fn default_physicality_slope() -> f64 {
    0.01
}

fn default_max_wbgt() -> f64 {
    50.0
}

fn default_max_altitude() -> f64 {
    5000.0
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3001
}
