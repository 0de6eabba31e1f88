// Copyright @yucwang 2026

use crate::math::constants::Float;
use std::fmt;
use std::str::FromStr;

/// Which estimator a camera ray goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightingMode {
    /// Single-bounce direct illumination.
    Direct,
    /// Direct illumination accumulated along a multi-bounce path.
    Total,
}

/// How the path multiplier decays between bounces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAttenuation {
    /// Flat factor 0.5 per bounce. Biased but stable; matches the reference
    /// renderer output.
    Halve,
    /// Multiply by `f * |cos| / pdf` and terminate with Russian roulette.
    Throughput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, value: String },
    UnknownMode(String),
    UnknownAttenuation(String),
    UnknownFlag(String),
    MissingValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { field, value } =>
                write!(f, "invalid value '{}' for {}", value, field),
            ConfigError::UnknownMode(s) =>
                write!(f, "unknown lighting mode '{}' (expected direct or total)", s),
            ConfigError::UnknownAttenuation(s) =>
                write!(f, "unknown attenuation '{}' (expected halve or throughput)", s),
            ConfigError::UnknownFlag(s) => write!(f, "unknown flag '{}'", s),
            ConfigError::MissingValue(s) => write!(f, "flag '{}' expects a value", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl FromStr for LightingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "direct" => Ok(LightingMode::Direct),
            "total" => Ok(LightingMode::Total),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl FromStr for BounceAttenuation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "halve" => Ok(BounceAttenuation::Halve),
            "throughput" => Ok(BounceAttenuation::Throughput),
            _ => Err(ConfigError::UnknownAttenuation(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegratorConfig {
    /// Entry depth budget; checked once when a trace starts.
    pub max_depth: u32,
    /// Indirect bounces followed by the total-lighting loop.
    pub bounce_limit: u32,
    pub mode: LightingMode,
    pub attenuation: BounceAttenuation,
    /// Distance secondary rays are pushed off the surface.
    pub ray_offset: Float,
    /// First bounce at which Russian roulette may end a path (throughput mode).
    pub russian_roulette_start: u32,
    pub samples_per_pixel: u32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            bounce_limit: 5,
            mode: LightingMode::Direct,
            attenuation: BounceAttenuation::Halve,
            ray_offset: 1e-3,
            russian_roulette_start: 3,
            samples_per_pixel: 16,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ray_offset > 0.0 && self.ray_offset.is_finite()) {
            return Err(ConfigError::InvalidValue {
                field: "ray_offset",
                value: self.ray_offset.to_string(),
            });
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::InvalidValue {
                field: "samples_per_pixel",
                value: String::from("0"),
            });
        }
        Ok(())
    }
}

/// Everything the command line controls.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub integrator: IntegratorConfig,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    /// Image mapped onto the back wall of the built-in scene.
    pub texture: Option<String>,
    /// Arguments that are not flags, in order.
    pub positional: Vec<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::default(),
            seed: 0,
            width: 256,
            height: 256,
            texture: None,
            positional: Vec::new(),
        }
    }
}

fn parse_value<T: FromStr>(field: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue { field, value: value.to_string() })
}

impl RenderOptions {
    /// Parses `--spp`, `--max-depth`, `--bounces`, `--mode`, `--attenuation`,
    /// `--seed`, `--width`, `--height` and `--texture`. `args` excludes the
    /// program name.
    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut options = RenderOptions::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if !arg.starts_with("--") {
                options.positional.push(arg.clone());
                continue;
            }
            let value = iter.next().ok_or_else(|| ConfigError::MissingValue(arg.clone()))?;
            let config = &mut options.integrator;
            match arg.as_str() {
                "--spp" => config.samples_per_pixel = parse_value("spp", value)?,
                "--max-depth" => config.max_depth = parse_value("max-depth", value)?,
                "--bounces" => config.bounce_limit = parse_value("bounces", value)?,
                "--mode" => config.mode = value.parse()?,
                "--attenuation" => config.attenuation = value.parse()?,
                "--seed" => options.seed = parse_value("seed", value)?,
                "--width" => options.width = parse_value("width", value)?,
                "--height" => options.height = parse_value("height", value)?,
                "--texture" => options.texture = Some(value.clone()),
                _ => return Err(ConfigError::UnknownFlag(arg.clone())),
            }
        }
        options.integrator.validate()?;
        Ok(options)
    }
}
