use serde::Deserialize;

use crate::solver::SolverParams;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub physics: PhysicsConfig,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub nx: usize,
    pub ny: usize,
    pub x_len: f64,
    pub y_len: f64,
}

/// Optional overrides applied on top of the selected model's defaults;
/// absent keys leave the defaults alone.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub c: Option<f64>,
    pub nu: Option<f64>,
    pub dt: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub nt: usize,
    pub steps_per_frame: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            physics: PhysicsConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { nx: 41, ny: 41, x_len: 2.0, y_len: 2.0 }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self { c: None, nu: None, dt: None }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { nt: 25, steps_per_frame: 1 }
    }
}

impl PhysicsConfig {
    /// Overlay the configured coefficients onto `params`.
    pub fn apply(&self, params: &mut SolverParams) {
        if let Some(c) = self.c {
            params.c = c;
        }
        if let Some(nu) = self.nu {
            params.nu = nu;
        }
        if let Some(dt) = self.dt {
            params.dt = dt;
        }
    }
}

pub fn load() -> Config {
    let path = std::path::Path::new("convarium.yaml");
    if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("Warning: failed to parse convarium.yaml: {e}; using defaults");
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: failed to read convarium.yaml: {e}; using defaults");
                Config::default()
            }
        }
    } else {
        Config::default()
    }
}
