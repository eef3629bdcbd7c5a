use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::eyre::{WrapErr, bail};
use cube_core::method::{SolutionStep, beginner_steps, full_solution};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Settings read from `config.toml`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Milliseconds per move when stepping through a solution or turning by
    /// hand.
    pub move_ms: u64,
    /// Milliseconds per move while scrambling.
    pub scramble_ms: u64,
    /// Redraws per second while a layer is turning.
    pub frame_rate: u32,
    pub solver: SolverConfig,
    /// Replaces the built in beginner method.
    pub steps: Option<Vec<SolutionStep>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// The two-phase solver executable.
    pub command: String,
    pub args: Vec<String>,
    /// Where the solver may dump its pruning tables. Defaults to a directory
    /// in the user cache.
    pub tables_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            move_ms: 400,
            scramble_ms: 20,
            frame_rate: 60,
            solver: SolverConfig::default(),
            steps: None,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            command: "twophase".to_owned(),
            args: ["-c", "-m", "30"].map(str::to_owned).to_vec(),
            tables_dir: None,
        }
    }
}

impl Config {
    /// `$CONFIG_DIR/cubist/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cubist").join("config.toml"))
    }

    /// Reads `path`, or the default file if no path is given. A missing
    /// default file yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> color_eyre::Result<Config> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Config::default_path() {
                Some(path) => (path, false),
                None => return Ok(Config::default()),
            },
        };

        if !required && !path.exists() {
            debug!(target: "config", "No configuration at {}; using defaults", path.display());
            return Ok(Config::default());
        }

        let text = fs::read_to_string(&path)
            .wrap_err_with(|| format!("Failed to read configuration file {}", path.display()))?;
        let config = Config::parse(&text)
            .wrap_err_with(|| format!("Invalid configuration file {}", path.display()))?;

        info!(target: "config", "Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> color_eyre::Result<Config> {
        let config = toml::from_str::<Config>(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> color_eyre::Result<()> {
        if self.frame_rate == 0 {
            bail!("`frame_rate` must be at least 1");
        }

        if let Some(steps) = &self.steps {
            if steps.is_empty() {
                bail!("`steps` must contain at least one step");
            }
            full_solution(steps).wrap_err("A step's algorithm is not valid notation")?;
        }

        Ok(())
    }

    #[must_use]
    pub fn move_duration(&self) -> Duration {
        Duration::from_millis(self.move_ms)
    }

    #[must_use]
    pub fn scramble_duration(&self) -> Duration {
        Duration::from_millis(self.scramble_ms)
    }

    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }

    #[must_use]
    pub fn steps(&self) -> Vec<SolutionStep> {
        self.steps.clone().unwrap_or_else(beginner_steps)
    }
}
