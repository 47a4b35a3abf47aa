//! Simulation configuration structures and loaders.
use std::env;
use std::path::PathBuf;

/// Settings for one simulation run.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Driver frames per simulated second.
    pub frame_rate: f32,
    /// Frames to run before stopping.
    pub frames: u32,
    /// Seed for scene generation.
    pub seed: u64,
    /// Directory for log files and event dumps. `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60.0,
            frames: 600,
            seed: 7,
            log_dir: None,
        }
    }
}

impl SimulationConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SIM_FRAME_RATE` - frames per second (default: 60, minimum 1)
    /// - `SIM_FRAMES` - frames to run (default: 600)
    /// - `SIM_SEED` - scene seed (default: 7)
    /// - `SIM_LOG_DIR` - log directory (default: none)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(rate) = read_var::<f32>(&lookup, "SIM_FRAME_RATE") {
            if rate.is_finite() {
                config.frame_rate = rate.max(1.0);
            }
        }

        if let Some(frames) = read_var::<u32>(&lookup, "SIM_FRAMES") {
            config.frames = frames;
        }

        if let Some(seed) = read_var::<u64>(&lookup, "SIM_SEED") {
            config.seed = seed;
        }

        if let Some(dir) = lookup("SIM_LOG_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        config
    }

    /// Seconds per frame.
    pub fn dt(&self) -> f32 {
        1.0 / self.frame_rate
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
