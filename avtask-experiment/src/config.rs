use std::fs;
use std::path::{Path, PathBuf};

use avtask_core::ResponseMode;
use serde::{Deserialize, Serialize};

use crate::error::{ExperimentError, ExperimentResult};

/// Optional overrides, read from the working directory.
pub const CONFIG_FILE: &str = "avtask.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub mode: ResponseMode,
    /// Trials to draw from each category folder, in category name order.
    pub category_counts: Vec<usize>,
    pub allow_duplicates: bool,
    /// Stimulus size is the screen size divided by this, per axis.
    pub image_scaling: (u32, u32),
    pub trials_root: PathBuf,
    pub results_file: PathBuf,
    pub cue_image: PathBuf,
    pub welcome_image: String,
    pub instructions_image: String,
    pub tuning_audio: String,
    pub feedback_pause_ms: u64,
    /// Label font; the bundled DejaVu Sans when unset.
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub participant_tag: String,
    pub correct_marker: String,
    /// Starting level of the tuning screen, 0..=100.
    pub initial_volume: u8,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::for_mode(ResponseMode::default())
    }
}

impl ExperimentConfig {
    pub fn for_mode(mode: ResponseMode) -> Self {
        let (category_counts, trials_root, results_file) = match mode {
            ResponseMode::TwoOption => (vec![2, 1], "2_option_trials", "results_2_option.xlsx"),
            ResponseMode::FourOption => (
                vec![2, 1, 1, 1],
                "4_option_trials",
                "results_4_option.xlsx",
            ),
        };
        Self {
            mode,
            category_counts,
            allow_duplicates: false,
            image_scaling: (5, 5),
            trials_root: PathBuf::from(trials_root),
            results_file: PathBuf::from(results_file),
            cue_image: PathBuf::from("hands.jpg"),
            welcome_image: "thank_you.png".to_string(),
            instructions_image: "instructions.png".to_string(),
            tuning_audio: "audio_tuning.wav".to_string(),
            feedback_pause_ms: 2000,
            font_path: None,
            font_size: 132.0,
            participant_tag: "TAG".to_string(),
            correct_marker: "1".to_string(),
            initial_volume: 50,
        }
    }

    /// Defaults for `mode`, replaced by the contents of `path` when it exists.
    pub fn load_or_default(path: &Path, mode: ResponseMode) -> ExperimentResult<Self> {
        if !path.exists() {
            return Ok(Self::for_mode(mode));
        }
        let text = fs::read_to_string(path).map_err(|source| ExperimentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ExperimentError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn total_trials(&self) -> usize {
        self.category_counts.iter().sum()
    }

    pub fn trial_dir(&self, trial: &avtask_core::Trial) -> PathBuf {
        self.trials_root.join(&trial.category).join(&trial.folder)
    }

    pub fn welcome_image_path(&self) -> PathBuf {
        self.trials_root.join(&self.welcome_image)
    }

    pub fn instructions_image_path(&self) -> PathBuf {
        self.trials_root.join(&self.instructions_image)
    }

    pub fn tuning_audio_path(&self) -> PathBuf {
        self.trials_root.join(&self.tuning_audio)
    }
}
