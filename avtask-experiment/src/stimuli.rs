use std::path::Path;

use avtask_core::Trial;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::list_files;
use crate::config::ExperimentConfig;
use crate::error::{ExperimentError, ExperimentResult, TrialDefect};

const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];
const AUDIO_EXTENSIONS: [&str; 4] = ["wav", "ogg", "mp3", "flac"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileKind {
    Image,
    Audio,
    Other,
}

fn classify(name: &str) -> FileKind {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Image
    } else if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        FileKind::Audio
    } else {
        FileKind::Other
    }
}

/// Stimulus files of one trial folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialContents {
    images: Vec<String>,
    audio: String,
    marker: String,
}

/// Images in display order and where the correct one ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub images: Vec<String>,
    /// 1-based display position of the correct image.
    pub correct_index: usize,
}

impl TrialContents {
    pub fn scan(
        dir: &Path,
        trial: &Trial,
        option_count: usize,
        marker: &str,
    ) -> ExperimentResult<Self> {
        Self::from_files(trial, list_files(dir)?, option_count, marker)
    }

    /// Sorts `files` into images and audio and checks the folder is usable:
    /// `option_count` images, one of them marked correct, and one audio cue.
    pub fn from_files(
        trial: &Trial,
        files: Vec<String>,
        option_count: usize,
        marker: &str,
    ) -> ExperimentResult<Self> {
        let invalid = |defect| ExperimentError::InvalidTrial {
            trial: trial.clone(),
            defect,
        };

        let mut images = Vec::new();
        let mut audio = Vec::new();
        for file in files {
            match classify(&file) {
                FileKind::Image => images.push(file),
                FileKind::Audio => audio.push(file),
                FileKind::Other => {}
            }
        }

        if images.len() != option_count {
            return Err(invalid(TrialDefect::ImageCount {
                expected: option_count,
                found: images.len(),
            }));
        }
        let marked = images.iter().filter(|name| name.contains(marker)).count();
        if marked != 1 {
            return Err(invalid(TrialDefect::CorrectStimulus { found: marked }));
        }
        if audio.len() != 1 {
            return Err(invalid(TrialDefect::AudioCount { found: audio.len() }));
        }

        Ok(Self {
            images,
            audio: audio.remove(0),
            marker: marker.to_string(),
        })
    }

    /// Image file names; exactly one contains the correct marker.
    pub fn images(&self) -> &[String] {
        &self.images
    }

    pub fn audio(&self) -> &str {
        &self.audio
    }

    /// Shuffles the images into display order.
    pub fn arrange<R: Rng>(&self, rng: &mut R) -> Arrangement {
        let mut images = self.images.clone();
        images.shuffle(rng);
        let correct_index = correct_position(&images, &self.marker)
            .expect("validated contents hold one marked image");
        Arrangement {
            images,
            correct_index,
        }
    }
}

/// Scans every selected trial folder and checks its contents.
pub fn validate_trials(config: &ExperimentConfig, trials: &[Trial]) -> ExperimentResult<()> {
    for trial in trials {
        TrialContents::scan(
            &config.trial_dir(trial),
            trial,
            config.mode.option_count(),
            &config.correct_marker,
        )?;
    }
    Ok(())
}

/// 1-based position of the first image whose name contains `marker`.
pub fn correct_position(images: &[String], marker: &str) -> Option<usize> {
    images
        .iter()
        .position(|name| name.contains(marker))
        .map(|i| i + 1)
}
