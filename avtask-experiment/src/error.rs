//! Error types for running a session.

use std::fmt;
use std::path::PathBuf;

use avtask_core::Trial;

/// Result type for session operations.
pub type ExperimentResult<T> = Result<T, ExperimentError>;

/// Process exit status for configuration errors.
pub const CONFIG_EXIT_CODE: i32 = 10;

#[derive(Debug)]
#[non_exhaustive]
pub enum ExperimentError {
    /// A category holds fewer trials than requested and duplicates are off.
    InsufficientTrials {
        category: String,
        requested: usize,
        available: usize,
    },

    /// More category counts are configured than category folders exist.
    MissingCategories { configured: usize, found: usize },

    /// A trial folder does not have the expected contents.
    InvalidTrial { trial: Trial, defect: TrialDefect },

    /// Configuration file could not be parsed.
    Config {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Filesystem access under the trials directory failed.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A display, input, audio or spreadsheet implementation failed.
    Collaborator(anyhow::Error),

    /// The participant asked to quit.
    Quit,
}

/// What is wrong with a trial folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialDefect {
    /// Number of images whose name carries the correct marker, if not one.
    CorrectStimulus { found: usize },
    ImageCount { expected: usize, found: usize },
    AudioCount { found: usize },
}

impl ExperimentError {
    /// Misconfiguration the operator has to fix before running again.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InsufficientTrials { .. }
                | Self::MissingCategories { .. }
                | Self::InvalidTrial { .. }
                | Self::Config { .. }
        )
    }

    pub fn is_quit(&self) -> bool {
        matches!(self, Self::Quit)
    }
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientTrials {
                category,
                requested,
                available,
            } => write!(
                f,
                "duplicates are not allowed: asking for {requested} trials when there are {available} available in {category}"
            ),
            Self::MissingCategories { configured, found } => write!(
                f,
                "{configured} category counts configured but only {found} category folders found"
            ),
            Self::InvalidTrial { trial, defect } => write!(f, "trial {trial}: {defect}"),
            Self::Config { path, source } => {
                write!(f, "invalid configuration in {}: {source}", path.display())
            }
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Collaborator(err) => write!(f, "{err:#}"),
            Self::Quit => write!(f, "quit requested"),
        }
    }
}

impl fmt::Display for TrialDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CorrectStimulus { found } => write!(
                f,
                "expected exactly one correct stimulus, found {found}"
            ),
            Self::ImageCount { expected, found } => {
                write!(f, "expected {expected} images, found {found}")
            }
            Self::AudioCount { found } => write!(f, "expected one audio file, found {found}"),
        }
    }
}

impl std::error::Error for ExperimentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::Collaborator(err) => Some(&**err),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for ExperimentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Collaborator(err)
    }
}
