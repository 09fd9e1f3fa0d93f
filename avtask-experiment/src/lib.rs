pub mod catalog;
pub mod config;
pub mod error;
pub mod recorder;
pub mod sampler;
pub mod screens;
pub mod session;
pub mod stimuli;

pub use catalog::{CategoryPool, scan_categories};
pub use config::{CONFIG_FILE, ExperimentConfig};
pub use error::{CONFIG_EXIT_CODE, ExperimentError, ExperimentResult, TrialDefect};
pub use recorder::ResultsRecorder;
pub use sampler::TrialSampler;
pub use session::SessionRunner;
pub use stimuli::{Arrangement, TrialContents, validate_trials};
