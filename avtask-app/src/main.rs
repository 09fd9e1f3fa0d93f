mod app;
mod audio;

use std::path::Path;
use std::process;

use avtask_core::ResponseMode;
use avtask_experiment::{
    CONFIG_EXIT_CODE, CONFIG_FILE, ExperimentConfig, ExperimentResult, ResultsRecorder,
    SessionRunner, TrialSampler, scan_categories, validate_trials,
};
use avtask_render::SkiaSurface;
use avtask_sheets::XlsxStore;
use avtask_timing::HighPrecisionTimer;

use crate::app::WindowFrontend;
use crate::audio::RodioPlayer;

/// Two-option sessions answer with the arrow keys, four-option sessions with
/// the digit keys.
const RESPONSE_MODE: ResponseMode = ResponseMode::FourOption;

fn main() -> anyhow::Result<()> {
    println!("=== AUDIO-VISUAL MATCHING EXPERIMENT ===");
    println!("Platform: {}", std::env::consts::OS);
    println!("Architecture: {}", std::env::consts::ARCH);
    println!("Press SPACE to advance or ESC to exit.\n");

    match run() {
        Ok(()) => Ok(()),
        Err(err) if err.is_quit() => {
            println!("\nSession ended by the participant.");
            process::exit(0);
        }
        Err(err) if err.is_configuration() => {
            eprintln!("Configuration error: {err}");
            process::exit(CONFIG_EXIT_CODE);
        }
        Err(err) => Err(err.into()),
    }
}

fn run() -> ExperimentResult<()> {
    let config = ExperimentConfig::load_or_default(Path::new(CONFIG_FILE), RESPONSE_MODE)?;
    let mut rng = rand::rng();

    let pools = scan_categories(&config.trials_root)?;
    let trials = TrialSampler::from_config(&config).sample(pools, &mut rng)?;
    validate_trials(&config, &trials)?;
    println!("Selected {} trials", trials.len());

    let store = XlsxStore::new(&config.results_file);
    let mut recorder = ResultsRecorder::open(store, &config.participant_tag)?;
    println!("Participant: {}", recorder.participant_id());

    let font = match &config.font_path {
        Some(path) => SkiaSurface::load_font(path)?,
        None => SkiaSurface::bundled_font()?,
    };
    let (surface, input) = WindowFrontend::open(font)?.split();
    let audio = RodioPlayer::new()?;
    let results_file = config.results_file.clone();

    let mut runner = SessionRunner::new(config, surface, input, audio, HighPrecisionTimer::new(), rng);
    let outcome = runner.run(&trials, &mut recorder);
    runner.shutdown();
    outcome?;

    println!("\nExperiment completed.");
    println!("Results saved to {}. Thank you!", results_file.display());
    Ok(())
}
