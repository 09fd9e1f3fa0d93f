use std::time::Duration;

use avtask_core::layout::{DARK_TEAL, scaled_size};
use avtask_core::{
    Anchor, AudioPlayer, InputEvent, InputSource, Key, OptionLayout, Phase, Repeat, Response,
    ResponseKeyMap, SessionPhase, SessionStats, SessionSummary, SpreadsheetStore, Surface, Trial,
    TrialState,
};
use avtask_timing::Timer;
use rand::Rng;

use crate::config::ExperimentConfig;
use crate::error::{ExperimentError, ExperimentResult};
use crate::recorder::{ResultsRecorder, format_seconds};
use crate::stimuli::{TrialContents, validate_trials};

/// Drives one participant through the session screens and trials.
///
/// Everything a session touches is owned here: the configuration, the key
/// map, running stats and the display, input, audio, clock and RNG.
pub struct SessionRunner<S, I, A, T, R>
where
    S: Surface,
    I: InputSource,
    A: AudioPlayer,
    T: Timer,
    R: Rng,
{
    phase: SessionPhase,
    pub config: ExperimentConfig,
    pub keymap: ResponseKeyMap,
    pub stats: SessionStats,
    pub surface: S,
    pub input: I,
    pub audio: A,
    pub timer: T,
    pub rng: R,
    pub(crate) volume: u8,
    state: TrialState,
    cue: Option<S::Image>,
}

impl<S, I, A, T, R> SessionRunner<S, I, A, T, R>
where
    S: Surface,
    I: InputSource,
    A: AudioPlayer,
    T: Timer,
    R: Rng,
{
    pub fn new(config: ExperimentConfig, surface: S, input: I, audio: A, timer: T, rng: R) -> Self {
        Self {
            phase: SessionPhase::default(),
            keymap: ResponseKeyMap::for_mode(config.mode),
            volume: config.initial_volume.min(100),
            config,
            stats: SessionStats::default(),
            surface,
            input,
            audio,
            timer,
            rng,
            state: TrialState::Complete,
            cue: None,
        }
    }

    pub fn current_phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn trial_state(&self) -> TrialState {
        self.state
    }

    pub fn advance_phase(&mut self) -> bool {
        match self.phase.next() {
            Some(next) => {
                self.phase = next;
                println!("Entering {:?}", next);
                true
            }
            None => false,
        }
    }

    /// Checks every selected trial folder before the participant starts.
    pub fn validate(&self, trials: &[Trial]) -> ExperimentResult<()> {
        validate_trials(&self.config, trials)
    }

    /// Runs every phase from the current one through the summary.
    pub fn run<St: SpreadsheetStore>(
        &mut self,
        trials: &[Trial],
        recorder: &mut ResultsRecorder<St>,
    ) -> ExperimentResult<SessionSummary> {
        loop {
            match self.phase {
                SessionPhase::Welcome => {
                    let path = self.config.welcome_image_path();
                    self.show_image_screen(&path)?;
                }
                SessionPhase::AudioTuning => self.audio_tuning()?,
                SessionPhase::Instructions => {
                    let path = self.config.instructions_image_path();
                    self.show_image_screen(&path)?;
                }
                SessionPhase::Trials => self.run_trials(trials, recorder)?,
                SessionPhase::Summary => return self.finish(recorder),
            }
            self.advance_phase();
        }
    }

    /// Presents, awaits, scores and records each trial in order.
    pub fn run_trials<St: SpreadsheetStore>(
        &mut self,
        trials: &[Trial],
        recorder: &mut ResultsRecorder<St>,
    ) -> ExperimentResult<()> {
        let size = scaled_size(self.surface.size(), self.config.image_scaling);
        self.cue = Some(self.surface.load_image(&self.config.cue_image, size)?);

        for (n, trial) in trials.iter().enumerate() {
            println!("Trial {}/{}: {}", n + 1, trials.len(), trial);
            let response = self.run_trial(trial)?;
            recorder.record(&response)?;
            self.feedback()?;
        }
        Ok(())
    }

    /// Presenting, AwaitingResponse and Scoring for one trial.
    pub fn run_trial(&mut self, trial: &Trial) -> ExperimentResult<Response> {
        self.state = TrialState::Presenting;
        let dir = self.config.trial_dir(trial);
        let contents = TrialContents::scan(
            &dir,
            trial,
            self.config.mode.option_count(),
            &self.config.correct_marker,
        )?;
        let arrangement = contents.arrange(&mut self.rng);

        let layout = OptionLayout::new(
            self.config.mode,
            self.surface.size(),
            self.config.image_scaling,
        );
        let mut images = Vec::with_capacity(arrangement.images.len());
        for name in &arrangement.images {
            images.push(self.surface.load_image(&dir.join(name), layout.image_size)?);
        }

        self.surface.clear();
        for (image, &pos) in images.iter().zip(&layout.image_positions) {
            self.surface.blit_image(image, pos, Anchor::TopLeft);
        }
        for (label, &pos) in self.config.mode.labels().iter().zip(&layout.label_positions) {
            self.surface
                .blit_text(label, self.config.font_size, DARK_TEAL, pos, Anchor::TopLeft);
        }
        self.surface.present()?;

        self.audio.play(&dir.join(contents.audio()), Repeat::Once)?;
        self.input.discard_pending();
        let start = self.timer.now();

        self.state = TrialState::AwaitingResponse;
        let chosen = self.await_response()?;

        self.state = TrialState::Scoring;
        let reaction_time = self.timer.elapsed(start).as_secs_f64();
        let response = Response::new(trial.clone(), reaction_time, chosen, arrangement.correct_index);
        self.stats.record(&response);
        self.audio.stop();

        println!(
            "Trial {} - Reaction Time: {:.2}s, {}",
            trial,
            response.reaction_time_s,
            response.answer_label()
        );
        Ok(response)
    }

    /// Shows the cue image for the configured pause.
    pub fn feedback(&mut self) -> ExperimentResult<()> {
        self.state = TrialState::Feedback;
        self.surface.clear();
        if let Some(cue) = &self.cue {
            let center = OptionLayout::center(self.surface.size());
            self.surface.blit_image(cue, center, Anchor::Center);
        }
        self.surface.present()?;
        self.timer
            .sleep(Duration::from_millis(self.config.feedback_pause_ms));
        self.state = TrialState::Complete;
        Ok(())
    }

    /// Blocks until a key `accept` maps to a value, or quit.
    ///
    /// Keys `accept` rejects are ignored. Quit stops audio and yields
    /// `ExperimentError::Quit`.
    pub fn await_key<V, F>(&mut self, mut accept: F) -> ExperimentResult<V>
    where
        F: FnMut(Key) -> Option<V>,
    {
        loop {
            match self.input.next_event()? {
                InputEvent::Quit => {
                    self.audio.stop();
                    return Err(ExperimentError::Quit);
                }
                InputEvent::Key(key) => {
                    if let Some(value) = accept(key) {
                        return Ok(value);
                    }
                }
            }
        }
    }

    /// Waits for a key in the response key map and returns its position.
    pub fn await_response(&mut self) -> ExperimentResult<usize> {
        let keymap = self.keymap.clone();
        self.await_key(|key| keymap.index_of(key))
    }

    fn finish<St: SpreadsheetStore>(
        &mut self,
        recorder: &mut ResultsRecorder<St>,
    ) -> ExperimentResult<SessionSummary> {
        let summary = self.stats.finalize();
        println!(
            "Stats - Average Reaction Time: {}, Accuracy: {}/{}",
            format_seconds(summary.average_reaction_s),
            summary.correct,
            summary.trials_completed
        );
        recorder.finish(&summary)?;
        Ok(summary)
    }

    /// Stops anything still playing.
    pub fn shutdown(&mut self) {
        self.audio.stop();
    }
}
