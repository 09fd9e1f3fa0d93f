use std::path::Path;

use avtask_core::layout::{GRAY, PINK};
use avtask_core::{Anchor, AudioPlayer, InputSource, Key, Repeat, Surface};
use avtask_timing::Timer;
use rand::Rng;

use crate::error::ExperimentResult;
use crate::session::SessionRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TuningKey {
    Louder,
    Quieter,
    Done,
}

impl<S, I, A, T, R> SessionRunner<S, I, A, T, R>
where
    S: Surface,
    I: InputSource,
    A: AudioPlayer,
    T: Timer,
    R: Rng,
{
    /// Full-screen image that stays up until space is pressed.
    pub fn show_image_screen(&mut self, path: &Path) -> ExperimentResult<()> {
        let image = self.surface.load_image(path, self.surface.size())?;
        self.surface.clear();
        self.surface.blit_image(&image, (0.0, 0.0), Anchor::TopLeft);
        self.surface.present()?;

        self.await_key(|key| (key == Key::Space).then_some(()))?;
        self.surface.clear();
        Ok(())
    }

    /// Loops the tuning sound while the participant sets the volume with
    /// the up and down keys. Space accepts the level.
    pub fn audio_tuning(&mut self) -> ExperimentResult<()> {
        self.audio.set_volume(self.volume_level());
        self.audio
            .play(&self.config.tuning_audio_path(), Repeat::Forever)?;

        loop {
            self.draw_tuning_screen()?;
            let key = self.await_key(|key| match key {
                Key::Up | Key::Right => Some(TuningKey::Louder),
                Key::Down | Key::Left => Some(TuningKey::Quieter),
                Key::Space => Some(TuningKey::Done),
                _ => None,
            })?;
            match key {
                TuningKey::Louder => self.volume = (self.volume + 1).min(100),
                TuningKey::Quieter => self.volume = self.volume.saturating_sub(1),
                TuningKey::Done => break,
            }
            self.audio.set_volume(self.volume_level());
        }

        self.audio.stop();
        self.surface.clear();
        println!("Volume set to {}", self.volume);
        Ok(())
    }

    /// Current tuning volume, 0..=100.
    pub fn volume(&self) -> u8 {
        self.volume
    }

    fn volume_level(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    fn draw_tuning_screen(&mut self) -> ExperimentResult<()> {
        let (w, h) = self.surface.size();
        let (w, h) = (w as f32, h as f32);
        let size = self.config.font_size;

        self.surface.clear();
        self.surface
            .blit_text("Audio Tuning", size, PINK, (w / 2.0, h / 3.0), Anchor::Center);
        self.surface.blit_text(
            &format!("Volume: {}", self.volume),
            size / 2.0,
            GRAY,
            (w / 2.0, 4.0 * h / 7.0),
            Anchor::Center,
        );
        self.surface.blit_text(
            "Press Space to continue",
            size / 2.0,
            GRAY,
            (w / 2.0, 5.0 * h / 6.0),
            Anchor::Center,
        );
        self.surface.present()?;
        Ok(())
    }
}
