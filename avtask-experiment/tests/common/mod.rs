#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Result, bail};
use avtask_core::{
    Anchor, AudioPlayer, InputEvent, InputSource, Key, Repeat, ResponseKeyMap, ResponseMode,
    Surface,
};
use avtask_experiment::ExperimentConfig;
use avtask_timing::ManualTimer;

pub const SCREEN: (u32, u32) = (1000, 750);

#[derive(Debug, Clone, PartialEq)]
pub enum Draw {
    Clear,
    Image {
        name: String,
        pos: (f32, f32),
        anchor: Anchor,
    },
    Text {
        text: String,
        pos: (f32, f32),
    },
    Present,
}

pub type DrawLog = Rc<RefCell<Vec<Draw>>>;

/// Surface that writes every draw call to a shared log. Images are
/// represented by their file name.
pub struct RecordingSurface {
    pub log: DrawLog,
}

impl Surface for RecordingSurface {
    type Image = String;

    fn size(&self) -> (u32, u32) {
        SCREEN
    }

    fn load_image(&mut self, path: &Path, _size: (u32, u32)) -> Result<String> {
        Ok(path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }

    fn clear(&mut self) {
        self.log.borrow_mut().push(Draw::Clear);
    }

    fn blit_image(&mut self, image: &String, pos: (f32, f32), anchor: Anchor) {
        self.log.borrow_mut().push(Draw::Image {
            name: image.clone(),
            pos,
            anchor,
        });
    }

    fn blit_text(&mut self, text: &str, _size: f32, _color: [u8; 4], pos: (f32, f32), _a: Anchor) {
        self.log.borrow_mut().push(Draw::Text {
            text: text.to_string(),
            pos,
        });
    }

    fn present(&mut self) -> Result<()> {
        self.log.borrow_mut().push(Draw::Present);
        Ok(())
    }
}

/// Image names drawn since the last clear.
pub fn current_frame_images(log: &DrawLog) -> Vec<String> {
    let log = log.borrow();
    let start = log.iter().rposition(|d| *d == Draw::Clear).map_or(0, |i| i + 1);
    log[start..]
        .iter()
        .filter_map(|d| match d {
            Draw::Image { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Keyboard that replays scripted events first, then answers trial screens
/// by inspecting the frame on display. Each event advances the clock by
/// `latency`.
pub struct OracleInput {
    pub log: DrawLog,
    pub timer: ManualTimer,
    pub latency: Duration,
    pub keymap: ResponseKeyMap,
    pub script: VecDeque<InputEvent>,
    /// Whether to answer each trial correctly; missing entries answer correctly.
    pub answers: VecDeque<bool>,
    /// Times the runner asked for stale key presses to be dropped.
    pub discards: usize,
}

impl InputSource for OracleInput {
    fn next_event(&mut self) -> Result<InputEvent> {
        self.timer.advance(self.latency);
        if let Some(event) = self.script.pop_front() {
            return Ok(event);
        }

        let images = current_frame_images(&self.log);
        if images.len() < 2 {
            return Ok(InputEvent::Key(Key::Space));
        }
        let Some(correct) = images.iter().position(|n| n.contains('1')).map(|i| i + 1) else {
            bail!("no marked image on screen");
        };
        let index = if self.answers.pop_front().unwrap_or(true) {
            correct
        } else {
            correct % images.len() + 1
        };
        match self.keymap.key_for(index) {
            Some(key) => Ok(InputEvent::Key(key)),
            None => bail!("no key for position {index}"),
        }
    }

    fn discard_pending(&mut self) {
        self.discards += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCall {
    Play(String, Repeat),
    Stop,
    Volume(f32),
}

pub struct RecordingAudio {
    pub calls: Rc<RefCell<Vec<AudioCall>>>,
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, path: &Path, repeat: Repeat) -> Result<()> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.calls.borrow_mut().push(AudioCall::Play(name, repeat));
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push(AudioCall::Stop);
    }

    fn set_volume(&mut self, level: f32) {
        self.calls.borrow_mut().push(AudioCall::Volume(level));
    }
}

/// Builds `<root>/<category>/<category>_t<i>/` trial folders.
pub fn build_trials(root: &Path, mode: ResponseMode, categories: &[(&str, usize)]) {
    let foils = ["foil_a.png", "foil_b.png", "foil_c.png"];
    for &(category, count) in categories {
        for i in 0..count {
            let dir = root.join(category).join(format!("{category}_t{i}"));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("target1.png"), b"").unwrap();
            for foil in &foils[..mode.option_count() - 1] {
                fs::write(dir.join(foil), b"").unwrap();
            }
            fs::write(dir.join("cue.wav"), b"").unwrap();
        }
    }
    fs::write(root.join("thank_you.png"), b"").unwrap();
    fs::write(root.join("instructions.png"), b"").unwrap();
    fs::write(root.join("audio_tuning.wav"), b"").unwrap();
}

pub fn config(root: &Path, mode: ResponseMode, counts: Vec<usize>) -> ExperimentConfig {
    ExperimentConfig {
        category_counts: counts,
        trials_root: root.to_path_buf(),
        cue_image: PathBuf::from("hands.jpg"),
        ..ExperimentConfig::for_mode(mode)
    }
}
