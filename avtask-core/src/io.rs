//! Seams to the collaborators a session drives: the display, the keyboard
//! and the audio output. Implementations live outside this crate.

use std::path::Path;

use anyhow::Result;

use crate::keys::InputEvent;
use crate::layout::Anchor;

/// Drawing target for experiment screens
pub trait Surface {
    type Image;

    fn size(&self) -> (u32, u32);
    /// Loads an image file scaled to exactly `size`.
    fn load_image(&mut self, path: &Path, size: (u32, u32)) -> Result<Self::Image>;
    fn clear(&mut self);
    fn blit_image(&mut self, image: &Self::Image, pos: (f32, f32), anchor: Anchor);
    fn blit_text(&mut self, text: &str, size_px: f32, color: [u8; 4], pos: (f32, f32), anchor: Anchor);
    fn present(&mut self) -> Result<()>;
}

/// Source of key presses. `next_event` blocks until one is available.
pub trait InputSource {
    fn next_event(&mut self) -> Result<InputEvent>;

    /// Drops key presses queued before this call. Pending quit requests
    /// are kept.
    fn discard_pending(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Forever,
}

pub trait AudioPlayer {
    fn play(&mut self, path: &Path, repeat: Repeat) -> Result<()>;
    fn stop(&mut self);
    /// `level` ranges from 0.0 to 1.0.
    fn set_volume(&mut self, level: f32);
}
