use crate::keys::ResponseMode;

pub const DARK_TEAL: [u8; 4] = [21, 102, 105, 255];
pub const PINK: [u8; 4] = [255, 153, 153, 255];
pub const GRAY: [u8; 4] = [128, 128, 128, 255];
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Which point of a blitted item `pos` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

/// Screen placement of stimulus images and their labels.
///
/// Positions are fractions of the screen in 25ths horizontally and thirds
/// vertically; images sit on the upper third line and labels below them.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionLayout {
    pub image_size: (u32, u32),
    pub image_positions: Vec<(f32, f32)>,
    pub label_positions: Vec<(f32, f32)>,
}

impl OptionLayout {
    pub fn new(mode: ResponseMode, screen: (u32, u32), scaling: (u32, u32)) -> Self {
        let (w, h) = (screen.0 as f32, screen.1 as f32);
        let columns: &[f32] = match mode {
            ResponseMode::TwoOption => &[7.0, 13.0],
            ResponseMode::FourOption => &[1.0, 7.0, 13.0, 19.0],
        };

        let image_positions = columns
            .iter()
            .map(|c| (c * w / 25.0, h / 3.0))
            .collect();
        let label_positions = columns
            .iter()
            .map(|c| ((c + 2.3) * w / 25.0, 1.75 * h / 3.0))
            .collect();

        Self {
            image_size: scaled_size(screen, scaling),
            image_positions,
            label_positions,
        }
    }

    pub fn center(screen: (u32, u32)) -> (f32, f32) {
        (screen.0 as f32 / 2.0, screen.1 as f32 / 2.0)
    }
}

/// Screen size divided by the per-axis scaling factor, never below one pixel.
pub fn scaled_size(screen: (u32, u32), scaling: (u32, u32)) -> (u32, u32) {
    (
        (screen.0 / scaling.0.max(1)).max(1),
        (screen.1 / scaling.1.max(1)).max(1),
    )
}
