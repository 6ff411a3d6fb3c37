//! The `Canvas` trait: what a plotting backend must offer to host blocks.

use serde::{Deserialize, Serialize};

use crate::artist::{Artist, ArtistUpdate};
use crate::error::CanvasError;
use crate::ids::{ArtistId, AxesId};
use crate::scene::SceneSnapshot;
use crate::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxesKind {
    Plot2d,
    Plot3d,
    /// Region reserved for an interactive control.
    Control(ControlSlot),
}

/// Regions below the plot grid that a canvas can auto-allocate for controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlSlot {
    Slider,
    Toggle,
}

/// Tightly packed 8-bit RGBA pixels, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl RgbaFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(CanvasError::ShapeMismatch {
                what: "rgba frame".into(),
                expected: vec![expected],
                actual: vec![data.len()],
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self {
            width,
            height,
            data,
        }
    }
}

/// What a canvas hands to a frame writer for one exported frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Capture {
    /// Structured artist state (retained backends without a rasterizer).
    Snapshot(SceneSnapshot),
    /// A rendered raster image.
    Pixels(RgbaFrame),
}

/// Drawing target shared by blocks and the animation controls.
///
/// Axes and artists are addressed by id; the canvas owns their storage, blocks
/// only keep the handles they were given.
pub trait Canvas {
    fn add_axes(&mut self, kind: AxesKind) -> Result<AxesId, CanvasError>;

    /// Allocate a region for a control below the existing plot grid.
    fn add_control_axes(&mut self, slot: ControlSlot) -> Result<AxesId, CanvasError> {
        self.add_axes(AxesKind::Control(slot))
    }

    fn add_artist(&mut self, axes: AxesId, artist: Artist) -> Result<ArtistId, CanvasError>;

    fn update_artist(&mut self, artist: ArtistId, update: ArtistUpdate)
        -> Result<(), CanvasError>;

    fn remove_artist(&mut self, artist: ArtistId) -> Result<(), CanvasError>;

    fn set_title(&mut self, axes: AxesId, title: &str, style: &Style) -> Result<(), CanvasError>;

    fn set_zlim(&mut self, axes: AxesId, lo: f64, hi: f64) -> Result<(), CanvasError>;

    /// Remove every artist and the title from `axes`.
    fn clear(&mut self, axes: AxesId) -> Result<(), CanvasError>;

    /// Flush pending changes to the display.
    fn draw(&mut self) -> Result<(), CanvasError>;

    fn capture(&self) -> Result<Capture, CanvasError> {
        Err(CanvasError::Unsupported("frame capture".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_frame_has_expected_len() {
        let frame = RgbaFrame::solid(3, 2, [1, 2, 3, 4]);
        assert_eq!(frame.data.len(), 24);
        assert_eq!(&frame.data[4..8], &[1, 2, 3, 4]);
    }

    #[test]
    fn rgba_frame_rejects_short_buffer() {
        assert!(RgbaFrame::new(2, 2, vec![0; 15]).is_err());
        assert!(RgbaFrame::new(2, 2, vec![0; 16]).is_ok());
    }
}
