//! frameplot-canvas-core: the drawing-target boundary (backend-agnostic)
//!
//! Blocks never talk to a plotting backend directly. They create and mutate
//! [`Artist`]s on an axes through the [`Canvas`] trait. [`Scene`] is a retained
//! in-memory implementation that records the current state of every artist and
//! can be snapshotted, which is what the test-suite and the scene-dump export use.

pub mod artist;
pub mod canvas;
pub mod error;
pub mod ids;
pub mod scene;
pub mod style;

pub use artist::{Artist, ArtistKind, ArtistUpdate, Shading};
pub use canvas::{AxesKind, Canvas, Capture, ControlSlot, RgbaFrame};
pub use error::CanvasError;
pub use ids::{ArtistId, AxesId, IdAllocator};
pub use scene::{AxesSnapshot, Scene, SceneSnapshot};
pub use style::Style;
