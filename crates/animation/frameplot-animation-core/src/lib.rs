//! frameplot animation core (backend-agnostic)
//!
//! Blocks own one visual artifact each and can show any frame of their data.
//! An [`Animation`] drives every block through one shared [`Timeline`],
//! keeps the play/pause toggle and the timeline slider in sync, and exports
//! frames through a [`FrameWriter`].
//!
//! Drawing goes through the [`Canvas`](frameplot_canvas_core::Canvas) trait;
//! [`Scene`](frameplot_canvas_core::Scene) is the in-memory backend.

pub mod animation;
pub mod blocks;
pub mod clock;
pub mod config;
pub mod controls;
pub mod data;
pub mod error;
pub mod export;
pub mod timeline;
pub mod util;
pub mod vector_plot;

// Re-exports for consumers
pub use animation::{Addition, Animation, TimelineSource};
pub use blocks::{
    vector_comp, AnyBlock, Block, FrameFn, Imshow, ImshowOptions, Line, LineOptions, Pcolormesh,
    PcolormeshOptions, Quiver, QuiverOptions, Scatter, ScatterOptions, Sizes, Surface,
    SurfaceOptions, Title, TitleTemplate, TitleValue, Update, VectorCompOptions,
};
pub use clock::FrameClock;
pub use config::Config;
pub use controls::{format_value, PlaybackState, SliderConfig, ToggleConfig};
pub use data::{FrameData, Input};
pub use error::AnimationError;
#[cfg(feature = "media")]
pub use export::{GifWriter, PngSequenceWriter};
pub use export::{read_scene_dump, ExportMeta, FrameWriter, SceneFrame, SceneJsonWriter};
pub use timeline::{TimeValues, Timeline, TimelineOptions};
pub use util::{arange, demeshgrid, meshgrid, parametric_line};
pub use vector_plot::{vector_plot, VectorPlotOptions};

pub type Result<T> = core::result::Result<T, AnimationError>;
