//! Blocks: self-contained drawables that own one visual artifact each and
//! know how to show any frame of their data.

use frameplot_canvas_core::{AxesId, Canvas};
use ndarray::{Array1, Array2, Ix2};

use crate::data::FrameData;
use crate::error::AnimationError;
use crate::Result;

pub mod image_like;
pub mod line;
pub mod scatter;
pub mod surface;
pub mod title;
pub mod update;
pub mod vectors;

pub use image_like::{Imshow, ImshowOptions, Pcolormesh, PcolormeshOptions};
pub use line::{Line, LineOptions};
pub use scatter::{Scatter, ScatterOptions, Sizes};
pub use surface::{Surface, SurfaceOptions};
pub use title::{Title, TitleTemplate, TitleValue};
pub use update::{FrameFn, Update};
pub use vectors::{vector_comp, Quiver, QuiverOptions, VectorCompOptions};

/// Capability set shared by every block.
///
/// `render_initial` draws frame 0 and is invoked once, by the block's
/// constructor. `update` must be idempotent and only touches the block's own
/// artists on its bound axes.
pub trait Block {
    /// Number of frames this block can show; fixed after construction.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Axes the block draws on.
    fn axes(&self) -> AxesId;

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()>;

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()>;
}

/// The closed set of block variants an [`Animation`](crate::Animation) drives.
#[derive(Debug)]
pub enum AnyBlock {
    Line(Line),
    Scatter(Scatter),
    Pcolormesh(Pcolormesh),
    Imshow(Imshow),
    Quiver(Quiver),
    Surface(Surface),
    Title(Title),
    Update(Update),
}

impl AnyBlock {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Line(_) => "line",
            Self::Scatter(_) => "scatter",
            Self::Pcolormesh(_) => "pcolormesh",
            Self::Imshow(_) => "imshow",
            Self::Quiver(_) => "quiver",
            Self::Surface(_) => "surface",
            Self::Title(_) => "title",
            Self::Update(u) if u.clears() => "nuke",
            Self::Update(_) => "update",
        }
    }

    fn inner(&self) -> &dyn Block {
        match self {
            Self::Line(b) => b,
            Self::Scatter(b) => b,
            Self::Pcolormesh(b) => b,
            Self::Imshow(b) => b,
            Self::Quiver(b) => b,
            Self::Surface(b) => b,
            Self::Title(b) => b,
            Self::Update(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Block {
        match self {
            Self::Line(b) => b,
            Self::Scatter(b) => b,
            Self::Pcolormesh(b) => b,
            Self::Imshow(b) => b,
            Self::Quiver(b) => b,
            Self::Surface(b) => b,
            Self::Title(b) => b,
            Self::Update(b) => b,
        }
    }
}

impl Block for AnyBlock {
    fn len(&self) -> usize {
        self.inner().len()
    }

    fn axes(&self) -> AxesId {
        self.inner().axes()
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.inner_mut().render_initial(canvas)
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        self.inner_mut().update(frame, canvas)
    }
}

macro_rules! impl_from_block {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for AnyBlock {
                fn from(block: $variant) -> Self {
                    AnyBlock::$variant(block)
                }
            }
        )*
    };
}

impl_from_block!(Line, Scatter, Pcolormesh, Imshow, Quiver, Surface, Title, Update);

/// Guard shared by every `update` implementation.
#[inline]
pub(crate) fn check_frame(frame: usize, len: usize) -> Result<()> {
    if frame >= len {
        return Err(AnimationError::IndexOutOfRange { index: frame, len });
    }
    Ok(())
}

/// Artist handle set by `render_initial`; blocks are always rendered by their
/// constructor, so a missing handle means `update` ran on a half-built block.
#[inline]
pub(crate) fn rendered<T: Copy>(handle: Option<T>, block: &str) -> Result<T> {
    handle.ok_or_else(|| AnimationError::invalid(format!("{block} block has not been rendered")))
}

/// Every frame of `data` must have one of the listed dimensionalities.
pub(crate) fn require_frame_ndim(data: &FrameData, allowed: &[usize], what: &str) -> Result<()> {
    for (i, frame) in data.frames().enumerate() {
        if !allowed.contains(&frame.ndim()) {
            return Err(AnimationError::type_mismatch(format!(
                "{what} frames must have {allowed:?} dimensions, frame {i} has {}",
                frame.ndim()
            )));
        }
    }
    Ok(())
}

pub(crate) fn frame_1d(data: &FrameData, i: usize) -> Result<Array1<f64>> {
    Ok(data.frame(i)?.iter().copied().collect())
}

pub(crate) fn frame_2d(data: &FrameData, i: usize, what: &str) -> Result<Array2<f64>> {
    let frame = data.frame(i)?;
    let ndim = frame.ndim();
    frame
        .into_dimensionality::<Ix2>()
        .map(|v| v.to_owned())
        .map_err(|_| {
            AnimationError::type_mismatch(format!("{what} frames must be 2-D, got {ndim} dimensions"))
        })
}
