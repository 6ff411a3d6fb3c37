use std::fmt;

use frameplot_canvas_core::{AxesId, Canvas};

use super::{check_frame, Block};
use crate::error::AnimationError;
use crate::Result;

/// Caller-supplied drawing routine: `(frame, canvas, axes)`.
pub type FrameFn = Box<dyn FnMut(usize, &mut dyn Canvas, AxesId) -> Result<()>>;

/// Escape hatch for anything the other blocks cannot express: every frame is
/// drawn by a callback. Extra arguments are captured by the closure.
pub struct Update {
    axes: AxesId,
    len: usize,
    clear_first: bool,
    func: FrameFn,
}

impl Update {
    /// Draw incrementally; the callback owns whatever artists it creates.
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        len: usize,
        func: impl FnMut(usize, &mut dyn Canvas, AxesId) -> Result<()> + 'static,
    ) -> Result<Self> {
        Self::build(canvas, axes, len, false, Box::new(func))
    }

    /// Clear the axes before every call, for frames that are simpler to
    /// redraw from scratch.
    pub fn nuke(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        len: usize,
        func: impl FnMut(usize, &mut dyn Canvas, AxesId) -> Result<()> + 'static,
    ) -> Result<Self> {
        Self::build(canvas, axes, len, true, Box::new(func))
    }

    fn build(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        len: usize,
        clear_first: bool,
        func: FrameFn,
    ) -> Result<Self> {
        if len == 0 {
            return Err(AnimationError::invalid("update block needs a length of at least 1"));
        }
        let mut block = Self {
            axes,
            len,
            clear_first,
            func,
        };
        block.render_initial(canvas)?;
        log::debug!(
            "{} block on axes {}: {len} frames",
            if clear_first { "nuke" } else { "update" },
            axes.0
        );
        Ok(block)
    }

    /// Whether the axes are cleared before each call.
    pub fn clears(&self) -> bool {
        self.clear_first
    }
}

impl fmt::Debug for Update {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Update")
            .field("axes", &self.axes)
            .field("len", &self.len)
            .field("clear_first", &self.clear_first)
            .finish_non_exhaustive()
    }
}

impl Block for Update {
    fn len(&self) -> usize {
        self.len
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.update(0, canvas)
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len)?;
        if self.clear_first {
            canvas.clear(self.axes)?;
        }
        (self.func)(frame, canvas, self.axes).map_err(|err| match err {
            AnimationError::Callback { .. } => err,
            other => AnimationError::Callback {
                reason: format!("frame {frame}: {other}"),
            },
        })
    }
}
