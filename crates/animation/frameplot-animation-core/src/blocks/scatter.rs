use frameplot_canvas_core::{Artist, ArtistId, ArtistUpdate, AxesId, Canvas, Style};
use ndarray::Array1;

use super::{check_frame, frame_1d, rendered, require_frame_ndim, Block};
use crate::data::{FrameData, Input};
use crate::Result;

/// Marker sizes for a [`Scatter`].
#[derive(Clone, Debug, PartialEq)]
pub enum Sizes {
    /// One size for every point of every frame.
    Constant(f64),
    /// Per-point sizes, resolved against the y data like any companion.
    PerFrame(Input),
}

#[derive(Clone, Debug, Default)]
pub struct ScatterOptions {
    pub t_axis: usize,
    pub sizes: Option<Sizes>,
    pub style: Style,
}

impl ScatterOptions {
    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_sizes(mut self, sizes: Sizes) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug)]
enum ResolvedSizes {
    Constant(f64),
    PerFrame(FrameData),
}

/// Animated point cloud.
#[derive(Debug)]
pub struct Scatter {
    axes: AxesId,
    x: FrameData,
    y: FrameData,
    sizes: Option<ResolvedSizes>,
    style: Style,
    artist: Option<ArtistId>,
}

impl Scatter {
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        x: impl Into<Input>,
        y: impl Into<Input>,
        opts: ScatterOptions,
    ) -> Result<Self> {
        let y = FrameData::from_input(y.into(), opts.t_axis, "y")?;
        require_frame_ndim(&y, &[1], "scatter y")?;
        let x = y.companion(x.into(), "x")?;
        let sizes = match opts.sizes {
            None => None,
            Some(Sizes::Constant(s)) => Some(ResolvedSizes::Constant(s)),
            Some(Sizes::PerFrame(input)) => {
                Some(ResolvedSizes::PerFrame(y.companion(input, "sizes")?))
            }
        };
        let mut scatter = Self {
            axes,
            x,
            y,
            sizes,
            style: opts.style,
            artist: None,
        };
        scatter.render_initial(canvas)?;
        log::debug!("scatter block on axes {}: {} frames", axes.0, scatter.len());
        Ok(scatter)
    }

    fn frame_sizes(&self, i: usize, points: usize) -> Result<Option<Array1<f64>>> {
        Ok(match &self.sizes {
            None => None,
            Some(ResolvedSizes::Constant(s)) => Some(Array1::from_elem(points, *s)),
            Some(ResolvedSizes::PerFrame(data)) => Some(frame_1d(data, i)?),
        })
    }
}

impl Block for Scatter {
    fn len(&self) -> usize {
        self.y.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let x = frame_1d(&self.x, 0)?;
        let y = frame_1d(&self.y, 0)?;
        let sizes = self.frame_sizes(0, y.len())?;
        let id = canvas.add_artist(
            self.axes,
            Artist::Scatter {
                x,
                y,
                sizes,
                style: self.style.clone(),
            },
        )?;
        self.artist = Some(id);
        Ok(())
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        let id = rendered(self.artist, "scatter")?;
        let x = frame_1d(&self.x, frame)?;
        let y = frame_1d(&self.y, frame)?;
        let points = y.len();
        canvas.update_artist(id, ArtistUpdate::Offsets { x, y })?;
        if let Some(sizes) = self.frame_sizes(frame, points)? {
            canvas.update_artist(id, ArtistUpdate::Sizes { sizes })?;
        }
        Ok(())
    }
}
