use frameplot_canvas_core::{Artist, ArtistId, AxesId, Canvas, Style};
use ndarray::{Array1, Array2, Ix1, Ix2, ShapeError};

use super::{check_frame, frame_2d, rendered, require_frame_ndim, Block};
use crate::data::{FrameData, Input};
use crate::error::AnimationError;
use crate::util::arange;
use crate::Result;

#[derive(Clone, Debug)]
pub struct SurfaceOptions {
    /// Fixed coordinates; a 1-D X spans axis 0 of Z and a 1-D Y spans axis 1.
    pub x: Option<Input>,
    pub y: Option<Input>,
    pub t_axis: usize,
    /// Pin the z-limits to the global range of Z once, at construction.
    pub fixed_vscale: bool,
    pub style: Style,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            t_axis: 0,
            fixed_vscale: true,
            style: Style::default(),
        }
    }
}

impl SurfaceOptions {
    pub fn with_grid(mut self, x: impl Into<Input>, y: impl Into<Input>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_fixed_vscale(mut self, fixed: bool) -> Self {
        self.fixed_vscale = fixed;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A 3-D surface redrawn from scratch every frame.
#[derive(Debug)]
pub struct Surface {
    axes: AxesId,
    x: Array2<f64>,
    y: Array2<f64>,
    z: FrameData,
    style: Style,
    artist: Option<ArtistId>,
}

impl Surface {
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        z: impl Into<Input>,
        opts: SurfaceOptions,
    ) -> Result<Self> {
        let z = FrameData::from_input(z.into(), opts.t_axis, "Z")?;
        require_frame_ndim(&z, &[2], "surface Z")?;
        let shape = z.uniform_frame_shape("Z")?;
        let (n0, n1) = (shape[0], shape[1]);

        let (x, y) = match (opts.x, opts.y) {
            (Some(x), Some(y)) => surface_grid(x, y, (n0, n1))?,
            (None, None) => ij_grid(&arange(n0), &arange(n1)),
            _ => {
                return Err(AnimationError::invalid(
                    "surface needs both X and Y or neither",
                ))
            }
        };

        let mut style = opts.style;
        if style.color.is_none() && style.cmap.is_none() {
            style.color = Some("C0".to_string());
        }

        if opts.fixed_vscale {
            if let Some((lo, hi)) = z.min_max() {
                canvas.set_zlim(axes, lo, hi)?;
            }
        }

        let mut surface = Self {
            axes,
            x,
            y,
            z,
            style,
            artist: None,
        };
        surface.render_initial(canvas)?;
        log::debug!("surface block on axes {}: {} frames", axes.0, surface.len());
        Ok(surface)
    }

    fn artist_for(&self, i: usize) -> Result<Artist> {
        Ok(Artist::Surface {
            x: self.x.clone(),
            y: self.y.clone(),
            z: frame_2d(&self.z, i, "surface Z")?,
            style: self.style.clone(),
        })
    }
}

impl Block for Surface {
    fn len(&self) -> usize {
        self.z.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let artist = self.artist_for(0)?;
        self.artist = Some(canvas.add_artist(self.axes, artist)?);
        Ok(())
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        let artist = self.artist_for(frame)?;
        let old = rendered(self.artist, "surface")?;
        self.artist = Some(canvas.add_artist(self.axes, artist)?);
        canvas.remove_artist(old)?;
        Ok(())
    }
}

fn ij_grid(x: &Array1<f64>, y: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (x.len(), y.len());
    (
        Array2::from_shape_fn(shape, |(i, _)| x[i]),
        Array2::from_shape_fn(shape, |(_, j)| y[j]),
    )
}

fn surface_grid(x: Input, y: Input, shape: (usize, usize)) -> Result<(Array2<f64>, Array2<f64>)> {
    let x = x.into_array("X")?;
    let y = y.into_array("Y")?;
    let (gx, gy) = match (x.ndim(), y.ndim()) {
        (1, 1) => {
            let x = x.into_dimensionality::<Ix1>().map_err(coords_err)?;
            let y = y.into_dimensionality::<Ix1>().map_err(coords_err)?;
            ij_grid(&x, &y)
        }
        (2, 2) => (
            x.into_dimensionality::<Ix2>().map_err(coords_err)?,
            y.into_dimensionality::<Ix2>().map_err(coords_err)?,
        ),
        (a, b) => {
            return Err(AnimationError::type_mismatch(format!(
                "surface X and Y must both be 1-D or both be 2-D, got {a}-D and {b}-D"
            )))
        }
    };
    for (what, g) in [("X", &gx), ("Y", &gy)] {
        if g.dim() != shape {
            return Err(AnimationError::shape(what, &[shape.0, shape.1], g.shape()));
        }
    }
    Ok((gx, gy))
}

fn coords_err(err: ShapeError) -> AnimationError {
    AnimationError::type_mismatch(format!("surface coordinates: {err}"))
}
