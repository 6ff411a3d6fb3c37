//! Vector-field blocks.

use frameplot_canvas_core::{Artist, ArtistId, ArtistUpdate, AxesId, Canvas, Style};
use ndarray::{s, Array1, Array2, ArrayD, Ix2};

use super::image_like::fixed_grid;
use super::{check_frame, rendered, require_frame_ndim, Block, Pcolormesh, PcolormeshOptions};
use crate::data::{FrameData, Input};
use crate::error::AnimationError;
use crate::util::{arange, meshgrid};
use crate::Result;

#[derive(Clone, Debug, Default)]
pub struct QuiverOptions {
    /// Arrow anchors, fixed for the block's lifetime. Both or neither.
    pub x: Option<Input>,
    pub y: Option<Input>,
    pub t_axis: usize,
    pub style: Style,
}

impl QuiverOptions {
    pub fn with_anchors(mut self, x: impl Into<Input>, y: impl Into<Input>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Arrows on a fixed grid whose components change every frame.
#[derive(Debug)]
pub struct Quiver {
    axes: AxesId,
    x: ArrayD<f64>,
    y: ArrayD<f64>,
    u: FrameData,
    v: FrameData,
    style: Style,
    artist: Option<ArtistId>,
}

impl Quiver {
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        u: impl Into<Input>,
        v: impl Into<Input>,
        opts: QuiverOptions,
    ) -> Result<Self> {
        let u = FrameData::from_input(u.into(), opts.t_axis, "U")?;
        let v = v.into();
        // V is never broadcast against U, in either layout.
        match (&u, &v) {
            (FrameData::Rectangular { array, .. }, Input::Array(va)) if va.shape() != array.shape() => {
                return Err(AnimationError::shape("V", array.shape(), va.shape()));
            }
            (FrameData::PerFrame(_), Input::Array(_)) => {
                return Err(AnimationError::type_mismatch(
                    "V is a single array but U is a list of frames; pass one V per frame",
                ));
            }
            _ => {}
        }
        let v = u.companion(v, "V")?;
        require_frame_ndim(&u, &[1, 2], "quiver U")?;
        let frame_shape = u.uniform_frame_shape("U")?;

        let (x, y) = match (opts.x, opts.y) {
            (Some(x), Some(y)) => anchors(x, y, &frame_shape)?,
            (None, None) => index_anchors(&frame_shape, 0.0),
            _ => {
                return Err(AnimationError::invalid(
                    "quiver needs both X and Y or neither",
                ))
            }
        };

        let mut quiver = Self {
            axes,
            x,
            y,
            u,
            v,
            style: opts.style,
            artist: None,
        };
        quiver.render_initial(canvas)?;
        log::debug!(
            "quiver block on axes {}: {} frames of {:?}",
            axes.0,
            quiver.len(),
            frame_shape
        );
        Ok(quiver)
    }

    fn frame_uv(&self, i: usize) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
        Ok((self.u.frame(i)?.to_owned(), self.v.frame(i)?.to_owned()))
    }
}

impl Block for Quiver {
    fn len(&self) -> usize {
        self.u.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let (u, v) = self.frame_uv(0)?;
        let id = canvas.add_artist(
            self.axes,
            Artist::Quiver {
                x: self.x.clone(),
                y: self.y.clone(),
                u,
                v,
                style: self.style.clone(),
            },
        )?;
        self.artist = Some(id);
        Ok(())
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        let (u, v) = self.frame_uv(frame)?;
        canvas.update_artist(rendered(self.artist, "quiver")?, ArtistUpdate::QuiverUv { u, v })?;
        Ok(())
    }
}

/// Fixed anchors matching one frame of U.
fn anchors(x: Input, y: Input, frame_shape: &[usize]) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
    if frame_shape.len() == 1 {
        let x = x.into_array("X")?;
        let y = y.into_array("Y")?;
        if x.shape() != frame_shape {
            return Err(AnimationError::shape("X", frame_shape, x.shape()));
        }
        if y.shape() != frame_shape {
            return Err(AnimationError::shape("Y", frame_shape, y.shape()));
        }
        return Ok((x, y));
    }
    let (x, y) = fixed_grid(x, y)?;
    if x.shape() != frame_shape {
        return Err(AnimationError::shape("X/Y grid", frame_shape, x.shape()));
    }
    Ok((x.into_dyn(), y.into_dyn()))
}

/// Index positions for every component, shifted by `offset`.
fn index_anchors(frame_shape: &[usize], offset: f64) -> (ArrayD<f64>, ArrayD<f64>) {
    match frame_shape {
        [n] => (
            (arange(*n) + offset).into_dyn(),
            Array1::<f64>::zeros(*n).into_dyn(),
        ),
        [ny, nx, ..] => {
            let (x, y) = meshgrid((arange(*nx) + offset).view(), (arange(*ny) + offset).view());
            (x.into_dyn(), y.into_dyn())
        }
        [] => (ArrayD::zeros(vec![]), ArrayD::zeros(vec![])),
    }
}

#[derive(Clone, Debug)]
pub struct VectorCompOptions {
    /// Fixed grid for the magnitude mesh and the arrows. Both or neither.
    pub x: Option<Input>,
    pub y: Option<Input>,
    pub t_axis: usize,
    /// Draw every `skip`-th arrow along both spatial axes.
    pub skip: usize,
    pub mesh_style: Style,
    pub quiver_style: Style,
}

impl Default for VectorCompOptions {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            t_axis: 0,
            skip: 1,
            mesh_style: Style::default(),
            quiver_style: Style::default(),
        }
    }
}

impl VectorCompOptions {
    pub fn with_grid(mut self, x: impl Into<Input>, y: impl Into<Input>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }
}

/// Magnitude as a pcolormesh plus the unit direction as a quiver.
///
/// Points with zero magnitude get a zero-length arrow.
pub fn vector_comp(
    canvas: &mut dyn Canvas,
    axes: AxesId,
    u: impl Into<Input>,
    v: impl Into<Input>,
    opts: VectorCompOptions,
) -> Result<(Pcolormesh, Quiver)> {
    if opts.skip == 0 {
        return Err(AnimationError::invalid("skip must be at least 1"));
    }
    let u = FrameData::from_input(u.into(), opts.t_axis, "U")?;
    let v = u.companion(v.into(), "V")?;
    require_frame_ndim(&u, &[2], "vector_comp U")?;
    let frame_shape = u.uniform_frame_shape("U")?;
    let step = opts.skip as isize;

    let mut magnitudes = Vec::with_capacity(u.len());
    let mut u_dir = Vec::with_capacity(u.len());
    let mut v_dir = Vec::with_capacity(u.len());
    let mut zero_points = 0usize;
    for i in 0..u.len() {
        let uf = to_2d(u.frame(i)?.to_owned())?;
        let vf = to_2d(v.frame(i)?.to_owned())?;
        let mag = ndarray::Zip::from(&uf)
            .and(&vf)
            .map_collect(|a, b| a.hypot(*b));
        zero_points += mag.iter().filter(|m| **m == 0.0).count();
        let unit = |c: &Array2<f64>| {
            ndarray::Zip::from(c)
                .and(&mag)
                .map_collect(|c, m| if *m == 0.0 { 0.0 } else { c / m })
        };
        u_dir.push(unit(&uf).slice(s![..;step, ..;step]).to_owned());
        v_dir.push(unit(&vf).slice(s![..;step, ..;step]).to_owned());
        magnitudes.push(mag);
    }
    if zero_points > 0 {
        log::warn!("vector_comp: {zero_points} points have zero magnitude; drawn as zero-length arrows");
    }

    let (mesh_opts, anchor_x, anchor_y) = match (opts.x, opts.y) {
        (Some(x), Some(y)) => {
            let (gx, gy) = fixed_grid(x.clone(), y.clone())?;
            let sampled = |g: &Array2<f64>| g.slice(s![..;step, ..;step]).to_owned();
            let (ax, ay) = (sampled(&gx), sampled(&gy));
            (PcolormeshOptions::default().with_grid(x, y), ax, ay)
        }
        (None, None) => {
            // Arrows sit at the centres of the default flat index cells.
            let (gx, gy) = index_anchors(&frame_shape, 0.5);
            let (gx, gy) = (to_2d(gx)?, to_2d(gy)?);
            let sampled = |g: &Array2<f64>| g.slice(s![..;step, ..;step]).to_owned();
            (PcolormeshOptions::default(), sampled(&gx), sampled(&gy))
        }
        _ => {
            return Err(AnimationError::invalid(
                "vector_comp needs both X and Y or neither",
            ))
        }
    };

    let mesh = Pcolormesh::new(
        canvas,
        axes,
        magnitudes,
        mesh_opts.with_style(opts.mesh_style),
    )?;
    let quiver = Quiver::new(
        canvas,
        axes,
        u_dir,
        v_dir,
        QuiverOptions::default()
            .with_anchors(anchor_x, anchor_y)
            .with_style(opts.quiver_style),
    )?;
    Ok((mesh, quiver))
}

fn to_2d(array: ArrayD<f64>) -> Result<Array2<f64>> {
    let ndim = array.ndim();
    array
        .into_dimensionality::<Ix2>()
        .map_err(|_| AnimationError::type_mismatch(format!("expected 2-D data, got {ndim}-D")))
}
