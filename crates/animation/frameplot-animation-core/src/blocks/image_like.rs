//! Raster-like blocks: quad meshes and images.

use frameplot_canvas_core::{Artist, ArtistId, ArtistUpdate, AxesId, Canvas, Shading, Style};
use ndarray::{Array, Array2, ArrayD, Dimension, Ix1, Ix2};

use super::{check_frame, frame_2d, rendered, require_frame_ndim, Block};
use crate::data::{FrameData, Input};
use crate::error::AnimationError;
use crate::util::{arange, meshgrid};
use crate::Result;

#[derive(Clone, Debug, Default)]
pub struct PcolormeshOptions {
    /// Fixed cell coordinates; 1-D (meshgridded) or 2-D. Both or neither.
    pub x: Option<Input>,
    pub y: Option<Input>,
    pub t_axis: usize,
    /// `None` picks flat or nearest from the grid shape.
    pub shading: Option<Shading>,
    pub style: Style,
}

impl PcolormeshOptions {
    pub fn with_grid(mut self, x: impl Into<Input>, y: impl Into<Input>) -> Self {
        self.x = Some(x.into());
        self.y = Some(y.into());
        self
    }

    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.shading = Some(shading);
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A pseudocolor grid whose cell values change each frame over a fixed grid.
#[derive(Debug)]
pub struct Pcolormesh {
    axes: AxesId,
    c: FrameData,
    x: Array2<f64>,
    y: Array2<f64>,
    shading: Shading,
    style: Style,
    artist: Option<ArtistId>,
}

impl Pcolormesh {
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        c: impl Into<Input>,
        opts: PcolormeshOptions,
    ) -> Result<Self> {
        let c = FrameData::from_input(c.into(), opts.t_axis, "C")?;
        require_frame_ndim(&c, &[2], "pcolormesh C")?;
        let c_shape = c.uniform_frame_shape("C")?;
        let (ny, nx) = (c_shape[0], c_shape[1]);

        let grid = match (opts.x, opts.y) {
            (Some(x), Some(y)) => Some(fixed_grid(x, y)?),
            (None, None) => None,
            _ => {
                return Err(AnimationError::invalid(
                    "pcolormesh needs both X and Y or neither",
                ))
            }
        };
        let (x, y, shading) = match grid {
            Some((x, y)) => {
                let shading = resolve_shading(opts.shading, x.dim(), (ny, nx))?;
                (x, y, shading)
            }
            None => {
                let shading = opts.shading.unwrap_or(Shading::Flat);
                let gx = arange(shading.grid_extent(nx));
                let gy = arange(shading.grid_extent(ny));
                let (x, y) = meshgrid(gx.view(), gy.view());
                (x, y, shading)
            }
        };

        let mut mesh = Self {
            axes,
            c,
            x,
            y,
            shading,
            style: opts.style,
            artist: None,
        };
        mesh.render_initial(canvas)?;
        log::debug!(
            "pcolormesh block on axes {}: {} frames of {ny}x{nx}, {} shading",
            axes.0,
            mesh.len(),
            shading.name()
        );
        Ok(mesh)
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    /// Global (min, max) of C over every frame.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.c.min_max()
    }
}

impl Block for Pcolormesh {
    fn len(&self) -> usize {
        self.c.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let id = canvas.add_artist(
            self.axes,
            Artist::QuadMesh {
                x: self.x.clone(),
                y: self.y.clone(),
                c: frame_2d(&self.c, 0, "pcolormesh C")?,
                shading: self.shading,
                style: self.style.clone(),
            },
        )?;
        self.artist = Some(id);
        Ok(())
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        let c = frame_2d(&self.c, frame, "pcolormesh C")?;
        canvas.update_artist(rendered(self.artist, "pcolormesh")?, ArtistUpdate::MeshArray { c })?;
        Ok(())
    }
}

/// Resolve fixed X, Y into 2-D coordinate arrays of one shape.
pub(crate) fn fixed_grid(x: Input, y: Input) -> Result<(Array2<f64>, Array2<f64>)> {
    let x = static_coords(x, "X")?;
    let y = static_coords(y, "Y")?;
    match (x.ndim(), y.ndim()) {
        (1, 1) => {
            let x = into_dim::<Ix1>(x, "X")?;
            let y = into_dim::<Ix1>(y, "Y")?;
            Ok(meshgrid(x.view(), y.view()))
        }
        (2, 2) => {
            let x = into_dim::<Ix2>(x, "X")?;
            let y = into_dim::<Ix2>(y, "Y")?;
            if x.shape() != y.shape() {
                return Err(AnimationError::shape("Y", x.shape(), y.shape()));
            }
            Ok((x, y))
        }
        (a, b) => Err(AnimationError::type_mismatch(format!(
            "X and Y must both be 1-D or both be 2-D, got {a}-D and {b}-D"
        ))),
    }
}

/// Coordinates that stay fixed for the life of a block.
fn static_coords(input: Input, what: &str) -> Result<ArrayD<f64>> {
    let array = match input {
        Input::Array(a) => a,
        Input::List(_) => {
            return Err(AnimationError::unsupported(format!(
                "time-varying {what} coordinates"
            )))
        }
    };
    match array.ndim() {
        1 | 2 => Ok(array),
        3 => Err(AnimationError::unsupported(format!(
            "time-varying {what} coordinates"
        ))),
        n => Err(AnimationError::type_mismatch(format!(
            "{what} must be 1-D or 2-D, got {n}-D"
        ))),
    }
}

fn into_dim<D: Dimension>(array: ArrayD<f64>, what: &str) -> Result<Array<f64, D>> {
    let ndim = array.ndim();
    array
        .into_dimensionality::<D>()
        .map_err(|_| AnimationError::type_mismatch(format!("{what} has {ndim} dimensions")))
}

/// Pick (or validate) the shading for a grid of `grid` cells over C of `c`.
///
/// Follows matplotlib: flat needs a grid one larger than C in both
/// dimensions, nearest and gouraud need equal shapes.
fn resolve_shading(
    requested: Option<Shading>,
    grid: (usize, usize),
    c: (usize, usize),
) -> Result<Shading> {
    let (ny, nx) = c;
    let expect = |s: Shading| (s.grid_extent(ny), s.grid_extent(nx));
    let shading = match requested {
        Some(s) => s,
        None if grid == expect(Shading::Flat) => Shading::Flat,
        None if grid == expect(Shading::Nearest) => Shading::Nearest,
        None => Shading::Flat,
    };
    let (ey, ex) = expect(shading);
    if grid != (ey, ex) {
        return Err(AnimationError::shape(
            format!("X/Y grid for {} shading", shading.name()),
            &[ey, ex],
            &[grid.0, grid.1],
        ));
    }
    Ok(shading)
}

#[derive(Clone, Debug, Default)]
pub struct ImshowOptions {
    pub t_axis: usize,
    pub style: Style,
}

impl ImshowOptions {
    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// A sequence of images: 2-D scalar frames or (H, W, 3|4) colour frames.
#[derive(Debug)]
pub struct Imshow {
    axes: AxesId,
    images: FrameData,
    style: Style,
    artist: Option<ArtistId>,
}

impl Imshow {
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        images: impl Into<Input>,
        opts: ImshowOptions,
    ) -> Result<Self> {
        let images = FrameData::from_input(images.into(), opts.t_axis, "images")?;
        for (i, frame) in images.frames().enumerate() {
            let ok = match frame.shape() {
                [_, _] => true,
                [_, _, ch] => *ch == 3 || *ch == 4,
                _ => false,
            };
            if !ok {
                return Err(AnimationError::type_mismatch(format!(
                    "image frame {i} has shape {:?}; expected (H, W) or (H, W, 3|4)",
                    frame.shape()
                )));
            }
        }
        let mut imshow = Self {
            axes,
            images,
            style: opts.style,
            artist: None,
        };
        imshow.render_initial(canvas)?;
        log::debug!("imshow block on axes {}: {} frames", axes.0, imshow.len());
        Ok(imshow)
    }
}

impl Block for Imshow {
    fn len(&self) -> usize {
        self.images.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let data = self.images.frame(0)?.to_owned();
        let id = canvas.add_artist(
            self.axes,
            Artist::Image {
                data,
                style: self.style.clone(),
            },
        )?;
        self.artist = Some(id);
        Ok(())
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        let data = self.images.frame(frame)?.to_owned();
        canvas.update_artist(rendered(self.artist, "imshow")?, ArtistUpdate::ImageData { data })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameplot_canvas_core::Scene;
    use ndarray::{Array3, Array4};

    fn mesh_of(scene: &Scene, ax: AxesId) -> (Array2<f64>, Array2<f64>, Shading) {
        match scene.artists(ax)[0] {
            Artist::QuadMesh { x, c, shading, .. } => (x.clone(), c.clone(), *shading),
            other => panic!("expected a quad mesh, got {other:?}"),
        }
    }

    #[test]
    fn no_grid_defaults_to_flat_index_grid() {
        let (mut scene, ax) = Scene::with_axes();
        let c = Array3::from_shape_fn((2, 3, 4), |(t, i, j)| (t * 100 + i * 10 + j) as f64);
        let mut mesh = Pcolormesh::new(&mut scene, ax, c, PcolormeshOptions::default()).unwrap();
        assert_eq!(mesh.shading(), Shading::Flat);
        mesh.update(1, &mut scene).unwrap();
        let (x, c, _) = mesh_of(&scene, ax);
        assert_eq!(x.dim(), (4, 5));
        assert_eq!(c[[2, 3]], 123.0);
    }

    #[test]
    fn shading_is_inferred_from_grid_shape() {
        let (mut scene, ax) = Scene::with_axes();
        let c = Array3::<f64>::zeros((2, 2, 3));
        let flat = Pcolormesh::new(
            &mut scene,
            ax,
            c.clone(),
            PcolormeshOptions::default().with_grid(arange(4), arange(3)),
        )
        .unwrap();
        assert_eq!(flat.shading(), Shading::Flat);
        let nearest = Pcolormesh::new(
            &mut scene,
            ax,
            c,
            PcolormeshOptions::default().with_grid(arange(3), arange(2)),
        )
        .unwrap();
        assert_eq!(nearest.shading(), Shading::Nearest);
    }

    #[test]
    fn explicit_flat_with_equal_grid_is_a_shape_error() {
        let (mut scene, ax) = Scene::with_axes();
        let err = Pcolormesh::new(
            &mut scene,
            ax,
            Array3::<f64>::zeros((2, 2, 3)),
            PcolormeshOptions::default()
                .with_grid(arange(3), arange(2))
                .with_shading(Shading::Flat),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AnimationError::shape("X/Y grid for flat shading", &[3, 4], &[2, 3])
        );
    }

    #[test]
    fn coordinate_dimensionality_is_checked() {
        let (mut scene, ax) = Scene::with_axes();
        let c = Array3::<f64>::zeros((2, 2, 2));
        let animated = Pcolormesh::new(
            &mut scene,
            ax,
            c.clone(),
            PcolormeshOptions::default()
                .with_grid(Array3::<f64>::zeros((2, 3, 3)), Array3::<f64>::zeros((2, 3, 3))),
        )
        .unwrap_err();
        assert!(matches!(animated, AnimationError::Unsupported { .. }));
        let four_d = Pcolormesh::new(
            &mut scene,
            ax,
            c,
            PcolormeshOptions::default()
                .with_grid(Array4::<f64>::zeros((1, 1, 1, 1)), arange(3)),
        )
        .unwrap_err();
        assert!(matches!(four_d, AnimationError::TypeMismatch { .. }));
    }

    #[test]
    fn imshow_accepts_rgb_and_rejects_odd_channels() {
        let (mut scene, ax) = Scene::with_axes();
        let rgb = vec![Array3::<f64>::zeros((2, 2, 3)), Array3::<f64>::ones((2, 2, 3))];
        let mut im = Imshow::new(&mut scene, ax, rgb, ImshowOptions::default()).unwrap();
        im.update(1, &mut scene).unwrap();
        match scene.artists(ax)[0] {
            Artist::Image { data, .. } => assert_eq!(data[[1, 1, 2]], 1.0),
            other => panic!("expected an image, got {other:?}"),
        }
        let bad = Imshow::new(
            &mut scene,
            ax,
            vec![Array3::<f64>::zeros((2, 2, 5))],
            ImshowOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(bad, AnimationError::TypeMismatch { .. }));
    }
}
