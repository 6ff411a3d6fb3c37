use frameplot_canvas_core::{Artist, ArtistId, ArtistUpdate, AxesId, Canvas, Style};
use ndarray::{Array1, ArrayView1};

use super::{check_frame, frame_1d, rendered, require_frame_ndim, Block};
use crate::data::{FrameData, Input};
use crate::util::{arange, parametric_line};
use crate::Result;

#[derive(Clone, Debug, Default)]
pub struct LineOptions {
    /// Axis of `y` (and of a rectangular `x`) that indexes frames.
    pub t_axis: usize,
    pub style: Style,
}

impl LineOptions {
    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// An animated polyline.
#[derive(Debug)]
pub struct Line {
    axes: AxesId,
    /// `None` plots every frame against `0..len(frame)`.
    x: Option<FrameData>,
    y: FrameData,
    style: Style,
    artist: Option<ArtistId>,
}

impl Line {
    pub fn new(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        x: impl Into<Input>,
        y: impl Into<Input>,
        opts: LineOptions,
    ) -> Result<Self> {
        Self::build(canvas, axes, Some(x.into()), y.into(), opts)
    }

    /// Line whose x values are the sample positions of each frame.
    pub fn from_y(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        y: impl Into<Input>,
        opts: LineOptions,
    ) -> Result<Self> {
        Self::build(canvas, axes, None, y.into(), opts)
    }

    /// Trace the curve `(x, y)` point by point: frame `i` shows the first
    /// `i + 1` points.
    pub fn parametric(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        x: ArrayView1<'_, f64>,
        y: ArrayView1<'_, f64>,
        style: Style,
    ) -> Result<Self> {
        let (xs, ys) = parametric_line(x, y)?;
        Self::new(canvas, axes, xs, ys, LineOptions { t_axis: 0, style })
    }

    fn build(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        x: Option<Input>,
        y: Input,
        opts: LineOptions,
    ) -> Result<Self> {
        let y = FrameData::from_input(y, opts.t_axis, "y")?;
        require_frame_ndim(&y, &[1], "line y")?;
        let x = x.map(|x| y.companion(x, "x")).transpose()?;
        let mut line = Self {
            axes,
            x,
            y,
            style: opts.style,
            artist: None,
        };
        line.render_initial(canvas)?;
        log::debug!("line block on axes {}: {} frames", axes.0, line.len());
        Ok(line)
    }

    /// The (x, y) pair drawn for frame `i`.
    pub fn frame_xy(&self, i: usize) -> Result<(Array1<f64>, Array1<f64>)> {
        let y = frame_1d(&self.y, i)?;
        let x = match &self.x {
            Some(x) => frame_1d(x, i)?,
            None => arange(y.len()),
        };
        Ok((x, y))
    }
}

impl Block for Line {
    fn len(&self) -> usize {
        self.y.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let (x, y) = self.frame_xy(0)?;
        let id = canvas.add_artist(
            self.axes,
            Artist::Line {
                x,
                y,
                style: self.style.clone(),
            },
        )?;
        self.artist = Some(id);
        Ok(())
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        let (x, y) = self.frame_xy(frame)?;
        canvas.update_artist(rendered(self.artist, "line")?, ArtistUpdate::LineData { x, y })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnimationError;
    use frameplot_canvas_core::Scene;
    use ndarray::{array, Array2, Array3};

    fn line_artist(scene: &Scene, axes: AxesId) -> (Array1<f64>, Array1<f64>) {
        match scene.artists(axes)[0] {
            Artist::Line { x, y, .. } => (x.clone(), y.clone()),
            other => panic!("expected a line, got {other:?}"),
        }
    }

    #[test]
    fn shared_x_is_broadcast_over_frames() {
        let (mut scene, ax) = Scene::with_axes();
        let y = Array2::from_shape_fn((3, 4), |(t, j)| (t * 10 + j) as f64);
        let mut line = Line::new(
            &mut scene,
            ax,
            array![0.0, 0.5, 1.0, 1.5],
            y,
            LineOptions::default(),
        )
        .unwrap();
        assert_eq!(line.len(), 3);
        line.update(2, &mut scene).unwrap();
        let (x, y) = line_artist(&scene, ax);
        assert_eq!(x, array![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(y, array![20.0, 21.0, 22.0, 23.0]);
    }

    #[test]
    fn missing_x_uses_sample_positions_for_ragged_frames() {
        let (mut scene, ax) = Scene::with_axes();
        let mut line = Line::from_y(
            &mut scene,
            ax,
            vec![array![5.0], array![5.0, 6.0, 7.0]],
            LineOptions::default(),
        )
        .unwrap();
        line.update(1, &mut scene).unwrap();
        assert_eq!(line_artist(&scene, ax).0, array![0.0, 1.0, 2.0]);
    }

    #[test]
    fn frames_must_be_one_dimensional() {
        let (mut scene, ax) = Scene::with_axes();
        let err = Line::from_y(
            &mut scene,
            ax,
            Array3::<f64>::zeros((2, 2, 2)),
            LineOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnimationError::TypeMismatch { .. }));
        assert!(scene.artists(ax).is_empty());
    }

    #[test]
    fn out_of_range_update_is_rejected() {
        let (mut scene, ax) = Scene::with_axes();
        let mut line = Line::from_y(
            &mut scene,
            ax,
            Array2::<f64>::zeros((2, 3)),
            LineOptions::default(),
        )
        .unwrap();
        assert_eq!(
            line.update(2, &mut scene).unwrap_err(),
            AnimationError::IndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn parametric_trail_grows() {
        let (mut scene, ax) = Scene::with_axes();
        let x = array![0.0, 1.0, 2.0];
        let y = array![0.0, 1.0, 4.0];
        let mut line = Line::parametric(&mut scene, ax, x.view(), y.view(), Style::default())
            .unwrap();
        assert_eq!(line.len(), 3);
        line.update(1, &mut scene).unwrap();
        let (xs, _) = line_artist(&scene, ax);
        assert_eq!(&xs.as_slice().unwrap()[..2], &[0.0, 1.0]);
        assert!(xs[2].is_nan());
    }
}
