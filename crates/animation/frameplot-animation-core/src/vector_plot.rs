//! One-call animation of a 2-D vector field.

use frameplot_canvas_core::{AxesId, Canvas, Style};

use crate::animation::Animation;
use crate::blocks::{vector_comp, VectorCompOptions};
use crate::data::Input;
use crate::timeline::{TimeValues, Timeline, TimelineOptions};
use crate::Result;

#[derive(Clone, Debug)]
pub struct VectorPlotOptions {
    /// Draw every `skip`-th arrow. Best when it divides the grid extent minus one.
    pub skip: usize,
    /// Time axis of U and V; 0 matches `meshgrid`-style 3-D inputs.
    pub t_axis: usize,
    pub units: String,
    pub fps: f64,
    pub mesh_style: Style,
    pub quiver_style: Style,
}

impl Default for VectorPlotOptions {
    fn default() -> Self {
        Self {
            skip: 5,
            t_axis: 0,
            units: String::new(),
            fps: 10.0,
            mesh_style: Style::default(),
            quiver_style: Style::default(),
        }
    }
}

impl VectorPlotOptions {
    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_t_axis(mut self, t_axis: usize) -> Self {
        self.t_axis = t_axis;
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }
}

/// Magnitude mesh plus direction arrows over a fixed `x`/`y` grid, animated
/// on a timeline built from `t`.
///
/// The returned animation holds the pcolormesh and the quiver in that order;
/// use [`Animation::blocks`] and [`Animation::timeline`] to reach them.
#[allow(clippy::too_many_arguments)]
pub fn vector_plot(
    canvas: &mut dyn Canvas,
    axes: AxesId,
    x: impl Into<Input>,
    y: impl Into<Input>,
    u: impl Into<Input>,
    v: impl Into<Input>,
    t: impl Into<TimeValues>,
    opts: VectorPlotOptions,
) -> Result<Animation> {
    let timeline = Timeline::with_options(
        t,
        TimelineOptions::default()
            .with_units(opts.units)
            .with_fps(opts.fps),
    )?;
    let comp = VectorCompOptions {
        t_axis: opts.t_axis,
        skip: opts.skip,
        mesh_style: opts.mesh_style,
        quiver_style: opts.quiver_style,
        ..VectorCompOptions::default()
    }
    .with_grid(x, y);
    let (mesh, quiver) = vector_comp(canvas, axes, u, v, comp)?;
    Animation::new(vec![mesh.into(), quiver.into()], timeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::Block;
    use crate::util::arange;
    use frameplot_canvas_core::Scene;
    use ndarray::Array3;

    #[test]
    fn builds_mesh_and_quiver_on_one_timeline() {
        let (mut scene, ax) = Scene::with_axes();
        let u = Array3::<f64>::ones((4, 6, 6));
        let v = Array3::<f64>::zeros((4, 6, 6));
        let anim = vector_plot(
            &mut scene,
            ax,
            arange(6),
            arange(6),
            u,
            v,
            vec![0.0, 0.1, 0.2, 0.3],
            VectorPlotOptions::default().with_units(" s").with_fps(5.0),
        )
        .unwrap();
        assert_eq!(anim.len(), 4);
        assert_eq!(anim.timeline().units(), " s");
        let names: Vec<_> = anim.blocks().iter().map(|b| b.name()).collect();
        assert_eq!(names, ["pcolormesh", "quiver"]);
        assert!(anim.blocks().iter().all(|b| b.axes() == ax));
    }

    #[test]
    fn timeline_length_must_match_field() {
        let (mut scene, ax) = Scene::with_axes();
        let u = Array3::<f64>::ones((3, 5, 5));
        let err = vector_plot(
            &mut scene,
            ax,
            arange(5),
            arange(5),
            u.clone(),
            u,
            vec![0.0, 1.0],
            VectorPlotOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.category(), "validation");
    }
}
