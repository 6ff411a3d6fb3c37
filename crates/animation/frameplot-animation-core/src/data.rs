//! Input normalization: raw per-frame data resolved once into a canonical,
//! frame-indexable form.
//!
//! Callers hand blocks either one rectangular array with a designated time
//! axis, or a list of independently shaped frames ("ragged" input). Both are
//! captured by [`Input`] and resolved into [`FrameData`] at construction, so
//! nothing downstream branches on raw shapes again.

use ndarray::{Array, Array1, ArrayD, ArrayViewD, Axis, Dimension, IxDyn};

use crate::error::AnimationError;
use crate::Result;

/// Raw data as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Array(ArrayD<f64>),
    List(Vec<ArrayD<f64>>),
}

impl Input {
    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// The array, or a `TypeMismatch` naming `what` if a list was given.
    pub fn into_array(self, what: &str) -> Result<ArrayD<f64>> {
        match self {
            Self::Array(a) => Ok(a),
            Self::List(_) => Err(AnimationError::type_mismatch(format!(
                "{what} must be a single array, not a list of frames"
            ))),
        }
    }
}

impl<D: Dimension> From<Array<f64, D>> for Input {
    fn from(array: Array<f64, D>) -> Self {
        Self::Array(array.into_dyn())
    }
}

impl<D: Dimension> From<Vec<Array<f64, D>>> for Input {
    fn from(frames: Vec<Array<f64, D>>) -> Self {
        Self::List(frames.into_iter().map(|f| f.into_dyn()).collect())
    }
}

impl From<Vec<f64>> for Input {
    fn from(values: Vec<f64>) -> Self {
        Self::Array(Array1::from(values).into_dyn())
    }
}

impl From<&[f64]> for Input {
    fn from(values: &[f64]) -> Self {
        Self::Array(Array1::from(values.to_vec()).into_dyn())
    }
}

/// Canonical per-frame storage.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData {
    /// One array; frame `i` is the slice at `i` along `t_axis`.
    Rectangular { array: ArrayD<f64>, t_axis: usize },
    /// One array per frame, shapes may differ between frames.
    PerFrame(Vec<ArrayD<f64>>),
}

impl FrameData {
    /// Resolve a payload. `t_axis` is ignored for list input.
    pub fn from_input(input: Input, t_axis: usize, what: &str) -> Result<Self> {
        match input {
            Input::Array(array) => {
                let ndim = array.ndim();
                if ndim == 0 {
                    return Err(AnimationError::invalid(format!(
                        "{what} must have at least one dimension"
                    )));
                }
                if t_axis >= ndim {
                    return Err(AnimationError::invalid(format!(
                        "time axis {t_axis} is out of range for {what} with {ndim} dimensions"
                    )));
                }
                if array.len_of(Axis(t_axis)) == 0 {
                    return Err(AnimationError::invalid(format!("{what} has no frames")));
                }
                Ok(Self::Rectangular { array, t_axis })
            }
            Input::List(frames) => {
                if frames.is_empty() {
                    return Err(AnimationError::invalid(format!("{what} has no frames")));
                }
                Ok(Self::PerFrame(frames))
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Self::Rectangular { array, t_axis } => array.len_of(Axis(*t_axis)),
            Self::PerFrame(frames) => frames.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn is_list(&self) -> bool {
        matches!(self, Self::PerFrame(_))
    }

    pub fn t_axis(&self) -> Option<usize> {
        match self {
            Self::Rectangular { t_axis, .. } => Some(*t_axis),
            Self::PerFrame(_) => None,
        }
    }

    pub fn frame(&self, i: usize) -> Result<ArrayViewD<'_, f64>> {
        let len = self.len();
        if i >= len {
            return Err(AnimationError::IndexOutOfRange { index: i, len });
        }
        Ok(match self {
            Self::Rectangular { array, t_axis } => array.index_axis(Axis(*t_axis), i),
            Self::PerFrame(frames) => frames[i].view(),
        })
    }

    pub fn frames(&self) -> impl Iterator<Item = ArrayViewD<'_, f64>> + '_ {
        (0..self.len()).filter_map(move |i| self.frame(i).ok())
    }

    /// Shape shared by every frame, or a `ShapeMismatch` naming the first outlier.
    pub fn uniform_frame_shape(&self, what: &str) -> Result<Vec<usize>> {
        let first = self.frame(0)?.shape().to_vec();
        if let Self::PerFrame(frames) = self {
            for (i, f) in frames.iter().enumerate().skip(1) {
                if f.shape() != first.as_slice() {
                    return Err(AnimationError::shape(
                        format!("{what} (frame {i})"),
                        &first,
                        f.shape(),
                    ));
                }
            }
        }
        Ok(first)
    }

    /// Global (min, max) over every frame, ignoring NaN. `None` if all NaN.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        let mut acc: Option<(f64, f64)> = None;
        for frame in self.frames() {
            for &v in frame.iter().filter(|v| !v.is_nan()) {
                acc = Some(match acc {
                    None => (v, v),
                    Some((lo, hi)) => (lo.min(v), hi.max(v)),
                });
            }
        }
        acc
    }

    /// Resolve `input` as a companion of this payload (x for y, V for U, sizes
    /// for points).
    ///
    /// A rectangular companion with one fewer dimension than the payload whose
    /// shape equals the payload's non-time dimensions is repeated along the
    /// time axis. Against list payloads, an array companion is repeated for
    /// every frame and must match each frame's shape.
    pub fn companion(&self, input: Input, what: &str) -> Result<FrameData> {
        match (self, input) {
            (Self::Rectangular { array, t_axis }, Input::Array(c)) => {
                if c.shape() == array.shape() {
                    return Ok(Self::Rectangular {
                        array: c,
                        t_axis: *t_axis,
                    });
                }
                let mut frame_shape = array.shape().to_vec();
                frame_shape.remove(*t_axis);
                if c.shape() != frame_shape.as_slice() {
                    return Err(AnimationError::shape(what, array.shape(), c.shape()));
                }
                let repeated = repeat_along(c, *t_axis, array.raw_dim(), what)?;
                Ok(Self::Rectangular {
                    array: repeated,
                    t_axis: *t_axis,
                })
            }
            (Self::Rectangular { .. }, Input::List(_)) => Err(AnimationError::type_mismatch(
                format!("{what} is a list of frames but the data it pairs with is a single array"),
            )),
            (Self::PerFrame(frames), Input::Array(c)) => {
                for (i, f) in frames.iter().enumerate() {
                    if f.shape() != c.shape() {
                        return Err(AnimationError::shape(
                            format!("{what} (frame {i})"),
                            f.shape(),
                            c.shape(),
                        ));
                    }
                }
                let mut dims = Vec::with_capacity(c.ndim() + 1);
                dims.push(frames.len());
                dims.extend_from_slice(c.shape());
                let repeated = repeat_along(c, 0, IxDyn(&dims), what)?;
                Ok(Self::Rectangular {
                    array: repeated,
                    t_axis: 0,
                })
            }
            (Self::PerFrame(frames), Input::List(cs)) => {
                if cs.len() != frames.len() {
                    return Err(AnimationError::length(what, frames.len(), cs.len()));
                }
                for (i, (f, c)) in frames.iter().zip(cs.iter()).enumerate() {
                    if f.shape() != c.shape() {
                        return Err(AnimationError::shape(
                            format!("{what} (frame {i})"),
                            f.shape(),
                            c.shape(),
                        ));
                    }
                }
                Ok(Self::PerFrame(cs))
            }
        }
    }

    /// Elementwise map over every frame, keeping the layout.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> FrameData {
        match self {
            Self::Rectangular { array, t_axis } => Self::Rectangular {
                array: array.mapv(&f),
                t_axis: *t_axis,
            },
            Self::PerFrame(frames) => Self::PerFrame(frames.iter().map(|a| a.mapv(&f)).collect()),
        }
    }
}

fn repeat_along(c: ArrayD<f64>, axis: usize, target: IxDyn, what: &str) -> Result<ArrayD<f64>> {
    let expanded = c.insert_axis(Axis(axis));
    let view = expanded
        .broadcast(target.clone())
        .ok_or_else(|| AnimationError::shape(what, target.slice(), expanded.shape()))?;
    Ok(view.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2, Array3};

    #[test]
    fn rectangular_frames_follow_time_axis() {
        let y = Array2::from_shape_fn((3, 4), |(i, j)| (i * 10 + j) as f64);
        let data = FrameData::from_input(y.clone().into(), 0, "y").unwrap();
        assert_eq!(data.len(), 3);
        assert_eq!(data.frame(1).unwrap(), y.row(1).into_dyn());

        let along_cols = FrameData::from_input(y.clone().into(), 1, "y").unwrap();
        assert_eq!(along_cols.len(), 4);
        assert_eq!(along_cols.frame(2).unwrap(), y.column(2).into_dyn());
    }

    #[test]
    fn out_of_range_frame_is_an_error() {
        let data = FrameData::from_input(Array2::<f64>::zeros((2, 2)).into(), 0, "y").unwrap();
        assert_eq!(
            data.frame(2).unwrap_err(),
            AnimationError::IndexOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn bad_time_axis_and_empty_inputs() {
        assert!(FrameData::from_input(Array2::<f64>::zeros((2, 2)).into(), 2, "y").is_err());
        assert!(FrameData::from_input(Input::List(vec![]), 0, "y").is_err());
        assert!(FrameData::from_input(Array2::<f64>::zeros((0, 2)).into(), 0, "y").is_err());
    }

    #[test]
    fn companion_broadcasts_time_invariant_array() {
        let y = FrameData::from_input(Array3::<f64>::zeros((4, 2, 3)).into(), 0, "y").unwrap();
        let x = Array2::from_shape_fn((2, 3), |(i, j)| (i + j) as f64);
        let resolved = y.companion(x.clone().into(), "x").unwrap();
        assert_eq!(resolved.len(), 4);
        for i in 0..4 {
            assert_eq!(resolved.frame(i).unwrap(), x.view().into_dyn());
        }
    }

    #[test]
    fn companion_broadcasts_on_a_late_time_axis() {
        let y = FrameData::from_input(Array3::<f64>::zeros((2, 3, 5)).into(), 2, "y").unwrap();
        let x = Array2::from_elem((2, 3), 7.0);
        let resolved = y.companion(x.into(), "x").unwrap();
        assert_eq!(resolved.t_axis(), Some(2));
        assert_eq!(resolved.len(), 5);
    }

    #[test]
    fn companion_rejects_mismatched_shape() {
        let y = FrameData::from_input(Array2::<f64>::zeros((5, 20)).into(), 0, "y").unwrap();
        let err = y.companion(Array2::<f64>::zeros((5, 19)).into(), "x").unwrap_err();
        assert_eq!(err, AnimationError::shape("x", &[5, 20], &[5, 19]));
    }

    #[test]
    fn ragged_companions() {
        let y = FrameData::from_input(
            vec![array![1.0, 2.0], array![1.0, 2.0, 3.0]].into(),
            0,
            "y",
        )
        .unwrap();
        let ok = y
            .companion(vec![array![0.0, 1.0], array![0.0, 1.0, 2.0]].into(), "x")
            .unwrap();
        assert_eq!(ok.frame(1).unwrap().len(), 3);

        let short = y.companion(vec![array![0.0, 1.0]].into(), "x").unwrap_err();
        assert_eq!(short, AnimationError::length("x", 2, 1));

        let bad = y
            .companion(vec![array![0.0, 1.0], array![0.0, 1.0]].into(), "x")
            .unwrap_err();
        assert!(matches!(bad, AnimationError::ShapeMismatch { what, .. } if what == "x (frame 1)"));

        // a constant array must match every ragged frame
        assert!(y.companion(array![0.0, 1.0].into(), "x").is_err());
    }

    #[test]
    fn min_max_ignores_nan() {
        let data = FrameData::from_input(
            vec![array![f64::NAN, 1.0], array![-3.0, 2.0]].into(),
            0,
            "c",
        )
        .unwrap();
        assert_eq!(data.min_max(), Some((-3.0, 2.0)));
    }

    #[test]
    fn uniform_shape_detects_ragged_outlier() {
        let data = FrameData::from_input(
            vec![Array2::<f64>::zeros((2, 2)), Array2::<f64>::zeros((2, 3))].into(),
            0,
            "C",
        )
        .unwrap();
        assert!(data.uniform_frame_shape("C").is_err());
    }
}
