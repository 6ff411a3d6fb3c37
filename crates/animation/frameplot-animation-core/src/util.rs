//! Array helpers shared by the timeline and the blocks.

use ndarray::{Array1, Array2, ArrayView1, ArrayViewD, Axis};

use crate::error::AnimationError;
use crate::Result;

/// `[0, 1, ..., n-1]` as floats.
pub fn arange(n: usize) -> Array1<f64> {
    Array1::from_iter((0..n).map(|i| i as f64))
}

/// Cartesian grid with "xy" indexing: both outputs have shape `(len(y), len(x))`,
/// `X[i, j] = x[j]` and `Y[i, j] = y[i]`.
pub fn meshgrid(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (y.len(), x.len());
    let xx = Array2::from_shape_fn(shape, |(_, j)| x[j]);
    let yy = Array2::from_shape_fn(shape, |(i, _)| y[i]);
    (xx, yy)
}

/// Staggered trail matrices for drawing a curve point by point.
///
/// Row `i` holds the first `i + 1` points of the curve and NaN after them,
/// so frame `i` of a line built from the rows shows the curve up to point `i`.
pub fn parametric_line(
    x: ArrayView1<'_, f64>,
    y: ArrayView1<'_, f64>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    if x.len() != y.len() {
        return Err(AnimationError::length("parametric y", x.len(), y.len()));
    }
    let n = x.len();
    let xs = Array2::from_shape_fn((n, n), |(i, j)| if j <= i { x[j] } else { f64::NAN });
    let ys = Array2::from_shape_fn((n, n), |(i, j)| if j <= i { y[j] } else { f64::NAN });
    Ok((xs, ys))
}

/// Recover the 1-D axis a broadcast grid was built from.
///
/// Returns the 1-D slice along the first axis for which every element equals
/// the element at the same position along that axis with all other indices at
/// zero, i.e. the array is invariant along every other axis. `None` when no
/// axis qualifies.
pub fn demeshgrid(arr: ArrayViewD<'_, f64>) -> Option<Array1<f64>> {
    let ndim = arr.ndim();
    if ndim == 0 || arr.is_empty() {
        return None;
    }
    if ndim == 1 {
        return Some(arr.iter().copied().collect());
    }
    (0..ndim).find_map(|axis| {
        let candidate = axis_line(&arr, axis);
        let invariant = arr
            .indexed_iter()
            .all(|(idx, &v)| v == candidate[idx[axis]]);
        invariant.then_some(candidate)
    })
}

fn axis_line(arr: &ArrayViewD<'_, f64>, axis: usize) -> Array1<f64> {
    let mut view = arr.view();
    // Collapse from the back so the remaining axis numbers stay valid.
    for other in (0..arr.ndim()).rev() {
        if other != axis {
            view = view.index_axis_move(Axis(other), 0);
        }
    }
    view.iter().copied().collect()
}
