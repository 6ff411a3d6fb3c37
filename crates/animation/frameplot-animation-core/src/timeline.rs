//! The shared clock state: time values, display metadata and the current frame.

use std::fmt;
use std::ops::Range;
use std::time::Duration;

use ndarray::{Array, Array1, ArrayD, ArrayView1, Dimension};
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::util::demeshgrid;
use crate::Result;

/// Raw time values; any dimensionality, resolved to 1-D by [`Timeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimeValues(pub ArrayD<f64>);

impl<D: Dimension> From<Array<f64, D>> for TimeValues {
    fn from(array: Array<f64, D>) -> Self {
        Self(array.into_dyn())
    }
}

impl From<Vec<f64>> for TimeValues {
    fn from(values: Vec<f64>) -> Self {
        Self(Array1::from(values).into_dyn())
    }
}

impl From<&[f64]> for TimeValues {
    fn from(values: &[f64]) -> Self {
        Self(Array1::from(values.to_vec()).into_dyn())
    }
}

impl From<Range<usize>> for TimeValues {
    fn from(range: Range<usize>) -> Self {
        Self(range.map(|i| i as f64).collect::<Array1<f64>>().into_dyn())
    }
}

/// Display metadata and playback rate for a timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    pub units: String,
    /// Frames per second.
    pub fps: f64,
    /// Store (and display) the base-10 logarithm of the time values.
    pub log: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            units: String::new(),
            fps: 10.0,
            log: false,
        }
    }
}

impl TimelineOptions {
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_log(mut self, log: bool) -> Self {
        self.log = log;
        self
    }
}

/// Authoritative "current frame" for an animation.
///
/// `index` is always a valid position into `t`. It changes only through
/// [`advance`](Self::advance) (clock ticks), [`seek`](Self::seek) (scrubbing)
/// and [`step_back`](Self::step_back) (export rewind).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    t: Array1<f64>,
    units: String,
    fps: f64,
    log: bool,
    index: usize,
}

impl Timeline {
    /// Timeline with default options (no units, 10 fps, linear).
    pub fn new(t: impl Into<TimeValues>) -> Result<Self> {
        Self::with_options(t, TimelineOptions::default())
    }

    pub fn with_options(t: impl Into<TimeValues>, opts: TimelineOptions) -> Result<Self> {
        let TimeValues(raw) = t.into();
        let mut t = if raw.ndim() == 1 {
            raw.iter().copied().collect::<Array1<f64>>()
        } else {
            demeshgrid(raw.view()).ok_or_else(|| {
                AnimationError::invalid("could not interpret time values; pass a 1-D array instead")
            })?
        };
        if t.is_empty() {
            return Err(AnimationError::invalid("timeline needs at least one time value"));
        }
        frame_interval(opts.fps)?;
        if opts.log {
            if let Some(bad) = t.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
                return Err(AnimationError::invalid(format!(
                    "log timeline requires strictly positive time values, got {bad}"
                )));
            }
            t.mapv_inplace(f64::log10);
        }
        log::debug!(
            "timeline: {} frames, units='{}', fps={}, log={}",
            t.len(),
            opts.units,
            opts.fps,
            opts.log
        );
        Ok(Self {
            t,
            units: opts.units,
            fps: opts.fps,
            log: opts.log,
            index: 0,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.t.len()
    }

    /// Always false; a timeline holds at least one frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn get(&self, i: usize) -> Result<f64> {
        self.t
            .get(i)
            .copied()
            .ok_or(AnimationError::IndexOutOfRange {
                index: i,
                len: self.len(),
            })
    }

    /// Stored values (already log10-transformed for log timelines).
    pub fn values(&self) -> ArrayView1<'_, f64> {
        self.t.view()
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Time value at the current frame.
    #[inline]
    pub fn current(&self) -> f64 {
        self.t[self.index]
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn is_log(&self) -> bool {
        self.log
    }

    /// Delay between frames (`1000 / fps` milliseconds).
    pub fn interval(&self) -> Duration {
        // Deserialized timelines skip the fps check in `with_options`.
        frame_interval(self.fps).unwrap_or(Duration::MAX)
    }

    /// Move to the next frame, wrapping to 0 after the last.
    #[inline]
    pub fn advance(&mut self) {
        self.index = (self.index + 1) % self.len();
    }

    /// Jump to frame `i`.
    pub fn seek(&mut self, i: usize) -> Result<()> {
        if i >= self.len() {
            return Err(AnimationError::IndexOutOfRange {
                index: i,
                len: self.len(),
            });
        }
        self.index = i;
        Ok(())
    }

    /// Move to the previous frame, wrapping to the last from 0.
    #[inline]
    pub fn step_back(&mut self) {
        self.index = (self.index + self.len() - 1) % self.len();
    }
}

impl std::ops::Index<usize> for Timeline {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.t[i]
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.t.iter().map(|v| format!("{v:?}")).collect();
        write!(
            f,
            "Timeline(t=[{}], units='{}', fps={})",
            values.join(", "),
            self.units,
            self.fps
        )
    }
}

/// Frame delay for `fps`, rejecting rates whose delay a `Duration` cannot hold.
pub(crate) fn frame_interval(fps: f64) -> Result<Duration> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(AnimationError::invalid(format!(
            "fps must be a positive number, got {fps}"
        )));
    }
    Duration::try_from_secs_f64(1.0 / fps).map_err(|e| {
        AnimationError::invalid(format!("fps {fps} gives an unusable frame interval: {e}"))
    })
}
