//! Transport controls: the play/pause toggle, the timeline slider and the
//! printf-style formatting of the slider's value text.

use frameplot_canvas_core::{ArtistId, AxesId};
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::timeline::Timeline;
use crate::Result;

/// Whether the frame clock is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    #[default]
    Playing,
    Paused,
}

impl PlaybackState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    /// The state a toggle press moves to.
    #[inline]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Playing => Self::Paused,
            Self::Paused => Self::Playing,
        }
    }
}

impl From<&str> for PlaybackState {
    fn from(s: &str) -> Self {
        match s {
            "paused" => Self::Paused,
            _ => Self::Playing,
        }
    }
}

/// Timeline slider settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub text: String,
    /// printf-style format for the displayed time value; `%1.2f` when unset.
    pub valfmt: Option<String>,
    /// Explicit axes; a control slot is allocated when unset.
    #[serde(skip)]
    pub axes: Option<AxesId>,
    pub color: Option<String>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            text: "Time".to_string(),
            valfmt: None,
            axes: None,
            color: None,
        }
    }
}

impl SliderConfig {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_valfmt(mut self, valfmt: impl Into<String>) -> Self {
        self.valfmt = Some(valfmt.into());
        self
    }

    pub fn with_axes(mut self, axes: AxesId) -> Self {
        self.axes = Some(axes);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Full value format: the base format, `10^{..}`-wrapped for log
    /// timelines, followed by the units.
    pub fn display_format(&self, timeline: &Timeline) -> String {
        let base = self.valfmt.as_deref().unwrap_or("%1.2f");
        let base = if timeline.is_log() {
            format!("$10^{{{base}}}$")
        } else {
            base.to_string()
        };
        format!("{base}{}", timeline.units())
    }
}

/// Play/pause button settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleConfig {
    /// Shown while playing.
    pub pause_label: String,
    /// Shown while paused.
    pub play_label: String,
    #[serde(skip)]
    pub axes: Option<AxesId>,
}

impl Default for ToggleConfig {
    fn default() -> Self {
        Self {
            pause_label: "Pause".to_string(),
            play_label: "Play".to_string(),
            axes: None,
        }
    }
}

impl ToggleConfig {
    pub fn with_axes(mut self, axes: AxesId) -> Self {
        self.axes = Some(axes);
        self
    }
}

/// A slider that has been placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SliderHandle {
    pub(crate) axes: AxesId,
    pub(crate) artist: ArtistId,
    pub(crate) config: SliderConfig,
    pub(crate) format: String,
    /// The timeline changed length since the slider's bounds were sent.
    pub(crate) range_stale: bool,
}

/// A toggle button that has been placed on the canvas.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ToggleHandle {
    pub(crate) axes: AxesId,
    pub(crate) artist: ArtistId,
}

/// Render `value` with a printf-style format string.
///
/// Supports `%%` and conversions `%[flags][width][.precision](f|F|e|E|g|G|d|i|s)`
/// with flags `-`, `+`, `0` and space. Text outside conversions is copied.
pub fn format_value(fmt: &str, value: f64) -> Result<String> {
    let mut out = String::with_capacity(fmt.len() + 8);
    let mut chars = fmt.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'%') {
            chars.next();
            out.push('%');
            continue;
        }
        let mut conv = Conversion::default();
        while let Some(&f) = chars.peek() {
            match f {
                '-' => conv.left = true,
                '+' => conv.plus = true,
                '0' => conv.zero = true,
                ' ' => conv.space = true,
                _ => break,
            }
            chars.next();
        }
        conv.width = take_number(&mut chars);
        if chars.peek() == Some(&'.') {
            chars.next();
            conv.precision = Some(take_number(&mut chars).unwrap_or(0));
        }
        let kind = chars.next().ok_or_else(|| {
            AnimationError::invalid(format!("incomplete conversion at end of format '{fmt}'"))
        })?;
        out.push_str(&conv.render(kind, value, fmt)?);
    }
    Ok(out)
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<usize> {
    let mut digits = String::new();
    while let Some(&d) = chars.peek() {
        if !d.is_ascii_digit() {
            break;
        }
        digits.push(d);
        chars.next();
    }
    digits.parse().ok()
}

#[derive(Debug, Default)]
struct Conversion {
    left: bool,
    plus: bool,
    zero: bool,
    space: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

impl Conversion {
    fn render(&self, kind: char, value: f64, fmt: &str) -> Result<String> {
        let body = match kind {
            'f' | 'F' => fixed(value.abs(), self.precision.unwrap_or(6)),
            'e' | 'E' => scientific(value.abs(), self.precision.unwrap_or(6)),
            'g' | 'G' => general(value.abs(), self.precision.unwrap_or(6)),
            'd' | 'i' => format!("{}", value.abs().trunc()),
            's' => {
                let text = if value.fract() == 0.0 && value.is_finite() {
                    format!("{value:.1}")
                } else {
                    format!("{value}")
                };
                return Ok(self.pad(String::new(), text));
            }
            other => {
                return Err(AnimationError::invalid(format!(
                    "unsupported conversion '%{other}' in format '{fmt}'"
                )))
            }
        };
        let body = if kind.is_ascii_uppercase() {
            body.to_uppercase()
        } else {
            body
        };
        let shown = if matches!(kind, 'd' | 'i') {
            value.trunc()
        } else {
            value
        };
        let sign = if shown.is_sign_negative() && shown != 0.0 {
            "-"
        } else if self.plus {
            "+"
        } else if self.space {
            " "
        } else {
            ""
        };
        Ok(self.pad(sign.to_string(), body))
    }

    fn pad(&self, sign: String, body: String) -> String {
        let width = self.width.unwrap_or(0);
        let len = sign.chars().count() + body.chars().count();
        if len >= width {
            return sign + &body;
        }
        let fill = width - len;
        if self.left {
            format!("{sign}{body}{}", " ".repeat(fill))
        } else if self.zero {
            format!("{sign}{}{body}", "0".repeat(fill))
        } else {
            format!("{}{sign}{body}", " ".repeat(fill))
        }
    }
}

fn fixed(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    format!("{v:.precision$}")
}

fn scientific(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    let raw = format!("{v:.precision$e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

/// `%g`: fixed or scientific depending on the exponent, trailing zeros removed.
pub(crate) fn general(v: f64, precision: usize) -> String {
    if !v.is_finite() {
        return non_finite(v);
    }
    let p = precision.max(1);
    if v == 0.0 {
        return "0".to_string();
    }
    // Exponent after rounding to p significant digits.
    let sci = format!("{v:.prec$e}", prec = p - 1);
    let exp: i32 = sci
        .split_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);
    if exp < -4 || exp >= p as i32 {
        let s = scientific(v, p - 1);
        match s.split_once('e') {
            Some((m, e)) => format!("{}e{e}", strip_zeros(m)),
            None => s,
        }
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        strip_zeros(&format!("{v:.decimals$}")).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn non_finite(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else {
        "inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::TimelineOptions;

    #[test]
    fn default_slider_format() {
        assert_eq!(format_value("%1.2f", 3.14159).unwrap(), "3.14");
        assert_eq!(format_value("%1.2fs", -0.5).unwrap(), "-0.50s");
    }

    #[test]
    fn width_flags_and_percent() {
        assert_eq!(format_value("%6.1f", 2.26).unwrap(), "   2.3");
        assert_eq!(format_value("%-5d|", 42.0).unwrap(), "42   |");
        assert_eq!(format_value("%05d", -7.0).unwrap(), "-0007");
        assert_eq!(format_value("%+.0f%%", 50.0).unwrap(), "+50%");
    }

    #[test]
    fn scientific_and_general() {
        assert_eq!(format_value("%.2e", 12345.0).unwrap(), "1.23e+04");
        assert_eq!(format_value("%g", 0.0001).unwrap(), "0.0001");
        assert_eq!(format_value("%g", 0.00001).unwrap(), "1e-05");
        assert_eq!(format_value("%g", 2.5).unwrap(), "2.5");
        assert_eq!(format_value("%.3g", 1234.0).unwrap(), "1.23e+03");
        assert_eq!(format_value("%s", 3.0).unwrap(), "3.0");
    }

    #[test]
    fn malformed_formats_are_rejected() {
        assert!(format_value("%", 1.0).is_err());
        assert!(format_value("%q", 1.0).is_err());
    }

    #[test]
    fn display_format_wraps_log_and_appends_units() {
        let linear =
            Timeline::with_options(vec![1.0, 2.0], TimelineOptions::default().with_units(" s"))
                .unwrap();
        assert_eq!(SliderConfig::default().display_format(&linear), "%1.2f s");

        let log = Timeline::with_options(
            vec![1.0, 10.0],
            TimelineOptions::default().with_log(true),
        )
        .unwrap();
        let cfg = SliderConfig::default().with_valfmt("%.1f");
        assert_eq!(cfg.display_format(&log), "$10^{%.1f}$");
        assert_eq!(format_value(&cfg.display_format(&log), log[1]).unwrap(), "$10^{1.0}$");
    }

    #[test]
    fn playback_state_toggles() {
        assert_eq!(PlaybackState::default(), PlaybackState::Playing);
        assert_eq!(PlaybackState::Playing.toggled(), PlaybackState::Paused);
        assert!(PlaybackState::from("paused").is_paused());
        assert_eq!(PlaybackState::Paused.name(), "paused");
    }
}
