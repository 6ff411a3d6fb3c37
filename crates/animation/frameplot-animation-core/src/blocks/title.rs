//! Animated axes titles, either one string per frame or a format template
//! filled with per-frame values.

use std::fmt;

use frameplot_canvas_core::{AxesId, Canvas, Style};
use serde::{Deserialize, Serialize};

use super::{check_frame, Block};
use crate::controls::general;
use crate::error::AnimationError;
use crate::Result;

/// One substitution value for a title template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for TitleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => f.write_str(&float_repr(*v)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

macro_rules! title_value_from {
    ($variant:ident: $($t:ty),*) => {
        $(
            impl From<$t> for TitleValue {
                fn from(v: $t) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

title_value_from!(Int: i64, i32, u32, i16, u16, i8, u8);
title_value_from!(Float: f64, f32);
title_value_from!(Text: String, &str);

impl From<usize> for TitleValue {
    fn from(v: usize) -> Self {
        Self::Int(v as i64)
    }
}

/// A format template plus the per-frame values of its named fields.
///
/// Syntax: `{name}` or `{name:spec}` for per-frame fields, `{}` / `{0}` for
/// constant positional arguments, `{{` and `}}` for literal braces. A spec is
/// `[width][.precision][type]` with type one of `d`, `f`, `e`, `%`, `s`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TitleTemplate {
    template: String,
    fields: Vec<(String, Vec<TitleValue>)>,
    args: Vec<TitleValue>,
}

impl TitleTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            ..Self::default()
        }
    }

    /// Per-frame values for the field `name`.
    pub fn field<V: Into<TitleValue>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.fields
            .push((name.into(), values.into_iter().map(Into::into).collect()));
        self
    }

    /// A positional argument, the same for every frame.
    pub fn arg(mut self, value: impl Into<TitleValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Expand into one title per frame.
    pub fn render(&self) -> Result<Vec<String>> {
        let segments = parse(&self.template)?;
        self.check_usage(&segments)?;

        let frames = match self.fields.first() {
            None => 1,
            Some((_, values)) => values.len(),
        };
        for (name, values) in &self.fields {
            if values.len() != frames {
                return Err(AnimationError::length(
                    format!("title field '{name}'"),
                    frames,
                    values.len(),
                ));
            }
        }
        if frames == 0 {
            return Err(AnimationError::invalid("title fields have no values"));
        }

        (0..frames)
            .map(|i| {
                let mut out = String::new();
                for seg in &segments {
                    match seg {
                        Segment::Literal(text) => out.push_str(text),
                        Segment::Field { key, spec } => {
                            let value = self.lookup(key, i)?;
                            out.push_str(&spec.apply(value)?);
                        }
                    }
                }
                Ok(out)
            })
            .collect()
    }

    fn lookup(&self, key: &Key, frame: usize) -> Result<&TitleValue> {
        match key {
            Key::Named(name) => self
                .fields
                .iter()
                .find(|(n, _)| n == name)
                .and_then(|(_, values)| values.get(frame))
                .ok_or_else(|| {
                    AnimationError::invalid(format!("title template field '{name}' has no values"))
                }),
            Key::Positional(idx) => self.args.get(*idx).ok_or_else(|| {
                AnimationError::invalid(format!(
                    "title template refers to positional argument {idx}, but only {} given",
                    self.args.len()
                ))
            }),
        }
    }

    /// Every field in the template is supplied and every supplied value is used.
    fn check_usage(&self, segments: &[Segment]) -> Result<()> {
        let keys: Vec<&Key> = segments
            .iter()
            .filter_map(|s| match s {
                Segment::Field { key, .. } => Some(key),
                Segment::Literal(_) => None,
            })
            .collect();
        for key in &keys {
            match key {
                Key::Named(name) if !self.fields.iter().any(|(n, _)| n == name) => {
                    return Err(AnimationError::invalid(format!(
                        "title template field '{name}' was not given any values"
                    )));
                }
                Key::Positional(idx) if *idx >= self.args.len() => {
                    return Err(AnimationError::invalid(format!(
                        "title template refers to positional argument {idx}, but only {} given",
                        self.args.len()
                    )));
                }
                _ => {}
            }
        }
        if let Some((name, _)) = self
            .fields
            .iter()
            .find(|(n, _)| !keys.iter().any(|k| matches!(k, Key::Named(kn) if kn == n)))
        {
            return Err(AnimationError::invalid(format!(
                "title field '{name}' does not appear in the template"
            )));
        }
        if let Some(idx) =
            (0..self.args.len()).find(|i| !keys.iter().any(|k| matches!(k, Key::Positional(p) if p == i)))
        {
            return Err(AnimationError::invalid(format!(
                "positional title argument {idx} does not appear in the template"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Key {
    Named(String),
    Positional(usize),
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Field { key: Key, spec: FormatSpec },
}

fn parse(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();
    let mut auto_index = 0usize;
    // Positional fields are either all `{}` or all `{N}`.
    let mut numbering: Option<bool> = None;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => {
                return Err(AnimationError::invalid(
                    "single '}' encountered in title template",
                ))
            }
            '{' => {
                let mut inner = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(AnimationError::invalid(format!(
                                "unterminated field in title template '{template}'"
                            )))
                        }
                        Some(ch) => inner.push(ch),
                    }
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let (name, spec) = match inner.split_once(':') {
                    Some((n, s)) => (n, FormatSpec::parse(s)?),
                    None => (inner.as_str(), FormatSpec::default()),
                };
                let automatic = name.is_empty();
                let key = if automatic {
                    auto_index += 1;
                    Key::Positional(auto_index - 1)
                } else if let Ok(idx) = name.parse::<usize>() {
                    Key::Positional(idx)
                } else {
                    Key::Named(name.to_string())
                };
                if matches!(key, Key::Positional(_))
                    && *numbering.get_or_insert(automatic) != automatic
                {
                    return Err(AnimationError::invalid(
                        "cannot mix automatic and manual field numbering in a title template",
                    ));
                }
                segments.push(Segment::Field { key, spec });
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct FormatSpec {
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl FormatSpec {
    fn parse(spec: &str) -> Result<Self> {
        let bad = || AnimationError::invalid(format!("invalid format spec '{spec}' in title template"));
        let (body, kind) = match spec.chars().last() {
            Some(c @ ('d' | 'f' | 'e' | '%' | 's')) => (&spec[..spec.len() - 1], Some(c)),
            _ => (spec, None),
        };
        let (width, precision) = match body.split_once('.') {
            Some((w, p)) => (w, Some(p.parse::<usize>().map_err(|_| bad())?)),
            None => (body, None),
        };
        let (zero, width) = match width.strip_prefix('0') {
            Some(rest) if !rest.is_empty() => (true, rest),
            _ => (false, width),
        };
        let width = if width.is_empty() {
            None
        } else {
            Some(width.parse::<usize>().map_err(|_| bad())?)
        };
        Ok(Self {
            zero,
            width,
            precision,
            kind,
        })
    }

    fn apply(&self, value: &TitleValue) -> Result<String> {
        let mismatch = |kind: char| {
            AnimationError::type_mismatch(format!(
                "format code '{kind}' cannot be used with title value {value:?}"
            ))
        };
        let numeric = |v: &TitleValue| match v {
            TitleValue::Int(i) => Some(*i as f64),
            TitleValue::Float(f) => Some(*f),
            TitleValue::Text(_) => None,
        };
        let body = match (self.kind, value) {
            (None, TitleValue::Float(v)) => match self.precision {
                Some(p) => general_repr(*v, p),
                None => float_repr(*v),
            },
            (None, TitleValue::Text(s)) | (Some('s'), TitleValue::Text(s)) => match self.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s.clone(),
            },
            (None, TitleValue::Int(i)) | (Some('d'), TitleValue::Int(i)) => i.to_string(),
            (Some('f'), v) => {
                let x = numeric(v).ok_or_else(|| mismatch('f'))?;
                format!("{x:.p$}", p = self.precision.unwrap_or(6))
            }
            (Some('e'), v) => {
                let x = numeric(v).ok_or_else(|| mismatch('e'))?;
                exp_repr(x, self.precision.unwrap_or(6))
            }
            (Some('%'), v) => {
                let x = numeric(v).ok_or_else(|| mismatch('%'))?;
                format!("{:.p$}%", x * 100.0, p = self.precision.unwrap_or(6))
            }
            (Some(kind), _) => return Err(mismatch(kind)),
        };
        let width = self.width.unwrap_or(0);
        Ok(match value {
            TitleValue::Text(_) if self.zero => format!("{body:0<width$}"),
            TitleValue::Text(_) => format!("{body:<width$}"),
            _ if self.zero => zero_pad(&body, width),
            _ => format!("{body:>width$}"),
        })
    }
}

/// Shortest round-tripping decimal, written the way Python prints floats.
fn float_repr(v: f64) -> String {
    if v.is_nan() {
        "nan".into()
    } else if v.is_infinite() {
        if v > 0.0 { "inf".into() } else { "-inf".into() }
    } else {
        format!("{v:?}")
    }
}

/// Untyped precision on a float: significant digits, like `%g`, but a fixed
/// result keeps at least one decimal.
fn general_repr(v: f64, precision: usize) -> String {
    let s = general(v, precision);
    if s.contains(['.', 'e', 'n']) {
        s
    } else {
        format!("{s}.0")
    }
}

/// Zeros go between the sign and the digits.
fn zero_pad(body: &str, width: usize) -> String {
    let (sign, digits) = match body.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", body),
    };
    let width = width.saturating_sub(sign.len());
    format!("{sign}{digits:0>width$}")
}

/// Scientific notation with a signed, two-digit exponent (`1.50e+03`).
fn exp_repr(v: f64, precision: usize) -> String {
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

/// Sets the axes title to the string for each frame.
#[derive(Debug)]
pub struct Title {
    axes: AxesId,
    titles: Vec<String>,
    style: Style,
}

impl Title {
    /// One title per frame.
    pub fn new<S: Into<String>>(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        titles: impl IntoIterator<Item = S>,
        style: Style,
    ) -> Result<Self> {
        let titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        if titles.is_empty() {
            return Err(AnimationError::invalid("title list is empty"));
        }
        Self::build(canvas, axes, titles, style)
    }

    pub fn from_template(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        template: TitleTemplate,
        style: Style,
    ) -> Result<Self> {
        let titles = template.render()?;
        Self::build(canvas, axes, titles, style)
    }

    fn build(
        canvas: &mut dyn Canvas,
        axes: AxesId,
        titles: Vec<String>,
        style: Style,
    ) -> Result<Self> {
        let mut title = Self {
            axes,
            titles,
            style,
        };
        title.render_initial(canvas)?;
        log::debug!("title block on axes {}: {} frames", axes.0, title.len());
        Ok(title)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }
}

impl Block for Title {
    fn len(&self) -> usize {
        self.titles.len()
    }

    fn axes(&self) -> AxesId {
        self.axes
    }

    fn render_initial(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        self.update(0, canvas)
    }

    fn update(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        check_frame(frame, self.len())?;
        canvas.set_title(self.axes, &self.titles[frame], &self.style)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frameplot_canvas_core::Scene;

    fn render(t: TitleTemplate) -> Vec<String> {
        t.render().unwrap()
    }

    #[test]
    fn named_fields_per_frame() {
        let titles = render(TitleTemplate::new("timestep {num}").field("num", [1, 2]));
        assert_eq!(titles, vec!["timestep 1", "timestep 2"]);
    }

    #[test]
    fn format_specs() {
        let titles = render(
            TitleTemplate::new("t={t:.2f}s {pct:.0%} {big:.1e} [{n:3d}] {name:3s}|")
                .field("t", [0.5])
                .field("pct", [0.25])
                .field("big", [1500.0])
                .field("n", [7])
                .field("name", ["x"]),
        );
        assert_eq!(titles, vec!["t=0.50s 25% 1.5e+03 [  7] x  |"]);
    }

    #[test]
    fn zero_fill_pads_after_the_sign() {
        let titles = render(
            TitleTemplate::new("frame {n:03d} {x:06.2f}")
                .field("n", [7, -7])
                .field("x", [1.5, -1.5]),
        );
        assert_eq!(titles, vec!["frame 007 001.50", "frame -07 -01.50"]);
    }

    #[test]
    fn untyped_precision_counts_significant_digits() {
        let titles = render(TitleTemplate::new("{x:.2}").field("x", [123.456, 0.5, 1.0]));
        assert_eq!(titles, vec!["1.2e+02", "0.5", "1.0"]);
    }

    #[test]
    fn positional_args_and_escapes() {
        let titles = render(
            TitleTemplate::new("{{{}}} {k} of {}")
                .arg("run")
                .arg(3)
                .field("k", [1.0, 2.5]),
        );
        assert_eq!(titles, vec!["{run} 1.0 of 3", "{run} 2.5 of 3"]);
    }

    #[test]
    fn no_fields_is_a_single_title() {
        assert_eq!(render(TitleTemplate::new("static")), vec!["static"]);
    }

    #[test]
    fn unequal_field_lengths() {
        let err = TitleTemplate::new("{a} {b}")
            .field("a", [1, 2])
            .field("b", [1])
            .render()
            .unwrap_err();
        assert_eq!(err, AnimationError::length("title field 'b'", 2, 1));
    }

    #[test]
    fn missing_and_unused_fields() {
        let missing = TitleTemplate::new("{a}").render().unwrap_err();
        assert!(matches!(missing, AnimationError::InvalidInput { .. }));
        let unused = TitleTemplate::new("{a}")
            .field("a", [1])
            .field("b", [2])
            .render()
            .unwrap_err();
        assert!(unused.to_string().contains("'b'"));
        assert!(TitleTemplate::new("{a").field("a", [1]).render().is_err());
    }

    #[test]
    fn text_with_numeric_code_is_a_type_error() {
        let err = TitleTemplate::new("{a:f}")
            .field("a", ["x"])
            .render()
            .unwrap_err();
        assert!(matches!(err, AnimationError::TypeMismatch { .. }));
    }

    #[test]
    fn block_sets_axes_title() {
        let (mut scene, ax) = Scene::with_axes();
        let mut title = Title::new(&mut scene, ax, ["a", "b", "c"], Style::default()).unwrap();
        assert_eq!(scene.title(ax), Some("a"));
        title.update(2, &mut scene).unwrap();
        assert_eq!(scene.title(ax), Some("c"));
        assert!(Title::new(&mut scene, ax, Vec::<String>::new(), Style::default()).is_err());
    }
}
