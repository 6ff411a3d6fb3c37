//! Artists: the per-axes drawables a backend retains, and the partial updates
//! that mutate them between frames.

use ndarray::{Array1, Array2, ArrayD};
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;
use crate::style::Style;

/// How a quad mesh maps cell values onto its coordinate grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// One value per quadrilateral; the grid is one larger than C in each dimension.
    Flat,
    /// One value per grid vertex, drawn as a cell centred on it; grid and C share a shape.
    Nearest,
    /// One value per grid vertex, interpolated across cells; grid and C share a shape.
    Gouraud,
}

impl Shading {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Nearest => "nearest",
            Self::Gouraud => "gouraud",
        }
    }

    /// Grid extent expected for a C extent of `n` along one dimension.
    #[inline]
    pub fn grid_extent(&self, n: usize) -> usize {
        match self {
            Self::Flat => n + 1,
            Self::Nearest | Self::Gouraud => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistKind {
    Line,
    Scatter,
    QuadMesh,
    Image,
    Quiver,
    Surface,
    Slider,
    Button,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Artist {
    Line {
        x: Array1<f64>,
        y: Array1<f64>,
        style: Style,
    },
    Scatter {
        x: Array1<f64>,
        y: Array1<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sizes: Option<Array1<f64>>,
        style: Style,
    },
    QuadMesh {
        x: Array2<f64>,
        y: Array2<f64>,
        c: Array2<f64>,
        shading: Shading,
        style: Style,
    },
    Image {
        data: ArrayD<f64>,
        style: Style,
    },
    /// Arrow anchors (x, y) are fixed when the artist is created; only u, v change.
    Quiver {
        x: ArrayD<f64>,
        y: ArrayD<f64>,
        u: ArrayD<f64>,
        v: ArrayD<f64>,
        style: Style,
    },
    Surface {
        x: Array2<f64>,
        y: Array2<f64>,
        z: Array2<f64>,
        style: Style,
    },
    Slider {
        label: String,
        min: f64,
        max: f64,
        step: f64,
        value: f64,
        text: String,
        style: Style,
    },
    /// Two stacked labels; `show_alt` selects which one is visible.
    Button {
        label: String,
        alt_label: String,
        show_alt: bool,
        style: Style,
    },
}

/// Mutable-state setters, one per artist family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtistUpdate {
    LineData {
        x: Array1<f64>,
        y: Array1<f64>,
    },
    Offsets {
        x: Array1<f64>,
        y: Array1<f64>,
    },
    Sizes {
        sizes: Array1<f64>,
    },
    MeshArray {
        c: Array2<f64>,
    },
    ImageData {
        data: ArrayD<f64>,
    },
    QuiverUv {
        u: ArrayD<f64>,
        v: ArrayD<f64>,
    },
    SliderValue {
        value: f64,
        text: String,
    },
    /// New bounds for a slider whose timeline was swapped out.
    SliderRange {
        min: f64,
        max: f64,
    },
    ButtonLabel {
        show_alt: bool,
    },
}

impl ArtistUpdate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LineData { .. } => "line_data",
            Self::Offsets { .. } => "offsets",
            Self::Sizes { .. } => "sizes",
            Self::MeshArray { .. } => "mesh_array",
            Self::ImageData { .. } => "image_data",
            Self::QuiverUv { .. } => "quiver_uv",
            Self::SliderValue { .. } => "slider_value",
            Self::SliderRange { .. } => "slider_range",
            Self::ButtonLabel { .. } => "button_label",
        }
    }
}

impl Artist {
    pub fn kind(&self) -> ArtistKind {
        match self {
            Self::Line { .. } => ArtistKind::Line,
            Self::Scatter { .. } => ArtistKind::Scatter,
            Self::QuadMesh { .. } => ArtistKind::QuadMesh,
            Self::Image { .. } => ArtistKind::Image,
            Self::Quiver { .. } => ArtistKind::Quiver,
            Self::Surface { .. } => ArtistKind::Surface,
            Self::Slider { .. } => ArtistKind::Slider,
            Self::Button { .. } => ArtistKind::Button,
        }
    }

    /// Apply a partial update in place.
    ///
    /// Mesh and quiver updates must keep the shape the artist was created with,
    /// mirroring backends that cannot re-grid an existing collection.
    pub fn apply(&mut self, update: ArtistUpdate) -> Result<(), CanvasError> {
        let kind = self.kind();
        match (self, update) {
            (Self::Line { x, y, .. }, ArtistUpdate::LineData { x: nx, y: ny }) => {
                check_shape("line y", nx.shape(), ny.shape())?;
                *x = nx;
                *y = ny;
            }
            (Self::Scatter { x, y, .. }, ArtistUpdate::Offsets { x: nx, y: ny }) => {
                check_shape("scatter offsets", nx.shape(), ny.shape())?;
                *x = nx;
                *y = ny;
            }
            (Self::Scatter { sizes, .. }, ArtistUpdate::Sizes { sizes: ns }) => {
                *sizes = Some(ns);
            }
            (Self::QuadMesh { c, .. }, ArtistUpdate::MeshArray { c: nc }) => {
                check_shape("mesh array", c.shape(), nc.shape())?;
                *c = nc;
            }
            (Self::Image { data, .. }, ArtistUpdate::ImageData { data: nd }) => {
                *data = nd;
            }
            (Self::Quiver { x, u, v, .. }, ArtistUpdate::QuiverUv { u: nu, v: nv }) => {
                check_shape("quiver u", x.shape(), nu.shape())?;
                check_shape("quiver v", x.shape(), nv.shape())?;
                *u = nu;
                *v = nv;
            }
            (Self::Slider { value, text, .. }, ArtistUpdate::SliderValue { value: nv, text: nt }) => {
                *value = nv;
                *text = nt;
            }
            (Self::Slider { min, max, .. }, ArtistUpdate::SliderRange { min: nmin, max: nmax }) => {
                *min = nmin;
                *max = nmax;
            }
            (Self::Button { show_alt, .. }, ArtistUpdate::ButtonLabel { show_alt: ns }) => {
                *show_alt = ns;
            }
            (_, update) => {
                return Err(CanvasError::IncompatibleUpdate {
                    artist: kind,
                    update: update.name().to_string(),
                })
            }
        }
        Ok(())
    }
}

fn check_shape(what: &str, expected: &[usize], actual: &[usize]) -> Result<(), CanvasError> {
    if expected != actual {
        return Err(CanvasError::ShapeMismatch {
            what: what.to_string(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}
