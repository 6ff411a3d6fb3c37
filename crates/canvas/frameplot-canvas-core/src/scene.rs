//! Scene: a retained, in-memory canvas.
//!
//! Records axes, titles, z-limits and the current state of every artist in
//! creation order. Snapshots omit artist ids so that a block which recreates
//! its artist every frame still produces comparable snapshots.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::artist::{Artist, ArtistUpdate};
use crate::canvas::{AxesKind, Canvas, Capture};
use crate::error::CanvasError;
use crate::ids::{ArtistId, AxesId, IdAllocator};
use crate::style::Style;

#[derive(Debug, Clone)]
struct AxesState {
    id: AxesId,
    kind: AxesKind,
    title: Option<String>,
    title_style: Style,
    zlim: Option<(f64, f64)>,
    artists: Vec<(ArtistId, Artist)>,
}

impl AxesState {
    fn new(id: AxesId, kind: AxesKind) -> Self {
        Self {
            id,
            kind,
            title: None,
            title_style: Style::default(),
            zlim: None,
            artists: Vec::new(),
        }
    }

    fn snapshot(&self) -> AxesSnapshot {
        AxesSnapshot {
            kind: self.kind,
            title: self.title.clone(),
            zlim: self.zlim,
            artists: self.artists.iter().map(|(_, a)| a.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxesSnapshot {
    pub kind: AxesKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zlim: Option<(f64, f64)>,
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub axes: Vec<AxesSnapshot>,
}

#[derive(Debug, Default)]
pub struct Scene {
    ids: IdAllocator,
    axes: Vec<AxesState>,
    axes_index: HashMap<AxesId, usize>,
    owners: HashMap<ArtistId, AxesId>,
    draws: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: a scene with one 2-D axes, returning both.
    pub fn with_axes() -> (Self, AxesId) {
        let mut scene = Self::new();
        let ax = scene.push_axes(AxesKind::Plot2d);
        (scene, ax)
    }

    fn push_axes(&mut self, kind: AxesKind) -> AxesId {
        let id = self.ids.alloc_axes();
        self.axes_index.insert(id, self.axes.len());
        self.axes.push(AxesState::new(id, kind));
        id
    }

    fn axes_state(&self, id: AxesId) -> Result<&AxesState, CanvasError> {
        self.axes_index
            .get(&id)
            .map(|&i| &self.axes[i])
            .ok_or(CanvasError::AxesNotFound(id))
    }

    fn axes_state_mut(&mut self, id: AxesId) -> Result<&mut AxesState, CanvasError> {
        match self.axes_index.get(&id) {
            Some(&i) => Ok(&mut self.axes[i]),
            None => Err(CanvasError::AxesNotFound(id)),
        }
    }

    fn artist_slot_mut(&mut self, id: ArtistId) -> Result<&mut Artist, CanvasError> {
        let owner = *self.owners.get(&id).ok_or(CanvasError::ArtistNotFound(id))?;
        let axes = self.axes_state_mut(owner)?;
        axes.artists
            .iter_mut()
            .find(|(a, _)| *a == id)
            .map(|(_, artist)| artist)
            .ok_or(CanvasError::ArtistNotFound(id))
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            axes: self.axes.iter().map(AxesState::snapshot).collect(),
        }
    }

    pub fn axes_snapshot(&self, id: AxesId) -> Option<AxesSnapshot> {
        self.axes_state(id).ok().map(AxesState::snapshot)
    }

    pub fn axes_ids(&self) -> Vec<AxesId> {
        self.axes.iter().map(|a| a.id).collect()
    }

    pub fn artist(&self, id: ArtistId) -> Option<&Artist> {
        let owner = self.owners.get(&id)?;
        self.axes_state(*owner)
            .ok()?
            .artists
            .iter()
            .find(|(a, _)| *a == id)
            .map(|(_, artist)| artist)
    }

    pub fn artists(&self, axes: AxesId) -> Vec<&Artist> {
        self.axes_state(axes)
            .map(|a| a.artists.iter().map(|(_, artist)| artist).collect())
            .unwrap_or_default()
    }

    pub fn title(&self, axes: AxesId) -> Option<&str> {
        self.axes_state(axes).ok()?.title.as_deref()
    }

    pub fn zlim(&self, axes: AxesId) -> Option<(f64, f64)> {
        self.axes_state(axes).ok()?.zlim
    }

    /// Number of times `draw()` has been called.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }
}

impl Canvas for Scene {
    fn add_axes(&mut self, kind: AxesKind) -> Result<AxesId, CanvasError> {
        Ok(self.push_axes(kind))
    }

    fn add_artist(&mut self, axes: AxesId, artist: Artist) -> Result<ArtistId, CanvasError> {
        // Validate the axes before burning an id.
        self.axes_state(axes)?;
        let id = self.ids.alloc_artist();
        self.axes_state_mut(axes)?.artists.push((id, artist));
        self.owners.insert(id, axes);
        Ok(id)
    }

    fn update_artist(
        &mut self,
        artist: ArtistId,
        update: ArtistUpdate,
    ) -> Result<(), CanvasError> {
        self.artist_slot_mut(artist)?.apply(update)
    }

    fn remove_artist(&mut self, artist: ArtistId) -> Result<(), CanvasError> {
        let owner = self
            .owners
            .remove(&artist)
            .ok_or(CanvasError::ArtistNotFound(artist))?;
        let axes = self.axes_state_mut(owner)?;
        axes.artists.retain(|(a, _)| *a != artist);
        Ok(())
    }

    fn set_title(&mut self, axes: AxesId, title: &str, style: &Style) -> Result<(), CanvasError> {
        let state = self.axes_state_mut(axes)?;
        state.title = Some(title.to_string());
        state.title_style = style.clone();
        Ok(())
    }

    fn set_zlim(&mut self, axes: AxesId, lo: f64, hi: f64) -> Result<(), CanvasError> {
        let state = self.axes_state_mut(axes)?;
        if state.kind != AxesKind::Plot3d {
            return Err(CanvasError::Unsupported("z-limits on a 2-D axes".into()));
        }
        state.zlim = Some((lo, hi));
        Ok(())
    }

    fn clear(&mut self, axes: AxesId) -> Result<(), CanvasError> {
        let state = self.axes_state_mut(axes)?;
        let removed: Vec<ArtistId> = state.artists.drain(..).map(|(id, _)| id).collect();
        state.title = None;
        state.title_style = Style::default();
        for id in removed {
            self.owners.remove(&id);
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<(), CanvasError> {
        self.draws += 1;
        log::trace!("scene draw #{}", self.draws);
        Ok(())
    }

    fn capture(&self) -> Result<Capture, CanvasError> {
        Ok(Capture::Snapshot(self.snapshot()))
    }
}
