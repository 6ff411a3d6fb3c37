//! The animation loop: one timeline, many blocks, optional transport controls.

use std::ops::Range;
use std::time::Duration;

use frameplot_canvas_core::{Artist, ArtistUpdate, AxesId, Canvas, ControlSlot, Style};
use ndarray::{Array, Dimension};

use crate::blocks::{AnyBlock, Block};
use crate::clock::FrameClock;
use crate::config::Config;
use crate::controls::{format_value, PlaybackState, SliderConfig, SliderHandle, ToggleConfig, ToggleHandle};
use crate::error::AnimationError;
use crate::export::{ExportMeta, FrameWriter};
use crate::timeline::{TimeValues, Timeline};
use crate::Result;

/// Where an animation's timeline comes from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TimelineSource {
    /// `0..len` of the first block.
    #[default]
    Default,
    /// Raw time values, wrapped with the configured timeline options.
    Values(TimeValues),
    Timeline(Timeline),
}

impl From<Timeline> for TimelineSource {
    fn from(timeline: Timeline) -> Self {
        Self::Timeline(timeline)
    }
}

impl From<TimeValues> for TimelineSource {
    fn from(values: TimeValues) -> Self {
        Self::Values(values)
    }
}

impl<D: Dimension> From<Array<f64, D>> for TimelineSource {
    fn from(array: Array<f64, D>) -> Self {
        Self::Values(array.into())
    }
}

impl From<Vec<f64>> for TimelineSource {
    fn from(values: Vec<f64>) -> Self {
        Self::Values(values.into())
    }
}

impl From<Range<usize>> for TimelineSource {
    fn from(range: Range<usize>) -> Self {
        Self::Values(range.into())
    }
}

/// What [`Animation::add`] accepts.
#[derive(Debug)]
pub enum Addition {
    Block(AnyBlock),
    Blocks(Vec<AnyBlock>),
    /// Merge another animation's blocks and adopt its timeline.
    Animation(Animation),
}

impl From<AnyBlock> for Addition {
    fn from(block: AnyBlock) -> Self {
        Self::Block(block)
    }
}

impl From<Vec<AnyBlock>> for Addition {
    fn from(blocks: Vec<AnyBlock>) -> Self {
        Self::Blocks(blocks)
    }
}

impl From<Animation> for Addition {
    fn from(animation: Animation) -> Self {
        Self::Animation(animation)
    }
}

macro_rules! impl_addition_from_block {
    ($($block:ident),* $(,)?) => {
        $(
            impl From<crate::blocks::$block> for Addition {
                fn from(block: crate::blocks::$block) -> Self {
                    Self::Block(block.into())
                }
            }
        )*
    };
}

impl_addition_from_block!(Line, Scatter, Pcolormesh, Imshow, Quiver, Surface, Title, Update);

/// Drives every block through the shared timeline.
///
/// Each [`tick`](Self::tick) shows the frame at the timeline's index on every
/// block, mirrors it on the slider, draws, and advances. Scrubbing and the
/// play/pause toggle are the only other ways the index or playback change.
#[derive(Debug)]
pub struct Animation {
    blocks: Vec<AnyBlock>,
    timeline: Timeline,
    config: Config,
    state: PlaybackState,
    clock: FrameClock,
    slider: Option<SliderHandle>,
    toggle: Option<ToggleHandle>,
}

impl Animation {
    pub fn new(blocks: Vec<AnyBlock>, timeline: impl Into<TimelineSource>) -> Result<Self> {
        Self::with_config(blocks, timeline, Config::default())
    }

    pub fn with_config(
        blocks: Vec<AnyBlock>,
        timeline: impl Into<TimelineSource>,
        config: Config,
    ) -> Result<Self> {
        let timeline = match timeline.into() {
            TimelineSource::Default => {
                let first = blocks.first().ok_or_else(|| {
                    AnimationError::invalid(
                        "an animation without blocks needs an explicit timeline",
                    )
                })?;
                Timeline::with_options(0..first.len(), config.timeline.clone())?
            }
            TimelineSource::Values(values) => {
                Timeline::with_options(values, config.timeline.clone())?
            }
            TimelineSource::Timeline(timeline) => timeline,
        };
        check_lengths(&blocks, timeline.len())?;
        log::debug!(
            "animation: {} blocks, {} frames at {} fps",
            blocks.len(),
            timeline.len(),
            timeline.fps()
        );
        Ok(Self {
            blocks,
            clock: FrameClock::new(timeline.interval()),
            timeline,
            config,
            state: PlaybackState::Playing,
            slider: None,
            toggle: None,
        })
    }

    pub fn blocks(&self) -> &[AnyBlock] {
        &self.blocks
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Delay between ticks.
    pub fn interval(&self) -> Duration {
        self.timeline.interval()
    }

    /// Axes hosting the timeline slider, once one has been added.
    pub fn slider_axes(&self) -> Option<AxesId> {
        self.slider.as_ref().map(|s| s.axes)
    }

    pub fn toggle_axes(&self) -> Option<AxesId> {
        self.toggle.as_ref().map(|t| t.axes)
    }

    /// Append blocks, or merge another animation. Nothing changes unless
    /// every resulting block matches the resulting timeline.
    pub fn add(&mut self, addition: impl Into<Addition>) -> Result<()> {
        match addition.into() {
            Addition::Block(block) => {
                check_lengths(std::slice::from_ref(&block), self.timeline.len())?;
                log::debug!("animation: added {} block", block.name());
                self.blocks.push(block);
            }
            Addition::Blocks(blocks) => {
                check_lengths(&blocks, self.timeline.len())?;
                log::debug!("animation: added {} blocks", blocks.len());
                self.blocks.extend(blocks);
            }
            Addition::Animation(other) => {
                let len = other.timeline.len();
                check_lengths(&self.blocks, len)?;
                check_lengths(&other.blocks, len)?;
                log::debug!(
                    "animation: merged {} blocks, timeline now {} frames",
                    other.blocks.len(),
                    len
                );
                self.blocks.extend(other.blocks);
                if let Some(slider) = &mut self.slider {
                    slider.format = slider.config.display_format(&other.timeline);
                    slider.range_stale = true;
                }
                self.clock = FrameClock::new(other.timeline.interval());
                if !self.state.is_playing() {
                    self.clock.stop();
                }
                self.timeline = other.timeline;
            }
        }
        Ok(())
    }

    /// Show the current frame everywhere, draw, then advance the timeline.
    pub fn tick(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        let frame = self.timeline.index();
        self.update_blocks(frame, canvas)?;
        self.refresh_slider(canvas)?;
        canvas.draw()?;
        self.timeline.advance();
        log::trace!("tick: showed frame {frame}/{}", self.timeline.len());
        Ok(())
    }

    /// Advance the frame clock by `dt` seconds and run the ticks that fall
    /// due. Returns the number of ticks run.
    pub fn elapse(&mut self, dt: f64, canvas: &mut dyn Canvas) -> Result<usize> {
        let due = self.clock.elapse(dt);
        for _ in 0..due {
            self.tick(canvas)?;
        }
        Ok(due)
    }

    /// Add a slider spanning every frame.
    pub fn timeline_slider(&mut self, canvas: &mut dyn Canvas, cfg: SliderConfig) -> Result<AxesId> {
        let format = cfg.display_format(&self.timeline);
        let text = format_value(&format, self.timeline.current())?;
        let axes = match cfg.axes {
            Some(axes) => axes,
            None => canvas.add_control_axes(ControlSlot::Slider)?,
        };
        if let Some(old) = self.slider.take() {
            canvas.remove_artist(old.artist)?;
        }
        let mut style = Style::new();
        style.color = cfg.color.clone();
        let artist = canvas.add_artist(
            axes,
            Artist::Slider {
                label: cfg.text.clone(),
                min: 0.0,
                max: (self.timeline.len() - 1) as f64,
                step: 1.0,
                value: self.timeline.index() as f64,
                text,
                style,
            },
        )?;
        log::debug!("animation: slider on axes {} with format '{format}'", axes.0);
        self.slider = Some(SliderHandle {
            axes,
            artist,
            config: cfg,
            format,
            range_stale: false,
        });
        Ok(axes)
    }

    /// Add a play/pause button.
    pub fn toggle(&mut self, canvas: &mut dyn Canvas, cfg: ToggleConfig) -> Result<AxesId> {
        let axes = match cfg.axes {
            Some(axes) => axes,
            None => canvas.add_control_axes(ControlSlot::Toggle)?,
        };
        if let Some(old) = self.toggle.take() {
            canvas.remove_artist(old.artist)?;
        }
        let artist = canvas.add_artist(
            axes,
            Artist::Button {
                label: cfg.pause_label,
                alt_label: cfg.play_label,
                show_alt: self.state.is_paused(),
                style: Style::default(),
            },
        )?;
        log::debug!("animation: toggle on axes {}", axes.0);
        self.toggle = Some(ToggleHandle { axes, artist });
        Ok(axes)
    }

    /// Slider and toggle from the animation's config. Returns their axes.
    pub fn controls(&mut self, canvas: &mut dyn Canvas) -> Result<(AxesId, AxesId)> {
        let slider = self.timeline_slider(canvas, self.config.slider.clone())?;
        let toggle = self.toggle(canvas, self.config.toggle.clone())?;
        Ok((slider, toggle))
    }

    /// User moved the slider to frame `i`.
    ///
    /// While paused the blocks are redrawn at once; while playing the next
    /// tick shows the new frame.
    pub fn scrub(&mut self, i: usize, canvas: &mut dyn Canvas) -> Result<()> {
        self.timeline.seek(i)?;
        self.refresh_slider(canvas)?;
        if self.state.is_paused() {
            self.update_blocks(i, canvas)?;
            canvas.draw()?;
        }
        log::trace!("scrub: frame {i} ({})", self.state.name());
        Ok(())
    }

    /// User pressed play/pause.
    pub fn press_toggle(&mut self, canvas: &mut dyn Canvas) -> Result<PlaybackState> {
        self.state = self.state.toggled();
        match self.state {
            PlaybackState::Playing => self.clock.start(),
            PlaybackState::Paused => self.clock.stop(),
        }
        if let Some(toggle) = &self.toggle {
            canvas.update_artist(
                toggle.artist,
                ArtistUpdate::ButtonLabel {
                    show_alt: self.state.is_paused(),
                },
            )?;
        }
        canvas.draw()?;
        log::debug!("animation: {}", self.state.name());
        Ok(self.state)
    }

    /// Render every frame into `writer`, starting from the frame the next
    /// tick would show.
    ///
    /// The timeline steps back once first because the writer protocol draws
    /// one initialization frame before the recorded ones.
    pub fn save(&mut self, canvas: &mut dyn Canvas, writer: &mut dyn FrameWriter) -> Result<()> {
        let meta = ExportMeta {
            fps: self.timeline.fps(),
            frames: self.timeline.len(),
            units: self.timeline.units().to_string(),
        };
        log::info!("export: {} frames at {} fps", meta.frames, meta.fps);
        self.timeline.step_back();
        writer.setup(&meta)?;
        self.tick(canvas)?;
        for _ in 0..meta.frames {
            self.tick(canvas)?;
            writer.grab_frame(canvas)?;
        }
        writer.finish()?;
        log::info!("export: finished");
        Ok(())
    }

    /// Encode every frame to a looping GIF at the timeline's fps.
    #[cfg(feature = "media")]
    pub fn save_gif(
        &mut self,
        canvas: &mut dyn Canvas,
        path: impl AsRef<std::path::Path>,
    ) -> Result<()> {
        let mut writer = crate::export::GifWriter::create(path)?;
        self.save(canvas, &mut writer)
    }

    fn update_blocks(&mut self, frame: usize, canvas: &mut dyn Canvas) -> Result<()> {
        for block in &mut self.blocks {
            block.update(frame, canvas)?;
        }
        Ok(())
    }

    /// Mirror the timeline index on the slider without treating it as a scrub.
    fn refresh_slider(&mut self, canvas: &mut dyn Canvas) -> Result<()> {
        if let Some(slider) = &mut self.slider {
            if slider.range_stale {
                canvas.update_artist(
                    slider.artist,
                    ArtistUpdate::SliderRange {
                        min: 0.0,
                        max: (self.timeline.len() - 1) as f64,
                    },
                )?;
                slider.range_stale = false;
            }
            let text = format_value(&slider.format, self.timeline.current())?;
            canvas.update_artist(
                slider.artist,
                ArtistUpdate::SliderValue {
                    value: self.timeline.index() as f64,
                    text,
                },
            )?;
        }
        Ok(())
    }
}

fn check_lengths(blocks: &[AnyBlock], expected: usize) -> Result<()> {
    for block in blocks {
        if block.len() != expected {
            return Err(AnimationError::length(
                format!("{} block", block.name()),
                expected,
                block.len(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{Line, LineOptions};
    use frameplot_canvas_core::Scene;
    use ndarray::Array2;

    fn line(scene: &mut Scene, ax: AxesId, frames: usize) -> AnyBlock {
        let y = Array2::from_shape_fn((frames, 3), |(t, j)| (t + j) as f64);
        Line::from_y(scene, ax, y, LineOptions::default()).unwrap().into()
    }

    #[test]
    fn default_timeline_follows_first_block() {
        let (mut scene, ax) = Scene::with_axes();
        let anim = Animation::new(vec![line(&mut scene, ax, 4)], TimelineSource::Default).unwrap();
        assert_eq!(anim.len(), 4);
        assert_eq!(anim.timeline().values(), ndarray::array![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_animation_needs_a_timeline() {
        assert!(Animation::new(vec![], TimelineSource::Default).is_err());
        let anim = Animation::new(vec![], vec![0.0, 1.0]).unwrap();
        assert_eq!(anim.len(), 2);
    }

    #[test]
    fn mismatched_block_is_rejected_at_construction() {
        let (mut scene, ax) = Scene::with_axes();
        let err = Animation::new(vec![line(&mut scene, ax, 3)], 0..4).unwrap_err();
        assert_eq!(err, AnimationError::length("line block", 4, 3));
    }

    #[test]
    fn tick_wraps_after_last_frame() {
        let (mut scene, ax) = Scene::with_axes();
        let mut anim = Animation::new(vec![line(&mut scene, ax, 2)], TimelineSource::Default).unwrap();
        for _ in 0..3 {
            anim.tick(&mut scene).unwrap();
        }
        assert_eq!(anim.timeline().index(), 1);
        assert_eq!(scene.draw_count(), 3);
    }

    #[test]
    fn elapse_runs_due_ticks_only_while_playing() {
        let (mut scene, ax) = Scene::with_axes();
        let mut anim = Animation::new(vec![line(&mut scene, ax, 5)], TimelineSource::Default).unwrap();
        assert_eq!(anim.elapse(0.25, &mut scene).unwrap(), 2);
        anim.press_toggle(&mut scene).unwrap();
        assert_eq!(anim.elapse(1.0, &mut scene).unwrap(), 0);
        assert_eq!(anim.timeline().index(), 2);
    }
}
