//! Frame writers used by [`Animation::save`](crate::Animation::save).
//!
//! A writer is set up once, handed the canvas after every recorded tick, and
//! finished at the end. [`SceneJsonWriter`] records structured scene state
//! from any canvas; with the `media` feature, [`GifWriter`] and
//! [`PngSequenceWriter`] encode canvases that rasterize.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use frameplot_canvas_core::{Canvas, Capture, SceneSnapshot};
use serde::{Deserialize, Serialize};

use crate::error::AnimationError;
use crate::Result;

/// What a writer learns before the first frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExportMeta {
    pub fps: f64,
    pub frames: usize,
    pub units: String,
}

pub trait FrameWriter {
    fn setup(&mut self, meta: &ExportMeta) -> Result<()>;

    /// Record the canvas as it is after the latest tick.
    fn grab_frame(&mut self, canvas: &dyn Canvas) -> Result<()>;

    fn finish(&mut self) -> Result<()>;
}

/// One recorded frame of a scene dump.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneFrame {
    pub frame: usize,
    pub scene: SceneSnapshot,
}

/// JSON Lines scene dump: an [`ExportMeta`] header line, then one
/// [`SceneFrame`] per recorded frame.
#[derive(Debug)]
pub struct SceneJsonWriter<W: Write> {
    out: W,
    frame: usize,
}

impl<W: Write> SceneJsonWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, frame: 0 }
    }

    /// Frames recorded so far.
    pub fn frames_written(&self) -> usize {
        self.frame
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line<T: Serialize>(&mut self, value: &T) -> Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

impl SceneJsonWriter<BufWriter<File>> {
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path.as_ref())?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> FrameWriter for SceneJsonWriter<W> {
    fn setup(&mut self, meta: &ExportMeta) -> Result<()> {
        self.frame = 0;
        self.write_line(meta)
    }

    fn grab_frame(&mut self, canvas: &dyn Canvas) -> Result<()> {
        let scene = match canvas.capture()? {
            Capture::Snapshot(scene) => scene,
            Capture::Pixels(_) => {
                return Err(AnimationError::unsupported(
                    "scene dump of a rasterizing canvas",
                ))
            }
        };
        let record = SceneFrame {
            frame: self.frame,
            scene,
        };
        self.write_line(&record)?;
        self.frame += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Parse a scene dump back into its header and frames.
pub fn read_scene_dump(text: &str) -> Result<(ExportMeta, Vec<SceneFrame>)> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| AnimationError::invalid("scene dump is empty"))?;
    let meta: ExportMeta = serde_json::from_str(header)?;
    let frames = lines
        .map(|l| serde_json::from_str::<SceneFrame>(l).map_err(AnimationError::from))
        .collect::<Result<Vec<_>>>()?;
    Ok((meta, frames))
}

#[cfg(feature = "media")]
mod media {
    use std::fs::File;
    use std::io::BufWriter;
    use std::path::{Path, PathBuf};

    use frameplot_canvas_core::{Canvas, Capture, RgbaFrame};
    use gif::{Encoder, Frame, Repeat};

    use super::{ExportMeta, FrameWriter};
    use crate::error::AnimationError;
    use crate::Result;

    fn pixels(canvas: &dyn Canvas) -> Result<RgbaFrame> {
        match canvas.capture()? {
            Capture::Pixels(frame) => Ok(frame),
            Capture::Snapshot(_) => Err(AnimationError::unsupported(
                "image export from a canvas that does not rasterize",
            )),
        }
    }

    fn export_err(what: &str, err: impl std::fmt::Display) -> AnimationError {
        AnimationError::Export {
            reason: format!("{what}: {err}"),
        }
    }

    /// Looping GIF; frames are buffered and encoded on `finish`.
    #[derive(Debug)]
    pub struct GifWriter {
        path: PathBuf,
        delay_cs: u16,
        /// Quantization speed, 1 (best) to 30 (fastest).
        speed: i32,
        frames: Vec<RgbaFrame>,
    }

    impl GifWriter {
        pub fn create(path: impl AsRef<Path>) -> Result<Self> {
            Ok(Self {
                path: path.as_ref().to_path_buf(),
                delay_cs: 10,
                speed: 10,
                frames: Vec::new(),
            })
        }

        pub fn with_speed(mut self, speed: i32) -> Self {
            self.speed = speed.clamp(1, 30);
            self
        }

        /// Frame delay in centiseconds.
        pub fn delay_cs(&self) -> u16 {
            self.delay_cs
        }
    }

    impl FrameWriter for GifWriter {
        fn setup(&mut self, meta: &ExportMeta) -> Result<()> {
            self.delay_cs = (100.0 / meta.fps).round().clamp(1.0, u16::MAX as f64) as u16;
            self.frames.clear();
            self.frames.reserve(meta.frames);
            Ok(())
        }

        fn grab_frame(&mut self, canvas: &dyn Canvas) -> Result<()> {
            let frame = pixels(canvas)?;
            if let Some(first) = self.frames.first() {
                if (first.width, first.height) != (frame.width, frame.height) {
                    return Err(AnimationError::shape(
                        "gif frame",
                        &[first.height as usize, first.width as usize],
                        &[frame.height as usize, frame.width as usize],
                    ));
                }
            }
            self.frames.push(frame);
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            let Some(first) = self.frames.first() else {
                return Err(AnimationError::Export {
                    reason: "no frames to encode".into(),
                });
            };
            let width = u16::try_from(first.width).map_err(|e| export_err("gif width", e))?;
            let height = u16::try_from(first.height).map_err(|e| export_err("gif height", e))?;

            let file = BufWriter::new(File::create(&self.path)?);
            let mut encoder =
                Encoder::new(file, width, height, &[]).map_err(|e| export_err("gif encoder", e))?;
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| export_err("gif repeat", e))?;
            for rgba in &self.frames {
                let mut data = rgba.data.clone();
                let mut frame = Frame::from_rgba_speed(width, height, &mut data, self.speed);
                frame.delay = self.delay_cs;
                encoder
                    .write_frame(&frame)
                    .map_err(|e| export_err("gif frame", e))?;
            }
            log::info!(
                "export: wrote {} gif frames to {}",
                self.frames.len(),
                self.path.display()
            );
            Ok(())
        }
    }

    /// One PNG per frame: `<dir>/<prefix>_0000.png`, `<prefix>_0001.png`, ...
    #[derive(Debug)]
    pub struct PngSequenceWriter {
        dir: PathBuf,
        prefix: String,
        next: usize,
        written: Vec<PathBuf>,
    }

    impl PngSequenceWriter {
        pub fn new(dir: impl AsRef<Path>, prefix: impl Into<String>) -> Self {
            Self {
                dir: dir.as_ref().to_path_buf(),
                prefix: prefix.into(),
                next: 0,
                written: Vec::new(),
            }
        }

        pub fn written(&self) -> &[PathBuf] {
            &self.written
        }
    }

    impl FrameWriter for PngSequenceWriter {
        fn setup(&mut self, _meta: &ExportMeta) -> Result<()> {
            std::fs::create_dir_all(&self.dir)?;
            self.next = 0;
            self.written.clear();
            Ok(())
        }

        fn grab_frame(&mut self, canvas: &dyn Canvas) -> Result<()> {
            let frame = pixels(canvas)?;
            let path = self.dir.join(format!("{}_{:04}.png", self.prefix, self.next));
            let file = BufWriter::new(File::create(&path)?);
            let mut encoder = png::Encoder::new(file, frame.width, frame.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| export_err("png header", e))?;
            writer
                .write_image_data(&frame.data)
                .map_err(|e| export_err("png data", e))?;
            writer.finish().map_err(|e| export_err("png finish", e))?;
            self.written.push(path);
            self.next += 1;
            Ok(())
        }

        fn finish(&mut self) -> Result<()> {
            log::info!(
                "export: wrote {} png frames to {}",
                self.written.len(),
                self.dir.display()
            );
            Ok(())
        }
    }
}

#[cfg(feature = "media")]
pub use media::{GifWriter, PngSequenceWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use frameplot_canvas_core::{
        Artist, ArtistId, ArtistUpdate, AxesId, AxesKind, CanvasError, RgbaFrame, Scene, Style,
    };

    /// Canvas that only rasterizes.
    struct Raster;

    impl Canvas for Raster {
        fn add_axes(&mut self, _: AxesKind) -> std::result::Result<AxesId, CanvasError> {
            Ok(AxesId(0))
        }
        fn add_artist(&mut self, _: AxesId, _: Artist) -> std::result::Result<ArtistId, CanvasError> {
            Ok(ArtistId(0))
        }
        fn update_artist(&mut self, _: ArtistId, _: ArtistUpdate) -> std::result::Result<(), CanvasError> {
            Ok(())
        }
        fn remove_artist(&mut self, _: ArtistId) -> std::result::Result<(), CanvasError> {
            Ok(())
        }
        fn set_title(&mut self, _: AxesId, _: &str, _: &Style) -> std::result::Result<(), CanvasError> {
            Ok(())
        }
        fn set_zlim(&mut self, _: AxesId, _: f64, _: f64) -> std::result::Result<(), CanvasError> {
            Ok(())
        }
        fn clear(&mut self, _: AxesId) -> std::result::Result<(), CanvasError> {
            Ok(())
        }
        fn draw(&mut self) -> std::result::Result<(), CanvasError> {
            Ok(())
        }
        fn capture(&self) -> std::result::Result<Capture, CanvasError> {
            Ok(Capture::Pixels(RgbaFrame::solid(2, 2, [200, 10, 10, 255])))
        }
    }

    fn meta(frames: usize) -> ExportMeta {
        ExportMeta {
            fps: 5.0,
            frames,
            units: "s".into(),
        }
    }

    #[test]
    fn scene_dump_has_header_and_frames() {
        let (scene, _) = Scene::with_axes();
        let mut writer = SceneJsonWriter::new(Vec::new());
        writer.setup(&meta(2)).unwrap();
        writer.grab_frame(&scene).unwrap();
        writer.grab_frame(&scene).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.frames_written(), 2);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let (back, frames) = read_scene_dump(&text).unwrap();
        assert_eq!(back, meta(2));
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1].frame, 1);
        assert_eq!(frames[0].scene, scene.snapshot());
    }

    #[test]
    fn scene_dump_rejects_raster_canvas() {
        let mut writer = SceneJsonWriter::new(Vec::new());
        let err = writer.grab_frame(&Raster).unwrap_err();
        assert!(matches!(err, AnimationError::Unsupported { .. }));
    }

    #[test]
    fn empty_dump_is_invalid() {
        assert_eq!(read_scene_dump("").unwrap_err().category(), "validation");
    }

    #[cfg(feature = "media")]
    #[test]
    fn gif_writer_encodes_buffered_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.gif");
        let mut writer = GifWriter::create(&path).unwrap();
        writer.setup(&meta(2)).unwrap();
        assert_eq!(writer.delay_cs(), 20);
        writer.grab_frame(&Raster).unwrap();
        writer.grab_frame(&Raster).unwrap();
        writer.finish().unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..3], b"GIF");
    }

    #[cfg(feature = "media")]
    #[test]
    fn gif_writer_needs_pixels() {
        let (scene, _) = Scene::with_axes();
        let dir = tempfile::tempdir().unwrap();
        let mut writer = GifWriter::create(dir.path().join("x.gif")).unwrap();
        writer.setup(&meta(1)).unwrap();
        assert!(matches!(
            writer.grab_frame(&scene),
            Err(AnimationError::Unsupported { .. })
        ));
        assert_eq!(writer.finish().unwrap_err().category(), "export");
    }

    #[cfg(feature = "media")]
    #[test]
    fn png_sequence_numbers_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PngSequenceWriter::new(dir.path(), "frame");
        writer.setup(&meta(2)).unwrap();
        writer.grab_frame(&Raster).unwrap();
        writer.grab_frame(&Raster).unwrap();
        writer.finish().unwrap();
        assert_eq!(writer.written().len(), 2);
        assert!(dir.path().join("frame_0001.png").exists());
    }
}
