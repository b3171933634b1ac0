//! Turning a picked file into the style reference sent to the model.
//!
//! Images are forwarded as-is. Videos contribute a single frame captured at
//! t=0 and re-encoded as JPEG at the video's native resolution.

use crate::error::{MediaError, Result, SlideError};
use base64::Engine;
use slide_common::{extension_of, StyleAsset};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use tracing::{debug, info, warn};

const JPEG_QUALITY: u8 = 90;
const TOPIC_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Stream properties reported after loading a video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Seconds; 0.0 when the container does not report it.
    pub duration: f64,
}

/// One decoded frame, tightly packed RGBA.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Something that can decode a single frame out of a video file.
///
/// Callers always invoke [`FrameSource::release`] once they are done,
/// whether or not extraction succeeded.
pub trait FrameSource: Send {
    fn load(&mut self, path: &Path) -> std::result::Result<VideoInfo, MediaError>;
    fn seek(&mut self, timestamp: f64) -> std::result::Result<(), MediaError>;
    fn capture(&mut self) -> std::result::Result<RawFrame, MediaError>;
    fn release(&mut self);
}

/// Load `path` as a style asset.
///
/// Blocking: video decoding spawns child processes, so async callers run
/// this on `spawn_blocking`.
pub fn acquire_style_asset(path: &Path, source: &mut dyn FrameSource) -> Result<StyleAsset> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = guess_mime(path);

    if mime.starts_with("image/") {
        let bytes = std::fs::read(path)?;
        info!(file = %name, %mime, size = bytes.len(), "loaded style image");
        return Ok(StyleAsset {
            name,
            mime_type: mime,
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        });
    }

    if mime.starts_with("video/") {
        let jpeg = capture_first_frame(path, source).inspect_err(|err| {
            warn!(file = %name, error = %err, "frame extraction failed");
        })?;
        info!(file = %name, size = jpeg.len(), "extracted style frame from video");
        return Ok(StyleAsset {
            name,
            mime_type: "image/jpeg".to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(jpeg),
        });
    }

    warn!(file = %name, %mime, "rejected style file");
    Err(SlideError::UnsupportedInput { name, mime })
}

/// True when the file name maps to a `video/*` type.
pub fn is_video(path: &Path) -> bool {
    guess_mime(path).starts_with("video/")
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_owned())
        .unwrap_or_else(|| "application/octet-stream".to_string())
}

/// JPEG bytes of the frame at t=0; `source` is released either way.
pub fn capture_first_frame(path: &Path, source: &mut dyn FrameSource) -> Result<Vec<u8>> {
    let extracted = extract_first_frame(path, source);
    source.release();
    Ok(extracted?)
}

fn extract_first_frame(
    path: &Path,
    source: &mut dyn FrameSource,
) -> std::result::Result<Vec<u8>, MediaError> {
    let info = source.load(path)?;
    debug!(?info, "video loaded");
    source.seek(0.0)?;
    let frame = source.capture()?;

    let expected_len = info.width as usize * info.height as usize * 4;
    if frame.width != info.width || frame.height != info.height || frame.rgba.len() != expected_len
    {
        return Err(MediaError::FrameMismatch {
            width: info.width,
            height: info.height,
            actual_width: frame.width,
            actual_height: frame.height,
            len: frame.rgba.len(),
        });
    }
    encode_frame_jpeg(frame)
}

/// Encode an RGBA frame as a quality-90 JPEG.
pub fn encode_frame_jpeg(frame: RawFrame) -> std::result::Result<Vec<u8>, MediaError> {
    let RawFrame {
        width,
        height,
        rgba,
    } = frame;
    let len = rgba.len();
    let img = image::RgbaImage::from_raw(width, height, rgba).ok_or(MediaError::FrameMismatch {
        width,
        height,
        actual_width: width,
        actual_height: height,
        len,
    })?;
    // JPEG has no alpha channel.
    let rgb = image::DynamicImage::ImageRgba8(img).to_rgb8();

    let mut out = Vec::new();
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
        encoder.encode_image(&rgb)?;
    }
    Ok(out)
}

/// Read a `.txt` / `.md` / `.markdown` topics file.
pub async fn read_topics_file(path: &Path) -> Result<String> {
    let ext = extension_of(path).unwrap_or_default();
    if !TOPIC_EXTENSIONS.contains(&ext.as_str()) {
        return Err(SlideError::UnsupportedInput {
            name: path.display().to_string(),
            mime: guess_mime(path),
        });
    }
    let text = tokio::fs::read_to_string(path).await?;
    debug!(path = %path.display(), chars = text.chars().count(), "loaded topics file");
    Ok(text)
}

/// [`FrameSource`] backed by the `ffmpeg` and `ffprobe` executables.
#[derive(Debug)]
pub struct FfmpegFrameSource {
    configured_path: Option<String>,
    ffmpeg: Option<String>,
    source: Option<PathBuf>,
    info: Option<VideoInfo>,
    timestamp: f64,
    child: Option<Child>,
}

impl FfmpegFrameSource {
    /// `ffmpeg_path` overrides the lookup of common install locations.
    pub fn new(ffmpeg_path: Option<String>) -> Self {
        Self {
            configured_path: ffmpeg_path,
            ffmpeg: None,
            source: None,
            info: None,
            timestamp: 0.0,
            child: None,
        }
    }

    fn ffmpeg(&mut self) -> std::result::Result<String, MediaError> {
        if let Some(found) = &self.ffmpeg {
            return Ok(found.clone());
        }
        let found = find_ffmpeg(self.configured_path.as_deref())?;
        self.ffmpeg = Some(found.clone());
        Ok(found)
    }
}

impl FrameSource for FfmpegFrameSource {
    fn load(&mut self, path: &Path) -> std::result::Result<VideoInfo, MediaError> {
        if !path.exists() {
            return Err(MediaError::Probe {
                path: path.display().to_string(),
                reason: "file does not exist".to_string(),
            });
        }
        let ffmpeg = self.ffmpeg()?;
        let info = probe_video(path, &ffmpeg)?;
        self.source = Some(path.to_path_buf());
        self.info = Some(info);
        self.timestamp = 0.0;
        Ok(info)
    }

    fn seek(&mut self, timestamp: f64) -> std::result::Result<(), MediaError> {
        let info = self.info.ok_or_else(|| MediaError::Seek {
            timestamp,
            reason: "no video loaded".to_string(),
        })?;
        let past_end = info.duration > 0.0 && timestamp > info.duration;
        if !timestamp.is_finite() || timestamp < 0.0 || past_end {
            return Err(MediaError::Seek {
                timestamp,
                reason: format!("outside 0..{}", info.duration),
            });
        }
        self.timestamp = timestamp;
        Ok(())
    }

    fn capture(&mut self) -> std::result::Result<RawFrame, MediaError> {
        let Some(source) = self.source.clone().filter(|_| self.info.is_some()) else {
            return Err(MediaError::Capture {
                reason: "no video loaded".to_string(),
            });
        };
        let ffmpeg = self.ffmpeg()?;

        // Autorotation would hand back a transposed frame for rotated
        // streams; keep the coded size ffprobe reported.
        let mut child = Command::new(&ffmpeg)
            .args(["-v", "error", "-noautorotate", "-ss"])
            .arg(format!("{:.3}", self.timestamp))
            .arg("-i")
            .arg(&source)
            .args(["-frames:v", "1", "-f", "image2pipe", "-c:v", "png", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| MediaError::Capture {
                reason: format!("failed to run ffmpeg: {e}"),
            })?;

        let stdout = child.stdout.take();
        self.child = Some(child);
        let mut stdout = stdout.ok_or_else(|| MediaError::Capture {
            reason: "ffmpeg stdout unavailable".to_string(),
        })?;

        let mut encoded = Vec::new();
        stdout
            .read_to_end(&mut encoded)
            .map_err(|e| MediaError::Capture {
                reason: format!("reading frame: {e}"),
            })?;

        if let Some(mut child) = self.child.take() {
            let status = child.wait().map_err(|e| MediaError::Capture {
                reason: e.to_string(),
            })?;
            if !status.success() {
                return Err(MediaError::Capture {
                    reason: format!("ffmpeg exited with {status}"),
                });
            }
        }
        if encoded.is_empty() {
            return Err(MediaError::Capture {
                reason: "ffmpeg produced no frame".to_string(),
            });
        }

        let decoded = image::load_from_memory_with_format(&encoded, image::ImageFormat::Png)
            .map_err(|e| MediaError::Capture {
                reason: format!("undecodable frame: {e}"),
            })?
            .to_rgba8();
        debug!(width = decoded.width(), height = decoded.height(), "frame captured");
        Ok(RawFrame {
            width: decoded.width(),
            height: decoded.height(),
            rgba: decoded.into_raw(),
        })
    }

    fn release(&mut self) {
        if let Some(mut child) = self.child.take() {
            // Already-exited children make kill fail; wait still reaps.
            let _ = child.kill();
            let _ = child.wait();
        }
        self.source = None;
        self.info = None;
        self.timestamp = 0.0;
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        self.release();
    }
}

fn find_ffmpeg(custom_path: Option<&str>) -> std::result::Result<String, MediaError> {
    if let Some(path) = custom_path {
        if Path::new(path).exists() {
            return Ok(path.to_string());
        }
        return Err(MediaError::FfmpegNotFound);
    }

    let paths = [
        "ffmpeg",
        "/usr/bin/ffmpeg",
        "/usr/local/bin/ffmpeg",
        "/opt/homebrew/bin/ffmpeg",
    ];

    for path in paths {
        if Command::new(path)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
        {
            return Ok(path.to_string());
        }
    }

    Err(MediaError::FfmpegNotFound)
}

fn probe_video(path: &Path, ffmpeg: &str) -> std::result::Result<VideoInfo, MediaError> {
    let ffprobe = if ffmpeg.ends_with("ffmpeg") {
        format!("{}ffprobe", &ffmpeg[..ffmpeg.len() - "ffmpeg".len()])
    } else {
        "ffprobe".to_string()
    };
    let probe_err = |reason: String| MediaError::Probe {
        path: path.display().to_string(),
        reason,
    };

    let output = Command::new(&ffprobe)
        .args([
            "-v",
            "error",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,duration",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .map_err(|e| probe_err(format!("failed to run ffprobe: {e}")))?;

    if !output.status.success() {
        return Err(probe_err(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    parse_probe_output(&text).ok_or_else(|| probe_err(format!("unexpected ffprobe output: {text}")))
}

/// Parse `width,height,duration` as printed by ffprobe's csv writer.
fn parse_probe_output(text: &str) -> Option<VideoInfo> {
    let line = text.lines().find(|l| !l.trim().is_empty())?;
    let mut parts = line.trim().split(',');
    let width: u32 = parts.next()?.trim().parse().ok()?;
    let height: u32 = parts.next()?.trim().parse().ok()?;
    let duration = parts
        .next()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .unwrap_or(0.0);
    if width == 0 || height == 0 {
        return None;
    }
    Some(VideoInfo {
        width,
        height,
        duration,
    })
}
