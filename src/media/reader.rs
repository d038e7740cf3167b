use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::{
    foundation::{
        core::BgrFrame,
        error::{ComposerError, ComposerResult},
    },
    media::probe::{self, MediaInfo},
};

/// A finite, forward-only sequence of BGR frames.
pub trait FrameSource {
    /// Next frame, or `Ok(None)` at end of stream.
    fn next_frame(&mut self) -> ComposerResult<Option<BgrFrame>>;
}

/// Frame geometry and (best-effort) length of an opened source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoMetadata {
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub frame_count: u64,
}

/// Streaming BGR frame reader over an `ffmpeg` child process.
///
/// Frames are produced lazily in decode order; the sequence is finite and cannot be restarted.
/// The child is spawned on the first call to [`MediaReader::next_frame`] and is killed and reaped
/// when the reader is dropped.
pub struct MediaReader {
    info: MediaInfo,
    decoder: PathBuf,
    rate: Option<u32>,
    child: Option<Child>,
    stdout: Option<ChildStdout>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    frames_read: u64,
    finished: bool,
}

impl std::fmt::Debug for MediaReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaReader")
            .field("path", &self.info.path)
            .field("rate", &self.rate)
            .field("frames_read", &self.frames_read)
            .field("finished", &self.finished)
            .finish()
    }
}

impl MediaReader {
    /// Open a source at its native frame rate.
    pub fn open(path: impl AsRef<Path>) -> ComposerResult<Self> {
        Self::from_info(probe::probe(path.as_ref())?, None)
    }

    /// Open a source resampled to `fps` frames per second (frames are dropped or duplicated by
    /// the decoder).
    pub fn open_at_rate(path: impl AsRef<Path>, fps: u32) -> ComposerResult<Self> {
        if fps == 0 {
            return Err(ComposerError::config("reader fps must be non-zero"));
        }
        Self::from_info(probe::probe(path.as_ref())?, Some(fps))
    }

    fn from_info(info: MediaInfo, rate: Option<u32>) -> ComposerResult<Self> {
        tracing::debug!(
            path = %info.path.display(),
            width = info.width,
            height = info.height,
            fps = info.fps(),
            "opened media source"
        );
        Ok(Self {
            info,
            decoder: PathBuf::from("ffmpeg"),
            rate,
            child: None,
            stdout: None,
            stderr_drain: None,
            frames_read: 0,
            finished: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.info.path
    }

    pub fn info(&self) -> &MediaInfo {
        &self.info
    }

    pub fn frames_read(&self) -> u64 {
        self.frames_read
    }

    pub fn metadata(&self) -> VideoMetadata {
        let (fps, frame_count) = match self.rate {
            None => (self.info.fps(), self.info.frame_count()),
            Some(rate) => {
                let rate = f64::from(rate);
                let count = if self.info.duration_sec > 0.0 {
                    probe::estimate_frames(self.info.duration_sec, rate)
                } else {
                    let src_fps = self.info.fps();
                    if src_fps > 0.0 {
                        probe::estimate_frames(self.info.frame_count() as f64 / src_fps, rate)
                    } else {
                        0
                    }
                };
                (rate, count)
            }
        };
        VideoMetadata {
            fps,
            width: self.info.width,
            height: self.info.height,
            frame_count,
        }
    }

    fn spawn(&mut self) -> ComposerResult<()> {
        let mut cmd = Command::new(&self.decoder);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd.args(["-nostdin", "-v", "error", "-fflags", "+discardcorrupt", "-i"])
            .arg(&self.info.path)
            .args(["-map", "0:v:0", "-an", "-sn"]);
        if let Some(rate) = self.rate {
            cmd.args(["-vf", &format!("fps={rate}")]);
        }
        cmd.args(["-f", "rawvideo", "-pix_fmt", "bgr24", "pipe:1"]);

        let mut child = cmd.spawn().map_err(|e| {
            ComposerError::media(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| ComposerError::media("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ComposerError::media("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        self.child = Some(child);
        self.stdout = Some(stdout);
        self.stderr_drain = Some(stderr_drain);
        Ok(())
    }

    /// Next decoded frame, or `Ok(None)` once the stream is exhausted.
    ///
    /// A trailing partial frame is treated as end of stream. A decoder that exits with an error
    /// fails the read, even after frames were produced.
    pub fn next_frame(&mut self) -> ComposerResult<Option<BgrFrame>> {
        if self.finished {
            return Ok(None);
        }
        if self.child.is_none() {
            self.spawn()?;
        }

        let frame_len = BgrFrame::byte_len(self.info.width, self.info.height);
        let mut buf = vec![0u8; frame_len];
        let filled = match self.stdout.as_mut() {
            Some(stdout) => read_full(stdout, &mut buf).map_err(|e| {
                ComposerError::media(format!(
                    "failed to read frames from '{}': {e}",
                    self.info.path.display()
                ))
            })?,
            None => 0,
        };

        if filled == frame_len {
            self.frames_read += 1;
            return Ok(Some(BgrFrame::from_raw(
                self.info.width,
                self.info.height,
                buf,
            )?));
        }

        self.finish()?;
        Ok(None)
    }

    /// First decodable frame of the source.
    pub fn first_frame(&mut self) -> ComposerResult<BgrFrame> {
        self.next_frame()?.ok_or_else(|| {
            ComposerError::media(format!(
                "no decodable frame in '{}'",
                self.info.path.display()
            ))
        })
    }

    fn finish(&mut self) -> ComposerResult<()> {
        self.finished = true;
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait().map_err(|e| {
            ComposerError::media(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| ComposerError::media("ffmpeg stderr drain thread panicked"))?
                .unwrap_or_default(),
            None => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(ComposerError::media(format!(
                "ffmpeg could not decode '{}' after {} frames ({status}): {}",
                self.info.path.display(),
                self.frames_read,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

impl Drop for MediaReader {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

impl FrameSource for MediaReader {
    fn next_frame(&mut self) -> ComposerResult<Option<BgrFrame>> {
        MediaReader::next_frame(self)
    }
}

impl Iterator for MediaReader {
    type Item = ComposerResult<BgrFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        MediaReader::next_frame(self).transpose()
    }
}

/// Fill `buf` from `r` until it is full or the reader hits EOF. Returns the bytes filled.
fn read_full(r: &mut impl Read, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Decode a still image into a BGR frame.
#[tracing::instrument(level = "debug", fields(path = %path.display()))]
pub fn load_background(path: &Path) -> ComposerResult<BgrFrame> {
    let img = image::open(path).map_err(|e| {
        ComposerError::media(format!(
            "failed to decode background image '{}': {e}",
            path.display()
        ))
    })?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    let mut data = rgb.into_raw();
    for px in data.chunks_exact_mut(3) {
        px.swap(0, 2);
    }
    BgrFrame::from_raw(w, h, data)
}
