use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::{
    audio::{self, MIX_SAMPLE_RATE, Waveform},
    compose::{
        frame::{FrameCompositor, render_plates},
        layout::layout,
    },
    config::{self, export::ExportConfig, meeting::MeetingConfig, speaker::SpeakerConfig},
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts, ensure_parent_dir},
        mux::mux,
        select::{EncoderProbe, EncoderSpec, select},
        sink::{FrameSink, SinkConfig},
    },
    export::progress::{AUDIO_PHASE_END, ExportControl, MUX_PHASE_END, video_progress},
    foundation::error::{ComposerError, ComposerResult},
    media::{
        letterbox::letterbox,
        reader::{FrameSource, MediaReader, load_background},
    },
};

/// File name of the artifact when no output path is configured.
pub const DEFAULT_ARTIFACT_NAME: &str = "meeting.mp4";

/// Everything one export needs.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    pub meeting: MeetingConfig,
    pub speaker: SpeakerConfig,
    pub export: ExportConfig,
}

impl ExportRequest {
    pub fn validate(&self) -> ComposerResult<()> {
        config::validate_all(&self.meeting, &self.speaker, &self.export)
    }
}

/// What a finished export produced.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOutcome {
    pub artifact: PathBuf,
    pub encoder: EncoderSpec,
    pub frames: u64,
    pub duration_secs: f64,
}

/// Run one export to completion.
///
/// Intermediates live in a private directory under `scratch_root` that is removed on every path.
/// The final file is moved to the meeting's `output_path`, or to
/// `scratch_root/`[`DEFAULT_ARTIFACT_NAME`] when none is set. Nothing is written to the
/// destination unless every stage succeeds.
#[tracing::instrument(skip_all, fields(
    width = request.export.width,
    height = request.export.height,
    fps = request.export.fps,
))]
pub fn run_export(
    request: &ExportRequest,
    scratch_root: &Path,
    probe: &dyn EncoderProbe,
    control: &dyn ExportControl,
) -> ComposerResult<ExportOutcome> {
    request.validate()?;
    let ExportRequest {
        meeting,
        speaker,
        export,
    } = request;

    let layout = layout(export, speaker);
    let background = load_background(&meeting.background_path)?;
    let plates = render_plates(meeting, speaker, &layout)?;
    let compositor = FrameCompositor::new(&background, plates, layout)?;

    let [p1, p2] = meeting.speaker_paths();
    let mut s1 = MediaReader::open_at_rate(p1, export.fps)?;
    let mut s2 = MediaReader::open_at_rate(p2, export.fps)?;
    let total = expected_frames(s1.metadata().frame_count, s2.metadata().frame_count);

    let encoder = select(export.use_gpu, probe);
    tracing::info!(
        encoder = encoder.name(),
        expected_frames = total,
        "export started"
    );

    let work = tempfile::Builder::new()
        .prefix("work-")
        .tempdir_in(scratch_root)
        .with_context(|| {
            format!(
                "failed to create scratch directory in '{}'",
                scratch_root.display()
            )
        })?;

    let video_path = work.path().join("video.mkv");
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&video_path));
    sink.begin(SinkConfig {
        width: export.width,
        height: export.height,
        fps: export.fps,
    })?;
    let frames = render_frames(&mut s1, &mut s2, &compositor, &mut sink, total, control)?;
    sink.end()?;
    drop((s1, s2));
    if frames == 0 {
        return Err(ComposerError::media(
            "speaker sources produced no frames to compose",
        ));
    }

    let duration_secs = frames as f64 / f64::from(export.fps);
    let mut mixed = audio::mix(
        &speaker_track(p1)?,
        &speaker_track(p2)?,
    )?;
    mixed.fit_to_len(audio::frames_for_duration(duration_secs, MIX_SAMPLE_RATE));
    let wav_path = work.path().join("mix.wav");
    audio::write_wav(&mixed, &wav_path)?;
    control.report(AUDIO_PHASE_END);
    tracing::debug!(frames, duration_secs, "audio mixed");

    if control.is_cancelled() {
        return Err(ComposerError::Cancelled);
    }
    let muxed = work.path().join("out.mp4");
    mux(&video_path, &wav_path, &muxed, &encoder, export)?;
    control.report(MUX_PHASE_END);

    let artifact = meeting
        .output_path
        .clone()
        .unwrap_or_else(|| scratch_root.join(DEFAULT_ARTIFACT_NAME));
    deliver(&muxed, &artifact)?;
    tracing::info!(artifact = %artifact.display(), frames, "export finished");

    Ok(ExportOutcome {
        artifact,
        encoder,
        frames,
        duration_secs,
    })
}

/// Lock-step frame loop: the shorter source bounds the output. Cancellation is checked before
/// every frame.
pub fn render_frames(
    s1: &mut dyn FrameSource,
    s2: &mut dyn FrameSource,
    compositor: &FrameCompositor,
    sink: &mut dyn FrameSink,
    total: u64,
    control: &dyn ExportControl,
) -> ComposerResult<u64> {
    let [r1, r2] = compositor.layout().speakers;
    let mut written = 0u64;
    loop {
        if control.is_cancelled() {
            tracing::info!(written, "export cancelled");
            return Err(ComposerError::Cancelled);
        }
        let (Some(f1), Some(f2)) = (s1.next_frame()?, s2.next_frame()?) else {
            break;
        };
        let f1 = letterbox(&f1, r1.w, r1.h)?;
        let f2 = letterbox(&f2, r2.w, r2.h)?;
        let frame = compositor.compose(&f1, &f2)?;
        sink.push_frame(written, &frame)?;
        written += 1;
        control.report(video_progress(written, total));
    }
    Ok(written)
}

/// Expected output length: the shorter source, or the known one when only one reports a count.
fn expected_frames(a: u64, b: u64) -> u64 {
    match (a, b) {
        (0, n) | (n, 0) => n,
        (a, b) => a.min(b),
    }
}

/// A speaker's audio at the mix rate; sources without audio become an empty (silent) track.
fn speaker_track(path: &Path) -> ComposerResult<Waveform> {
    match audio::extract(path) {
        Ok(wave) => audio::resample(&wave, MIX_SAMPLE_RATE),
        Err(ComposerError::AudioExtraction(msg)) => {
            tracing::warn!(
                path = %path.display(),
                reason = %msg,
                "speaker has no audio, using silence"
            );
            Ok(Waveform::silence(MIX_SAMPLE_RATE, 0))
        }
        Err(e) => Err(e),
    }
}

/// Move `from` to `to`, copying when a rename is not possible (e.g. across filesystems).
pub(crate) fn deliver(from: &Path, to: &Path) -> ComposerResult<()> {
    ensure_parent_dir(to)?;
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to).with_context(|| {
        format!(
            "failed to move '{}' to '{}'",
            from.display(),
            to.display()
        )
    })?;
    std::fs::remove_file(from)
        .with_context(|| format!("failed to remove '{}'", from.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
