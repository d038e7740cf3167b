use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use meeting_composer::encode::select::{GPU_CANDIDATES, select};
use meeting_composer::{EncoderProbe, FfmpegProbe, JobRegistry, JobSpec, JobStatus};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "meeting-composer", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose the first frame of a meeting and write it as a JPEG.
    Preview(PreviewArgs),
    /// Export the full meeting as an MP4 (requires `ffmpeg` and `ffprobe` on PATH).
    Export(ExportArgs),
    /// Report which hardware encoders work on this machine.
    Encoders(EncodersArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Job JSON with `meeting`, `speaker` and `export` sections.
    #[arg(long)]
    config: PathBuf,

    /// Output JPEG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Job JSON with `meeting`, `speaker` and `export` sections.
    #[arg(long)]
    config: PathBuf,

    /// Output MP4 path. Overrides `meeting.output_path`.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct EncodersArgs {
    /// Also print the encoder an export with `use_gpu` would pick.
    #[arg(long)]
    gpu: bool,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
        Command::Export(args) => cmd_export(args),
        Command::Encoders(args) => cmd_encoders(args),
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    let spec = JobSpec::from_path(&args.config)?;
    let preview = meeting_composer::create_preview(&spec.meeting, &spec.speaker, &spec.export)?;
    preview.save(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut spec = JobSpec::from_path(&args.config)?;
    let out = args
        .out
        .or_else(|| spec.meeting.output_path.clone())
        .unwrap_or_else(|| PathBuf::from("meeting.mp4"));
    spec.meeting.output_path = Some(out.clone());

    let registry = JobRegistry::new();
    let id = registry.start(spec.export, spec.meeting, spec.speaker)?;

    let mut last_progress = None;
    let snap = loop {
        let snap = registry.wait(id, Duration::from_millis(500))?;
        if last_progress != Some(snap.progress) {
            tracing::info!(job = %id, progress = snap.progress, "exporting");
            last_progress = Some(snap.progress);
        }
        if snap.status.is_terminal() {
            break snap;
        }
    };

    match snap.status {
        JobStatus::Done => {
            let artifact = registry.artifact(id)?;
            eprintln!("wrote {}", artifact.display());
            Ok(())
        }
        _ => {
            let msg = snap.error.unwrap_or_else(|| "unknown failure".to_owned());
            Err(anyhow::anyhow!(msg))
                .with_context(|| format!("export of '{}' failed", out.display()))
        }
    }
}

fn cmd_encoders(args: EncodersArgs) -> anyhow::Result<()> {
    let probe = FfmpegProbe::new();
    for kind in GPU_CANDIDATES {
        let usable = probe.is_usable(*kind);
        println!(
            "{:<24} {}",
            kind.display_name(),
            if usable { "available" } else { "unavailable" }
        );
    }
    if args.gpu {
        println!("selected: {}", select(true, &probe).kind.display_name());
    }
    Ok(())
}
