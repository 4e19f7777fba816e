//! `split` and `merge`: run a conversion job.

use crate::reporter::{ProgressReporter, progress_bar};
use clap::Args;
use makestereo_config::Settings;
use makestereo_core::{CancelToken, Engine, ItemSource, ItemState, Mode, OutputFormat, RunRequest, RunState};
use makestereo_io::WavIo;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConvertArgs {
    /// Input audio files
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Output directory (default: settings file, then the first input's directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Output format: same, wav, or mp3
    #[arg(short, long)]
    pub format: Option<OutputFormat>,
}

pub fn run(mode: Mode, args: ConvertArgs, settings: &Settings) -> anyhow::Result<()> {
    let output_directory = args
        .output
        .unwrap_or_else(|| settings.resolve_output_directory(&args.files));
    let format = args.format.unwrap_or(settings.output_format);

    println!("Mode:   {}", mode.label());
    println!("Files:  {}", args.files.len());
    println!("Output: {}", output_directory.display());
    println!();

    let request = RunRequest::new(mode, args.files, &output_directory).with_output_format(format);
    let engine = Engine::new(WavIo::new());

    let cancel = CancelToken::new();
    let on_signal = cancel.clone();
    ctrlc::set_handler(move || {
        eprintln!("\nCancelling after the current file...");
        on_signal.cancel();
    })?;

    let bar = progress_bar()?;
    let handle = engine.start_with_cancel(request, ProgressReporter::new(bar.clone()), cancel)?;

    let summary = handle.join()?;
    if !bar.is_finished() {
        bar.abandon_with_message("cancelled");
    }

    if let Some(error) = &summary.aborted {
        anyhow::bail!("{error}");
    }

    for item in &summary.items {
        match (&item.source, &item.state) {
            (ItemSource::Single(path), ItemState::Done) => {
                println!("{}", path.display());
            }
            (ItemSource::Pair { left, right }, ItemState::Done) => {
                println!("{} + {}", left.display(), right.display());
            }
            _ => continue,
        }
        for output in &item.outputs {
            println!("  -> {}", output.display());
        }
    }

    let total = summary.items.len();
    println!();
    println!("Converted {} of {} item(s).", summary.done_count(), total);

    if !summary.failures.is_empty() {
        eprintln!("Failed files:");
        for failure in &summary.failures {
            eprintln!("  {failure}");
        }
    }

    if summary.state == RunState::Cancelled {
        anyhow::bail!(
            "cancelled after {} of {} item(s)",
            summary.done_count(),
            total
        );
    }
    if !summary.failures.is_empty() {
        anyhow::bail!("{} file(s) could not be converted", summary.failures.len());
    }

    Ok(())
}
