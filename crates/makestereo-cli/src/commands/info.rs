//! Display audio file metadata.

use clap::Args;
use makestereo_core::{AudioIo, Encoding};
use makestereo_io::WavIo;

/// Display audio file information.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the audio file
    pub file: std::path::PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let info = WavIo::new().probe(&args.file)?;

    let encoding = match info.subtype.encoding {
        Encoding::Pcm => "PCM",
        Encoding::IeeeFloat => "IEEE Float",
    };
    let layout = match info.channels {
        1 => " (mono)",
        2 => " (stereo)",
        _ => "",
    };

    println!("File:        {}", args.file.display());
    println!(
        "Format:      {} {}-bit ({})",
        encoding, info.subtype.bits_per_sample, info.subtype
    );
    println!("Channels:    {}{}", info.channels, layout);
    println!("Sample Rate: {} Hz", info.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        info.duration_secs(),
        info.frames
    );

    let file_size = std::fs::metadata(&args.file)?.len();
    println!("File Size:   {}", format_bytes(file_size));

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
