//! Report which files a run would use, without converting anything.

use clap::Args;
use makestereo_core::{Mode, analyze};
use makestereo_io::WavIo;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Conversion direction to check: split or merge
    #[arg(short, long, default_value = "split")]
    pub mode: Mode,

    /// Input audio files
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let analysis = analyze(&WavIo::new(), args.mode, &args.files);

    println!("Mode: {}", args.mode.label());
    println!();

    let width = analysis
        .annotations
        .iter()
        .map(|a| a.path.display().to_string().len())
        .max()
        .unwrap_or(0);
    for annotation in &analysis.annotations {
        let name = annotation.path.display().to_string();
        println!("  {name:<width$}  {}", annotation.status);
    }

    if !analysis.pairs.is_empty() {
        println!();
        println!("Pairs:");
        for pair in &analysis.pairs {
            println!("  L {}", pair.left.display());
            println!("  R {}", pair.right.display());
        }
    }

    println!();
    println!("Valid: {}", analysis.valid_items);
    println!("{}", analysis.readiness().message());

    Ok(())
}
