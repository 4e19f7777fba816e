//! Pre-run inspection of an input list.
//!
//! Probes every file once and reports, per file, whether it will take part
//! in a run of the chosen mode. Also tells whether the *other* mode would
//! have found work, so a front end can suggest switching.

use crate::io::AudioIo;
use crate::job::Mode;
use crate::pairing::{self, FileAnnotation, FileStatus, PairCandidate, Probed};
use std::path::PathBuf;

/// Whether an input list is ready for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// The chosen mode has work to do.
    Ready,
    /// Nothing to do in this mode, but the given mode would have work.
    SwitchMode(Mode),
    /// Nothing to do in either mode.
    Empty,
}

impl Readiness {
    /// Message shown to the user.
    pub fn message(self) -> String {
        match self {
            Readiness::Ready => "Ready to process valid audio files.".to_string(),
            Readiness::SwitchMode(mode) => format!(
                "No valid files for this mode. Switch to {} to process valid files.",
                mode.label()
            ),
            Readiness::Empty => "No valid files. Add audio files to begin.".to_string(),
        }
    }
}

/// Result of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Mode the list was analyzed for.
    pub mode: Mode,
    /// One annotation per input, in input order.
    pub annotations: Vec<FileAnnotation>,
    /// Stereo files (split) or pairs (merge).
    pub valid_items: usize,
    /// Pairs found (empty in split mode).
    pub pairs: Vec<PairCandidate>,
    /// Whether the opposite mode would have at least one item.
    pub other_mode_has_work: bool,
}

impl Analysis {
    /// Summarize into a [`Readiness`] verdict.
    pub fn readiness(&self) -> Readiness {
        if self.valid_items > 0 {
            Readiness::Ready
        } else if self.other_mode_has_work {
            Readiness::SwitchMode(self.mode.other())
        } else {
            Readiness::Empty
        }
    }
}

/// Probe each file's channel count.
pub fn probe_all<A: AudioIo + ?Sized>(io: &A, files: &[PathBuf]) -> Vec<(PathBuf, Probed)> {
    files
        .iter()
        .map(|path| {
            let probed = match io.probe(path) {
                Ok(info) => Probed::Channels(info.channels),
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "probe failed");
                    Probed::Failed(e.to_string())
                }
            };
            (path.clone(), probed)
        })
        .collect()
}

/// Annotate probed files for split mode.
pub fn stereo_annotations(probed: &[(PathBuf, Probed)]) -> Vec<FileAnnotation> {
    probed
        .iter()
        .map(|(path, probe)| FileAnnotation {
            path: path.clone(),
            status: match probe {
                Probed::Channels(2) => FileStatus::Stereo,
                Probed::Channels(_) => FileStatus::NotStereo,
                Probed::Failed(reason) => FileStatus::ProbeFailed(reason.clone()),
            },
        })
        .collect()
}

/// Inspect `files` for a run in `mode`.
pub fn analyze<A: AudioIo + ?Sized>(io: &A, mode: Mode, files: &[PathBuf]) -> Analysis {
    let probed = probe_all(io, files);
    let stereo = stereo_annotations(&probed);
    let stereo_count = stereo.iter().filter(|a| a.status.is_valid()).count();
    let resolution = pairing::pair_files(&probed);

    match mode {
        Mode::SplitToMono => Analysis {
            mode,
            annotations: stereo,
            valid_items: stereo_count,
            pairs: Vec::new(),
            other_mode_has_work: !resolution.pairs.is_empty(),
        },
        Mode::MergeToStereo => Analysis {
            mode,
            annotations: resolution.annotations,
            valid_items: resolution.pairs.len(),
            pairs: resolution.pairs,
            other_mode_has_work: stereo_count > 0,
        },
    }
}
