//! Left/right pairing of mono files.
//!
//! Pairing is a pure function of the ordered file list and each file's
//! probed channel count. Nothing is cached between calls.

use crate::analysis;
use crate::io::AudioIo;
use crate::markers::{self, Side};
use std::fmt;
use std::path::PathBuf;

/// Two mono files that together form one stereo recording.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PairCandidate {
    /// Left channel file.
    pub left: PathBuf,
    /// Right channel file.
    pub right: PathBuf,
}

/// Per-file verdict shown next to each input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Valid stereo input (split mode).
    Stereo,
    /// Not a stereo input (split mode).
    NotStereo,
    /// One half of a pair.
    Channel(Side),
    /// Not a mono input (merge mode).
    NotMono,
    /// No other file shares the normalized name.
    NoMatch,
    /// Three or more files share the normalized name.
    AmbiguousGroup(usize),
    /// Two files share the name but left/right cannot be told apart.
    AmbiguousOrientation,
    /// Metadata could not be read.
    ProbeFailed(String),
}

impl FileStatus {
    /// Whether the file takes part in a run.
    pub fn is_valid(&self) -> bool {
        matches!(self, FileStatus::Stereo | FileStatus::Channel(_))
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Stereo => write!(f, "Stereo file"),
            FileStatus::NotStereo => write!(f, "Not a stereo file – will be ignored"),
            FileStatus::Channel(Side::Left) => write!(f, "Left channel"),
            FileStatus::Channel(Side::Right) => write!(f, "Right channel"),
            FileStatus::NotMono => write!(f, "Not a mono file – will be ignored"),
            FileStatus::NoMatch => write!(f, "No matching pair found – will be ignored"),
            FileStatus::AmbiguousGroup(n) => {
                write!(f, "Ambiguous: {n} files share this name – will be ignored")
            }
            FileStatus::AmbiguousOrientation => {
                write!(f, "Cannot tell left from right – will be ignored")
            }
            FileStatus::ProbeFailed(reason) => write!(f, "Error: {reason}"),
        }
    }
}

/// A file together with its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileAnnotation {
    /// Input file.
    pub path: PathBuf,
    /// Verdict for this file.
    pub status: FileStatus,
}

/// Output of one pairing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairResolution {
    /// Pairs in discovery order.
    pub pairs: Vec<PairCandidate>,
    /// One annotation per input file, in input order.
    pub annotations: Vec<FileAnnotation>,
}

/// Probe result used by [`pair_files`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probed {
    /// File decoded with this many channels.
    Channels(usize),
    /// Probe failed with this reason.
    Failed(String),
}

/// Probe every file through `io` and pair the mono ones.
pub fn resolve<A: AudioIo + ?Sized>(io: &A, files: &[PathBuf]) -> PairResolution {
    pair_files(&analysis::probe_all(io, files))
}

/// Pair files given their probe results.
///
/// Files are grouped by [`markers::normalized_key`] of their base name.
/// Only groups of exactly two mono files whose orientation is unambiguous
/// become pairs; everything else is annotated and left out.
pub fn pair_files(files: &[(PathBuf, Probed)]) -> PairResolution {
    let mut statuses: Vec<Option<FileStatus>> = vec![None; files.len()];

    // Groups keyed by normalized name, in order of first appearance.
    let mut groups: Vec<(String, Vec<usize>)> = Vec::new();
    for (index, (path, probed)) in files.iter().enumerate() {
        match probed {
            Probed::Failed(reason) => statuses[index] = Some(FileStatus::ProbeFailed(reason.clone())),
            Probed::Channels(1) => {
                let key = markers::normalized_key(&markers::base_name(path));
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, members)) => members.push(index),
                    None => groups.push((key, vec![index])),
                }
            }
            Probed::Channels(_) => statuses[index] = Some(FileStatus::NotMono),
        }
    }

    let mut pairs = Vec::new();
    for (key, members) in &groups {
        match members.as_slice() {
            [only] => statuses[*only] = Some(FileStatus::NoMatch),
            [a, b] => {
                let name_a = markers::base_name(&files[*a].0);
                let name_b = markers::base_name(&files[*b].0);
                let (left, right) = match markers::orient(&name_a, &name_b) {
                    Some(true) => (*a, *b),
                    Some(false) => (*b, *a),
                    None => {
                        tracing::debug!(key = %key, "pair rejected: ambiguous orientation");
                        statuses[*a] = Some(FileStatus::AmbiguousOrientation);
                        statuses[*b] = Some(FileStatus::AmbiguousOrientation);
                        continue;
                    }
                };
                statuses[left] = Some(FileStatus::Channel(Side::Left));
                statuses[right] = Some(FileStatus::Channel(Side::Right));
                pairs.push(PairCandidate {
                    left: files[left].0.clone(),
                    right: files[right].0.clone(),
                });
            }
            many => {
                tracing::debug!(key = %key, size = many.len(), "pair rejected: ambiguous group");
                for &member in many {
                    statuses[member] = Some(FileStatus::AmbiguousGroup(many.len()));
                }
            }
        }
    }

    let annotations = files
        .iter()
        .zip(statuses)
        .map(|((path, _), status)| FileAnnotation {
            path: path.clone(),
            status: status.unwrap_or(FileStatus::NoMatch),
        })
        .collect();

    PairResolution { pairs, annotations }
}
