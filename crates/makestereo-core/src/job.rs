//! Run requests, per-item bookkeeping, and run summaries.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Direction of a conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Stereo file -> left and right mono files.
    SplitToMono,
    /// Left and right mono files -> stereo file.
    MergeToStereo,
}

impl Mode {
    /// The opposite direction.
    pub fn other(self) -> Mode {
        match self {
            Mode::SplitToMono => Mode::MergeToStereo,
            Mode::MergeToStereo => Mode::SplitToMono,
        }
    }

    /// Short label for status text.
    pub fn label(self) -> &'static str {
        match self {
            Mode::SplitToMono => "STEREO → 2 MONO",
            Mode::MergeToStereo => "MONO → STEREO",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::SplitToMono => "split",
            Mode::MergeToStereo => "merge",
        })
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "split" | "split-to-mono" | "stereo-to-mono" => Ok(Mode::SplitToMono),
            "merge" | "merge-to-stereo" | "mono-to-stereo" => Ok(Mode::MergeToStereo),
            other => Err(format!("unknown mode '{other}' (expected split or merge)")),
        }
    }
}

/// Output container choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Keep each source file's extension.
    #[default]
    SameAsInput,
    /// Write `.wav`.
    Wav,
    /// Write `.mp3`.
    Mp3,
}

impl OutputFormat {
    /// Fixed extension for this format, or `None` for [`SameAsInput`](Self::SameAsInput).
    pub fn fixed_extension(self) -> Option<&'static str> {
        match self {
            OutputFormat::SameAsInput => None,
            OutputFormat::Wav => Some("wav"),
            OutputFormat::Mp3 => Some("mp3"),
        }
    }

    /// Extension (no leading dot) to use for output derived from `source`.
    pub fn extension_for(self, source: &Path) -> String {
        match self.fixed_extension() {
            Some(ext) => ext.to_string(),
            None => source
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::SameAsInput => "same",
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "same" | "same-as-input" => Ok(OutputFormat::SameAsInput),
            "wav" => Ok(OutputFormat::Wav),
            "mp3" => Ok(OutputFormat::Mp3),
            other => Err(format!(
                "unknown output format '{other}' (expected same, wav, or mp3)"
            )),
        }
    }
}

/// Everything one run needs. The file list is fixed once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    /// Conversion direction.
    pub mode: Mode,
    /// Input files in the order they were given.
    pub files: Vec<PathBuf>,
    /// Directory that receives all output.
    pub output_directory: PathBuf,
    /// Output container choice.
    pub output_format: OutputFormat,
}

impl RunRequest {
    /// Create a request with [`OutputFormat::SameAsInput`].
    pub fn new(mode: Mode, files: Vec<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            mode,
            files,
            output_directory: output_directory.into(),
            output_format: OutputFormat::SameAsInput,
        }
    }

    /// Set the output format.
    pub fn with_output_format(mut self, output_format: OutputFormat) -> Self {
        self.output_format = output_format;
        self
    }
}

/// What an item converts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemSource {
    /// One stereo file (split mode).
    Single(PathBuf),
    /// A left/right pair (merge mode).
    Pair {
        /// Left channel file.
        left: PathBuf,
        /// Right channel file.
        right: PathBuf,
    },
}

impl ItemSource {
    /// Path used to identify the item in failure records.
    pub fn primary_path(&self) -> &Path {
        match self {
            ItemSource::Single(path) => path,
            ItemSource::Pair { left, .. } => left,
        }
    }
}

/// Lifecycle of one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemState {
    /// Not started.
    Pending,
    /// Being read, transformed, or written.
    InProgress,
    /// All outputs written.
    Done,
    /// An error stopped this item.
    Failed(String),
    /// Input not eligible for this mode.
    Skipped(String),
}

impl ItemState {
    /// Whether the item reached a final state.
    pub fn is_finished(&self) -> bool {
        matches!(self, ItemState::Done | ItemState::Failed(_) | ItemState::Skipped(_))
    }
}

/// One unit of work within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobItem {
    /// Input(s).
    pub source: ItemSource,
    /// Current state.
    pub state: ItemState,
    /// Files written so far, including partial output of failed items.
    pub outputs: Vec<PathBuf>,
}

impl JobItem {
    pub(crate) fn new(source: ItemSource) -> Self {
        Self {
            source,
            state: ItemState::Pending,
            outputs: Vec::new(),
        }
    }
}

/// A failed or skipped input and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Input that failed.
    pub source_path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_path.display(), self.reason)
    }
}

/// Engine state for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// No run started.
    Idle,
    /// Items are being processed.
    Running,
    /// Every item was visited, or the run aborted before starting.
    Completed,
    /// Stopped early by a cancel request.
    Cancelled,
}

/// Final snapshot handed back when a run ends.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// [`RunState::Completed`] or [`RunState::Cancelled`].
    pub state: RunState,
    /// Every item, in processing order.
    pub items: Vec<JobItem>,
    /// Cumulative failure list.
    pub failures: Vec<FailureRecord>,
    /// Set when the run stopped before any item was processed.
    pub aborted: Option<Error>,
}

impl RunSummary {
    /// Items that finished successfully.
    pub fn done_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.state == ItemState::Done)
            .count()
    }

    /// Every output file written during the run.
    pub fn outputs(&self) -> impl Iterator<Item = &Path> {
        self.items
            .iter()
            .flat_map(|item| item.outputs.iter().map(PathBuf::as_path))
    }

    /// Whether the run visited every item and none failed.
    pub fn is_clean(&self) -> bool {
        self.state == RunState::Completed && self.aborted.is_none() && self.failures.is_empty()
    }
}
