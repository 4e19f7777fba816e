//! Batch orchestration.
//!
//! An [`Engine`] owns the audio adapter and runs at most one job at a time.
//! [`Engine::start`] moves the job onto a dedicated worker thread and
//! returns a [`RunHandle`]; [`Engine::run_blocking`] runs the same loop on
//! the caller's thread.
//!
//! Items are processed strictly in order. Per-item errors become
//! [`FailureRecord`]s and never stop the loop. Cancellation is checked at
//! the top of each iteration only, so an item already being written always
//! finishes.

use crate::allocator::PathAllocator;
use crate::analysis;
use crate::io::AudioIo;
use crate::job::{
    FailureRecord, ItemSource, ItemState, JobItem, Mode, OutputFormat, RunRequest, RunState,
    RunSummary,
};
use crate::markers;
use crate::pairing::{self, Probed};
use crate::reporter::Reporter;
use crate::transform::{merge_to_stereo, split_to_mono};
use crate::{AudioBuffer, Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

/// Shared cancel flag for one run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before its next item.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Releases the engine's active flag when dropped, including on panic.
struct ActiveGuard(Arc<AtomicBool>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs split/merge jobs against one audio adapter.
pub struct Engine {
    io: Arc<dyn AudioIo>,
    active: Arc<AtomicBool>,
}

impl Engine {
    /// Create an engine around an adapter.
    pub fn new(io: impl AudioIo + 'static) -> Self {
        Self::from_shared(Arc::new(io))
    }

    /// Create an engine around an adapter that is shared elsewhere.
    pub fn from_shared(io: Arc<dyn AudioIo>) -> Self {
        Self {
            io,
            active: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The adapter this engine reads and writes through.
    pub fn io(&self) -> &dyn AudioIo {
        &*self.io
    }

    /// Whether a run is currently active.
    pub fn is_running(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn acquire(&self) -> Result<ActiveGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::AlreadyRunning)?;
        Ok(ActiveGuard(Arc::clone(&self.active)))
    }

    /// Start a run on a new worker thread.
    ///
    /// Fails with [`Error::AlreadyRunning`] if a run is active. All
    /// `reporter` callbacks fire on the worker thread.
    pub fn start<R: Reporter + 'static>(&self, request: RunRequest, reporter: R) -> Result<RunHandle> {
        self.start_with_cancel(request, reporter, CancelToken::new())
    }

    /// Like [`start`](Self::start), but observing a token the caller already
    /// holds, e.g. one wired to a signal handler before the worker exists.
    pub fn start_with_cancel<R: Reporter + 'static>(
        &self,
        request: RunRequest,
        reporter: R,
        cancel: CancelToken,
    ) -> Result<RunHandle> {
        let guard = self.acquire()?;
        let io = Arc::clone(&self.io);
        let worker_cancel = cancel.clone();

        let thread = std::thread::Builder::new()
            .name("makestereo-run".into())
            .spawn(move || {
                let _guard = guard;
                let mut reporter = reporter;
                Run::new(&*io, &mut reporter, &worker_cancel, request).execute()
            })
            .map_err(|e| Error::WorkerSpawn(e.to_string()))?;

        Ok(RunHandle { cancel, thread })
    }

    /// Run on the calling thread and return the summary.
    ///
    /// Shares the one-run-at-a-time rule with [`start`](Self::start).
    pub fn run_blocking<R: Reporter + ?Sized>(
        &self,
        request: RunRequest,
        reporter: &mut R,
        cancel: &CancelToken,
    ) -> Result<RunSummary> {
        let _guard = self.acquire()?;
        Ok(Run::new(&*self.io, reporter, cancel, request).execute())
    }
}

/// Handle to a run executing on its worker thread.
pub struct RunHandle {
    cancel: CancelToken,
    thread: JoinHandle<RunSummary>,
}

impl RunHandle {
    /// Request cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// A clone of the run's cancel flag, e.g. for a signal handler.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Whether the worker has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the run to end.
    pub fn join(self) -> Result<RunSummary> {
        self.thread.join().map_err(|_| Error::WorkerPanicked)
    }
}

/// `round(completed * 100 / total)`, halves rounded up.
fn overall_percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed * 200 + total) / (2 * total)).min(100) as u8
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// State of one executing run.
struct Run<'a, R: Reporter + ?Sized> {
    io: &'a dyn AudioIo,
    reporter: &'a mut R,
    cancel: &'a CancelToken,
    request: RunRequest,
    allocator: PathAllocator,
    items: Vec<JobItem>,
    failures: Vec<FailureRecord>,
    state: RunState,
}

impl<'a, R: Reporter + ?Sized> Run<'a, R> {
    fn new(
        io: &'a dyn AudioIo,
        reporter: &'a mut R,
        cancel: &'a CancelToken,
        request: RunRequest,
    ) -> Self {
        Self {
            io,
            reporter,
            cancel,
            request,
            allocator: PathAllocator::new(),
            items: Vec::new(),
            failures: Vec::new(),
            state: RunState::Idle,
        }
    }

    fn execute(mut self) -> RunSummary {
        let span = tracing::info_span!("run", mode = %self.request.mode);
        let _enter = span.enter();

        self.state = RunState::Running;
        tracing::info!(
            files = self.request.files.len(),
            output = %self.request.output_directory.display(),
            format = %self.request.output_format,
            "run started"
        );

        let sources = match self.prepare() {
            Ok(sources) => sources,
            Err(e) => return self.abort(e),
        };
        self.items = sources.into_iter().map(JobItem::new).collect();

        let total = self.items.len();
        for index in 0..total {
            if self.cancel.is_cancelled() {
                tracing::info!(processed = index, total, "run cancelled");
                self.state = RunState::Cancelled;
                self.reporter.on_status("Processing cancelled.");
                break;
            }
            self.process_item(index, total);
            self.reporter
                .on_progress(100, overall_percent(index + 1, total));
        }

        if self.state != RunState::Cancelled {
            self.state = RunState::Completed;
            self.reporter.on_status("Processing complete!");
            if !self.failures.is_empty() {
                let message = format!("Failed files: {}", self.failures.len());
                self.reporter.on_status(&message);
            }
            tracing::info!(items = total, failed = self.failures.len(), "run completed");
            self.reporter.on_completed();
        }

        self.into_summary(None)
    }

    /// Fix the item list before any item I/O happens.
    fn prepare(&mut self) -> Result<Vec<ItemSource>> {
        if let Some(ext) = self.request.output_format.fixed_extension() {
            if !self.io.can_write(ext) {
                return Err(Error::UnsupportedFormat(ext.to_string()));
            }
        }

        match self.request.mode {
            Mode::SplitToMono => {
                let probed = analysis::probe_all(self.io, &self.request.files);
                if !probed.iter().any(|(_, p)| *p == Probed::Channels(2)) {
                    return Err(Error::NoValidFiles);
                }
                Ok(self
                    .request
                    .files
                    .iter()
                    .cloned()
                    .map(ItemSource::Single)
                    .collect())
            }
            Mode::MergeToStereo => {
                let resolution = pairing::resolve(self.io, &self.request.files);
                for annotation in &resolution.annotations {
                    tracing::debug!(
                        path = %annotation.path.display(),
                        status = %annotation.status,
                        "pairing"
                    );
                }
                if resolution.pairs.is_empty() {
                    return Err(Error::NoValidPairs);
                }
                Ok(resolution
                    .pairs
                    .into_iter()
                    .map(|pair| ItemSource::Pair {
                        left: pair.left,
                        right: pair.right,
                    })
                    .collect())
            }
        }
    }

    fn abort(mut self, error: Error) -> RunSummary {
        tracing::warn!(error = %error, "run aborted before processing");
        let message = match &error {
            Error::NoValidPairs => "No valid mono pairs found for processing.".to_string(),
            Error::NoValidFiles => "No valid stereo files found for processing.".to_string(),
            other => format!("Error: {other}"),
        };
        self.reporter.on_status(&message);
        self.state = RunState::Completed;
        self.reporter.on_completed();
        self.into_summary(Some(error))
    }

    fn into_summary(self, aborted: Option<Error>) -> RunSummary {
        RunSummary {
            state: self.state,
            items: self.items,
            failures: self.failures,
            aborted,
        }
    }

    fn process_item(&mut self, index: usize, total: usize) {
        self.items[index].state = ItemState::InProgress;
        let source = self.items[index].source.clone();
        let mut outputs = Vec::new();

        let result = match &source {
            ItemSource::Single(path) => {
                let header = format!("=== Processing {}/{}: {} ===", index + 1, total, display_name(path));
                self.reporter.on_status(&header);
                self.split_file(path, &mut outputs)
            }
            ItemSource::Pair { left, right } => {
                let header = format!("=== Processing pair {}/{} ===", index + 1, total);
                self.reporter.on_status(&header);
                self.merge_pair(left, right, &mut outputs)
            }
        };

        let state = match result {
            Ok(()) => ItemState::Done,
            Err(error) => {
                let source_path = match &error {
                    Error::Read { path, .. } | Error::Probe { path, .. } => path.clone(),
                    _ => source.primary_path().to_path_buf(),
                };
                let reason = error.to_string();
                tracing::warn!(path = %source_path.display(), reason = %reason, "item not converted");
                self.reporter.on_status(&format!("Error: {reason}"));
                self.failures.push(FailureRecord {
                    source_path,
                    reason: reason.clone(),
                });
                self.reporter.on_failed_files_changed(&self.failures);
                match error {
                    Error::NotStereo { .. } => ItemState::Skipped(reason),
                    _ => ItemState::Failed(reason),
                }
            }
        };

        let item = &mut self.items[index];
        item.outputs = outputs;
        item.state = state;
    }

    fn split_file(&mut self, path: &Path, outputs: &mut Vec<PathBuf>) -> Result<()> {
        let ext = self.output_extension(path)?;
        let buffer = self.read(path)?;
        let (left, right) = split_to_mono(&buffer)?;

        let stem = markers::base_name(path);
        let dir = &self.request.output_directory;
        let left_path = self.allocator.allocate(dir, &format!("{stem}-L"), &ext, false);
        let right_path = self.allocator.allocate(dir, &format!("{stem}-R"), &ext, false);

        self.reporter.on_status("Processing left channel...");
        self.write(&left_path, &left, outputs)?;
        self.reporter.on_status("Processing right channel...");
        self.write(&right_path, &right, outputs)?;
        Ok(())
    }

    fn merge_pair(&mut self, left: &Path, right: &Path, outputs: &mut Vec<PathBuf>) -> Result<()> {
        self.reporter
            .on_status(&format!("Left: {}", display_name(left)));
        self.reporter
            .on_status(&format!("Right: {}", display_name(right)));

        let ext = self.output_extension(left)?;
        let left_buffer = self.read(left)?;
        let right_buffer = self.read(right)?;

        self.reporter.on_status("Combining channels...");
        let stereo = merge_to_stereo(&left_buffer, &right_buffer)?;

        let stem = markers::output_stem(&markers::base_name(left));
        let out = self
            .allocator
            .allocate(&self.request.output_directory, &stem, &ext, true);
        self.write(&out, &stereo, outputs)
    }

    fn read(&mut self, path: &Path) -> Result<AudioBuffer> {
        self.reporter
            .on_status(&format!("Reading {}...", display_name(path)));
        let buffer = self.io.read(path)?;
        tracing::debug!(
            path = %path.display(),
            channels = buffer.channels(),
            sample_rate = buffer.sample_rate(),
            frames = buffer.frames(),
            subtype = %buffer.subtype(),
            "decoded"
        );
        self.reporter.on_status(&format!(
            "File info: {}Hz, subtype={}, channels={}",
            buffer.sample_rate(),
            buffer.subtype(),
            buffer.channels()
        ));
        Ok(buffer)
    }

    fn write(&mut self, path: &Path, buffer: &AudioBuffer, outputs: &mut Vec<PathBuf>) -> Result<()> {
        self.reporter
            .on_status(&format!("Saving to: {}", path.display()));
        self.io.write(path, buffer, buffer.subtype())?;
        tracing::info!(path = %path.display(), channels = buffer.channels(), "wrote output");
        outputs.push(path.to_path_buf());
        Ok(())
    }

    fn output_extension(&self, source: &Path) -> Result<String> {
        let ext = self.request.output_format.extension_for(source);
        if self.request.output_format == OutputFormat::SameAsInput && !self.io.can_write(&ext) {
            let shown = if ext.is_empty() { "(no extension)" } else { ext.as_str() };
            return Err(Error::UnsupportedFormat(shown.to_string()));
        }
        Ok(ext)
    }
}
