//! Integration tests for the batch engine, run against an in-memory adapter.

use crossbeam_channel::{Receiver, Sender, unbounded};
use makestereo_core::{
    AudioBuffer, AudioInfo, AudioIo, CancelToken, ChannelReporter, Engine, Error, FailureRecord,
    ItemState, JobEvent, Mode, OutputFormat, Reporter, Result, RunRequest, RunState, Subtype,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// In-memory adapter
// ---------------------------------------------------------------------------

/// Adapter that keeps "files" in a map and can be told to fail writes.
#[derive(Default)]
struct MemoryIo {
    files: Mutex<HashMap<PathBuf, AudioBuffer>>,
    failing_writes: Mutex<HashSet<String>>,
    reads: Mutex<Vec<PathBuf>>,
}

impl MemoryIo {
    fn insert(&self, path: impl Into<PathBuf>, buffer: AudioBuffer) {
        self.files.lock().unwrap().insert(path.into(), buffer);
    }

    fn get(&self, path: &Path) -> Option<AudioBuffer> {
        self.files.lock().unwrap().get(path).cloned()
    }

    fn fail_writes_named(&self, file_name: &str) {
        self.failing_writes
            .lock()
            .unwrap()
            .insert(file_name.to_string());
    }

    fn read_count(&self) -> usize {
        self.reads.lock().unwrap().len()
    }
}

impl AudioIo for MemoryIo {
    fn probe(&self, path: &Path) -> Result<AudioInfo> {
        self.get(path)
            .map(|b| b.info())
            .ok_or_else(|| Error::probe(path, "no such file"))
    }

    fn read(&self, path: &Path) -> Result<AudioBuffer> {
        self.reads.lock().unwrap().push(path.to_path_buf());
        self.get(path).ok_or_else(|| Error::read(path, "no such file"))
    }

    fn write(&self, path: &Path, buffer: &AudioBuffer, _subtype: Subtype) -> Result<()> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        if self.failing_writes.lock().unwrap().contains(&name) {
            return Err(Error::write(path, "disk full"));
        }
        self.insert(path, buffer.clone());
        Ok(())
    }

    fn can_write(&self, extension: &str) -> bool {
        extension.eq_ignore_ascii_case("wav")
    }
}

/// Adapter whose reads announce themselves and then block until released.
struct GatedIo {
    inner: MemoryIo,
    entered: Sender<()>,
    gate: Receiver<()>,
}

impl GatedIo {
    fn new() -> (Self, Receiver<()>, Sender<()>) {
        let (entered, entered_rx) = unbounded();
        let (release, gate) = unbounded();
        let io = Self {
            inner: MemoryIo::default(),
            entered,
            gate,
        };
        (io, entered_rx, release)
    }
}

impl AudioIo for GatedIo {
    fn probe(&self, path: &Path) -> Result<AudioInfo> {
        self.inner.probe(path)
    }

    fn read(&self, path: &Path) -> Result<AudioBuffer> {
        let _ = self.entered.send(());
        let _ = self.gate.recv();
        self.inner.read(path)
    }

    fn write(&self, path: &Path, buffer: &AudioBuffer, subtype: Subtype) -> Result<()> {
        self.inner.write(path, buffer, subtype)
    }

    fn can_write(&self, extension: &str) -> bool {
        self.inner.can_write(extension)
    }
}

/// Reporter that records events and can cancel after N progress ticks.
#[derive(Default)]
struct Recorder {
    events: Vec<JobEvent>,
    cancel_after: Option<(usize, CancelToken)>,
}

impl Recorder {
    fn progress(&self) -> Vec<(u8, u8)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                JobEvent::Progress { current, overall } => Some((*current, *overall)),
                _ => None,
            })
            .collect()
    }

    fn completed_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| **e == JobEvent::Completed)
            .count()
    }

    fn statuses(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                JobEvent::Status(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Reporter for Recorder {
    fn on_progress(&mut self, current: u8, overall: u8) {
        self.events.push(JobEvent::Progress { current, overall });
        if let Some((after, token)) = &self.cancel_after {
            if self.progress().len() >= *after {
                token.cancel();
            }
        }
    }

    fn on_status(&mut self, message: &str) {
        self.events.push(JobEvent::Status(message.to_string()));
    }

    fn on_failed_files_changed(&mut self, failures: &[FailureRecord]) {
        self.events.push(JobEvent::FailedFilesChanged(failures.to_vec()));
    }

    fn on_completed(&mut self) {
        self.events.push(JobEvent::Completed);
    }
}

fn mono(rate: u32, samples: &[f64]) -> AudioBuffer {
    AudioBuffer::mono(rate, Subtype::PCM_16, samples.to_vec()).unwrap()
}

fn stereo(rate: u32, frames: usize) -> AudioBuffer {
    let samples = (0..frames * 2).map(|i| i as f64 / 100.0).collect();
    AudioBuffer::from_interleaved(2, rate, Subtype::PCM_24, samples).unwrap()
}

fn setup() -> (Arc<MemoryIo>, Engine, TempDir) {
    let io = Arc::new(MemoryIo::default());
    let engine = Engine::new(Arc::clone(&io));
    (io, engine, TempDir::new().unwrap())
}

// ---------------------------------------------------------------------------
// Merge mode
// ---------------------------------------------------------------------------

#[test]
fn merge_voice_pair_writes_stereo_file() {
    let (io, engine, out) = setup();
    io.insert("in/voice-L.wav", mono(44100, &[0.1, 0.2, 0.3]));
    io.insert("in/voice-R.wav", mono(44100, &[-0.1, -0.2, -0.3]));

    let request = RunRequest::new(
        Mode::MergeToStereo,
        vec!["in/voice-L.wav".into(), "in/voice-R.wav".into()],
        out.path(),
    );
    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(request, &mut rec, &CancelToken::new())
        .unwrap();

    assert!(summary.is_clean(), "failures: {:?}", summary.failures);
    let expected = out.path().join("voice_Stereo.wav");
    assert_eq!(summary.outputs().collect::<Vec<_>>(), vec![expected.as_path()]);

    let written = io.get(&expected).unwrap();
    assert_eq!(written.channels(), 2);
    assert_eq!(written.sample_rate(), 44100);
    assert_eq!(written.samples(), &[0.1, -0.1, 0.2, -0.2, 0.3, -0.3]);

    assert_eq!(rec.progress(), vec![(100, 100)]);
    assert_eq!(rec.completed_count(), 1);
}

#[test]
fn merge_rate_mismatch_fails_item_and_continues() {
    let (io, engine, out) = setup();
    io.insert("a-L.wav", mono(44100, &[0.0; 4]));
    io.insert("a-R.wav", mono(48000, &[0.0; 4]));
    io.insert("b-L.wav", mono(48000, &[0.5; 4]));
    io.insert("b-R.wav", mono(48000, &[0.5; 4]));

    let files = ["a-L.wav", "a-R.wav", "b-L.wav", "b-R.wav"]
        .map(PathBuf::from)
        .to_vec();
    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::MergeToStereo, files, out.path()),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(summary.state, RunState::Completed);
    assert_eq!(summary.items.len(), 2);
    assert!(matches!(&summary.items[0].state, ItemState::Failed(r) if r.contains("sample rate mismatch")));
    assert_eq!(summary.items[1].state, ItemState::Done);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].source_path, PathBuf::from("a-L.wav"));
    assert!(io.get(&out.path().join("b_Stereo.wav")).is_some());
    assert_eq!(rec.progress(), vec![(100, 50), (100, 100)]);
    assert_eq!(rec.completed_count(), 1);
}

#[test]
fn merge_ambiguous_group_aborts_with_no_pairs() {
    let (io, engine, out) = setup();
    for name in ["a-L.wav", "a-R.wav", "a_L.wav"] {
        io.insert(name, mono(44100, &[0.0; 2]));
    }
    let files = ["a-L.wav", "a-R.wav", "a_L.wav"].map(PathBuf::from).to_vec();
    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::MergeToStereo, files, out.path()),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(summary.aborted, Some(Error::NoValidPairs));
    assert!(summary.items.is_empty());
    assert_eq!(io.read_count(), 0);
    assert_eq!(
        rec.statuses(),
        vec!["No valid mono pairs found for processing."]
    );
    assert_eq!(rec.completed_count(), 1);
    assert!(rec.progress().is_empty());
}

#[test]
fn merge_output_name_strips_word_markers() {
    let (io, engine, out) = setup();
    io.insert("Drums Left.wav", mono(48000, &[0.1]));
    io.insert("Drums Right.wav", mono(48000, &[0.2]));
    let files = vec!["Drums Right.wav".into(), "Drums Left.wav".into()];

    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::MergeToStereo, files, out.path()),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();

    let written = out.path().join("Drums _Stereo.wav");
    assert_eq!(summary.outputs().collect::<Vec<_>>(), vec![written.as_path()]);
    assert_eq!(io.get(&written).unwrap().samples(), &[0.1, 0.2]);
}

#[test]
fn merge_output_name_keeps_right_letters_in_stem() {
    let (io, engine, out) = setup();
    io.insert("Drum_Room-L.wav", mono(44100, &[0.1]));
    io.insert("Drum_Room-R.wav", mono(44100, &[0.2]));
    io.insert("Vox-Reverb_L.wav", mono(44100, &[0.3]));
    io.insert("Vox-Reverb_R.wav", mono(44100, &[0.4]));
    let files = [
        "Drum_Room-L.wav",
        "Drum_Room-R.wav",
        "Vox-Reverb_L.wav",
        "Vox-Reverb_R.wav",
    ]
    .map(PathBuf::from)
    .to_vec();

    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::MergeToStereo, files, out.path()),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();

    assert!(summary.is_clean(), "failures: {:?}", summary.failures);
    let names: Vec<String> = summary
        .outputs()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["Drum_Room_Stereo.wav", "Vox-Reverb_Stereo.wav"]);
}

#[test]
fn merge_read_failure_names_the_missing_file() {
    let (io, engine, out) = setup();
    io.insert("x-L.wav", mono(44100, &[0.0]));
    io.insert("x-R.wav", mono(44100, &[0.0]));
    let files = vec!["x-L.wav".into(), "x-R.wav".into()];

    // Pairing sees both files; the right one disappears before the read.
    struct Vanish<'a>(&'a MemoryIo);
    impl Reporter for Vanish<'_> {
        fn on_status(&mut self, message: &str) {
            if message.starts_with("Left:") {
                self.0.files.lock().unwrap().remove(Path::new("x-R.wav"));
            }
        }
    }
    let mut vanish = Vanish(&io);
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::MergeToStereo, files, out.path()),
            &mut vanish,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].source_path, PathBuf::from("x-R.wav"));
    assert!(matches!(summary.items[0].state, ItemState::Failed(_)));
}

// ---------------------------------------------------------------------------
// Split mode
// ---------------------------------------------------------------------------

#[test]
fn split_avoids_existing_output() {
    let (io, engine, out) = setup();
    std::fs::write(out.path().join("stereo-L.wav"), b"existing").unwrap();
    io.insert("in/stereo.wav", stereo(48000, 8));

    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::SplitToMono, vec!["in/stereo.wav".into()], out.path()),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();

    assert!(summary.is_clean());
    let outputs: Vec<_> = summary.outputs().map(Path::to_path_buf).collect();
    assert_eq!(
        outputs,
        vec![
            out.path().join("stereo-L.01.wav"),
            out.path().join("stereo-R.wav")
        ]
    );
    assert_eq!(
        std::fs::read(out.path().join("stereo-L.wav")).unwrap(),
        b"existing"
    );
}

#[test]
fn split_outputs_inherit_rate_and_subtype() {
    let (io, engine, out) = setup();
    io.insert("song.wav", stereo(96000, 4));
    engine
        .run_blocking(
            RunRequest::new(Mode::SplitToMono, vec!["song.wav".into()], out.path()),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();

    let left = io.get(&out.path().join("song-L.wav")).unwrap();
    let right = io.get(&out.path().join("song-R.wav")).unwrap();
    assert_eq!(left.subtype(), Subtype::PCM_24);
    assert_eq!(right.sample_rate(), 96000);
    assert_eq!(left.samples(), &[0.0, 0.02, 0.04, 0.06]);
    assert_eq!(right.samples(), &[0.01, 0.03, 0.05, 0.07]);
}

#[test]
fn split_skips_mono_input_and_continues() {
    let (io, engine, out) = setup();
    io.insert("mono.wav", mono(44100, &[0.0; 4]));
    io.insert("st.wav", stereo(44100, 4));

    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(
            RunRequest::new(
                Mode::SplitToMono,
                vec!["mono.wav".into(), "st.wav".into()],
                out.path(),
            ),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();

    assert!(matches!(&summary.items[0].state, ItemState::Skipped(r) if r.contains("not a stereo file")));
    assert_eq!(summary.items[1].state, ItemState::Done);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].source_path, PathBuf::from("mono.wav"));
    assert_eq!(rec.progress(), vec![(100, 50), (100, 100)]);
    assert_eq!(rec.completed_count(), 1);
    assert!(rec.statuses().contains(&"Failed files: 1"));
}

#[test]
fn split_without_stereo_input_aborts() {
    let (io, engine, out) = setup();
    io.insert("a.wav", mono(44100, &[0.0]));
    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::SplitToMono, vec!["a.wav".into()], out.path()),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(summary.aborted, Some(Error::NoValidFiles));
    assert_eq!(io.read_count(), 0);
    assert_eq!(rec.completed_count(), 1);
}

#[test]
fn split_empty_request_aborts() {
    let (_io, engine, out) = setup();
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::SplitToMono, Vec::new(), out.path()),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();
    assert_eq!(summary.aborted, Some(Error::NoValidFiles));
}

#[test]
fn write_failure_keeps_partial_output() {
    let (io, engine, out) = setup();
    io.insert("take.wav", stereo(44100, 2));
    io.insert("next.wav", stereo(44100, 2));
    io.fail_writes_named("take-R.wav");

    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(
            RunRequest::new(
                Mode::SplitToMono,
                vec!["take.wav".into(), "next.wav".into()],
                out.path(),
            ),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();

    let first = &summary.items[0];
    assert!(matches!(&first.state, ItemState::Failed(r) if r.contains("disk full")));
    assert_eq!(first.outputs, vec![out.path().join("take-L.wav")]);
    assert!(io.get(&out.path().join("take-L.wav")).is_some());
    assert_eq!(summary.items[1].state, ItemState::Done);
    assert_eq!(rec.completed_count(), 1);
}

#[test]
fn failure_list_grows_monotonically() {
    let (io, engine, out) = setup();
    io.insert("a.wav", mono(44100, &[0.0]));
    io.insert("b.wav", mono(44100, &[0.0]));
    io.insert("c.wav", stereo(44100, 1));
    let mut rec = Recorder::default();
    engine
        .run_blocking(
            RunRequest::new(
                Mode::SplitToMono,
                vec!["a.wav".into(), "b.wav".into(), "c.wav".into()],
                out.path(),
            ),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();

    let sizes: Vec<usize> = rec
        .events
        .iter()
        .filter_map(|e| match e {
            JobEvent::FailedFilesChanged(list) => Some(list.len()),
            _ => None,
        })
        .collect();
    assert_eq!(sizes, vec![1, 2]);
}

// ---------------------------------------------------------------------------
// Output format
// ---------------------------------------------------------------------------

#[test]
fn unsupported_fixed_format_fails_fast() {
    let (io, engine, out) = setup();
    io.insert("st.wav", stereo(44100, 2));
    let mut rec = Recorder::default();
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::SplitToMono, vec!["st.wav".into()], out.path())
                .with_output_format(OutputFormat::Mp3),
            &mut rec,
            &CancelToken::new(),
        )
        .unwrap();

    assert_eq!(summary.aborted, Some(Error::UnsupportedFormat("mp3".into())));
    assert_eq!(io.read_count(), 0);
    assert_eq!(rec.completed_count(), 1);
}

#[test]
fn unsupported_source_extension_fails_item_only() {
    let (io, engine, out) = setup();
    io.insert("a.flac", stereo(44100, 2));
    io.insert("b.wav", stereo(44100, 2));
    let summary = engine
        .run_blocking(
            RunRequest::new(
                Mode::SplitToMono,
                vec!["a.flac".into(), "b.wav".into()],
                out.path(),
            ),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();

    assert!(matches!(&summary.items[0].state, ItemState::Failed(r) if r.contains("flac")));
    assert_eq!(summary.items[1].state, ItemState::Done);
    // The unwritable item is rejected before it is decoded.
    assert_eq!(io.read_count(), 1);
}

#[test]
fn unsupported_pair_extension_fails_before_reading() {
    let (io, engine, out) = setup();
    io.insert("x-L.aiff", mono(44100, &[0.0]));
    io.insert("x-R.aiff", mono(44100, &[0.0]));
    let summary = engine
        .run_blocking(
            RunRequest::new(
                Mode::MergeToStereo,
                vec!["x-L.aiff".into(), "x-R.aiff".into()],
                out.path(),
            ),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();

    assert!(matches!(&summary.items[0].state, ItemState::Failed(r) if r.contains("aiff")));
    assert_eq!(summary.failures[0].source_path, PathBuf::from("x-L.aiff"));
    assert_eq!(io.read_count(), 0);
}

#[test]
fn wav_format_rewrites_extension() {
    let (io, engine, out) = setup();
    io.insert("a.flac", stereo(44100, 2));
    let summary = engine
        .run_blocking(
            RunRequest::new(Mode::SplitToMono, vec!["a.flac".into()], out.path())
                .with_output_format(OutputFormat::Wav),
            &mut Recorder::default(),
            &CancelToken::new(),
        )
        .unwrap();
    assert!(summary.is_clean());
    assert!(io.get(&out.path().join("a-L.wav")).is_some());
}

// ---------------------------------------------------------------------------
// Cancellation and concurrency
// ---------------------------------------------------------------------------

#[test]
fn cancel_after_first_item_stops_loop() {
    let (io, engine, out) = setup();
    for name in ["1.wav", "2.wav", "3.wav"] {
        io.insert(name, stereo(44100, 2));
    }
    let cancel = CancelToken::new();
    let mut rec = Recorder {
        cancel_after: Some((1, cancel.clone())),
        ..Recorder::default()
    };
    let summary = engine
        .run_blocking(
            RunRequest::new(
                Mode::SplitToMono,
                vec!["1.wav".into(), "2.wav".into(), "3.wav".into()],
                out.path(),
            ),
            &mut rec,
            &cancel,
        )
        .unwrap();

    assert_eq!(summary.state, RunState::Cancelled);
    assert_eq!(rec.progress(), vec![(100, 33)]);
    assert_eq!(rec.completed_count(), 0);
    assert_eq!(summary.items[0].state, ItemState::Done);
    assert_eq!(summary.items[1].state, ItemState::Pending);
    assert_eq!(summary.items[2].state, ItemState::Pending);
    assert_eq!(io.read_count(), 1);
}

#[test]
fn second_start_is_rejected_while_running() {
    let (io, entered, tx) = GatedIo::new();
    io.inner.insert("st.wav", stereo(44100, 2));
    let out = TempDir::new().unwrap();
    let engine = Engine::new(io);

    let request = RunRequest::new(Mode::SplitToMono, vec!["st.wav".into()], out.path());
    let (reporter, events) = ChannelReporter::channel();
    let handle = engine.start(request.clone(), reporter).unwrap();
    entered.recv().unwrap();
    assert!(engine.is_running());

    let second = engine.start(request.clone(), ChannelReporter::channel().0);
    assert!(matches!(second, Err(Error::AlreadyRunning)));

    tx.send(()).unwrap();
    let summary = handle.join().unwrap();
    assert!(summary.is_clean());
    assert!(!engine.is_running());
    assert!(events.try_iter().any(|e| e == JobEvent::Completed));

    // The engine accepts a new run once the first has ended.
    tx.send(()).unwrap();
    let again = engine.start(request, ChannelReporter::channel().0).unwrap();
    assert!(again.join().unwrap().is_clean());
}

#[test]
fn threaded_run_can_be_cancelled_before_start() {
    let (io, entered, tx) = GatedIo::new();
    for name in ["1.wav", "2.wav"] {
        io.inner.insert(name, stereo(44100, 2));
    }
    let out = TempDir::new().unwrap();
    let engine = Engine::new(io);

    let (reporter, events) = ChannelReporter::channel();
    let handle = engine
        .start(
            RunRequest::new(
                Mode::SplitToMono,
                vec!["1.wav".into(), "2.wav".into()],
                out.path(),
            ),
            reporter,
        )
        .unwrap();

    // Wait until the worker is inside the first read, cancel, then release it.
    entered.recv().unwrap();
    handle.cancel();
    tx.send(()).unwrap();
    let summary = handle.join().unwrap();

    assert_eq!(summary.state, RunState::Cancelled);
    assert_eq!(summary.done_count(), 1);
    let events: Vec<_> = events.try_iter().collect();
    assert!(!events.contains(&JobEvent::Completed));
}

#[test]
fn caller_token_cancelled_before_start_stops_run() {
    let (io, engine, out) = setup();
    io.insert("1.wav", stereo(44100, 2));
    let cancel = CancelToken::new();
    cancel.cancel();

    let (reporter, events) = ChannelReporter::channel();
    let handle = engine
        .start_with_cancel(
            RunRequest::new(Mode::SplitToMono, vec!["1.wav".into()], out.path()),
            reporter,
            cancel.clone(),
        )
        .unwrap();
    assert!(handle.cancel_token().is_cancelled());
    let summary = handle.join().unwrap();

    assert_eq!(summary.state, RunState::Cancelled);
    assert_eq!(summary.items[0].state, ItemState::Pending);
    assert_eq!(io.read_count(), 0);
    assert!(!events.try_iter().any(|e| e == JobEvent::Completed));
}
