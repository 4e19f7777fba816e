//! Collision-free output paths.

use crate::markers::STEREO_SUFFIX;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Hands out output paths that neither exist on disk nor were handed out
/// earlier by the same allocator.
///
/// One allocator lives for exactly one run. Paths are claimed at
/// allocation time, so a path that has been allocated but not yet written
/// is never returned twice.
#[derive(Debug, Default)]
pub struct PathAllocator {
    claimed: HashSet<PathBuf>,
}

impl PathAllocator {
    /// Create an allocator with nothing claimed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate `directory/base_name.extension`, or the first free
    /// `directory/base_name.NN.extension` with NN = 01, 02, ...
    ///
    /// With `stereo_suffix` set, `_Stereo` is appended to `base_name`
    /// unless it already ends with it. `extension` has no leading dot; an
    /// empty extension produces a bare name.
    ///
    /// ```
    /// use makestereo_core::PathAllocator;
    /// use std::path::Path;
    ///
    /// let dir = Path::new("/nonexistent/out");
    /// let mut alloc = PathAllocator::new();
    /// assert_eq!(alloc.allocate(dir, "voice", "wav", true), dir.join("voice_Stereo.wav"));
    /// assert_eq!(alloc.allocate(dir, "voice", "wav", true), dir.join("voice_Stereo.01.wav"));
    /// ```
    pub fn allocate(
        &mut self,
        directory: &Path,
        base_name: &str,
        extension: &str,
        stereo_suffix: bool,
    ) -> PathBuf {
        let name = if stereo_suffix && !base_name.ends_with(STEREO_SUFFIX) {
            format!("{base_name}{STEREO_SUFFIX}")
        } else {
            base_name.to_string()
        };

        let mut counter = 0u32;
        loop {
            let stem = if counter == 0 {
                name.clone()
            } else {
                format!("{name}.{counter:02}")
            };
            let candidate = directory.join(with_extension(&stem, extension));
            if !self.is_taken(&candidate) {
                tracing::debug!(path = %candidate.display(), "allocated output path");
                self.claimed.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }

    /// Number of paths handed out so far.
    pub fn claimed(&self) -> usize {
        self.claimed.len()
    }

    fn is_taken(&self, candidate: &Path) -> bool {
        self.claimed.contains(candidate) || candidate.symlink_metadata().is_ok()
    }
}

fn with_extension(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{stem}.{extension}")
    }
}
