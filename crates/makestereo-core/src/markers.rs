//! Channel markers in file names.
//!
//! Mono halves of a stereo recording are usually named after a shared stem
//! plus a channel marker: `voice-L.wav`, `voice_R.wav`, `Drums Left.wav`.
//! [`normalized_key`] removes those markers so the halves of one recording
//! compare equal.

use std::path::Path;

/// Suffix appended to merged output names.
pub const STEREO_SUFFIX: &str = "_Stereo";

/// Marker tokens and their replacements, applied in this order.
///
/// Space-delimited markers collapse to a single space.
const MARKERS: [(&str, &str); 10] = [
    ("-L", ""),
    ("_L", ""),
    (" L ", " "),
    ("-R", ""),
    ("_R", ""),
    (" R ", " "),
    ("Left", ""),
    ("Right", ""),
    ("left", ""),
    ("right", ""),
];

/// Left-channel markers removed from merged output names.
const LEFT_MARKERS: [(&str, &str); 5] = [
    ("-L", ""),
    ("_L", ""),
    (" L ", " "),
    ("Left", ""),
    ("left", ""),
];

/// File name without directory or extension.
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Strip the first occurrence of each channel marker from `name`.
///
/// Matching is case-sensitive and markers are removed in a fixed order, so
/// the result is a pure function of the input.
///
/// ```
/// use makestereo_core::markers::normalized_key;
///
/// assert_eq!(normalized_key("voice-L"), "voice");
/// assert_eq!(normalized_key("voice_R"), "voice");
/// assert_eq!(normalized_key("Drums Left"), "Drums ");
/// assert_eq!(normalized_key("take L 2"), "take 2");
/// ```
pub fn normalized_key(name: &str) -> String {
    strip_first(name, &MARKERS)
}

/// Stem for the stereo file merged from a left channel named `left_name`.
///
/// Only left-channel markers are removed, first occurrence each, so text
/// such as `_Room` or `-Reverb` survives.
///
/// ```
/// use makestereo_core::markers::output_stem;
///
/// assert_eq!(output_stem("Drum_Room-L"), "Drum_Room");
/// assert_eq!(output_stem("Vox-Reverb Left"), "Vox-Reverb ");
/// ```
pub fn output_stem(left_name: &str) -> String {
    strip_first(left_name, &LEFT_MARKERS)
}

fn strip_first(name: &str, markers: &[(&str, &str)]) -> String {
    let mut out = name.to_string();
    for &(marker, replacement) in markers {
        if let Some(pos) = out.find(marker) {
            out.replace_range(pos..pos + marker.len(), replacement);
        }
    }
    out
}

/// Whether the name contains the letter `L`, ignoring case.
///
/// This is a bare-letter test on the untouched name, not a marker match.
pub fn has_left_hint(name: &str) -> bool {
    name.chars().any(|c| c.eq_ignore_ascii_case(&'l'))
}

/// Whether the name contains the letter `R`, ignoring case.
pub fn has_right_hint(name: &str) -> bool {
    name.chars().any(|c| c.eq_ignore_ascii_case(&'r'))
}

/// Which channel a file represents within its pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left channel.
    Left,
    /// Right channel.
    Right,
}

/// Decide which of two names is the left channel.
///
/// Returns `Some(true)` if `a` is left and `b` is right, `Some(false)` for
/// the reverse, and `None` when neither or both readings fit.
pub fn orient(a: &str, b: &str) -> Option<bool> {
    let forward = has_left_hint(a) && has_right_hint(b);
    let reverse = has_left_hint(b) && has_right_hint(a);
    match (forward, reverse) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}
