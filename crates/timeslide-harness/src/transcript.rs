#![forbid(unsafe_code)]

//! Host-call transcripts.
//!
//! A transcript is the JSONL rendering of a [`RecordingHost`]'s call log,
//! one [`HostCall::to_json`] object per line. Its BLAKE3 checksum pins the
//! exact sequence of host interactions, so two runs of the same scenario
//! can be compared without storing the whole log:
//!
//! ```json
//! {"call":"place_control","placement":"TopRight"}
//! {"call":"subscribe","event":"PointerUp"}
//! {"call":"add","item":0}
//! ```
//!
//! [`RecordingHost`]: crate::recording::RecordingHost

use crate::recording::HostCall;

/// Checksum prefix, so logs say which hash produced the value.
const CHECKSUM_PREFIX: &str = "blake3:";

/// JSONL rendering of `calls`, newline-terminated.
pub fn to_jsonl(calls: &[HostCall]) -> String {
    let mut out = String::new();
    for call in calls {
        out.push_str(&call.to_json().to_string());
        out.push('\n');
    }
    out
}

/// BLAKE3 checksum of the JSONL rendering of `calls`.
pub fn checksum(calls: &[HostCall]) -> String {
    let hash = blake3::hash(to_jsonl(calls).as_bytes());
    format!("{CHECKSUM_PREFIX}{}", hash.to_hex())
}

/// Result of comparing two transcripts.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptDiff {
    Identical,
    /// First index where the transcripts differ, with each side's call
    /// (`None` past the end of the shorter one).
    Diverged {
        at: usize,
        expected: Option<HostCall>,
        actual: Option<HostCall>,
    },
}

impl TranscriptDiff {
    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }
}

/// Compare two call logs, reporting the first divergence.
pub fn compare(expected: &[HostCall], actual: &[HostCall]) -> TranscriptDiff {
    if checksum(expected) == checksum(actual) {
        return TranscriptDiff::Identical;
    }
    let at = expected
        .iter()
        .zip(actual)
        .position(|(e, a)| e != a)
        .unwrap_or_else(|| expected.len().min(actual.len()));
    TranscriptDiff::Diverged {
        at,
        expected: expected.get(at).cloned(),
        actual: actual.get(at).cloned(),
    }
}
