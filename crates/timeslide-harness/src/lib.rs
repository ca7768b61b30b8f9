#![forbid(unsafe_code)]

//! Test harness for timeslide.
//!
//! - [`recording::RecordingHost`]: a [`MapHost`]/[`PopupHost`] that records
//!   every call and tracks what is shown, bound, and open.
//! - [`fixtures`]: ready-made item sources.
//! - [`transcript`]: JSONL rendering and BLAKE3 checksums of recorded
//!   calls, for pinning a control's exact host interaction.
//!
//! [`MapHost`]: timeslide_widgets::host::MapHost
//! [`PopupHost`]: timeslide_widgets::host::PopupHost

pub mod fixtures;
pub mod recording;
pub mod transcript;

pub use recording::{HostCall, RecordingHost};
