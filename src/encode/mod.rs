//! Encoding sinks and the export pipeline.
//!
//! Sinks consume frames in temporal order; [`export::export`] picks one from the destination
//! and feeds it a normalized snapshot.

pub(crate) mod export;
pub(crate) mod ffmpeg;
pub(crate) mod gif;
pub(crate) mod sink;
