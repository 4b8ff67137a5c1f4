//! Subtitle conversion module
//!
//! This module turns WebVTT caption files into the formats we serve:
//! - Cue parsing with tag stripping and HTML entity unescaping
//! - Plain text transcripts
//! - SRT conversion
//! - Cleaned WebVTT pass-through

pub mod render;
pub mod webvtt;

pub use render::{to_plain_text, OutputFormat};
