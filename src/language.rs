//! Caption language selection

use serde::Serialize;

use crate::error::{Result, TranscriptError};
use crate::source::CaptionTrack;

/// Language used when the requested one is not offered
pub const FALLBACK_LANGUAGE: &str = "en";

/// One entry of the `/languages` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub language: String,
    pub is_generated: bool,
}

/// Flatten tracks into the offered language codes.
///
/// Manual tracks come first; auto-generated codes not already present are
/// appended in discovery order.
pub fn available_languages(tracks: &[CaptionTrack]) -> Vec<String> {
    let mut languages: Vec<String> = Vec::with_capacity(tracks.len());
    for track in ordered(tracks) {
        if !languages.contains(&track.language) {
            languages.push(track.language.clone());
        }
    }
    languages
}

/// One entry per language code. A code is reported as generated only when
/// no manual track exists for it.
pub fn language_infos(tracks: &[CaptionTrack]) -> Vec<LanguageInfo> {
    let mut infos: Vec<LanguageInfo> = Vec::with_capacity(tracks.len());
    for track in ordered(tracks) {
        if !infos.iter().any(|i| i.code == track.language) {
            infos.push(LanguageInfo {
                code: track.language.clone(),
                language: track.language.clone(),
                is_generated: track.is_generated(),
            });
        }
    }
    infos
}

// manual tracks first, keeping relative order within each origin.
fn ordered(tracks: &[CaptionTrack]) -> impl Iterator<Item = &CaptionTrack> {
    let manual = tracks.iter().filter(|t| !t.is_generated());
    let generated = tracks.iter().filter(|t| t.is_generated());
    manual.chain(generated)
}

/// Pick the language to fetch.
///
/// The requested language if offered, else English if offered, else the
/// first offered language.
pub fn select_language(requested: &str, offered: &[String]) -> Result<String> {
    if offered.iter().any(|l| l == requested) {
        return Ok(requested.to_string());
    }
    if offered.iter().any(|l| l == FALLBACK_LANGUAGE) {
        return Ok(FALLBACK_LANGUAGE.to_string());
    }
    offered
        .first()
        .cloned()
        .ok_or(TranscriptError::NoLanguagesOffered)
}
