//! Output renderers for parsed captions

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::webvtt::{parse_cues, HEADER};

/// Download formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text transcript
    #[default]
    Txt,
    /// SubRip
    Srt,
    /// WebVTT, as delivered
    Vtt,
}

impl OutputFormat {
    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Srt => "srt",
            OutputFormat::Vtt => "vtt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "text/plain",
            OutputFormat::Srt => "text/srt",
            OutputFormat::Vtt => "text/vtt",
        }
    }

    /// Render WebVTT markup in this format
    pub fn render(&self, vtt: &str) -> String {
        match self {
            OutputFormat::Txt => to_plain_text(vtt),
            OutputFormat::Srt => to_srt(vtt),
            OutputFormat::Vtt => to_clean_vtt(vtt),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "txt" => Ok(OutputFormat::Txt),
            "srt" => Ok(OutputFormat::Srt),
            "vtt" => Ok(OutputFormat::Vtt),
            other => Err(format!(
                "Invalid format '{}', expected one of: txt, srt, vtt",
                other
            )),
        }
    }
}

/// All caption text, one space between lines, no timing.
pub fn to_plain_text(vtt: &str) -> String {
    let cues = parse_cues(vtt);
    let lines: Vec<&str> = cues
        .iter()
        .flat_map(|cue| cue.lines.iter().map(String::as_str))
        .collect();
    lines.join(" ")
}

/// SubRip: numbered cues, comma as the sub-second separator.
///
/// Only the `.` characters of the timing line are touched; digits pass
/// through as they are.
pub fn to_srt(vtt: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    for (i, cue) in parse_cues(vtt).into_iter().enumerate() {
        out.push((i + 1).to_string());
        out.push(cue.timing.replace('.', ","));
        out.extend(cue.lines);
        out.push(String::new());
    }
    out.join("\n")
}

/// The markup as delivered, with a header prepended if it lacks one.
pub fn to_clean_vtt(vtt: &str) -> String {
    if vtt.starts_with(HEADER) {
        vtt.to_string()
    } else {
        format!("{}\n\n{}", HEADER, vtt)
    }
}
