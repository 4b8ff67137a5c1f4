//! WebVTT cue parser
//!
//! A single forward pass over the lines of a caption file:
//!
//! ```text
//! WEBVTT                              <- header, skipped
//! Kind: captions                      <- metadata, skipped
//! Language: en                        <- metadata, skipped
//!
//! 00:00:00.000 --> 00:00:02.000       <- timing line, starts a cue
//! Hello <c>there</c>                  <- text lines until a blank line
//! &amp; welcome
//!
//! ```

/// Marker separating start and end timestamps on a timing line
pub const TIMING_ARROW: &str = "-->";

/// Header token every WebVTT file starts with
pub const HEADER: &str = "WEBVTT";

/// Line prefixes skipped outside of cues
const SKIPPED_PREFIXES: &[&str] = &[HEADER, "Kind:", "Language:"];

/// A single caption cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// The timing line, verbatim (e.g. `00:00:01.500 --> 00:00:03.000`)
    pub timing: String,
    /// Cleaned, non-empty text lines in document order
    pub lines: Vec<String>,
}

impl Cue {
    fn new(timing: &str) -> Self {
        Self {
            timing: timing.to_string(),
            lines: Vec::new(),
        }
    }
}

/// Parser state between two lines
#[derive(Debug)]
enum State {
    /// Between cues
    Outside,
    /// Collecting the text lines of a cue
    InCue(Cue),
}

/// Collects finished cues, dropping those without text
#[derive(Debug, Default)]
struct Cues(Vec<Cue>);

impl Cues {
    fn finish(&mut self, cue: Cue) {
        if !cue.lines.is_empty() {
            self.0.push(cue);
        }
    }
}

/// Parse WebVTT markup into cues.
///
/// Malformed input never fails: lines that are neither metadata nor part of
/// a cue are ignored.
pub fn parse_cues(content: &str) -> Vec<Cue> {
    let mut cues = Cues::default();
    let mut state = State::Outside;

    for raw in content.split('\n') {
        let line = raw.trim();

        state = match state {
            State::Outside => {
                if SKIPPED_PREFIXES.iter().any(|p| line.starts_with(p)) {
                    State::Outside
                } else if line.contains(TIMING_ARROW) {
                    State::InCue(Cue::new(line))
                } else {
                    State::Outside
                }
            }
            State::InCue(mut cue) => {
                if line.is_empty() {
                    cues.finish(cue);
                    State::Outside
                } else if line.contains(TIMING_ARROW) {
                    cues.finish(cue);
                    State::InCue(Cue::new(line))
                } else {
                    let text = clean_text(line);
                    if !text.is_empty() {
                        cue.lines.push(text);
                    }
                    State::InCue(cue)
                }
            }
        };
    }

    if let State::InCue(cue) = state {
        cues.finish(cue);
    }

    cues.0
}

/// Strip markup tags, then unescape `&amp;`, `&lt;` and `&gt;` in that order.
pub fn clean_text(line: &str) -> String {
    let stripped = regex!(r"<[^>]+>").replace_all(line, "");
    stripped
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}
