//! LRC format parser
//!
//! Parses timestamped lyric files:
//! [mm:ss.xx]Lyrics line here
//!
//! Example:
//! [00:12.34]Hello world
//! [00:15.000]Another line
//!
//! Only the first timestamp on a line is used and lines keep their file
//! order, even when the file itself is out of order.

use once_cell::sync::Lazy;
use regex::Regex;

/// `[mm:ss.xx]text` somewhere in the line. The seconds field is five
/// characters (`12.34`) or six (`12.345`).
static TIMED_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\d{2}):([\d.]{5,6})\](.+)").expect("static lyric pattern is valid")
});

/// Width of the extraneous tag some authoring tools put in front of a line.
const PREFIX_TAG_WIDTH: usize = 10;

/// A single line of lyrics with its start time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricEntry {
    /// Timestamp in milliseconds from the start of the track
    pub start_ms: u64,
    /// The lyric text, as written after the timestamp
    pub text: String,
}

impl LyricEntry {
    pub fn new(start_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            text: text.into(),
        }
    }
}

/// Parse the full text of a lyric file.
///
/// Lines that carry no timestamp are skipped silently; empty input yields an
/// empty sequence.
pub fn parse(raw: &str) -> Vec<LyricEntry> {
    raw.split('\n')
        .filter_map(|line| parse_line(strip_prefix_tag(line.trim())))
        .collect()
}

/// Drop a fixed-width `[xxxxxxxxx` prefix when a second tag opens at
/// column 10.
fn strip_prefix_tag(line: &str) -> &str {
    let mut chars = line.char_indices();
    let Some((_, '[')) = chars.next() else {
        return line;
    };
    match chars.nth(PREFIX_TAG_WIDTH - 1) {
        Some((idx, '[')) => &line[idx..],
        _ => line,
    }
}

fn parse_line(line: &str) -> Option<LyricEntry> {
    let caps = TIMED_LINE.captures(line)?;
    let minutes: u64 = caps.get(1)?.as_str().parse().ok()?;
    let seconds_ms = parse_seconds_ms(caps.get(2)?.as_str())?;
    let text = caps.get(3)?.as_str();
    Some(LyricEntry::new(minutes * 60_000 + seconds_ms, text))
}

/// Parse "ss.fff" into whole milliseconds, truncating anything below one
/// millisecond.
fn parse_seconds_ms(s: &str) -> Option<u64> {
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s, ""),
    };
    if frac.contains('.') || (whole.is_empty() && frac.is_empty()) {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut millis = 0u64;
    let mut scale = 100u64;
    for c in frac.chars() {
        let digit = u64::from(c.to_digit(10)?);
        millis += digit * scale;
        scale /= 10;
    }

    Some(whole * 1000 + millis)
}
