//! Dropped-file import.
//!
//! Terminals deliver a drag-and-drop as pasted text: plain paths one per
//! line, shell-quoted or backslash-escaped paths separated by spaces, or
//! `file://` URLs.

use crate::track::is_supported_audio;
use std::path::{Path, PathBuf};

/// Extract the audio paths from pasted text, in paste order.
pub fn parse_dropped(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .flat_map(split_line)
        .filter_map(|candidate| to_local_path(&candidate))
        .filter(|path| is_supported_audio(&path.to_string_lossy()))
        .collect()
}

fn split_line(line: &str) -> Vec<String> {
    if line.contains(['\'', '"', '\\']) {
        return shell_split(line);
    }
    if !line.contains(char::is_whitespace) || Path::new(line).is_file() {
        return vec![line.to_string()];
    }
    split_at_path_starts(line)
}

/// Split an unquoted line before every word that starts a new absolute path
/// or `file://` URL, so spaces inside a single file name survive.
fn split_at_path_starts(line: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in line.char_indices() {
        if i < start || !c.is_whitespace() {
            continue;
        }
        let rest = line[i..].trim_start();
        if rest.starts_with('/') || rest.starts_with("file://") {
            let part = line[start..i].trim();
            if !part.is_empty() {
                parts.push(part.to_string());
            }
            start = line.len() - rest.len();
        }
    }
    let tail = line[start..].trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Minimal shell word splitting: whitespace separates words, quotes group,
/// backslash escapes the next character outside single quotes.
fn shell_split(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') | (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

fn to_local_path(candidate: &str) -> Option<PathBuf> {
    match candidate.strip_prefix("file://") {
        Some(rest) => {
            // file://host/path: keep only the path part
            let path = match rest.find('/') {
                Some(idx) => &rest[idx..],
                None => return None,
            };
            let decoded = urlencoding::decode(path).ok()?;
            Some(PathBuf::from(decoded.into_owned()))
        }
        None => Some(PathBuf::from(candidate)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_paths_one_per_line() {
        let text = "/music/A - B.mp3\n/music/cover.jpg\n/music/c.ogg\n";
        assert_eq!(
            parse_dropped(text),
            vec![PathBuf::from("/music/A - B.mp3"), PathBuf::from("/music/c.ogg")]
        );
    }

    #[test]
    fn test_quoted_paths_on_one_line() {
        let text = "'/music/My Song.mp3' '/music/Other Song.wma' ";
        assert_eq!(
            parse_dropped(text),
            vec![
                PathBuf::from("/music/My Song.mp3"),
                PathBuf::from("/music/Other Song.wma")
            ]
        );
    }

    #[test]
    fn test_backslash_escaped_paths() {
        let text = r"/music/My\ Song.mp3 /music/x.ogg";
        assert_eq!(
            parse_dropped(text),
            vec![PathBuf::from("/music/My Song.mp3"), PathBuf::from("/music/x.ogg")]
        );
    }

    #[test]
    fn test_file_urls_are_decoded() {
        let text = "file:///music/My%20Song.mp3\nfile://host/music/b.ogg";
        assert_eq!(
            parse_dropped(text),
            vec![PathBuf::from("/music/My Song.mp3"), PathBuf::from("/music/b.ogg")]
        );
    }

    #[test]
    fn test_unquoted_paths_on_one_line_are_split() {
        assert_eq!(
            parse_dropped("/m/a.mp3 /m/b.ogg"),
            vec![PathBuf::from("/m/a.mp3"), PathBuf::from("/m/b.ogg")]
        );
        assert_eq!(
            parse_dropped("/m/Faye Wong - Red Bean.mp3  file:///m/x%20y.wma /m/notes.txt"),
            vec![
                PathBuf::from("/m/Faye Wong - Red Bean.mp3"),
                PathBuf::from("/m/x y.wma")
            ]
        );
    }

    #[test]
    fn test_existing_file_with_spaces_kept_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.mp3 b.mp3");
        std::fs::write(&path, b"").unwrap();

        let line = path.to_string_lossy().into_owned();
        assert_eq!(split_line(&line), vec![line.clone()]);
        assert_eq!(parse_dropped(&line), vec![path]);
    }

    #[test]
    fn test_suffix_match_is_case_sensitive() {
        assert!(parse_dropped("/music/LOUD.MP3").is_empty());
        assert!(parse_dropped("").is_empty());
    }
}
