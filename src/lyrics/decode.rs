//! Text decoding for lyric files.
//!
//! Lyric files in the wild are often in a legacy East-Asian encoding, so the
//! encoding is configured by WHATWG label ("utf-8", "gbk", "big5", ...).

use anyhow::Context;
use encoding_rs::Encoding;

/// Resolve a configured encoding label.
pub fn encoding_for_label(label: &str) -> anyhow::Result<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .with_context(|| format!("unknown lyric encoding {label:?}"))
}

/// Decode raw file bytes. A UTF-8 or UTF-16 byte order mark, found with
/// `Encoding::for_bom`, overrides the configured encoding and is stripped.
/// Malformed sequences become U+FFFD instead of failing.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((encoding, 0));
    let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
    text.into_owned()
}
