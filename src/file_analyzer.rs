use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::mime_gate::{is_allowed, is_textual};


/// How many leading bytes are inspected for type detection.
const SNIFF_LEN: u64 = 8192;

const TEXT_FALLBACK: &str = "text/plain; charset=utf-8";
const BINARY_FALLBACK: &str = "application/octet-stream";

/// OS operations the rename pipeline depends on.
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;
    fn detect_mime_type(&self, path: &Path) -> io::Result<String>;
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    /// Anything other than "not found" counts as present, including dangling
    /// symlinks and entries we may not stat.
    fn exists(&self, path: &Path) -> bool {
        match fs::symlink_metadata(path) {
            Ok(_) => true,
            Err(e) => e.kind() != io::ErrorKind::NotFound,
        }
    }

    fn detect_mime_type(&self, path: &Path) -> io::Result<String> {
        let mut header = Vec::with_capacity(SNIFF_LEN as usize);
        File::open(path)?.take(SNIFF_LEN).read_to_end(&mut header)?;
        Ok(classify(path, &header))
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// `infer` names that differ from the allow-listed spelling of the same format.
const SNIFFED_ALIASES: &[(&str, &str)] = &[("audio/x-flac", "audio/flac")];

/// Magic numbers win when they match. Without a signature, the extension is
/// trusted only when it maps to a supported type; otherwise the content decides
/// between plain text and opaque binary.
pub fn classify(path: &Path, header: &[u8]) -> String {
    if let Some(kind) = infer::get(header) {
        return canonical_name(kind.mime_type()).to_string();
    }

    let is_text = looks_like_text(header);
    let fallback = if is_text { TEXT_FALLBACK } else { BINARY_FALLBACK };
    allowed_guess(path, is_text).unwrap_or_else(|| fallback.to_string())
}

fn canonical_name(sniffed: &'static str) -> &'static str {
    SNIFFED_ALIASES
        .iter()
        .find(|(alias, _)| *alias == sniffed)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(sniffed)
}

/// The guess must agree with the content: text only takes textual types, binary
/// only non-textual ones.
fn allowed_guess(path: &Path, is_text: bool) -> Option<String> {
    mime_guess::from_path(path)
        .iter()
        .map(|guess| guess.essence_str().to_string())
        .find(|essence| is_allowed(essence).is_ok() && is_textual(essence) == is_text)
}

/// UTF-8 without NUL bytes; a multi-byte sequence cut off by the sniff window
/// still counts as text.
fn looks_like_text(header: &[u8]) -> bool {
    if header.contains(&0) {
        return false;
    }
    match std::str::from_utf8(header) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    }
}
