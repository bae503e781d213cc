use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::trace;

use crate::errors::RenameError;


/// Upper bound on suffixed probes before collision resolution gives up.
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

static DISALLOWED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("static regex"));

/// A filename containing only `[a-z0-9._-]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedName(String);

impl SanitizedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SanitizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for SanitizedName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A sanitized name that was free in the target directory when it was checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName(String);

impl ResolvedName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ResolvedName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Collapses each run of characters outside `[A-Za-z0-9._-]` into a single
/// `-` and lowercases the result.
///
/// Leading/trailing dashes and empty results are left alone.
pub fn sanitize(raw: &str) -> SanitizedName {
    let replaced = DISALLOWED_RUN.replace_all(raw, "-");
    SanitizedName(replaced.to_ascii_lowercase())
}

/// Splits at the last `.`; the extension keeps its dot.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Returns `candidate` if `exists` reports it free, otherwise the first free
/// `{stem}-{n}{ext}` for n = 1, 2, ...
///
/// The predicate is responsible for anchoring names to a directory.
pub fn resolve_collision<F>(candidate: &SanitizedName, exists: F) -> Result<ResolvedName, RenameError>
where
    F: Fn(&str) -> bool,
{
    let name = candidate.as_str();
    if !exists(name) {
        return Ok(ResolvedName(name.to_string()));
    }

    let (stem, ext) = split_extension(name);
    for counter in 1..=MAX_COLLISION_ATTEMPTS {
        let probe = format!("{stem}-{counter}{ext}");
        trace!(%probe, "probing collision candidate");
        if !exists(&probe) {
            return Ok(ResolvedName(probe));
        }
    }

    Err(RenameError::CollisionLimit {
        candidate: name.to_string(),
        attempts: MAX_COLLISION_ATTEMPTS,
    })
}
