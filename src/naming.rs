use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::FlipbookResult;

/// Prefix of generated export names (`Video0.mp4`, `Video1.mp4`, …).
pub const VIDEO_PREFIX: &str = "Video";

/// First unused `Video{n}.{ext}` among `existing`.
///
/// Probing starts at `n = existing.len()` and, on collision, tries `n + 1`, `n + 4`, `n + 9`, …
pub fn pick_name<S: AsRef<str>>(existing: &[S], ext: &str) -> String {
    let taken: HashSet<&str> = existing.iter().map(AsRef::as_ref).collect();
    let base = existing.len();
    (0usize..)
        .map(|k| format!("{VIDEO_PREFIX}{}.{ext}", base + k * k))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_else(|| format!("{VIDEO_PREFIX}{base}.{ext}"))
}

/// First unused export name inside `dir`; `Video0.{ext}` when `dir` does not exist yet.
pub fn next_available_name(dir: &Path, ext: &str) -> FlipbookResult<String> {
    if !dir.is_dir() {
        return Ok(format!("{VIDEO_PREFIX}0.{ext}"));
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("list export directory '{}'", dir.display()))?
    {
        let entry = entry.with_context(|| "read export directory entry")?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(pick_name(&names, ext))
}

#[cfg(test)]
#[path = "../tests/unit/naming.rs"]
mod tests;
