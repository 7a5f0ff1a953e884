use crate::foundation::error::OverwriteResult;
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> OverwriteResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Drop whatever extension `path` carries and append `ext` (given without the dot).
pub fn replace_extension(path: &Path, ext: &str) -> PathBuf {
    path.with_extension(ext)
}

/// Lowercased extension of `path`, without the dot.
pub(crate) fn lowercase_extension(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/paths.rs"]
mod tests;
