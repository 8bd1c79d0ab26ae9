//! Bundle locators
//!
//! A bundle (`.SC2Mod`, `.SC2Map`, `.SC2Campaign`) is named either by a bare
//! path or by a `file:<path>` locator as used in SC2 dependency strings.
//! Resolution is purely local: the path must exist on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::utils::path::{normalize_separators, relative_path};

/// Locator prefix for local bundles
pub const FILE_SCHEME: &str = "file:";

/// A resolved bundle
///
/// Two references are equal when they resolve to the same canonical path,
/// whichever locator form produced them.
#[derive(Debug, Clone)]
pub struct BundleReference {
    /// The locator as given
    pub locator: String,
    /// Canonical absolute path
    pub path: PathBuf,
    /// Path relative to the base directory (forward slashes), or the
    /// normalized path as given when the bundle lives outside it
    pub relative: String,
    /// Last path component with the extension stripped
    pub name: String,
}

impl BundleReference {
    /// Dependency identifier written into the document records
    #[must_use]
    pub fn dependency_id(&self) -> String {
        format!("{FILE_SCHEME}{}", self.relative)
    }
}

impl PartialEq for BundleReference {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for BundleReference {}

impl fmt::Display for BundleReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Resolve a bundle locator
///
/// Accepts `file:<path>` or a bare path. Backslash separators are
/// normalized, relative paths resolve against `base_dir`.
///
/// # Errors
///
/// Returns [`Error::UnresolvableBundle`] when the locator is empty, uses a
/// scheme other than `file:`, or names a path that does not exist.
pub fn locate_bundle(locator: &str, base_dir: &Path) -> Result<BundleReference> {
    let unresolvable = |reason: String| Error::UnresolvableBundle {
        locator: locator.to_string(),
        reason,
    };

    let raw = strip_scheme(locator).map_err(unresolvable)?;
    let normalized = normalize_separators(raw.trim());
    if normalized.is_empty() {
        return Err(unresolvable("empty path".to_string()));
    }

    let candidate = Path::new(&normalized);
    let joined = if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base_dir.join(candidate)
    };

    let path = std::fs::canonicalize(&joined)
        .map_err(|e| unresolvable(format!("{}: {e}", joined.display())))?;

    let relative = std::fs::canonicalize(base_dir)
        .ok()
        .and_then(|base| relative_path(&path, &base))
        .unwrap_or_else(|| normalized.trim_start_matches("./").to_string());
    if relative.is_empty() {
        return Err(unresolvable("bundle is the base directory".to_string()));
    }

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| unresolvable("path has no file name".to_string()))?;

    tracing::debug!("Resolved bundle {} -> {}", locator, path.display());

    Ok(BundleReference {
        locator: locator.to_string(),
        path,
        relative,
        name,
    })
}

/// Split off the `file:` scheme, rejecting any other scheme
///
/// A single letter before the colon is a Windows drive, not a scheme.
fn strip_scheme(locator: &str) -> std::result::Result<&str, String> {
    if let Some(rest) = locator.strip_prefix(FILE_SCHEME) {
        return Ok(rest);
    }

    if let Some((scheme, _)) = locator.split_once(':') {
        let is_drive = scheme.len() == 1 && scheme.chars().all(|c| c.is_ascii_alphabetic());
        let looks_like_scheme = !scheme.contains(['/', '\\']);
        if !is_drive && looks_like_scheme {
            return Err(format!("unsupported locator scheme '{scheme}:' (expected '{FILE_SCHEME}')"));
        }
    }

    Ok(locator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sc2_root() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("Mods").join("MyMod.SC2Mod")).unwrap();
        temp
    }

    #[test]
    fn test_file_locator_matches_bare_path() {
        let root = sc2_root();

        let from_locator = locate_bundle(r"file:Mods\MyMod.SC2Mod", root.path()).unwrap();
        let from_bare = locate_bundle("Mods/MyMod.SC2Mod", root.path()).unwrap();

        assert_eq!(from_locator, from_bare);
        assert_eq!(from_locator.relative, from_bare.relative);
        assert_eq!(from_locator.name, "MyMod");
        assert_eq!(from_locator.dependency_id(), "file:Mods/MyMod.SC2Mod");
    }

    #[test]
    fn test_absolute_path_under_base() {
        let root = sc2_root();
        let absolute = root.path().join("Mods").join("MyMod.SC2Mod");

        let bundle = locate_bundle(&absolute.to_string_lossy(), root.path()).unwrap();
        assert_eq!(bundle.relative, "Mods/MyMod.SC2Mod");
    }

    #[test]
    fn test_missing_bundle() {
        let root = sc2_root();
        let err = locate_bundle("file:Mods/Nope.SC2Mod", root.path()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableBundle { .. }));
    }

    #[test]
    fn test_unsupported_scheme() {
        let root = sc2_root();
        let err = locate_bundle("bnet:Liberty (Mod)/0.0/999", root.path()).unwrap_err();
        assert!(matches!(err, Error::UnresolvableBundle { ref reason, .. } if reason.contains("bnet")));
    }

    #[test]
    fn test_empty_locator() {
        let root = sc2_root();
        assert!(locate_bundle("file:", root.path()).is_err());
        assert!(locate_bundle("   ", root.path()).is_err());
    }

    #[test]
    fn test_base_directory_is_not_a_bundle() {
        let root = sc2_root();
        for locator in [".", "file:.", "file:Mods/..", "./"] {
            let err = locate_bundle(locator, root.path()).unwrap_err();
            assert!(
                matches!(err, Error::UnresolvableBundle { ref reason, .. } if reason.contains("base directory")),
                "{locator}: {err:?}"
            );
        }
    }

    #[test]
    fn test_drive_letter_is_not_a_scheme() {
        assert_eq!(strip_scheme(r"C:\Games\Mods\A.SC2Mod"), Ok(r"C:\Games\Mods\A.SC2Mod"));
    }
}
