//! Path utilities

use std::path::Path;

/// Normalize path separators to forward slashes (as stored in SC2 documents)
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize separators and resolve `.`, `..` and repeated `/` lexically
///
/// A `..` with nothing left to pop is kept. A leading `/` is preserved.
pub fn normalize_components(path: &str) -> String {
    let path = normalize_separators(path);
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." if parts.last().is_some_and(|p| *p != "..") => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    if path.starts_with('/') {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Get relative path and normalize separators
pub fn relative_path<P: AsRef<Path>, B: AsRef<Path>>(path: P, base: B) -> Option<String> {
    path.as_ref()
        .strip_prefix(base.as_ref())
        .ok()
        .map(|rel| normalize_separators(&rel.to_string_lossy()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators(r"Mods\Sub\MyMod.SC2Mod"), "Mods/Sub/MyMod.SC2Mod");
        assert_eq!(normalize_separators("Mods/MyMod.SC2Mod"), "Mods/MyMod.SC2Mod");
    }

    #[test]
    fn test_normalize_components() {
        assert_eq!(normalize_components("./Mods/MyMod.SC2Mod"), "Mods/MyMod.SC2Mod");
        assert_eq!(normalize_components(r"Mods\Sub\..\MyMod.SC2Mod"), "Mods/MyMod.SC2Mod");
        assert_eq!(normalize_components("Mods//./MyMod.SC2Mod/"), "Mods/MyMod.SC2Mod");
        assert_eq!(normalize_components("../Mods/../../A.SC2Mod"), "../../A.SC2Mod");
        assert_eq!(normalize_components("/games//sc2/./Mods"), "/games/sc2/Mods");
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path("/games/sc2/Mods/MyMod.SC2Mod", "/games/sc2"),
            Some("Mods/MyMod.SC2Mod".to_string())
        );
        assert_eq!(relative_path("/elsewhere/MyMod.SC2Mod", "/games/sc2"), None);
    }
}
