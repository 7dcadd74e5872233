//! Platform-independent path keys for persisted indexes.

use std::path::Path;

/// Renders `path` with `/` separators so persisted keys match across platforms.
pub fn system_independent(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_slashes_unchanged() {
        assert_eq!(system_independent(Path::new("/src/x/a.p")), "/src/x/a.p");
    }

    #[test]
    fn backslashes_normalized() {
        assert_eq!(
            system_independent(Path::new(r"C:\src\x\a.p")),
            "C:/src/x/a.p"
        );
    }
}
