//! Lexical path helpers.
//!
//! Chart directories are used as cache keys, so every path that can end up as
//! a key is normalized the same way: `.` components are dropped and `..`
//! components cancel the preceding normal component. No filesystem access is
//! performed, which keeps keys stable for directories that do not exist yet.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path lexically, without touching the filesystem.
///
/// - `a/./b` becomes `a/b`
/// - `a/b/../c` becomes `a/c`
/// - leading `..` components of relative paths are preserved
/// - `..` directly below the root is dropped (`/..` is `/`)
/// - an empty result becomes `.`
///
/// # Examples
///
/// ```rust
/// use helmdoc::utils::normalize_path;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(normalize_path(Path::new("app/./charts/../common")), PathBuf::from("app/common"));
/// assert_eq!(normalize_path(Path::new("../shared")), PathBuf::from("../shared"));
/// ```
#[must_use]
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            c => components.push(c),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }

    components.iter().collect()
}

/// Joins `relative` onto `base` and normalizes the result.
#[must_use]
pub fn join_normalized(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
    normalize_path(&base.join(relative))
}
