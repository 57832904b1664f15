//! Cache keys and their mapping onto the filesystem
//!
//! A key is an ordered list of components. Every component but the last is a
//! directory, the last one is the entry file, so a key that is stored as a
//! file cannot have subkeys.
//!
//! Components are rendered with [`Display`] and filtered so they are legal on
//! Windows, which has the most restrictive filesystem: the characters
//! `\ / : * ? " < > |` become `_`. Directory components starting with a `.`
//! get that dot replaced by `_` as well, since regular Windows tools cannot
//! deal with such directories. The mapping is not reversible, and distinct
//! keys that only differ in filtered characters share an entry.

use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// Character substituted for anything that cannot appear in a path segment
pub const SUBSTITUTE: char = '_';

/// Characters that are invalid in Windows paths, a superset of every other
/// platform's restrictions.
const BAD_PATH_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// An ordered sequence of key components
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey {
    parts: Vec<String>,
}

impl CacheKey {
    /// Build a key from anything that renders to a string
    pub fn new<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Display,
    {
        Self {
            parts: parts.into_iter().map(|part| part.to_string()).collect(),
        }
    }

    /// The rendered components, unfiltered
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The component naming the entry file
    pub fn leaf(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// Append a component
    pub fn push(&mut self, part: impl Display) {
        self.parts.push(part.to_string());
    }

    /// This key with `part` appended
    #[must_use]
    pub fn child(&self, part: impl Display) -> Self {
        let mut key = self.clone();
        key.push(part);
        key
    }

    /// This key nested under `prefix`
    #[must_use]
    pub fn prefixed(&self, prefix: impl Display) -> Self {
        let mut parts = Vec::with_capacity(self.parts.len() + 1);
        parts.push(prefix.to_string());
        parts.extend(self.parts.iter().cloned());
        Self { parts }
    }

    /// The filtered path of this key relative to a cache root
    pub fn relative_path(&self, dot_safe_dirs: bool) -> PathBuf {
        let last = self.parts.len().saturating_sub(1);
        self.parts
            .iter()
            .enumerate()
            .map(|(i, part)| segment(part, i < last && dot_safe_dirs))
            .collect()
    }

    /// Resolve this key under `root`
    pub fn resolve(&self, root: &Path, dot_safe_dirs: bool) -> PathBuf {
        root.join(self.relative_path(dot_safe_dirs))
    }

    /// Whether the first component of this key lands in the top-level
    /// directory named by `name` once both are filtered
    pub fn is_under(&self, name: &str, dot_safe_dirs: bool) -> bool {
        self.parts
            .first()
            .is_some_and(|first| segment(first, dot_safe_dirs) == segment(name, dot_safe_dirs))
    }
}

/// Whether directories whose names start with a `.` are usable as-is.
///
/// Windows tools handle them poorly, so keys rewrite such dots there by
/// default.
pub fn leading_dot_dirs_supported() -> bool {
    !cfg!(windows)
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join("/"))
    }
}

impl<T: Display, const N: usize> From<[T; N]> for CacheKey {
    fn from(parts: [T; N]) -> Self {
        Self::new(parts)
    }
}

impl<T: Display> From<Vec<T>> for CacheKey {
    fn from(parts: Vec<T>) -> Self {
        Self::new(parts)
    }
}

impl<T: Display> From<&[T]> for CacheKey {
    fn from(parts: &[T]) -> Self {
        Self::new(parts)
    }
}

impl From<&CacheKey> for CacheKey {
    fn from(key: &CacheKey) -> Self {
        key.clone()
    }
}

impl From<&str> for CacheKey {
    fn from(part: &str) -> Self {
        Self::new([part])
    }
}

impl From<String> for CacheKey {
    fn from(part: String) -> Self {
        Self { parts: vec![part] }
    }
}

/// Build a [`CacheKey`] from components of mixed types.
///
/// ```
/// let key = fscache::cache_key!["users", 42, "avatar"];
/// assert_eq!(key.to_string(), "users/42/avatar");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($($part:expr),* $(,)?) => {
        $crate::keys::CacheKey::from(::std::vec![$(::std::string::ToString::to_string(&$part)),*])
    };
}

/// Replace every character that is illegal in a path segment
pub fn sanitize(part: &str) -> String {
    part.replace(BAD_PATH_CHARS, "_")
}

/// Turn one rendered component into a path segment.
///
/// Empty, `.` and `..` components would not name an entry below the root, so
/// they are always rewritten, whatever their position.
fn segment(part: &str, directory: bool) -> String {
    let mut segment = sanitize(part);
    if segment.is_empty() {
        segment.push(SUBSTITUTE);
    } else if (directory || segment == "." || segment == "..") && segment.starts_with('.') {
        segment.replace_range(..1, "_");
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::path::Component;

    #[test]
    fn test_bad_characters_are_replaced() {
        let key = CacheKey::new([r#"a\b/c:d*e?f"g<h>i|j"#]);
        assert_eq!(key.relative_path(true), PathBuf::from("a_b_c_d_e_f_g_h_i_j"));
    }

    #[test]
    fn test_last_component_is_the_file() {
        let key = CacheKey::from(["test", "set"]);
        let root = Path::new("/var/cache/app");
        assert_eq!(key.resolve(root, true), root.join("test").join("set"));
    }

    #[test]
    fn test_leading_dots_only_rewritten_on_directories() {
        let key = CacheKey::from([".invalid", ".hidden", ".file"]);
        assert_eq!(
            key.relative_path(true),
            Path::new("_invalid").join("_hidden").join(".file")
        );
        // Only the first dot goes
        let key = CacheKey::from(["..dir", "file"]);
        assert_eq!(key.relative_path(true), Path::new("_.dir").join("file"));
    }

    #[test]
    fn test_leading_dots_kept_when_disabled() {
        let key = CacheKey::from([".invalid", "file"]);
        assert_eq!(key.relative_path(false), Path::new(".invalid").join("file"));
    }

    #[test]
    fn test_relative_components_cannot_escape_root() {
        let key = CacheKey::from(["..", "..", ".."]);
        assert_eq!(
            key.relative_path(false),
            Path::new("_.").join("_.").join("_.")
        );
        let key = CacheKey::from(["a", "."]);
        assert_eq!(key.relative_path(true), Path::new("a").join("_"));
        let key = CacheKey::from(["", "b"]);
        assert_eq!(key.relative_path(true), Path::new("_").join("b"));
    }

    #[test]
    fn test_is_under_compares_filtered_segments() {
        let key = CacheKey::from(["_invalid", "k"]);
        assert!(key.is_under(".invalid", true));
        assert!(!key.is_under(".invalid", false));

        let key = CacheKey::from(["?invalid"]);
        assert!(key.is_under(".invalid", true));

        let key = CacheKey::from([".invalid", "k"]);
        assert!(key.is_under(".invalid", false));
        assert!(!CacheKey::from(["invalid"]).is_under(".invalid", true));
        assert!(!CacheKey::default().is_under(".invalid", true));
    }

    #[test]
    fn test_mixed_component_types() {
        let key = crate::cache_key!["users", 42, 'x', 1.5];
        assert_eq!(key.parts(), &["users", "42", "x", "1.5"]);
        assert_eq!(key.leaf(), Some("1.5"));
    }

    #[test]
    fn test_prefixed_and_child() {
        let key = CacheKey::from(["a", "b"]);
        assert_eq!(key.prefixed(".invalid").parts(), &[".invalid", "a", "b"]);
        assert_eq!(key.child(3).parts(), &["a", "b", "3"]);
        assert_eq!(key.len(), 2);
        assert!(CacheKey::default().is_empty());
    }

    proptest! {
        #[test]
        fn test_resolution_is_deterministic(parts in prop::collection::vec(".{0,12}", 1..6)) {
            let key = CacheKey::new(&parts);
            let root = Path::new("/cache/root");
            prop_assert_eq!(key.resolve(root, true), key.resolve(root, true));
        }

        #[test]
        fn test_resolved_path_stays_under_root(
            parts in prop::collection::vec(".{0,12}", 1..6),
            dot_safe in any::<bool>()
        ) {
            let key = CacheKey::new(&parts);
            let root = Path::new("/cache/root");
            let path = key.resolve(root, dot_safe);
            let relative = path.strip_prefix(root).unwrap();

            let components: Vec<_> = relative.components().collect();
            prop_assert_eq!(components.len(), parts.len());
            for component in components {
                let is_normal = matches!(component, Component::Normal(_));
                prop_assert!(is_normal);
                let text = component.as_os_str().to_string_lossy().into_owned();
                prop_assert!(!text.contains(BAD_PATH_CHARS));
            }
        }
    }
}
