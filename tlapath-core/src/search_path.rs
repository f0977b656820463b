// Ordered library search list

use crate::config::split_library_list_with_platform;
use crate::platform::Platform;
use log::debug;
use std::fmt;

/// Ordered directory prefixes consulted after the current directory.
///
/// Every entry ends with exactly one file separator, so a candidate is
/// always `entry + file_name`. The standard modules directory is the last
/// entry and is appended even when the user list already names it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPath {
    entries: Vec<String>,
}

impl SearchPath {
    /// A search path with no entries: only the bare file name is probed
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from explicit directories followed by the standard modules directory
    pub fn from_dirs<I, S>(dirs: I, standard_modules: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_dirs_with_platform(dirs, standard_modules, Platform::current())
    }

    pub fn from_dirs_with_platform<I, S>(dirs: I, standard_modules: &str, platform: Platform) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = dirs
            .into_iter()
            .map(|dir| dir.as_ref().to_string())
            .filter(|dir| !dir.is_empty())
            .map(|dir| platform.with_trailing_separator(&dir))
            .collect();
        entries.push(platform.with_trailing_separator(standard_modules));

        debug!("Library search path: {:?}", entries);
        Self { entries }
    }

    /// Split a path-list string (`a:b` / `a;b`) and append the standard modules directory
    pub fn from_list(list: &str, standard_modules: &str) -> Self {
        Self::from_list_with_platform(list, standard_modules, Platform::current())
    }

    pub fn from_list_with_platform(list: &str, standard_modules: &str, platform: Platform) -> Self {
        Self::from_dirs_with_platform(
            split_library_list_with_platform(list, platform),
            standard_modules,
            platform,
        )
    }

    /// Use `entries` verbatim, without normalization or the standard directory
    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The lowest-priority entry
    pub fn standard_modules(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a SearchPath {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = Platform::current().path_list_separator().to_string();
        write!(f, "{}", self.entries.join(&sep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_list_appends_standard_modules() {
        let path = SearchPath::from_list_with_platform("a:b/", "/opt/tla/StandardModules", Platform::Unix);
        assert_eq!(
            path.entries(),
            &["a/", "b/", "/opt/tla/StandardModules/"]
        );
        assert_eq!(path.standard_modules(), Some("/opt/tla/StandardModules/"));
    }

    #[test]
    fn test_windows_list() {
        let path = SearchPath::from_list_with_platform(
            "C:\\specs;D:\\lib\\",
            "C:\\tla\\StandardModules\\",
            Platform::Windows,
        );
        assert_eq!(
            path.entries(),
            &["C:\\specs\\", "D:\\lib\\", "C:\\tla\\StandardModules\\"]
        );
    }

    #[test]
    fn test_empty_segments_skipped() {
        let path = SearchPath::from_list_with_platform("a::b:", "std", Platform::Unix);
        assert_eq!(path.entries(), &["a/", "b/", "std/"]);
    }

    #[test]
    fn test_no_deduplication() {
        let path = SearchPath::from_dirs_with_platform(["std", "a"], "std/", Platform::Unix);
        assert_eq!(path.entries(), &["std/", "a/", "std/"]);
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn test_standard_modules_alone() {
        let path = SearchPath::from_list_with_platform("", "std", Platform::Unix);
        assert_eq!(path.entries(), &["std/"]);
        assert!(!path.is_empty());
    }

    #[test]
    fn test_empty() {
        let path = SearchPath::empty();
        assert!(path.is_empty());
        assert_eq!(path.standard_modules(), None);
    }
}
