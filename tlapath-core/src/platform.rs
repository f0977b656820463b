/**
 * Platform Separators
 * Compile-time selection of the file and path-list separators used to build library paths
 */
use std::fmt;

/// Separator conventions of the host operating system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    /// Get the current platform at compile time
    pub fn current() -> Self {
        #[cfg(windows)]
        return Platform::Windows;

        #[cfg(not(windows))]
        return Platform::Unix;
    }

    /// Character separating directories inside a single path
    pub fn file_separator(&self) -> char {
        match self {
            Platform::Unix => '/',
            Platform::Windows => '\\',
        }
    }

    /// Character separating directories inside a library list
    /// Example: `a:b:c` on Unix, `a;b;c` on Windows
    pub fn path_list_separator(&self) -> char {
        match self {
            Platform::Unix => ':',
            Platform::Windows => ';',
        }
    }

    /// Whether `c` ends a directory component on this platform.
    /// Windows accepts `/` as well as `\`.
    pub fn is_separator(&self, c: char) -> bool {
        match self {
            Platform::Unix => c == '/',
            Platform::Windows => c == '\\' || c == '/',
        }
    }

    /// Replace every `/` with the platform file separator
    pub fn translate_separators(&self, path: &str) -> String {
        path.replace('/', &self.file_separator().to_string())
    }

    /// Append exactly one trailing file separator
    pub fn with_trailing_separator(&self, dir: &str) -> String {
        let sep = self.file_separator();
        let mut out = dir.trim_end_matches(sep).to_string();
        out.push(sep);
        out
    }

    /// Substring after the last separator, or the whole string
    pub fn base_name<'a>(&self, name: &'a str) -> &'a str {
        match name.rfind(|c: char| self.is_separator(c)) {
            Some(pos) => name.get(pos + 1..).unwrap_or(name),
            None => name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Unix => "unix",
            Platform::Windows => "windows",
        }
    }

    /// All supported platforms (for testing/validation)
    pub fn all() -> &'static [Platform] {
        &[Platform::Unix, Platform::Windows]
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
