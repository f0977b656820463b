// Search-path walk: first existing candidate wins

use crate::config::ResolverConfig;
use crate::platform::Platform;
use log::debug;
use std::path::{Path, PathBuf};

/// Find `file_name` along the effective search order.
///
/// Returns the first candidate that exists. If none does, the last
/// candidate tried is returned anyway, so callers must check existence
/// before reading from it.
pub fn locate(file_name: &str, config: &ResolverConfig) -> PathBuf {
    locate_with(file_name, config, |candidate| candidate.exists())
}

/// `locate` with a caller-supplied existence check
pub fn locate_with<F>(file_name: &str, config: &ResolverConfig, mut exists: F) -> PathBuf
where
    F: FnMut(&Path) -> bool,
{
    let mut rest = library_candidates(file_name, config);
    let mut candidate = first_candidate(file_name, config);
    loop {
        debug!("Looking for file {}", candidate.display());
        if exists(&candidate) {
            return candidate;
        }
        match rest.next() {
            Some(next) => candidate = next,
            None => return candidate,
        }
    }
}

/// Every candidate in probe order: the override (or bare name), then each entry
pub fn candidates<'a>(
    file_name: &'a str,
    config: &'a ResolverConfig,
) -> impl Iterator<Item = PathBuf> + 'a {
    std::iter::once(first_candidate(file_name, config))
        .chain(library_candidates(file_name, config))
}

/// The override directory takes the place of the bare current-directory probe.
/// The name is appended even when absolute, like every library entry.
fn first_candidate(file_name: &str, config: &ResolverConfig) -> PathBuf {
    match config.user_dir() {
        Some(dir) => append_name(dir, file_name, Platform::current()),
        None => PathBuf::from(file_name),
    }
}

fn append_name(dir: &Path, file_name: &str, platform: Platform) -> PathBuf {
    let mut joined = dir.as_os_str().to_os_string();
    let has_separator = dir
        .to_string_lossy()
        .ends_with(|c: char| platform.is_separator(c));
    if !joined.is_empty() && !has_separator {
        joined.push(platform.file_separator().to_string());
    }
    joined.push(file_name);
    PathBuf::from(joined)
}

fn library_candidates<'a>(
    file_name: &'a str,
    config: &'a ResolverConfig,
) -> impl Iterator<Item = PathBuf> + 'a {
    config
        .search_path()
        .iter()
        .map(move |prefix| PathBuf::from(format!("{}{}", prefix, file_name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search_path::SearchPath;

    fn config(entries: &[&str]) -> ResolverConfig {
        ResolverConfig::new(SearchPath::from_entries(
            entries.iter().map(|e| e.to_string()).collect(),
        ))
    }

    #[test]
    fn test_first_match_wins_and_stops() {
        let config = config(&["A/", "B/", "C/"]);
        let mut probed = Vec::new();
        let found = locate_with("Foo.tla", &config, |p| {
            probed.push(p.to_path_buf());
            p == Path::new("B/Foo.tla")
        });

        assert_eq!(found, PathBuf::from("B/Foo.tla"));
        assert_eq!(
            probed,
            vec![
                PathBuf::from("Foo.tla"),
                PathBuf::from("A/Foo.tla"),
                PathBuf::from("B/Foo.tla"),
            ]
        );
    }

    #[test]
    fn test_override_has_top_precedence() {
        let config = config(&["A/"]).with_user_dir("/work");
        let found = locate_with("Foo.tla", &config, |p| {
            p == Path::new("/work/Foo.tla") || p == Path::new("A/Foo.tla")
        });
        assert_eq!(found, PathBuf::from("/work/Foo.tla"));
    }

    #[test]
    fn test_override_replaces_bare_probe() {
        let config = config(&["A/"]).with_user_dir("/work");
        let mut probed = Vec::new();
        locate_with("Foo.tla", &config, |p| {
            probed.push(p.to_path_buf());
            false
        });
        assert_eq!(
            probed,
            vec![PathBuf::from("/work/Foo.tla"), PathBuf::from("A/Foo.tla")]
        );
    }

    #[test]
    fn test_override_prefixes_absolute_name() {
        let config = config(&["lib/"]).with_user_dir("/work");
        let all: Vec<PathBuf> = candidates("/abs/Foo.tla", &config).collect();
        assert_eq!(
            all,
            vec![
                PathBuf::from("/work//abs/Foo.tla"),
                PathBuf::from("lib//abs/Foo.tla"),
            ]
        );
        assert!(all[0].starts_with("/work"));
    }

    #[test]
    fn test_append_name_single_separator() {
        assert_eq!(
            append_name(Path::new("/work/"), "Foo.tla", Platform::Unix),
            PathBuf::from("/work/Foo.tla")
        );
        assert_eq!(
            append_name(Path::new("/work"), "Foo.tla", Platform::Unix),
            PathBuf::from("/work/Foo.tla")
        );
        assert_eq!(
            append_name(Path::new("C:\\work"), "Foo.tla", Platform::Windows),
            PathBuf::from("C:\\work\\Foo.tla")
        );
    }

    #[test]
    fn test_not_found_returns_last_candidate() {
        let config = config(&["A/", "B/", "C/"]);
        let found = locate_with("Foo.tla", &config, |_| false);
        assert_eq!(found, PathBuf::from("C/Foo.tla"));
    }

    #[test]
    fn test_empty_search_path_single_probe() {
        let config = config(&[]);
        let mut count = 0;
        let found = locate_with("Foo.tla", &config, |_| {
            count += 1;
            false
        });
        assert_eq!(count, 1);
        assert_eq!(found, PathBuf::from("Foo.tla"));
    }

    #[test]
    fn test_duplicate_entries_probed_twice() {
        let config = config(&["std/", "std/"]);
        let mut count = 0;
        locate_with("Foo.tla", &config, |_| {
            count += 1;
            false
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn test_candidates_order() {
        let config = config(&["A/", "B/"]).with_user_dir("/work");
        let all: Vec<PathBuf> = candidates("x", &config).collect();
        assert_eq!(
            all,
            vec![
                PathBuf::from("/work/x"),
                PathBuf::from("A/x"),
                PathBuf::from("B/x"),
            ]
        );
    }
}
