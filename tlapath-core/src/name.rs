// Logical name -> file name / module name

use crate::platform::Platform;
use log::trace;
use tlapath_diagnostics::{codes, Diagnostic, DiagnosticSink};

/// Suffix of module source files
pub const MODULE_EXTENSION: &str = ".tla";

/// File name to search for, plus the module identifier used in messages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    /// What gets appended to each search path entry
    pub file_name: String,
    /// Base name, without directories and without the module suffix
    pub module_name: String,
}

/// Normalize a requested name.
///
/// Anything from the first newline on is dropped (with a warning). Module
/// names get exactly one `.tla` suffix, matched case-insensitively; other
/// names pass through unchanged.
pub fn normalize(logical_name: &str, is_module: bool, sink: &dyn DiagnosticSink) -> NormalizedName {
    normalize_with_platform(logical_name, is_module, sink, Platform::current())
}

pub fn normalize_with_platform(
    logical_name: &str,
    is_module: bool,
    sink: &dyn DiagnosticSink,
    platform: Platform,
) -> NormalizedName {
    let name = match logical_name.split_once('\n') {
        Some((head, _)) => {
            sink.emit(
                Diagnostic::warning(
                    codes::NEWLINE_IN_NAME,
                    format!("module name '{}' contained NEWLINE", logical_name),
                )
                .with_note("Only the part before NEWLINE is considered.".to_string()),
            );
            head
        }
        None => logical_name,
    };

    let (stem, file_name) = if is_module {
        let stem = strip_suffix_ignore_ascii_case(name, MODULE_EXTENSION).unwrap_or(name);
        (stem, format!("{}{}", stem, MODULE_EXTENSION))
    } else {
        (name, name.to_string())
    };

    let normalized = NormalizedName {
        module_name: platform.base_name(stem).to_string(),
        file_name,
    };
    trace!("Normalized {:?} -> {:?}", logical_name, normalized);
    normalized
}

fn strip_suffix_ignore_ascii_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    if !s.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = s.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tlapath_diagnostics::{ErrorLevel, MemorySink, NullSink};

    fn module(name: &str) -> NormalizedName {
        normalize_with_platform(name, true, &NullSink, Platform::Unix)
    }

    fn raw(name: &str) -> NormalizedName {
        normalize_with_platform(name, false, &NullSink, Platform::Unix)
    }

    #[test]
    fn test_module_gets_suffix() {
        let name = module("Foo");
        assert_eq!(name.file_name, "Foo.tla");
        assert_eq!(name.module_name, "Foo");
    }

    #[test]
    fn test_module_suffix_case_insensitive() {
        assert_eq!(module("Foo.tla").file_name, "Foo.tla");
        assert_eq!(module("Foo.TLA").file_name, "Foo.tla");
        assert_eq!(module("Foo.Tla").module_name, "Foo");
    }

    #[test]
    fn test_module_idempotent() {
        for input in ["Foo", "Foo.tla", "Foo.TLA", "a/b/Bar", ".tla", "x.tla.tla", "Ünïcode"] {
            let once = module(input).file_name;
            let twice = module(&once).file_name;
            assert_eq!(once, twice, "not idempotent for {:?}", input);
            assert!(once.to_ascii_lowercase().ends_with(".tla"));
        }
    }

    #[test]
    fn test_only_one_suffix_stripped() {
        assert_eq!(module("x.tla.tla").file_name, "x.tla.tla");
        assert_eq!(module("x.tla.tla").module_name, "x.tla");
    }

    #[test]
    fn test_raw_name_untouched() {
        for input in ["out.txt", "Foo", "Foo.TLA", "dir/cfg.cfg", ""] {
            assert_eq!(raw(input).file_name, input);
        }
        assert_eq!(raw("dir/cfg.cfg").module_name, "cfg.cfg");
    }

    #[test]
    fn test_module_name_strips_directories() {
        let name = module("specs/sub/Spec");
        assert_eq!(name.file_name, "specs/sub/Spec.tla");
        assert_eq!(name.module_name, "Spec");
        assert!(!name.module_name.contains('/'));
    }

    #[test]
    fn test_newline_truncated_with_single_warning() {
        let sink = MemorySink::new();
        let name = normalize_with_platform("Foo\r\nBar\nBaz", true, &sink, Platform::Unix);
        assert_eq!(name.file_name, "Foo\r.tla");

        let sink = MemorySink::new();
        let name = normalize_with_platform("Foo\nBar", false, &sink, Platform::Unix);
        assert_eq!(name.file_name, "Foo");

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, ErrorLevel::Warning);
        assert_eq!(diagnostics[0].code, codes::NEWLINE_IN_NAME);
        assert!(diagnostics[0].message.contains("contained NEWLINE"));
    }

    #[test]
    fn test_no_warning_without_newline() {
        let sink = MemorySink::new();
        normalize_with_platform("Foo", true, &sink, Platform::Unix);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_suffix_with_multibyte_prefix() {
        assert_eq!(strip_suffix_ignore_ascii_case("é", ".tla"), None);
        assert_eq!(strip_suffix_ignore_ascii_case("éa.TLA", ".tla"), Some("éa"));
    }
}
