// Advisory diagnostics for library path resolution
// Warnings and internal-error notices that never interrupt a lookup

use colored::Colorize;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    Error,
    Warning,
    Note,
}

impl ErrorLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorLevel::Error => "error",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Note => "note",
        }
    }
}

impl fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorLevel::Error => write!(f, "{}", "error".red().bold()),
            ErrorLevel::Warning => write!(f, "{}", "warning".yellow().bold()),
            ErrorLevel::Note => write!(f, "{}", "note".cyan().bold()),
        }
    }
}

/// A single advisory message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: ErrorLevel,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn new(level: ErrorLevel, code: &str, message: String) -> Self {
        Self {
            level,
            code: code.to_string(),
            message,
            path: None,
            notes: Vec::new(),
        }
    }

    pub fn error(code: &str, message: String) -> Self {
        Self::new(ErrorLevel::Error, code, message)
    }

    pub fn warning(code: &str, message: String) -> Self {
        Self::new(ErrorLevel::Warning, code, message)
    }

    pub fn note(message: String) -> Self {
        Self::new(ErrorLevel::Note, "", message)
    }

    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    pub fn with_note(mut self, note: String) -> Self {
        self.notes.push(note);
        self
    }

    /// Format in the compiler style:
    ///
    /// ```text
    /// warning[W0001]: module name 'Foo\nBar' contained NEWLINE
    ///  --> Foo.tla
    ///  = only the part before NEWLINE is considered
    /// ```
    pub fn format(&self) -> String {
        let mut output = String::new();

        if self.code.is_empty() {
            output.push_str(&format!("{}: {}\n", self.level, self.message.bold()));
        } else {
            output.push_str(&format!(
                "{}[{}]: {}\n",
                self.level,
                self.code,
                self.message.bold()
            ));
        }

        if let Some(path) = &self.path {
            output.push_str(&format!(" {} {}\n", "-->".cyan().bold(), path.display()));
        }

        for note in &self.notes {
            output.push_str(&format!(" {} {}\n", "=".cyan().bold(), note.cyan()));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Line-oriented destination for advisory messages.
///
/// Implementations must not fail or panic; a sink that cannot write simply
/// drops the message.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic)
    }
}

/// Writes diagnostics to stderr, colored or as one JSON object per line
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink {
    json: bool,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json() -> Self {
        Self { json: true }
    }
}

impl DiagnosticSink for ConsoleSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        if self.json {
            if let Ok(line) = serde_json::to_string(&diagnostic) {
                let _ = writeln!(out, "{}", line);
            }
        } else {
            let _ = write!(out, "{}", diagnostic.format());
        }
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn count(&self, level: ErrorLevel) -> usize {
        self.lock().iter().filter(|d| d.level == level).count()
    }

    pub fn warning_count(&self) -> usize {
        self.count(ErrorLevel::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(ErrorLevel::Error)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.lock().push(diagnostic);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Diagnostic codes
pub mod codes {
    // Warnings (W0001-W0999)
    pub const NEWLINE_IN_NAME: &str = "W0001";

    // Internal stream errors (E0001-E0099)
    pub const INPUT_STREAM: &str = "E0001";
    pub const NAMED_INPUT_STREAM: &str = "E0002";
    pub const OUTPUT_STREAM: &str = "E0003";

    // Resolution (E0500-E0599)
    pub const MODULE_NOT_FOUND: &str = "E0583";
    pub const NOT_A_FILE: &str = "E0584";
}

/// Fuzzy matching for "did you mean?" notes
pub mod fuzzy {
    use strsim::jaro_winkler;

    /// Names with Jaro-Winkler similarity above `threshold`, best first
    pub fn find_similar_names(
        target: &str,
        candidates: &[String],
        threshold: f64,
        max_suggestions: usize,
    ) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = candidates
            .iter()
            .map(|candidate| (candidate.clone(), jaro_winkler(target, candidate)))
            .filter(|(_, score)| *score > threshold)
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        scored
            .into_iter()
            .take(max_suggestions)
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_format() {
        colored::control::set_override(false);

        let diag = Diagnostic::warning(codes::NEWLINE_IN_NAME, "bad name".to_string())
            .with_path(Path::new("Foo.tla"))
            .with_note("only the part before NEWLINE is considered".to_string());

        let formatted = diag.format();
        assert!(formatted.contains("warning[W0001]: bad name"));
        assert!(formatted.contains("--> Foo.tla"));
        assert!(formatted.contains("= only the part before NEWLINE"));
    }

    #[test]
    fn test_memory_sink_counts() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.emit(Diagnostic::warning(codes::NEWLINE_IN_NAME, "w".to_string()));
        sink.emit(Diagnostic::error(codes::INPUT_STREAM, "e".to_string()));
        sink.emit(Diagnostic::note("n".to_string()));

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.warning_count(), 1);
        assert_eq!(sink.error_count(), 1);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_shared_sink() {
        let sink = Arc::new(MemorySink::new());
        let shared: Arc<dyn DiagnosticSink> = sink.clone();
        shared.emit(Diagnostic::note("hello".to_string()));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let diag = Diagnostic::error(codes::OUTPUT_STREAM, "Unable to create OutputStream".to_string())
            .with_path(Path::new("out.txt"));
        let value = serde_json::to_value(&diag).expect("serializable");
        assert_eq!(value["level"], "error");
        assert_eq!(value["code"], "E0003");
        assert_eq!(value["path"], "out.txt");
        assert!(value.get("notes").is_none());
    }

    #[test]
    fn test_find_similar_names() {
        let candidates = vec![
            "Naturals".to_string(),
            "Integers".to_string(),
            "Sequences".to_string(),
        ];
        let similar = fuzzy::find_similar_names("Natural", &candidates, 0.8, 3);
        assert_eq!(similar.first().map(String::as_str), Some("Naturals"));
        assert!(!similar.contains(&"Sequences".to_string()));
    }
}
