/**
 * Library Path Resolver
 * Resolves module and file names to streams along the configured library path
 */
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::locate::{candidates, locate};
use crate::name::{normalize, NormalizedName, MODULE_EXTENSION};
use crate::stream::{self, NamedInputStream, NamedOutputStream};
use log::debug;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tlapath_diagnostics::{ConsoleSink, DiagnosticSink};

/// Translation from names to streams, the seam tools program against
pub trait FilenameToStream {
    /// Readable stream tagged with file and module name
    fn to_named_input(&self, name: &str, is_module: bool)
        -> Result<NamedInputStream, ResolveError>;

    /// Readable stream for a name used verbatim
    fn to_input(&self, name: &str) -> Result<NamedInputStream, ResolveError>;

    /// Writable stream for a name used verbatim
    fn to_output(&self, name: &str) -> Result<NamedOutputStream, ResolveError>;
}

/// Outcome of normalization plus search, before anything is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub name: NormalizedName,
    /// First existing candidate, or the last one tried
    pub path: PathBuf,
    pub exists: bool,
}

/// Resolver over an immutable configuration.
///
/// Holds no per-request state: it is `Send + Sync` and each call is
/// independent of every other.
#[derive(Clone)]
pub struct LibraryResolver {
    config: Arc<ResolverConfig>,
    sink: Arc<dyn DiagnosticSink>,
}

impl LibraryResolver {
    /// Resolver reporting diagnostics to stderr
    pub fn new(config: impl Into<Arc<ResolverConfig>>) -> Self {
        Self::with_sink(config, Arc::new(ConsoleSink::new()))
    }

    pub fn with_sink(
        config: impl Into<Arc<ResolverConfig>>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            config: config.into(),
            sink,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Normalize `name` and walk the search path, without opening anything
    pub fn resolve(&self, name: &str, is_module: bool) -> Resolved {
        let name = normalize(name, is_module, self.sink.as_ref());
        let path = locate(&name.file_name, &self.config);
        let exists = path.exists();
        debug!(
            "Resolved {} -> {} ({})",
            name.file_name,
            path.display(),
            if exists { "found" } else { "missing" }
        );
        Resolved { name, path, exists }
    }

    /// Open module `name` (".tla" ensured) for reading
    pub fn open_module(&self, name: &str) -> Result<NamedInputStream, ResolveError> {
        self.to_named_input(name, true)
    }

    /// Open file `name` (used verbatim) for reading
    pub fn open_file(&self, name: &str) -> Result<NamedInputStream, ResolveError> {
        self.to_named_input(name, false)
    }

    /// Open file `name` for writing
    pub fn open_output(&self, name: &str) -> Result<NamedOutputStream, ResolveError> {
        self.to_output(name)
    }

    /// Resolve several module names, failing on the first that is missing
    pub fn resolve_modules(
        &self,
        module_names: &[&str],
    ) -> Result<Vec<(String, PathBuf)>, ResolveError> {
        let mut results = Vec::new();
        for &name in module_names {
            let resolved = self.resolve(name, true);
            stream::check_regular_file(&resolved.path, &resolved.name)?;
            results.push((resolved.name.module_name, resolved.path));
        }
        Ok(results)
    }

    /// Module names visible in the override directory and every search path entry
    pub fn available_modules(&self) -> Vec<String> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        dirs.push(
            self.config
                .user_dir()
                .map(|dir| dir.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
        );
        dirs.extend(self.config.search_path().iter().map(PathBuf::from));

        let mut modules = BTreeSet::new();
        for dir in dirs {
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let file_name = entry.file_name().to_string_lossy().to_string();
                let is_file = entry.file_type().map(|ft| ft.is_file()).unwrap_or(false);
                if let Some(stem) = file_name.strip_suffix(MODULE_EXTENSION) {
                    if is_file && !stem.is_empty() {
                        modules.insert(stem.to_string());
                    }
                }
            }
        }
        modules.into_iter().collect()
    }

    fn open_resolved(
        &self,
        name: &str,
        is_module: bool,
        open: fn(&Path, &NormalizedName, &dyn DiagnosticSink) -> Result<NamedInputStream, ResolveError>,
    ) -> Result<NamedInputStream, ResolveError> {
        let resolved = self.resolve(name, is_module);
        open(&resolved.path, &resolved.name, self.sink.as_ref())
    }
}

impl FilenameToStream for LibraryResolver {
    fn to_named_input(
        &self,
        name: &str,
        is_module: bool,
    ) -> Result<NamedInputStream, ResolveError> {
        self.open_resolved(name, is_module, stream::open_named_input)
    }

    fn to_input(&self, name: &str) -> Result<NamedInputStream, ResolveError> {
        self.open_resolved(name, false, stream::open_input)
    }

    fn to_output(&self, name: &str) -> Result<NamedOutputStream, ResolveError> {
        let resolved = self.resolve(name, false);
        if resolved.exists {
            return stream::open_output(&resolved.path, &resolved.name, self.sink.as_ref());
        }
        stream::create_output(
            candidates(&resolved.name.file_name, &self.config),
            &resolved.name,
            self.sink.as_ref(),
        )
    }
}

impl std::fmt::Debug for LibraryResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibraryResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
