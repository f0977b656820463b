use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tlapath_core::{
    split_library_list, ConfigFile, FilenameToStream, LibraryResolver, ResolveError,
    ResolverConfig, CONFIG_FILE_NAME,
};
use tlapath_diagnostics::{fuzzy, ConsoleSink, Diagnostic, DiagnosticSink};

#[derive(Parser)]
#[command(name = "tlapath")]
#[command(version)]
#[command(about = "Resolve TLA+ module names along the library path", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Library directories, separated like PATH (overrides TLA_LIBRARY)
    #[arg(short = 'L', long, value_name = "LIST", global = true)]
    library: Option<String>,

    /// Logical current directory, searched first (overrides TLA_USER_DIR)
    #[arg(long, value_name = "DIR", global = true)]
    user_dir: Option<PathBuf>,

    /// Standard modules directory (default: <install>/StandardModules)
    #[arg(long, value_name = "DIR", global = true)]
    stdlib: Option<PathBuf>,

    /// Config file (default: ./tlapath.json when present)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Output diagnostics and results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log every probed candidate
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the file a name resolves to
    Locate {
        /// Module name (e.g. Naturals) or file name with --raw
        #[arg(value_name = "NAME")]
        name: String,

        /// Use the name verbatim instead of ensuring a .tla suffix
        #[arg(long)]
        raw: bool,
    },

    /// Resolve a name and print the file contents
    Cat {
        #[arg(value_name = "NAME")]
        name: String,

        /// Use the name verbatim instead of ensuring a .tla suffix
        #[arg(long)]
        raw: bool,
    },

    /// Copy stdin into the file a name resolves to for writing
    Write {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print the effective search order
    Path,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = build_config(&cli)?;
    let sink: Arc<dyn DiagnosticSink> = if cli.json {
        Arc::new(ConsoleSink::json())
    } else {
        Arc::new(ConsoleSink::new())
    };
    let resolver = LibraryResolver::with_sink(config, sink.clone());

    match cli.command {
        Commands::Locate { name, raw } => {
            let resolved = resolver.resolve(&name, !raw);
            if cli.json {
                let value = serde_json::json!({
                    "file_name": resolved.name.file_name,
                    "module_name": resolved.name.module_name,
                    "path": resolved.path.display().to_string(),
                    "exists": resolved.exists,
                });
                println!("{}", value);
            } else if resolved.exists {
                println!("{}", resolved.path.display());
            }

            if resolved.exists {
                Ok(ExitCode::SUCCESS)
            } else {
                let err = ResolveError::NotFound {
                    name: resolved.name.file_name.clone(),
                    last_candidate: resolved.path,
                };
                report(&resolver, sink.as_ref(), &name, &err);
                Ok(ExitCode::FAILURE)
            }
        }

        Commands::Cat { name, raw } => {
            let mut stream = match resolver.to_named_input(&name, !raw) {
                Ok(stream) => stream,
                Err(err) => {
                    report(&resolver, sink.as_ref(), &name, &err);
                    return Ok(ExitCode::FAILURE);
                }
            };
            log::info!(
                "Reading module {} from {}",
                stream.module_name(),
                stream.path().display()
            );

            let stdout = io::stdout();
            let mut out = stdout.lock();
            io::copy(&mut stream, &mut out)
                .with_context(|| format!("Failed to read {}", stream.path().display()))?;
            out.flush()?;
            Ok(ExitCode::SUCCESS)
        }

        Commands::Write { name } => {
            let mut stream = match resolver.to_output(&name) {
                Ok(stream) => stream,
                Err(err) => {
                    report(&resolver, sink.as_ref(), &name, &err);
                    return Ok(ExitCode::FAILURE);
                }
            };
            let path = stream.path().to_path_buf();

            io::copy(&mut io::stdin().lock(), &mut stream)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            stream
                .finish()
                .with_context(|| format!("Failed to flush {}", path.display()))?;

            log::info!("Wrote {}", path.display());
            if cli.json {
                println!("{}", serde_json::json!({ "path": path.display().to_string() }));
            } else {
                println!("{}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Path => {
            let config = resolver.config();
            let first = match config.user_dir() {
                Some(dir) => dir.display().to_string(),
                None => ".".to_string(),
            };
            let entries: Vec<String> = std::iter::once(first)
                .chain(config.search_path().iter().cloned())
                .collect();

            if cli.json {
                println!("{}", serde_json::json!({ "search_order": entries }));
            } else {
                for entry in entries {
                    println!("{}", entry);
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Environment, then config file, then flags; later layers win
fn build_config(cli: &Cli) -> Result<ResolverConfig> {
    let mut layers = ConfigFile::from_env();

    let config_path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => Some(PathBuf::from(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
    };
    if let Some(path) = config_path {
        let file = ConfigFile::from_file(&path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        layers = layers.merge(file);
    }

    layers = layers.merge(flag_layer(cli));

    layers
        .into_config()
        .context("Failed to build library search path")
}

fn flag_layer(cli: &Cli) -> ConfigFile {
    ConfigFile {
        library: cli
            .library
            .as_deref()
            .map(split_library_list)
            .unwrap_or_default(),
        user_dir: cli.user_dir.clone(),
        standard_modules: cli
            .stdlib
            .as_deref()
            .map(Path::to_string_lossy)
            .map(|dir| dir.into_owned()),
    }
}

/// Emit a user-facing diagnostic for a failed lookup
fn report(resolver: &LibraryResolver, sink: &dyn DiagnosticSink, name: &str, err: &ResolveError) {
    match err {
        ResolveError::NotFound { .. } => {
            let mut diagnostic = Diagnostic::error(
                err.code(),
                format!("cannot find '{}' in the library path", name),
            )
            .with_path(err.path());

            let available = resolver.available_modules();
            let similar = fuzzy::find_similar_names(name, &available, 0.8, 3);
            if !similar.is_empty() {
                diagnostic = diagnostic.with_note(format!("did you mean: {}", similar.join(", ")));
            }
            sink.emit(diagnostic);
        }
        ResolveError::NotAFile(path) => {
            sink.emit(
                Diagnostic::error(err.code(), format!("'{}' is a directory", name))
                    .with_path(path),
            );
        }
        // Already reported by the resolver when the open failed
        ResolveError::Open { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flag_layer() {
        let sep = tlapath_core::Platform::current().path_list_separator();
        let list = format!("specs{}shared", sep);
        let cli = Cli::try_parse_from([
            "tlapath",
            "locate",
            "Foo",
            "--library",
            list.as_str(),
            "--user-dir",
            "/work",
            "--stdlib",
            "/opt/tla/StandardModules",
        ])
        .expect("valid arguments");

        let layer = flag_layer(&cli);
        assert_eq!(layer.library, vec!["specs", "shared"]);
        assert_eq!(layer.user_dir, Some(PathBuf::from("/work")));
        assert_eq!(
            layer.standard_modules.as_deref(),
            Some("/opt/tla/StandardModules")
        );
    }

    #[test]
    fn test_report_uses_error_code() {
        use tlapath_diagnostics::{codes, MemorySink};

        let tmp = tempfile::tempdir().expect("tempdir");
        let config = ConfigFile {
            standard_modules: Some(tmp.path().to_string_lossy().into_owned()),
            ..ConfigFile::default()
        }
        .into_config()
        .expect("config");
        let sink = Arc::new(MemorySink::new());
        let resolver = LibraryResolver::with_sink(config, sink.clone());

        let missing = ResolveError::NotFound {
            name: "Foo.tla".to_string(),
            last_candidate: tmp.path().join("Foo.tla"),
        };
        report(&resolver, sink.as_ref(), "Foo", &missing);
        report(
            &resolver,
            sink.as_ref(),
            "Foo",
            &ResolveError::NotAFile(tmp.path().to_path_buf()),
        );

        let codes_seen: Vec<String> = sink.diagnostics().into_iter().map(|d| d.code).collect();
        assert_eq!(codes_seen, vec![codes::MODULE_NOT_FOUND, codes::NOT_A_FILE]);
    }

    #[test]
    fn test_raw_flag() {
        let cli = Cli::try_parse_from(["tlapath", "cat", "Spec.cfg", "--raw"])
            .expect("valid arguments");
        assert!(matches!(cli.command, Commands::Cat { raw: true, .. }));
    }
}
