// Named streams over resolved files
// Every open failure becomes a ResolveError plus an advisory diagnostic

use crate::error::ResolveError;
use crate::name::NormalizedName;
use log::debug;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tlapath_diagnostics::{codes, Diagnostic, DiagnosticSink};

/// Which stream a failed open was building
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Input,
    NamedInput,
    Output,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Input => "InputStream",
            StreamKind::NamedInput => "NamedInputStream",
            StreamKind::Output => "OutputStream",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            StreamKind::Input => codes::INPUT_STREAM,
            StreamKind::NamedInput => codes::NAMED_INPUT_STREAM,
            StreamKind::Output => codes::OUTPUT_STREAM,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Readable file tagged with the names that requested it
#[derive(Debug)]
pub struct NamedInputStream {
    file_name: String,
    module_name: String,
    path: PathBuf,
    reader: BufReader<File>,
}

impl NamedInputStream {
    /// Name searched for, e.g. `Foo.tla`
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Module identifier, e.g. `Foo`
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    /// Location on disk
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Read for NamedInputStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }
}

impl BufRead for NamedInputStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt)
    }
}

/// Writable file tagged with the name that requested it
#[derive(Debug)]
pub struct NamedOutputStream {
    file_name: String,
    path: PathBuf,
    writer: BufWriter<File>,
}

impl NamedOutputStream {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered bytes, reporting the error that a drop would swallow
    pub fn finish(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl Write for NamedOutputStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Reject paths that are missing or are directories
pub fn check_regular_file(path: &Path, name: &NormalizedName) -> Result<(), ResolveError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(ResolveError::NotAFile(path.to_path_buf())),
        Ok(_) => Ok(()),
        Err(_) => Err(ResolveError::NotFound {
            name: name.file_name.clone(),
            last_candidate: path.to_path_buf(),
        }),
    }
}

/// Open a resolved module or file for reading
pub fn open_named_input(
    path: &Path,
    name: &NormalizedName,
    sink: &dyn DiagnosticSink,
) -> Result<NamedInputStream, ResolveError> {
    open_input_as(path, name, StreamKind::NamedInput, sink)
}

/// Open a resolved raw file for reading
pub fn open_input(
    path: &Path,
    name: &NormalizedName,
    sink: &dyn DiagnosticSink,
) -> Result<NamedInputStream, ResolveError> {
    open_input_as(path, name, StreamKind::Input, sink)
}

fn open_input_as(
    path: &Path,
    name: &NormalizedName,
    kind: StreamKind,
    sink: &dyn DiagnosticSink,
) -> Result<NamedInputStream, ResolveError> {
    check_regular_file(path, name)?;

    match File::open(path) {
        Ok(file) => Ok(NamedInputStream {
            file_name: name.file_name.clone(),
            module_name: name.module_name.clone(),
            path: path.to_path_buf(),
            reader: BufReader::new(file),
        }),
        Err(source) => Err(open_failure(path, kind, source, sink)),
    }
}

/// Truncate and open an existing file for writing
pub fn open_output(
    path: &Path,
    name: &NormalizedName,
    sink: &dyn DiagnosticSink,
) -> Result<NamedOutputStream, ResolveError> {
    check_regular_file(path, name)?;

    File::create(path)
        .map(|file| output_stream(path, name, file))
        .map_err(|source| open_failure(path, StreamKind::Output, source, sink))
}

/// Create the output file at the first candidate that accepts it
pub fn create_output<I>(
    candidates: I,
    name: &NormalizedName,
    sink: &dyn DiagnosticSink,
) -> Result<NamedOutputStream, ResolveError>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut last_failure = None;
    for candidate in candidates {
        match File::create(&candidate) {
            Ok(file) => return Ok(output_stream(&candidate, name, file)),
            Err(err) => {
                debug!("Cannot create {}: {}", candidate.display(), err);
                last_failure = Some((candidate, err));
            }
        }
    }

    match last_failure {
        Some((path, source)) => Err(open_failure(&path, StreamKind::Output, source, sink)),
        None => Err(ResolveError::NotFound {
            name: name.file_name.clone(),
            last_candidate: PathBuf::from(&name.file_name),
        }),
    }
}

fn output_stream(path: &Path, name: &NormalizedName, file: File) -> NamedOutputStream {
    NamedOutputStream {
        file_name: name.file_name.clone(),
        path: path.to_path_buf(),
        writer: BufWriter::new(file),
    }
}

fn open_failure(
    path: &Path,
    kind: StreamKind,
    source: io::Error,
    sink: &dyn DiagnosticSink,
) -> ResolveError {
    sink.emit(
        Diagnostic::error(kind.code(), format!("internal error: Unable to create {}", kind))
            .with_path(path)
            .with_note(source.to_string()),
    );
    ResolveError::Open {
        path: path.to_path_buf(),
        kind,
        source,
    }
}
