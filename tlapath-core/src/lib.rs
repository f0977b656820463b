//! tlapath - resolves TLA+ module names against an ordered library path
//!
//! A name such as `Foo` is normalized to `Foo.tla`, searched for in the
//! working-directory override (or the current directory), then in each
//! library directory, then in the installation's `StandardModules/`.
//! The first file that exists is opened as a stream tagged with the file
//! and module name that requested it.

pub mod config;
pub mod error;
pub mod install;
pub mod locate;
pub mod name;
pub mod platform;
pub mod resolver;
pub mod search_path;
pub mod stream;

pub use config::{split_library_list, ConfigFile, ResolverConfig, CONFIG_FILE_NAME, LIBRARY_ENV, USER_DIR_ENV};
pub use error::{ConfigError, ResolveError};
pub use install::{discover_standard_modules, installation_base, STANDARD_MODULES_DIR};
pub use locate::{candidates, locate, locate_with};
pub use name::{normalize, NormalizedName, MODULE_EXTENSION};
pub use platform::Platform;
pub use resolver::{FilenameToStream, LibraryResolver, Resolved};
pub use search_path::SearchPath;
pub use stream::{NamedInputStream, NamedOutputStream, StreamKind};
pub use tlapath_diagnostics as diagnostics;
