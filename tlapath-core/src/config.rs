// Resolver configuration - environment, tlapath.json, explicit values

use crate::error::ConfigError;
use crate::install;
use crate::platform::Platform;
use crate::search_path::SearchPath;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Path-list of user library directories
pub const LIBRARY_ENV: &str = "TLA_LIBRARY";

/// Logical current directory, distinct from the process working directory
pub const USER_DIR_ENV: &str = "TLA_USER_DIR";

/// Default config file name
pub const CONFIG_FILE_NAME: &str = "tlapath.json";

/// Immutable inputs of every lookup.
///
/// Built once and shared (usually behind an `Arc`); resolution never
/// mutates it, so a lookup is a pure function of the name and this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    search_path: SearchPath,
    user_dir: Option<PathBuf>,
}

impl ResolverConfig {
    pub fn new(search_path: SearchPath) -> Self {
        Self {
            search_path,
            user_dir: None,
        }
    }

    /// Set the working-directory override, probed ahead of every search path entry
    pub fn with_user_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(dir.into());
        self
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    pub fn user_dir(&self) -> Option<&Path> {
        self.user_dir.as_deref()
    }
}

/// On-disk and layered form of the configuration (tlapath.json)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Library directories, highest priority first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub library: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_dir: Option<PathBuf>,

    /// Overrides the discovered `<install>/StandardModules/`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_modules: Option<String>,
}

impl ConfigFile {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|source| ConfigError::Write {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }

    /// Layer read from `$TLA_LIBRARY` / `$TLA_USER_DIR`
    pub fn from_env() -> Self {
        Self::from_env_vars(
            std::env::var(LIBRARY_ENV).ok(),
            std::env::var_os(USER_DIR_ENV).map(PathBuf::from),
        )
    }

    pub fn from_env_vars(library: Option<String>, user_dir: Option<PathBuf>) -> Self {
        Self {
            library: library
                .map(|list| split_library_list(&list))
                .unwrap_or_default(),
            user_dir: user_dir.filter(|dir| !dir.as_os_str().is_empty()),
            standard_modules: None,
        }
    }

    /// Overlay `other` on `self`; fields set in `other` win
    pub fn merge(self, other: ConfigFile) -> ConfigFile {
        ConfigFile {
            library: if other.library.is_empty() {
                self.library
            } else {
                other.library
            },
            user_dir: other.user_dir.or(self.user_dir),
            standard_modules: other.standard_modules.or(self.standard_modules),
        }
    }

    /// Build the immutable config, discovering the standard modules directory if unset
    pub fn into_config(self) -> Result<ResolverConfig, ConfigError> {
        let standard_modules = match self.standard_modules {
            Some(dir) => dir,
            None => install::discover_standard_modules()?,
        };

        Ok(ResolverConfig {
            search_path: SearchPath::from_dirs(&self.library, &standard_modules),
            user_dir: self.user_dir,
        })
    }
}

/// Split a PATH-style list on the platform separator, dropping empty segments
pub fn split_library_list(list: &str) -> Vec<String> {
    split_library_list_with_platform(list, Platform::current())
}

pub fn split_library_list_with_platform(list: &str, platform: Platform) -> Vec<String> {
    list.split(platform.path_list_separator())
        .filter(|dir| !dir.is_empty())
        .map(str::to_string)
        .collect()
}
