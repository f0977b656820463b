// Installation base discovery
// Locates the directory holding StandardModules/ for the running tool

use crate::error::ConfigError;
use crate::platform::Platform;
use std::path::{Path, PathBuf};

/// Environment variable naming the installation base explicitly
pub const HOME_ENV: &str = "TLA_HOME";

/// Directory under the installation base holding the standard modules
pub const STANDARD_MODULES_DIR: &str = "StandardModules";

/// Find the installation base.
///
/// Order: `$TLA_HOME`, the directory of the running executable, then
/// `<data_dir>/tlapath`.
pub fn installation_base() -> Result<PathBuf, ConfigError> {
    let home = std::env::var_os(HOME_ENV).map(PathBuf::from);
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let data_dir = dirs::data_dir().map(|dir| dir.join("tlapath"));

    installation_base_from(home, exe_dir, data_dir)
}

/// First available source, in priority order
pub fn installation_base_from(
    home: Option<PathBuf>,
    exe_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    home.filter(|p| !p.as_os_str().is_empty())
        .or(exe_dir)
        .or(data_dir)
        .ok_or(ConfigError::InstallationBase)
}

/// `<base>/StandardModules/`, with `/` translated to the platform separator
pub fn standard_modules_dir(base: &Path) -> String {
    standard_modules_dir_with_platform(base, Platform::current())
}

pub fn standard_modules_dir_with_platform(base: &Path, platform: Platform) -> String {
    let base = platform.translate_separators(&base.to_string_lossy());
    let base = platform.with_trailing_separator(&base);
    platform.with_trailing_separator(&format!("{}{}", base, STANDARD_MODULES_DIR))
}

/// Standard modules directory of the running installation
pub fn discover_standard_modules() -> Result<String, ConfigError> {
    let base = installation_base()?;
    log::debug!("Installation base path = {}", base.display());
    Ok(standard_modules_dir(&base))
}
