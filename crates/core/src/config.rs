//! Location and first-run initialisation of the lemonade config file.
//!
//! The config file is a TOML document whose keys mirror the command-line flag
//! names. It is created with commented-out examples the first time it is
//! looked up; afterwards it is never written to.

use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, Result};

/// Default path for the lemonade config file
pub const DEFAULT_CONFIG_PATH: &str = "~/.config/lemonade.toml";

#[cfg(windows)]
const CONFIG_TEMPLATE: &str = "#port=2489\r\n#allow=\"127.0.0.1,::1\"\r\n#line-ending=\"crlf\"\r\n";
#[cfg(not(windows))]
const CONFIG_TEMPLATE: &str = "#port=2489\n#allow=\"127.0.0.1,::1\"\n#line-ending=\"lf\"\n";

/// Resolves the config file path and makes sure the file exists.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    path_template: String,
    home: Option<String>,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIG_PATH)
    }
}

impl ConfigResolver {
    /// Creates a resolver that expands `path_template` against the current
    /// user's home directory.
    pub fn new(path_template: impl Into<String>) -> Self {
        Self {
            path_template: path_template.into(),
            home: None,
        }
    }

    /// Creates a resolver that expands `~` in `path_template` to `home`
    /// instead of the current user's home directory.
    pub fn with_home(path_template: impl Into<String>, home: impl AsRef<Path>) -> Self {
        Self {
            path_template: path_template.into(),
            home: Some(home.as_ref().to_string_lossy().into_owned()),
        }
    }

    /// Expands the path template without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHome`] if the template starts with `~` and no home
    /// directory is available.
    pub fn expand(&self) -> Result<PathBuf> {
        let expanded = match &self.home {
            Some(home) => shellexpand::tilde_with_context(&self.path_template, || Some(home)),
            None => shellexpand::tilde(&self.path_template),
        };

        if expanded.starts_with('~') {
            return Err(Error::NoHome(self.path_template.clone()));
        }

        Ok(PathBuf::from(expanded.as_ref()))
    }

    /// Returns the config file path, creating the file with commented-out
    /// defaults if it does not exist yet.
    ///
    /// Problems opening or creating the file are logged and otherwise ignored;
    /// the caller finds out when it tries to read the file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHome`] if the home directory cannot be determined.
    ///
    /// # Examples
    ///
    /// ```
    /// use lemonade_core::config::ConfigResolver;
    ///
    /// let home = tempfile::tempdir()?;
    /// let path = ConfigResolver::with_home("~/.config/lemonade.toml", home.path()).locate()?;
    /// assert!(path.exists());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn locate(&self) -> Result<PathBuf> {
        let path = self.expand()?;
        debug!("Config path: `{}`", path.display());

        match File::open(&path) {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Err(e) = initialize(&path) {
                    warn!("{e}");
                }
            }
            Err(e) => debug!("Could not open config file at `{}`: {e}", path.display()),
        }

        Ok(path)
    }
}

fn initialize(path: &Path) -> Result<()> {
    let io_error = |e| Error::io_error("config".to_string(), path.display().to_string(), e);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, CONFIG_TEMPLATE).map_err(io_error)?;
    debug!("Created config file at `{}`", path.display());

    Ok(())
}
