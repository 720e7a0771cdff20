use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::{bail, Context, Result};
use log::warn;
use serde::de::DeserializeOwned;

use crate::dirs::{ensure_dir_exists, ensure_private_dir};

pub struct PathSet {
    pub config_path: PathBuf,
    pub data_path: PathBuf,
    pub pki_path: PathBuf,
}

impl PathSet {
    pub fn new(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        let is_root = unsafe { libc::geteuid() == 0 };

        let config_path = if let Some(path) = config_path {
            path
        } else if let Ok(path) = env::var("ORGDASH_CONFIG") {
            PathBuf::from(path)
        } else if is_root {
            PathBuf::from("/etc/orgdash")
        } else {
            Self::home_dir()?.join(".config").join("orgdash")
        };

        let data_path = if let Some(path) = data_path {
            path
        } else if let Ok(path) = env::var("ORGDASH_DATA") {
            PathBuf::from(path)
        } else if is_root {
            PathBuf::from("/var/lib/orgdash")
        } else {
            Self::home_dir()?.join(".local").join("share").join("orgdash")
        };

        let pki_path = config_path.join("pki");

        ensure_dir_exists(&config_path)
            .with_context(|| format!("ensure config directory: {}", config_path.display()))?;
        ensure_dir_exists(&data_path)
            .with_context(|| format!("ensure data directory: {}", data_path.display()))?;
        ensure_private_dir(&pki_path)
            .with_context(|| format!("ensure pki directory: {}", pki_path.display()))?;

        Ok(Self {
            config_path,
            data_path,
            pki_path,
        })
    }

    /// Reads `{name}.toml` from the config directory, falling back to `default_func`
    /// when the file is missing, then completes the result.
    pub fn load_config<T, F>(&self, name: &str, default_func: F) -> Result<T>
    where
        T: CommonConfig + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let path = self.config_path.join(format!("{name}.toml"));
        let mut cfg: T = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)
                .with_context(|| format!("parse config toml: {}", path.display()))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                warn!("Config file for {name} not found, using defaults");
                default_func()
            }
            Err(err) => {
                return Err(err).context(format!("read config file: {}", path.display()));
            }
        };

        cfg.complete(self).context("validate config")?;
        Ok(cfg)
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        Self {
            config_path: PathBuf::from("_test_orgdash/config"),
            data_path: PathBuf::from("_test_orgdash/data"),
            pki_path: PathBuf::from("_test_orgdash/config/pki"),
        }
    }

    fn home_dir() -> Result<PathBuf> {
        let dir = env::var_os("HOME")
            .or_else(|| env::var_os("USERPROFILE"))
            .map(PathBuf::from);
        match dir {
            Some(dir) => Ok(dir),
            None => {
                bail!("could not determine home directory, please specify config path manually")
            }
        }
    }
}

pub trait CommonConfig {
    fn default() -> Self;
    fn complete(&mut self, ps: &PathSet) -> Result<()>;
}

/// See: [`shellexpand::full`].
pub fn expandenv(name: &str, s: impl AsRef<str>) -> Result<String> {
    let s =
        shellexpand::full(s.as_ref()).with_context(|| format!("expand env value for '{name}'"))?;
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expandenv() {
        env::set_var("ORGDASH_TEST_EXPAND", "/srv/orgdash");
        let value = expandenv("path", "${ORGDASH_TEST_EXPAND}/server.db").unwrap();
        assert_eq!(value, "/srv/orgdash/server.db");

        let value = expandenv("bind", "127.0.0.1:8080").unwrap();
        assert_eq!(value, "127.0.0.1:8080");

        assert!(expandenv("path", "${ORGDASH_TEST_UNDEFINED_VAR}").is_err());
    }
}
