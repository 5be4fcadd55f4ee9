//! Path resolution for config and history files

use std::path::PathBuf;

/// Resolves where askpane keeps its files (`~/.askpane` unless `ASKPANE_HOME` is set)
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    pub fn new() -> std::io::Result<Self> {
        if let Some(root) = std::env::var_os("ASKPANE_HOME").filter(|v| !v.is_empty()) {
            return Ok(Self::at(root));
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;
        Ok(Self::at(home.join(".askpane")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn history_file(&self) -> PathBuf {
        self.root.join("history.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_paths_default_root() {
        std::env::remove_var("ASKPANE_HOME");
        let paths = Paths::new().unwrap();
        assert!(paths.root.ends_with(".askpane"));
    }

    #[test]
    #[serial]
    fn test_paths_env_override() {
        let temp = tempfile::TempDir::new().unwrap();
        std::env::set_var("ASKPANE_HOME", temp.path());
        let paths = Paths::new().unwrap();
        assert_eq!(paths.root, temp.path());
        std::env::remove_var("ASKPANE_HOME");
    }

    #[test]
    fn test_file_names() {
        let paths = Paths::at("/tmp/askpane-test");
        assert!(paths.config_file().ends_with("config.json"));
        assert!(paths.history_file().ends_with("history.json"));
    }
}
