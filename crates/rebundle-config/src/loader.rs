//! Configuration Loader
//!
//! Locates `rebundle.toml`, loads it, and applies environment overrides.

use crate::project::{ProjectConfig, CONFIG_FILE_NAME};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader
///
/// Precedence, lowest first:
/// 1. Project config (./rebundle.toml)
/// 2. Environment variables (REBUNDLE_*)
/// 3. CLI flags (handled by caller)
pub struct ConfigLoader {
    /// File name searched for while walking up
    file_name: String,
}

/// Loaded configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Directory all configured paths are relative to
    pub project_root: PathBuf,

    /// File the configuration was read from
    pub config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            file_name: CONFIG_FILE_NAME.to_string(),
        }
    }

    /// Search for a different file name
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to the first directory holding the config
    /// file; that directory becomes the project root. A relative start is
    /// taken from the current directory.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let start_dir = if start_dir.is_absolute() {
            start_dir.to_path_buf()
        } else {
            env::current_dir()?.join(start_dir)
        };
        let config_path = self
            .find_config_file(&start_dir)
            .ok_or_else(|| ConfigError::NotFound(start_dir.join(&self.file_name)))?;
        self.load_from_file(&config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = apply_env_overrides(project);

        let project_root = match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Config {
            project,
            project_root,
            config_path: config_path.to_path_buf(),
        })
    }

    fn find_config_file(&self, start_dir: &Path) -> Option<PathBuf> {
        start_dir
            .ancestors()
            .map(|dir| dir.join(&self.file_name))
            .find(|candidate| candidate.is_file())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply REBUNDLE_* environment overrides to a loaded project config
fn apply_env_overrides(mut config: ProjectConfig) -> ProjectConfig {
    if let Ok(record) = env::var("REBUNDLE_RECORD") {
        if !record.is_empty() {
            config.bundle.record = Some(PathBuf::from(record));
        }
    }

    if let Ok(artifact) = env::var("REBUNDLE_ARTIFACT") {
        if !artifact.is_empty() {
            config.bundle.artifact = PathBuf::from(artifact);
        }
    }

    if let Ok(hidden) = env::var("REBUNDLE_EXCLUDE_HIDDEN") {
        config.inputs.exclude_hidden = is_truthy(&hidden);
    }

    config
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    /// Resolve a configured path against the project root
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    /// Absolute-or-root-relative artifact path
    pub fn artifact_path(&self) -> PathBuf {
        self.resolve(&self.project.bundle.artifact)
    }

    /// Absolute-or-root-relative record path
    pub fn record_path(&self) -> PathBuf {
        self.resolve(&self.project.record_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    const BASIC: &str = r#"
[bundle]
artifact = "dist/app.js"

[inputs]
roots = ["src"]

[[steps]]
name = "build"
program = "make"
"#;

    fn create_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn clear_env() {
        env::remove_var("REBUNDLE_RECORD");
        env::remove_var("REBUNDLE_ARTIFACT");
        env::remove_var("REBUNDLE_EXCLUDE_HIDDEN");
    }

    #[test]
    #[serial]
    fn test_load_from_project_root() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), BASIC);

        let config = ConfigLoader::new()
            .load_from_directory(temp_dir.path())
            .unwrap();

        assert_eq!(config.project_root, temp_dir.path());
        assert_eq!(config.artifact_path(), temp_dir.path().join("dist/app.js"));
        assert_eq!(
            config.record_path(),
            temp_dir.path().join("dist/.bundle.hash")
        );
    }

    #[test]
    #[serial]
    fn test_walks_up_from_subdirectory() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), BASIC);
        let nested = temp_dir.path().join("src/deep/er");
        fs::create_dir_all(&nested).unwrap();

        let config = ConfigLoader::new().load_from_directory(&nested).unwrap();

        assert_eq!(config.project_root, temp_dir.path());
        assert_eq!(config.config_path, temp_dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    #[serial]
    fn test_relative_start_walks_above_current_dir() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        create_config_file(temp_dir.path(), BASIC);
        let nested = temp_dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        let previous = env::current_dir().unwrap();
        env::set_current_dir(temp_dir.path().join("a")).unwrap();
        let result = ConfigLoader::new().load_from_directory(Path::new("b"));
        env::set_current_dir(previous).unwrap();

        let config = result.unwrap();
        assert_eq!(
            fs::canonicalize(&config.project_root).unwrap(),
            fs::canonicalize(temp_dir.path()).unwrap()
        );
    }

    #[test]
    #[serial]
    fn test_not_found_when_no_config() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let err = ConfigLoader::new()
            .with_file_name("rebundle-test-absent.toml")
            .load_from_directory(temp_dir.path())
            .unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    #[serial]
    fn test_custom_file_name() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bundle.toml"), BASIC).unwrap();

        let config = ConfigLoader::new()
            .with_file_name("bundle.toml")
            .load_from_directory(temp_dir.path())
            .unwrap();

        assert_eq!(config.project.steps[0].name, "build");
    }

    #[test]
    #[serial]
    fn test_env_overrides_record_and_artifact() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = create_config_file(temp_dir.path(), BASIC);

        env::set_var("REBUNDLE_RECORD", "cache/hash.txt");
        env::set_var("REBUNDLE_ARTIFACT", "out/other.js");
        let config = ConfigLoader::new().load_from_file(&path).unwrap();
        clear_env();

        assert_eq!(config.record_path(), temp_dir.path().join("cache/hash.txt"));
        assert_eq!(config.artifact_path(), temp_dir.path().join("out/other.js"));
    }

    #[rstest]
    #[case("1", true)]
    #[case("true", true)]
    #[case("YES", true)]
    #[case("0", false)]
    #[case("off", false)]
    #[serial]
    fn test_env_exclude_hidden(#[case] value: &str, #[case] expected: bool) {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = create_config_file(temp_dir.path(), BASIC);

        env::set_var("REBUNDLE_EXCLUDE_HIDDEN", value);
        let config = ConfigLoader::new().load_from_file(&path).unwrap();
        clear_env();

        assert_eq!(config.project.inputs.exclude_hidden, expected);
    }

    #[test]
    #[serial]
    fn test_absolute_paths_are_kept() {
        clear_env();
        let temp_dir = TempDir::new().unwrap();
        let path = create_config_file(temp_dir.path(), BASIC);
        let config = ConfigLoader::new().load_from_file(&path).unwrap();

        let absolute = temp_dir.path().join("elsewhere");
        assert_eq!(config.resolve(&absolute), absolute);
    }

    #[test]
    fn test_bare_file_name_resolves_to_current_dir() {
        let project = ProjectConfig::from_toml_str(BASIC, Path::new(CONFIG_FILE_NAME)).unwrap();
        let config = Config {
            project,
            project_root: PathBuf::from("."),
            config_path: PathBuf::from(CONFIG_FILE_NAME),
        };
        assert_eq!(config.artifact_path(), PathBuf::from("./dist/app.js"));
    }
}
