//! YAML loader with `!include`, `!secret` and `!env_var` support

use crate::error::{ConfigError, ConfigResult};
use crate::secrets::Secrets;
use serde_yaml::value::TaggedValue;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// YAML loader resolving the bridge's custom tags
pub struct YamlLoader {
    config_dir: PathBuf,
    secrets: Secrets,
    /// Files currently being loaded, outermost first
    include_stack: Vec<PathBuf>,
}

impl YamlLoader {
    /// Create a loader for the given config directory, loading its secrets
    pub fn new(config_dir: impl Into<PathBuf>) -> ConfigResult<Self> {
        let config_dir = config_dir.into();
        let secrets = Secrets::load(&config_dir)?;
        Ok(Self::with_secrets(config_dir, secrets))
    }

    /// Create a loader with pre-loaded secrets
    pub fn with_secrets(config_dir: impl Into<PathBuf>, secrets: Secrets) -> Self {
        Self {
            config_dir: config_dir.into(),
            secrets,
            include_stack: Vec::new(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    /// Load a file relative to the config directory and resolve its tags
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<Value> {
        let path = absolutize(&self.config_dir, path.as_ref());
        debug!("Loading YAML file: {:?}", path);

        if self.include_stack.contains(&path) {
            return Err(ConfigError::CircularInclude { path });
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::ReadFile {
            path: path.clone(),
            source: e,
        })?;

        self.include_stack.push(path.clone());
        let result = self.load_str(&content, &path);
        self.include_stack.pop();

        result
    }

    /// Parse YAML text and resolve its tags
    ///
    /// `source_path` is used for error messages and to resolve relative
    /// `!include` paths.
    pub fn load_str(&mut self, content: &str, source_path: &Path) -> ConfigResult<Value> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseYaml {
            path: source_path.to_path_buf(),
            source: e,
        })?;

        self.resolve(value, source_path)
    }

    fn resolve(&mut self, value: Value, source_path: &Path) -> ConfigResult<Value> {
        match value {
            Value::Tagged(tagged) => self.resolve_tag(*tagged, source_path),
            Value::Mapping(map) => {
                let mut resolved = Mapping::with_capacity(map.len());
                for (key, value) in map {
                    resolved.insert(key, self.resolve(value, source_path)?);
                }
                Ok(Value::Mapping(resolved))
            }
            Value::Sequence(seq) => seq
                .into_iter()
                .map(|v| self.resolve(v, source_path))
                .collect::<ConfigResult<Vec<_>>>()
                .map(Value::Sequence),
            other => Ok(other),
        }
    }

    fn resolve_tag(&mut self, tagged: TaggedValue, source_path: &Path) -> ConfigResult<Value> {
        let tag = tagged.tag.to_string();
        trace!("Resolving tag '{}' with value {:?}", tag, tagged.value);

        match tag.as_str() {
            "!include" => {
                let target = tag_argument(&tag, &tagged.value)?;
                if target.is_empty() {
                    return Err(ConfigError::InvalidIncludePath {
                        path: target.to_string(),
                        reason: "path is empty".to_string(),
                    });
                }
                let base = source_path.parent().unwrap_or(&self.config_dir);
                let path = absolutize(base, Path::new(target));
                debug!("Including file: {:?}", path);
                self.load_file(path)
            }
            "!secret" => {
                let key = tag_argument(&tag, &tagged.value)?;
                let secret = self.secrets.get(key)?;
                debug!("Substituted secret: {}", key);
                Ok(Value::String(secret.to_string()))
            }
            "!env_var" => {
                let var = tag_argument(&tag, &tagged.value)?;
                let value = std::env::var(var).map_err(|_| ConfigError::EnvVarNotFound {
                    var: var.to_string(),
                })?;
                debug!("Substituted env var: {}", var);
                Ok(Value::String(value))
            }
            _ => {
                let value = self.resolve(tagged.value, source_path)?;
                Ok(Value::Tagged(Box::new(TaggedValue {
                    tag: tagged.tag,
                    value,
                })))
            }
        }
    }
}

/// Load a YAML file from a config directory with full tag resolution
pub fn load_yaml(config_dir: impl Into<PathBuf>, file: impl AsRef<Path>) -> ConfigResult<Value> {
    YamlLoader::new(config_dir)?.load_file(file)
}

fn tag_argument<'a>(tag: &str, value: &'a Value) -> ConfigResult<&'a str> {
    value.as_str().ok_or_else(|| ConfigError::InvalidValue {
        key: tag.to_string(),
        reason: "argument must be a string".to_string(),
    })
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn get<'a>(value: &'a Value, key: &str) -> &'a Value {
        value
            .as_mapping()
            .and_then(|m| m.get(&Value::String(key.to_string())))
            .unwrap()
    }

    #[test]
    fn test_load_plain_yaml() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "config.yaml",
            r#"
bridge:
  name: Homebridge
accessories:
  - accessory: MedionVacuumCleaner
    name: Robot
"#,
        );

        let value = load_yaml(dir.path(), "config.yaml").unwrap();
        assert_eq!(get(&value, "accessories").as_sequence().unwrap().len(), 1);
    }

    #[test]
    fn test_include_is_relative_to_including_file() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "accessories/vacuum.yaml",
            "accessory: MedionVacuumCleaner\nname: Robot\n",
        );
        write_file(
            dir.path(),
            "accessories/all.yaml",
            "- !include vacuum.yaml\n",
        );
        write_file(
            dir.path(),
            "config.yaml",
            "accessories: !include accessories/all.yaml\n",
        );

        let value = load_yaml(dir.path(), "config.yaml").unwrap();
        let accessories = get(&value, "accessories").as_sequence().unwrap();
        assert_eq!(get(&accessories[0], "name"), &Value::String("Robot".into()));
    }

    #[test]
    fn test_secret() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "secrets.yaml",
            "vacuum_status: http://10.0.0.5/status\n",
        );
        write_file(
            dir.path(),
            "config.yaml",
            "statusUrl: !secret vacuum_status\n",
        );

        let value = load_yaml(dir.path(), "config.yaml").unwrap();
        assert_eq!(
            get(&value, "statusUrl"),
            &Value::String("http://10.0.0.5/status".to_string())
        );
    }

    #[test]
    fn test_missing_secret() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "secrets.yaml", "existing: value\n");
        write_file(dir.path(), "config.yaml", "statusUrl: !secret nonexistent\n");

        let result = load_yaml(dir.path(), "config.yaml");
        assert!(matches!(result, Err(ConfigError::SecretNotFound { .. })));
    }

    #[test]
    fn test_env_var() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("HB_CONFIG_TEST_CLEAN_URL", "http://10.0.0.5/clean");
        write_file(
            dir.path(),
            "config.yaml",
            "cleanUrl: !env_var HB_CONFIG_TEST_CLEAN_URL\n",
        );

        let value = load_yaml(dir.path(), "config.yaml").unwrap();
        assert_eq!(
            get(&value, "cleanUrl"),
            &Value::String("http://10.0.0.5/clean".to_string())
        );

        std::env::remove_var("HB_CONFIG_TEST_CLEAN_URL");
    }

    #[test]
    fn test_missing_env_var() {
        let dir = TempDir::new().unwrap();
        write_file(
            dir.path(),
            "config.yaml",
            "cleanUrl: !env_var HB_CONFIG_TEST_DEFINITELY_UNSET\n",
        );

        let result = load_yaml(dir.path(), "config.yaml");
        assert!(matches!(result, Err(ConfigError::EnvVarNotFound { .. })));
    }

    #[test]
    fn test_circular_include_detection() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.yaml", "b: !include b.yaml\n");
        write_file(dir.path(), "b.yaml", "a: !include a.yaml\n");

        let result = load_yaml(dir.path(), "a.yaml");
        assert!(matches!(result, Err(ConfigError::CircularInclude { .. })));
    }

    #[test]
    fn test_same_file_included_twice_is_not_circular() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "shared.yaml", "value: 1\n");
        write_file(
            dir.path(),
            "config.yaml",
            "first: !include shared.yaml\nsecond: !include shared.yaml\n",
        );

        assert!(load_yaml(dir.path(), "config.yaml").is_ok());
    }

    #[test]
    fn test_unknown_tag_is_kept() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "config.yaml", "value: !custom thing\n");

        let value = load_yaml(dir.path(), "config.yaml").unwrap();
        assert!(matches!(get(&value, "value"), Value::Tagged(_)));
    }

    #[test]
    fn test_non_string_tag_argument() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "config.yaml", "value: !secret [a, b]\n");

        let result = load_yaml(dir.path(), "config.yaml");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }
}
