use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

use crate::bundle::BundleOptions;

pub const CONFIG_FILE_NAME: &str = "glsl-link.toml";

// === Config === //

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfRoot {
    pub trim: bool,

    /// Directories searched for imports which aren't relative paths. Relative entries are
    /// interpreted relative to the config file.
    pub include_dirs: Vec<PathBuf>,

    pub defines: BTreeMap<String, toml::Value>,
}

impl Default for ConfRoot {
    fn default() -> Self {
        Self {
            trim: true,
            include_dirs: Vec::new(),
            defines: BTreeMap::new(),
        }
    }
}

impl ConfRoot {
    pub fn parse(text: &str, base_dir: &Path) -> anyhow::Result<Self> {
        let mut conf = toml::from_str::<Self>(text).context("failed to parse config file")?;

        for dir in &mut conf.include_dirs {
            if dir.is_relative() {
                *dir = base_dir.join(&*dir);
            }
        }

        Ok(conf)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path:?}"))?;

        let base_dir = path
            .canonicalize()
            .with_context(|| format!("failed to canonicalize path to config file {path:?}"))?
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Self::parse(&text, &base_dir).with_context(|| format!("in config file {path:?}"))
    }

    /// Loads the config at `path` or, when no path is given, the [`CONFIG_FILE_NAME`] file in the
    /// working directory if there is one.
    pub fn discover(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let default_path = Path::new(CONFIG_FILE_NAME);
        if default_path.is_file() {
            log::info!("using config file {CONFIG_FILE_NAME}");
            return Self::load(default_path);
        }

        Ok(Self::default())
    }

    pub fn bundle_options(&self) -> BundleOptions {
        BundleOptions {
            trim: self.trim,
            defines: self
                .defines
                .iter()
                .map(|(name, value)| (name.clone(), define_value(value)))
                .collect(),
        }
    }
}

fn define_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(value) => value.clone(),
        toml::Value::Boolean(value) => u8::from(*value).to_string(),
        value => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let conf = ConfRoot::parse("", Path::new("/shaders")).unwrap();
        assert!(conf.trim);
        assert!(conf.include_dirs.is_empty());

        let options = conf.bundle_options();
        assert!(options.trim);
        assert!(options.defines.is_empty());
    }

    #[test]
    fn parses_options() {
        let conf = ConfRoot::parse(
            r#"
            trim = false
            include_dirs = ["lib", "/abs/lib"]

            [defines]
            QUALITY = "high"
            PI = 3.5
            STEPS = 4
            SHADOWS = true
            "#,
            Path::new("/shaders"),
        )
        .unwrap();

        assert_eq!(
            conf.include_dirs,
            [PathBuf::from("/shaders/lib"), PathBuf::from("/abs/lib")]
        );

        let options = conf.bundle_options();
        assert!(!options.trim);
        assert_eq!(
            options.defines,
            [
                ("PI".to_string(), "3.5".to_string()),
                ("QUALITY".to_string(), "high".to_string()),
                ("SHADOWS".to_string(), "1".to_string()),
                ("STEPS".to_string(), "4".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(ConfRoot::parse("trimm = true", Path::new(".")).is_err());
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "include_dirs = [\"vendor\"]\n").unwrap();

        let conf = ConfRoot::load(&path).unwrap();
        assert_eq!(
            conf.include_dirs,
            [dir.path().canonicalize().unwrap().join("vendor")]
        );

        assert!(ConfRoot::load(&dir.path().join("missing.toml")).is_err());
    }
}
