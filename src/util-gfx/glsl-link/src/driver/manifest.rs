use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

use crate::module::Module;

// === Manifest === //

/// A module graph spelled out in TOML:
///
/// ```toml
/// [[module]]
/// id = "main"
/// file = "main.frag"
/// entry = true
/// deps = { "./noise" = "noise" }
///
/// [[module]]
/// id = "noise"
/// file = "noise.glsl"
/// source = "float noise(vec2 p) { return 0.0; }\n#pragma glslify: export(noise)"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestRoot {
    #[serde(rename = "module", default)]
    pub modules: Vec<ManifestModule>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestModule {
    pub id: String,
    pub file: String,

    /// Inline source. When absent, the source is read from `file`.
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub entry: bool,

    #[serde(default)]
    pub deps: BTreeMap<String, String>,
}

impl ManifestRoot {
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("failed to parse module manifest")
    }

    /// Builds the module list, reading sources which weren't given inline from files relative to
    /// `base_dir`.
    pub fn into_modules(self, base_dir: &Path) -> anyhow::Result<Vec<Module>> {
        self.modules
            .into_iter()
            .map(|desc| {
                let source = match desc.source {
                    Some(source) => source,
                    None => {
                        let path = base_dir.join(&desc.file);
                        fs::read_to_string(&path).with_context(|| {
                            format!("failed to read source of module {:?} at {path:?}", desc.id)
                        })?
                    }
                };

                let mut module = Module::new(desc.id, source).with_file(desc.file);
                module.entry = desc.entry;
                module.deps.extend(desc.deps);

                Ok(module)
            })
            .collect()
    }
}

pub fn load_manifest(path: &Path) -> anyhow::Result<Vec<Module>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read module manifest {path:?}"))?;

    let base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    ManifestRoot::parse(&text)
        .and_then(|manifest| manifest.into_modules(&base_dir))
        .with_context(|| format!("in module manifest {path:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{bundle, BundleOptions};

    const MANIFEST: &str = r#"
        [[module]]
        id = "a"
        file = "a.frag"
        entry = true
        deps = { "./b" = "b" }
        source = """
#pragma glslify: foo = require('./b')
float main(){ return foo(1.0); }"""

        [[module]]
        id = "b"
        file = "b.glsl"
    "#;

    #[test]
    fn loads_inline_and_file_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("b.glsl"),
            "#pragma glslify: export(foo)\nfloat foo(float x){ return x*2.0; }",
        )
        .unwrap();

        let path = dir.path().join("shaders.toml");
        fs::write(&path, MANIFEST).unwrap();

        let modules = load_manifest(&path).unwrap();
        assert_eq!(modules.len(), 2);
        assert!(modules[0].entry);
        assert_eq!(modules[0].file, "a.frag");
        assert_eq!(modules[0].deps["./b"], "b");

        assert_eq!(
            bundle(modules, &BundleOptions::default()).unwrap(),
            "#define GLSLIFY 1\n\
             float foo_808595181(float x){ return x*2.0; }\n\
             float main(){ return foo_808595181(1.0); }"
        );
    }

    #[test]
    fn reports_missing_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shaders.toml");
        fs::write(&path, MANIFEST).unwrap();

        let err = load_manifest(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to read source of module \"b\""));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(ManifestRoot::parse("[[module]]\nid = \"a\"\nfile = \"a\"\nentri = true").is_err());
    }
}
