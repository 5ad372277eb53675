use std::{
    collections::VecDeque,
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use glsl_tokens::{tokenize, TokenKind};
use link_utils::hash::FxHashSet;

use crate::{directive::Directive, driver::display_path, module::Module};

// === Loader === //

/// Discovers the module graph reachable from a set of entry files.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    include_dirs: Vec<PathBuf>,
}

impl Loader {
    pub fn new(include_dirs: Vec<PathBuf>) -> Self {
        Self { include_dirs }
    }

    /// Loads every entry and everything they import. Modules are keyed by their canonical path and
    /// come out entries first, then in the order they were discovered.
    ///
    /// Imports which can't be found on disk are left out of their module's `deps` so that
    /// bundling reports them against the offending directive.
    pub fn load(&self, entries: &[PathBuf]) -> anyhow::Result<Vec<Module>> {
        let mut modules = Vec::new();
        let mut seen = FxHashSet::default();
        let mut queue = VecDeque::new();

        for entry in entries {
            let path = entry
                .canonicalize()
                .with_context(|| format!("failed to find entry shader {entry:?}"))?;

            if seen.insert(path.clone()) {
                queue.push_back((path, true));
            }
        }

        while let Some((path, entry)) = queue.pop_front() {
            let source = fs::read_to_string(&path)
                .with_context(|| format!("failed to read shader at {path:?}"))?;

            let mut module = Module::new(path.to_string_lossy(), source)
                .with_file(display_path(&path));
            module.entry = entry;

            for import in import_paths(&module.source) {
                let Some(target) = self.resolve_import(&path, &import) else {
                    log::warn!("{}: could not find {import:?}", module.file);
                    continue;
                };

                module
                    .deps
                    .insert(import, target.to_string_lossy().into_owned());

                if seen.insert(target.clone()) {
                    queue.push_back((target, false));
                }
            }

            log::debug!("loaded {} ({} deps)", module.file, module.deps.len());
            modules.push(module);
        }

        Ok(modules)
    }

    /// Finds the file an import path refers to. Paths starting with `.` are relative to the
    /// importing file. Anything else is looked up in the include directories and then in the
    /// `node_modules` directories of the importing file's ancestors.
    pub fn resolve_import(&self, from: &Path, import: &str) -> Option<PathBuf> {
        let from_dir = from.parent().unwrap_or(Path::new("."));

        if import.starts_with('.') {
            return find_file(&from_dir.join(import));
        }

        self.include_dirs
            .iter()
            .map(|dir| dir.join(import))
            .chain(
                from_dir
                    .ancestors()
                    .map(|dir| dir.join("node_modules").join(import)),
            )
            .find_map(|candidate| find_file(&candidate))
    }
}

fn import_paths(source: &str) -> Vec<String> {
    tokenize(source)
        .into_iter()
        .filter(|token| token.kind == TokenKind::Preprocessor)
        .filter_map(|token| match Directive::parse(&token.data) {
            Directive::Import { path, .. } => Some(path),
            _ => None,
        })
        .collect()
}

/// Tries `base`, then `base.glsl`, then `base/index.glsl`.
fn find_file(base: &Path) -> Option<PathBuf> {
    let mut with_ext = OsString::from(base.as_os_str());
    with_ext.push(".glsl");

    [
        base.to_path_buf(),
        PathBuf::from(with_ext),
        base.join("index.glsl"),
    ]
    .into_iter()
    .find(|candidate| candidate.is_file())
    .and_then(|candidate| candidate.canonicalize().ok())
}
