//! Everything which touches the file system: configuration, module discovery and manifests.

use std::path::{Path, PathBuf};

use lang_utils::span::SpanManager;

use crate::module::Module;

pub mod config;
pub mod loader;
pub mod manifest;

/// Registers every module's source under its display name so bundle errors can be rendered.
pub fn register_sources(spans: &mut SpanManager, modules: &[Module]) {
    for module in modules {
        spans.add(module.file.clone(), module.source.clone());
    }
}

/// Formats `path` relative to the working directory when it lies inside of it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| cwd.canonicalize().ok())
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(PathBuf::from));

    match relative {
        Some(relative) => relative.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}
