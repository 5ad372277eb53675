use std::ops::Range;

use glsl_tokens::Token;
use link_utils::hash::FxHashMap;
use smallvec::SmallVec;

use crate::graph::ModuleIndex;

// === Module === //

/// A shader module as provided by the caller.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Module {
    /// Unique key of the module within a bundle.
    pub id: String,

    /// Name of the module's file, used in diagnostics.
    pub file: String,

    pub source: String,

    /// Maps import paths as written in `require(...)` to module ids.
    pub deps: FxHashMap<String, String>,

    /// Whether the module is emitted directly rather than only when it is imported.
    pub entry: bool,
}

impl Module {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        let id = id.into();

        Self {
            file: id.clone(),
            id,
            source: source.into(),
            deps: FxHashMap::default(),
            entry: false,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_dep(mut self, path: impl Into<String>, id: impl Into<String>) -> Self {
        self.deps.insert(path.into(), id.into());
        self
    }

    pub fn as_entry(mut self) -> Self {
        self.entry = true;
        self
    }
}

// === Binding === //

/// Substitutes `actual` for every use of the module-scoped name `formal` in an imported module.
///
/// Ordering is by formal name then by actual name, which is how binding lists are canonicalized.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Binding {
    pub formal: String,
    pub actual: String,
}

impl Binding {
    pub fn new(formal: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            formal: formal.into(),
            actual: actual.into(),
        }
    }
}

pub type BindingList = SmallVec<[Binding; 2]>;

// === ParsedModule === //

/// A module with its directives stripped. Shared by every instantiation of the module.
#[derive(Debug, Clone)]
pub struct ParsedModule {
    pub tokens: Vec<Token>,
    pub imports: Vec<ImportDirective>,
    pub export: String,
}

#[derive(Debug, Clone)]
pub struct ImportDirective {
    /// The name under which the importing module refers to the import's export.
    pub alias: String,

    /// The path as written in the directive, without quotes.
    pub path: String,

    pub target: ModuleIndex,
    pub bindings: BindingList,

    /// Index into [`ParsedModule::tokens`] at which the directive was removed.
    pub position: usize,

    /// Byte range of the directive in the module's source.
    pub span: Range<usize>,
}
