use std::fmt::Write as _;

use glsl_tokens::{descope, Token};
use link_utils::{
    hash::{murmur3_str, FxHashMap, FxHashSet},
    newtypes::IndexVec,
};

use crate::{
    graph::{ModuleGraph, ModuleIndex},
    module::{Binding, BindingList, ImportDirective, ParsedModule},
};

// === Resolver === //

/// One instantiation of a module.
#[derive(Debug, Clone, Default)]
pub struct Resolved {
    /// The name under which the instantiation's export can be referenced.
    pub name: String,

    /// The instantiation's tokens with its imports spliced in. Empty when the instantiation was
    /// already emitted earlier in the run.
    pub tokens: Vec<Token>,
}

/// Instantiates modules against binding lists. A resolver lives for exactly one bundle run and
/// emits every distinct instantiation at most once during that run.
#[derive(Debug)]
pub struct Resolver<'a> {
    graph: &'a ModuleGraph,
    parsed: &'a IndexVec<ModuleIndex, ParsedModule>,

    /// Names of the instantiations emitted so far.
    resolved: FxHashSet<String>,
}

#[derive(Debug)]
struct Frame {
    module: ModuleIndex,
    suffix: String,
    name: String,

    /// Maps module-scoped names to their replacements. Starts out as the caller's bindings and
    /// picks up every import alias as the imports are resolved.
    rename: FxHashMap<String, String>,

    /// Index of the import currently being resolved.
    next_import: usize,

    /// Resolved imports, keyed by their import index.
    edits: Vec<(usize, Vec<Token>)>,
}

enum Entered {
    Emitted(String),
    Fresh(Frame),
}

impl<'a> Resolver<'a> {
    pub fn new(graph: &'a ModuleGraph, parsed: &'a IndexVec<ModuleIndex, ParsedModule>) -> Self {
        Self {
            graph,
            parsed,
            resolved: FxHashSet::default(),
        }
    }

    pub fn is_emitted(&self, name: &str) -> bool {
        self.resolved.contains(name)
    }

    /// Resolves `module` with `bindings` applied, resolving its imports first.
    ///
    /// Imports are walked with an explicit stack of in-progress instantiations. The module graph
    /// must be acyclic, which [`ModuleGraph::toposort`] checks.
    pub fn resolve(&mut self, module: ModuleIndex, bindings: &[Binding]) -> Resolved {
        let parsed = self.parsed;

        let mut stack = match self.enter(module, bindings.iter().cloned().collect()) {
            Entered::Emitted(name) => return Resolved { name, tokens: Vec::new() },
            Entered::Fresh(frame) => vec![frame],
        };

        while let Some(frame) = stack.last_mut() {
            if let Some(import) = parsed[frame.module].imports.get(frame.next_import) {
                let bindings = frame.bindings_for(import);

                match self.enter(import.target, bindings) {
                    Entered::Emitted(name) => frame.complete_import(import, name, Vec::new()),
                    Entered::Fresh(child) => stack.push(child),
                }

                continue;
            }

            let Some(frame) = stack.pop() else {
                break;
            };

            let done = self.finish(frame);

            match stack.last_mut() {
                Some(parent) => {
                    let import = &parsed[parent.module].imports[parent.next_import];
                    parent.complete_import(import, done.name, done.tokens);
                }
                None => return done,
            }
        }

        unreachable!("resolver stack emptied without producing the root instantiation");
    }

    fn enter(&mut self, module: ModuleIndex, mut bindings: BindingList) -> Entered {
        let desc = self.graph.module(module);
        let parsed = &self.parsed[module];

        bindings.sort();

        let suffix = if desc.entry {
            String::new()
        } else {
            // Keys are hashed as UTF-8, so suffixes for non-ASCII ids or bindings differ from
            // tools which hash UTF-16 code units truncated to a byte.
            format!("_{}", murmur3_str(&instance_key(&bindings, &desc.id)))
        };

        let name = format!("{}{suffix}", parsed.export);

        if self.resolved.contains(&name) {
            log::trace!("{} is already emitted as `{name}`", desc.file);
            return Entered::Emitted(name);
        }

        log::trace!(
            "instantiating {} as `{name}` with {} binding(s)",
            desc.file,
            bindings.len(),
        );

        Entered::Fresh(Frame {
            module,
            suffix,
            name,
            rename: bindings
                .into_iter()
                .map(|binding| (binding.formal, binding.actual))
                .collect(),
            next_import: 0,
            edits: Vec::with_capacity(parsed.imports.len()),
        })
    }

    fn finish(&mut self, mut frame: Frame) -> Resolved {
        let parsed = &self.parsed[frame.module];

        let mut tokens = parsed.tokens.clone();
        descope(&mut tokens, |name| match frame.rename.get(name) {
            Some(renamed) => renamed.clone(),
            None => format!("{name}{}", frame.suffix),
        });

        // Splice from the back so that pending splice points stay valid. Imports which were
        // removed at the same position are spliced last-first to keep their source order.
        frame.edits.sort_by(|(a, _), (b, _)| {
            let a = (parsed.imports[*a].position, *a);
            let b = (parsed.imports[*b].position, *b);
            b.cmp(&a)
        });

        for (import, spliced) in frame.edits {
            let at = parsed.imports[import].position;
            tokens.splice(at..at, spliced);
        }

        self.resolved.insert(frame.name.clone());

        Resolved {
            name: frame.name,
            tokens,
        }
    }
}

impl Frame {
    /// Bindings are forwarded through the caller's renames so that an import can be bound to a
    /// name the caller itself received as a binding or imported.
    fn bindings_for(&self, import: &ImportDirective) -> BindingList {
        import
            .bindings
            .iter()
            .map(|binding| {
                let actual = match self.rename.get(&binding.actual) {
                    Some(renamed) => renamed.clone(),
                    None => format!("{}{}", binding.actual, self.suffix),
                };

                Binding::new(binding.formal.clone(), actual)
            })
            .collect()
    }

    fn complete_import(&mut self, import: &ImportDirective, name: String, tokens: Vec<Token>) {
        self.rename.insert(import.alias.clone(), name);
        self.edits.push((self.next_import, tokens));
        self.next_import += 1;
    }
}

/// The string hashed into an instantiation's suffix: every binding as `formal,actual`, then the
/// module id, all joined by `:`.
fn instance_key(bindings: &[Binding], id: &str) -> String {
    let mut key = String::new();

    for (i, binding) in bindings.iter().enumerate() {
        if i > 0 {
            key.push(':');
        }

        let _ = write!(key, "{},{}", binding.formal, binding.actual);
    }

    key.push(':');
    key.push_str(id);
    key
}
