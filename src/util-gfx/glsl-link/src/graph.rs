use std::{cmp::Reverse, collections::BinaryHeap};

use link_utils::{
    define_index,
    hash::{hashbrown::hash_map, FxHashMap},
    newtypes::IndexVec,
};

use crate::{error::BundleError, module::Module};

// === ModuleGraph === //

define_index! {
    pub struct ModuleIndex: u32;
}

/// The set of modules taking part in a bundle with their dependency edges resolved to indices.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: IndexVec<ModuleIndex, Module>,
    by_id: FxHashMap<String, ModuleIndex>,

    /// The distinct modules each module depends on, sorted by index.
    deps: IndexVec<ModuleIndex, Vec<ModuleIndex>>,
}

impl ModuleGraph {
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Result<Self, BundleError> {
        let mut graph = Self::default();

        for module in modules {
            match graph.by_id.entry(module.id.clone()) {
                hash_map::Entry::Occupied(_) => {
                    return Err(BundleError::DuplicateModule { module: module.id });
                }
                hash_map::Entry::Vacant(entry) => {
                    entry.insert(graph.modules.push(module));
                }
            }
        }

        for module in graph.modules.iter() {
            let mut deps = Vec::with_capacity(module.deps.len());

            for target in module.deps.values() {
                let Some(&target_idx) = graph.by_id.get(target) else {
                    return Err(BundleError::UnknownModule {
                        module: module.id.clone(),
                        file: module.file.clone(),
                        target: target.clone(),
                    });
                };

                deps.push(target_idx);
            }

            deps.sort();
            deps.dedup();
            graph.deps.push(deps);
        }

        Ok(graph)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn module(&self, idx: ModuleIndex) -> &Module {
        &self.modules[idx]
    }

    pub fn modules(&self) -> impl Iterator<Item = (ModuleIndex, &Module)> + Clone {
        self.modules.enumerate()
    }

    pub fn lookup(&self, id: &str) -> Option<ModuleIndex> {
        self.by_id.get(id).copied()
    }

    /// Orders the modules so that every module comes after all of its dependencies. Among the
    /// modules which are ready to be emitted, the one provided first always goes first.
    pub fn toposort(&self) -> Result<Vec<ModuleIndex>, BundleError> {
        let mut pending = self
            .deps
            .iter()
            .map(|deps| deps.len())
            .collect::<IndexVec<ModuleIndex, _>>();

        let mut dependents = IndexVec::<ModuleIndex, Vec<ModuleIndex>>::new();
        for _ in self.modules.keys() {
            dependents.push(Vec::new());
        }

        for (idx, deps) in self.deps.enumerate() {
            for &dep in deps {
                dependents[dep].push(idx);
            }
        }

        let mut ready = pending
            .enumerate()
            .filter(|&(_, &count)| count == 0)
            .map(|(idx, _)| Reverse(idx))
            .collect::<BinaryHeap<_>>();

        let mut order = Vec::with_capacity(self.len());

        while let Some(Reverse(idx)) = ready.pop() {
            order.push(idx);

            for &dependent in &dependents[idx] {
                pending[dependent] -= 1;
                if pending[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() < self.len() {
            return Err(BundleError::CyclicDependency {
                cycle: self.find_cycle(&pending),
            });
        }

        Ok(order)
    }

    /// Walks dependency edges between unemitted modules until a module repeats. Every unemitted
    /// module has at least one unemitted dependency so the walk can never get stuck.
    fn find_cycle(&self, pending: &IndexVec<ModuleIndex, usize>) -> Vec<String> {
        let is_stuck = |idx: ModuleIndex| pending[idx] > 0;

        let Some(start) = self.modules.keys().find(|&idx| is_stuck(idx)) else {
            return Vec::new();
        };

        let mut path = Vec::new();
        let mut visited_at = FxHashMap::<ModuleIndex, usize>::default();
        let mut curr = start;

        loop {
            if let Some(&at) = visited_at.get(&curr) {
                return path[at..]
                    .iter()
                    .map(|&idx: &ModuleIndex| self.modules[idx].id.clone())
                    .collect();
            }

            visited_at.insert(curr, path.len());
            path.push(curr);

            let Some(&next) = self.deps[curr].iter().find(|&&dep| is_stuck(dep)) else {
                return path.iter().map(|&idx| self.modules[idx].id.clone()).collect();
            };

            curr = next;
        }
    }
}
