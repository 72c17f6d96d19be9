/*
 * Copyright [2022] [Kevin Velasco]
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::collections::VecDeque;

use chunk_core::{Dependency, DynamicImportResolution, Module, ModuleId, Modules};
use indexmap::{IndexMap, IndexSet};

/// Output of phase 4.2 — the graph analysis pass.
pub struct GraphAnalysis {
    /// User entries followed by dynamic entries, in discovery order.
    pub all_entries: IndexSet<ModuleId>,
    /// For every module reachable from some entry, the set of entries
    /// that reach it.
    pub dependent_entries_by_module: IndexMap<ModuleId, IndexSet<ModuleId>>,
    /// The subset of `all_entries` discovered via a dynamic import or an
    /// implicit-before ordering constraint, rather than given directly.
    pub dynamic_entries: IndexSet<ModuleId>,
}

/// Phase 4.2 — graph analysis.
///
/// Starting from the user-supplied entries, traverses every module's
/// `dependencies_to_be_included()` to record, for each reachable module,
/// which entries reach it. Along the way, dynamic import targets and
/// implicit-before dependencies not already counted as an entry are
/// promoted to entries themselves and folded into the same live
/// traversal — `all_entries` grows as it's being iterated.
pub fn analyze_graph<M: Module>(entries: &[ModuleId], modules: &impl Modules<M>) -> GraphAnalysis {
    let mut all_entries: IndexSet<ModuleId> = entries.iter().cloned().collect();
    let mut dynamic_entries: IndexSet<ModuleId> = IndexSet::new();
    let mut dependent_entries_by_module: IndexMap<ModuleId, IndexSet<ModuleId>> = IndexMap::new();

    let mut entry_idx = 0;
    while entry_idx < all_entries.len() {
        let current_entry = all_entries.get_index(entry_idx).unwrap().clone();
        entry_idx += 1;

        let mut seen: IndexSet<ModuleId> = IndexSet::new();
        let mut queue: VecDeque<ModuleId> = VecDeque::new();
        queue.push_back(current_entry.clone());
        seen.insert(current_entry.clone());

        while let Some(module_id) = queue.pop_front() {
            dependent_entries_by_module
                .entry(module_id.clone())
                .or_default()
                .insert(current_entry.clone());

            let Some(module) = modules.get(&module_id) else {
                tracing::warn!(module = %module_id, "reachable module has no backing definition");
                continue;
            };

            for dependency in module.dependencies_to_be_included() {
                if let Dependency::Module(dep_id) = dependency {
                    if seen.insert(dep_id.clone()) {
                        queue.push_back(dep_id.clone());
                    }
                }
            }

            for dynamic_import in module.dynamic_imports() {
                if let DynamicImportResolution::Module(target) = &dynamic_import.resolution {
                    let Some(target_module) = modules.get(target) else {
                        continue;
                    };
                    if !target_module.included_dynamic_importers().is_empty()
                        && all_entries.insert(target.clone())
                    {
                        dynamic_entries.insert(target.clone());
                        tracing::debug!(entry = %target, via = %module_id, "discovered dynamic entry");
                    }
                }
            }

            for implicit in module.implicitly_loaded_before() {
                if all_entries.insert(implicit.clone()) {
                    dynamic_entries.insert(implicit.clone());
                    tracing::debug!(entry = %implicit, via = %module_id, "discovered implicit entry");
                }
            }
        }
    }

    GraphAnalysis {
        all_entries,
        dependent_entries_by_module,
        dynamic_entries,
    }
}

/// Phase 4.3 — dynamically-dependent entries.
///
/// For every dynamic entry `D`, the union of `dependent_entries_by_module`
/// over every module that either dynamically imports `D` (and is itself
/// included) or is ordered after `D` by an implicit-before constraint.
/// This is the set of entries that are guaranteed to have already loaded
/// `D`'s chunk by the time `D` itself would execute.
pub fn compute_dynamically_dependent_entries<M: Module>(
    dynamic_entries: &IndexSet<ModuleId>,
    dependent_entries_by_module: &IndexMap<ModuleId, IndexSet<ModuleId>>,
    modules: &impl Modules<M>,
) -> IndexMap<ModuleId, IndexSet<ModuleId>> {
    let mut result = IndexMap::new();

    for dynamic_entry in dynamic_entries {
        let mut dependents: IndexSet<ModuleId> = IndexSet::new();

        if let Some(module) = modules.get(dynamic_entry) {
            for importer in module
                .included_dynamic_importers()
                .iter()
                .chain(module.implicitly_loaded_after())
            {
                if let Some(entries) = dependent_entries_by_module.get(importer) {
                    dependents.extend(entries.iter().cloned());
                }
            }
        }

        result.insert(dynamic_entry.clone(), dependents);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureModule;

    #[test]
    fn records_entries_that_reach_each_module() {
        let modules = FixtureModule::graph(&[
            ("main", &["shared"], &[]),
            ("other", &["shared"], &[]),
            ("shared", &[], &[]),
        ]);

        let entries = vec![ModuleId::from("main"), ModuleId::from("other")];
        let analysis = analyze_graph(&entries, &modules);

        let shared_dependents = &analysis.dependent_entries_by_module[&ModuleId::from("shared")];
        assert!(shared_dependents.contains(&ModuleId::from("main")));
        assert!(shared_dependents.contains(&ModuleId::from("other")));
        assert!(analysis.dynamic_entries.is_empty());
    }

    #[test]
    fn discovers_dynamic_entries_mid_traversal() {
        let mut modules = FixtureModule::graph(&[("main", &[], &[]), ("lazy", &[], &[])]);
        modules
            .get_mut(&ModuleId::from("main"))
            .unwrap()
            .add_dynamic_import(ModuleId::from("lazy"));
        modules
            .get_mut(&ModuleId::from("lazy"))
            .unwrap()
            .included_dynamic_importers
            .push(ModuleId::from("main"));

        let entries = vec![ModuleId::from("main")];
        let analysis = analyze_graph(&entries, &modules);

        assert!(analysis.all_entries.contains(&ModuleId::from("lazy")));
        assert!(analysis.dynamic_entries.contains(&ModuleId::from("lazy")));
    }
}
