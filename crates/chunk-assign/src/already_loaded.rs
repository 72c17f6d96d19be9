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

use chunk_core::{Dependency, Module, ModuleId, Modules};
use indexmap::{IndexMap, IndexSet};

/// Upper bound on the size of an entry set `areEntriesContainedOrDynamicallyDependent`
/// is willing to chase before giving up and declaring "not already loaded".
/// Keeps the containment check in phase 4.4 from blowing up on pathological
/// fan-out; a miss here only costs an extra (correct) module attribution,
/// never an incorrect one.
pub const CONTAINMENT_BOUND: usize = 3;

/// Phase 4.4 — entry attribution with already-loaded elision.
///
/// For every non-manual entry, walks its static included-dependency tree
/// (stopping at externals and at modules already claimed by a manual
/// chunk) and attributes each module it reaches to that entry — unless
/// the entry is dynamic and every user entry it could ever load through
/// is already guaranteed to have loaded the module by some other path.
pub fn assign_entries_to_modules<M: Module>(
    all_entries: &IndexSet<ModuleId>,
    modules_in_manual_chunks: &IndexSet<ModuleId>,
    dependent_entries_by_module: &IndexMap<ModuleId, IndexSet<ModuleId>>,
    dynamically_dependent_entries_by_dynamic_entry: &IndexMap<ModuleId, IndexSet<ModuleId>>,
    modules: &impl Modules<M>,
) -> IndexMap<ModuleId, IndexSet<ModuleId>> {
    let mut assigned: IndexMap<ModuleId, IndexSet<ModuleId>> = IndexMap::new();

    for entry in all_entries {
        if modules_in_manual_chunks.contains(entry) {
            continue;
        }

        let dynamic_dependents = dynamically_dependent_entries_by_dynamic_entry.get(entry);

        let mut seen: IndexSet<ModuleId> = IndexSet::new();
        let mut queue: VecDeque<ModuleId> = VecDeque::new();
        queue.push_back(entry.clone());
        seen.insert(entry.clone());

        while let Some(module_id) = queue.pop_front() {
            let already_loaded = match dynamic_dependents {
                Some(dependents) => {
                    let contained_in = dependent_entries_by_module
                        .get(&module_id)
                        .cloned()
                        .unwrap_or_default();
                    are_entries_contained_or_dynamically_dependent(
                        dependents,
                        &contained_in,
                        dynamically_dependent_entries_by_dynamic_entry,
                    )
                }
                None => false,
            };

            if !already_loaded {
                assigned
                    .entry(module_id.clone())
                    .or_default()
                    .insert(entry.clone());
            }

            let Some(module) = modules.get(&module_id) else {
                continue;
            };

            for dependency in module.dependencies_to_be_included() {
                if let Dependency::Module(dep_id) = dependency {
                    if modules_in_manual_chunks.contains(dep_id) {
                        continue;
                    }
                    if seen.insert(dep_id.clone()) {
                        queue.push_back(dep_id.clone());
                    }
                }
            }
        }
    }

    assigned
}

/// `areEntriesContainedOrDynamicallyDependent` — decides whether every
/// entry in `entries` is already covered by `contained_in`, directly or
/// transitively through another dynamic entry's own dependents. Bails
/// out (conservatively `false`) past [`CONTAINMENT_BOUND`] entries at any
/// level, rather than chasing an unbounded fan-out.
fn are_entries_contained_or_dynamically_dependent(
    entries: &IndexSet<ModuleId>,
    contained_in: &IndexSet<ModuleId>,
    dynamically_dependent_entries_by_dynamic_entry: &IndexMap<ModuleId, IndexSet<ModuleId>>,
) -> bool {
    if entries.len() > CONTAINMENT_BOUND {
        return false;
    }

    let mut working: IndexSet<ModuleId> = entries.clone();
    let mut idx = 0;
    while idx < working.len() {
        let entry = working.get_index(idx).unwrap().clone();
        idx += 1;

        if contained_in.contains(&entry) {
            continue;
        }

        match dynamically_dependent_entries_by_dynamic_entry.get(&entry) {
            None => return false,
            Some(dependents) => {
                if dependents.len() > CONTAINMENT_BOUND {
                    return false;
                }
                for dependent in dependents {
                    working.insert(dependent.clone());
                }
            }
        }
    }

    true
}
