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

use chunk_core::{Chunk, Dependency, Module, ModuleId, Modules};
use indexmap::{IndexMap, IndexSet};

/// Phase 4.1 — manual chunk materialization.
///
/// Walks the static dependency tree of every manually-assigned entry and
/// buckets the reachable modules under their alias, in discovery order.
/// Entries that share an alias share a bucket. The first alias to reach
/// a shared module keeps it: later traversals see it already marked and
/// skip past it.
pub fn materialize_manual_chunks<M: Module>(
    manual_alias_by_entry: &IndexMap<ModuleId, String>,
    modules: &impl Modules<M>,
) -> (Vec<Chunk>, IndexSet<ModuleId>) {
    for alias in manual_alias_by_entry.values() {
        assert!(
            !alias.is_empty(),
            "manual chunk alias must be a non-empty string"
        );
    }

    let mut modules_in_manual_chunks: IndexSet<ModuleId> =
        manual_alias_by_entry.keys().cloned().collect();
    let mut buckets: IndexMap<String, Vec<ModuleId>> = IndexMap::new();

    for (entry, alias) in manual_alias_by_entry {
        let mut queue: VecDeque<ModuleId> = VecDeque::new();
        queue.push_back(entry.clone());

        while let Some(current) = queue.pop_front() {
            buckets.entry(alias.clone()).or_default().push(current.clone());
            modules_in_manual_chunks.insert(current.clone());

            let Some(module) = modules.get(&current) else {
                tracing::warn!(module = %current, "manual chunk entry has no backing module");
                continue;
            };

            for dependency in module.dependencies() {
                if let Dependency::Module(dep_id) = dependency {
                    if !modules_in_manual_chunks.contains(dep_id) {
                        modules_in_manual_chunks.insert(dep_id.clone());
                        queue.push_back(dep_id.clone());
                    }
                }
            }
        }
    }

    let chunks = buckets
        .into_iter()
        .map(|(alias, modules)| Chunk {
            alias: Some(alias),
            modules,
        })
        .collect();

    (chunks, modules_in_manual_chunks)
}
