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

use chunk_core::{ChunkDescription, EntrySignature, Module, ModuleId, Modules};
use indexmap::{IndexMap, IndexSet};

/// Phase 4.5 — signature grouping.
///
/// Every attributed module gets a positional signature over
/// `all_entries` (which entries reached it, per phase 4.4's output) and
/// is folded into the `ChunkDescription` for that exact signature. Two
/// modules with identical signatures always land in the same
/// preliminary chunk; this is the only place module identity is traded
/// for signature identity.
pub fn build_signature_groups<M: Module>(
    assigned_entries_by_module: &IndexMap<ModuleId, IndexSet<ModuleId>>,
    all_entries: &IndexSet<ModuleId>,
    modules: &impl Modules<M>,
) -> Vec<ChunkDescription> {
    let mut groups: IndexMap<EntrySignature, ChunkDescription> = IndexMap::new();

    for (module_id, entries) in assigned_entries_by_module {
        let mut signature = EntrySignature::new(all_entries.len());
        for (position, entry) in all_entries.iter().enumerate() {
            if entries.contains(entry) {
                signature.set(position);
            }
        }

        let Some(module) = modules.get(module_id) else {
            continue;
        };
        let pure = !module.has_effects();
        let size = module.size();

        match groups.get_mut(&signature) {
            Some(description) => {
                description.modules.push(module_id.clone());
                description.size += size;
                description.pure = description.pure && pure;
            }
            None => {
                groups.insert(
                    signature.clone(),
                    ChunkDescription::new(vec![module_id.clone()], signature, size, pure),
                );
            }
        }
    }

    groups.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureModule;

    #[test]
    fn modules_sharing_a_signature_fold_into_one_group() {
        let modules = FixtureModule::graph(&[("a", &[], &[]), ("b", &[], &[])]);
        let all_entries: IndexSet<ModuleId> =
            [ModuleId::from("e1"), ModuleId::from("e2")].into_iter().collect();

        let mut assigned = IndexMap::new();
        assigned.insert(
            ModuleId::from("a"),
            IndexSet::from([ModuleId::from("e1")]),
        );
        assigned.insert(
            ModuleId::from("b"),
            IndexSet::from([ModuleId::from("e1")]),
        );

        let groups = build_signature_groups(&assigned, &all_entries, &modules);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].modules.len(), 2);
        assert_eq!(groups[0].signature.to_string(), "X_");
    }

    #[test]
    fn distinct_signatures_stay_in_separate_groups() {
        let modules = FixtureModule::graph(&[("a", &[], &[]), ("b", &[], &[])]);
        let all_entries: IndexSet<ModuleId> =
            [ModuleId::from("e1"), ModuleId::from("e2")].into_iter().collect();

        let mut assigned = IndexMap::new();
        assigned.insert(
            ModuleId::from("a"),
            IndexSet::from([ModuleId::from("e1")]),
        );
        assigned.insert(
            ModuleId::from("b"),
            IndexSet::from([ModuleId::from("e2")]),
        );

        let groups = build_signature_groups(&assigned, &all_entries, &modules);
        assert_eq!(groups.len(), 2);
    }
}
