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

//! Assigns and merges modules into output chunks given a module graph
//! and entry points.
//!
//! The work happens in five phases, each in its own module:
//!
//! 1. [`manual`] materializes manually-pinned chunks.
//! 2. [`graph_analysis`] walks the graph to learn which entries reach
//!    which modules, discovering dynamic entries along the way.
//! 3. [`already_loaded`] attributes every remaining module to the
//!    entries that need it, eliding attributions a dynamic entry's
//!    importers already guarantee.
//! 4. [`grouping`] folds modules with identical entry-dependence
//!    signatures into preliminary chunk descriptions.
//! 5. [`merge`] runs the size-driven two-pass merge over those
//!    descriptions to arrive at the final chunk list.
//!
//! [`describe`] and [`graph`] are diagnostics-only presentation layers
//! over an already-computed chunk list; neither feeds back into the
//! algorithm.

pub mod already_loaded;
pub mod describe;
pub mod graph;
pub mod graph_analysis;
pub mod grouping;
pub mod manual;
pub mod merge;

#[cfg(test)]
mod test_support;

pub use chunk_core::{
    ByteSize, Chunk, ChunkDescription, Dependency, DynamicImport, DynamicImportResolution,
    EntrySignature, ExternalId, Module, ModuleId, Modules,
};

use indexmap::IndexMap;

/// Runs the full chunk assignment pipeline: manual chunk materialization,
/// graph analysis, already-loaded elision, signature grouping and the
/// size-driven merge.
///
/// `manual_alias_by_entry` maps an entry module to the alias of the
/// manual chunk it should be pinned into; entries absent from the map
/// go through the automatic pipeline. `min_chunk_size` of `0` disables
/// the merge pass entirely — every signature group becomes its own
/// output chunk.
pub fn assign_chunks<M: Module>(
    entries: &[ModuleId],
    manual_alias_by_entry: &IndexMap<ModuleId, String>,
    min_chunk_size: u64,
    modules: &impl Modules<M>,
) -> Vec<Chunk> {
    let (manual_chunks, modules_in_manual_chunks) =
        manual::materialize_manual_chunks(manual_alias_by_entry, modules);

    let graph_analysis::GraphAnalysis {
        all_entries,
        dependent_entries_by_module,
        dynamic_entries,
    } = graph_analysis::analyze_graph(entries, modules);

    let dynamically_dependent_entries_by_dynamic_entry =
        graph_analysis::compute_dynamically_dependent_entries(
            &dynamic_entries,
            &dependent_entries_by_module,
            modules,
        );

    let assigned_entries_by_module = already_loaded::assign_entries_to_modules(
        &all_entries,
        &modules_in_manual_chunks,
        &dependent_entries_by_module,
        &dynamically_dependent_entries_by_dynamic_entry,
        modules,
    );

    let groups = grouping::build_signature_groups(&assigned_entries_by_module, &all_entries, modules);

    tracing::debug!(
        manual_chunks = manual_chunks.len(),
        entries = all_entries.len(),
        dynamic_entries = dynamic_entries.len(),
        groups = groups.len(),
        "chunk assignment analysis complete"
    );

    let automatic_chunks = if min_chunk_size == 0 {
        groups.into_iter().map(Chunk::from).collect()
    } else {
        merge::merge_chunks(groups, min_chunk_size)
    };

    manual_chunks.into_iter().chain(automatic_chunks).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureModule;

    fn entries(ids: &[&str]) -> Vec<ModuleId> {
        ids.iter().map(|id| ModuleId::from(*id)).collect()
    }

    fn modules_of(chunk: &Chunk) -> Vec<String> {
        chunk.modules.iter().map(|m| m.to_string()).collect()
    }

    #[test]
    fn single_entry_produces_a_single_automatic_chunk() {
        let modules = FixtureModule::graph(&[("main", &["util"], &[]), ("util", &[], &[])]);
        let chunks = assign_chunks(&entries(&["main"]), &IndexMap::new(), 0, &modules);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].alias, None);
        let names = modules_of(&chunks[0]);
        assert!(names.contains(&"main".to_string()));
        assert!(names.contains(&"util".to_string()));
    }

    #[test]
    fn shared_module_between_two_entries_gets_its_own_chunk() {
        let modules = FixtureModule::graph(&[
            ("a", &["shared"], &[]),
            ("b", &["shared"], &[]),
            ("shared", &[], &[]),
        ]);
        let chunks = assign_chunks(&entries(&["a", "b"]), &IndexMap::new(), 0, &modules);

        // three signatures: {a only}, {b only}, {a,b} -> three chunks
        assert_eq!(chunks.len(), 3);
        let shared_chunk = chunks
            .iter()
            .find(|c| c.modules.contains(&ModuleId::from("shared")))
            .expect("shared module present in some chunk");
        assert_eq!(shared_chunk.modules, vec![ModuleId::from("shared")]);
    }

    #[test]
    fn manual_chunk_wins_over_automatic_assignment() {
        let modules = FixtureModule::graph(&[("a", &["vendor"], &[]), ("vendor", &[], &[])]);

        let mut manual = IndexMap::new();
        manual.insert(ModuleId::from("vendor"), "vendor".to_string());

        let chunks = assign_chunks(&entries(&["a"]), &manual, 0, &modules);

        let vendor_chunk = chunks
            .iter()
            .find(|c| c.alias.as_deref() == Some("vendor"))
            .expect("manual vendor chunk present");
        assert_eq!(vendor_chunk.modules, vec![ModuleId::from("vendor")]);

        let automatic_chunk = chunks
            .iter()
            .find(|c| c.alias.is_none())
            .expect("automatic chunk present");
        assert_eq!(automatic_chunk.modules, vec![ModuleId::from("a")]);
    }

    #[test]
    fn min_chunk_size_zero_skips_the_merge_pass() {
        let modules = FixtureModule::graph(&[("a", &[], &[]), ("b", &[], &[])]);
        let chunks = assign_chunks(&entries(&["a", "b"]), &IndexMap::new(), 0, &modules);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn every_module_lands_in_exactly_one_chunk_manual_and_automatic_disjoint() {
        let modules = FixtureModule::graph(&[
            ("a", &["vendor", "shared"], &[]),
            ("b", &["shared"], &[]),
            ("vendor", &[], &[]),
            ("shared", &[], &[]),
        ]);
        let mut manual = IndexMap::new();
        manual.insert(ModuleId::from("vendor"), "vendor".to_string());

        let chunks = assign_chunks(&entries(&["a", "b"]), &manual, 0, &modules);

        let mut seen = std::collections::HashSet::new();
        for chunk in &chunks {
            for module in &chunk.modules {
                assert!(
                    seen.insert(module.clone()),
                    "module {module} appeared in more than one chunk"
                );
            }
        }
        for id in ["a", "b", "vendor", "shared"] {
            assert!(seen.contains(&ModuleId::from(id)), "module {id} missing from output");
        }
    }

    #[test]
    fn repeated_invocations_on_the_same_input_are_identical() {
        let modules = FixtureModule::graph(&[
            ("a", &["shared"], &[]),
            ("b", &["shared"], &[]),
            ("shared", &[], &[]),
        ]);
        let run = || {
            assign_chunks(&entries(&["a", "b"]), &IndexMap::new(), 0, &modules)
                .into_iter()
                .map(|c| {
                    let names = modules_of(&c);
                    (c.alias, names)
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn dynamic_import_discovers_its_own_entry_and_chunk() {
        let mut modules = FixtureModule::graph(&[
            ("main", &[], &[]),
            ("lazy", &["lazy_dep"], &[]),
            ("lazy_dep", &[], &[]),
        ]);
        modules
            .get_mut(&ModuleId::from("main"))
            .unwrap()
            .add_dynamic_import(ModuleId::from("lazy"));
        modules
            .get_mut(&ModuleId::from("lazy"))
            .unwrap()
            .included_dynamic_importers
            .push(ModuleId::from("main"));

        let chunks = assign_chunks(&entries(&["main"]), &IndexMap::new(), 0, &modules);

        let all_modules: Vec<String> = chunks.iter().flat_map(modules_of).collect();
        assert!(all_modules.contains(&"lazy".to_string()));
        assert!(all_modules.contains(&"lazy_dep".to_string()));
    }
}
