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

//! A chunk-dependency view for diagnostics: chunk A points at chunk B
//! whenever some module placed in A depends on (statically or via a
//! dynamic import) a module placed in B. The edges are derived from the
//! output of [`crate::assign_chunks`] itself, since this algorithm
//! emits no chunk graph of its own.
//!
//! Built with [`meshed`], purely for `--format dot` diagnostics.
//! Nothing in [`crate`]'s algorithm depends on this module.

use std::rc::Rc;

use chunk_core::{Chunk, Dependency, DynamicImportResolution, Module, ModuleId, Modules};
use indexmap::{IndexMap, IndexSet};
use meshed::extract::{Edge as MeshEdge, Edges, Label, Query};
use meshed::graph::{Graph, GraphDefinition};
use meshed::identify::Identifiable;

/// A [`meshed::graph::GraphDefinition`] over chunk indices (position in
/// the `Vec<Chunk>` returned by `assign_chunks`).
pub struct ChunkDependencyGraph;

impl GraphDefinition for ChunkDependencyGraph {
    type Id = usize;
    type Label = Rc<str>;
    type EdgeMeta = ();
    type NodeData = ();
}

struct ChunkNode {
    index: usize,
    label: Rc<str>,
    depends_on: Vec<usize>,
}

impl Identifiable<usize> for ChunkNode {
    fn get_id(&self) -> usize {
        self.index
    }
}

impl Label for ChunkNode {
    type Label = Rc<str>;
    fn label(&self) -> Self::Label {
        Rc::clone(&self.label)
    }
}

impl Edges<usize, ()> for ChunkNode {
    fn next_edge(&self, previous_edge_index: Option<usize>) -> Option<MeshEdge<usize, ()>> {
        let next_idx = previous_edge_index.map(|i| i + 1).unwrap_or(0);
        let target = *self.depends_on.get(next_idx)?;
        Some(MeshEdge::new(self.index, target, next_idx, ()))
    }
}

struct ChunkIndex {
    nodes: Vec<ChunkNode>,
}

impl Query<usize, ChunkNode> for ChunkIndex {
    fn query(&self, identifier: &usize) -> Option<&ChunkNode> {
        self.nodes.get(*identifier)
    }

    fn all(&self) -> Vec<&ChunkNode> {
        self.nodes.iter().collect()
    }
}

/// Builds the chunk-dependency graph for a completed chunk list.
///
/// For every module in every chunk, looks at its static
/// [`Module::dependencies`](chunk_core::Module::dependencies) and
/// resolved [`Module::dynamic_imports`](chunk_core::Module::dynamic_imports)
/// targets; whenever the dependency lands in a different chunk, records
/// an edge from the dependent chunk to the dependency's chunk. Edge
/// order per chunk follows first-discovery order over the chunk's own
/// module order.
pub fn build_chunk_dependency_graph<M: Module>(
    chunks: &[Chunk],
    modules: &impl Modules<M>,
) -> Graph<ChunkDependencyGraph> {
    let mut chunk_of_module: IndexMap<ModuleId, usize> = IndexMap::new();
    for (index, chunk) in chunks.iter().enumerate() {
        for module_id in &chunk.modules {
            chunk_of_module.insert(module_id.clone(), index);
        }
    }

    let mut nodes = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let label: Rc<str> = match &chunk.alias {
            Some(alias) => Rc::from(alias.as_str()),
            None => Rc::from(format!("chunk_{index}").as_str()),
        };

        let mut targets: IndexSet<usize> = IndexSet::new();
        for module_id in &chunk.modules {
            let Some(module) = modules.get(module_id) else {
                continue;
            };

            for dependency in module.dependencies() {
                if let Dependency::Module(dep_id) = dependency {
                    if let Some(&target) = chunk_of_module.get(dep_id) {
                        if target != index {
                            targets.insert(target);
                        }
                    }
                }
            }

            for dynamic_import in module.dynamic_imports() {
                if let DynamicImportResolution::Module(dep_id) = &dynamic_import.resolution {
                    if let Some(&target) = chunk_of_module.get(dep_id) {
                        if target != index {
                            targets.insert(target);
                        }
                    }
                }
            }
        }

        nodes.push(ChunkNode {
            index,
            label,
            depends_on: targets.into_iter().collect(),
        });
    }

    ChunkDependencyGraph::build_graph(&ChunkIndex { nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureModule;

    #[test]
    fn edge_points_from_dependent_chunk_to_dependency_chunk() {
        let modules = FixtureModule::graph(&[("a", &["shared"], &[]), ("shared", &[], &[])]);
        let chunks = vec![
            Chunk {
                alias: None,
                modules: vec![ModuleId::from("a")],
            },
            Chunk {
                alias: None,
                modules: vec![ModuleId::from("shared")],
            },
        ];

        let graph = build_chunk_dependency_graph(&chunks, &modules);
        let origin = graph.query(&0usize).expect("chunk 0 present");
        let edges = origin.get_edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target.get_id(), 1usize);
    }

    #[test]
    fn modules_within_the_same_chunk_produce_no_self_edge() {
        let modules = FixtureModule::graph(&[("a", &["b"], &[]), ("b", &[], &[])]);
        let chunks = vec![Chunk {
            alias: None,
            modules: vec![ModuleId::from("a"), ModuleId::from("b")],
        }];

        let graph = build_chunk_dependency_graph(&chunks, &modules);
        let origin = graph.query(&0usize).expect("chunk 0 present");
        assert!(origin.get_edges().is_empty());
    }
}
