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

//! Human-readable reporting over an already-computed chunk list. Purely
//! a presentation layer; nothing here feeds back into the algorithm.

use std::fmt::{Display, Formatter};

use chunk_core::{ByteSize, Chunk, Module, ModuleId, Modules};

/// A report over the full chunk list: one line per chunk with its
/// alias (if any), module count and total size.
pub struct ChunksReport<'a> {
    chunks: &'a [Chunk],
    sizes: Vec<ByteSize>,
}

/// Builds a [`ChunksReport`] summing each chunk's member sizes via the
/// `modules` collaborator. Modules missing from `modules` (shouldn't
/// happen for a well-formed graph) simply contribute zero.
pub fn describe_chunks<'a, M: Module>(
    chunks: &'a [Chunk],
    modules: &impl Modules<M>,
) -> ChunksReport<'a> {
    let sizes = chunks
        .iter()
        .map(|chunk| {
            chunk
                .modules
                .iter()
                .filter_map(|id| modules.get(id))
                .map(Module::size)
                .fold(ByteSize(0), |acc, size| acc + size)
        })
        .collect();

    ChunksReport { chunks, sizes }
}

impl<'a> Display for ChunksReport<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, (chunk, size)) in self.chunks.iter().zip(self.sizes.iter()).enumerate() {
            match &chunk.alias {
                Some(alias) => writeln!(f, "chunk {index} ({alias}): {size}")?,
                None => writeln!(f, "chunk {index}: {size}")?,
            }
            for module in &chunk.modules {
                writeln!(f, "  {module}")?;
            }
        }
        Ok(())
    }
}

/// Finds the output chunk containing `module`, if any.
pub fn chunk_containing<'a>(chunks: &'a [Chunk], module: &ModuleId) -> Option<&'a Chunk> {
    chunks.iter().find(|chunk| chunk.modules.contains(module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixtureModule;

    #[test]
    fn report_lists_one_line_per_chunk_with_its_total_size() {
        let modules = FixtureModule::graph(&[("a", &[], &[]), ("b", &[], &[])]);
        let chunks = vec![
            Chunk {
                alias: Some("vendor".to_string()),
                modules: vec![ModuleId::from("a")],
            },
            Chunk {
                alias: None,
                modules: vec![ModuleId::from("b")],
            },
        ];

        let report = describe_chunks(&chunks, &modules).to_string();
        assert!(report.contains("(vendor)"));
        assert!(report.contains("chunk 1: "));
        assert!(report.contains("a"));
        assert!(report.contains("b"));
    }

    #[test]
    fn chunk_containing_finds_the_owning_chunk() {
        let chunks = vec![Chunk {
            alias: None,
            modules: vec![ModuleId::from("a"), ModuleId::from("b")],
        }];
        assert!(chunk_containing(&chunks, &ModuleId::from("b")).is_some());
        assert!(chunk_containing(&chunks, &ModuleId::from("missing")).is_none());
    }
}
