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

use crate::module::ModuleId;
use crate::signature::EntrySignature;
use crate::size::ByteSize;

/// A preliminary, internal grouping of modules that all share an
/// entry-dependence signature. Mutated in place by the merge pass.
#[derive(Debug, Clone)]
pub struct ChunkDescription {
    pub modules: Vec<ModuleId>,
    pub signature: EntrySignature,
    pub size: ByteSize,
    pub pure: bool,
}

impl ChunkDescription {
    pub fn new(modules: Vec<ModuleId>, signature: EntrySignature, size: ByteSize, pure: bool) -> Self {
        debug_assert!(!modules.is_empty(), "a chunk description must not be empty");
        Self {
            modules,
            signature,
            size,
            pure,
        }
    }

    /// Absorb `other` into `self`, preserving `self`'s modules before
    /// `other`'s.
    pub fn absorb(&mut self, other: ChunkDescription) {
        self.modules.extend(other.modules);
        self.size += other.size;
        self.pure = self.pure && other.pure;
        self.signature = EntrySignature::merge(&other.signature, &self.signature);
    }
}

/// The final, externally-visible grouping of modules emitted by
/// `assign_chunks`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chunk {
    pub alias: Option<String>,
    pub modules: Vec<ModuleId>,
}

impl From<ChunkDescription> for Chunk {
    fn from(description: ChunkDescription) -> Self {
        Self {
            alias: None,
            modules: description.modules,
        }
    }
}
