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

//! Data model for the chunk assignment core.
//!
//! This crate defines the collaborator contract (`Module`), the
//! positional entry-dependence signature used to group modules, and
//! the chunk types the assignment algorithm produces. It contains no
//! traversal or grouping logic itself; that lives in `chunk-assign`.

pub mod chunk;
pub mod module;
pub mod signature;
pub mod size;

pub use chunk::{Chunk, ChunkDescription};
pub use module::{
    Dependency, DynamicImport, DynamicImportResolution, ExternalId, Module, ModuleId, Modules,
};
pub use signature::EntrySignature;
pub use size::ByteSize;
