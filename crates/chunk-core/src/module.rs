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

use crate::size::ByteSize;
use indexmap::IndexMap;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Identifies a module across the whole graph. Cheap to clone: it is a
/// reference-counted string.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModuleId(pub Rc<str>);

impl ModuleId {
    pub fn new(id: impl Into<Rc<str>>) -> Self {
        Self(id.into())
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for ModuleId {
    fn from(value: &str) -> Self {
        Self(Rc::from(value))
    }
}

/// Identifies an [`ExternalModule`](crate::module) — a dependency never
/// placed in any output chunk.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ExternalId(pub Rc<str>);

impl Display for ExternalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for ExternalId {
    fn from(value: &str) -> Self {
        Self(Rc::from(value))
    }
}

/// A direct static dependency: either a module that participates in the
/// graph, or an opaque external module that never gets chunked.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "id", rename_all = "snake_case")
)]
pub enum Dependency {
    Module(ModuleId),
    External(ExternalId),
}

impl Dependency {
    pub fn as_module(&self) -> Option<&ModuleId> {
        match self {
            Dependency::Module(id) => Some(id),
            Dependency::External(_) => None,
        }
    }
}

/// What a dynamic `import()` resolves to.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", content = "id", rename_all = "snake_case")
)]
pub enum DynamicImportResolution {
    Module(ModuleId),
    External(ExternalId),
    Unresolved,
}

/// A single dynamic import site on a module.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DynamicImport {
    pub resolution: DynamicImportResolution,
}

/// The collaborator contract this crate reasons about. Every method is a
/// pure, repeatable query.
///
/// Implementations are expected to be cheap to call repeatedly; the
/// assignment algorithm does not cache or memoize across these calls.
pub trait Module {
    fn id(&self) -> ModuleId;

    /// Ordered sequence of direct static dependencies.
    fn dependencies(&self) -> &[Dependency];

    /// Ordered subset of `dependencies()` selected for inclusion after
    /// tree-shaking. Always a subset (in order) of `dependencies()`; may
    /// still contain external dependencies, which callers filter out.
    fn dependencies_to_be_included(&self) -> &[Dependency];

    /// Ordered sequence of dynamic `import()` sites.
    fn dynamic_imports(&self) -> &[DynamicImport];

    /// Modules that dynamically import this one and are themselves
    /// included in the build.
    fn included_dynamic_importers(&self) -> &[ModuleId];

    /// Modules this one must be evaluated before, expressed as an
    /// implicit dynamic-load ordering constraint rather than a static
    /// dependency.
    fn implicitly_loaded_before(&self) -> &[ModuleId];

    /// The inverse view: modules that declared this one in their own
    /// `implicitly_loaded_before`.
    fn implicitly_loaded_after(&self) -> &[ModuleId];

    /// True iff evaluating the module may cause observable side effects.
    fn has_effects(&self) -> bool;

    /// Serialized byte cost after transformation.
    fn size(&self) -> ByteSize;
}

/// Looks a [`Module`] up by id. The assignment algorithm never owns the
/// module graph; it only ever borrows through this trait.
pub trait Modules<M: Module> {
    fn get(&self, id: &ModuleId) -> Option<&M>;
}

impl<M: Module> Modules<M> for IndexMap<ModuleId, M> {
    fn get(&self, id: &ModuleId) -> Option<&M> {
        IndexMap::get(self, id)
    }
}

impl<'a, M: Module, T: Modules<M>> Modules<M> for &'a T {
    fn get(&self, id: &ModuleId) -> Option<&M> {
        T::get(self, id)
    }
}
