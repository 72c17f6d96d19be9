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

//! Hand-built `Module` fixtures shared by this crate's unit tests. Not
//! compiled outside `#[cfg(test)]`.

use chunk_core::{
    ByteSize, Dependency, DynamicImport, DynamicImportResolution, Module, ModuleId,
};
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct FixtureModule {
    pub id: ModuleId,
    pub dependencies: Vec<Dependency>,
    pub dependencies_to_be_included: Vec<Dependency>,
    pub dynamic_imports: Vec<DynamicImport>,
    pub included_dynamic_importers: Vec<ModuleId>,
    pub implicitly_loaded_before: Vec<ModuleId>,
    pub implicitly_loaded_after: Vec<ModuleId>,
    pub has_effects: bool,
    pub size: ByteSize,
}

impl FixtureModule {
    pub fn new(id: &str) -> Self {
        Self {
            id: ModuleId::from(id),
            dependencies: Vec::new(),
            dependencies_to_be_included: Vec::new(),
            dynamic_imports: Vec::new(),
            included_dynamic_importers: Vec::new(),
            implicitly_loaded_before: Vec::new(),
            implicitly_loaded_after: Vec::new(),
            has_effects: true,
            size: ByteSize(10),
        }
    }

    pub fn add_dynamic_import(&mut self, target: ModuleId) {
        self.dynamic_imports.push(DynamicImport {
            resolution: DynamicImportResolution::Module(target),
        });
    }

    /// Builds a small graph from `(id, static deps, dynamic-import
    /// targets)` triples. Dependencies are mirrored into both
    /// `dependencies()` and `dependencies_to_be_included()`, since these
    /// fixtures don't model tree-shaking.
    pub fn graph(specs: &[(&str, &[&str], &[&str])]) -> IndexMap<ModuleId, FixtureModule> {
        let mut modules = IndexMap::new();
        for (id, deps, dynamic) in specs {
            let mut module = FixtureModule::new(id);
            for dep in *deps {
                module
                    .dependencies
                    .push(Dependency::Module(ModuleId::from(*dep)));
                module
                    .dependencies_to_be_included
                    .push(Dependency::Module(ModuleId::from(*dep)));
            }
            for target in *dynamic {
                module.add_dynamic_import(ModuleId::from(*target));
            }
            modules.insert(ModuleId::from(*id), module);
        }
        modules
    }
}

impl Module for FixtureModule {
    fn id(&self) -> ModuleId {
        self.id.clone()
    }

    fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    fn dependencies_to_be_included(&self) -> &[Dependency] {
        &self.dependencies_to_be_included
    }

    fn dynamic_imports(&self) -> &[DynamicImport] {
        &self.dynamic_imports
    }

    fn included_dynamic_importers(&self) -> &[ModuleId] {
        &self.included_dynamic_importers
    }

    fn implicitly_loaded_before(&self) -> &[ModuleId] {
        &self.implicitly_loaded_before
    }

    fn implicitly_loaded_after(&self) -> &[ModuleId] {
        &self.implicitly_loaded_after
    }

    fn has_effects(&self) -> bool {
        self.has_effects
    }

    fn size(&self) -> ByteSize {
        self.size
    }
}
