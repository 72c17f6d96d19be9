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

//! Loads a JSON module-graph fixture and validates it against the
//! collaborator contract `assign_chunks` assumes: parse first, then
//! check. JSON parsing never panics, but a structurally-sound JSON
//! document describing an unsound graph (a dangling module reference)
//! is still rejected before it ever reaches the algorithm.

use chunk_core::{ByteSize, Dependency, DynamicImport, DynamicImportResolution, Module, ModuleId};
use indexmap::IndexMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("could not parse fixture JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("entry {0:?} does not name a module in this fixture")]
    UnknownEntryModule(String),
    #[error("manual chunk alias {alias:?} pins unknown module {module:?}")]
    UnknownManualAliasModule { module: String, alias: String },
    #[error("module {importer:?} dynamically imports unknown module {target:?}")]
    UnknownDynamicImportTarget { importer: String, target: String },
}

fn default_true() -> bool {
    true
}

/// The on-disk shape of a module. `dependencies_to_be_included`
/// defaults to a clone of `dependencies` when omitted, since hand
/// written fixtures usually have nothing tree-shaken away.
#[derive(Debug, Clone, serde::Deserialize)]
struct RawModule {
    id: ModuleId,
    #[serde(default)]
    dependencies: Vec<Dependency>,
    #[serde(default)]
    dependencies_to_be_included: Option<Vec<Dependency>>,
    #[serde(default)]
    dynamic_imports: Vec<DynamicImport>,
    #[serde(default)]
    included_dynamic_importers: Vec<ModuleId>,
    #[serde(default)]
    implicitly_loaded_before: Vec<ModuleId>,
    #[serde(default)]
    implicitly_loaded_after: Vec<ModuleId>,
    #[serde(default = "default_true")]
    has_effects: bool,
    #[serde(default)]
    size: ByteSize,
}

/// A fully-resolved fixture module: owns every field `Module` exposes
/// as a slice, post tree-shake defaulting.
#[derive(Debug, Clone)]
pub struct FixtureModule {
    id: ModuleId,
    dependencies: Vec<Dependency>,
    dependencies_to_be_included: Vec<Dependency>,
    dynamic_imports: Vec<DynamicImport>,
    included_dynamic_importers: Vec<ModuleId>,
    implicitly_loaded_before: Vec<ModuleId>,
    implicitly_loaded_after: Vec<ModuleId>,
    has_effects: bool,
    size: ByteSize,
}

impl From<RawModule> for FixtureModule {
    fn from(raw: RawModule) -> Self {
        let dependencies_to_be_included = raw
            .dependencies_to_be_included
            .unwrap_or_else(|| raw.dependencies.clone());
        Self {
            id: raw.id,
            dependencies: raw.dependencies,
            dependencies_to_be_included,
            dynamic_imports: raw.dynamic_imports,
            included_dynamic_importers: raw.included_dynamic_importers,
            implicitly_loaded_before: raw.implicitly_loaded_before,
            implicitly_loaded_after: raw.implicitly_loaded_after,
            has_effects: raw.has_effects,
            size: raw.size,
        }
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

#[derive(Debug, serde::Deserialize)]
struct RawFixture {
    modules: Vec<RawModule>,
    #[serde(default)]
    entries: Vec<ModuleId>,
    #[serde(default)]
    manual_chunks: IndexMap<ModuleId, String>,
    #[serde(default)]
    min_chunk_size: u64,
}

/// A validated fixture, ready to hand to `chunk_assign::assign_chunks`.
pub struct ParsedFixture {
    pub modules: IndexMap<ModuleId, FixtureModule>,
    pub entries: Vec<ModuleId>,
    pub manual_alias_by_entry: IndexMap<ModuleId, String>,
    pub min_chunk_size: u64,
}

/// Parses and validates a JSON module-graph fixture. See the crate's
/// `fixtures/` directory for examples of the expected shape.
pub fn load_fixture(source: &str) -> Result<ParsedFixture, FixtureError> {
    let raw: RawFixture = serde_json::from_str(source)?;

    let modules: IndexMap<ModuleId, FixtureModule> = raw
        .modules
        .into_iter()
        .map(|module| (module.id.clone(), FixtureModule::from(module)))
        .collect();

    for entry in &raw.entries {
        if !modules.contains_key(entry) {
            return Err(FixtureError::UnknownEntryModule(entry.to_string()));
        }
    }

    for (module, alias) in &raw.manual_chunks {
        if !modules.contains_key(module) {
            return Err(FixtureError::UnknownManualAliasModule {
                module: module.to_string(),
                alias: alias.clone(),
            });
        }
    }

    for module in modules.values() {
        for dynamic_import in module.dynamic_imports() {
            if let DynamicImportResolution::Module(target) = &dynamic_import.resolution {
                if !modules.contains_key(target) {
                    return Err(FixtureError::UnknownDynamicImportTarget {
                        importer: module.id().to_string(),
                        target: target.to_string(),
                    });
                }
            }
        }
    }

    Ok(ParsedFixture {
        modules,
        entries: raw.entries,
        manual_alias_by_entry: raw.manual_chunks,
        min_chunk_size: raw.min_chunk_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_json_is_rejected() {
        let err = load_fixture("not json").unwrap_err();
        assert!(matches!(err, FixtureError::InvalidJson(_)));
    }

    #[test]
    fn well_formed_fixture_parses_into_a_non_empty_module_map() {
        let json = r#"{
            "modules": [
                {"id": "main", "dependencies": [{"type": "module", "id": "util"}]},
                {"id": "util"}
            ],
            "entries": ["main"]
        }"#;

        let fixture = load_fixture(json).expect("fixture should parse");
        assert_eq!(fixture.modules.len(), 2);
        assert_eq!(fixture.entries, vec![ModuleId::from("main")]);
        assert_eq!(fixture.min_chunk_size, 0);
    }

    #[test]
    fn entry_referencing_unknown_module_is_rejected() {
        let json = r#"{"modules": [{"id": "main"}], "entries": ["missing"]}"#;
        let err = load_fixture(json).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownEntryModule(id) if id == "missing"));
    }

    #[test]
    fn manual_alias_referencing_unknown_module_is_rejected() {
        let json = r#"{
            "modules": [{"id": "main"}],
            "manual_chunks": {"vendor": "vendor-chunk"}
        }"#;
        let err = load_fixture(json).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownManualAliasModule { module, .. } if module == "vendor"));
    }

    #[test]
    fn dynamic_import_to_unknown_module_is_rejected() {
        let json = r#"{
            "modules": [
                {"id": "main", "dynamic_imports": [{"resolution": {"type": "module", "id": "ghost"}}]}
            ],
            "entries": ["main"]
        }"#;
        let err = load_fixture(json).unwrap_err();
        assert!(matches!(err, FixtureError::UnknownDynamicImportTarget { target, .. } if target == "ghost"));
    }

    #[test]
    fn dependencies_to_be_included_defaults_to_dependencies() {
        let json = r#"{
            "modules": [
                {"id": "main", "dependencies": [{"type": "module", "id": "util"}]},
                {"id": "util"}
            ]
        }"#;
        let fixture = load_fixture(json).expect("fixture should parse");
        let main = &fixture.modules[&ModuleId::from("main")];
        assert_eq!(main.dependencies_to_be_included().len(), 1);
    }
}
