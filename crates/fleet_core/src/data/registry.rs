//! The immutable content registry injected into every runtime.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::building_data::{BuildingData, BuildingTypeId};
use crate::data::tech_data::{ElementData, ElementId, TechData, TechId};
use crate::economy::ResourceKind;
use crate::error::{Result, SimError};

/// Keyed building, tech and element definitions plus resource values.
///
/// Loaded once before simulation and shared read-only (usually behind an
/// `Arc`) by any number of runtimes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    /// Building definitions.
    #[serde(default)]
    pub buildings: BTreeMap<BuildingTypeId, BuildingData>,
    /// Tech definitions.
    #[serde(default)]
    pub techs: BTreeMap<TechId, TechData>,
    /// Element definitions.
    #[serde(default)]
    pub elements: BTreeMap<ElementId, ElementData>,
    /// XP-equivalent value of one unit of each resource.
    #[serde(default)]
    pub resource_values: BTreeMap<ResourceKind, f64>,
}

impl Registry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from RON.
    pub fn from_ron(src: &str) -> Result<Self> {
        ron::from_str(src).map_err(|e| SimError::DataParseError {
            what: "registry".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the registry to pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SimError::Serialization(e.to_string()))
    }

    /// Builder: add a building.
    #[must_use]
    pub fn with_building(mut self, building: BuildingData) -> Self {
        self.buildings.insert(building.id, building);
        self
    }

    /// Builder: add a tech.
    #[must_use]
    pub fn with_tech(mut self, tech: TechData) -> Self {
        self.techs.insert(tech.id, tech);
        self
    }

    /// Builder: add an element.
    #[must_use]
    pub fn with_element(mut self, element: ElementData) -> Self {
        self.elements.insert(element.id, element);
        self
    }

    /// Builder: set a resource's XP value.
    #[must_use]
    pub fn with_resource_value(mut self, resource: ResourceKind, value: f64) -> Self {
        self.resource_values.insert(resource, value);
        self
    }

    /// Look up a building.
    #[must_use]
    pub fn building(&self, id: BuildingTypeId) -> Option<&BuildingData> {
        self.buildings.get(&id)
    }

    /// Look up a tech.
    #[must_use]
    pub fn tech(&self, id: TechId) -> Option<&TechData> {
        self.techs.get(&id)
    }

    /// Look up an element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&ElementData> {
        self.elements.get(&id)
    }

    /// XP value of one unit of a resource (1.0 when unlisted).
    #[must_use]
    pub fn resource_value(&self, resource: ResourceKind) -> f64 {
        self.resource_values.get(&resource).copied().unwrap_or(1.0)
    }
}
