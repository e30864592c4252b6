//! Data types for blueprint templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::blueprint::{Blueprint, Decision, Phase};
use crate::error::TrackerResult;

/// A catalog entry used to seed new blueprints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueprintTemplate {
    /// Lookup key (e.g., "saas").
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// What kind of project the template suits.
    pub description: String,
    /// Project type (web-app, mobile-app, api, desktop-app, library).
    pub project_type: String,
    /// Rough effort for the whole template.
    pub estimated_hours: u32,
    /// Suggested technologies.
    #[serde(default)]
    pub tech_stack: Vec<String>,
    /// Tags for searchability.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Phases copied into each new blueprint.
    pub phases: Vec<Phase>,
}

/// Condensed template listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateSummary {
    /// Lookup key.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Template description.
    pub description: String,
    /// Project type.
    pub project_type: String,
    /// Rough effort in hours.
    pub estimated_hours: u32,
    /// Number of phases.
    pub phase_count: usize,
    /// Number of tasks across all phases.
    pub task_count: usize,
}

impl BlueprintTemplate {
    /// Summary for listings.
    pub fn to_summary(&self) -> TemplateSummary {
        TemplateSummary {
            key: self.key.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            project_type: self.project_type.clone(),
            estimated_hours: self.estimated_hours,
            phase_count: self.phases.len(),
            task_count: self.phases.iter().map(|p| p.tasks.len()).sum(),
        }
    }

    /// Seed a blueprint named `name` from this template. The decision log
    /// starts with a single entry recording the initialisation.
    pub fn instantiate(&self, name: impl Into<String>, now: DateTime<Utc>) -> TrackerResult<Blueprint> {
        let mut blueprint = Blueprint::new(name, self.key.clone(), self.phases.clone())?;
        blueprint.decisions.push(Decision::new(
            now.date_naive(),
            "Initialize project blueprint",
            "Need structured development approach with progress tracking",
            "Will guide development phases and track completion",
            "Project Setup",
        ));
        Ok(blueprint)
    }
}
