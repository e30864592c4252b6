//! Template registry for seeding blueprints.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::error;

use super::builtins;
use super::types::{BlueprintTemplate, TemplateSummary};

/// Registry for blueprint templates.
///
/// Thread-safe storage for template definitions with the built-in
/// templates registered on creation.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, BlueprintTemplate>>,
}

impl TemplateRegistry {
    /// Create a new registry with built-in templates.
    pub fn new() -> Self {
        let registry = Self {
            templates: RwLock::new(HashMap::new()),
        };
        registry.register_builtins();
        registry
    }

    /// Register a template.
    ///
    /// # Errors
    /// Returns error if the key is empty, the template has no phases, or a
    /// template with the same key already exists.
    pub fn register(&self, template: BlueprintTemplate) -> Result<(), String> {
        if template.key.is_empty() {
            return Err("Template key is required".to_string());
        }
        if template.phases.is_empty() {
            return Err("Template must have at least one phase".to_string());
        }

        let mut templates = self
            .templates
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if templates.contains_key(&template.key) {
            return Err(format!("Template '{}' already exists", template.key));
        }

        templates.insert(template.key.clone(), template);
        Ok(())
    }

    /// Get a template by key.
    pub fn get(&self, key: &str) -> Option<BlueprintTemplate> {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Summaries of every template, sorted by key.
    pub fn list(&self) -> Vec<TemplateSummary> {
        let mut summaries: Vec<_> = self
            .templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|t| t.to_summary())
            .collect();
        summaries.sort_by(|a, b| a.key.cmp(&b.key));
        summaries
    }

    /// Get the number of registered templates.
    pub fn count(&self) -> usize {
        self.templates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn register_builtins(&self) {
        let templates = [
            ("jdx-tech-hub", builtins::jdx_tech_hub_template()),
            ("saas", builtins::saas_template()),
            ("website", builtins::website_template()),
            ("mobile", builtins::mobile_template()),
            ("custom", builtins::custom_template()),
        ];

        for (name, template) in templates {
            if let Err(e) = self.register(template) {
                error!(
                    template = name,
                    error = %e,
                    "Failed to register builtin template"
                );
            }
        }
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{Phase, Task};

    fn test_template(key: &str) -> BlueprintTemplate {
        BlueprintTemplate {
            key: key.to_string(),
            name: format!("Test {}", key),
            description: "A test template".to_string(),
            project_type: "library".to_string(),
            estimated_hours: 1,
            tech_stack: vec![],
            tags: vec![],
            phases: vec![Phase::new("only", "Only", 1).with_task(Task::new("t", "T"))],
        }
    }

    #[test]
    fn test_registry_new_has_builtins() {
        let registry = TemplateRegistry::new();
        assert_eq!(registry.count(), 5);
        for key in ["jdx-tech-hub", "saas", "website", "mobile", "custom"] {
            assert!(registry.get(key).is_some(), "missing builtin '{}'", key);
        }
    }

    #[test]
    fn test_registry_register_and_get() {
        let registry = TemplateRegistry::new();
        registry.register(test_template("cli-tool")).unwrap();
        let retrieved = registry.get("cli-tool").unwrap();
        assert_eq!(retrieved.key, "cli-tool");
    }

    #[test]
    fn test_registry_duplicate_fails() {
        let registry = TemplateRegistry::new();
        registry.register(test_template("dup")).unwrap();
        let result = registry.register(test_template("dup"));
        assert!(result.unwrap_err().contains("already exists"));
    }

    #[test]
    fn test_registry_validation() {
        let registry = TemplateRegistry::new();

        let mut template = test_template("x");
        template.key = String::new();
        assert!(registry.register(template).is_err());

        let mut template = test_template("y");
        template.phases.clear();
        assert!(registry.register(template).is_err());
    }

    #[test]
    fn test_registry_list_summaries() {
        let registry = TemplateRegistry::new();
        let list = registry.list();
        assert_eq!(list.len(), 5);
        assert_eq!(list[0].key, "custom");

        let hub = list.iter().find(|s| s.key == "jdx-tech-hub").unwrap();
        assert_eq!(hub.phase_count, 5);
        assert_eq!(hub.task_count, 10);
        assert_eq!(hub.project_type, "web-app");
    }

    #[test]
    fn test_registry_get_nonexistent() {
        let registry = TemplateRegistry::default();
        assert!(registry.get("enterprise").is_none());
    }
}
