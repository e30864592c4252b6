//! Unit tests for storage types and builder patterns.

use super::*;

#[test]
fn test_project_new() {
    let project = Project::new("JDX Tech Hub");
    assert!(!project.id.is_empty());
    assert_eq!(project.name, "JDX Tech Hub");
    assert_eq!(project.status, DEFAULT_PROJECT_STATUS);
    assert!(project.description.is_empty());
    assert!(project.tech_stack.is_empty());
    assert_eq!(project.created_at, project.updated_at);
}

#[test]
fn test_project_ids_are_unique() {
    assert_ne!(Project::new("a").id, Project::new("a").id);
}

#[test]
fn test_project_builders() {
    let project = Project::new("Portfolio")
        .with_description("Personal site")
        .with_status("development")
        .with_tech_stack(["Next.js", "Tailwind CSS"]);

    assert_eq!(project.description, "Personal site");
    assert_eq!(project.status, "development");
    assert_eq!(project.tech_stack, vec!["Next.js", "Tailwind CSS"]);
}

#[test]
fn test_project_serializes_camel_case() {
    let project = Project::new("X").with_tech_stack(["Rust"]);
    let value = serde_json::to_value(&project).unwrap();
    assert!(value.get("techStack").is_some());
    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
    assert!(value.get("tech_stack").is_none());
}

#[test]
fn test_project_deserialize_defaults() {
    let json = r#"{
        "id": "p1",
        "name": "Bare",
        "status": "active",
        "createdAt": "2024-01-01T00:00:00Z",
        "updatedAt": "2024-01-01T00:00:00Z"
    }"#;
    let project: Project = serde_json::from_str(json).unwrap();
    assert!(project.description.is_empty());
    assert!(project.tech_stack.is_empty());
}
