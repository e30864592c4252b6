//! Built-in blueprint templates.

use super::types::BlueprintTemplate;
use crate::blueprint::{ChecklistItem, Phase, Priority, Task, TaskStatus};

/// Build a task whose status follows its checklist: all checked is
/// completed, some checked is in progress.
fn task(id: &str, title: &str, priority: Priority, minutes: u32, items: &[(&str, bool)]) -> Task {
    let mut task = Task::new(id, title)
        .with_priority(priority)
        .with_estimate(minutes);
    task.checklist = items
        .iter()
        .map(|(label, checked)| ChecklistItem {
            label: (*label).to_string(),
            checked: *checked,
        })
        .collect();
    task.recompute_completion();

    let checked = task.checked_count();
    task.status = if task.is_completed() {
        TaskStatus::Completed
    } else if checked > 0 {
        TaskStatus::InProgress
    } else {
        TaskStatus::NotStarted
    };
    task
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The hub's own development plan. Used as the default seed.
pub fn jdx_tech_hub_template() -> BlueprintTemplate {
    use Priority::*;

    BlueprintTemplate {
        key: "jdx-tech-hub".to_string(),
        name: "JDX Tech Hub - Development Command Center".to_string(),
        description:
            "Personal project management dashboard with AWS integration, authentication, and blueprint tracking"
                .to_string(),
        project_type: "web-app".to_string(),
        estimated_hours: 60,
        tech_stack: strings(&["Next.js 14", "React", "Tailwind CSS", "AWS Cognito", "DynamoDB"]),
        tags: strings(&["dashboard", "nextjs", "aws", "cognito", "dynamodb"]),
        phases: vec![
            Phase::new("foundation", "Foundation & Database", 1)
                .with_description("Core infrastructure, database setup, and project structure")
                .with_task(task(
                    "database-setup",
                    "Setup DynamoDB Infrastructure",
                    Critical,
                    180,
                    &[
                        ("Created DynamoDB table 'jdx-projects'", true),
                        ("Configured partition key 'id'", true),
                        ("Added GSI for status queries", true),
                        ("Enable point-in-time recovery", false),
                        ("Configure CloudWatch monitoring", false),
                    ],
                ))
                .with_task(task(
                    "project-structure",
                    "Next.js Project Structure",
                    Critical,
                    90,
                    &[
                        ("Initialize Next.js 14 application", true),
                        ("Configure Tailwind CSS", true),
                        ("Setup App Router structure", true),
                        ("Configure ESLint and Prettier", false),
                    ],
                )),
            Phase::new("authentication", "Authentication System", 2)
                .with_description("AWS Cognito integration with single-user auth and security")
                .with_task(task(
                    "cognito-setup",
                    "AWS Cognito Configuration",
                    Critical,
                    240,
                    &[
                        ("Created Cognito User Pool", true),
                        ("Created App Client (secret-free)", true),
                        ("Created single authorized user", true),
                    ],
                ))
                .with_task(task(
                    "auth-implementation",
                    "Authentication Implementation",
                    Critical,
                    300,
                    &[
                        ("Created login page with hidden access", true),
                        ("Implemented route protection", true),
                        ("Added auth checks to dashboard", true),
                        ("NEW_PASSWORD_REQUIRED challenge flow", true),
                    ],
                )),
            Phase::new("theme-system", "Theme System", 3)
                .with_description("Dynamic theme switching with Carbon Forge as default")
                .with_task(task(
                    "theme-architecture",
                    "Theme System Architecture",
                    High,
                    180,
                    &[
                        ("Created theme configuration system", true),
                        ("Built theme switcher component", true),
                        ("Implemented CSS custom properties", true),
                    ],
                )),
            Phase::new("blueprint-system", "Blueprint & Progress Tracking", 4)
                .with_description("Development command center with detailed progress tracking")
                .with_task(task(
                    "blueprint-types",
                    "Blueprint Type System",
                    Critical,
                    120,
                    &[
                        ("Created comprehensive type definitions", true),
                        ("Created sample blueprint templates", true),
                    ],
                ))
                .with_task(task(
                    "blueprint-test-page",
                    "Blueprint Test & Visualization",
                    High,
                    240,
                    &[
                        ("Created blueprint test page", true),
                        ("Implemented progress visualization", true),
                        ("Added navigation from dashboard", true),
                    ],
                ))
                .with_task(task(
                    "detailed-tracking",
                    "Enhanced Detail Tracking System",
                    Critical,
                    360,
                    &[
                        ("Implement multi-level detail structure", true),
                        ("Create real JDX Tech Hub blueprint data", false),
                        ("Build enhanced command center page", false),
                        ("Add production readiness gap analysis", false),
                    ],
                )),
            Phase::new("production-ready", "Production Readiness", 5)
                .with_description("Security, monitoring, and deployment optimization")
                .with_task(task(
                    "security-hardening",
                    "Security & Hardening",
                    Critical,
                    300,
                    &[
                        ("Secure environment variables", false),
                        ("Implement API rate limiting", false),
                        ("Add comprehensive input validation", false),
                        ("Implement proper error boundaries", false),
                    ],
                ))
                .with_task(task(
                    "monitoring",
                    "Monitoring & Analytics",
                    Medium,
                    180,
                    &[
                        ("Setup CloudWatch monitoring", false),
                        ("Configure error tracking service", false),
                    ],
                )),
        ],
    }
}

/// Multi-user web application with authentication and payments.
pub fn saas_template() -> BlueprintTemplate {
    use Priority::*;

    BlueprintTemplate {
        key: "saas".to_string(),
        name: "SaaS Application".to_string(),
        description:
            "Multi-user web application with authentication, payments, and subscriptions"
                .to_string(),
        project_type: "web-app".to_string(),
        estimated_hours: 120,
        tech_stack: strings(&["Next.js", "React", "Node.js", "PostgreSQL", "Stripe", "Auth0"]),
        tags: strings(&["saas", "web-app", "authentication", "payments", "subscriptions"]),
        phases: vec![
            Phase::new("foundation", "Foundation & Setup", 1)
                .with_description("Project setup, database, and core infrastructure")
                .with_task(task(
                    "project-setup",
                    "Initialize Project Structure",
                    Critical,
                    120,
                    &[
                        ("Create Next.js application", false),
                        ("Configure ESLint and Prettier", false),
                        ("Setup Tailwind CSS", false),
                        ("Configure environment variables", false),
                    ],
                ))
                .with_task(task(
                    "database-setup",
                    "Database Configuration",
                    Critical,
                    180,
                    &[
                        ("Choose and setup database provider", false),
                        ("Configure Prisma ORM", false),
                        ("Design initial database schema", false),
                        ("Run initial migrations", false),
                    ],
                )),
            Phase::new("authentication", "User Authentication", 2)
                .with_description("User registration, login, and session management")
                .with_task(task(
                    "auth-setup",
                    "Authentication Setup",
                    Critical,
                    240,
                    &[
                        ("Configure NextAuth", false),
                        ("Add OAuth providers", false),
                        ("Create user model", false),
                        ("Build sign-in and sign-up pages", false),
                    ],
                )),
            Phase::new("core-features", "Core Features", 3)
                .with_description("Dashboard and primary user workflows")
                .with_task(task(
                    "dashboard",
                    "User Dashboard",
                    High,
                    300,
                    &[
                        ("Dashboard layout", false),
                        ("Usage statistics", false),
                        ("Quick actions", false),
                    ],
                )),
            Phase::new("deployment", "Deployment", 4)
                .with_description("Production hosting and release")
                .with_task(task(
                    "production-deploy",
                    "Production Deployment",
                    High,
                    180,
                    &[
                        ("Setup hosting", false),
                        ("Configure domain and DNS", false),
                        ("Set production environment variables", false),
                    ],
                )),
        ],
    }
}

/// Content-driven marketing or portfolio site.
pub fn website_template() -> BlueprintTemplate {
    use Priority::*;

    BlueprintTemplate {
        key: "website".to_string(),
        name: "Marketing Website".to_string(),
        description: "Content-focused website with a design system and core pages".to_string(),
        project_type: "web-app".to_string(),
        estimated_hours: 40,
        tech_stack: strings(&["Next.js", "Tailwind CSS", "MDX"]),
        tags: strings(&["website", "marketing", "content"]),
        phases: vec![
            Phase::new("design-content", "Design & Content", 1)
                .with_description("Brand, components and copy")
                .with_task(task(
                    "design-system",
                    "Design System",
                    High,
                    240,
                    &[("Define brand colors", false), ("Build component library", false)],
                )),
            Phase::new("pages-content", "Pages & Content", 2)
                .with_description("Build the public pages")
                .with_task(task(
                    "core-pages",
                    "Core Pages",
                    High,
                    300,
                    &[("Homepage", false), ("About page", false)],
                )),
        ],
    }
}

/// React Native application.
pub fn mobile_template() -> BlueprintTemplate {
    use Priority::*;

    BlueprintTemplate {
        key: "mobile".to_string(),
        name: "Mobile App".to_string(),
        description: "Cross-platform mobile application built with React Native".to_string(),
        project_type: "mobile-app".to_string(),
        estimated_hours: 80,
        tech_stack: strings(&["React Native", "Expo", "TypeScript"]),
        tags: strings(&["mobile", "react-native", "expo"]),
        phases: vec![Phase::new("app-setup", "App Setup", 1)
            .with_description("Project scaffolding and navigation")
            .with_task(task(
                "rn-init",
                "Initialize React Native Project",
                Critical,
                120,
                &[("Initialize Expo project", false), ("Setup navigation", false)],
            ))],
    }
}

/// Blank starting point.
pub fn custom_template() -> BlueprintTemplate {
    BlueprintTemplate {
        key: "custom".to_string(),
        name: "Custom Project".to_string(),
        description: "Start with a blank blueprint and customize as needed".to_string(),
        project_type: "web-app".to_string(),
        estimated_hours: 40,
        tech_stack: vec![],
        tags: strings(&["custom", "blank", "flexible"]),
        phases: vec![Phase::new("planning", "Project Planning", 1)
            .with_description("Define requirements and plan the project structure")
            .with_task(task(
                "requirements",
                "Requirements Gathering",
                Priority::Critical,
                180,
                &[("Define project scope", false), ("Choose technology stack", false)],
            ))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_helper_derives_status() {
        let done = task("a", "A", Priority::High, 10, &[("x", true)]);
        assert_eq!(done.status, TaskStatus::Completed);
        assert!(done.is_completed());

        let partial = task("b", "B", Priority::High, 10, &[("x", true), ("y", false)]);
        assert_eq!(partial.status, TaskStatus::InProgress);

        let fresh = task("c", "C", Priority::High, 10, &[("x", false)]);
        assert_eq!(fresh.status, TaskStatus::NotStarted);
    }

    #[test]
    fn test_builtins_instantiate() {
        for template in [
            jdx_tech_hub_template(),
            saas_template(),
            website_template(),
            mobile_template(),
            custom_template(),
        ] {
            let result = template.instantiate("Check", chrono::Utc::now());
            assert!(result.is_ok(), "template '{}' should be valid", template.key);
        }
    }
}
