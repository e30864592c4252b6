//! Built-in blueprint templates.
//!
//! A template is a named phase/task/checklist tree used to seed the
//! blueprint of a project the first time it is opened.
//!
//! # Available Templates
//!
//! - `jdx-tech-hub`: the hub's own development plan (default)
//! - `saas`: multi-user web application with payments
//! - `website`: content-focused marketing site
//! - `mobile`: React Native application
//! - `custom`: blank planning phase

mod builtins;
mod registry;
mod types;

pub use registry::TemplateRegistry;
pub use types::{BlueprintTemplate, TemplateSummary};
