//! Canonical JSON form of a project: the save/reload source of truth.

use crate::error::{SerializationError, ValidationError};
use crate::model::Project;
use crate::templates::TemplateRegistry;
use crate::validate::validate_project;

/// Pretty-printed, lossless project JSON.
pub fn to_json(project: &Project) -> Result<String, SerializationError> {
    Ok(serde_json::to_string_pretty(project)?)
}

/// Parse and validate. Nothing is returned unless the whole project is valid.
pub fn from_json(source: &str, templates: &TemplateRegistry) -> Result<Project, ValidationError> {
    let project: Project = serde_json::from_str(source)?;
    validate_project(&project, templates)?;
    Ok(project)
}

pub fn from_value(
    value: serde_json::Value,
    templates: &TemplateRegistry,
) -> Result<Project, ValidationError> {
    let project: Project = serde_json::from_value(value)?;
    validate_project(&project, templates)?;
    Ok(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, BlockType};
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_round_trip_is_lossless() {
        let templates = TemplateRegistry::builtin();
        let mut project = Project::new("Site", Utc::now());
        project.pages[0].settings.og_image = Some("https://example.com/og.png".into());
        project.pages[0]
            .blocks
            .push(templates.get(&BlockType::Pricing).unwrap().instantiate());
        project.pages[0].blocks.push(
            Block::new(BlockType::Other("carousel".into()))
                .with_id("c1")
                .with_content("speed", 1.5)
                .with_style("animation", json!({ "name": "slide" })),
        );
        project.global_styles.set("accentColor", json!("#F00"));

        let json = to_json(&project).unwrap();
        let back = from_json(&json, &templates).unwrap();
        assert_eq!(back, project);
    }

    #[test]
    fn test_missing_pages_is_rejected() {
        let templates = TemplateRegistry::builtin();
        let source = r#"{ "id": "p", "name": "x", "globalStyles": {} }"#;
        assert!(matches!(
            from_json(source, &templates),
            Err(ValidationError::Malformed(_))
        ));
    }

    #[test]
    fn test_block_missing_template_key_is_rejected() {
        let templates = TemplateRegistry::builtin();
        let value = json!({
            "id": "p",
            "name": "Site",
            "globalStyles": {},
            "pages": [{
                "id": "home",
                "name": "Home",
                "blocks": [{ "id": "b1", "type": "hero", "content": { "title": "A" } }]
            }]
        });
        assert!(matches!(
            from_value(value, &templates),
            Err(ValidationError::MissingContentKey { .. })
        ));
    }

    #[test]
    fn test_camel_case_field_names() {
        let project = Project::new("Site", Utc::now());
        let json = to_json(&project).unwrap();
        assert!(json.contains("\"globalStyles\""));
        assert!(json.contains("\"primaryColor\""));
        assert!(json.contains("\"createdAt\""));
    }
}
