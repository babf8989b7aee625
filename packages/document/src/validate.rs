//! Structural rules for projects, pages and blocks.

use std::collections::HashSet;

use crate::error::{ValidationError, ValidationResult};
use crate::model::{Block, Page, Project};
use crate::templates::TemplateRegistry;

/// A block must carry every content key its kind's template defines.
///
/// Kinds without a template have no required keys.
pub fn validate_block(block: &Block, templates: &TemplateRegistry) -> ValidationResult<()> {
    if block.id.is_empty() {
        return Err(ValidationError::MissingId(format!("{} block", block.kind)));
    }

    if let Some(template) = templates.get(&block.kind) {
        for key in template.required_keys() {
            if !block.content.contains_key(key) {
                return Err(ValidationError::missing_content_key(
                    block.id.clone(),
                    block.kind.to_string(),
                    key,
                ));
            }
        }
    }

    Ok(())
}

/// Block ids are unique within the page and every block validates.
pub fn validate_page(page: &Page, templates: &TemplateRegistry) -> ValidationResult<()> {
    if page.id.is_empty() {
        return Err(ValidationError::MissingId(format!("page '{}'", page.name)));
    }

    let mut seen = HashSet::new();
    for block in &page.blocks {
        validate_block(block, templates)?;
        if !seen.insert(block.id.as_str()) {
            return Err(ValidationError::DuplicateBlockId {
                page_id: page.id.clone(),
                block_id: block.id.clone(),
            });
        }
    }

    Ok(())
}

/// At least one page, unique page ids, every page validates.
pub fn validate_project(project: &Project, templates: &TemplateRegistry) -> ValidationResult<()> {
    if project.id.is_empty() {
        return Err(ValidationError::MissingId("project".to_string()));
    }
    if project.pages.is_empty() {
        return Err(ValidationError::NoPages);
    }

    let mut seen = HashSet::new();
    for page in &project.pages {
        validate_page(page, templates)?;
        if !seen.insert(page.id.as_str()) {
            return Err(ValidationError::DuplicatePageId(page.id.clone()));
        }
    }

    Ok(())
}
