//! # Document Mutations
//!
//! Low-level, invertible operations on [`EditorState`]. The Store translates
//! each public command into one or more of these and the undo stack records
//! them next to their inverses.
//!
//! ## Semantics
//!
//! - `apply` validates first and either changes the state completely or not at all
//! - `to_inverse` is computed against the state *before* `apply`
//! - Block mutations address a block by `(page_id, block_id)`; ids are only
//!   unique within a page
//! - Selection is repaired on apply (removing the selected block clears it) but
//!   is never itself restored by an inverse

use std::collections::BTreeSet;

use blockpage_document::{AttrMap, Block, GlobalStyles, Page, PageSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::EditorState;

/// Shallow patch for a block: each key replaces the block's key of the same name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockPatch {
    pub content: AttrMap,
    pub styles: AttrMap,
}

impl BlockPatch {
    pub fn content(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let mut patch = Self::default();
        patch.content.insert(key.into(), value.into());
        patch
    }

    pub fn style(key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let mut patch = Self::default();
        patch.styles.insert(key.into(), value.into());
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.styles.is_empty()
    }

    fn merge_into(&self, block: &mut Block) {
        for (key, value) in &self.content {
            block.content.insert(key.clone(), value.clone());
        }
        for (key, value) in &self.styles {
            block.styles.insert(key.clone(), value.clone());
        }
    }
}

/// Mutations that target the same block field set and may share one history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalesceKey {
    pub page_id: String,
    pub block_id: String,
    pub content_keys: BTreeSet<String>,
    pub style_keys: BTreeSet<String>,
}

/// Invertible document operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mutation {
    SetProjectName {
        name: String,
    },

    InsertPage {
        index: usize,
        page: Page,
    },

    RemovePage {
        page_id: String,
    },

    /// Replace a page's name, slug and settings (blocks untouched)
    SetPageMeta {
        page_id: String,
        name: String,
        slug: String,
        settings: PageSettings,
    },

    SetCurrentPage {
        page_id: String,
    },

    /// Insert a block; `index` is clamped to the page length
    InsertBlock {
        page_id: String,
        index: usize,
        block: Block,
    },

    UpdateBlock {
        page_id: String,
        block_id: String,
        patch: BlockPatch,
    },

    /// Swap a block for another with the same id
    ReplaceBlock {
        page_id: String,
        block: Block,
    },

    RemoveBlock {
        page_id: String,
        block_id: String,
    },

    /// Move a block; `index` is clamped to `[0, len - 1]`
    MoveBlock {
        page_id: String,
        block_id: String,
        index: usize,
    },

    UpdateGlobalStyles {
        patch: AttrMap,
    },

    SetGlobalStyles {
        styles: GlobalStyles,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Block not found: {0}")]
    BlockNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Block id '{block_id}' already exists on page '{page_id}'")]
    DuplicateBlockId { page_id: String, block_id: String },

    #[error("Page id already exists: {0}")]
    DuplicatePageId(String),

    #[error("Missing id on {0}")]
    MissingId(String),

    #[error("Cannot remove the last page")]
    LastPage,
}

impl Mutation {
    /// Apply mutation to the state with validation
    pub fn apply(&self, state: &mut EditorState) -> Result<(), MutationError> {
        self.validate(state)?;

        match self {
            Mutation::SetProjectName { name } => {
                state.project.name = name.clone();
            }

            Mutation::InsertPage { index, page } => {
                let index = (*index).min(state.project.pages.len());
                state.project.pages.insert(index, page.clone());
            }

            Mutation::RemovePage { page_id } => Self::apply_remove_page(state, page_id)?,

            Mutation::SetPageMeta {
                page_id,
                name,
                slug,
                settings,
            } => {
                let page = Self::page_mut(state, page_id)?;
                page.name = name.clone();
                page.slug = slug.clone();
                page.settings = settings.clone();
            }

            Mutation::SetCurrentPage { page_id } => {
                if state.current_page_id != *page_id {
                    state.current_page_id = page_id.clone();
                    state.selected_block_id = None;
                }
            }

            Mutation::InsertBlock {
                page_id,
                index,
                block,
            } => {
                let page = Self::page_mut(state, page_id)?;
                let index = (*index).min(page.blocks.len());
                page.blocks.insert(index, block.clone());
            }

            Mutation::UpdateBlock {
                page_id,
                block_id,
                patch,
            } => {
                let block = Self::block_mut(state, page_id, block_id)?;
                patch.merge_into(block);
            }

            Mutation::ReplaceBlock { page_id, block } => {
                let target = Self::block_mut(state, page_id, &block.id)?;
                *target = block.clone();
            }

            Mutation::RemoveBlock { page_id, block_id } => {
                let page = Self::page_mut(state, page_id)?;
                let index = page
                    .block_index(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                page.blocks.remove(index);
                state.repair_selection();
            }

            Mutation::MoveBlock {
                page_id,
                block_id,
                index,
            } => {
                let page = Self::page_mut(state, page_id)?;
                let from = page
                    .block_index(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                let block = page.blocks.remove(from);
                let to = (*index).min(page.blocks.len());
                page.blocks.insert(to, block);
            }

            Mutation::UpdateGlobalStyles { patch } => {
                state.project.global_styles.merge(patch);
            }

            Mutation::SetGlobalStyles { styles } => {
                state.project.global_styles = styles.clone();
            }
        }

        Ok(())
    }

    /// Check structural constraints without touching the state
    pub fn validate(&self, state: &EditorState) -> Result<(), MutationError> {
        match self {
            Mutation::SetProjectName { .. }
            | Mutation::UpdateGlobalStyles { .. }
            | Mutation::SetGlobalStyles { .. } => Ok(()),

            Mutation::InsertPage { page, .. } => {
                if page.id.is_empty() {
                    return Err(MutationError::MissingId(format!("page '{}'", page.name)));
                }
                if state.project.page(&page.id).is_some() {
                    return Err(MutationError::DuplicatePageId(page.id.clone()));
                }
                Ok(())
            }

            Mutation::RemovePage { page_id } => {
                Self::page(state, page_id)?;
                if state.project.pages.len() <= 1 {
                    return Err(MutationError::LastPage);
                }
                Ok(())
            }

            Mutation::SetPageMeta { page_id, .. } | Mutation::SetCurrentPage { page_id } => {
                Self::page(state, page_id).map(|_| ())
            }

            Mutation::InsertBlock { page_id, block, .. } => {
                let page = Self::page(state, page_id)?;
                if block.id.is_empty() {
                    return Err(MutationError::MissingId(format!("{} block", block.kind)));
                }
                if page.block(&block.id).is_some() {
                    return Err(MutationError::DuplicateBlockId {
                        page_id: page_id.clone(),
                        block_id: block.id.clone(),
                    });
                }
                Ok(())
            }

            Mutation::UpdateBlock {
                page_id, block_id, ..
            }
            | Mutation::RemoveBlock { page_id, block_id }
            | Mutation::MoveBlock {
                page_id, block_id, ..
            } => Self::block(state, page_id, block_id).map(|_| ()),

            Mutation::ReplaceBlock { page_id, block } => {
                Self::block(state, page_id, &block.id).map(|_| ())
            }
        }
    }

    /// The mutations that undo this one, in application order.
    ///
    /// Must be called before `apply`.
    pub fn to_inverse(&self, state: &EditorState) -> Result<Vec<Mutation>, MutationError> {
        self.validate(state)?;

        let inverse = match self {
            Mutation::SetProjectName { .. } => vec![Mutation::SetProjectName {
                name: state.project.name.clone(),
            }],

            Mutation::InsertPage { page, .. } => vec![Mutation::RemovePage {
                page_id: page.id.clone(),
            }],

            Mutation::RemovePage { page_id } => {
                let index = state
                    .project
                    .page_index(page_id)
                    .ok_or_else(|| MutationError::PageNotFound(page_id.clone()))?;
                vec![
                    Mutation::InsertPage {
                        index,
                        page: state.project.pages[index].clone(),
                    },
                    Mutation::SetCurrentPage {
                        page_id: state.current_page_id.clone(),
                    },
                ]
            }

            Mutation::SetPageMeta { page_id, .. } => {
                let page = Self::page(state, page_id)?;
                vec![Mutation::SetPageMeta {
                    page_id: page_id.clone(),
                    name: page.name.clone(),
                    slug: page.slug.clone(),
                    settings: page.settings.clone(),
                }]
            }

            Mutation::SetCurrentPage { .. } => vec![Mutation::SetCurrentPage {
                page_id: state.current_page_id.clone(),
            }],

            Mutation::InsertBlock { page_id, block, .. } => vec![Mutation::RemoveBlock {
                page_id: page_id.clone(),
                block_id: block.id.clone(),
            }],

            Mutation::UpdateBlock {
                page_id, block_id, ..
            } => vec![Mutation::ReplaceBlock {
                page_id: page_id.clone(),
                block: Self::block(state, page_id, block_id)?.clone(),
            }],

            Mutation::ReplaceBlock { page_id, block } => vec![Mutation::ReplaceBlock {
                page_id: page_id.clone(),
                block: Self::block(state, page_id, &block.id)?.clone(),
            }],

            Mutation::RemoveBlock { page_id, block_id } => {
                let page = Self::page(state, page_id)?;
                let index = page
                    .block_index(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                vec![Mutation::InsertBlock {
                    page_id: page_id.clone(),
                    index,
                    block: page.blocks[index].clone(),
                }]
            }

            Mutation::MoveBlock {
                page_id, block_id, ..
            } => {
                let page = Self::page(state, page_id)?;
                let index = page
                    .block_index(block_id)
                    .ok_or_else(|| MutationError::BlockNotFound(block_id.clone()))?;
                vec![Mutation::MoveBlock {
                    page_id: page_id.clone(),
                    block_id: block_id.clone(),
                    index,
                }]
            }

            Mutation::UpdateGlobalStyles { .. } | Mutation::SetGlobalStyles { .. } => {
                vec![Mutation::SetGlobalStyles {
                    styles: state.project.global_styles.clone(),
                }]
            }
        };

        Ok(inverse)
    }

    /// Only block updates coalesce.
    pub fn coalesce_key(&self) -> Option<CoalesceKey> {
        match self {
            Mutation::UpdateBlock {
                page_id,
                block_id,
                patch,
            } => Some(CoalesceKey {
                page_id: page_id.clone(),
                block_id: block_id.clone(),
                content_keys: patch.content.keys().cloned().collect(),
                style_keys: patch.styles.keys().cloned().collect(),
            }),
            _ => None,
        }
    }

    /// Human-readable name for history UIs
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::SetProjectName { .. } => "Rename project",
            Mutation::InsertPage { .. } => "Add page",
            Mutation::RemovePage { .. } => "Remove page",
            Mutation::SetPageMeta { .. } => "Update page",
            Mutation::SetCurrentPage { .. } => "Switch page",
            Mutation::InsertBlock { .. } => "Add block",
            Mutation::UpdateBlock { .. } => "Update block",
            Mutation::ReplaceBlock { .. } => "Replace block",
            Mutation::RemoveBlock { .. } => "Remove block",
            Mutation::MoveBlock { .. } => "Move block",
            Mutation::UpdateGlobalStyles { .. } | Mutation::SetGlobalStyles { .. } => {
                "Update theme"
            }
        }
    }

    fn apply_remove_page(state: &mut EditorState, page_id: &str) -> Result<(), MutationError> {
        let index = state
            .project
            .page_index(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))?;
        state.project.pages.remove(index);

        if state.current_page_id == page_id {
            // Land on the page that took its place, or the new last page
            let neighbour = index.min(state.project.pages.len() - 1);
            state.current_page_id = state.project.pages[neighbour].id.clone();
            state.selected_block_id = None;
        }

        Ok(())
    }

    fn page<'a>(state: &'a EditorState, page_id: &str) -> Result<&'a Page, MutationError> {
        state
            .project
            .page(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
    }

    fn page_mut<'a>(
        state: &'a mut EditorState,
        page_id: &str,
    ) -> Result<&'a mut Page, MutationError> {
        state
            .project
            .page_mut(page_id)
            .ok_or_else(|| MutationError::PageNotFound(page_id.to_string()))
    }

    fn block<'a>(
        state: &'a EditorState,
        page_id: &str,
        block_id: &str,
    ) -> Result<&'a Block, MutationError> {
        Self::page(state, page_id)?
            .block(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
    }

    fn block_mut<'a>(
        state: &'a mut EditorState,
        page_id: &str,
        block_id: &str,
    ) -> Result<&'a mut Block, MutationError> {
        Self::page_mut(state, page_id)?
            .block_mut(block_id)
            .ok_or_else(|| MutationError::BlockNotFound(block_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpage_document::{BlockType, Project};
    use chrono::Utc;

    fn state_with_blocks(ids: &[&str]) -> EditorState {
        let mut state = EditorState::new(Project::new("Site", Utc::now()));
        let page = state.current_page_mut().unwrap();
        for id in ids {
            page.blocks
                .push(Block::new(BlockType::Text).with_id(*id).with_content("content", *id));
        }
        state
    }

    fn page_id(state: &EditorState) -> String {
        state.current_page_id.clone()
    }

    fn block_ids(state: &EditorState) -> Vec<String> {
        state
            .current_page()
            .unwrap()
            .blocks
            .iter()
            .map(|b| b.id.clone())
            .collect()
    }

    fn apply_with_inverse(mutation: &Mutation, state: &mut EditorState) -> Vec<Mutation> {
        let inverse = mutation.to_inverse(state).unwrap();
        mutation.apply(state).unwrap();
        inverse
    }

    #[test]
    fn test_update_block_is_shallow_key_replace() {
        let mut state = state_with_blocks(&["a"]);
        let mutation = Mutation::UpdateBlock {
            page_id: page_id(&state),
            block_id: "a".into(),
            patch: BlockPatch::content("variant", "lead"),
        };
        mutation.apply(&mut state).unwrap();

        let block = state.block("a").unwrap();
        assert_eq!(block.content["content"], "a");
        assert_eq!(block.content["variant"], "lead");
    }

    #[test]
    fn test_update_block_inverse_restores_missing_keys() {
        let mut state = state_with_blocks(&["a"]);
        let before = state.clone();
        let mutation = Mutation::UpdateBlock {
            page_id: page_id(&state),
            block_id: "a".into(),
            patch: BlockPatch::style("padding", "py-16"),
        };

        let inverse = apply_with_inverse(&mutation, &mut state);
        for m in &inverse {
            m.apply(&mut state).unwrap();
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_move_block_clamps() {
        let mut state = state_with_blocks(&["a", "b", "c"]);
        let page = page_id(&state);
        Mutation::MoveBlock {
            page_id: page.clone(),
            block_id: "a".into(),
            index: 99,
        }
        .apply(&mut state)
        .unwrap();
        assert_eq!(block_ids(&state), vec!["b", "c", "a"]);

        let inverse = apply_with_inverse(
            &Mutation::MoveBlock {
                page_id: page,
                block_id: "c".into(),
                index: 0,
            },
            &mut state,
        );
        assert_eq!(block_ids(&state), vec!["c", "b", "a"]);
        inverse[0].apply(&mut state).unwrap();
        assert_eq!(block_ids(&state), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_remove_block_clears_selection() {
        let mut state = state_with_blocks(&["a", "b"]);
        state.selected_block_id = Some("a".into());

        let inverse = apply_with_inverse(
            &Mutation::RemoveBlock {
                page_id: page_id(&state),
                block_id: "a".into(),
            },
            &mut state,
        );
        assert!(state.selected_block_id.is_none());

        inverse[0].apply(&mut state).unwrap();
        assert_eq!(block_ids(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let state = state_with_blocks(&["a"]);
        let mutation = Mutation::InsertBlock {
            page_id: page_id(&state),
            index: 0,
            block: Block::new(BlockType::Divider).with_id("a"),
        };
        assert!(matches!(
            mutation.validate(&state),
            Err(MutationError::DuplicateBlockId { .. })
        ));
    }

    #[test]
    fn test_remove_last_page_is_rejected() {
        let mut state = state_with_blocks(&[]);
        let mutation = Mutation::RemovePage {
            page_id: page_id(&state),
        };
        assert_eq!(mutation.apply(&mut state), Err(MutationError::LastPage));
        assert_eq!(state.project.pages.len(), 1);
    }

    #[test]
    fn test_remove_current_page_moves_to_neighbour_and_inverse_restores() {
        let mut state = state_with_blocks(&[]);
        let home = page_id(&state);
        let about = Page::new("About");
        let about_id = about.id.clone();

        Mutation::InsertPage {
            index: 1,
            page: about,
        }
        .apply(&mut state)
        .unwrap();
        Mutation::SetCurrentPage {
            page_id: about_id.clone(),
        }
        .apply(&mut state)
        .unwrap();

        let before = state.clone();
        let inverse = apply_with_inverse(
            &Mutation::RemovePage {
                page_id: about_id.clone(),
            },
            &mut state,
        );
        assert_eq!(state.current_page_id, home);

        for m in &inverse {
            m.apply(&mut state).unwrap();
        }
        assert_eq!(state, before);
        assert_eq!(state.current_page_id, about_id);
    }

    #[test]
    fn test_global_styles_inverse() {
        let mut state = state_with_blocks(&[]);
        let before = state.clone();
        let mut patch = AttrMap::new();
        patch.insert("primaryColor".into(), "#000000".into());
        patch.insert("accentColor".into(), "#FF0000".into());

        let inverse = apply_with_inverse(&Mutation::UpdateGlobalStyles { patch }, &mut state);
        assert_eq!(state.project.global_styles.primary_color, "#000000");

        inverse[0].apply(&mut state).unwrap();
        assert_eq!(state, before);
    }

    #[test]
    fn test_coalesce_key_only_for_block_updates() {
        let a = Mutation::UpdateBlock {
            page_id: "p".into(),
            block_id: "b".into(),
            patch: BlockPatch::style("height", "40px"),
        };
        let b = Mutation::UpdateBlock {
            page_id: "p".into(),
            block_id: "b".into(),
            patch: BlockPatch::style("height", "48px"),
        };
        let c = Mutation::UpdateBlock {
            page_id: "p".into(),
            block_id: "b".into(),
            patch: BlockPatch::content("height", "48px"),
        };
        assert_eq!(a.coalesce_key(), b.coalesce_key());
        assert_ne!(a.coalesce_key(), c.coalesce_key());
        assert!(Mutation::SetProjectName { name: "x".into() }
            .coalesce_key()
            .is_none());
    }
}
