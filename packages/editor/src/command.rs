//! Public command surface of the Store.
//!
//! [`Command`] is the serializable form used by leaf tasks and the CLI;
//! [`CommandOutcome`] is what every command hands back.

use blockpage_document::{AttrMap, Block, BlockType, Page, PageSettings, Project};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::mutations::BlockPatch;

/// Result of a Store command.
///
/// Soft failures never escape the Store as errors: the document is left
/// untouched and the reason comes back in `Noop`.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome<T = ()> {
    Applied(T),
    Noop(StoreError),
}

impl<T> CommandOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, CommandOutcome::Applied(_))
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, CommandOutcome::Noop(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            CommandOutcome::Applied(value) => Some(value),
            CommandOutcome::Noop(_) => None,
        }
    }

    pub fn error(&self) -> Option<&StoreError> {
        match self {
            CommandOutcome::Applied(_) => None,
            CommandOutcome::Noop(e) => Some(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CommandOutcome<U> {
        match self {
            CommandOutcome::Applied(value) => CommandOutcome::Applied(f(value)),
            CommandOutcome::Noop(e) => CommandOutcome::Noop(e),
        }
    }

    /// Forget the applied value
    pub fn discard(self) -> CommandOutcome {
        self.map(|_| ())
    }

    pub fn into_result(self) -> Result<T, StoreError> {
        match self {
            CommandOutcome::Applied(value) => Ok(value),
            CommandOutcome::Noop(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, StoreError>> for CommandOutcome<T> {
    fn from(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(value) => CommandOutcome::Applied(value),
            Err(e) => CommandOutcome::Noop(e),
        }
    }
}

/// Shallow patch for a page. Unset fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PagePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_image: Option<String>,
}

impl PagePatch {
    pub(crate) fn merge(&self, name: &mut String, slug: &mut String, settings: &mut PageSettings) {
        if let Some(value) = &self.name {
            *name = value.clone();
        }
        if let Some(value) = &self.slug {
            *slug = value.clone();
        }
        if let Some(value) = &self.title {
            settings.title = value.clone();
        }
        if let Some(value) = &self.description {
            settings.description = value.clone();
        }
        if let Some(value) = &self.og_image {
            settings.og_image = Some(value.clone()).filter(|v| !v.is_empty());
        }
    }
}

/// Every Store command in serializable form.
///
/// ```json
/// { "command": "updateBlock", "blockId": "b1", "patch": { "content": { "title": "B" } } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    CreateProject {
        name: String,
    },
    LoadProject {
        project: Box<Project>,
    },
    RenameProject {
        name: String,
    },
    AddPage {
        page: Page,
    },
    RemovePage {
        page_id: String,
    },
    SetCurrentPage {
        page_id: String,
    },
    UpdatePage {
        page_id: String,
        patch: PagePatch,
    },
    AddBlock {
        block: Block,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        index: Option<i64>,
    },
    AddBlockFromTemplate {
        block_type: BlockType,
    },
    UpdateBlock {
        block_id: String,
        patch: BlockPatch,
    },
    RemoveBlock {
        block_id: String,
    },
    MoveBlock {
        block_id: String,
        index: i64,
    },
    DuplicateBlock {
        block_id: String,
    },
    UpdateGlobalStyles {
        patch: AttrMap,
    },
    SelectBlock {
        #[serde(default)]
        block_id: Option<String>,
    },
    Undo,
    Redo,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateProject { .. } => "createProject",
            Command::LoadProject { .. } => "loadProject",
            Command::RenameProject { .. } => "renameProject",
            Command::AddPage { .. } => "addPage",
            Command::RemovePage { .. } => "removePage",
            Command::SetCurrentPage { .. } => "setCurrentPage",
            Command::UpdatePage { .. } => "updatePage",
            Command::AddBlock { .. } => "addBlock",
            Command::AddBlockFromTemplate { .. } => "addBlockFromTemplate",
            Command::UpdateBlock { .. } => "updateBlock",
            Command::RemoveBlock { .. } => "removeBlock",
            Command::MoveBlock { .. } => "moveBlock",
            Command::DuplicateBlock { .. } => "duplicateBlock",
            Command::UpdateGlobalStyles { .. } => "updateGlobalStyles",
            Command::SelectBlock { .. } => "selectBlock",
            Command::Undo => "undo",
            Command::Redo => "redo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_command_wire_format() {
        let command: Command = serde_json::from_value(json!({
            "command": "updateBlock",
            "blockId": "b1",
            "patch": { "content": { "title": "B" } }
        }))
        .unwrap();

        match &command {
            Command::UpdateBlock { block_id, patch } => {
                assert_eq!(block_id, "b1");
                assert_eq!(patch.content["title"], "B");
                assert!(patch.styles.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(command.name(), "updateBlock");

        let undo: Command = serde_json::from_value(json!({ "command": "undo" })).unwrap();
        assert_eq!(undo, Command::Undo);
    }

    #[test]
    fn test_add_block_from_template_parses_kind() {
        let command: Command = serde_json::from_value(json!({
            "command": "addBlockFromTemplate",
            "blockType": "hero"
        }))
        .unwrap();
        assert_eq!(
            command,
            Command::AddBlockFromTemplate {
                block_type: BlockType::Hero
            }
        );
    }

    #[test]
    fn test_outcome_helpers() {
        let applied: CommandOutcome<String> = CommandOutcome::Applied("id".into());
        assert!(applied.is_applied());
        assert_eq!(applied.clone().discard(), CommandOutcome::Applied(()));
        assert_eq!(applied.applied().as_deref(), Some("id"));

        let noop: CommandOutcome = CommandOutcome::Noop(StoreError::HistoryUnderflow);
        assert_eq!(noop.error(), Some(&StoreError::HistoryUnderflow));
        assert!(noop.into_result().is_err());
    }

    #[test]
    fn test_page_patch_merge() {
        let mut name = "Home".to_string();
        let mut slug = "home".to_string();
        let mut settings = PageSettings::default();
        let patch = PagePatch {
            title: Some("Welcome".into()),
            og_image: Some("/og.png".into()),
            ..Default::default()
        };
        patch.merge(&mut name, &mut slug, &mut settings);

        assert_eq!(name, "Home");
        assert_eq!(settings.title, "Welcome");
        assert_eq!(settings.og_image.as_deref(), Some("/og.png"));
    }
}
