use blockpage_document::{Block, Page, Project};

/// The document plus the editor's view of it.
///
/// `current_page_id` always names an existing page and `selected_block_id`
/// is either `None` or a block on the current page. Mutations keep both true.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub project: Project,
    pub current_page_id: String,
    pub selected_block_id: Option<String>,
}

impl EditorState {
    /// Start on the project's first page with nothing selected.
    pub fn new(project: Project) -> Self {
        let current_page_id = project
            .pages
            .first()
            .map(|page| page.id.clone())
            .unwrap_or_default();

        Self {
            project,
            current_page_id,
            selected_block_id: None,
        }
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.project.page(&self.current_page_id)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        let id = self.current_page_id.clone();
        self.project.page_mut(&id)
    }

    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.current_page().and_then(|page| page.block(block_id))
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected_block_id
            .as_deref()
            .and_then(|id| self.block(id))
    }

    /// Drop the selection if it no longer resolves on the current page.
    pub(crate) fn repair_selection(&mut self) {
        let dangling = match &self.selected_block_id {
            Some(id) => self.block(id).is_none(),
            None => false,
        };
        if dangling {
            self.selected_block_id = None;
        }
    }
}
