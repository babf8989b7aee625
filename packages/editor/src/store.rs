//! # Mutation Store
//!
//! The single, synchronous gateway for document changes. Every command either
//! lands completely (and is recorded in history) or comes back as
//! [`CommandOutcome::Noop`] with the document untouched. Read accessors never
//! fail; a miss is `None`.
//!
//! The only hard failure is loading a corrupt project, which is rejected
//! before it can replace the current one.

use std::sync::Arc;

use blockpage_document::{
    from_json, new_id, slugify, to_json, validate_block, validate_page, validate_project,
    AttrMap, Block, BlockType, Page, Project, ProjectMetadata, SerializationError,
    TemplateRegistry, ValidationError,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::command::{Command, CommandOutcome, PagePatch};
use crate::errors::{PersistError, StoreError};
use crate::mutations::{BlockPatch, Mutation, MutationError};
use crate::persistence::ProjectStorage;
use crate::state::EditorState;
use crate::tasks::CommandQueue;
use crate::undo_stack::{HistoryConfig, HistoryEntryInfo, UndoStack};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    pub history: HistoryConfig,

    /// Save to storage after every accepted command
    pub persist_on_mutation: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            persist_on_mutation: true,
        }
    }
}

#[derive(Debug)]
pub struct Store {
    state: EditorState,
    history: UndoStack,
    templates: TemplateRegistry,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    storage: Option<Box<dyn ProjectStorage>>,
    version: u64,
}

impl Store {
    /// Store holding an empty "Untitled" project
    pub fn new(config: StoreConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let project = Project::new("Untitled", clock.now());

        Self {
            state: EditorState::new(project),
            history: UndoStack::with_config(config.history),
            templates: TemplateRegistry::builtin(),
            config,
            clock,
            storage: None,
            version: 0,
        }
    }

    /// Use `clock` for every timestamp from now on, including the current project's
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.state.project.metadata = ProjectMetadata::new(self.clock.now());
        self
    }

    pub fn with_storage(mut self, storage: impl ProjectStorage + 'static) -> Self {
        self.storage = Some(Box::new(storage));
        self
    }

    pub fn with_templates(mut self, templates: TemplateRegistry) -> Self {
        self.templates = templates;
        self
    }

    // ------------------------------------------------------------------
    // Project lifecycle
    // ------------------------------------------------------------------

    /// Replace the current project with a fresh one
    pub fn create_project(&mut self, name: impl Into<String>) -> &Project {
        let project = Project::new(name, self.clock.now());
        self.replace_project(project);
        &self.state.project
    }

    /// Parse, validate and install a project from JSON.
    ///
    /// On error the current project and its history are left as they were.
    pub fn load_project(&mut self, data: &str) -> Result<(), ValidationError> {
        let project = from_json(data, &self.templates)?;
        self.replace_project(project);
        Ok(())
    }

    /// Validate and install an already-parsed project
    pub fn load(&mut self, project: Project) -> Result<(), ValidationError> {
        validate_project(&project, &self.templates)?;
        self.replace_project(project);
        Ok(())
    }

    /// Load a project previously saved to storage
    pub fn restore(&mut self, project_id: &str) -> Result<(), PersistError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| PersistError::Unavailable("no storage configured".to_string()))?;
        let json = storage.load(project_id)?;
        self.load_project(&json)?;
        Ok(())
    }

    fn replace_project(&mut self, project: Project) {
        info!(
            project_id = %project.id,
            pages = project.pages.len(),
            "Loaded project"
        );
        self.state = EditorState::new(project);
        self.history.clear();
        self.version += 1;
        self.persist();
    }

    pub fn rename_project(&mut self, name: impl Into<String>) -> CommandOutcome {
        self.commit(Mutation::SetProjectName { name: name.into() })
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Append a page and make it current. Returns the page id.
    ///
    /// Missing page and block ids are assigned; an empty slug is derived from the name.
    pub fn add_page(&mut self, mut page: Page) -> CommandOutcome<String> {
        if page.id.is_empty() {
            page.id = new_id();
        }
        if page.slug.is_empty() {
            page.slug = slugify(&page.name);
        }
        for block in page.blocks.iter_mut().filter(|b| b.id.is_empty()) {
            block.id = new_id();
        }
        if let Err(e) = validate_page(&page, &self.templates) {
            return self.reject("addPage", e.into());
        }

        let page_id = page.id.clone();
        let index = self.state.project.pages.len();
        self.commit_all(
            "Add page",
            vec![
                Mutation::InsertPage { index, page },
                Mutation::SetCurrentPage {
                    page_id: page_id.clone(),
                },
            ],
        )
        .map(|_| page_id)
    }

    /// Shorthand for adding an empty page with default settings
    pub fn add_page_named(&mut self, name: impl Into<String>) -> CommandOutcome<String> {
        self.add_page(Page::new(name))
    }

    /// Removing the last page is refused as an invariant violation
    pub fn remove_page(&mut self, page_id: &str) -> CommandOutcome {
        self.commit(Mutation::RemovePage {
            page_id: page_id.to_string(),
        })
    }

    /// Switch pages; selection is cleared when the page changes
    pub fn set_current_page(&mut self, page_id: &str) -> CommandOutcome {
        if self.state.project.page(page_id).is_none() {
            return self.reject("setCurrentPage", StoreError::PageNotFound(page_id.to_string()));
        }
        if self.state.current_page_id == page_id {
            return CommandOutcome::Applied(());
        }
        self.commit(Mutation::SetCurrentPage {
            page_id: page_id.to_string(),
        })
    }

    pub fn update_page(&mut self, page_id: &str, patch: &PagePatch) -> CommandOutcome {
        let Some(page) = self.state.project.page(page_id) else {
            return self.reject("updatePage", StoreError::PageNotFound(page_id.to_string()));
        };

        let mut name = page.name.clone();
        let mut slug = page.slug.clone();
        let mut settings = page.settings.clone();
        patch.merge(&mut name, &mut slug, &mut settings);

        self.commit(Mutation::SetPageMeta {
            page_id: page_id.to_string(),
            name,
            slug,
            settings,
        })
    }

    // ------------------------------------------------------------------
    // Blocks (always on the current page)
    // ------------------------------------------------------------------

    /// Append a block to the current page and select it. Returns the block id.
    ///
    /// An empty id is replaced with a fresh one and keys missing from the
    /// kind's template are filled with its defaults.
    pub fn add_block(&mut self, block: Block) -> CommandOutcome<String> {
        self.insert_block(block, None)
    }

    /// Like [`add_block`](Self::add_block) at a position clamped into `[0, len]`
    pub fn add_block_at(&mut self, block: Block, index: i64) -> CommandOutcome<String> {
        let len = self.state.current_page().map_or(0, |page| page.blocks.len()) as i64;
        self.insert_block(block, Some(index.clamp(0, len) as usize))
    }

    pub fn add_block_from_template(&mut self, kind: &BlockType) -> CommandOutcome<String> {
        let Some(template) = self.templates.get(kind) else {
            return self.reject("addBlockFromTemplate", StoreError::UnknownTemplate(kind.to_string()));
        };
        let block = template.instantiate();
        self.add_block(block)
    }

    fn insert_block(&mut self, mut block: Block, index: Option<usize>) -> CommandOutcome<String> {
        if block.id.is_empty() {
            block.id = new_id();
        }
        if let Some(template) = self.templates.get(&block.kind) {
            template.seed(&mut block);
        }
        if let Err(e) = validate_block(&block, &self.templates) {
            return self.reject("addBlock", e.into());
        }

        let len = self.state.current_page().map_or(0, |page| page.blocks.len());
        let block_id = block.id.clone();
        let outcome = self.commit(Mutation::InsertBlock {
            page_id: self.state.current_page_id.clone(),
            index: index.unwrap_or(len).min(len),
            block,
        });

        if outcome.is_applied() {
            self.state.selected_block_id = Some(block_id.clone());
        }
        outcome.map(|_| block_id)
    }

    /// Shallow merge of `patch.content` and `patch.styles` into the block
    pub fn update_block(&mut self, block_id: &str, patch: BlockPatch) -> CommandOutcome {
        self.commit(Mutation::UpdateBlock {
            page_id: self.state.current_page_id.clone(),
            block_id: block_id.to_string(),
            patch,
        })
    }

    /// Removing the selected block also clears the selection
    pub fn remove_block(&mut self, block_id: &str) -> CommandOutcome {
        self.commit(Mutation::RemoveBlock {
            page_id: self.state.current_page_id.clone(),
            block_id: block_id.to_string(),
        })
    }

    /// Move a block to `new_index`, clamped into `[0, len - 1]`
    pub fn move_block(&mut self, block_id: &str, new_index: i64) -> CommandOutcome {
        let Some(page) = self.state.current_page() else {
            let page_id = self.state.current_page_id.clone();
            return self.reject("moveBlock", StoreError::PageNotFound(page_id));
        };
        if page.block(block_id).is_none() {
            return self.reject("moveBlock", StoreError::BlockNotFound(block_id.to_string()));
        }

        let last = page.blocks.len().saturating_sub(1) as i64;
        self.commit(Mutation::MoveBlock {
            page_id: self.state.current_page_id.clone(),
            block_id: block_id.to_string(),
            index: new_index.clamp(0, last) as usize,
        })
    }

    /// Deep copy with a fresh id, inserted right after the original and selected
    pub fn duplicate_block(&mut self, block_id: &str) -> CommandOutcome<String> {
        let found = self.state.current_page().and_then(|page| {
            page.block_index(block_id)
                .map(|index| (index, page.blocks[index].clone()))
        });
        let Some((index, original)) = found else {
            return self.reject("duplicateBlock", StoreError::BlockNotFound(block_id.to_string()));
        };

        let copy = Block {
            id: new_id(),
            ..original
        };
        let copy_id = copy.id.clone();
        let outcome = self.commit(Mutation::InsertBlock {
            page_id: self.state.current_page_id.clone(),
            index: index + 1,
            block: copy,
        });

        if outcome.is_applied() {
            self.state.selected_block_id = Some(copy_id.clone());
        }
        outcome.map(|_| copy_id)
    }

    /// Shallow merge into the project theme
    pub fn update_global_styles(&mut self, patch: AttrMap) -> CommandOutcome {
        self.commit(Mutation::UpdateGlobalStyles { patch })
    }

    /// Selection is not recorded in history. Unknown ids are refused.
    ///
    /// Changing the selection ends the current gesture: the next block update
    /// starts a new history entry even inside the coalescing window.
    pub fn select_block(&mut self, block_id: Option<&str>) -> CommandOutcome {
        if let Some(id) = block_id {
            if self.state.block(id).is_none() {
                return self.reject("selectBlock", StoreError::BlockNotFound(id.to_string()));
            }
        }
        if self.state.selected_block_id.as_deref() != block_id {
            self.history.break_coalescing();
        }
        self.state.selected_block_id = block_id.map(str::to_string);
        CommandOutcome::Applied(())
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    pub fn undo(&mut self) -> CommandOutcome {
        let result = self.history.undo(&mut self.state);
        self.after_replay("undo", result)
    }

    pub fn redo(&mut self) -> CommandOutcome {
        let result = self.history.redo(&mut self.state);
        self.after_replay("redo", result)
    }

    fn after_replay(
        &mut self,
        action: &str,
        result: Result<bool, MutationError>,
    ) -> CommandOutcome {
        match result {
            Ok(true) => {
                self.state.repair_selection();
                self.after_change(action);
                CommandOutcome::Applied(())
            }
            Ok(false) => {
                debug!(action, "History stack empty");
                CommandOutcome::Noop(StoreError::HistoryUnderflow)
            }
            Err(e) => self.reject(action, e.into()),
        }
    }

    /// Group the following commands into one history entry until `end_batch`
    pub fn begin_batch(&mut self, label: impl Into<String>) {
        let now = self.clock.now();
        self.history.begin_batch(label, &self.state, now);
    }

    pub fn end_batch(&mut self) -> bool {
        self.history.end_batch()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_levels()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_levels()
    }

    /// Undo entries, oldest first
    pub fn history_entries(&self) -> Vec<HistoryEntryInfo> {
        self.history.entries()
    }

    /// Redo entries, next to redo first
    pub fn redo_entries(&self) -> Vec<HistoryEntryInfo> {
        self.history.redo_entries()
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Apply a serialized command
    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        debug!(command = command.name(), "Dispatching command");

        match command {
            Command::CreateProject { name } => {
                self.create_project(name);
                CommandOutcome::Applied(())
            }
            Command::LoadProject { project } => match self.load(*project) {
                Ok(()) => CommandOutcome::Applied(()),
                Err(e) => self.reject("loadProject", e.into()),
            },
            Command::RenameProject { name } => self.rename_project(name),
            Command::AddPage { page } => self.add_page(page).discard(),
            Command::RemovePage { page_id } => self.remove_page(&page_id),
            Command::SetCurrentPage { page_id } => self.set_current_page(&page_id),
            Command::UpdatePage { page_id, patch } => self.update_page(&page_id, &patch),
            Command::AddBlock { block, index: None } => self.add_block(block).discard(),
            Command::AddBlock {
                block,
                index: Some(index),
            } => self.add_block_at(block, index).discard(),
            Command::AddBlockFromTemplate { block_type } => {
                self.add_block_from_template(&block_type).discard()
            }
            Command::UpdateBlock { block_id, patch } => self.update_block(&block_id, patch),
            Command::RemoveBlock { block_id } => self.remove_block(&block_id),
            Command::MoveBlock { block_id, index } => self.move_block(&block_id, index),
            Command::DuplicateBlock { block_id } => self.duplicate_block(&block_id).discard(),
            Command::UpdateGlobalStyles { patch } => self.update_global_styles(patch),
            Command::SelectBlock { block_id } => self.select_block(block_id.as_deref()),
            Command::Undo => self.undo(),
            Command::Redo => self.redo(),
        }
    }

    /// Apply every queued leaf-task command, in arrival order
    pub fn drain(&mut self, queue: &mut CommandQueue) -> Vec<CommandOutcome> {
        let mut outcomes = Vec::new();
        while let Some(command) = queue.try_next() {
            outcomes.push(self.dispatch(command));
        }
        outcomes
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn project(&self) -> &Project {
        &self.state.project
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.state.current_page()
    }

    pub fn current_page_id(&self) -> &str {
        &self.state.current_page_id
    }

    /// Block on the current page
    pub fn block(&self, block_id: &str) -> Option<&Block> {
        self.state.block(block_id)
    }

    pub fn page(&self, page_id: &str) -> Option<&Page> {
        self.state.project.page(page_id)
    }

    pub fn selected_block_id(&self) -> Option<&str> {
        self.state.selected_block_id.as_deref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.state.selected_block()
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Bumped by every accepted change, including undo/redo and loads
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Canonical JSON of the current project
    pub fn to_json(&self) -> Result<String, SerializationError> {
        to_json(&self.state.project)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Save the current project now. A store without storage has nothing to do.
    pub fn save(&self) -> Result<(), PersistError> {
        match &self.storage {
            Some(storage) => storage.save(&self.state.project),
            None => {
                debug!("No storage configured, skipping save");
                Ok(())
            }
        }
    }

    fn persist(&self) {
        if !self.config.persist_on_mutation {
            return;
        }
        if let Err(e) = self.save() {
            warn!(
                project_id = %self.state.project.id,
                error = %e,
                "Failed to persist project, keeping in-memory state"
            );
        }
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn commit(&mut self, mutation: Mutation) -> CommandOutcome {
        let label = mutation.label();
        let now = self.clock.now();
        match self.history.apply(&mutation, &mut self.state, now) {
            Ok(()) => {
                self.after_change(label);
                CommandOutcome::Applied(())
            }
            Err(e) => self.reject(label, e.into()),
        }
    }

    fn commit_all(&mut self, label: &str, mutations: Vec<Mutation>) -> CommandOutcome {
        let now = self.clock.now();
        match self.history.apply_all(&mutations, label, &mut self.state, now) {
            Ok(()) => {
                self.after_change(label);
                CommandOutcome::Applied(())
            }
            Err(e) => self.reject(label, e.into()),
        }
    }

    fn after_change(&mut self, action: &str) {
        self.version += 1;
        debug!(
            action,
            version = self.version,
            undo_depth = self.history.undo_levels(),
            redo_depth = self.history.redo_levels(),
            "Applied"
        );
        self.persist();
    }

    fn reject<T>(&self, action: &str, error: StoreError) -> CommandOutcome<T> {
        warn!(action, error = %error, "Command rejected, document unchanged");
        CommandOutcome::Noop(error)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
