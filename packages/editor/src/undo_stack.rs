//! # Undo/Redo Stack
//!
//! Tracks mutation history and enables undo/redo operations.
//!
//! ## Design
//!
//! - Each mutation records its inverse before being applied
//! - Undo applies the inverses and moves the batch to the redo stack
//! - Redo reapplies the original mutations
//! - New mutations clear the redo stack
//! - The undo stack is bounded; the oldest batch is evicted first
//! - Batches restore the project's `updatedAt` they started from, so undoing
//!   back to the origin is deep-equal on the serialized project
//! - Consecutive block updates touching the same fields within the coalescing
//!   window share one batch (a slider drag is one undo step)
//! - Supports explicit batches (group multiple mutations as one undo step)
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//!
//! stack.apply(&mutation, &mut state, clock.now())?;
//! stack.undo(&mut state)?;
//! stack.redo(&mut state)?;
//! ```

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::mutations::{CoalesceKey, Mutation, MutationError};
use crate::state::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of undo levels (0 = unlimited)
    pub max_depth: usize,

    /// Debounce window for merging block updates (0 = never merge)
    pub coalesce_window_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: 50,
            coalesce_window_ms: 300,
        }
    }
}

/// A group of mutations that should be undone/redone together
#[derive(Debug, Clone)]
pub struct MutationBatch {
    /// The mutations in this batch (in application order)
    pub mutations: Vec<Mutation>,

    /// The inverse mutations (in the order undo applies them)
    pub inverses: Vec<Mutation>,

    pub label: String,

    /// When the batch was opened
    pub timestamp: DateTime<Utc>,

    pub updated_at_before: DateTime<Utc>,
    pub updated_at_after: DateTime<Utc>,

    coalesce_key: Option<CoalesceKey>,
    last_change: DateTime<Utc>,
}

impl MutationBatch {
    fn open(label: impl Into<String>, now: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        Self {
            mutations: Vec::new(),
            inverses: Vec::new(),
            label: label.into(),
            timestamp: now,
            updated_at_before: updated_at,
            updated_at_after: updated_at,
            coalesce_key: None,
            last_change: now,
        }
    }

    fn info(&self) -> HistoryEntryInfo {
        HistoryEntryInfo {
            label: self.label.clone(),
            timestamp: self.timestamp,
            mutations: self.mutations.len(),
        }
    }
}

/// What a history UI gets to see of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryInfo {
    pub label: String,
    pub timestamp: DateTime<Utc>,
    pub mutations: usize,
}

/// Undo/redo stack for document editing
#[derive(Debug)]
pub struct UndoStack {
    /// Stack of applied batches (most recent last)
    undo_stack: VecDeque<MutationBatch>,

    /// Stack of undone batches (most recent last)
    redo_stack: Vec<MutationBatch>,

    config: HistoryConfig,

    /// Currently building a batch
    current_batch: Option<MutationBatch>,
    batch_depth: usize,

    /// Whether the top of the undo stack may still absorb a block update
    coalescing: bool,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            config,
            current_batch: None,
            batch_depth: 0,
            coalescing: false,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Apply a mutation and record it for undo
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        state: &mut EditorState,
        now: DateTime<Utc>,
    ) -> Result<(), MutationError> {
        self.apply_all(std::slice::from_ref(mutation), mutation.label(), state, now)
    }

    /// Apply several mutations as one undo step.
    ///
    /// Either all of them land or none do: on failure the ones already applied
    /// are reverted before the error is returned.
    pub fn apply_all(
        &mut self,
        mutations: &[Mutation],
        label: &str,
        state: &mut EditorState,
        now: DateTime<Utc>,
    ) -> Result<(), MutationError> {
        let updated_at_before = state.project.metadata.updated_at;
        let mut inverses: Vec<Mutation> = Vec::new();

        for mutation in mutations {
            let step = mutation.to_inverse(state).and_then(|inverse| {
                mutation.apply(state)?;
                Ok(inverse)
            });

            match step {
                Ok(mut inverse) => {
                    // Later mutations are undone first
                    inverse.append(&mut inverses);
                    inverses = inverse;
                }
                Err(e) => {
                    Self::revert(&inverses, state);
                    return Err(e);
                }
            }
        }

        state.project.metadata.updated_at = now;
        self.record(mutations.to_vec(), inverses, label, now, updated_at_before);
        Ok(())
    }

    fn revert(inverses: &[Mutation], state: &mut EditorState) {
        for inverse in inverses {
            if let Err(e) = inverse.apply(state) {
                warn!(error = %e, "Failed to revert partially applied mutations");
            }
        }
    }

    fn record(
        &mut self,
        mutations: Vec<Mutation>,
        mut inverses: Vec<Mutation>,
        label: &str,
        now: DateTime<Utc>,
        updated_at_before: DateTime<Utc>,
    ) {
        if let Some(batch) = &mut self.current_batch {
            if batch.mutations.is_empty() {
                batch.timestamp = now;
                batch.updated_at_before = updated_at_before;
            }
            batch.mutations.extend(mutations);
            inverses.append(&mut batch.inverses);
            batch.inverses = inverses;
            batch.updated_at_after = now;
            batch.last_change = now;
            return;
        }

        let key = match mutations.as_slice() {
            [single] => single.coalesce_key(),
            _ => None,
        };

        if self.can_coalesce(key.as_ref(), now) {
            if let Some(top) = self.undo_stack.back_mut() {
                debug!(label = %top.label, merged = top.mutations.len() + 1, "Coalesced mutation");
                top.mutations.extend(mutations);
                top.updated_at_after = now;
                top.last_change = now;
                return;
            }
        }

        self.coalescing = key.is_some();
        let mut batch = MutationBatch::open(label, now, updated_at_before);
        batch.mutations = mutations;
        batch.inverses = inverses;
        batch.updated_at_after = now;
        batch.coalesce_key = key;
        self.push_batch(batch);
    }

    fn can_coalesce(&self, key: Option<&CoalesceKey>, now: DateTime<Utc>) -> bool {
        if !self.coalescing || self.config.coalesce_window_ms == 0 {
            return false;
        }
        let (Some(key), Some(top)) = (key, self.undo_stack.back()) else {
            return false;
        };
        let window = Duration::milliseconds(self.config.coalesce_window_ms as i64);
        top.coalesce_key.as_ref() == Some(key) && now - top.last_change < window
    }

    /// Start a batch of mutations (will be undone/redone together).
    ///
    /// Batches nest; only the outermost `end_batch` records the entry.
    pub fn begin_batch(&mut self, label: impl Into<String>, state: &EditorState, now: DateTime<Utc>) {
        self.batch_depth += 1;
        if self.current_batch.is_none() {
            self.current_batch = Some(MutationBatch::open(
                label,
                now,
                state.project.metadata.updated_at,
            ));
        }
    }

    /// End the current batch and push to undo stack.
    ///
    /// Returns true when a non-empty batch was recorded.
    pub fn end_batch(&mut self) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }
        self.close_batch()
    }

    pub fn in_batch(&self) -> bool {
        self.current_batch.is_some()
    }

    /// Close every open batch at once
    fn close_batch(&mut self) -> bool {
        self.batch_depth = 0;
        match self.current_batch.take() {
            Some(batch) if !batch.mutations.is_empty() => {
                self.coalescing = false;
                self.push_batch(batch);
                true
            }
            _ => false,
        }
    }

    /// Push a batch to the undo stack
    fn push_batch(&mut self, batch: MutationBatch) {
        self.undo_stack.push_back(batch);

        // Oldest entries fall off first
        if self.config.max_depth > 0 {
            while self.undo_stack.len() > self.config.max_depth {
                self.undo_stack.pop_front();
            }
        }

        // Clear redo stack (new action invalidates future)
        self.redo_stack.clear();
    }

    /// Undo the most recent batch. Any open batch is closed first.
    pub fn undo(&mut self, state: &mut EditorState) -> Result<bool, MutationError> {
        self.close_batch();
        self.coalescing = false;

        let Some(batch) = self.undo_stack.pop_back() else {
            return Ok(false);
        };

        for inverse in &batch.inverses {
            inverse.apply(state)?;
        }
        state.project.metadata.updated_at = batch.updated_at_before;

        self.redo_stack.push(batch);
        Ok(true)
    }

    /// Redo the most recently undone batch
    pub fn redo(&mut self, state: &mut EditorState) -> Result<bool, MutationError> {
        self.close_batch();
        self.coalescing = false;

        let Some(batch) = self.redo_stack.pop() else {
            return Ok(false);
        };

        for mutation in &batch.mutations {
            mutation.apply(state)?;
        }
        state.project.metadata.updated_at = batch.updated_at_after;

        self.undo_stack.push_back(batch);
        Ok(true)
    }

    /// Stop the top entry from absorbing further block updates
    pub fn break_coalescing(&mut self) {
        self.coalescing = false;
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.current_batch = None;
        self.batch_depth = 0;
        self.coalescing = false;
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.back().map(|batch| batch.label.as_str())
    }

    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|batch| batch.label.as_str())
    }

    /// Undo entries, oldest first
    pub fn entries(&self) -> Vec<HistoryEntryInfo> {
        self.undo_stack.iter().map(MutationBatch::info).collect()
    }

    /// Redo entries, the next one to redo first
    pub fn redo_entries(&self) -> Vec<HistoryEntryInfo> {
        self.redo_stack.iter().rev().map(MutationBatch::info).collect()
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::BlockPatch;
    use blockpage_document::{Block, BlockType, Project};

    fn setup() -> (EditorState, DateTime<Utc>) {
        let start = Utc::now();
        let mut state = EditorState::new(Project::new("Site", start));
        state
            .current_page_mut()
            .unwrap()
            .blocks
            .push(Block::new(BlockType::Spacer).with_id("s1").with_content("height", "40px"));
        (state, start)
    }

    fn set_height(state: &EditorState, height: &str) -> Mutation {
        Mutation::UpdateBlock {
            page_id: state.current_page_id.clone(),
            block_id: "s1".into(),
            patch: BlockPatch::content("height", height),
        }
    }

    fn height(state: &EditorState) -> String {
        state.block("s1").unwrap().content["height"]
            .as_str()
            .unwrap()
            .to_string()
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    #[test]
    fn test_undo_stack_creation() {
        let stack = UndoStack::new();
        assert_eq!(stack.undo_levels(), 0);
        assert_eq!(stack.redo_levels(), 0);
        assert!(!stack.can_undo());
        assert!(!stack.can_redo());
        assert_eq!(stack.config().max_depth, 50);
    }

    #[test]
    fn test_apply_and_undo_restores_updated_at() {
        let (mut state, start) = setup();
        let original = state.clone();
        let mut stack = UndoStack::new();

        stack.apply(&set_height(&state, "80px"), &mut state, start + ms(1000)).unwrap();
        assert_eq!(state.project.metadata.updated_at, start + ms(1000));
        assert_eq!(stack.undo_label(), Some("Update block"));

        assert!(stack.undo(&mut state).unwrap());
        assert_eq!(state, original);

        assert!(stack.redo(&mut state).unwrap());
        assert_eq!(height(&state), "80px");
        assert_eq!(state.project.metadata.updated_at, start + ms(1000));
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let (mut state, _) = setup();
        let before = state.clone();
        let mut stack = UndoStack::new();
        assert!(!stack.undo(&mut state).unwrap());
        assert!(!stack.redo(&mut state).unwrap());
        assert_eq!(state, before);
    }

    #[test]
    fn test_drag_within_window_coalesces() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::new();

        // Each step is 200ms after the previous one: a 1s drag stays one entry
        for (i, h) in ["41px", "42px", "43px", "44px", "45px", "46px"].iter().enumerate() {
            let m = set_height(&state, h);
            stack.apply(&m, &mut state, start + ms(200 * i as i64)).unwrap();
        }
        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.entries()[0].mutations, 6);

        stack.undo(&mut state).unwrap();
        assert_eq!(height(&state), "40px");
        stack.redo(&mut state).unwrap();
        assert_eq!(height(&state), "46px");
    }

    #[test]
    fn test_pause_longer_than_window_splits_entries() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::new();

        let m = set_height(&state, "50px");
        stack.apply(&m, &mut state, start).unwrap();
        let m = set_height(&state, "60px");
        stack.apply(&m, &mut state, start + ms(300)).unwrap();
        assert_eq!(stack.undo_levels(), 2);

        stack.undo(&mut state).unwrap();
        assert_eq!(height(&state), "50px");
    }

    #[test]
    fn test_undo_breaks_coalescing_chain() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::new();

        let m = set_height(&state, "50px");
        stack.apply(&m, &mut state, start).unwrap();
        let m = set_height(&state, "60px");
        stack.apply(&m, &mut state, start + ms(1000)).unwrap();
        stack.undo(&mut state).unwrap();

        let m = set_height(&state, "70px");
        stack.apply(&m, &mut state, start + ms(1010)).unwrap();
        assert_eq!(stack.undo_levels(), 2);
    }

    #[test]
    fn test_break_coalescing_starts_new_entry() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::new();

        let m = set_height(&state, "50px");
        stack.apply(&m, &mut state, start).unwrap();
        stack.break_coalescing();
        let m = set_height(&state, "60px");
        stack.apply(&m, &mut state, start + ms(10)).unwrap();
        assert_eq!(stack.undo_levels(), 2);

        // The chain resumes for the new entry
        let m = set_height(&state, "70px");
        stack.apply(&m, &mut state, start + ms(20)).unwrap();
        assert_eq!(stack.undo_levels(), 2);
        assert_eq!(stack.entries()[1].mutations, 2);
    }

    #[test]
    fn test_oldest_entries_are_evicted_first() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::with_config(HistoryConfig {
            max_depth: 2,
            coalesce_window_ms: 0,
        });

        for (i, h) in ["1px", "2px", "3px"].iter().enumerate() {
            let m = set_height(&state, h);
            stack.apply(&m, &mut state, start + ms(i as i64)).unwrap();
        }
        assert_eq!(stack.undo_levels(), 2);

        stack.undo(&mut state).unwrap();
        stack.undo(&mut state).unwrap();
        assert_eq!(height(&state), "1px");
        assert!(!stack.undo(&mut state).unwrap());
    }

    #[test]
    fn test_zero_window_disables_coalescing() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::with_config(HistoryConfig {
            max_depth: 50,
            coalesce_window_ms: 0,
        });

        for h in ["1px", "2px", "3px"] {
            let m = set_height(&state, h);
            stack.apply(&m, &mut state, start).unwrap();
        }
        assert_eq!(stack.undo_levels(), 3);
    }

    #[test]
    fn test_batched_mutations() {
        let (mut state, start) = setup();
        let original = state.clone();
        let mut stack = UndoStack::new();

        stack.begin_batch("Resize and retitle", &state, start);
        let m = set_height(&state, "90px");
        stack.apply(&m, &mut state, start + ms(5)).unwrap();
        stack
            .apply(&Mutation::SetProjectName { name: "Renamed".into() }, &mut state, start + ms(10))
            .unwrap();
        assert!(stack.end_batch());

        assert_eq!(stack.undo_levels(), 1);
        assert_eq!(stack.undo_label(), Some("Resize and retitle"));

        stack.undo(&mut state).unwrap();
        assert_eq!(state, original);
    }

    #[test]
    fn test_nested_batches_record_once() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::new();

        stack.begin_batch("outer", &state, start);
        stack.begin_batch("inner", &state, start);
        stack
            .apply(&Mutation::SetProjectName { name: "A".into() }, &mut state, start)
            .unwrap();
        assert!(!stack.end_batch());
        assert!(stack.in_batch());
        assert!(stack.end_batch());
        assert_eq!(stack.undo_label(), Some("outer"));
    }

    #[test]
    fn test_failed_apply_all_reverts() {
        let (mut state, start) = setup();
        let before = state.clone();
        let mut stack = UndoStack::new();

        let result = stack.apply_all(
            &[
                Mutation::SetProjectName { name: "Half".into() },
                Mutation::RemoveBlock {
                    page_id: state.current_page_id.clone(),
                    block_id: "missing".into(),
                },
            ],
            "Broken",
            &mut state,
            start + ms(1),
        );

        assert_eq!(result, Err(MutationError::BlockNotFound("missing".into())));
        assert_eq!(state, before);
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_new_mutation_clears_redo() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::new();

        stack
            .apply(&Mutation::SetProjectName { name: "A".into() }, &mut state, start)
            .unwrap();
        stack.undo(&mut state).unwrap();
        assert_eq!(stack.redo_levels(), 1);

        stack
            .apply(&Mutation::SetProjectName { name: "B".into() }, &mut state, start)
            .unwrap();
        assert_eq!(stack.redo_levels(), 0);
    }

    #[test]
    fn test_max_depth_evicts_oldest() {
        let (mut state, start) = setup();
        let mut stack = UndoStack::with_config(HistoryConfig {
            max_depth: 2,
            coalesce_window_ms: 300,
        });

        for name in ["one", "two", "three"] {
            stack
                .apply(&Mutation::SetProjectName { name: name.into() }, &mut state, start)
                .unwrap();
        }

        assert_eq!(stack.undo_levels(), 2);
        stack.undo(&mut state).unwrap();
        stack.undo(&mut state).unwrap();
        assert_eq!(state.project.name, "one");
        assert!(!stack.undo(&mut state).unwrap());
    }
}
