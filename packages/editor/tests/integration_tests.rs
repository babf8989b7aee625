//! Integration tests for the editor crate

use blockpage_document::{from_json, resolve_block, AttrMap, Block, BlockType, Project, TemplateRegistry};
use blockpage_editor::{
    BlockPatch, CommandOutcome, MemoryStorage, PersistError, ProjectStorage, Store, StoreConfig,
    StoreError,
};
use serde_json::json;

fn hero(id: &str, title: &str) -> Block {
    Block::new(BlockType::Hero)
        .with_id(id)
        .with_content("title", title)
}

fn block_ids(store: &Store) -> Vec<String> {
    store
        .current_page()
        .unwrap()
        .blocks
        .iter()
        .map(|b| b.id.clone())
        .collect()
}

/// Store with one page `p1` holding hero `b1` titled "A"
fn scenario_store() -> Store {
    let mut store = Store::default();
    let mut project = Project::new("Scenario", chrono::Utc::now());
    project.pages[0].id = "p1".into();
    project.pages[0]
        .blocks
        .push(TemplateRegistry::builtin().get(&BlockType::Hero).unwrap().instantiate().with_id("b1"));
    project.pages[0].blocks[0]
        .content
        .insert("title".into(), json!("A"));
    store.load(project).unwrap();
    store
}

#[test]
fn test_scenario_a_update_then_undo() {
    let mut store = scenario_store();

    store
        .update_block("b1", BlockPatch::content("title", "B"))
        .applied()
        .unwrap();
    assert_eq!(store.block("b1").unwrap().content["title"], "B");

    store.undo().applied().unwrap();
    assert_eq!(store.block("b1").unwrap().content["title"], "A");
}

#[test]
fn test_scenario_b_add_remove_undo_undo() {
    let mut store = Store::default();
    let id = store
        .add_block(Block::new(BlockType::Hero))
        .applied()
        .unwrap();
    store.remove_block(&id).applied().unwrap();
    assert!(store.block(&id).is_none());

    store.undo().applied().unwrap();
    assert!(store.block(&id).is_some());

    store.undo().applied().unwrap();
    assert!(store.current_page().unwrap().blocks.is_empty());
}

#[test]
fn test_scenario_c_last_page_survives() {
    let mut store = Store::default();
    let only = store.current_page_id().to_string();

    let outcome = store.remove_page(&only);
    assert!(matches!(
        outcome,
        CommandOutcome::Noop(StoreError::InvariantViolation(_))
    ));
    assert_eq!(store.project().pages.len(), 1);
    assert!(!store.can_undo());
}

#[test]
fn test_undo_n_times_restores_serialized_project() {
    let mut store = scenario_store();
    let origin = store.to_json().unwrap();

    let mut theme = AttrMap::new();
    theme.insert("primaryColor".into(), json!("#111111"));

    let outcomes = vec![
        store.add_block(hero("b2", "Second")).discard(),
        store.update_block("b1", BlockPatch::style("padding", "py-16 px-6")),
        store.move_block("b1", 5),
        store.duplicate_block("b2").discard(),
        store.update_global_styles(theme),
        store.rename_project("Renamed"),
        store.remove_block("b1"),
        store.add_page_named("About").discard(),
    ];
    assert!(outcomes.iter().all(CommandOutcome::is_applied));
    assert_ne!(store.to_json().unwrap(), origin);

    for _ in 0..outcomes.len() {
        store.undo().applied().unwrap();
    }
    assert_eq!(store.to_json().unwrap(), origin);
    assert_eq!(
        store.undo(),
        CommandOutcome::Noop(StoreError::HistoryUnderflow)
    );
}

#[test]
fn test_undo_then_redo_is_identity() {
    let mut store = scenario_store();
    store.add_block(hero("b2", "Two")).applied().unwrap();
    store.move_block("b2", 0).applied().unwrap();
    let after = store.to_json().unwrap();

    store.undo().applied().unwrap();
    store.redo().applied().unwrap();
    assert_eq!(store.to_json().unwrap(), after);

    assert_eq!(
        store.redo(),
        CommandOutcome::Noop(StoreError::HistoryUnderflow)
    );
}

#[test]
fn test_move_block_clamps_any_index() {
    let mut store = scenario_store();
    store.add_block(hero("b2", "Two")).applied().unwrap();
    store.add_block(hero("b3", "Three")).applied().unwrap();

    for index in [-100, -1, 0, 1, 2, 3, 50, i64::MAX, i64::MIN] {
        store.move_block("b2", index).applied().unwrap();
        let ids = block_ids(&store);
        assert_eq!(ids.len(), 3);

        let expected = index.clamp(0, 2) as usize;
        assert_eq!(ids[expected], "b2", "index {}", index);
    }
}

#[test]
fn test_json_round_trip_through_load() {
    let mut store = scenario_store();
    store
        .add_block(Block::new(BlockType::Other("carousel".into())).with_content("slides", json!([1, 2])))
        .applied()
        .unwrap();
    store.add_page_named("Pricing").applied().unwrap();

    let json = store.to_json().unwrap();
    let original = store.project().clone();

    let mut other = Store::default();
    other.load_project(&json).unwrap();
    assert_eq!(other.project(), &original);
    assert_eq!(
        from_json(&json, &TemplateRegistry::builtin()).unwrap(),
        original
    );
}

#[test]
fn test_block_override_beats_global_update() {
    let mut store = scenario_store();
    store
        .update_block("b1", BlockPatch::style("primaryColor", "#00FF00"))
        .applied()
        .unwrap();

    let mut theme = AttrMap::new();
    theme.insert("primaryColor".into(), json!("#FF0000"));
    store.update_global_styles(theme).applied().unwrap();

    let block = store.block("b1").unwrap();
    let effective = resolve_block(&store.project().global_styles, block);
    assert_eq!(effective["primaryColor"], "#00FF00");
    assert_eq!(store.project().global_styles.primary_color, "#FF0000");
}

#[test]
fn test_selection_never_dangles() {
    let mut store = scenario_store();
    store.select_block(Some("b1")).applied().unwrap();
    store.remove_block("b1").applied().unwrap();
    assert!(store.selected_block_id().is_none());

    // Undoing an add removes the selected block again
    let id = store.add_block(hero("b9", "Nine")).applied().unwrap();
    assert_eq!(store.selected_block_id(), Some(id.as_str()));
    store.undo().applied().unwrap();
    assert!(store.selected_block_id().is_none());
}

#[test]
fn test_required_content_keys_survive_commands() {
    let mut store = scenario_store();
    let templates = TemplateRegistry::builtin();
    store
        .add_block(Block::new(BlockType::Cta).with_id("c1"))
        .applied()
        .unwrap();
    store
        .update_block("c1", BlockPatch::content("title", json!(null)))
        .applied()
        .unwrap();

    for block in &store.current_page().unwrap().blocks {
        assert!(blockpage_document::validate_block(block, &templates).is_ok());
    }
}

#[derive(Debug)]
struct BrokenStorage;

impl ProjectStorage for BrokenStorage {
    fn save(&self, _project: &Project) -> Result<(), PersistError> {
        Err(PersistError::Unavailable("quota exceeded".into()))
    }

    fn load(&self, project_id: &str) -> Result<String, PersistError> {
        Err(PersistError::NotFound(project_id.into()))
    }
}

#[test]
fn test_persistence_failure_keeps_in_memory_state() {
    let mut store = Store::default().with_storage(BrokenStorage);
    let id = store
        .add_block(Block::new(BlockType::Text))
        .applied()
        .unwrap();

    assert!(store.block(&id).is_some());
    assert!(store.can_undo());
    assert!(matches!(store.save(), Err(PersistError::Unavailable(_))));
}

#[test]
fn test_every_mutation_is_persisted() {
    let storage = MemoryStorage::new();
    let mut store = Store::default().with_storage(storage.clone());
    let project_id = store.project().id.clone();

    store.rename_project("Saved").applied().unwrap();
    let saved = storage.load(&project_id).unwrap();
    assert!(saved.contains("\"Saved\""));

    let mut restored = Store::default().with_storage(storage.clone());
    restored.restore(&project_id).unwrap();
    assert_eq!(restored.project().name, "Saved");
}

#[test]
fn test_persist_on_mutation_can_be_disabled() {
    let storage = MemoryStorage::new();
    let config = StoreConfig {
        persist_on_mutation: false,
        ..Default::default()
    };
    let mut store = Store::new(config).with_storage(storage.clone());

    store.rename_project("Unsaved").applied().unwrap();
    assert!(storage.is_empty());

    store.save().unwrap();
    assert_eq!(storage.len(), 1);
}

#[test]
fn test_version_counts_accepted_changes() {
    let mut store = scenario_store();
    let start = store.version();

    store.rename_project("One").applied().unwrap();
    assert!(store.remove_block("ghost").is_noop());
    store.undo().applied().unwrap();

    assert_eq!(store.version(), start + 2);
}
