//! Async leaf tasks reach the Store only through the command queue.

use std::time::Duration;

use blockpage_document::BlockType;
use blockpage_editor::{spawn_leaf_task, BlockPatch, Command, CommandQueue, Store};

#[tokio::test]
async fn test_completed_task_lands_one_command() {
    let mut store = Store::default();
    let id = store
        .add_block_from_template(&BlockType::Hero)
        .applied()
        .unwrap();
    let mut queue = CommandQueue::new();

    let block_id = id.clone();
    let handle = spawn_leaf_task(queue.sender(), async move {
        // Stands in for a slow network call
        tokio::time::sleep(Duration::from_millis(5)).await;
        Some(Command::UpdateBlock {
            block_id,
            patch: BlockPatch::content("title", "Generated headline"),
        })
    });
    handle.await.unwrap();

    let outcomes = store.drain(&mut queue);
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].is_applied());
    assert_eq!(
        store.block(&id).unwrap().content["title"],
        "Generated headline"
    );
}

#[tokio::test]
async fn test_aborted_task_sends_nothing() {
    let mut store = Store::default();
    let before = store.to_json().unwrap();
    let mut queue = CommandQueue::new();

    let handle = spawn_leaf_task(queue.sender(), async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Some(Command::RenameProject {
            name: "Never".into(),
        })
    });
    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());

    assert!(store.drain(&mut queue).is_empty());
    assert_eq!(store.to_json().unwrap(), before);
}

#[tokio::test]
async fn test_task_without_result_sends_nothing() {
    let mut queue = CommandQueue::new();
    spawn_leaf_task(queue.sender(), async { None }).await.unwrap();
    assert!(queue.try_next().is_none());
}

#[tokio::test]
async fn test_commands_apply_in_arrival_order() {
    let mut store = Store::default();
    let mut queue = CommandQueue::new();
    let sender = queue.sender();

    for name in ["first", "second", "third"] {
        let sender = sender.clone();
        spawn_leaf_task(sender, async move {
            Some(Command::RenameProject { name: name.into() })
        })
        .await
        .unwrap();
    }
    assert!(sender.send(Command::Undo));

    let outcomes = store.drain(&mut queue);
    assert_eq!(outcomes.len(), 4);
    assert!(outcomes.iter().all(|o| o.is_applied()));
    assert_eq!(store.project().name, "second");
}

#[tokio::test]
async fn test_failed_command_is_reported_not_raised() {
    let mut store = Store::default();
    let mut queue = CommandQueue::new();
    assert!(queue.sender().send(Command::RemoveBlock {
        block_id: "ghost".into()
    }));

    let outcomes = store.drain(&mut queue);
    assert!(outcomes[0].is_noop());
    assert!(!store.can_undo());
}
