//! Leaf-task command queue.
//!
//! Asynchronous work started by leaf panels never touches the Store directly.
//! A task runs on the Tokio runtime and, once finished, sends at most one
//! [`Command`]; the owner of the Store drains the queue and applies commands
//! one at a time. Aborting a task before it completes sends nothing.

use std::future::Future;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::command::Command;

/// Receiving end, owned next to the Store
#[derive(Debug)]
pub struct CommandQueue {
    sender: UnboundedSender<Command>,
    receiver: UnboundedReceiver<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            inner: self.sender.clone(),
        }
    }

    /// Next queued command, without waiting
    pub fn try_next(&mut self) -> Option<Command> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next command
    pub async fn next(&mut self) -> Option<Command> {
        self.receiver.recv().await
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloneable handle leaf panels use to reach the Store
#[derive(Debug, Clone)]
pub struct CommandSender {
    inner: UnboundedSender<Command>,
}

impl CommandSender {
    /// Queue a command. Returns false if the queue is gone.
    pub fn send(&self, command: Command) -> bool {
        self.inner.send(command).is_ok()
    }
}

/// Run `task` in the background and forward its command, if any.
pub fn spawn_leaf_task<F>(sender: CommandSender, task: F) -> JoinHandle<()>
where
    F: Future<Output = Option<Command>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Some(command) = task.await {
            debug!(command = command.name(), "Leaf task finished");
            if !sender.send(command) {
                debug!("Command queue closed, dropping leaf task result");
            }
        }
    })
}
