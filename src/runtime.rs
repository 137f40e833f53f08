//! Owner-thread task queue
//!
//! The adapter, its collection and its selection belong to one thread. Work
//! finishing elsewhere (background tasks, dialogs) never touches them
//! directly: it posts a continuation through a [`UiHandle`], and the owner
//! applies queued continuations with [`DirectoryAdapter::run_pending`] or
//! [`DirectoryAdapter::next_task`].
//!
//! [`DirectoryAdapter::run_pending`]: crate::adapter::DirectoryAdapter::run_pending
//! [`DirectoryAdapter::next_task`]: crate::adapter::DirectoryAdapter::next_task

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::adapter::DirectoryAdapter;

/// A continuation run on the owner thread
pub type UiTask = Box<dyn FnOnce(&mut DirectoryAdapter) + Send>;

/// Sending side of the owner-thread queue; cheap to clone and `Send`
#[derive(Clone)]
pub struct UiHandle {
    tx: UnboundedSender<UiTask>,
}

impl UiHandle {
    /// Create a queue, returning the handle and the owner's receiving end
    pub fn channel() -> (Self, UnboundedReceiver<UiTask>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queue `task` for the owner thread
    pub fn post(&self, task: impl FnOnce(&mut DirectoryAdapter) + Send + 'static) {
        if self.tx.send(Box::new(task)).is_err() {
            debug!("Owner queue closed, dropping continuation");
        }
    }

    /// A one-shot reply whose value is handled by `then` on the owner thread
    pub fn reply<T: Send + 'static>(
        &self,
        then: impl FnOnce(&mut DirectoryAdapter, T) + Send + 'static,
    ) -> Reply<T> {
        Reply {
            ui: self.clone(),
            then: Box::new(then),
        }
    }

    /// A one-shot completion running `then` on the owner thread
    pub fn completion(&self, then: impl FnOnce(&mut DirectoryAdapter) + Send + 'static) -> Completion {
        self.reply(move |adapter, ()| then(adapter))
    }
}

/// One-shot callback handed to a collaborator
///
/// Sending from any thread queues the continuation for the owner thread.
/// Dropping it without sending means the operation was cancelled or failed,
/// and nothing happens.
pub struct Reply<T> {
    ui: UiHandle,
    then: Box<dyn FnOnce(&mut DirectoryAdapter, T) + Send>,
}

impl<T: Send + 'static> Reply<T> {
    pub fn send(self, value: T) {
        let then = self.then;
        self.ui.post(move |adapter| then(adapter, value));
    }
}

/// Reply carrying no value
pub type Completion = Reply<()>;

impl Reply<()> {
    pub fn done(self) {
        self.send(())
    }
}

impl<T> std::fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reply").finish_non_exhaustive()
    }
}
