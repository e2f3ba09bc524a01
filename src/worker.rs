//! Request dispatch: runs each remote call as its own task and reports back.
//!
//! The UI thread never awaits anything. It hands a [`Command`] to the
//! [`Dispatcher`], which spawns the call on the tokio runtime; the task sends
//! exactly one [`Outcome`] over the channel, and the event loop drains that
//! channel between frames.
//!
use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::UserApi;
use crate::model::{User, UserId, UserPayload};
use crate::reconcile::Outcome;

/// A mutation requested by the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Create(UserPayload),
    /// The full edited record; only `{name, email}` goes over the wire.
    Update(User),
    Delete(UserId),
}

pub struct Dispatcher<A> {
    api: Arc<A>,
    handle: Handle,
    outcomes: UnboundedSender<Outcome>,
}

impl<A: UserApi> Dispatcher<A> {
    /// Create a dispatcher spawning onto `handle`, plus the receiving end of its outcomes.
    pub fn new(api: A, handle: Handle) -> (Self, UnboundedReceiver<Outcome>) {
        let (outcomes, rx) = mpsc::unbounded_channel();
        let dispatcher = Self {
            api: Arc::new(api),
            handle,
            outcomes,
        };
        (dispatcher, rx)
    }

    /// Fetch the full list once.
    pub fn load(&self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move { Outcome::Loaded(api.list_users().await) });
    }

    pub fn dispatch(&self, command: Command) {
        tracing::debug!(?command, "dispatching");
        let api = Arc::clone(&self.api);
        match command {
            Command::Create(payload) => {
                self.spawn(async move { Outcome::Created(api.create_user(payload).await) });
            }
            Command::Update(user) => self.spawn(async move {
                let result = api.update_user(user.id, user.payload()).await;
                Outcome::Updated { user, result }
            }),
            Command::Delete(id) => self.spawn(async move {
                let result = api.delete_user(id).await;
                Outcome::Deleted { id, result }
            }),
        }
    }

    fn spawn<F>(&self, call: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let tx = self.outcomes.clone();
        self.handle.spawn(async move {
            // The receiver is gone only when the UI has exited.
            let _ = tx.send(call.await);
        });
    }
}
