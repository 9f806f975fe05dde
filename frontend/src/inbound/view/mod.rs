//! Users view: the presentation consumer of the users query port.
//!
//! The view receives a [`UsersQuery`] implementation and nothing else. On
//! [`UsersView::mount`] it requests users exactly once, publishes every
//! settled state through a `watch` channel (the re-render signal), and after
//! [`UsersView::unmount`] it never applies another state update, even when
//! the in-flight request completes. A request that panics settles the view
//! as [`ViewState::Failed`] with an internal error.

mod render;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, error};

use crate::domain::ports::UsersQuery;
use crate::domain::{Error, User};

pub use render::render;

/// Local state held by a [`UsersView`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// Not mounted yet.
    Idle,
    /// Request in flight.
    Loading,
    /// Request succeeded with at least one user.
    Loaded(Vec<User>),
    /// Request succeeded and the source holds no users.
    Empty,
    /// Request failed.
    Failed(Error),
}

impl ViewState {
    fn from_result(result: Result<Vec<User>, Error>) -> Self {
        match result {
            Ok(users) if users.is_empty() => Self::Empty,
            Ok(users) => Self::Loaded(users),
            Err(error) => Self::Failed(error),
        }
    }

    /// Whether the request has settled, in either direction.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded(_) | Self::Empty | Self::Failed(_))
    }
}

/// Presentation consumer listing users.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use frontend::domain::ports::FixtureUsersQuery;
/// use frontend::inbound::view::{UsersView, render};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let mut view = UsersView::new(Arc::new(FixtureUsersQuery));
/// view.mount();
/// let state = view.wait_until_settled().await;
/// assert!(render(&state).contains("Ada Lovelace"));
/// view.unmount();
/// # });
/// ```
pub struct UsersView<Q> {
    query: Arc<Q>,
    state: Arc<watch::Sender<ViewState>>,
    torn_down: Arc<AtomicBool>,
    mounted: bool,
    in_flight: Option<InFlight>,
}

/// The spawned request and the task that applies its outcome.
struct InFlight {
    request: AbortHandle,
    applier: JoinHandle<()>,
}

impl<Q> UsersView<Q> {
    /// Create an idle view over the given query port.
    pub fn new(query: Arc<Q>) -> Self {
        let (state, _) = watch::channel(ViewState::Idle);
        Self {
            query,
            state: Arc::new(state),
            torn_down: Arc::new(AtomicBool::new(false)),
            mounted: false,
            in_flight: None,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes; each change is a re-render signal.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Render the current state.
    pub fn render(&self) -> String {
        render(&self.state.borrow())
    }

    /// Whether [`Self::unmount`] has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::Acquire)
    }

    /// Wait for the request to settle and return the settled state.
    ///
    /// Returns the current state straight away when the view was never
    /// mounted or has been torn down.
    pub async fn wait_until_settled(&self) -> ViewState {
        if !self.mounted || self.is_torn_down() {
            return self.state();
        }

        let mut receiver = self.state.subscribe();
        match receiver.wait_for(ViewState::is_settled).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Tear the view down.
    ///
    /// The flag is flipped while holding the state channel's write lock, so a
    /// request completing concurrently either published before this call or
    /// observes the flag and drops its result.
    pub fn unmount(&mut self) {
        let torn_down = Arc::clone(&self.torn_down);
        self.state.send_if_modified(|_| {
            torn_down.store(true, Ordering::Release);
            false
        });

        if let Some(InFlight { request, applier }) = self.in_flight.take() {
            if !applier.is_finished() {
                debug!("users view unmounted with request in flight");
            }
            request.abort();
            applier.abort();
        }
    }
}

impl<Q> UsersView<Q>
where
    Q: UsersQuery + 'static,
{
    /// Start the users request. Only the first call on a live view has any
    /// effect.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(&mut self) {
        if self.mounted || self.is_torn_down() {
            return;
        }
        self.mounted = true;
        self.state.send_replace(ViewState::Loading);

        let query = Arc::clone(&self.query);
        let request = tokio::spawn(async move { query.list_users().await });
        let request_abort = request.abort_handle();

        let state = Arc::clone(&self.state);
        let torn_down = Arc::clone(&self.torn_down);
        let applier = tokio::spawn(async move {
            let next = match request.await {
                Ok(result) => ViewState::from_result(result),
                Err(join_error) if join_error.is_panic() => {
                    error!("users request panicked");
                    ViewState::Failed(Error::internal("users request panicked"))
                }
                Err(_) => return,
            };
            let applied = state.send_if_modified(|current| {
                if torn_down.load(Ordering::Acquire) {
                    return false;
                }
                *current = next;
                true
            });
            if !applied {
                debug!("users view torn down; dropped late users result");
            }
        });

        self.in_flight = Some(InFlight {
            request: request_abort,
            applier,
        });
    }
}

impl<Q> Drop for UsersView<Q> {
    fn drop(&mut self) {
        self.unmount();
    }
}
