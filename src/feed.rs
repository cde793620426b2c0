//! Feeder trait for handing query results to a view.

use crate::backend::FetchStatus;
use crate::error::{Error, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Receives the lifecycle of one query on behalf of a view.
///
/// # Example
///
/// ```
/// use fleetdesk::{drive, MountToken, ViewState};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let token = MountToken::new();
/// let mut roles: ViewState<Vec<String>> = ViewState::default();
///
/// let applied = drive(&mut roles, &token, async { Ok(vec!["CAPTAIN".to_string()]) }).await;
///
/// assert!(applied);
/// assert_eq!(roles.data.as_deref(), Some(&["CAPTAIN".to_string()][..]));
/// # }
/// ```
pub trait QueryFeed<T>: Send {
    /// Called before the query starts.
    fn on_loading(&mut self) {}

    /// Feed a successful result.
    fn feed(&mut self, data: T);

    /// Called when the query failed. Previously fed data should stay.
    fn on_error(&mut self, _error: &Error) {}
}

/// Data, status and error of one query as a view renders them.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState<T> {
    pub data: Option<T>,
    pub status: FetchStatus,
    pub error: Option<Error>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState {
            data: None,
            status: FetchStatus::Idle,
            error: None,
        }
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        self.status == FetchStatus::Loading
    }

    pub fn is_error(&self) -> bool {
        self.status == FetchStatus::Error
    }
}

impl<T: Send> QueryFeed<T> for ViewState<T> {
    fn on_loading(&mut self) {
        self.status = FetchStatus::Loading;
    }

    fn feed(&mut self, data: T) {
        self.data = Some(data);
        self.status = FetchStatus::Success;
        self.error = None;
    }

    fn on_error(&mut self, error: &Error) {
        self.status = FetchStatus::Error;
        self.error = Some(error.clone());
    }
}

/// Shared flag telling whether the view that started a query is still shown.
#[derive(Clone, Debug)]
pub struct MountToken(Arc<AtomicBool>);

impl MountToken {
    pub fn new() -> Self {
        MountToken(Arc::new(AtomicBool::new(true)))
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

impl Default for MountToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Await `query` and hand its outcome to `feeder`.
///
/// Returns `false` when the view unmounted before the result arrived; the
/// feeder is then left untouched.
pub async fn drive<T, Q>(feeder: &mut dyn QueryFeed<T>, token: &MountToken, query: Q) -> bool
where
    Q: Future<Output = Result<T>>,
{
    if !token.is_mounted() {
        return false;
    }
    feeder.on_loading();
    let outcome = query.await;

    if !token.is_mounted() {
        debug!("Dropping query result: view unmounted");
        return false;
    }
    match outcome {
        Ok(data) => feeder.feed(data),
        Err(e) => feeder.on_error(&e),
    }
    true
}
