//! Recording stubs for the collaborators, shared by the unit tests.

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::json;
use shared::config::ClientConfig;
use shared::models::{ApiEnvelope, Identity, UserRole};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use crate::actions::SessionActions;
use crate::api::{ApiRequest, ApiResponse, HttpTransport};
use crate::error::TransportError;
use crate::navigation::{Navigator, Notice, Notifier};
use crate::routes::AppRoute;
use crate::session::SessionStore;
use crate::storage::{KeyValueStorage, MemoryStorage, StorageError};
use crate::submission::Collaborators;

/// Memory storage that can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct FlakyStorage {
    inner: MemoryStorage,
    fail_reads: Rc<Cell<bool>>,
    failing_key: Rc<RefCell<Option<String>>>,
}

impl FlakyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn fail_writes_to(&self, key: &str) {
        *self.failing_key.borrow_mut() = Some(key.to_string());
    }

    pub fn inner(&self) -> MemoryStorage {
        self.inner.clone()
    }
}

impl KeyValueStorage for FlakyStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.fail_reads.get() {
            return Err(StorageError::Unavailable("reads disabled".to_string()));
        }
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.failing_key.borrow().as_deref() == Some(key) {
            return Err(StorageError::Backend("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<AppRoute>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<AppRoute> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, to: &AppRoute) {
        self.visits.borrow_mut().push(to.clone());
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Debug)]
enum Reply {
    Ready(Result<ApiResponse, TransportError>),
    Deferred(oneshot::Receiver<ApiResponse>),
    Never,
}

/// Transport answering from a script, recording every request it sees.
#[derive(Debug, Default)]
pub struct StubTransport {
    replies: RefCell<VecDeque<Reply>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn reply(&self, response: ApiResponse) {
        self.replies.borrow_mut().push_back(Reply::Ready(Ok(response)));
    }

    pub fn fail(&self, error: TransportError) {
        self.replies.borrow_mut().push_back(Reply::Ready(Err(error)));
    }

    /// The next request waits until the returned sender fires.
    pub fn deferred(&self) -> oneshot::Sender<ApiResponse> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().push_back(Reply::Deferred(rx));
        tx
    }

    /// The next request never completes.
    pub fn hang(&self) {
        self.replies.borrow_mut().push_back(Reply::Never);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl HttpTransport for StubTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => rx
                .await
                .map_err(|_| TransportError::Network("reply dropped".to_string())),
            Some(Reply::Never) => futures::future::pending().await,
            None => Err(TransportError::Network("no scripted reply".to_string())),
        }
    }
}

/// A wired set of stubs around a memory-backed session store.
#[derive(Debug)]
pub struct Harness {
    pub storage: MemoryStorage,
    pub store: Rc<SessionStore>,
    pub navigator: Rc<RecordingNavigator>,
    pub notifier: Rc<RecordingNotifier>,
    pub transport: Rc<StubTransport>,
    pub config: ClientConfig,
    pub deps: Collaborators,
}

impl Harness {
    pub fn new() -> Self {
        let storage = MemoryStorage::new();
        let store = Rc::new(SessionStore::load(storage.clone()));
        let navigator = Rc::new(RecordingNavigator::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let transport = Rc::new(StubTransport::default());
        let config = ClientConfig::with_defaults();

        let actions = SessionActions::new(store.clone(), navigator.clone());
        let deps = Collaborators::new(transport.clone(), actions, notifier.clone(), &config);

        Self {
            storage,
            store,
            navigator,
            notifier,
            transport,
            config,
            deps,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deps.timeout = timeout;
        self
    }

    pub fn sign_in_as(&self, role: UserRole) {
        self.store.set(identity(role), "session-token");
    }
}

pub fn identity(role: UserRole) -> Identity {
    Identity::new("64f0c2", "ada", "a@b.com", role)
}

/// HTTP 200 carrying an envelope with login credentials.
pub fn login_response(identity: &Identity, token: &str) -> ApiResponse {
    let envelope = ApiEnvelope::new(200, "ok").with_data(json!({
        "token": token,
        "user": identity,
    }));
    ApiResponse::envelope(200, &envelope)
}

/// HTTP 200 carrying a bare envelope.
pub fn envelope_response(status_code: u16, message: &str) -> ApiResponse {
    ApiResponse::envelope(200, &ApiEnvelope::new(status_code, message))
}
