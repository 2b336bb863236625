//! The validated-submission state machine every form runs on.
//!
//! [`SubmissionController`] is synchronous: it owns a form's values, errors
//! and phase, and decides what a field change, a submit intent or a response
//! does to them. [`submit`] (and [`spawn_submit`] in the browser) drives one
//! attempt through the HTTP collaborator and applies the resulting effects.
//!
//! ```text
//! idle ──change──▶ validating ──▶ idle
//! idle ──submit (valid)──▶ submitting ──▶ success (terminal)
//!                                   └──▶ failed ──submit──▶ submitting
//! ```

use reqwest::Method;
use serde_json::Value;
use shared::config::ClientConfig;
use shared::models::{ApiEnvelope, AuthPayload};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;
use strum::Display;
use thiserror::Error;
use tracing::{debug, warn};

use crate::actions::SessionActions;
use crate::api::{ApiRequest, HttpTransport, with_timeout};
use crate::error::SubmitError;
use crate::navigation::{Notice, Notifier};
use crate::routes::AppRoute;
use crate::session::Session;
use crate::validation::{FieldErrors, FieldInput, FormValues, ValidationSchema};

/// Used when a successful envelope carries no message.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Success";

/// Where a form is in its submission lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    /// Editable, nothing in flight.
    Idle,
    /// Recomputing errors after a change. Never observable between events.
    Validating,
    /// A request is in flight.
    Submitting,
    /// The operation succeeded. Terminal.
    Success,
    /// The last attempt failed. Resubmission is allowed.
    Failed,
}

/// Observable state of one form instance.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<T> {
    /// Current field values.
    pub values: T,
    /// Fields that are currently invalid.
    pub errors: FieldErrors,
    /// Lifecycle phase.
    pub phase: Phase,
    /// Last message surfaced to the user.
    pub server_message: Option<String>,
}

/// Builds a request body from form values; `None` sends no body.
pub type BodyBuilder<T> = Box<dyn Fn(&T) -> Option<Value>>;

/// Request descriptor for one form: where it goes and what counts as success.
pub struct Operation<T> {
    /// Short name used in logs.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path below the API base URL.
    pub path: String,
    /// Application status code that means success.
    pub expected_status: u16,
    /// Whether the stored token is sent as a bearer credential.
    pub authenticated: bool,
    /// Whether a success carries credentials that become the session.
    pub establishes_session: bool,
    /// Where to go after success.
    pub destination: AppRoute,
    body: BodyBuilder<T>,
}

impl<T> fmt::Debug for Operation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("expected_status", &self.expected_status)
            .field("authenticated", &self.authenticated)
            .field("establishes_session", &self.establishes_session)
            .field("destination", &self.destination)
            .finish_non_exhaustive()
    }
}

impl<T> Operation<T> {
    /// An unauthenticated operation with no body.
    pub fn new(
        name: &'static str,
        method: Method,
        path: impl Into<String>,
        expected_status: u16,
        destination: AppRoute,
    ) -> Self {
        Self {
            name,
            method,
            path: path.into(),
            expected_status,
            authenticated: false,
            establishes_session: false,
            destination,
            body: Box::new(|_| None),
        }
    }

    /// Sends `build(values)` as the JSON body.
    #[must_use]
    pub fn with_body(mut self, build: impl Fn(&T) -> Option<Value> + 'static) -> Self {
        self.body = Box::new(build);
        self
    }

    /// Attaches the session token.
    #[must_use]
    pub const fn authenticated(mut self) -> Self {
        self.authenticated = true;
        self
    }

    /// Success writes the returned credentials into the session.
    #[must_use]
    pub const fn establishes_session(mut self) -> Self {
        self.establishes_session = true;
        self
    }

    /// The request for `values`, with the session token when required.
    pub fn request(&self, values: &T, session: &Session) -> ApiRequest {
        let request = ApiRequest::new(self.method.clone(), self.path.clone())
            .with_body((self.body)(values));
        match session.token() {
            Some(token) if self.authenticated => request.with_bearer(token),
            _ => request,
        }
    }
}

/// Why a submit intent did not start a request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Some fields are invalid; no request was made.
    #[error("{} field(s) are invalid", .0.len())]
    Invalid(FieldErrors),
    /// A request for this form is already in flight.
    #[error("a submission is already in flight")]
    InFlight,
    /// The form already succeeded.
    #[error("the form has already been submitted")]
    Completed,
    /// The form was discarded.
    #[error("the form was discarded")]
    Discarded,
}

/// A started attempt: the request to send and the number identifying it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    /// Attempt number to hand back to [`SubmissionController::complete`].
    pub attempt: u64,
    /// Status code the response must carry.
    pub expected_status: u16,
    /// What to send.
    pub request: ApiRequest,
}

/// Effects to apply once an attempt has been settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The form reached `success`.
    Succeeded {
        /// Text for the success notice.
        message: String,
        /// Credentials to store, for operations that establish a session.
        login: Option<AuthPayload>,
        /// Where to navigate.
        destination: AppRoute,
    },
    /// The form reached `failed`.
    Failed {
        /// What went wrong.
        error: SubmitError,
        /// Text for the error notice.
        message: String,
        /// The server refused the session's token.
        sign_out: bool,
    },
}

/// State machine for one form instance.
pub struct SubmissionController<T: FormValues> {
    state: FormState<T>,
    schema: ValidationSchema,
    operation: Operation<T>,
    attempt: u64,
    discarded: bool,
    deferred: BTreeSet<String>,
}

impl<T: FormValues> fmt::Debug for SubmissionController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionController")
            .field("operation", &self.operation.name)
            .field("phase", &self.state.phase)
            .field("errors", &self.state.errors)
            .field("attempt", &self.attempt)
            .field("discarded", &self.discarded)
            .finish_non_exhaustive()
    }
}

impl<T: FormValues> SubmissionController<T> {
    /// A fresh, idle form.
    pub fn new(values: T, schema: ValidationSchema, operation: Operation<T>) -> Self {
        Self {
            state: FormState {
                values,
                errors: FieldErrors::new(),
                phase: Phase::Idle,
                server_message: None,
            },
            schema,
            operation,
            attempt: 0,
            discarded: false,
            deferred: BTreeSet::new(),
        }
    }

    /// Everything the UI renders.
    pub const fn state(&self) -> &FormState<T> {
        &self.state
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Current values.
    pub const fn values(&self) -> &T {
        &self.state.values
    }

    /// Current field errors.
    pub const fn errors(&self) -> &FieldErrors {
        &self.state.errors
    }

    /// Error for one field.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.state.errors.get(field).map(String::as_str)
    }

    /// Last message surfaced to the user.
    pub fn server_message(&self) -> Option<&str> {
        self.state.server_message.as_deref()
    }

    /// The request descriptor.
    pub const fn operation(&self) -> &Operation<T> {
        &self.operation
    }

    /// Whether [`discard`](Self::discard) was called.
    pub const fn is_discarded(&self) -> bool {
        self.discarded
    }

    fn transition(&mut self, to: Phase) {
        if self.state.phase != to {
            debug!(form = self.operation.name, from = %self.state.phase, to = %to, "phase change");
            self.state.phase = to;
        }
    }

    fn record(&mut self, field: &str) {
        match self.schema.validate_field(field, &self.state.values) {
            Some(message) => {
                self.state.errors.insert(field.to_string(), message);
            }
            None => {
                self.state.errors.remove(field);
            }
        }
    }

    /// Reruns the edited field's rules, then only the equality rules of the
    /// fields that read it. A dependent still failing its own rules keeps
    /// whatever error it already shows.
    fn revalidate_edit(&mut self, name: &str) {
        self.record(name);
        for dependent in self.schema.dependents_of(name) {
            if self.schema.passes_local_rules(dependent, &self.state.values) {
                self.record(dependent);
            }
        }
    }

    /// Applies a field edit and recomputes the errors it can affect.
    ///
    /// While a request is in flight the value is stored and its errors are
    /// recomputed once the attempt settles. Edits to a succeeded or discarded
    /// form, and edits naming an unknown field, are ignored and return false.
    pub fn change_field(&mut self, name: &str, value: impl Into<FieldInput>) -> bool {
        if self.discarded || self.state.phase == Phase::Success {
            debug!(form = self.operation.name, field = name, "edit ignored");
            return false;
        }
        if !self.state.values.set_field(name, value.into()) {
            warn!(form = self.operation.name, field = name, "edit to unknown field");
            return false;
        }

        if self.state.phase == Phase::Submitting {
            self.deferred.insert(name.to_string());
            return true;
        }

        self.transition(Phase::Validating);
        self.revalidate_edit(name);
        self.transition(Phase::Idle);
        true
    }

    /// Validates the whole form and, when it is clean, enters `submitting`
    /// and returns the request to send.
    ///
    /// # Errors
    /// See [`SubmitRejected`]. An invalid form stays editable with its
    /// errors populated.
    pub fn begin_submit(&mut self, session: &Session) -> Result<PendingSubmission, SubmitRejected> {
        if self.discarded {
            return Err(SubmitRejected::Discarded);
        }
        match self.state.phase {
            Phase::Submitting => return Err(SubmitRejected::InFlight),
            Phase::Success => return Err(SubmitRejected::Completed),
            Phase::Idle | Phase::Validating | Phase::Failed => {}
        }

        self.transition(Phase::Validating);
        self.state.errors = self.schema.validate_form(&self.state.values);
        if !self.state.errors.is_empty() {
            self.transition(Phase::Idle);
            debug!(form = self.operation.name, invalid = self.state.errors.len(), "submit blocked");
            return Err(SubmitRejected::Invalid(self.state.errors.clone()));
        }

        self.attempt += 1;
        self.state.server_message = None;
        self.transition(Phase::Submitting);

        Ok(PendingSubmission {
            attempt: self.attempt,
            expected_status: self.operation.expected_status,
            request: self.operation.request(&self.state.values, session),
        })
    }

    /// Settles attempt `attempt` with `result`.
    ///
    /// Returns `None`, leaving the form untouched, when the form was
    /// discarded or the attempt is not the one in flight.
    pub fn complete(
        &mut self,
        attempt: u64,
        result: Result<ApiEnvelope, SubmitError>,
    ) -> Option<Completion> {
        if self.discarded || attempt != self.attempt || self.state.phase != Phase::Submitting {
            debug!(form = self.operation.name, attempt, "ignoring stale response");
            return None;
        }

        let completion = match result {
            Ok(envelope) => self.succeed(&envelope),
            Err(error) => self.fail(error),
        };

        for name in std::mem::take(&mut self.deferred) {
            self.revalidate_edit(&name);
        }
        Some(completion)
    }

    fn succeed(&mut self, envelope: &ApiEnvelope) -> Completion {
        let login = if self.operation.establishes_session {
            let payload = envelope.auth_payload();
            if payload.is_none() {
                warn!(
                    form = self.operation.name,
                    "success carried no credentials, session left unchanged"
                );
            }
            payload
        } else {
            None
        };

        let message = if envelope.message.trim().is_empty() {
            DEFAULT_SUCCESS_MESSAGE.to_string()
        } else {
            envelope.message.clone()
        };

        self.state.server_message = Some(message.clone());
        self.transition(Phase::Success);
        Completion::Succeeded {
            message,
            login,
            destination: self.operation.destination.clone(),
        }
    }

    fn fail(&mut self, error: SubmitError) -> Completion {
        let message = error.user_message();
        warn!(form = self.operation.name, error = %error, "submission failed");

        self.state.server_message = Some(message.clone());
        self.transition(Phase::Failed);
        Completion::Failed {
            sign_out: self.operation.authenticated && error.is_unauthorized(),
            error,
            message,
        }
    }

    /// Marks the form as gone. Any response still in flight is ignored.
    pub fn discard(&mut self) {
        if !self.discarded {
            debug!(form = self.operation.name, "form discarded");
            self.discarded = true;
        }
    }
}

/// Everything a submission talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Sends requests.
    pub transport: Rc<dyn HttpTransport>,
    /// Session mutation and navigation.
    pub actions: SessionActions,
    /// Surfaces notices.
    pub notifier: Rc<dyn Notifier>,
    /// Upper bound on one request.
    pub timeout: Duration,
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("actions", &self.actions)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Collaborators {
    /// Collaborators using the configured request timeout.
    pub fn new(
        transport: Rc<dyn HttpTransport>,
        actions: SessionActions,
        notifier: Rc<dyn Notifier>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            transport,
            actions,
            notifier,
            timeout: config.request_timeout(),
        }
    }
}

/// Type of a form shared between the UI and in-flight submissions.
pub type SharedForm<T> = Rc<RefCell<SubmissionController<T>>>;

fn begin<T: FormValues>(
    form: &SharedForm<T>,
    deps: &Collaborators,
) -> Result<PendingSubmission, SubmitRejected> {
    let session = deps.actions.store().current();
    form.borrow_mut().begin_submit(&session)
}

async fn drive<T: FormValues>(
    form: Weak<RefCell<SubmissionController<T>>>,
    pending: PendingSubmission,
    deps: &Collaborators,
) {
    let result = with_timeout(deps.transport.execute(pending.request), deps.timeout)
        .await
        .map_err(SubmitError::from)
        .and_then(|response| response.interpret(pending.expected_status));

    let Some(form) = form.upgrade() else {
        debug!(attempt = pending.attempt, "form dropped before its response arrived");
        return;
    };
    let completion = form.borrow_mut().complete(pending.attempt, result);
    if let Some(completion) = completion {
        apply(completion, deps);
    }
}

fn apply(completion: Completion, deps: &Collaborators) {
    match completion {
        Completion::Succeeded {
            message,
            login,
            destination,
        } => {
            deps.notifier.notify(Notice::success(message));
            match login {
                Some(payload) => {
                    deps.actions
                        .complete_login(payload.user, &payload.token, &destination);
                }
                None => deps.actions.navigator().navigate(&destination),
            }
        }
        Completion::Failed {
            message, sign_out, ..
        } => {
            deps.notifier.notify(Notice::error(message));
            if sign_out {
                deps.actions.logout(&AppRoute::SignIn);
            }
        }
    }
}

/// Runs one submission attempt to completion.
///
/// The form is borrowed only around the synchronous steps, never across the
/// network wait, so the UI can keep editing it while the request is out.
///
/// # Errors
/// [`SubmitRejected`] when no request was started.
pub async fn submit<T: FormValues>(
    form: &SharedForm<T>,
    deps: &Collaborators,
) -> Result<(), SubmitRejected> {
    let pending = begin(form, deps)?;
    drive(Rc::downgrade(form), pending, deps).await;
    Ok(())
}

/// Starts a submission on the browser's event loop and returns immediately.
/// The spawned task holds the form weakly; dropping the form cancels it.
///
/// # Errors
/// [`SubmitRejected`] when no request was started.
#[cfg(target_arch = "wasm32")]
pub fn spawn_submit<T: FormValues + 'static>(
    form: &SharedForm<T>,
    deps: &Collaborators,
) -> Result<(), SubmitRejected> {
    let pending = begin(form, deps)?;
    let form = Rc::downgrade(form);
    let deps = deps.clone();
    wasm_bindgen_futures::spawn_local(async move {
        drive(form, pending, &deps).await;
    });
    Ok(())
}
