use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use crate::{
    client::SignupEndpoint,
    errors::ValidationErrorMap,
    form::{Field, FormValues, SignupForm},
    navigation::{Navigator, DEFAULT_REDIRECT_PATH},
    notification::Notifier,
    response::ResponsePayload,
    schema::Validator,
};

/// Lifecycle of one submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
}

/// State read by the presentation layer, written only by the controller.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    pub submission: SubmissionState,
    /// Last field errors, from the schema or from the endpoint.
    pub errors: Option<ValidationErrorMap>,
}

impl FormState {
    pub fn is_submitting(&self) -> bool {
        self.submission == SubmissionState::Submitting
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.errors.as_ref().and_then(|errors| errors.get(field))
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "Submitting..."
        } else {
            "Sign up"
        }
    }
}

/// How a submit call ended. Exactly one per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Account created, control handed to the navigator.
    Navigated(String),
    /// Top-level or transport failure, forwarded to the notifier.
    Notified(String),
    /// Field errors returned by the endpoint.
    FieldErrors(ValidationErrorMap),
    /// Field errors from the local schema, nothing was sent.
    Invalid(ValidationErrorMap),
    /// Another submission was in flight.
    Rejected,
}

fn lock(state: &Mutex<FormState>) -> MutexGuard<'_, FormState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Holds the `Submitting` flag. Dropping it restores `Idle`, so every exit path
/// (early return, panic, cancelled future) releases the form.
struct SubmittingGuard<'a> {
    state: &'a Mutex<FormState>,
}

impl<'a> SubmittingGuard<'a> {
    fn acquire(state: &'a Mutex<FormState>) -> Option<Self> {
        let mut s = lock(state);
        if s.is_submitting() {
            return None;
        }
        s.submission = SubmissionState::Submitting;
        Some(Self { state })
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).submission = SubmissionState::Idle;
    }
}

pub struct SubmissionController<E> {
    endpoint: E,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    redirect_path: String,
    state: Arc<Mutex<FormState>>,
}

impl<E: SignupEndpoint> SubmissionController<E> {
    pub fn new(endpoint: E, notifier: Arc<dyn Notifier>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            endpoint,
            notifier,
            navigator,
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            state: Arc::new(Mutex::new(FormState::default())),
        }
    }

    pub fn with_redirect_path(mut self, path: String) -> Self {
        self.redirect_path = path;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> FormState {
        lock(&self.state).clone()
    }

    /// Handle for readers that outlive a snapshot.
    pub fn shared_state(&self) -> Arc<Mutex<FormState>> {
        self.state.clone()
    }

    /// Validate the form inputs, writing their warnings, then submit them.
    pub async fn submit_form<V: Validator + ?Sized>(
        &self,
        form: &mut SignupForm,
        validator: &V,
    ) -> SubmitOutcome {
        if self.state().is_submitting() {
            warn!("submit ignored, a submission is already in flight");
            return SubmitOutcome::Rejected;
        }
        match form.validate(validator) {
            Ok(values) => self.submit(values).await,
            Err(errors) => self.on_invalid(errors),
        }
    }

    /// Run the schema over `values` and submit them only if they pass.
    pub async fn handle_submit<V: Validator + ?Sized>(
        &self,
        validator: &V,
        values: FormValues,
    ) -> SubmitOutcome {
        if self.state().is_submitting() {
            warn!("submit ignored, a submission is already in flight");
            return SubmitOutcome::Rejected;
        }
        match validator.validate(&values) {
            Ok(()) => self.submit(values).await,
            Err(errors) => self.on_invalid(errors),
        }
    }

    /// Store local field errors unless a submission started in the meantime.
    fn on_invalid(&self, errors: ValidationErrorMap) -> SubmitOutcome {
        let mut state = lock(&self.state);
        if state.is_submitting() {
            warn!("local field errors dropped, a submission is in flight");
            return SubmitOutcome::Rejected;
        }
        debug!("{} field(s) failed local validation", errors.len());
        state.errors = Some(errors.clone());
        SubmitOutcome::Invalid(errors)
    }

    /// Send already validated values to the endpoint and reconcile the response.
    pub async fn submit(&self, values: FormValues) -> SubmitOutcome {
        let Some(guard) = SubmittingGuard::acquire(&self.state) else {
            warn!("submit ignored, a submission is already in flight");
            return SubmitOutcome::Rejected;
        };

        info!("submitting signup for username '{}'", values.username);
        let result = self.endpoint.sign_up(&values).await;
        drop(guard);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                error!("signup request failed: {}", e);
                let message = e.to_string();
                self.notifier.error(message.clone());
                return SubmitOutcome::Notified(message);
            }
        };

        match ResponsePayload::from(response) {
            ResponsePayload::Failure(message) => {
                warn!("signup rejected: {}", message);
                self.notifier.error(message.clone());
                SubmitOutcome::Notified(message)
            }
            ResponsePayload::FieldErrors(errors) => {
                debug!("signup returned {} field error(s)", errors.len());
                lock(&self.state).errors = Some(errors.clone());
                SubmitOutcome::FieldErrors(errors)
            }
            ResponsePayload::Success => {
                info!("account created, navigating to {}", self.redirect_path);
                self.navigator.push(&self.redirect_path);
                SubmitOutcome::Navigated(self.redirect_path.clone())
            }
        }
    }
}
