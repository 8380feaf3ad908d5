//! Dialog state machines
//!
//! Pure state transitions for the create/edit dialog and the delete
//! confirmation. Remote calls are issued by the view in between
//! `begin_*` and `finish_*`.

use serde::Serialize;

use super::forms::{EntityForm, FormPreset};
use crate::errors::{AppError, Result};
use crate::models::{MutableResource, Resource};

type KeyOf<F> = <<F as EntityForm>::Entity as Resource>::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Error,
    Validation,
}

/// Transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub detail: Option<String>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            detail: None,
        }
    }

    pub fn error(message: impl Into<String>, error: &AppError) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            detail: Some(error.to_string()),
        }
    }

    pub fn validation(error: &AppError) -> Self {
        Self {
            level: NotificationLevel::Validation,
            message: "Please fill in all required fields".to_string(),
            detail: Some(error.to_string()),
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<K> {
    Create,
    Edit(K),
}

impl<K> FormMode<K> {
    pub fn verb(&self) -> &'static str {
        match self {
            FormMode::Create => "create",
            FormMode::Edit(_) => "update",
        }
    }

    fn past_tense(&self) -> &'static str {
        match self {
            FormMode::Create => "created",
            FormMode::Edit(_) => "updated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Submitting,
}

/// Remote call the view must issue for a submit
pub enum SubmitRequest<E: MutableResource> {
    Create(E::Create),
    Update(E::Key, E::Update),
}

pub enum SubmitStep<E: MutableResource> {
    Send(SubmitRequest<E>),
    /// Validation failed; the dialog stays open with its values
    Rejected(Notification),
    /// Closed or already submitting
    Ignored,
}

/// Create/edit dialog for one entity type
#[derive(Debug, Clone)]
pub struct FormDialog<F: EntityForm> {
    open: bool,
    mode: FormMode<KeyOf<F>>,
    form: F,
    phase: SubmitPhase,
}

impl<F: EntityForm> Default for FormDialog<F> {
    fn default() -> Self {
        Self {
            open: false,
            mode: FormMode::Create,
            form: F::default(),
            phase: SubmitPhase::Idle,
        }
    }
}

impl<F: EntityForm> FormDialog<F> {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn mode(&self) -> &FormMode<KeyOf<F>> {
        &self.mode
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Open empty, optionally pre-filling one foreign key
    pub fn open_create(&mut self, preset: Option<&FormPreset>) {
        let mut form = F::default();
        if let Some(preset) = preset {
            form.apply_preset(preset);
        }

        self.form = form;
        self.mode = FormMode::Create;
        self.phase = SubmitPhase::Idle;
        self.open = true;
    }

    /// Open pre-populated with the entity's current values
    pub fn open_edit(&mut self, entity: &F::Entity) -> Result<()> {
        let key = entity.key().ok_or_else(|| AppError::MissingField {
            field: "id".to_string(),
        })?;

        self.form = F::from_entity(entity);
        self.mode = FormMode::Edit(key);
        self.phase = SubmitPhase::Idle;
        self.open = true;
        Ok(())
    }

    pub fn close(&mut self) {
        *self = Self::default();
    }

    /// Validate and, if the form is complete, move to `Submitting`
    pub fn begin_submit(&mut self) -> SubmitStep<F::Entity> {
        if !self.open || self.is_submitting() {
            return SubmitStep::Ignored;
        }
        if let Err(e) = self.form.check() {
            return SubmitStep::Rejected(Notification::validation(&e));
        }

        let request = match &self.mode {
            FormMode::Create => self.form.create_payload().map(SubmitRequest::Create),
            FormMode::Edit(key) => self
                .form
                .update_payload()
                .map(|payload| SubmitRequest::Update(key.clone(), payload)),
        };

        match request {
            Ok(request) => {
                self.phase = SubmitPhase::Submitting;
                SubmitStep::Send(request)
            }
            Err(e) => SubmitStep::Rejected(Notification::validation(&e)),
        }
    }

    /// Settle a submit. Success resets and closes; failure keeps the values.
    pub fn finish_submit(&mut self, outcome: &Result<()>) -> Notification {
        self.phase = SubmitPhase::Idle;
        let name = <F::Entity as Resource>::NAME;

        match outcome {
            Ok(()) => {
                let message = format!("{} {} successfully", capitalize(name), self.mode.past_tense());
                self.close();
                Notification::success(message)
            }
            Err(e) => Notification::error(format!("Failed to {} {}", self.mode.verb(), name), e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletePhase<K> {
    Idle,
    Confirming(K),
    Deleting(K),
}

/// Delete confirmation holding the target key
#[derive(Debug, Clone)]
pub struct DeleteConfirmation<K> {
    phase: DeletePhase<K>,
}

impl<K> Default for DeleteConfirmation<K> {
    fn default() -> Self {
        Self {
            phase: DeletePhase::Idle,
        }
    }
}

impl<K: Clone> DeleteConfirmation<K> {
    pub fn phase(&self) -> &DeletePhase<K> {
        &self.phase
    }

    pub fn target(&self) -> Option<&K> {
        match &self.phase {
            DeletePhase::Idle => None,
            DeletePhase::Confirming(key) | DeletePhase::Deleting(key) => Some(key),
        }
    }

    /// Confirm is disabled unless a target is awaiting confirmation
    pub fn can_confirm(&self) -> bool {
        matches!(self.phase, DeletePhase::Confirming(_))
    }

    /// Ask for confirmation. Refused while a delete is in flight.
    pub fn request(&mut self, key: K) -> bool {
        if matches!(self.phase, DeletePhase::Deleting(_)) {
            return false;
        }
        self.phase = DeletePhase::Confirming(key);
        true
    }

    /// Back out without a remote call
    pub fn cancel(&mut self) -> bool {
        if matches!(self.phase, DeletePhase::Confirming(_)) {
            self.phase = DeletePhase::Idle;
            return true;
        }
        false
    }

    /// Move to `Deleting` and hand out the key to delete
    pub fn begin(&mut self) -> Option<K> {
        let DeletePhase::Confirming(key) = &self.phase else {
            return None;
        };
        let key = key.clone();
        self.phase = DeletePhase::Deleting(key.clone());
        Some(key)
    }

    pub fn finish(&mut self, entity: &str, outcome: &Result<()>) -> Notification {
        self.phase = DeletePhase::Idle;

        match outcome {
            Ok(()) => Notification::success(format!("{} deleted successfully", capitalize(entity))),
            Err(e) => Notification::error(format!("Failed to delete {}", entity), e),
        }
    }
}
