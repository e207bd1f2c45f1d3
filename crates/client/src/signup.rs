//! Merchant registration wizard.
//!
//! A three-step linear state machine: Personal Info, Store Info,
//! Credentials. `next()` validates the current step and advances;
//! `back()` never validates; submission normalizes the draft and calls
//! the auth service. The draft lives only in memory and resets on
//! successful submission.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::instrument;

use vitrine_core::{BirthDate, Email, Phone, Subdomain, TaxId};

use crate::api::ApiError;
use crate::models::RegisterRequest;
use crate::services::AuthService;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Fallback message when a registration failure carries no detail.
const GENERIC_SUBMIT_ERROR: &str = "Registration failed, please try again";

/// The three ordered form steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    PersonalInfo,
    StoreInfo,
    Credentials,
}

impl WizardStep {
    /// 1-based position, as shown in the progress header.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::PersonalInfo => 1,
            Self::StoreInfo => 2,
            Self::Credentials => 3,
        }
    }

    const fn next(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => Some(Self::StoreInfo),
            Self::StoreInfo => Some(Self::Credentials),
            Self::Credentials => None,
        }
    }

    const fn previous(self) -> Option<Self> {
        match self {
            Self::PersonalInfo => None,
            Self::StoreInfo => Some(Self::PersonalInfo),
            Self::Credentials => Some(Self::StoreInfo),
        }
    }
}

/// Where the wizard is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardPhase {
    /// Collecting input on a step.
    Editing(WizardStep),
    /// Registration request in flight.
    Submitting,
    /// Registration succeeded; the draft has been reset.
    Done,
}

/// The in-progress draft. Raw strings as typed; normalization happens at
/// submission.
#[derive(Debug, Clone, Default)]
pub struct RegistrationFields {
    // Step 1 - Personal Info
    pub full_name: String,
    pub email: String,
    pub tax_id: String,
    pub phone: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    pub birth_date: String,
    // Step 2 - Store Info
    pub store_name: String,
    pub subdomain: String,
    pub segment: String,
    // Step 3 - Credentials
    pub password: String,
    pub password_confirm: String,
    pub accepted_terms: bool,
}

/// Per-field validation errors, keyed by field name. `BTreeMap` keeps the
/// surfacing order stable.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Outcome of a [`RegistrationWizard::next`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    /// Step validated; the wizard moved to this step.
    Advanced(WizardStep),
    /// The final step validated; call [`RegistrationWizard::submit`].
    ReadyToSubmit,
    /// Validation failed; the wizard stayed put and `errors()` is
    /// non-empty.
    Invalid,
}

/// Errors from [`RegistrationWizard::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Submission attempted outside the Credentials step or with a draft
    /// that doesn't validate.
    #[error("draft is not ready to submit")]
    NotReady,

    /// The registration endpoint rejected the draft. `message` is already
    /// the preferred user-facing detail.
    #[error("{message}")]
    Rejected {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// The registration wizard state machine.
#[derive(Debug)]
pub struct RegistrationWizard {
    phase: WizardPhase,
    fields: RegistrationFields,
    errors: FieldErrors,
    attempted: bool,
}

impl Default for RegistrationWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationWizard {
    /// A fresh draft on step 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: WizardPhase::Editing(WizardStep::PersonalInfo),
            fields: RegistrationFields {
                full_name: String::new(),
                email: String::new(),
                tax_id: String::new(),
                phone: String::new(),
                birth_date: String::new(),
                store_name: String::new(),
                subdomain: String::new(),
                segment: String::new(),
                password: String::new(),
                password_confirm: String::new(),
                accepted_terms: false,
            },
            errors: FieldErrors::new(),
            attempted: false,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> WizardPhase {
        self.phase
    }

    /// Current step, when editing.
    #[must_use]
    pub const fn step(&self) -> Option<WizardStep> {
        match self.phase {
            WizardPhase::Editing(step) => Some(step),
            _ => None,
        }
    }

    /// The draft fields, for binding to the form.
    #[must_use]
    pub const fn fields(&self) -> &RegistrationFields {
        &self.fields
    }

    /// Mutable access to the draft fields.
    pub const fn fields_mut(&mut self) -> &mut RegistrationFields {
        &mut self.fields
    }

    /// Validation errors from the last `next()` on this step.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the user already tried (and failed) to advance this step.
    /// The view highlights invalid fields while this is set.
    #[must_use]
    pub const fn attempted(&self) -> bool {
        self.attempted
    }

    /// Validate the current step and advance.
    ///
    /// On failure the wizard stays put, marks the attempt, and keeps the
    /// error map for the view. On success the attempt flag clears; from
    /// the last step the outcome is [`NextOutcome::ReadyToSubmit`].
    pub fn next(&mut self) -> NextOutcome {
        let WizardPhase::Editing(step) = self.phase else {
            return NextOutcome::Invalid;
        };

        let errors = Self::validate_step(step, &self.fields);
        if !errors.is_empty() {
            self.errors = errors;
            self.attempted = true;
            return NextOutcome::Invalid;
        }

        self.errors.clear();
        self.attempted = false;

        step.next().map_or(NextOutcome::ReadyToSubmit, |next| {
            self.phase = WizardPhase::Editing(next);
            NextOutcome::Advanced(next)
        })
    }

    /// Move back one step, unconditionally and without validation. A
    /// no-op on the first step.
    pub fn back(&mut self) {
        if let WizardPhase::Editing(step) = self.phase
            && let Some(previous) = step.previous()
        {
            self.phase = WizardPhase::Editing(previous);
        }
    }

    /// Submit the draft.
    ///
    /// Re-validates the whole draft (a failed check is [`SubmitError::NotReady`]),
    /// normalizes field values (digits-only tax ID and phone, `DD/MM/YYYY`
    /// birth date), and calls the registration endpoint. Success resets
    /// the draft; failure returns to the Credentials step with the
    /// service's preferred error detail.
    ///
    /// # Errors
    ///
    /// [`SubmitError::NotReady`] outside the validated final step,
    /// [`SubmitError::Rejected`] when the endpoint refuses the draft.
    #[instrument(skip_all)]
    pub async fn submit(&mut self, auth: &AuthService) -> Result<(), SubmitError> {
        if self.phase != WizardPhase::Editing(WizardStep::Credentials) {
            return Err(SubmitError::NotReady);
        }

        // Submission is only reachable through full validation
        let all_valid = [
            WizardStep::PersonalInfo,
            WizardStep::StoreInfo,
            WizardStep::Credentials,
        ]
        .into_iter()
        .all(|step| Self::validate_step(step, &self.fields).is_empty());

        if !all_valid {
            return Err(SubmitError::NotReady);
        }

        let Some(request) = Self::build_request(&self.fields) else {
            return Err(SubmitError::NotReady);
        };

        self.phase = WizardPhase::Submitting;

        match auth.register(&request).await {
            Ok(_) => {
                self.fields = RegistrationFields::default();
                self.errors.clear();
                self.attempted = false;
                self.phase = WizardPhase::Done;
                Ok(())
            }
            Err(source) => {
                self.phase = WizardPhase::Editing(WizardStep::Credentials);
                Err(SubmitError::Rejected {
                    message: submit_error_message(&source),
                    source,
                })
            }
        }
    }

    // =========================================================================
    // Validation
    // =========================================================================

    fn validate_step(step: WizardStep, fields: &RegistrationFields) -> FieldErrors {
        let mut errors = FieldErrors::new();

        match step {
            WizardStep::PersonalInfo => {
                if fields.full_name.trim().is_empty() {
                    errors.insert("full_name", "Name is required".to_owned());
                }
                if let Err(e) = Email::parse(fields.email.trim()) {
                    errors.insert("email", e.to_string());
                }
                if let Err(e) = TaxId::parse(&fields.tax_id) {
                    errors.insert("tax_id", e.to_string());
                }
                if let Err(e) = Phone::parse(&fields.phone) {
                    errors.insert("phone", e.to_string());
                }
                if let Err(e) = BirthDate::parse(&fields.birth_date) {
                    errors.insert("birth_date", e.to_string());
                }
            }
            WizardStep::StoreInfo => {
                if fields.store_name.trim().is_empty() {
                    errors.insert("store_name", "Store name is required".to_owned());
                }
                if let Err(e) = Subdomain::parse(&fields.subdomain) {
                    errors.insert("subdomain", e.to_string());
                }
                if fields.segment.trim().is_empty() {
                    errors.insert("segment", "Segment is required".to_owned());
                }
            }
            WizardStep::Credentials => {
                if fields.password.len() < MIN_PASSWORD_LENGTH {
                    errors.insert(
                        "password",
                        format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
                    );
                }
                if fields.password_confirm != fields.password {
                    errors.insert("password_confirm", "Passwords do not match".to_owned());
                }
                if !fields.accepted_terms {
                    errors.insert("accepted_terms", "You must accept the terms".to_owned());
                }
            }
        }

        errors
    }

    /// Normalize the draft into the wire payload. `None` when any parse
    /// fails - which step validation should have already ruled out.
    fn build_request(fields: &RegistrationFields) -> Option<RegisterRequest> {
        let email = Email::parse(fields.email.trim()).ok()?;
        let tax_id = TaxId::parse(&fields.tax_id).ok()?;
        let phone = Phone::parse(&fields.phone).ok()?;
        let birth_date = BirthDate::parse(&fields.birth_date).ok()?;
        let subdomain = Subdomain::parse(&fields.subdomain).ok()?;

        Some(RegisterRequest {
            name: fields.full_name.trim().to_owned(),
            email: email.into_inner(),
            tax_id: tax_id.into_inner(),
            phone: phone.into_inner(),
            birth_date: birth_date.as_api_format(),
            store_name: fields.store_name.trim().to_owned(),
            subdomain: subdomain.into_inner(),
            segment: fields.segment.trim().to_owned(),
            password: fields.password.clone(),
        })
    }
}

/// The user-facing message for a failed submission: the structured error
/// list when present, else the description, else a generic fallback.
fn submit_error_message(error: &ApiError) -> String {
    match error {
        ApiError::Status {
            errors,
            description,
            ..
        } => {
            if !errors.is_empty() {
                errors.join("; ")
            } else if let Some(description) = description {
                description.clone()
            } else {
                GENERIC_SUBMIT_ERROR.to_owned()
            }
        }
        _ => GENERIC_SUBMIT_ERROR.to_owned(),
    }
}
