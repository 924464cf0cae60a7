// src/services/forms.rs

//! Submission gating for the site's forms.
//!
//! A form is either idle or submitting. While submitting its control is disabled,
//! which is the only lock: a second submit is refused, and the call already running
//! is never cancelled.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Login,
    Signup,
    QuickSignup,
    Contact,
    Task,
}

impl FormKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "login" => Some(Self::Login),
            "signup" => Some(Self::Signup),
            "quick-signup" => Some(Self::QuickSignup),
            "contact" => Some(Self::Contact),
            "task" => Some(Self::Task),
            _ => None,
        }
    }

    pub fn idle_label(self) -> &'static str {
        match self {
            FormKind::Login => "Sign In",
            FormKind::Signup | FormKind::QuickSignup => "Create Account",
            FormKind::Contact => "Send Message",
            FormKind::Task => "Submit Task",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            FormKind::Login => "Signing In...",
            FormKind::Signup | FormKind::QuickSignup => "Creating Account...",
            FormKind::Contact => "Sending...",
            FormKind::Task => "Submitting...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    Idle,
    Submitting,
}

/// What the submit button should look like right now.
#[derive(Debug, Clone, Serialize)]
pub struct ControlState {
    pub form: FormKind,
    pub phase: FormPhase,
    pub disabled: bool,
    pub label: &'static str,
}

/// Client-side navigation to perform after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Redirect {
    pub to: &'static str,
    pub after_ms: u64,
}

#[derive(Debug, Clone)]
pub struct FormController {
    kind: FormKind,
    busy: Arc<AtomicBool>,
}

/// Held while a submission is in flight. Dropping it re-enables the form.
#[derive(Debug)]
pub struct SubmitGuard {
    kind: FormKind,
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
        tracing::debug!(form = ?self.kind, "Form re-enabled");
    }
}

impl FormController {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn phase(&self) -> FormPhase {
        if self.busy.load(Ordering::Acquire) {
            FormPhase::Submitting
        } else {
            FormPhase::Idle
        }
    }

    pub fn control(&self) -> ControlState {
        let phase = self.phase();
        let (disabled, label) = match phase {
            FormPhase::Idle => (false, self.kind.idle_label()),
            FormPhase::Submitting => (true, self.kind.busy_label()),
        };
        ControlState {
            form: self.kind,
            phase,
            disabled,
            label,
        }
    }

    /// Disables the form, or refuses if a submission is already running.
    pub fn begin(&self) -> Result<SubmitGuard, AppError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                AppError::Conflict("A submission is already in progress".to_string())
            })?;
        tracing::debug!(form = ?self.kind, "Form disabled for submission");
        Ok(SubmitGuard {
            kind: self.kind,
            busy: self.busy.clone(),
        })
    }

    /// Runs `work` as this form's submission.
    ///
    /// `work` runs on its own task holding the guard, so it completes and the form
    /// is re-enabled even if the caller stops waiting.
    pub async fn submit<T, Fut>(&self, work: Fut) -> Result<T, AppError>
    where
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
        T: Send + 'static,
    {
        let guard = self.begin()?;
        let handle = tokio::spawn(async move {
            let _guard = guard;
            work.await
        });
        handle.await?
    }
}

/// One controller per form on the site.
#[derive(Debug, Clone)]
pub struct FormControllers {
    pub login: FormController,
    pub signup: FormController,
    pub quick_signup: FormController,
    pub contact: FormController,
    pub task: FormController,
}

impl FormControllers {
    pub fn new() -> Self {
        Self {
            login: FormController::new(FormKind::Login),
            signup: FormController::new(FormKind::Signup),
            quick_signup: FormController::new(FormKind::QuickSignup),
            contact: FormController::new(FormKind::Contact),
            task: FormController::new(FormKind::Task),
        }
    }

    pub fn get(&self, kind: FormKind) -> &FormController {
        match kind {
            FormKind::Login => &self.login,
            FormKind::Signup => &self.signup,
            FormKind::QuickSignup => &self.quick_signup,
            FormKind::Contact => &self.contact,
            FormKind::Task => &self.task,
        }
    }
}

impl Default for FormControllers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn idle_control_shows_idle_label() {
        let form = FormController::new(FormKind::Login);
        let control = form.control();
        assert_eq!(control.phase, FormPhase::Idle);
        assert!(!control.disabled);
        assert_eq!(control.label, "Sign In");
    }

    #[test]
    fn second_begin_is_refused_until_guard_drops() {
        let form = FormController::new(FormKind::Contact);
        let guard = form.begin().unwrap();
        assert!(form.control().disabled);
        assert_eq!(form.control().label, "Sending...");
        assert!(matches!(form.begin(), Err(AppError::Conflict(_))));

        drop(guard);
        assert_eq!(form.phase(), FormPhase::Idle);
        assert!(form.begin().is_ok());
    }

    #[tokio::test]
    async fn failure_restores_the_form() {
        let form = FormController::new(FormKind::Signup);
        let result: Result<(), AppError> = form
            .submit(async { Err(AppError::Conflict("taken".into())) })
            .await;
        assert!(result.is_err());
        assert_eq!(form.phase(), FormPhase::Idle);
    }

    #[tokio::test]
    async fn abandoned_submission_still_runs_to_completion() {
        let form = FormController::new(FormKind::Task);
        let (done_tx, done_rx) = oneshot::channel();

        let caller = {
            let form = form.clone();
            tokio::spawn(async move {
                form.submit(async move {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    let _ = done_tx.send(());
                    Ok(())
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        caller.abort();

        done_rx.await.expect("submission finished");
        // The guard is dropped right after the work completes.
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(form.phase(), FormPhase::Idle);
    }
}
