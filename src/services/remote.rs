// src/services/remote.rs

//! The calls the site would make to a backend.
//!
//! `SimulatedRemote` answers them locally after fixed delays. A real client only
//! has to implement `RemoteService`.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::{
    config::{DEMO_EMAIL, DEMO_PASSWORD, EXISTING_ACCOUNT_EMAIL, Latency},
    models::{
        contact::ContactRequest,
        task::{TaskKind, TaskSubmission},
        user::{LoginRequest, QuickSignupRequest, Role, SignupRequest, User},
    },
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error("Invalid email or password. Try demo@ecolearn.com / demo123")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("{0}")]
    Rejected(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Acknowledgement of an accepted task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReceipt {
    pub task: TaskKind,
    pub points_awarded: u32,
}

#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn login(&self, credentials: LoginRequest) -> Result<User, RemoteError>;

    /// Creates an unverified account.
    async fn signup(&self, form: SignupRequest) -> Result<User, RemoteError>;

    /// Creates an account that can be used right away.
    async fn quick_signup(&self, form: QuickSignupRequest) -> Result<User, RemoteError>;

    async fn send_contact(&self, message: ContactRequest) -> Result<(), RemoteError>;

    async fn submit_task(&self, submission: TaskSubmission) -> Result<TaskReceipt, RemoteError>;

    async fn request_password_reset(&self, email: String) -> Result<(), RemoteError>;
}

/// Local stand-in for the backend.
#[derive(Debug, Clone, Default)]
pub struct SimulatedRemote {
    latency: Latency,
}

impl SimulatedRemote {
    pub fn new(latency: Latency) -> Self {
        Self { latency }
    }
}

static LAST_USER_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp, bumped past the previous id so two signups in the same
/// millisecond never share one.
fn new_user_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_USER_ID
        .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}

#[async_trait]
impl RemoteService for SimulatedRemote {
    async fn login(&self, credentials: LoginRequest) -> Result<User, RemoteError> {
        tokio::time::sleep(self.latency.login).await;

        if credentials.email.trim() != DEMO_EMAIL || credentials.password != DEMO_PASSWORD {
            return Err(RemoteError::InvalidCredentials);
        }

        let mut user = User::new(1, "Alex Johnson", DEMO_EMAIL, Role::Student);
        user.institution = Some("Pine Ridge School".to_string());
        Ok(user)
    }

    async fn signup(&self, form: SignupRequest) -> Result<User, RemoteError> {
        tokio::time::sleep(self.latency.signup).await;

        if form.email.trim() == EXISTING_ACCOUNT_EMAIL {
            return Err(RemoteError::EmailTaken);
        }

        let mut user = User::new(
            new_user_id(),
            &form.full_name,
            &form.email,
            Role::from(form.user_type.as_str()),
        );
        user.institution = Some(form.institution.trim().to_string());
        user.email_verified = false;
        Ok(user)
    }

    async fn quick_signup(&self, form: QuickSignupRequest) -> Result<User, RemoteError> {
        tokio::time::sleep(self.latency.quick_signup).await;

        if form.email.trim() == EXISTING_ACCOUNT_EMAIL {
            return Err(RemoteError::EmailTaken);
        }

        Ok(User::new(
            new_user_id(),
            &form.name,
            &form.email,
            Role::from(form.role.as_str()),
        ))
    }

    async fn send_contact(&self, message: ContactRequest) -> Result<(), RemoteError> {
        tokio::time::sleep(self.latency.contact).await;
        tracing::info!(subject = %message.subject, "Contact message accepted");
        Ok(())
    }

    async fn submit_task(&self, submission: TaskSubmission) -> Result<TaskReceipt, RemoteError> {
        tokio::time::sleep(self.latency.task).await;
        Ok(TaskReceipt {
            task: submission.task,
            points_awarded: submission.task.points(),
        })
    }

    async fn request_password_reset(&self, email: String) -> Result<(), RemoteError> {
        tokio::time::sleep(self.latency.password_reset).await;
        tracing::info!(%email, "Password reset requested");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> SimulatedRemote {
        SimulatedRemote::new(Latency::none())
    }

    #[tokio::test]
    async fn only_the_demo_pair_logs_in() {
        let ok = remote()
            .login(LoginRequest {
                email: DEMO_EMAIL.into(),
                password: DEMO_PASSWORD.into(),
                remember_me: false,
            })
            .await
            .unwrap();
        assert_eq!(ok.role, Role::Student);
        assert_eq!(ok.name, "Alex Johnson");

        let err = remote()
            .login(LoginRequest {
                email: DEMO_EMAIL.into(),
                password: "demo1234".into(),
                remember_me: true,
            })
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::InvalidCredentials);
        assert!(err.to_string().starts_with("Invalid email or password"));
    }

    #[tokio::test]
    async fn existing_email_is_rejected_at_signup() {
        let form = SignupRequest {
            full_name: "Sam Lee".into(),
            email: EXISTING_ACCOUNT_EMAIL.into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            user_type: "teacher".into(),
            institution: "Hill School".into(),
            agree_terms: true,
            email_updates: false,
        };
        assert_eq!(remote().signup(form).await.unwrap_err(), RemoteError::EmailTaken);
    }

    #[tokio::test]
    async fn signup_creates_unverified_user() {
        let form = SignupRequest {
            full_name: " Sam Lee ".into(),
            email: "sam@hill.edu".into(),
            password: "longenough".into(),
            confirm_password: "longenough".into(),
            user_type: "teacher".into(),
            institution: "Hill School".into(),
            agree_terms: true,
            email_updates: true,
        };
        let user = remote().signup(form).await.unwrap();
        assert_eq!(user.name, "Sam Lee");
        assert_eq!(user.role, Role::Teacher);
        assert!(!user.email_verified);
    }

    #[tokio::test]
    async fn same_millisecond_signups_get_distinct_ids() {
        let form = |email: &str| QuickSignupRequest {
            name: "Kai Moss".into(),
            email: email.into(),
            role: "student".into(),
            password: "abc123".into(),
            confirm_password: "abc123".into(),
        };
        let first = remote().quick_signup(form("kai@one.org")).await.unwrap();
        let second = remote().quick_signup(form("kai@two.org")).await.unwrap();
        assert!(second.id > first.id);

        let ids: Vec<i64> = (0..50).map(|_| new_user_id()).collect();
        assert!(ids.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[tokio::test]
    async fn task_receipt_carries_catalog_points() {
        let receipt = remote()
            .submit_task(TaskSubmission {
                task: TaskKind::Energy,
                proof: Some("meter.jpg".into()),
                notes: "switched to LEDs".into(),
            })
            .await
            .unwrap();
        assert_eq!(receipt.points_awarded, 40);
    }
}
