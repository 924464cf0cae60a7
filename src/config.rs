// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;

/// Minimum password length on the full signup page.
pub const SIGNUP_MIN_PASSWORD_LEN: usize = 8;

/// Minimum password length in the quick signup dialog on the landing page.
/// Separate policy from `SIGNUP_MIN_PASSWORD_LEN`.
pub const QUICK_SIGNUP_MIN_PASSWORD_LEN: usize = 6;

/// Eco points granted to a logged-in user for finishing the quiz.
pub const QUIZ_COMPLETION_POINTS: u32 = 25;

/// Credentials accepted by the simulated login.
pub const DEMO_EMAIL: &str = "demo@ecolearn.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// Signup with this email is rejected as a duplicate account.
pub const EXISTING_ACCOUNT_EMAIL: &str = "existing@example.com";

/// Where the client goes after a successful login or quick signup.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Where the client goes after signing up on the full signup page.
pub const LOGIN_PATH: &str = "/login";
/// Entry page protected pages bounce back to.
pub const ENTRY_PATH: &str = "/";

pub const LOGIN_REDIRECT_DELAY_MS: u64 = 1500;
pub const SIGNUP_REDIRECT_DELAY_MS: u64 = 2000;

/// Fixed delays of the simulated remote calls.
#[derive(Debug, Clone)]
pub struct Latency {
    pub login: Duration,
    pub signup: Duration,
    pub quick_signup: Duration,
    pub contact: Duration,
    pub task: Duration,
    pub password_reset: Duration,
}

impl Latency {
    /// The delays the site has always used, multiplied by `scale`.
    pub fn scaled(scale: f64) -> Self {
        let ms = |base: u64| Duration::from_millis((base as f64 * scale.max(0.0)) as u64);
        Self {
            login: ms(2000),
            signup: ms(3000),
            quick_signup: ms(1500),
            contact: ms(2000),
            task: ms(2000),
            password_reset: ms(500),
        }
    }

    pub fn none() -> Self {
        Self::scaled(0.0)
    }
}

impl Default for Latency {
    fn default() -> Self {
        Self::scaled(1.0)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub data_dir: PathBuf,
    pub static_dir: PathBuf,
    pub latency: Latency,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let addr = env::var("ECOLEARN_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let data_dir = env::var("ECOLEARN_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let static_dir = env::var("ECOLEARN_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let latency_scale = env::var("ECOLEARN_LATENCY_SCALE")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(1.0);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Self {
            addr,
            data_dir,
            static_dir,
            latency: Latency::scaled(latency_scale),
            rust_log,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latency_scale_multiplies_base_delays() {
        let half = Latency::scaled(0.5);
        assert_eq!(half.login, Duration::from_millis(1000));
        assert_eq!(half.signup, Duration::from_millis(1500));

        let none = Latency::none();
        assert_eq!(none.task, Duration::ZERO);
    }

    #[test]
    fn negative_scale_is_treated_as_zero() {
        assert_eq!(Latency::scaled(-3.0).contact, Duration::ZERO);
    }
}
