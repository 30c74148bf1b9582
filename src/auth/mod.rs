use thiserror::Error;
use tracing::{info, warn};

use crate::api::{ApiError, SocialApi};
use crate::host::HostNotifier;
use crate::models::LoginResponse;

const DEFAULT_LOGIN_ERROR: &str = "Credenciales incorrectas.";
const MISSING_FIELDS: &str = "Ingresa tu correo y contraseña.";

/// Field that currently receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LoginBlocked {
    #[error("email and password are required")]
    MissingFields,
    #[error("a login attempt is already in flight")]
    InFlight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    LoggedIn,
    Failed(String),
}

/// Login form widget state
#[derive(Debug, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    focus: LoginField,
    in_flight: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Password as shown on screen
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.chars().count())
    }

    pub fn focus(&self) -> LoginField {
        self.focus
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus {
            LoginField::Email => self.email.push(c),
            LoginField::Password => self.password.push(c),
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus {
            LoginField::Email => self.email.pop(),
            LoginField::Password => self.password.pop(),
        };
    }

    /// Validate and lock the form, returning the credentials to send
    pub fn begin_submit(&mut self) -> Result<(String, String), LoginBlocked> {
        if self.in_flight {
            return Err(LoginBlocked::InFlight);
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_FIELDS.to_string());
            return Err(LoginBlocked::MissingFields);
        }

        self.in_flight = true;
        self.error = None;
        Ok((self.email.trim().to_string(), self.password.clone()))
    }

    pub fn finish_submit(
        &mut self,
        result: Result<LoginResponse, ApiError>,
        notifier: &dyn HostNotifier,
    ) -> LoginOutcome {
        self.in_flight = false;
        match result {
            Ok(response) if response.success => {
                info!("Login succeeded for {}", self.email.trim());
                self.password.clear();
                notifier.on_login();
                LoginOutcome::LoggedIn
            }
            Ok(response) => {
                let message = response.error.unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string());
                warn!("Login rejected for {}: {}", self.email.trim(), message);
                self.error = Some(message.clone());
                LoginOutcome::Failed(message)
            }
            Err(e) => {
                tracing::error!("Login request failed: {}", e);
                let message = e.user_message();
                self.error = Some(message.clone());
                LoginOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn SocialApi,
        notifier: &dyn HostNotifier,
    ) -> Result<LoginOutcome, LoginBlocked> {
        let (email, password) = self.begin_submit()?;
        let result = api.login(&email, &password).await;
        Ok(self.finish_submit(result, notifier))
    }

    pub fn switch_to_register(&self, notifier: &dyn HostNotifier) {
        notifier.on_switch_to_register();
    }
}
