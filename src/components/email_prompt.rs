use crate::components::add_product_form::first_message;
use askama::Template;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const SAME_EMAIL_MESSAGE: &str = "Please enter a different email address";

#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct EmailForm {
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
}

impl EmailForm {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Checked before anything is sent to the backend.
    pub fn check(&self, existing_email: Option<&str>) -> Result<(), String> {
        self.validate().map_err(|errors| first_message(&errors))?;
        if existing_email == Some(self.email.as_str()) {
            return Err(SAME_EMAIL_MESSAGE.to_string());
        }
        Ok(())
    }
}

pub fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::from(INVALID_EMAIL_MESSAGE)))
}

/// Opt-in card for price drop alerts. Without an existing email there is no
/// way to close it.
#[derive(Debug, Default, Template)]
#[template(path = "partials/email_prompt.html")]
pub struct EmailPromptCard {
    pub existing_email: Option<String>,
    pub error: Option<String>,
}

impl EmailPromptCard {
    pub fn is_changing_email(&self) -> bool {
        self.existing_email.is_some()
    }

    pub fn heading(&self) -> &'static str {
        if self.is_changing_email() {
            "Update Your Email"
        } else {
            "Get Price Drop Alerts"
        }
    }

    pub fn description(&self) -> &'static str {
        if self.is_changing_email() {
            "Enter a new email address to receive price drop notifications."
        } else {
            "Never miss a deal! Enter your email to receive instant notifications when prices drop on your tracked products."
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_changing_email() {
            "Update Email"
        } else {
            "Enable Alerts"
        }
    }

    pub fn value(&self) -> &str {
        self.existing_email.as_deref().unwrap_or_default()
    }
}
