use askama::Template;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

pub const EMPTY_URL_MESSAGE: &str = "Please enter an Amazon product URL";
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid Amazon product URL";

/// Submitted "track a new product" form.
#[derive(Debug, Default, Clone, Deserialize, Serialize, Validate)]
pub struct AddProductForm {
    #[validate(custom(function = "validate_amazon_url"))]
    pub url: String,
}

impl AddProductForm {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The trimmed URL when it points at an Amazon storefront, otherwise the
    /// message to show the user.
    pub fn check(&self) -> Result<&str, String> {
        self.validate().map_err(|errors| first_message(&errors))?;
        Ok(self.url.trim())
    }
}

pub fn validate_amazon_url(url: &str) -> Result<(), ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::new("empty_url").with_message(Cow::from(EMPTY_URL_MESSAGE)));
    }
    let is_amazon = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|host| host.contains("amazon.")))
        .unwrap_or(false);
    if !is_amazon {
        return Err(
            ValidationError::new("not_amazon_url").with_message(Cow::from(INVALID_URL_MESSAGE))
        );
    }
    Ok(())
}

pub(crate) fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errors| errors.iter())
        .find_map(|error| error.message.as_ref().map(|message| message.to_string()))
        .unwrap_or_else(|| errors.to_string())
}

#[derive(Debug, Default, Template)]
#[template(path = "partials/add_product_form.html")]
pub struct AddProductPanel {
    pub busy: bool,
}
