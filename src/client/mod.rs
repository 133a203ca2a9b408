//! HTTP client for the price-tracking backend.
//!
//! Every call is a single attempt: failures surface to the caller as
//! [`ClientError`] with no retry or backoff.

mod errors;

pub use errors::ClientError;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info};
use url::Url;

const LIST_PRODUCTS: &str = "tracking_products";
const TRACK_PRODUCT: &str = "track_product";
const DELETE_TRACKING: &str = "delete_tracking";
const SUBMIT_EMAIL: &str = "submit_email";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: Url,
}

impl RemoteClient {
    pub fn new(base_url: Url) -> Result<Self, ClientError> {
        // the cookie store keeps the backend session on every call
        let client = Client::builder()
            .redirect(Policy::limited(10))
            .cookie_store(true)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn list_products(&self) -> Result<Vec<Value>, ClientError> {
        let url = self.endpoint(&[LIST_PRODUCTS])?;
        info!("fetching products from {url}");
        let response = self.client.get(url).send().await.map_err(log_transport)?;
        let payload = read_payload(response).await?;
        match payload {
            Value::Array(records) => {
                info!("fetched {} tracked products", records.len());
                Ok(records)
            }
            Value::Null => Ok(vec![]),
            other => Err(ClientError::UnexpectedPayload(other.to_string())),
        }
    }

    pub async fn add_product(&self, url: &str) -> Result<Value, ClientError> {
        let endpoint = self.endpoint(&[TRACK_PRODUCT])?;
        let product_url = url.trim();
        info!("tracking product {product_url}");
        let response = self
            .client
            .post(endpoint)
            .json(&json!({ "url": product_url }))
            .send()
            .await
            .map_err(log_transport)?;
        read_payload(response).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<Value, ClientError> {
        let endpoint = self.endpoint(&[DELETE_TRACKING, id])?;
        info!("deleting product with id {id}");
        let response = self
            .client
            .delete(endpoint)
            .send()
            .await
            .map_err(log_transport)?;
        read_payload(response).await
    }

    pub async fn submit_email(&self, email: &str) -> Result<Value, ClientError> {
        let endpoint = self.endpoint(&[SUBMIT_EMAIL])?;
        info!("submitting alert email");
        let response = self
            .client
            .put(endpoint)
            .json(&json!({ "email": email }))
            .send()
            .await
            .map_err(log_transport)?;
        read_payload(response).await
    }
}

fn log_transport(err: reqwest::Error) -> ClientError {
    error!("request to backend failed: {err}");
    ClientError::Transport(err)
}

/// Successful bodies are parsed as JSON (an empty body reads as `null`,
/// plain text is kept as a string); failures carry the backend `detail`.
async fn read_payload(response: Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body = response.text().await.map_err(log_transport)?;
    if status.is_success() {
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        return Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)));
    }
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|error| error.detail)
        .and_then(|detail| match detail {
            Value::String(message) => Some(message),
            _ => None,
        });
    error!("backend responded with {status}: {body}");
    Err(ClientError::Rejected { status, detail })
}
