//! Owner of the product list and every piece of page state.
//!
//! Network calls are never made while the state lock is held; each action
//! takes the lock only for the synchronous mutations around its call.

use crate::client::{ClientError, RemoteClient};
use crate::components::{AddProductForm, EmailForm};
use crate::data_models::TrackedProduct;
use crate::mapper::Mapper;
use crate::notifications::{Notice, Notices};
use crate::storage::{KeyValueStore, USER_EMAIL_KEY};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

pub const CONNECTIVITY_MESSAGE: &str = "Could not connect to server. Is the backend running?";
pub const TRACKED_MESSAGE: &str = "Product tracked successfully!";
pub const TRACK_FAILED_MESSAGE: &str = "Failed to track product.";
pub const DELETED_MESSAGE: &str = "Stopped tracking product.";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete. Refreshing...";
pub const EMAIL_SAVED_MESSAGE: &str = "Email saved! You'll get alerts now.";
pub const EMAIL_FAILED_MESSAGE: &str = "Failed to save email. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

#[derive(Debug)]
struct ViewState {
    phase: Phase,
    mounted: bool,
    products: Vec<TrackedProduct>,
    adds_in_flight: usize,
    show_email_prompt: bool,
    email_error: Option<String>,
    user_email: Option<String>,
    notices: Notices,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: Phase::Loading,
            mounted: false,
            products: vec![],
            adds_in_flight: 0,
            show_email_prompt: false,
            email_error: None,
            user_email: None,
            notices: Notices::default(),
        }
    }
}

/// Read-only copy of the page state used for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub products: Vec<TrackedProduct>,
    pub scraping: bool,
    pub email_prompt_visible: bool,
    pub email_error: Option<String>,
    pub user_email: Option<String>,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

#[derive(Debug)]
pub struct Orchestrator {
    client: RemoteClient,
    mapper: Mapper,
    store: Arc<dyn KeyValueStore>,
    state: RwLock<ViewState>,
}

impl Orchestrator {
    pub fn new(client: RemoteClient, mapper: Mapper, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            client,
            mapper,
            store,
            state: RwLock::new(ViewState::default()),
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            phase: state.phase,
            products: state.products.clone(),
            scraping: state.adds_in_flight > 0,
            email_prompt_visible: state.show_email_prompt && !state.products.is_empty(),
            email_error: state.email_error.clone(),
            user_email: state.user_email.clone(),
        }
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        self.state.write().await.notices.take()
    }

    pub async fn notify(&self, notice: Notice) {
        self.state.write().await.notices.push(notice);
    }

    /// Initial load: restores the saved email and fetches the list. Only the
    /// first call does anything.
    pub async fn mount(&self) {
        {
            let mut state = self.state.write().await;
            if state.mounted {
                return;
            }
            state.mounted = true;
            state.phase = Phase::Loading;
            state.user_email = self.saved_email();
        }

        let fetched = self.client.list_products().await;

        let mut state = self.state.write().await;
        match fetched {
            Ok(records) => {
                state.products = self.mapper.map_records(&records);
                if state.user_email.is_some() {
                    state.show_email_prompt = false;
                } else if !state.products.is_empty() {
                    state.show_email_prompt = true;
                }
            }
            Err(e) => {
                log_failure("loading products", &e);
                state.products.clear();
                state.notices.push(Notice::error(CONNECTIVITY_MESSAGE));
            }
        }
        state.phase = Phase::Ready;
    }

    fn saved_email(&self) -> Option<String> {
        match self.store.get(USER_EMAIL_KEY) {
            Ok(email) => email,
            Err(e) => {
                warn!("failed to read saved email: {e}");
                None
            }
        }
    }

    pub async fn add_product(&self, form: AddProductForm) {
        if let Some(url) = self.begin_add(&form).await {
            self.complete_add(&url).await;
        }
    }

    /// Validates the form and marks an add as in flight. Returns the URL to
    /// send, or `None` after queueing the validation message.
    pub async fn begin_add(&self, form: &AddProductForm) -> Option<String> {
        let mut state = self.state.write().await;
        match form.check() {
            Ok(url) => {
                state.adds_in_flight += 1;
                Some(url.to_string())
            }
            Err(message) => {
                state.notices.push(Notice::error(message));
                None
            }
        }
    }

    pub async fn complete_add(&self, url: &str) {
        let added = self.client.add_product(url).await;

        let mut state = self.state.write().await;
        state.adds_in_flight = state.adds_in_flight.saturating_sub(1);
        match added {
            Ok(record) => {
                let product = self.mapper.map_record(&record);
                info!("tracking product {}", product.id);
                state.products.insert(0, product);
                state.notices.push(Notice::success(TRACKED_MESSAGE));
            }
            Err(e) => {
                log_failure("tracking a product", &e);
                state
                    .notices
                    .push(Notice::error(detail_or(&e, TRACK_FAILED_MESSAGE)));
            }
        }
    }

    pub async fn delete_product(&self, id: &str) {
        let snapshot = self.begin_delete(id).await;
        self.complete_delete(id, snapshot).await;
    }

    /// Removes the product right away and returns the list as it was.
    pub async fn begin_delete(&self, id: &str) -> Vec<TrackedProduct> {
        let mut state = self.state.write().await;
        let snapshot = state.products.clone();
        state.products.retain(|product| product.id != id);
        snapshot
    }

    /// Confirms the delete with the backend. On failure the list is replaced
    /// by a fresh fetch, or by `snapshot` when the backend is unreachable.
    pub async fn complete_delete(&self, id: &str, snapshot: Vec<TrackedProduct>) {
        let Err(e) = self.client.delete_product(id).await else {
            self.notify(Notice::success(DELETED_MESSAGE)).await;
            return;
        };
        log_failure(&format!("deleting {id}"), &e);
        self.notify(Notice::error(DELETE_FAILED_MESSAGE)).await;

        let refreshed = self.client.list_products().await;
        let mut state = self.state.write().await;
        match refreshed {
            Ok(records) => state.products = self.mapper.map_records(&records),
            Err(e) => {
                log_failure("refreshing products after delete", &e);
                state.products = snapshot;
                state.notices.push(Notice::error(CONNECTIVITY_MESSAGE));
            }
        }
    }

    /// Returns whether the backend accepted the email.
    pub async fn submit_email(&self, form: EmailForm) -> bool {
        {
            let mut state = self.state.write().await;
            if let Err(message) = form.check(state.user_email.as_deref()) {
                state.email_error = Some(message);
                state.show_email_prompt = true;
                return false;
            }
            state.email_error = None;
        }

        let submitted = self.client.submit_email(&form.email).await;

        let mut state = self.state.write().await;
        match submitted {
            Ok(_) => {
                if let Err(e) = self.store.set(USER_EMAIL_KEY, &form.email) {
                    error!("failed to persist email: {e}");
                }
                state.user_email = Some(form.email);
                state.show_email_prompt = false;
                state.email_error = None;
                state.notices.push(Notice::success(EMAIL_SAVED_MESSAGE));
                true
            }
            Err(e) => {
                log_failure("submitting email", &e);
                state.email_error = Some(detail_or(&e, EMAIL_FAILED_MESSAGE));
                state.show_email_prompt = true;
                false
            }
        }
    }

    /// First-time users have to provide an email; the prompt stays.
    pub async fn dismiss_email_prompt(&self) -> bool {
        let mut state = self.state.write().await;
        if state.user_email.is_none() {
            return false;
        }
        state.show_email_prompt = false;
        state.email_error = None;
        true
    }

    pub async fn open_email_prompt(&self) -> bool {
        let mut state = self.state.write().await;
        if state.user_email.is_none() {
            return false;
        }
        state.show_email_prompt = true;
        true
    }
}

fn log_failure(action: &str, e: &ClientError) {
    if e.is_connectivity() {
        warn!("backend unreachable while {action}: {e}");
    } else {
        error!("{action} failed: {e}");
    }
}

fn detail_or(error: &ClientError, fallback: &str) -> String {
    error.detail().unwrap_or(fallback).to_string()
}
