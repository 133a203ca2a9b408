use crate::components::{
    AddProductPanel, EmailPromptCard, LoadingCard, Logo, ProductCard, ProductsLoadingState,
};
use crate::configuration::DisplaySettings;
use crate::errors::AppErrors;
use crate::notifications::Notice;
use crate::orchestrator::Snapshot;
use askama::Template;
use axum::response::{Html, IntoResponse, Response};

/// Seconds between automatic reloads while something is in flight.
const REFRESH_SECONDS: u32 = 2;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub logo: Logo,
    pub add_product: AddProductPanel,
    pub loading_card: Option<LoadingCard>,
    pub email_prompt: Option<EmailPromptCard>,
    pub products_loading: Option<ProductsLoadingState>,
    pub cards: Vec<ProductCard>,
    pub can_change_email: bool,
    pub notices: Vec<Notice>,
    pub refresh_seconds: Option<u32>,
}

impl IndexTemplate {
    pub fn new(snapshot: Snapshot, notices: Vec<Notice>, display: &DisplaySettings) -> Self {
        let busy = snapshot.is_loading() || snapshot.scraping;
        Self {
            logo: Logo::header(),
            add_product: AddProductPanel {
                busy: snapshot.scraping,
            },
            loading_card: snapshot.scraping.then_some(LoadingCard),
            email_prompt: snapshot.email_prompt_visible.then(|| EmailPromptCard {
                existing_email: snapshot.user_email.clone(),
                error: snapshot.email_error.clone(),
            }),
            products_loading: snapshot
                .is_loading()
                .then(ProductsLoadingState::default),
            cards: snapshot
                .products
                .iter()
                .map(|product| ProductCard::new(product, &display.currency_symbol))
                .collect(),
            can_change_email: snapshot.user_email.is_some(),
            notices,
            refresh_seconds: busy.then_some(REFRESH_SECONDS),
        }
    }

    pub fn product_count_label(&self) -> String {
        match self.cards.len() {
            1 => "1 product".to_string(),
            n => format!("{n} products"),
        }
    }
}

pub struct HtmlTemplate<T>(pub T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => AppErrors::TemplateError(err).into_response(),
        }
    }
}
