use askama::Template;

/// Shown while an add-product request is in flight.
#[derive(Debug, Default, Template)]
#[template(path = "partials/loading_card.html")]
pub struct LoadingCard;

/// Skeleton list shown until the first product fetch completes.
#[derive(Debug, Template)]
#[template(path = "partials/products_loading.html")]
pub struct ProductsLoadingState {
    pub placeholders: Vec<&'static str>,
    pub progress_dots: usize,
}

impl Default for ProductsLoadingState {
    fn default() -> Self {
        Self {
            placeholders: vec!["package", "search", "trending-down"],
            progress_dots: 4,
        }
    }
}
