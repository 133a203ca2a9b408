use crate::data_models::{round_half_up, PriceTrend, TrackedProduct};
use askama::Template;
use url::Url;

const ACTION_BASE: &str = "http://localhost/products";

#[derive(Debug, Template)]
#[template(path = "partials/product_card.html")]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image_url: String,
    pub current_price: String,
    pub initial_price: String,
    pub trend: PriceTrend,
    pub last_checked: String,
    pub delete_action: String,
    currency: String,
}

impl ProductCard {
    pub fn new(product: &TrackedProduct, currency: &str) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            url: product.url.clone(),
            image_url: product.image_url.clone(),
            current_price: format!("{currency}{:.2}", round_half_up(product.current_price, 2)),
            initial_price: format!("{currency}{:.2}", round_half_up(product.initial_price, 2)),
            trend: product.price_trend(),
            last_checked: product
                .last_checked
                .format("%Y-%m-%d %H:%M UTC")
                .to_string(),
            delete_action: delete_action(&product.id),
            currency: currency.to_string(),
        }
    }

    pub fn is_price_down(&self) -> bool {
        self.trend.is_decrease()
    }

    /// Badge text such as `-₹10.00 (-10.0%)`; `None` hides the badge.
    pub fn change_label(&self) -> Option<String> {
        let amount = self.trend.amount_display(&self.currency)?;
        let percent = self.trend.percent_display()?;
        Some(format!("{amount} ({percent})"))
    }
}

/// `/products/{id}/delete` with the id escaped as a single path segment.
fn delete_action(id: &str) -> String {
    let Ok(mut url) = Url::parse(ACTION_BASE) else {
        return format!("/products/{id}/delete");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(id).push("delete");
    }
    url.path().to_string()
}
