//! Translation of backend tracking records into [`TrackedProduct`].
//!
//! The backend answers either with a product object directly or with a
//! tracking object that nests the product and carries its own
//! `initial_price`. Both shapes are resolved here and nowhere else.

use crate::configuration::DEFAULT_PLACEHOLDER_IMAGE;
use crate::data_models::TrackedProduct;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
enum RecordShape<'a> {
    Flat(&'a Value),
    Nested {
        product: &'a Value,
        initial_price: Option<&'a Value>,
    },
}

impl<'a> RecordShape<'a> {
    fn of(raw: &'a Value) -> Self {
        match raw.get("product") {
            Some(product) if product.is_object() => RecordShape::Nested {
                product,
                initial_price: raw.get("initial_price"),
            },
            _ => RecordShape::Flat(raw),
        }
    }

    fn product(&self) -> &'a Value {
        match self {
            RecordShape::Flat(product) => product,
            RecordShape::Nested { product, .. } => product,
        }
    }

    fn initial_price(&self) -> Option<&'a Value> {
        match self {
            RecordShape::Flat(product) => product.get("initial_price"),
            RecordShape::Nested { initial_price, .. } => *initial_price,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mapper {
    placeholder_image: String,
}

impl Default for Mapper {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER_IMAGE)
    }
}

impl Mapper {
    pub fn new(placeholder_image: &str) -> Self {
        Self {
            placeholder_image: placeholder_image.to_string(),
        }
    }

    pub fn map_record(&self, raw: &Value) -> TrackedProduct {
        self.map_record_at(raw, Utc::now())
    }

    pub fn map_records(&self, raw: &[Value]) -> Vec<TrackedProduct> {
        let now = Utc::now();
        raw.iter().map(|record| self.map_record_at(record, now)).collect()
    }

    /// Never fails: missing or malformed fields fall back to defaults, with
    /// `now` standing in for an absent `last_checked`.
    pub fn map_record_at(&self, raw: &Value, now: DateTime<Utc>) -> TrackedProduct {
        let shape = RecordShape::of(raw);
        let product = shape.product();

        let current_price = lenient_price(product.get("current_price"));
        let initial_price = match lenient_price(shape.initial_price()) {
            price if price.is_zero() => current_price,
            price => price,
        };
        let image_url = text(product.get("image_url"))
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.placeholder_image.clone());

        TrackedProduct {
            id: identifier(product.get("id")),
            name: text(product.get("title")).unwrap_or_default(),
            url: text(product.get("amazon_url")).unwrap_or_default(),
            current_price,
            initial_price,
            image_url,
            last_checked: product
                .get("last_checked")
                .and_then(timestamp)
                .unwrap_or(now),
        }
    }
}

fn identifier(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => String::new(),
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Non-numeric input, negatives and non-finite values all become zero.
pub fn lenient_price(value: Option<&Value>) -> Decimal {
    let parsed = match value {
        Some(Value::Number(number)) => Decimal::from_str(&number.to_string())
            .ok()
            .or_else(|| number.as_f64().and_then(Decimal::from_f64)),
        Some(Value::String(raw)) => numeric_prefix(raw).and_then(|p| Decimal::from_str(p).ok()),
        _ => None,
    };
    parsed
        .filter(|price| price.is_sign_positive())
        .unwrap_or(Decimal::ZERO)
}

/// Longest leading decimal literal, so `"12.50 USD"` reads as `12.50`.
fn numeric_prefix(raw: &str) -> Option<&str> {
    let raw = raw.trim_start();
    let bytes = raw.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    let mut seen_dot = false;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b'0'..=b'9' => end += 1,
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    let literal = raw[digits_start..end].trim_end_matches('.');
    if literal.is_empty() || literal == "." {
        return None;
    }
    let sign = raw[..digits_start].trim_start_matches('+');
    let prefix_end = digits_start + literal.len();
    if sign.is_empty() {
        Some(&raw[digits_start..prefix_end])
    } else {
        Some(&raw[..prefix_end])
    }
}

fn timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|date| date.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                    .ok()
                    .map(|naive| naive.and_utc())
            }),
        Value::Number(millis) => millis
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}
