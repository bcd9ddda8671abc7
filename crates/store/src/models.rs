//! Typed rows for the three relations.
//!
//! Analytical queries go through the dynamic decoder in `rows`; these structs
//! exist for the code paths with a known shape — seeding and the search
//! index sync.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub price: Decimal,
}

impl Product {
    /// The search-index document: price flattened to a float so the index
    /// can range-filter on it.
    pub fn document(&self) -> serde_json::Value {
        serde_json::json!({
            "product_id": self.product_id,
            "name": self.name,
            "category": self.category,
            "brand": self.brand,
            "price": self.price.to_f64(),
        })
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub location: String,
    pub registration_date: NaiveDate,
}

impl User {
    pub fn document(&self) -> serde_json::Value {
        serde_json::json!({
            "user_id": self.user_id,
            "name": self.name,
            "email": self.email,
            "location": self.location,
            "registration_date": crate::rows::iso_date(self.registration_date),
        })
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub order_id: String,
    pub user_id: String,
    pub product_id: String,
    pub amount: Decimal,
    pub timestamp: NaiveDateTime,
    pub status: String,
}
