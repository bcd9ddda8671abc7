//! Sample data generation.
//!
//! Produces a dataset with enough structure to make analytical questions
//! interesting: 200 users across eight metro locations, 100 products over a
//! handful of categories, and 1000 transactions spread over the trailing
//! year with a realistic status mix.

use crate::models::{Product, Transaction, User};
use chrono::{Duration, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use uuid::Uuid;

const LOCATIONS: &[(&str, u32)] = &[
    ("Bengaluru", 20),
    ("Mumbai", 20),
    ("Delhi", 20),
    ("Chennai", 10),
    ("Kolkata", 10),
    ("Hyderabad", 10),
    ("Pune", 5),
    ("Ahmedabad", 5),
];

const SAMPLE_PRODUCTS: &[(&str, &str, &str)] = &[
    ("iPhone 14", "Electronics", "Apple"),
    ("Samsung Galaxy S22", "Electronics", "Samsung"),
    ("MacBook Air", "Electronics", "Apple"),
    ("Kindle Paperwhite", "Books", "Amazon"),
    ("Adidas Running Shoes", "Apparel", "Adidas"),
    ("Sony WH-1000XM5", "Electronics", "Sony"),
    ("Levi's Jeans", "Apparel", "Levi's"),
    ("iPad Pro", "Electronics", "Apple"),
    ("Dell XPS 13", "Electronics", "Dell"),
    ("Canon DSLR", "Electronics", "Canon"),
    ("Samsung Refrigerator", "Home Goods", "Samsung"),
    ("LG Washing Machine", "Home Goods", "LG"),
    ("Apple Watch Series 8", "Electronics", "Apple"),
    ("Nike Shoes", "Apparel", "Nike"),
    ("HP Pavilion", "Electronics", "HP"),
    ("Asus ROG Phone", "Electronics", "Asus"),
];

const CATEGORIES: &[&str] = &[
    "Electronics",
    "Books",
    "Apparel",
    "Home Goods",
    "Groceries",
    "Sports",
];

const BRANDS: &[&str] = &["BrandX", "BrandY", "BrandZ", "BrandA", "BrandB"];

const STATUSES: &[(&str, u32)] = &[("completed", 85), ("pending", 10), ("cancelled", 5)];

fn short_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

fn weighted<'a, T>(rng: &mut impl Rng, table: &'a [(T, u32)]) -> &'a T {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (item, weight) in table {
        if roll < *weight {
            return item;
        }
        roll -= weight;
    }
    &table[table.len() - 1].0
}

pub fn generate_users(rng: &mut impl Rng, count: usize) -> Vec<User> {
    let start = NaiveDate::from_ymd_opt(2021, 1, 1).expect("valid date");
    let today = Utc::now().date_naive();
    let span_days = (today - start).num_days().max(1);

    (0..count)
        .map(|i| User {
            user_id: short_id(),
            name: format!("User{}", i + 1),
            email: format!("user{}@example.com", i + 1),
            location: weighted(rng, LOCATIONS).to_string(),
            registration_date: start + Duration::days(rng.random_range(0..span_days)),
        })
        .collect()
}

pub fn generate_products(rng: &mut impl Rng, count: usize) -> Vec<Product> {
    (0..count)
        .map(|i| {
            let (name, category, brand) = if i < SAMPLE_PRODUCTS.len() {
                let (n, c, b) = SAMPLE_PRODUCTS[i];
                (n.to_string(), c.to_string(), b.to_string())
            } else {
                (
                    format!("Product{}", i + 1),
                    CATEGORIES.choose(rng).expect("non-empty").to_string(),
                    BRANDS.choose(rng).expect("non-empty").to_string(),
                )
            };
            let price = (rng.random_range(100.0..1500.0_f64) * 100.0).round() / 100.0;
            Product {
                product_id: short_id(),
                name,
                category,
                brand,
                price: Decimal::from_f64(price).unwrap_or_default(),
            }
        })
        .collect()
}

pub fn generate_transactions(
    rng: &mut impl Rng,
    users: &[User],
    products: &[Product],
    count: usize,
) -> Vec<Transaction> {
    let now = Utc::now().naive_utc();
    let span_seconds = Duration::days(365).num_seconds();

    (0..count)
        .map(|_| {
            let user = users.choose(rng).expect("non-empty users");
            let product = products.choose(rng).expect("non-empty products");
            let quantity = rng.random_range(1..=3_i64);
            let factor = (rng.random_range(0.8..1.2_f64) * 100.0).round() / 100.0;
            let amount = product.price
                * Decimal::from_f64(factor).unwrap_or(Decimal::ONE)
                * Decimal::from(quantity);

            Transaction {
                order_id: short_id(),
                user_id: user.user_id.clone(),
                product_id: product.product_id.clone(),
                amount: amount.round_dp(2),
                timestamp: now - Duration::seconds(rng.random_range(0..span_seconds)),
                status: weighted(rng, STATUSES).to_string(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn users_have_unique_emails_and_known_locations() {
        let mut rng = rand::rng();
        let users = generate_users(&mut rng, 50);
        assert_eq!(users.len(), 50);
        let locations: Vec<&str> = LOCATIONS.iter().map(|(l, _)| *l).collect();
        for user in &users {
            assert!(locations.contains(&user.location.as_str()));
        }
        let emails: std::collections::HashSet<_> = users.iter().map(|u| &u.email).collect();
        assert_eq!(emails.len(), 50);
    }

    #[test]
    fn first_products_are_named_samples() {
        let mut rng = rand::rng();
        let products = generate_products(&mut rng, 20);
        assert_eq!(products[0].name, "iPhone 14");
        assert_eq!(products[0].brand, "Apple");
        assert!(products[19].name.starts_with("Product"));
    }

    #[test]
    fn transactions_reference_seeded_rows() {
        let mut rng = rand::rng();
        let users = generate_users(&mut rng, 10);
        let products = generate_products(&mut rng, 10);
        let txns = generate_transactions(&mut rng, &users, &products, 100);
        assert_eq!(txns.len(), 100);

        let user_ids: std::collections::HashSet<_> = users.iter().map(|u| &u.user_id).collect();
        for txn in &txns {
            assert!(user_ids.contains(&txn.user_id));
            assert!(txn.amount > Decimal::ZERO);
            assert!(["completed", "pending", "cancelled"].contains(&txn.status.as_str()));
        }
    }

    #[test]
    fn weighted_pick_honors_zero_weight() {
        let mut rng = rand::rng();
        let table = [("always", 1_u32), ("never", 0_u32)];
        for _ in 0..50 {
            assert_eq!(*weighted(&mut rng, &table), "always");
        }
    }
}
