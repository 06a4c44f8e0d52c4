//! Record normalizer: flat view rows with related records joined by id.
//!
//! A foreign key with no match in its lookup never fails; the joined fields
//! fall back to placeholders instead.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use backoffice_core::{Entity, Intent, Money, StatusIntent};
use backoffice_parties::{Customer, CustomerId};
use backoffice_products::{Product, ProductId};
use backoffice_reviews::{Rating, Review, ReviewId, ReviewStatus};
use backoffice_sales::{Order, OrderId, OrderStatus};

use crate::derived::InventoryRow;
use crate::filter::Searchable;

/// Placeholder for joined display names that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// Borrowed id → record index over one collection.
#[derive(Debug)]
pub struct Lookup<'a, E: Entity> {
    by_id: HashMap<E::Id, &'a E>,
}

impl<E: Entity> Default for Lookup<'_, E> {
    fn default() -> Self {
        Self {
            by_id: HashMap::new(),
        }
    }
}

impl<'a, E: Entity> Lookup<'a, E> {
    /// Later duplicates of an id win.
    pub fn index(records: impl IntoIterator<Item = &'a E>) -> Self {
        Self {
            by_id: records.into_iter().map(|r| (*r.id(), r)).collect(),
        }
    }

    pub fn get(&self, id: &E::Id) -> Option<&'a E> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Review joined with its product and author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub id: ReviewId,
    pub product_id: ProductId,
    pub customer_id: CustomerId,
    pub rating: Rating,
    pub status: ReviewStatus,
    pub intent: Intent,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub product_thumbnail: String,
    pub customer_name: String,
    pub customer_email: String,
}

impl ReviewRow {
    /// The source review's own fields, without the joined ones.
    pub fn to_review(&self) -> Review {
        Review {
            id: self.id,
            product_id: self.product_id,
            customer_id: self.customer_id,
            rating: self.rating,
            status: self.status,
            title: self.title.clone(),
            body: self.body.clone(),
            created_at: self.created_at,
        }
    }
}

impl Searchable for ReviewRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.product_name,
            &self.customer_name,
            &self.title,
            &self.body,
        ]
    }
}

/// Order joined with its customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    pub intent: Intent,
    pub item_count: u64,
    pub total_price: Money,
    pub ordered_at: DateTime<Utc>,
}

impl Searchable for OrderRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.order_number, &self.customer_name, &self.customer_email]
    }
}

impl Searchable for InventoryRow {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.sku, &self.name, &self.category]
    }
}

/// Holds the lookup maps used to join related records onto view rows.
#[derive(Debug, Default)]
pub struct Normalizer<'a> {
    products: Lookup<'a, Product>,
    customers: Lookup<'a, Customer>,
}

impl<'a> Normalizer<'a> {
    pub fn new(products: &'a [Product], customers: &'a [Customer]) -> Self {
        Self {
            products: Lookup::index(products),
            customers: Lookup::index(customers),
        }
    }

    pub fn review_row(&self, review: &Review) -> ReviewRow {
        let product = self.products.get(&review.product_id);
        let customer = self.customers.get(&review.customer_id);
        if product.is_none() || customer.is_none() {
            tracing::trace!(review = %review.id, "review has unresolved relations");
        }

        ReviewRow {
            id: review.id,
            product_id: review.product_id,
            customer_id: review.customer_id,
            rating: review.rating,
            status: review.status,
            intent: review.status.intent(),
            title: review.title.clone(),
            body: review.body.clone(),
            created_at: review.created_at,
            product_name: product.map_or_else(|| UNKNOWN.to_string(), |p| p.name.clone()),
            product_thumbnail: product.map(|p| p.thumbnail.clone()).unwrap_or_default(),
            customer_name: customer.map_or_else(|| UNKNOWN.to_string(), Customer::display_name),
            customer_email: customer.map(|c| c.email.clone()).unwrap_or_default(),
        }
    }

    pub fn review_rows<'r>(&self, reviews: impl IntoIterator<Item = &'r Review>) -> Vec<ReviewRow> {
        reviews.into_iter().map(|r| self.review_row(r)).collect()
    }

    pub fn order_row(&self, order: &Order) -> OrderRow {
        let customer = self.customers.get(&order.customer_id);
        let customer_email = if order.customer_email.is_empty() {
            customer.map(|c| c.email.clone()).unwrap_or_default()
        } else {
            order.customer_email.clone()
        };

        OrderRow {
            id: order.id,
            order_number: order.order_number.clone(),
            customer_id: order.customer_id,
            customer_name: customer.map_or_else(|| UNKNOWN.to_string(), Customer::display_name),
            customer_email,
            status: order.status,
            intent: order.status.intent(),
            item_count: order.item_count(),
            total_price: order.total_price.clone(),
            ordered_at: order.ordered_at,
        }
    }

    pub fn order_rows<'r>(&self, orders: impl IntoIterator<Item = &'r Order>) -> Vec<OrderRow> {
        orders.into_iter().map(|o| self.order_row(o)).collect()
    }
}
