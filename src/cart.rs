// Checkout cart for marketplace services

use crate::aggregate;
use crate::error::{CatalogError, CatalogResult};
use crate::models::Service;
use crate::record::{IndexValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Spanish general VAT rate applied at checkout
pub const VAT_RATE: f64 = 0.21;

/// One service line in the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub service_id: String,
    pub name: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

// Lines are records too, so totals go through the same aggregator as any catalog
impl Record for CartItem {
    fn id(&self) -> &str {
        &self.service_id
    }

    fn set_id(&mut self, id: String) {
        self.service_id = id;
    }

    fn collection_name() -> &'static str {
        "cart"
    }

    fn primary_text(&self) -> &str {
        &self.name
    }

    fn indexed_fields(&self) -> HashMap<String, IndexValue> {
        let mut fields = HashMap::new();
        fields.insert("unit_price".to_string(), IndexValue::Float(self.unit_price));
        fields.insert("quantity".to_string(), IndexValue::Int(self.quantity as i64));
        fields.insert("line_total".to_string(), IndexValue::Float(self.line_total()));
        fields
    }
}

/// Isolated cart state for one checkout session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Add one unit of `service`, creating its line if needed
    pub fn add(&mut self, service: &Service) {
        match self.items.iter_mut().find(|i| i.service_id == service.id) {
            Some(item) => item.quantity += 1,
            None => self.items.push(CartItem {
                service_id: service.id.clone(),
                name: service.name.clone(),
                unit_price: service.price,
                quantity: 1,
            }),
        }
        debug!(service_id = %service.id, units = self.item_count(), "cart: service added");
    }

    /// Set the quantity of a line; zero removes it
    pub fn set_quantity(&mut self, service_id: &str, quantity: u32) -> CatalogResult<()> {
        if quantity == 0 {
            return self.remove(service_id).map(|_| ());
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.service_id == service_id)
            .ok_or_else(|| not_found(service_id))?;
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, service_id: &str) -> CatalogResult<CartItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.service_id == service_id)
            .ok_or_else(|| not_found(service_id))?;
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn subtotal(&self) -> f64 {
        round_cents(aggregate::sum(&self.items, "line_total"))
    }

    pub fn vat(&self) -> f64 {
        round_cents(self.subtotal() * VAT_RATE)
    }

    pub fn total(&self) -> f64 {
        round_cents(self.subtotal() + self.vat())
    }
}

fn not_found(service_id: &str) -> CatalogError {
    CatalogError::NotFound {
        collection: CartItem::collection_name(),
        id: service_id.to_string(),
    }
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    fn service(id: &str) -> Service {
        samples::services().into_iter().find(|s| s.id == id).unwrap()
    }

    #[test]
    fn test_add_increments_existing_line() {
        let mut cart = Cart::new();
        cart.add(&service("1"));
        cart.add(&service("1"));
        cart.add(&service("5"));

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_totals_include_vat() {
        let mut cart = Cart::new();
        cart.add(&service("1")); // 49.00
        cart.add(&service("2")); // 35.00

        assert_eq!(cart.subtotal(), 84.0);
        assert_eq!(cart.vat(), 17.64);
        assert_eq!(cart.total(), 101.64);
    }

    #[test]
    fn test_empty_cart_totals_are_zero() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), 0.0);
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = Cart::new();
        cart.add(&service("3"));
        cart.set_quantity("3", 4).unwrap();
        assert_eq!(cart.subtotal(), 240.0);

        cart.set_quantity("3", 0).unwrap();
        assert!(cart.is_empty());

        assert!(matches!(cart.set_quantity("3", 2), Err(CatalogError::NotFound { .. })));
        assert!(matches!(cart.remove("3"), Err(CatalogError::NotFound { .. })));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add(&service("6"));
        cart.add(&service("8"));
        cart.clear();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), 0.0);
    }
}
