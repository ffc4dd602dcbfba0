//! Shopping Cart Aggregate
//!
//! A cart holds at most one line per product reference. Each line carries the
//! name, price and image captured when the product was added; later catalog
//! changes never alter lines already in the cart. Quantities are `NonZeroU32`,
//! so a line with zero or negative quantity cannot exist.

use crate::catalog::Product;
use crate::error::StoreError;
use crate::store::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::num::NonZeroU32;

/// Product data captured at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub product_id: EntityId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: EntityId,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    quantity: NonZeroU32,
}

impl CartLine {
    pub fn quantity(&self) -> u32 {
        self.quantity.get()
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity.get())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCart")]
pub struct Cart {
    lines: Vec<CartLine>,
}

/// Wire form of a cart, checked for duplicate products before it becomes a [`Cart`].
#[derive(Deserialize)]
struct RawCart {
    #[serde(default)]
    lines: Vec<CartLine>,
}

impl TryFrom<RawCart> for Cart {
    type Error = String;

    fn try_from(raw: RawCart) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(raw.lines.len());
        for line in &raw.lines {
            if !seen.insert(&line.product_id) {
                return Err(format!("duplicate cart line for product {}", line.product_id));
            }
        }
        Ok(Cart { lines: raw.lines })
    }
}

impl Cart {
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &EntityId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity.get())).sum()
    }

    /// Σ price × quantity, computed from the current lines on every call.
    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Add `quantity` units. An existing line for the product merges quantities and
    /// keeps its original snapshot; otherwise a new line is appended.
    pub fn add(&self, product: ProductSnapshot, quantity: u32) -> Result<Cart, StoreError> {
        let product_id = product.product_id.clone();
        let invalid = move |q: i64| StoreError::InvalidQuantity {
            product_id: product_id.clone(),
            quantity: q,
        };
        let added = NonZeroU32::new(quantity).ok_or_else(|| invalid(0))?;

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|l| l.product_id == product.product_id) {
            Some(line) => {
                let merged = line.quantity.checked_add(added.get()).ok_or_else(|| {
                    invalid(i64::from(line.quantity.get()) + i64::from(quantity))
                })?;
                line.quantity = merged;
            }
            None => lines.push(CartLine {
                product_id: product.product_id,
                name: product.name,
                price: product.price,
                image: product.image,
                quantity: added,
            }),
        }
        Ok(Cart { lines })
    }

    /// Set the quantity of an existing line. Zero or negative removes the line;
    /// values above `u32::MAX` saturate. Absent products leave the cart unchanged.
    pub fn set_quantity(&self, product_id: &EntityId, quantity: i64) -> Cart {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        let clamped = u32::try_from(quantity).unwrap_or(u32::MAX);
        let Some(next) = NonZeroU32::new(clamped) else {
            return self.remove(product_id);
        };
        let lines = self
            .lines
            .iter()
            .cloned()
            .map(|mut line| {
                if &line.product_id == product_id {
                    line.quantity = next;
                }
                line
            })
            .collect();
        Cart { lines }
    }

    /// Remove the line for the product unconditionally.
    pub fn remove(&self, product_id: &EntityId) -> Cart {
        Cart {
            lines: self
                .lines
                .iter()
                .filter(|l| &l.product_id != product_id)
                .cloned()
                .collect(),
        }
    }

    pub fn cleared(&self) -> Cart {
        Cart::default()
    }
}
