//! The shopping cart: an ordered list of lines, one per product, mirrored
//! to storage after every change.

use rust_decimal::Decimal;
use shopfront_core::{round_to_cents, CartLine, Product, ProductId};

use crate::error::CartError;
use crate::storage::CartStorage;

/// Owns the cart lines and writes the whole list through `S` after each
/// mutation.
///
/// Invariants: at most one line per product id, and every line has a
/// quantity of at least 1. New lines are appended; quantity changes keep a
/// line where it is.
///
/// A failed write does not roll the change back. The in-memory cart stays
/// authoritative and the error is returned to the caller.
#[derive(Debug)]
pub struct CartStore<S> {
    lines: Vec<CartLine>,
    storage: S,
    key: String,
}

impl<S: CartStorage> CartStore<S> {
    /// Restores the cart stored under `key`.
    ///
    /// Nothing stored, unreadable storage, or a document that does not parse
    /// all give an empty cart. Stored lines that break the invariants
    /// (duplicate ids, zero quantity) are repaired on load.
    pub fn hydrate(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let lines = match storage.read(&key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize_lines(lines),
                Err(error) => {
                    tracing::warn!(
                        key = %key,
                        %error,
                        "stored cart is not valid, starting empty"
                    );
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(error) => {
                tracing::warn!(
                    key = %key,
                    %error,
                    "could not read stored cart, starting empty"
                );
                Vec::new()
            }
        };
        tracing::debug!(key = %key, lines = lines.len(), "cart hydrated");

        Self {
            lines,
            storage,
            key,
        }
    }

    /// Adds one unit of `product`: bumps an existing line or appends a new
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the cart cannot be written to storage.
    pub fn add_to_cart(&mut self, product: &Product) -> Result<(), CartError> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.id() == product.id) {
            line.quantity = line.quantity.saturating_add(1);
            tracing::debug!(
                product_id = product.id,
                quantity = line.quantity,
                "cart line incremented"
            );
        } else {
            self.lines.push(CartLine::new(product.clone()));
            tracing::debug!(product_id = product.id, "cart line added");
        }
        self.persist()
    }

    /// Adds `delta` to the quantity of `product_id`'s line, removing it if
    /// the result is zero or less. Unknown ids are ignored and nothing is
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the cart cannot be written to storage.
    pub fn update_quantity(&mut self, product_id: ProductId, delta: i64) -> Result<(), CartError> {
        let Some(index) = self.position(product_id) else {
            tracing::debug!(product_id, delta, "quantity update for product not in cart");
            return Ok(());
        };

        let current = i64::from(self.lines[index].quantity);
        let next = current.saturating_add(delta);
        if next <= 0 {
            self.lines.remove(index);
            tracing::debug!(product_id, "cart line removed by quantity update");
        } else {
            self.lines[index].quantity = u32::try_from(next).unwrap_or(u32::MAX);
            tracing::debug!(
                product_id,
                quantity = self.lines[index].quantity,
                "cart line quantity updated"
            );
        }
        self.persist()
    }

    /// Drops `product_id`'s line if there is one. The cart is written either
    /// way.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the cart cannot be written to storage.
    pub fn remove_item(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.id() != product_id);
        if self.lines.len() < before {
            tracing::debug!(product_id, "cart line removed");
        }
        self.persist()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of `price × quantity` over all lines, rounded to cents.
    ///
    /// Saturates at the `Decimal` bounds rather than overflowing.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        let total = self
            .lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        round_to_cents(total)
    }

    /// [`Self::total_price`] with exactly two decimals, e.g. `"25.50"`.
    #[must_use]
    pub fn formatted_total_price(&self) -> String {
        format!("{:.2}", self.total_price())
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, product_id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.id() == product_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.id() == product_id)
    }

    fn persist(&mut self) -> Result<(), CartError> {
        let json = serde_json::to_string(&self.lines)?;
        self.storage.write(&self.key, &json)?;
        Ok(())
    }
}

/// Merges duplicate ids into the first occurrence and drops empty lines.
fn normalize_lines(lines: Vec<CartLine>) -> Vec<CartLine> {
    let stored = lines.len();
    let mut merged: Vec<CartLine> = Vec::with_capacity(stored);
    for line in lines {
        if line.quantity == 0 {
            continue;
        }
        if let Some(existing) = merged.iter_mut().find(|l| l.id() == line.id()) {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            merged.push(line);
        }
    }
    if merged.len() != stored {
        tracing::warn!(
            stored,
            kept = merged.len(),
            "stored cart had duplicate or empty lines, repaired"
        );
    }
    merged
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
