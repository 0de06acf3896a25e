//! Cart

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    errors::MarketplaceError,
    products::{Product, ProductId},
    receipt::Receipt,
    users::User,
};

/// A cart line: a snapshot of the product taken when it was first added,
/// plus a quantity.
///
/// Persisted as the product's fields with `quantity` alongside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Product snapshot
    #[serde(flatten)]
    pub product: Product,

    /// Quantity, always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// The snapshotted product id.
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// Snapshot price multiplied by quantity.
    pub fn line_total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Cart lines, at most one per product id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartLedger {
    lines: Vec<CartLine>,
}

impl CartLedger {
    /// Create a ledger over existing lines.
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Rebuild a ledger from stored lines.
    ///
    /// Lines sharing a product id are merged into the first one, adding up
    /// their quantities, and lines with a quantity of 0 are dropped.
    pub fn restore(lines: Vec<CartLine>) -> Self {
        let stored = lines.len();
        let mut ledger = Self::default();

        for line in lines.into_iter().filter(|line| line.quantity > 0) {
            match ledger
                .lines
                .iter_mut()
                .find(|existing| existing.product_id() == line.product_id())
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => ledger.lines.push(line),
            }
        }

        if ledger.lines.len() != stored {
            warn!(stored, kept = ledger.lines.len(), "stored cart lines normalised");
        }

        ledger
    }

    /// Add one unit of `product` for `buyer`.
    ///
    /// An existing line for the same product id has its quantity bumped;
    /// otherwise a new line snapshots the product.
    ///
    /// # Errors
    ///
    /// Returns [`MarketplaceError::SelfPurchase`] if `buyer` is the seller.
    pub fn add(&mut self, product: &Product, buyer: &User) -> Result<CartLine, MarketplaceError> {
        if product.is_sold_by(buyer.identifier()) {
            return Err(MarketplaceError::SelfPurchase);
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id() == product.id)
        {
            line.quantity = line.quantity.saturating_add(1);

            debug!(id = %product.id, quantity = line.quantity, "cart line merged");

            return Ok(line.clone());
        }

        let line = CartLine {
            product: product.clone(),
            quantity: 1,
        };

        self.lines.push(line.clone());

        Ok(line)
    }

    /// Sum of price times quantity over every line.
    pub fn subtotal(&self) -> u64 {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(0, u64::saturating_add)
    }

    /// Sum of quantities over every line.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Settle the cart: produce a receipt for the current lines and empty
    /// the ledger.
    pub fn checkout(&mut self) -> Receipt {
        let receipt = Receipt::new(std::mem::take(&mut self.lines));

        debug!(total = receipt.total(), "cart settled");

        receipt
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Find the line for `id`.
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product_id() == id)
    }

    /// All lines, in the order first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
