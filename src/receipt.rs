//! Receipt

use crate::cart::CartLine;

/// Confirmation of a settled cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Lines that were settled
    lines: Vec<CartLine>,

    /// Total amount paid for all lines
    total: u64,
}

impl Receipt {
    /// Create a receipt for the given lines.
    pub fn new(lines: Vec<CartLine>) -> Self {
        let total = lines
            .iter()
            .map(CartLine::line_total)
            .fold(0, u64::saturating_add);

        Self { lines, total }
    }

    /// Total amount paid
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Settled lines
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of units settled across all lines
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }
}
