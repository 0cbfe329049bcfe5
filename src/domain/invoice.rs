use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub amount: f64,
}

impl Invoice {
    pub fn new(amount: f64) -> Self {
        Self { amount }
    }

    /// Percentages outside (0, 100] leave the amount as it is.
    pub fn apply_discount(&mut self, percent: f64) {
        if percent > 0.0 && percent <= 100.0 {
            self.amount -= self.amount * (percent / 100.0);
        }
    }

    pub fn total_with_tax(&self, rate: f64) -> f64 {
        if rate > 0.0 {
            return self.amount + (self.amount * rate / 100.0);
        }
        self.amount
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invoice with amount: {}", self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_bounds() {
        let mut invoice = Invoice::new(100.0);
        invoice.apply_discount(0.0);
        assert_eq!(invoice.amount, 100.0);
        invoice.apply_discount(150.0);
        assert_eq!(invoice.amount, 100.0);
        invoice.apply_discount(20.0);
        assert_eq!(invoice.amount, 80.0);
    }

    #[test]
    fn test_full_discount() {
        let mut invoice = Invoice::new(45.0);
        invoice.apply_discount(100.0);
        assert_eq!(invoice.amount, 0.0);
    }

    #[test]
    fn test_tax_does_not_mutate() {
        let invoice = Invoice::new(200.0);
        assert_eq!(invoice.total_with_tax(19.0), 238.0);
        assert_eq!(invoice.total_with_tax(0.0), 200.0);
        assert_eq!(invoice.total_with_tax(-5.0), 200.0);
        assert_eq!(invoice.amount, 200.0);
    }
}
