//! Receipt data and plain-text rendering.

use jiff::Timestamp;
use serde::Serialize;

use crate::{
    cart::{CartLine, CartTotals, OrderType},
    money::format_centavos,
    payment::PaymentMethod,
};

/// Everything needed to render a receipt after a successful settlement.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Terminal-local order number shown to the customer.
    pub order_number: u64,

    /// Optional customer name.
    pub customer_name: Option<String>,

    /// Dine-in or take-out.
    pub order_type: OrderType,

    /// The settled lines.
    pub lines: Vec<CartLine>,

    /// Totals as charged.
    pub totals: CartTotals,

    /// Method that settled the order.
    pub method: PaymentMethod,

    /// Universal transaction reference.
    pub transaction_reference: String,

    /// When the receipt was issued.
    pub issued_at: Timestamp,
}

impl Receipt {
    /// Renders the receipt as printable text.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut text = String::new();

        text.push_str(&format!("Order #{}\n", self.order_number));
        text.push_str(&format!("Date: {}\n", self.issued_at));
        text.push_str(&format!("Order Type: {}\n", self.order_type.as_str()));

        if let Some(name) = &self.customer_name {
            text.push_str(&format!("Customer: {name}\n"));
        }

        text.push_str(&format!("Payment: {}\n", self.method.as_str()));
        text.push_str(&format!(
            "Transaction ID: {}\n",
            self.transaction_reference
        ));
        text.push('\n');

        for line in &self.lines {
            text.push_str(&format!(
                "{} x{}  {}\n",
                line.name,
                line.quantity,
                format_centavos(line.line_total())
            ));
        }

        text.push('\n');
        text.push_str(&format!(
            "Subtotal: {}\n",
            format_centavos(self.totals.subtotal)
        ));
        text.push_str(&format!("Tax: {}\n", format_centavos(self.totals.tax)));

        if self.totals.discount > 0 {
            text.push_str(&format!(
                "Discount: -{}\n",
                format_centavos(self.totals.discount)
            ));
        }

        text.push_str(&format!("TOTAL: {}\n", format_centavos(self.totals.total)));
        text.push('\n');
        text.push_str("Thank you for your order!\n");

        text
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    #[test]
    fn rendered_receipt_lists_lines_and_totals() {
        let receipt = Receipt {
            order_number: 2128,
            customer_name: Some("Catherine Arnado".to_string()),
            order_type: OrderType::DineIn,
            lines: vec![
                CartLine {
                    product_id: Uuid::now_v7(),
                    name: "Minute Burger".to_string(),
                    unit_price: 8_900,
                    quantity: 2,
                },
                CartLine {
                    product_id: Uuid::now_v7(),
                    name: "Calamantea".to_string(),
                    unit_price: 2_400,
                    quantity: 1,
                },
            ],
            totals: CartTotals {
                subtotal: 20_200,
                tax: 600,
                discount: 0,
                total: 20_800,
            },
            method: PaymentMethod::Cash,
            transaction_reference: "CASH-0".to_string(),
            issued_at: Timestamp::UNIX_EPOCH,
        };

        let text = receipt.render_text();

        assert!(text.contains("Order #2128"));
        assert!(text.contains("Customer: Catherine Arnado"));
        assert!(text.contains("Minute Burger x2  ₱178.00"));
        assert!(text.contains("Calamantea x1  ₱24.00"));
        assert!(text.contains("Subtotal: ₱202.00"));
        assert!(text.contains("Tax: ₱6.00"));
        assert!(text.contains("TOTAL: ₱208.00"));
        assert!(!text.contains("Discount"));
        assert!(text.contains("Thank you for your order!"));
    }
}
