//! In-memory cart for a single checkout session.
//!
//! The cart is a pure value: mutations are plain method calls and totals
//! are a deterministic function of the current lines. Stock checks are
//! the caller's responsibility; the cart never performs I/O.

use serde::Serialize;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::money::Centavos;

/// Flat tax applied to every order, in centavos (₱6.00).
///
/// The observed behavior is a fixed fee regardless of subtotal, not a
/// rate. Kept as the default policy; swap in another [`TaxPolicy`] to
/// change it without touching settlement.
pub const FLAT_TAX_CENTAVOS: Centavos = 600;

/// Computes the tax owed for a given subtotal.
pub trait TaxPolicy: Send + Sync {
    /// Tax in centavos for the given subtotal.
    fn tax_for(&self, subtotal: Centavos) -> Centavos;
}

/// A fixed fee charged on every non-empty order.
#[derive(Debug, Clone, Copy)]
pub struct FlatFeeTax(pub Centavos);

impl Default for FlatFeeTax {
    fn default() -> Self {
        Self(FLAT_TAX_CENTAVOS)
    }
}

impl TaxPolicy for FlatFeeTax {
    fn tax_for(&self, _subtotal: Centavos) -> Centavos {
        self.0
    }
}

/// Dine-in or take-out, carried through to the order notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderType {
    /// Customer eats in.
    #[default]
    DineIn,

    /// Customer takes the order away.
    TakeOut,
}

impl OrderType {
    /// Display label, matching the persisted vocabulary.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DineIn => "Dine In",
            Self::TakeOut => "Take Out",
        }
    }
}

/// One product in the cart with its quantity.
///
/// Invariant: `quantity >= 1`. A line that would reach zero is removed
/// from the cart rather than retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    /// Product identity.
    pub product_id: Uuid,

    /// Display name captured at add time.
    pub name: String,

    /// Unit price in centavos captured at add time.
    pub unit_price: Centavos,

    /// Units of this product, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price × quantity`.
    #[must_use]
    pub fn line_total(&self) -> Centavos {
        self.unit_price * Centavos::from(self.quantity)
    }
}

/// Derived totals for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartTotals {
    /// Sum of line totals.
    pub subtotal: Centavos,

    /// Tax from the active [`TaxPolicy`].
    pub tax: Centavos,

    /// Discount; currently always zero.
    pub discount: Centavos,

    /// `subtotal + tax − discount`.
    pub total: Centavos,
}

/// Outcome of [`Cart::change_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityChange {
    /// The line's quantity was updated to this value.
    Updated(u32),

    /// The line reached zero and was removed.
    Removed,

    /// The product was not in the cart; use [`Cart::add_item`] to add
    /// one, since a delta carries no name or price.
    NoOp,
}

/// Ordered collection of [`CartLine`]s plus order metadata.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: SmallVec<[CartLine; 8]>,

    /// Dine-in or take-out.
    pub order_type: OrderType,

    /// Optional free-text customer name.
    pub customer_name: Option<String>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// True when no lines are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units of the given product currently in the cart, summed across
    /// all lines. There should be at most one line per product, but the
    /// sum does not rely on that.
    #[must_use]
    pub fn quantity_of(&self, product_id: Uuid) -> u32 {
        self.lines
            .iter()
            .filter(|line| line.product_id == product_id)
            .map(|line| line.quantity)
            .sum()
    }

    /// Adds one unit of a product: increments the existing line or
    /// appends a new one with quantity 1.
    pub fn add_item(&mut self, product_id: Uuid, name: &str, unit_price: Centavos) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity += 1;
            return;
        }

        self.lines.push(CartLine {
            product_id,
            name: name.to_string(),
            unit_price,
            quantity: 1,
        });
    }

    /// Applies a quantity delta to a product's line. A resulting
    /// quantity of zero or less removes the line.
    pub fn change_quantity(&mut self, product_id: Uuid, delta: i32) -> QuantityChange {
        let Some((index, line)) = self
            .lines
            .iter_mut()
            .enumerate()
            .find(|(_, l)| l.product_id == product_id)
        else {
            return QuantityChange::NoOp;
        };

        let updated = i64::from(line.quantity) + i64::from(delta);

        if updated <= 0 {
            self.lines.remove(index);
            return QuantityChange::Removed;
        }

        let quantity = u32::try_from(updated).unwrap_or(u32::MAX);
        line.quantity = quantity;
        QuantityChange::Updated(quantity)
    }

    /// Removes all lines. Idempotent.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Derived totals under the given tax policy. Pure and
    /// deterministic: repeated calls on an unmodified cart are equal.
    #[must_use]
    pub fn totals(&self, tax_policy: &dyn TaxPolicy) -> CartTotals {
        let subtotal: Centavos = self.lines.iter().map(CartLine::line_total).sum();
        let tax = tax_policy.tax_for(subtotal);
        let discount = 0;

        CartTotals {
            subtotal,
            tax,
            discount,
            total: subtotal + tax - discount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_with(entries: &[(Uuid, &str, Centavos, u32)]) -> Cart {
        let mut cart = Cart::new();
        for (id, name, price, quantity) in entries {
            for _ in 0..*quantity {
                cart.add_item(*id, name, *price);
            }
        }
        cart
    }

    #[test]
    fn adding_same_product_increments_one_line() {
        let id = Uuid::now_v7();
        let cart = cart_with(&[(id, "Minute Burger", 8_900, 3)]);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.quantity_of(id), 3);
    }

    #[test]
    fn quantity_reaching_zero_removes_the_line() {
        let id = Uuid::now_v7();
        let mut cart = cart_with(&[(id, "Calamantea", 2_400, 2)]);

        assert_eq!(cart.change_quantity(id, -1), QuantityChange::Updated(1));
        assert_eq!(cart.change_quantity(id, -1), QuantityChange::Removed);
        assert!(cart.is_empty());
        assert_eq!(cart.quantity_of(id), 0);
    }

    #[test]
    fn negative_delta_past_zero_removes_rather_than_underflows() {
        let id = Uuid::now_v7();
        let mut cart = cart_with(&[(id, "Iced Choco", 2_300, 1)]);

        assert_eq!(cart.change_quantity(id, -5), QuantityChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn change_on_absent_product_is_a_no_op() {
        let mut cart = Cart::new();

        assert_eq!(cart.change_quantity(Uuid::now_v7(), -1), QuantityChange::NoOp);
        assert_eq!(cart.change_quantity(Uuid::now_v7(), 1), QuantityChange::NoOp);
        assert!(cart.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let id = Uuid::now_v7();
        let mut cart = cart_with(&[(id, "Cheesy Nachos", 5_200, 1)]);

        cart.clear();
        cart.clear();

        assert!(cart.is_empty());
    }

    #[test]
    fn totals_reconcile_and_are_deterministic() {
        let cart = cart_with(&[
            (Uuid::now_v7(), "Minute Burger", 8_900, 2),
            (Uuid::now_v7(), "Calamantea", 2_400, 1),
        ]);

        let tax = FlatFeeTax::default();
        let first = cart.totals(&tax);
        let second = cart.totals(&tax);

        assert_eq!(first, second);
        assert_eq!(first.subtotal, 20_200);
        assert_eq!(first.tax, 600);
        assert_eq!(first.discount, 0);
        assert_eq!(first.total, first.subtotal + first.tax - first.discount);
        assert_eq!(first.total, 20_800);
    }

    #[test]
    fn empty_cart_still_charges_the_flat_fee() {
        // Faithful to the observed flat-fee behavior; settlement rejects
        // empty carts before totals ever reach an order.
        let cart = Cart::new();
        let totals = cart.totals(&FlatFeeTax::default());

        assert_eq!(totals.subtotal, 0);
        assert_eq!(totals.total, 600);
    }
}
