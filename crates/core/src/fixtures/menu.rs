//! The standard menu used by tests and `db seed`.

use uuid::Uuid;

use crate::money::Centavos;

/// A menu entry: stable id, display name, category, unit price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable product id, deterministic across runs.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Category label.
    pub category: String,

    /// Unit price in centavos.
    pub unit_price: Centavos,
}

/// Menu categories in display order.
pub const CATEGORIES: [&str; 6] = [
    "Sulit Sandwiches",
    "Big Time Burgers",
    "Chicken Time Sandwiches",
    "Hotdogs",
    "Beverages",
    "Extras/Side Items",
];

const ENTRIES: [(&str, &str, Centavos); 18] = [
    ("Minute Burger", "Sulit Sandwiches", 8_900),
    ("Black Pepper Burger", "Big Time Burgers", 8_900),
    ("Bacon Cheese Burger", "Big Time Burgers", 9_600),
    ("Beef Shawarma", "Big Time Burgers", 9_000),
    ("Steak Burger", "Big Time Burgers", 13_600),
    ("Double Minute Burger", "Sulit Sandwiches", 6_300),
    ("Chili Con Cheese Franks", "Hotdogs", 9_400),
    ("French Onion Franks", "Hotdogs", 9_200),
    ("Calamantea", "Beverages", 2_400),
    ("Iced Choco", "Beverages", 2_300),
    ("Double Cheesy Burger", "Big Time Burgers", 7_900),
    ("Double Chicken Time", "Chicken Time Sandwiches", 6_900),
    (
        "50/50 Veggie Premium Chicken Burger",
        "Chicken Time Sandwiches",
        8_600,
    ),
    ("Chicken Time", "Chicken Time Sandwiches", 5_000),
    (
        "Roasted Sesame Crispy Chicken Burger",
        "Chicken Time Sandwiches",
        9_600,
    ),
    ("Chimi-Pesto Burger", "Big Time Burgers", 9_800),
    ("Cheesy Burger", "Big Time Burgers", 5_200),
    ("Cheesy Nachos", "Extras/Side Items", 5_200),
];

/// The full menu with deterministic product ids.
#[must_use]
pub fn menu_items() -> Vec<MenuItem> {
    ENTRIES
        .iter()
        .zip(1_u128..)
        .map(|((name, category, price), n)| MenuItem {
            id: fixture_id(n),
            name: (*name).to_string(),
            category: (*category).to_string(),
            unit_price: *price,
        })
        .collect()
}

/// Looks up a menu item by display name.
#[must_use]
pub fn menu_item(name: &str) -> Option<MenuItem> {
    menu_items().into_iter().find(|item| item.name == name)
}

fn fixture_id(n: u128) -> Uuid {
    // Stable ids so seeds, demos, and tests agree across runs.
    Uuid::from_u128(0x4b61_6861_0000_0000_0000_0000_0000_0000 | n)
}
