//! Catalog models.

use jiff::Timestamp;
use kaha::Centavos;
use uuid::Uuid;

/// Product Model
#[derive(Debug, Clone)]
pub struct Product {
    pub uuid: Uuid,
    pub name: String,
    pub category: String,
    pub price: Centavos,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: Uuid,
    pub name: String,
    pub category: String,
    pub price: Centavos,
}
