use serde::{Deserialize, Serialize};

/// A single product listing collected from the listing API.
///
/// Field order is the CSV column order: `id`, `name`, `price`, `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Product identifier (`goodsNo` upstream), used as the dedup key.
    pub id: String,
    pub name: String,
    /// Sell price in whole currency units.
    pub price: i64,
    /// Product detail page link.
    pub url: String,
}

/// Logical fields of a [`Record`], used to report which one failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Id,
    Name,
    Price,
    Url,
}

impl std::fmt::Display for RecordField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordField::Id => write!(f, "id"),
            RecordField::Name => write!(f, "name"),
            RecordField::Price => write!(f, "price"),
            RecordField::Url => write!(f, "url"),
        }
    }
}
