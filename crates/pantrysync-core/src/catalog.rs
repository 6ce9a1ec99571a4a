//! Canonical product-catalog types shared by the receipt normalizer and the
//! catalog store client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Fixed catalog taxonomy. Serialized as the snake_case id the catalog
/// store expects, e.g. `"fresh_produce"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FreshProduce,
    DairyEggs,
    Proteins,
    Seafood,
    Bakery,
    #[default]
    Pantry,
    SpicesCondiments,
    Frozen,
    ReadyMeals,
    Beverages,
    Snacks,
    Baby,
    PersonalCare,
    Household,
}

impl Category {
    /// Every category, in the order the catalog UI lists them.
    pub const ALL: [Category; 14] = [
        Category::FreshProduce,
        Category::DairyEggs,
        Category::Proteins,
        Category::Seafood,
        Category::Bakery,
        Category::Pantry,
        Category::SpicesCondiments,
        Category::Frozen,
        Category::ReadyMeals,
        Category::Beverages,
        Category::Snacks,
        Category::Baby,
        Category::PersonalCare,
        Category::Household,
    ];

    /// Stable identifier used on the wire.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Category::FreshProduce => "fresh_produce",
            Category::DairyEggs => "dairy_eggs",
            Category::Proteins => "proteins",
            Category::Seafood => "seafood",
            Category::Bakery => "bakery",
            Category::Pantry => "pantry",
            Category::SpicesCondiments => "spices_condiments",
            Category::Frozen => "frozen",
            Category::ReadyMeals => "ready_meals",
            Category::Beverages => "beverages",
            Category::Snacks => "snacks",
            Category::Baby => "baby",
            Category::PersonalCare => "personal_care",
            Category::Household => "household",
        }
    }

    /// Human-readable label, e.g. `"Dairy & Eggs"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::FreshProduce => "Fresh Produce",
            Category::DairyEggs => "Dairy & Eggs",
            Category::Proteins => "Proteins",
            Category::Seafood => "Seafood",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry Staples",
            Category::SpicesCondiments => "Spices & Condiments",
            Category::Frozen => "Frozen",
            Category::ReadyMeals => "Ready Meals",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks & Treats",
            Category::Baby => "Baby",
            Category::PersonalCare => "Personal Care",
            Category::Household => "Household",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| CoreError::UnknownCategory(s.to_string()))
    }
}

/// A product entry derived from a single receipt line item, ready to be
/// upserted into the catalog store.
///
/// Every field is always serialized; absent values go out as `null` so the
/// store overwrites stale data on upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Identity key; repeated upserts with the same id overwrite.
    pub id: String,
    pub product_name: String,
    pub brand: String,
    pub category: Category,
    pub barcode: Option<String>,
    /// Not derivable from receipt data.
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Quantity plus unit label, e.g. `"1 kg"`, or the bare quantity.
    pub unit_size: String,
    pub nutrition: Option<serde_json::Value>,
    pub price: Option<f64>,
    pub is_available: bool,
    /// Retailer tag, e.g. `"lidl"`.
    pub source: String,
}
