//! Keyword classifier from free-text receipt labels to the catalog taxonomy.
//!
//! Labels come in Dutch, French, German or English depending on the account
//! locale. Groups are checked in order and the first group with a keyword
//! contained in the lower-cased label wins, so the order of
//! [`KEYWORD_GROUPS`] is significant: `"kaas & vleeswaren"` is dairy, not
//! proteins.

use pantrysync_core::Category;

/// Ordered keyword groups. Matching is plain substring containment.
const KEYWORD_GROUPS: &[(Category, &[&str])] = &[
    (
        Category::FreshProduce,
        &["groente", "fruit", "vegetable", "legume"],
    ),
    (Category::Seafood, &["vis", "fish", "seafood", "poisson"]),
    (
        Category::DairyEggs,
        &["zuivel", "yoghurt", "melk", "dairy", "lait", "kaas", "cheese"],
    ),
    (
        Category::Proteins,
        &["vlees", "eiwit", "meat", "viande", "worst", "sausage"],
    ),
    (
        Category::SpicesCondiments,
        &["kruiden", "saus", "condiment", "spice", "épice"],
    ),
    (Category::Frozen, &["diepvries", "frozen", "congelé"]),
    (Category::ReadyMeals, &["maaltijd", "meal", "repas"]),
    (
        Category::Snacks,
        &["snack", "chips", "chocolade", "chocolate"],
    ),
    (
        Category::Bakery,
        &["bakkerij", "brood", "bakery", "boulangerie"],
    ),
    (
        Category::Beverages,
        &["drank", "beverage", "drink", "boisson"],
    ),
    (Category::Baby, &["baby"]),
    (Category::PersonalCare, &["verzorging", "care", "soin"]),
    (Category::Household, &["huishoud", "household", "ménage"]),
];

/// Maps an optional category or tax-group label to a [`Category`].
///
/// Absent labels and labels without a known keyword map to
/// [`Category::Pantry`].
#[must_use]
pub fn classify(label: Option<&str>) -> Category {
    let Some(label) = label else {
        return Category::Pantry;
    };
    let lower = label.to_lowercase();

    KEYWORD_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| lower.contains(kw)))
        .map_or(Category::Pantry, |(category, _)| *category)
}
