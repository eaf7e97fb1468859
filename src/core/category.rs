//! Food categories - the fixed set every tracked item belongs to.

use crate::errors::{Error, Result};
use std::{fmt, str::FromStr};

/// One of the fixed food categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Fresh vegetables
    Vegetables,
    /// Fresh fruit
    Fruits,
    /// Milk, cheese, yogurt and the like
    Dairy,
    /// Raw or cooked meat
    Meat,
    /// Fish and shellfish
    Seafood,
    /// Bread, rice, pasta
    Grains,
    /// Shelf-stable goods
    Pantry,
    /// Drinks
    Beverages,
    /// Anything kept in the freezer
    Frozen,
    /// Catch-all
    Other,
}

impl Category {
    /// Every category, in the order they are offered to users.
    pub const ALL: [Self; 10] = [
        Self::Vegetables,
        Self::Fruits,
        Self::Dairy,
        Self::Meat,
        Self::Seafood,
        Self::Grains,
        Self::Pantry,
        Self::Beverages,
        Self::Frozen,
        Self::Other,
    ];

    /// Display name, which is also the stored form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetables => "Vegetables",
            Self::Fruits => "Fruits",
            Self::Dairy => "Dairy",
            Self::Meat => "Meat",
            Self::Seafood => "Seafood",
            Self::Grains => "Grains",
            Self::Pantry => "Pantry",
            Self::Beverages => "Beverages",
            Self::Frozen => "Frozen",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    // Case-insensitive so "dairy" typed by hand still resolves.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::InvalidFoodItem {
                message: format!("Unknown category '{wanted}'"),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_category_case_insensitive() {
        assert_eq!("dairy".parse::<Category>().unwrap(), Category::Dairy);
        assert_eq!(" Seafood ".parse::<Category>().unwrap(), Category::Seafood);
        assert_eq!("FROZEN".parse::<Category>().unwrap(), Category::Frozen);
    }

    #[test]
    fn test_parse_unknown_category() {
        let err = "Snacks".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::InvalidFoodItem { .. }));
    }

    #[test]
    fn test_display_matches_stored_form() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
    }
}
