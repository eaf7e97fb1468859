//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module provides autocomplete functionality for command parameters like
//! food categories and tracked item names, suggesting valid options as the
//! user types.

use crate::{bot::BotData, core::category::Category, entities::FoodItemModel, errors::Error};
use poise::serenity_prelude as serenity;

/// Discord's limit on autocomplete choices.
const MAX_CHOICES: usize = 25;

/// Longest item name shown in a choice label; labels are capped at 100.
const LABEL_NAME_CHARS: usize = 70;

/// Case-insensitive substring filter shared by the handlers below.
#[must_use]
pub fn matching_choices<I>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    candidates
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .collect()
}

/// Provides autocomplete suggestions for food categories.
///
/// Categories are offered in their fixed display order.
pub async fn autocomplete_category(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_choices(
        Category::ALL.into_iter().map(|c| c.as_str().to_string()),
        partial,
    )
}

/// One (label, item id) choice per tracked item whose name matches `partial`.
///
/// Labels carry the expiry date so items sharing a name can be told apart.
#[must_use]
pub fn item_choices(items: &[FoodItemModel], partial: &str) -> Vec<(String, String)> {
    let partial_lower = partial.to_lowercase();
    items
        .iter()
        .filter(|item| item.name.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .map(|item| {
            let mut name: String = item.name.chars().take(LABEL_NAME_CHARS).collect();
            if name.len() < item.name.len() {
                name.push('…');
            }
            let label = format!("{name} (expires {})", item.expiry_date.format("%Y-%m-%d"));
            (label, item.id.clone())
        })
        .collect()
}

/// Provides autocomplete suggestions for tracked items.
///
/// Suggestions come from the tracker's in-memory copy, soonest expiry first.
/// The submitted value is the item id.
pub async fn autocomplete_item(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    item_choices(&ctx.data().tracker.items(), partial)
        .into_iter()
        .map(|(label, id)| serenity::AutocompleteChoice::new(label, id))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::item_expiring_in;
    use chrono::NaiveDate;

    #[test]
    fn test_matching_choices_filters_case_insensitively() {
        let names = vec!["Milk".to_string(), "Almond Milk".to_string(), "Bread".to_string()];
        assert_eq!(matching_choices(names, "milk"), vec!["Milk", "Almond Milk"]);
    }

    #[test]
    fn test_matching_choices_caps_at_discord_limit() {
        let names = (0..40).map(|i| format!("Item {i}"));
        assert_eq!(matching_choices(names, "item").len(), MAX_CHOICES);
    }

    #[test]
    fn test_item_choices_tell_duplicate_names_apart() {
        let mut older = item_expiring_in("id-1", "Milk", 1);
        older.expiry_date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut newer = item_expiring_in("id-2", "Milk", 5);
        newer.expiry_date = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
        let bread = item_expiring_in("id-3", "Bread", 2);

        let choices = item_choices(&[older, bread, newer], "mil");
        assert_eq!(
            choices,
            vec![
                ("Milk (expires 2025-06-01)".to_string(), "id-1".to_string()),
                ("Milk (expires 2025-06-05)".to_string(), "id-2".to_string()),
            ]
        );
    }

    #[test]
    fn test_item_choice_labels_fit_discord_limit() {
        let item = item_expiring_in("id", &"x".repeat(100), 1);
        let (label, _) = item_choices(&[item], "").remove(0);
        assert!(label.chars().count() <= 100);
        assert!(label.contains('…'));
    }

    #[test]
    fn test_empty_partial_lists_all_categories() {
        let all = matching_choices(
            Category::ALL.into_iter().map(|c| c.as_str().to_string()),
            "",
        );
        assert_eq!(all.len(), Category::ALL.len());
        assert_eq!(all[0], "Vegetables");
    }
}
