use crate::models::Item;

/// Compute the visible subset of `items` for a search term and a category
/// selector. Order-preserving; `""` and `"all"` are the match-everything
/// defaults.
///
/// Search matches as a case-insensitive substring of the description or of
/// any tag. Category matches only on exact membership in the item's category
/// set. The two predicates are ANDed.
pub fn filter_items(items: &[Item], search_term: &str, category: &str) -> Vec<Item> {
    let needle = search_term.to_lowercase();
    items
        .iter()
        .filter(|item| {
            let core = item.core();
            let matches_search = needle.is_empty()
                || core.description.to_lowercase().contains(&needle)
                || core
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&needle));
            let matches_category =
                category == "all" || core.categories.iter().any(|c| c == category);
            matches_search && matches_category
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FoundItem, ItemCore};
    use chrono::Utc;
    use uuid::Uuid;

    fn found(description: &str, tags: &[&str], categories: &[&str]) -> Item {
        Item::Found(FoundItem {
            core: ItemCore {
                id: Uuid::new_v4(),
                description: description.into(),
                contact_info: "helpdesk@campus.edu".into(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                categories: categories.iter().map(|c| c.to_string()).collect(),
                created_at: Utc::now(),
                reported: false,
                report_reason: None,
                resolved: false,
            },
            location_found: "Library".into(),
            image_url: None,
            image_file_name: None,
        })
    }

    #[test]
    fn empty_term_and_all_category_is_identity() {
        let items = vec![found("Blue backpack", &[], &[]), found("Red backpack", &[], &[])];
        assert_eq!(filter_items(&items, "", "all"), items);
    }

    #[test]
    fn search_is_case_insensitive_substring_on_description() {
        let items = vec![found("Blue backpack", &[], &[]), found("Red backpack", &[], &[])];

        let both = filter_items(&items, "backpack", "all");
        assert_eq!(both, items);

        let blue = filter_items(&items, "blue", "all");
        assert_eq!(blue.len(), 1);
        assert_eq!(blue[0], items[0]);
    }

    #[test]
    fn search_matches_tags_too() {
        let items = vec![
            found("Something small", &["Electronics", "charger"], &[]),
            found("Something else", &[], &[]),
        ];
        let hits = filter_items(&items, "charge", "all");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], items[0]);
    }

    #[test]
    fn category_requires_exact_membership() {
        let items = vec![
            found("Calculator", &[], &["Electronics"]),
            found("Novel", &[], &["Books"]),
            found("Uncategorized", &[], &[]),
        ];

        let electronics = filter_items(&items, "", "Electronics");
        assert_eq!(electronics.len(), 1);
        assert_eq!(electronics[0], items[0]);

        // A substring of a category name is not a match
        assert!(filter_items(&items, "", "Electro").is_empty());
    }

    #[test]
    fn predicates_are_anded() {
        let items = vec![
            found("Blue umbrella", &[], &["Accessories"]),
            found("Blue laptop", &[], &["Electronics"]),
        ];
        let hits = filter_items(&items, "blue", "Electronics");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0], items[1]);
    }

    #[test]
    fn preserves_original_order() {
        let items = vec![
            found("backpack one", &[], &[]),
            found("unrelated", &[], &[]),
            found("backpack two", &[], &[]),
        ];
        let hits = filter_items(&items, "backpack", "all");
        assert_eq!(hits, vec![items[0].clone(), items[2].clone()]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let items = vec![
            found("Blue backpack", &["bag"], &["Accessories"]),
            found("Red scarf", &[], &["Clothing"]),
            found("Graphing calculator", &["math"], &["Electronics"]),
        ];
        let once = filter_items(&items, "a", "all");
        let twice = filter_items(&once, "a", "all");
        assert_eq!(once, twice);
    }
}
