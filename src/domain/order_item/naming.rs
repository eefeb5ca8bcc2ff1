use super::value_objects::GoodAttribute;

// ============================================================================
// Good Naming - display names for order lines
// ============================================================================

/// Title of a good in one locale: the base name followed by its attribute values.
///
/// An empty base name yields an empty title so callers can fall back to
/// another locale.
pub fn good_name(base: &str, attributes: &[GoodAttribute]) -> String {
    let base = base.trim();
    if base.is_empty() {
        return String::new();
    }

    let values: Vec<&str> = attributes
        .iter()
        .map(|attribute| attribute.value.trim())
        .filter(|value| !value.is_empty())
        .collect();

    if values.is_empty() {
        base.to_string()
    } else {
        format!("{} ({})", base, values.join(", "))
    }
}

/// `"<manufacturer> <catalog number>"`, plus `" - <title>"` when there is a title.
pub fn compose_item_name(manufacturer: &str, catalog_num: &str, title: &str) -> String {
    let mut name = format!("{} {}", manufacturer, catalog_num);
    if !title.is_empty() {
        name.push_str(" - ");
        name.push_str(title);
    }
    name
}
