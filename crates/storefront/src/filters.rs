//! Askama filters for the site templates.
//!
//! Templates pick these up through `use crate::filters;` in the module that
//! declares the template struct.

use std::fmt::Display;

/// Year for the footer copyright line.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Item count with its noun, e.g. `1 item` or `3 items`.
///
/// Usage in templates: `{{ panel.summary.item_count|items_label }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn items_label(count: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(count_label(&count.to_string()))
}

fn count_label(count: &str) -> String {
    let noun = if count == "1" { "item" } else { "items" };
    format!("{count} {noun}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_label() {
        assert_eq!(count_label("0"), "0 items");
        assert_eq!(count_label("1"), "1 item");
        assert_eq!(count_label("11"), "11 items");
    }
}
