//! Compiled CSS selectors.

use listing_core::config::SelectorMap;
use listing_core::error::DomainError;
use scraper::Selector;

/// Visible selected-option text inside a custom select widget.
pub const SINGLE_VALUE_SELECTOR: &str = ".select__single-value";

/// Option marked as selected through ARIA.
pub const ARIA_SELECTED_SELECTOR: &str = r#"[aria-selected="true"]"#;

/// Field selectors from a [`SelectorMap`], parsed once.
#[derive(Debug, Clone)]
pub struct FieldSelectors {
    /// Title input.
    pub title: Selector,
    /// Description textarea.
    pub description: Selector,
    /// Price input.
    pub price: Selector,
    /// Size widget root.
    pub size: Selector,
    /// Uploaded image marker.
    pub images: Selector,
    /// Condition widget root.
    pub condition: Selector,
    /// Category widget root.
    pub category: Selector,
}

impl FieldSelectors {
    /// Parses every selector in `map`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` naming the first selector that
    /// fails to parse.
    pub fn compile(map: &SelectorMap) -> Result<Self, DomainError> {
        Ok(Self {
            title: parse("title", &map.title)?,
            description: parse("description", &map.description)?,
            price: parse("price", &map.price)?,
            size: parse("size", &map.size)?,
            images: parse("images", &map.images)?,
            condition: parse("condition", &map.condition)?,
            category: parse("category", &map.category)?,
        })
    }
}

/// Selectors used inside select widgets, independent of configuration.
#[derive(Debug, Clone)]
pub struct WidgetSelectors {
    /// `.select__single-value`.
    pub single_value: Selector,
    /// `[aria-selected="true"]`.
    pub aria_selected: Selector,
    /// Any `<option>`.
    pub option: Selector,
    /// `<option selected>`.
    pub selected_option: Selector,
}

impl WidgetSelectors {
    /// Parses the fixed widget selectors.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if a built-in selector is invalid.
    pub fn compile() -> Result<Self, DomainError> {
        Ok(Self {
            single_value: parse("single_value", SINGLE_VALUE_SELECTOR)?,
            aria_selected: parse("aria_selected", ARIA_SELECTED_SELECTOR)?,
            option: parse("option", "option")?,
            selected_option: parse("selected_option", "option[selected]")?,
        })
    }
}

fn parse(field: &str, css: &str) -> Result<Selector, DomainError> {
    Selector::parse(css)
        .map_err(|e| DomainError::Configuration(format!("invalid {field} selector `{css}`: {e}")))
}
