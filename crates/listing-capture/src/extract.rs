//! Field extraction from a parsed listing form.
//!
//! Every read here is total: a missing element or a malformed value yields
//! the field's default rather than an error.

use listing_core::config::CaptureConfig;
use listing_core::error::DomainError;
use listing_core::listing::ListingSnapshot;
use scraper::{ElementRef, Html, Selector};

use crate::page::is_form_tag;
use crate::selectors::{FieldSelectors, WidgetSelectors};

/// A pure strategy for reading a custom select's chosen value.
type SelectStrategy = fn(ElementRef<'_>, &WidgetSelectors) -> Option<String>;

/// Fallback chain for custom select widgets, tried in order.
///
/// Different rendering states of the same widget expose the chosen value
/// through different DOM shapes; the first non-empty read wins.
const SELECT_STRATEGIES: [(&str, SelectStrategy); 4] = [
    ("single_value_text", single_value_text),
    ("native_value", native_value),
    ("aria_selected_text", aria_selected_text),
    ("data_value", data_value),
];

/// Reads listing fields out of a document.
#[derive(Debug, Clone)]
pub struct Extractor {
    fields: FieldSelectors,
    widgets: WidgetSelectors,
    blob_scheme: String,
}

impl Extractor {
    /// Builds an extractor from capture configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Configuration` if a selector does not parse.
    pub fn new(config: &CaptureConfig) -> Result<Self, DomainError> {
        Ok(Self {
            fields: FieldSelectors::compile(&config.selectors)?,
            widgets: WidgetSelectors::compile()?,
            blob_scheme: config.blob_scheme.clone(),
        })
    }

    /// Reads every field except images into a snapshot.
    #[must_use]
    pub fn fields(&self, doc: &Html) -> ListingSnapshot {
        ListingSnapshot {
            title: Some(self.control_value(doc, &self.fields.title)),
            description: self.control_value(doc, &self.fields.description),
            price: parse_price(&self.control_value(doc, &self.fields.price)),
            images: Vec::new(),
            condition: self.select_value(doc, &self.fields.condition),
            size: self.select_value(doc, &self.fields.size),
            category: self.select_value(doc, &self.fields.category),
        }
    }

    /// Collects uploaded image sources in document order.
    ///
    /// Duplicates are kept. Sources that are missing or not on the blob
    /// scheme are dropped.
    #[must_use]
    pub fn images(&self, doc: &Html) -> Vec<String> {
        doc.select(&self.fields.images)
            .filter_map(|img| img.value().attr("src"))
            .filter(|src| !src.is_empty() && src.starts_with(&self.blob_scheme))
            .map(str::to_owned)
            .collect()
    }

    /// Whether an HTML fragment contains an uploaded product image.
    #[must_use]
    pub fn contains_product_image(&self, fragment: &str) -> bool {
        if fragment.is_empty() {
            return false;
        }
        let doc = Html::parse_fragment(fragment);
        doc.select(&self.fields.images).next().is_some()
    }

    /// Reads a custom select through the fallback chain.
    #[must_use]
    pub fn select_value(&self, doc: &Html, selector: &Selector) -> String {
        let Some(root) = doc.select(selector).next() else {
            return String::new();
        };
        SELECT_STRATEGIES
            .iter()
            .find_map(|(_, strategy)| strategy(root, &self.widgets))
            .unwrap_or_default()
    }

    fn control_value(&self, doc: &Html, selector: &Selector) -> String {
        doc.select(selector)
            .next()
            .and_then(|el| form_control_value(el, &self.widgets))
            .unwrap_or_default()
    }
}

/// Current value of a form control as serialized in the document.
///
/// `input` reads its `value` attribute, `textarea` its text, and `select`
/// its selected option (or the first option when none is marked).
fn form_control_value(el: ElementRef<'_>, widgets: &WidgetSelectors) -> Option<String> {
    match el.value().name() {
        "input" => el.value().attr("value").map(str::to_owned),
        "textarea" => Some(el.text().collect()),
        "select" => {
            let option = el
                .select(&widgets.selected_option)
                .next()
                .or_else(|| el.select(&widgets.option).next())?;
            Some(
                option
                    .value()
                    .attr("value")
                    .map_or_else(|| option.text().collect(), str::to_owned),
            )
        }
        _ => None,
    }
}

/// `value` as read, unless it is blank.
fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_owned())
}

fn single_value_text(root: ElementRef<'_>, widgets: &WidgetSelectors) -> Option<String> {
    let el = root.select(&widgets.single_value).next()?;
    non_empty(&el.text().collect::<String>())
}

fn native_value(root: ElementRef<'_>, widgets: &WidgetSelectors) -> Option<String> {
    if !is_form_tag(root.value().name()) {
        return None;
    }
    non_empty(&form_control_value(root, widgets)?)
}

fn aria_selected_text(root: ElementRef<'_>, widgets: &WidgetSelectors) -> Option<String> {
    let el = root.select(&widgets.aria_selected).next()?;
    non_empty(&el.text().collect::<String>())
}

fn data_value(root: ElementRef<'_>, _widgets: &WidgetSelectors) -> Option<String> {
    non_empty(root.value().attr("data-value")?)
}

/// Parses the longest leading decimal number in `raw`.
///
/// Leading whitespace is skipped and trailing garbage ignored, so
/// `"19.99abc"` reads as `19.99`. Anything without a leading number reads
/// as `0`.
#[must_use]
pub fn parse_price(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        has_digits |= frac_end > end + 1;
        end = frac_end;
    }
    if !has_digits {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> Extractor {
        Extractor::new(&CaptureConfig::default()).unwrap()
    }

    const FORM: &str = r#"
        <html><body>
          <input name="title" value="Levi's 501">
          <textarea data-testid="description__input">Faded, straight leg</textarea>
          <input data-testid="price__input" value="24.50">
          <div data-testid="listingSelect__listing__condition">
            <div class="select__single-value">Used - Excellent</div>
          </div>
          <div data-testid="createProductSizes__sizeRow0__size">
            <ul><li aria-selected="false">S</li><li aria-selected="true"> W32 </li></ul>
          </div>
          <div data-testid="listingCategories__category" data-value="Jeans"></div>
          <img alt="Uploaded Product" src="blob:https://www.depop.com/a1">
        </body></html>
    "#;

    #[test]
    fn test_fields_reads_every_widget_shape() {
        // Arrange
        let doc = Html::parse_document(FORM);

        // Act
        let snapshot = extractor().fields(&doc);

        // Assert
        assert_eq!(snapshot.title.as_deref(), Some("Levi's 501"));
        assert_eq!(snapshot.description, "Faded, straight leg");
        assert!((snapshot.price - 24.5).abs() < f64::EPSILON);
        assert_eq!(snapshot.condition, "Used - Excellent");
        assert_eq!(snapshot.size, " W32 ");
        assert_eq!(snapshot.category, "Jeans");
        assert!(snapshot.images.is_empty());
    }

    #[test]
    fn test_fields_default_when_form_is_empty() {
        let doc = Html::parse_document("<html><body></body></html>");

        let snapshot = extractor().fields(&doc);

        assert_eq!(snapshot.title.as_deref(), Some(""));
        assert_eq!(snapshot.description, "");
        assert!(snapshot.price.abs() < f64::EPSILON);
        assert_eq!(snapshot.condition, "");
        assert_eq!(snapshot.size, "");
        assert_eq!(snapshot.category, "");
    }

    #[test]
    fn test_select_value_falls_back_to_data_value() {
        // Arrange: no single-value text, not a native control, no aria option.
        let doc = Html::parse_document(
            r#"<div data-testid="listingSelect__listing__condition" data-value="New with tags">
                 <span class="select__placeholder">Select...</span>
               </div>"#,
        );
        let ex = extractor();

        // Act
        let condition = ex.select_value(&doc, &ex.fields.condition);

        // Assert
        assert_eq!(condition, "New with tags");
    }

    #[test]
    fn test_select_value_skips_blank_single_value() {
        let doc = Html::parse_document(
            r#"<div data-testid="listingCategories__category" data-value="Tops">
                 <div class="select__single-value">   </div>
               </div>"#,
        );
        let ex = extractor();

        assert_eq!(ex.select_value(&doc, &ex.fields.category), "Tops");
    }

    #[test]
    fn test_select_value_keeps_surrounding_whitespace() {
        let doc = Html::parse_document(
            r#"<div data-testid="listingSelect__listing__condition" data-value="stale">
                 <div class="select__single-value"> Used - Fair </div>
               </div>"#,
        );
        let ex = extractor();

        assert_eq!(ex.select_value(&doc, &ex.fields.condition), " Used - Fair ");
    }

    #[test]
    fn test_select_value_reads_native_select() {
        let doc = Html::parse_document(
            r#"<select data-testid="createProductSizes__sizeRow0__size">
                 <option value="">Choose</option>
                 <option value="L" selected>Large</option>
               </select>"#,
        );
        let ex = extractor();

        assert_eq!(ex.select_value(&doc, &ex.fields.size), "L");
    }

    #[test]
    fn test_select_value_prefers_single_value_over_data_value() {
        let doc = Html::parse_document(
            r#"<div data-testid="listingCategories__category" data-value="stale">
                 <div class="select__single-value">Dresses</div>
               </div>"#,
        );
        let ex = extractor();

        assert_eq!(ex.select_value(&doc, &ex.fields.category), "Dresses");
    }

    #[test]
    fn test_images_keeps_blob_sources_in_document_order() {
        // Arrange: three uploaded images and one remote image.
        let doc = Html::parse_document(
            r#"<div>
                 <img alt="Uploaded Product" src="blob:https://www.depop.com/1">
                 <img alt="Uploaded Product" src="https://cdn.depop.com/x.jpg">
                 <img alt="Uploaded Product" src="blob:https://www.depop.com/2">
                 <img alt="Uploaded Product" src="blob:https://www.depop.com/3">
               </div>"#,
        );

        // Act
        let images = extractor().images(&doc);

        // Assert
        assert_eq!(
            images,
            vec![
                "blob:https://www.depop.com/1",
                "blob:https://www.depop.com/2",
                "blob:https://www.depop.com/3",
            ]
        );
    }

    #[test]
    fn test_images_keeps_duplicates_and_ignores_other_alt_text() {
        let doc = Html::parse_document(
            r#"<img alt="Uploaded Product" src="blob:https://www.depop.com/1">
               <img alt="Uploaded Product" src="blob:https://www.depop.com/1">
               <img alt="Avatar" src="blob:https://www.depop.com/me">
               <img alt="Uploaded Product">"#,
        );

        let images = extractor().images(&doc);

        assert_eq!(
            images,
            vec!["blob:https://www.depop.com/1", "blob:https://www.depop.com/1"]
        );
    }

    #[test]
    fn test_contains_product_image_inspects_subtree() {
        let ex = extractor();

        assert!(ex.contains_product_image(
            r#"<div class="grid"><img alt="Uploaded Product" src="blob:https://www.depop.com/9"></div>"#
        ));
        assert!(!ex.contains_product_image(r#"<div><img alt="Uploaded Product" src="/x.png"></div>"#));
        assert!(!ex.contains_product_image(""));
    }

    #[test]
    fn test_parse_price_reads_leading_number() {
        assert!((parse_price("19.99abc") - 19.99).abs() < f64::EPSILON);
        assert!((parse_price("  7") - 7.0).abs() < f64::EPSILON);
        assert!((parse_price(".5") - 0.5).abs() < f64::EPSILON);
        assert!((parse_price("-3.25") + 3.25).abs() < f64::EPSILON);
        assert!((parse_price("1e2xyz") - 100.0).abs() < f64::EPSILON);
        assert!((parse_price("4e") - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_price_defaults_to_zero() {
        assert!(parse_price("").abs() < f64::EPSILON);
        assert!(parse_price("abc").abs() < f64::EPSILON);
        assert!(parse_price(".").abs() < f64::EPSILON);
        assert!(parse_price("£12").abs() < f64::EPSILON);
        assert!(parse_price("1e999").abs() < f64::EPSILON);
    }
}
