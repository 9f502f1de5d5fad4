//! Page and event primitives the capture engine consumes.
//!
//! The host owns the live document. It hands the engine typed events and a
//! [`Page`] through which the current URL and document can be read.

use std::sync::Mutex;

use listing_core::error::DomainError;
use scraper::Html;
use serde::{Deserialize, Serialize};

/// Tags whose elements accept user input.
pub const FORM_TAGS: [&str; 3] = ["input", "textarea", "select"];

/// Returns whether `tag` names an input-capable element.
#[must_use]
pub fn is_form_tag(tag: &str) -> bool {
    FORM_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

/// Read access to the page the engine is embedded in.
pub trait Page: Send + Sync {
    /// The page's current URL.
    fn url(&self) -> String;

    /// Parses the page's current document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Extraction` if the document cannot be read.
    fn document(&self) -> Result<Html, DomainError>;
}

/// What changed in a mutation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    /// Children were added or removed.
    ChildList,
    /// An attribute changed.
    Attributes,
    /// A text node's data changed.
    CharacterData,
}

/// One entry of the document mutation feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Kind of change.
    pub kind: MutationKind,
    /// Tag name of the target; `None` for text nodes.
    pub target_tag: Option<String>,
    /// Serialized subtree of the target after the change.
    pub target_html: String,
}

impl MutationRecord {
    /// A child-list change on an element.
    #[must_use]
    pub fn child_list(tag: &str, html: &str) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target_tag: Some(tag.to_owned()),
            target_html: html.to_owned(),
        }
    }

    /// An attribute change on an element.
    #[must_use]
    pub fn attributes(tag: &str, html: &str) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target_tag: Some(tag.to_owned()),
            target_html: html.to_owned(),
        }
    }

    /// A text change on a text node.
    #[must_use]
    pub fn character_data(text: &str) -> Self {
        Self {
            kind: MutationKind::CharacterData,
            target_tag: None,
            target_html: text.to_owned(),
        }
    }
}

/// Which user-input event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// `input` event.
    Input,
    /// `change` event.
    Change,
}

/// A user-input event bubbled to the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Which event fired.
    pub kind: InputKind,
    /// Tag name of the event target.
    pub target_tag: String,
}

/// An event delivered to the capture engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// A batch of document mutations.
    Mutations {
        /// Records in the batch.
        records: Vec<MutationRecord>,
    },
    /// A direct `input` or `change` event.
    Input(InputEvent),
}

impl PageEvent {
    /// An `input` event on an element with `tag`.
    #[must_use]
    pub fn input(tag: &str) -> Self {
        Self::Input(InputEvent {
            kind: InputKind::Input,
            target_tag: tag.to_owned(),
        })
    }

    /// A `change` event on an element with `tag`.
    #[must_use]
    pub fn change(tag: &str) -> Self {
        Self::Input(InputEvent {
            kind: InputKind::Change,
            target_tag: tag.to_owned(),
        })
    }

    /// A mutation batch.
    #[must_use]
    pub fn mutations(records: Vec<MutationRecord>) -> Self {
        Self::Mutations { records }
    }
}

/// A page backed by an HTML string the host replaces as the page changes.
#[derive(Debug)]
pub struct StaticPage {
    url: Mutex<String>,
    html: Mutex<String>,
}

impl StaticPage {
    /// Creates a page at `url` with document `html`.
    #[must_use]
    pub fn new(url: &str, html: &str) -> Self {
        Self {
            url: Mutex::new(url.to_owned()),
            html: Mutex::new(html.to_owned()),
        }
    }

    /// Replaces the page URL.
    pub fn navigate(&self, url: &str) {
        if let Ok(mut current) = self.url.lock() {
            url.clone_into(&mut *current);
        }
    }

    /// Replaces the document.
    pub fn set_html(&self, html: &str) {
        if let Ok(mut current) = self.html.lock() {
            html.clone_into(&mut *current);
        }
    }
}

impl Page for StaticPage {
    fn url(&self) -> String {
        self.url.lock().map(|u| u.clone()).unwrap_or_default()
    }

    fn document(&self) -> Result<Html, DomainError> {
        let html = self
            .html
            .lock()
            .map_err(|_| DomainError::Extraction("page document lock poisoned".into()))?;
        Ok(Html::parse_document(&html))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_tags_match_case_insensitively() {
        assert!(is_form_tag("INPUT"));
        assert!(is_form_tag("textarea"));
        assert!(is_form_tag("Select"));
        assert!(!is_form_tag("div"));
        assert!(!is_form_tag("img"));
    }

    #[test]
    fn test_page_event_parses_from_host_json() {
        let raw = serde_json::json!({
            "type": "mutations",
            "records": [
                { "kind": "childList", "target_tag": "div", "target_html": "<div></div>" },
                { "kind": "characterData", "target_tag": null, "target_html": "hello" }
            ]
        });

        let event: PageEvent = serde_json::from_value(raw).unwrap();

        assert_eq!(
            event,
            PageEvent::mutations(vec![
                MutationRecord::child_list("div", "<div></div>"),
                MutationRecord::character_data("hello"),
            ])
        );
    }

    #[test]
    fn test_static_page_reflects_navigation_and_document_changes() {
        let page = StaticPage::new("https://www.depop.com/products/create/", "<p>a</p>");

        page.navigate("https://www.depop.com/");
        page.set_html("<p>b</p>");

        assert_eq!(page.url(), "https://www.depop.com/");
        let doc = page.document().unwrap();
        assert!(doc.root_element().html().contains("<p>b</p>"));
    }
}
