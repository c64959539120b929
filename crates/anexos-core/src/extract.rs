//! Link discovery: finds the Anexo PDF anchors in the page markup.
//!
//! Candidates are `<a>` elements whose `href` ends in `.pdf` and that carry
//! the configured link class. Each candidate's trimmed text is checked against
//! both labels independently; a later anchor replaces an earlier one for the
//! same label.

use scraper::{Html, Selector};
use thiserror::Error;

use crate::label::{AnexoLabel, LinkMap};

/// Class the page puts on anchors that point at published documents.
pub const DEFAULT_LINK_CLASS: &str = "external-link";

#[derive(Debug, Error)]
pub enum ExtractError {
    /// No candidate anchor mentioned either label.
    #[error("No PDF links found for Anexo I or II")]
    NoLinks,
    #[error("invalid link class {class:?}: {message}")]
    Selector { class: String, message: String },
}

/// Compiled anchor selector for one link class.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    selector: Selector,
}

impl LinkExtractor {
    pub fn new(link_class: &str) -> Result<Self, ExtractError> {
        let class = link_class.trim();
        if !is_class_identifier(class) {
            return Err(ExtractError::Selector {
                class: link_class.to_string(),
                message: "expected letters, digits, '-' or '_', not starting with a digit"
                    .to_string(),
            });
        }
        let css = format!(r#"a.{}[href$=".pdf"]"#, class);
        // scraper's Display for selector errors can panic on some tokens.
        let selector = Selector::parse(&css).map_err(|e| ExtractError::Selector {
            class: link_class.to_string(),
            message: format!("{:?}", e),
        })?;
        Ok(Self { selector })
    }

    /// Builds the label → `href` map from `markup`.
    ///
    /// Fails with [`ExtractError::NoLinks`] when nothing matched; a map
    /// with only one label is returned as-is for the caller to judge.
    pub fn extract(&self, markup: &str) -> Result<LinkMap, ExtractError> {
        let document = Html::parse_document(markup);
        let mut links = LinkMap::new();

        for anchor in document.select(&self.selector) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            let text = anchor.text().collect::<String>();
            let text = text.trim();
            for label in AnexoLabel::REQUIRED {
                if label.matches(text) {
                    if let Some(previous) = links.insert(label, href) {
                        tracing::debug!(%label, previous = %previous, href, "later anchor replaces link");
                    } else {
                        tracing::debug!(%label, href, "found link");
                    }
                }
            }
        }

        if links.is_empty() {
            return Err(ExtractError::NoLinks);
        }
        Ok(links)
    }
}

/// Plain CSS class name: ASCII letters, digits, `-`, `_`; no leading digit
/// (nor `-` followed by a digit).
fn is_class_identifier(class: &str) -> bool {
    let valid_chars = class
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    let head = class.trim_start_matches('-');
    valid_chars
        && !head.is_empty()
        && !head.starts_with(|c: char| c.is_ascii_digit())
        && class.len() - head.len() <= 1
}

/// Extracts links using [`DEFAULT_LINK_CLASS`].
pub fn extract(markup: &str) -> Result<LinkMap, ExtractError> {
    LinkExtractor::new(DEFAULT_LINK_CLASS)?.extract(markup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> String {
        format!("<html><body>{}</body></html>", body)
    }

    #[test]
    fn both_labels_found() {
        let html = page(
            r#"
            <a class="external-link" href="https://www.gov.br/ans/anexo-i.pdf">Anexo I - Lista</a>
            <a class="external-link" href="https://www.gov.br/ans/anexo-ii.pdf">Anexo II - DUT</a>
            "#,
        );
        let links = extract(&html).unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get(AnexoLabel::AnexoI),
            Some("https://www.gov.br/ans/anexo-i.pdf")
        );
        assert_eq!(
            links.get(AnexoLabel::AnexoII),
            Some("https://www.gov.br/ans/anexo-ii.pdf")
        );
    }

    #[test]
    fn anexo_ii_anchor_only_sets_anexo_ii() {
        let html = page(
            r#"<a class="external-link" href="/docs/ii.pdf">  Anexo II — Rol de Procedimentos </a>"#,
        );
        let links = extract(&html).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links.get(AnexoLabel::AnexoII), Some("/docs/ii.pdf"));
        assert!(!links.contains(AnexoLabel::AnexoI));
    }

    #[test]
    fn one_anchor_mentioning_both_sets_both() {
        let html = page(r#"<a class="external-link" href="/both.pdf">Anexo I e Anexo II</a>"#);
        let links = extract(&html).unwrap();
        assert_eq!(links.get(AnexoLabel::AnexoI), Some("/both.pdf"));
        assert_eq!(links.get(AnexoLabel::AnexoII), Some("/both.pdf"));
    }

    #[test]
    fn later_anchor_wins() {
        let html = page(
            r#"
            <a class="external-link" href="/old.pdf">Anexo I (2023)</a>
            <a class="external-link" href="/new.pdf">Anexo I (2024)</a>
            "#,
        );
        let links = extract(&html).unwrap();
        assert_eq!(links.get(AnexoLabel::AnexoI), Some("/new.pdf"));
    }

    #[test]
    fn filters_class_and_extension() {
        let html = page(
            r#"
            <a href="/no-class.pdf">Anexo I</a>
            <a class="internal-link" href="/wrong-class.pdf">Anexo I</a>
            <a class="external-link" href="/not-pdf.html">Anexo I</a>
            <a class="external-link other" href="/ok.pdf"><span>Anexo</span> <span>I</span></a>
            "#,
        );
        let links = extract(&html).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links.get(AnexoLabel::AnexoI), Some("/ok.pdf"));
    }

    #[test]
    fn no_qualifying_anchors_is_error() {
        let html = page(
            r#"
            <a class="external-link" href="/outro.pdf">Resolução Normativa</a>
            <a href="/anexo-i.pdf">Anexo I</a>
            "#,
        );
        assert!(matches!(extract(&html), Err(ExtractError::NoLinks)));
        assert!(matches!(extract(""), Err(ExtractError::NoLinks)));
    }

    #[test]
    fn custom_link_class() {
        let html = page(r#"<a class="internal-link" href="/i.pdf">Anexo I</a>"#);
        let extractor = LinkExtractor::new("internal-link").unwrap();
        let links = extractor.extract(&html).unwrap();
        assert_eq!(links.get(AnexoLabel::AnexoI), Some("/i.pdf"));
    }

    #[test]
    fn invalid_link_class_is_rejected() {
        for class in ["bad class!", "a!", "1col", "", "-9x", "--x", "x]", "a.b"] {
            let err = LinkExtractor::new(class).unwrap_err();
            assert!(
                matches!(&err, ExtractError::Selector { class: c, .. } if c == class),
                "{:?}",
                err
            );
            assert!(err.to_string().starts_with("invalid link class"));
        }
    }

    #[test]
    fn class_identifier_rules() {
        assert!(is_class_identifier("external-link"));
        assert!(is_class_identifier("_x1"));
        assert!(is_class_identifier("-x"));
        assert!(!is_class_identifier("9x"));
        assert!(!is_class_identifier("-"));
        assert!(!is_class_identifier("a b"));
    }
}
