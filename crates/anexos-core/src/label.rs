//! Anexo labels and the label → URL map built from the page.

use std::collections::BTreeMap;
use std::fmt;

/// One of the two regulatory documents the tool retrieves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnexoLabel {
    AnexoI,
    AnexoII,
}

impl AnexoLabel {
    /// Labels a run must find and download, in archive order.
    pub const REQUIRED: [AnexoLabel; 2] = [AnexoLabel::AnexoI, AnexoLabel::AnexoII];

    pub fn as_str(self) -> &'static str {
        match self {
            AnexoLabel::AnexoI => "Anexo I",
            AnexoLabel::AnexoII => "Anexo II",
        }
    }

    /// Scratch/archive file name for this label (e.g. `Anexo I.pdf`).
    pub fn file_name(self) -> String {
        format!("{}.pdf", self.as_str())
    }

    /// True if `text` mentions this label.
    ///
    /// An occurrence counts only when it is not directly followed by a letter
    /// or digit, so "Anexo II" never satisfies "Anexo I" and "Anexo III"
    /// satisfies neither. Text mentioning both labels matches both.
    pub fn matches(self, text: &str) -> bool {
        let needle = self.as_str();
        text.match_indices(needle).any(|(start, _)| {
            text[start + needle.len()..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric())
        })
    }
}

impl fmt::Display for AnexoLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins labels for messages: `Anexo I, Anexo II`.
pub fn join_labels(labels: &[AnexoLabel]) -> String {
    labels
        .iter()
        .map(|l| l.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Label → remote URL (raw `href`) discovered on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMap {
    links: BTreeMap<AnexoLabel, String>,
}

impl LinkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` under `label`, returning the URL it replaced (last match wins).
    pub fn insert(&mut self, label: AnexoLabel, url: impl Into<String>) -> Option<String> {
        self.links.insert(label, url.into())
    }

    pub fn get(&self, label: AnexoLabel) -> Option<&str> {
        self.links.get(&label).map(String::as_str)
    }

    pub fn contains(&self, label: AnexoLabel) -> bool {
        self.links.contains_key(&label)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnexoLabel, &str)> {
        self.links.iter().map(|(l, u)| (*l, u.as_str()))
    }

    /// Labels from `required` that have no URL, in the order given.
    pub fn missing(&self, required: &[AnexoLabel]) -> Vec<AnexoLabel> {
        required
            .iter()
            .copied()
            .filter(|l| !self.contains(*l))
            .collect()
    }
}
