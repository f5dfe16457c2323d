use indexmap::IndexMap;
use serde::Serialize;

/// Word to page-number index for a single document.
///
/// Words keep the order in which they were first seen. Pages are recorded in
/// increasing order, and a page is only appended when it differs from the last
/// page recorded for the word, so every list is strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndex {
    words: IndexMap<String, Vec<u32>>,
}

impl PageIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, word: &str, page: u32) {
        if let Some(pages) = self.words.get_mut(word) {
            if pages.last() != Some(&page) {
                pages.push(page);
            }
            return;
        }
        self.words.insert(word.to_string(), vec![page]);
    }

    #[cfg(test)]
    pub fn pages(&self, word: &str) -> Option<&[u32]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u32])> {
        self.words
            .iter()
            .map(|(word, pages)| (word.as_str(), pages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// A document's index together with the label used to prefix its pages.
#[derive(Debug, Clone)]
pub struct LabeledIndex {
    pub label: String,
    pub index: PageIndex,
}

/// Word to reference-string index across all documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedIndex {
    words: IndexMap<String, Vec<String>>,
}

impl MergedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend_word<I>(&mut self, word: &str, references: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(existing) = self.words.get_mut(word) {
            existing.extend(references);
            return;
        }
        self.words
            .insert(word.to_string(), references.into_iter().collect());
    }

    #[cfg(test)]
    pub fn references(&self, word: &str) -> Option<&[String]> {
        self.words.get(word).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.words
            .iter()
            .map(|(word, references)| (word.as_str(), references.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

/// One line of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub word: String,
    pub references: Vec<String>,
}
