use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::model::PageIndex;

/// Splits page text into index-worthy words.
///
/// Text is split on runs of anything other than ASCII letters, digits and
/// underscore, so non-ASCII characters act as delimiters. Tokens that start
/// with a digit (running page numbers and the like) or with a lowercase ASCII
/// letter (common words) are dropped.
pub struct Tokenizer {
    delimiter: Regex,
    excluded: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let delimiter =
            Regex::new(r"[^0-9A-Za-z_]+").context("failed to compile delimiter regex")?;
        let excluded =
            Regex::new(r"^[0-9]+|^[a-z]").context("failed to compile exclusion regex")?;
        Ok(Self {
            delimiter,
            excluded,
        })
    }

    pub fn words<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.delimiter
            .split(text)
            .filter(move |token| !token.is_empty() && !self.excluded.is_match(token))
    }
}

/// Builds the index for pages `[offset, offset + pages)`.
///
/// The page number recorded for loop page `x` is `x + offset`, so the offset is
/// applied both when choosing which page to read and when numbering it.
pub fn index_pages<F>(
    tokenizer: &Tokenizer,
    offset: u32,
    pages: u32,
    mut read_page: F,
) -> Result<PageIndex>
where
    F: FnMut(u32) -> String,
{
    info!(pages, offset, "generating index");

    let mut index = PageIndex::new();
    for page in offset..offset.saturating_add(pages) {
        let text = read_page(page);
        let displayed = page.saturating_add(offset);
        for word in tokenizer.words(&text) {
            index.record(word, displayed);
        }
    }

    Ok(index)
}
