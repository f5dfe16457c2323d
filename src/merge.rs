use crate::model::{LabeledIndex, MergedIndex};

/// Combines per-document indices in input order.
///
/// A single document keeps its bare page numbers. With several documents,
/// each page number becomes `<label>-<page>`.
pub fn merge_indices(indices: Vec<LabeledIndex>) -> MergedIndex {
    let mut merged = MergedIndex::new();
    let prefix_labels = indices.len() > 1;

    for LabeledIndex { label, index } in indices {
        for (word, pages) in index.iter() {
            if prefix_labels {
                merged.extend_word(word, pages.iter().map(|page| format!("{label}-{page}")));
            } else {
                merged.extend_word(word, pages.iter().map(u32::to_string));
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::merge_indices;
    use crate::model::{LabeledIndex, PageIndex};

    fn labeled(label: &str, entries: &[(&str, u32)]) -> LabeledIndex {
        let mut index = PageIndex::new();
        for (word, page) in entries {
            index.record(word, *page);
        }
        LabeledIndex {
            label: label.to_string(),
            index,
        }
    }

    fn refs(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn single_document_keeps_bare_page_numbers() {
        let merged = merge_indices(vec![labeled("ch1", &[("Foo", 2), ("Foo", 2), ("Foo", 7)])]);

        assert_eq!(merged.references("Foo"), Some(&refs(&["2", "7"])[..]));
    }

    #[test]
    fn multiple_documents_prefix_labels_in_input_order() {
        let merged = merge_indices(vec![
            labeled("1", &[("Bar", 3), ("Solo", 4)]),
            labeled("2", &[("Bar", 5), ("Bar", 6)]),
        ]);

        assert_eq!(merged.references("Bar"), Some(&refs(&["1-3", "2-5", "2-6"])[..]));
        assert_eq!(merged.references("Solo"), Some(&refs(&["1-4"])[..]));
    }

    #[test]
    fn empty_input_yields_empty_index() {
        assert_eq!(merge_indices(Vec::new()).len(), 0);
    }
}
