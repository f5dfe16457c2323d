use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, error, info};

use crate::config::IndexConfig;
use crate::error::IndexError;
use crate::extract::{PageExtractor, extract_document};
use crate::indexer::{Tokenizer, index_pages};
use crate::merge::merge_indices;
use crate::model::LabeledIndex;
use crate::report::{build_report, write_report};

pub fn run(
    config: &IndexConfig,
    extractor: &dyn PageExtractor,
    out: &mut dyn Write,
) -> Result<()> {
    let missing = extractor.missing_programs(config.needs_page_count());
    if !missing.is_empty() {
        for program in &missing {
            error!(program = %program, "the required program could not be found");
        }
        return Err(IndexError::MissingDependencies(missing).into());
    }

    let tokenizer = Tokenizer::new()?;

    let mut indices = Vec::with_capacity(config.files.len());
    for document in &config.files {
        indices.push(index_document(config, extractor, &tokenizer, document)?);
    }

    let merged = merge_indices(indices);
    let entries = build_report(&merged, config.limit, config.order);
    info!(
        words = merged.len(),
        reported = entries.len(),
        limit = config.limit,
        order = config.order.as_str(),
        format = config.format.as_str(),
        "index complete"
    );

    write_report(&entries, config.format, out)
}

fn index_document(
    config: &IndexConfig,
    extractor: &dyn PageExtractor,
    tokenizer: &Tokenizer,
    document: &Path,
) -> Result<LabeledIndex> {
    let pages = match config.pages {
        Some(pages) => pages,
        None => extractor.page_count(document)?,
    };

    // Artifact names are shared across documents, so each document is fully
    // extracted, indexed and cleared before the next one starts.
    let artifacts = extract_document(extractor, document, config.offset, pages, &config.work_dir)?;
    let index = index_pages(tokenizer, config.offset, pages, |page| artifacts.read_page(page))?;
    drop(artifacts);
    debug!(document = %document.display(), words = index.len(), "document indexed");

    Ok(LabeledIndex {
        label: document_label(document),
        index,
    })
}

/// File name without its extension. Non-UTF-8 bytes are replaced.
pub fn document_label(document: &Path) -> String {
    document
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::{Result, bail};

    use super::{document_label, run};
    use crate::cli::{OutputFormat, ReportOrder};
    use crate::config::{IndexConfig, default_limit};
    use crate::error::{EXIT_MISSING_DEPENDENCIES, IndexError, exit_code};
    use crate::extract::{PageArtifacts, PageExtractor};

    /// Serves canned page text keyed by document path and physical page.
    #[derive(Default)]
    struct FakeExtractor {
        pages: HashMap<(PathBuf, u32), String>,
        page_counts: HashMap<PathBuf, u32>,
        missing: Vec<String>,
        page_count_calls: RefCell<Vec<PathBuf>>,
    }

    impl FakeExtractor {
        fn document(mut self, path: &str, pages: &[&str]) -> Self {
            let path = PathBuf::from(path);
            for (index, text) in pages.iter().enumerate() {
                self.pages
                    .insert((path.clone(), index as u32 + 1), (*text).to_string());
            }
            self.page_counts.insert(path, pages.len() as u32);
            self
        }
    }

    impl PageExtractor for FakeExtractor {
        fn missing_programs(&self, _needs_page_count: bool) -> Vec<String> {
            self.missing.clone()
        }

        fn page_count(&self, document: &Path) -> Result<u32> {
            self.page_count_calls
                .borrow_mut()
                .push(document.to_path_buf());
            match self.page_counts.get(document) {
                Some(count) => Ok(*count),
                None => bail!("no page count for {}", document.display()),
            }
        }

        fn extract_page(&self, document: &Path, page: u32, output: &Path) -> Result<()> {
            if let Some(text) = self.pages.get(&(document.to_path_buf(), page)) {
                fs::write(output, text)?;
            }
            Ok(())
        }
    }

    fn config(files: &[&str], work_dir: &Path) -> IndexConfig {
        IndexConfig {
            files: files.iter().map(|file| PathBuf::from(*file)).collect(),
            offset: 1,
            pages: None,
            limit: default_limit(files.len()),
            order: ReportOrder::Alphabetical,
            format: OutputFormat::Text,
            work_dir: work_dir.to_path_buf(),
        }
    }

    fn run_to_string(config: &IndexConfig, extractor: &FakeExtractor) -> Result<String> {
        let mut out = Vec::new();
        run(config, extractor, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn single_document_reports_bare_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor = FakeExtractor::default().document(
            "books/ch1.pdf",
            &["Foo Foo bar", "Other", "Foo 12"],
        );

        let output =
            run_to_string(&config(&["books/ch1.pdf"], dir.path()), &extractor).expect("run");

        assert_eq!(output, "Foo: 2, 4\nOther: 3\n");
    }

    #[test]
    fn multiple_documents_prefix_labels() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor = FakeExtractor::default()
            .document("1.pdf", &["Intro", "Bar"])
            .document("2.pdf", &["Bar", "Outro"]);

        let output = run_to_string(&config(&["1.pdf", "2.pdf"], dir.path()), &extractor)
            .expect("run");

        assert_eq!(output, "Bar: 1-3, 2-2\nIntro: 1-2\nOutro: 2-3\n");
    }

    #[test]
    fn common_words_are_suppressed_at_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor =
            FakeExtractor::default().document("book.pdf", &["Qux Baz", "Qux", "Nothing"]);
        let mut config = config(&["book.pdf"], dir.path());
        config.limit = 2;

        let output = run_to_string(&config, &extractor).expect("run");

        assert_eq!(output, "Baz: 2\nNothing: 4\n");
    }

    #[test]
    fn explicit_pages_skip_page_count_inspection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor = FakeExtractor::default().document("book.pdf", &["Alpha", "Beta", "Gamma"]);
        let mut config = config(&["book.pdf"], dir.path());
        config.pages = Some(2);

        let output = run_to_string(&config, &extractor).expect("run");

        assert_eq!(output, "Alpha: 2\nBeta: 3\n");
        assert!(extractor.page_count_calls.borrow().is_empty());
    }

    #[test]
    fn offset_reads_later_pages_and_clears_all_artifacts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor =
            FakeExtractor::default().document("book.pdf", &["Cover", "Preface", "Body", "Tail"]);
        let mut config = config(&["book.pdf"], dir.path());
        config.offset = 2;
        config.pages = Some(2);

        let output = run_to_string(&config, &extractor).expect("run");

        assert_eq!(output, "Body: 5\nPreface: 4\n");
        for page in 1..5 {
            assert!(!PageArtifacts::artifact_path(dir.path(), page).exists());
        }
    }

    #[test]
    fn missing_dependency_aborts_without_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor = FakeExtractor {
            missing: vec!["pdftotext".to_string()],
            ..FakeExtractor::default()
        }
        .document("book.pdf", &["Foo"]);

        let mut out = Vec::new();
        let err = run(&config(&["book.pdf"], dir.path()), &extractor, &mut out)
            .expect_err("missing tool should fail");

        assert!(matches!(
            err.downcast_ref::<IndexError>(),
            Some(IndexError::MissingDependencies(_))
        ));
        assert_eq!(exit_code(&err), EXIT_MISSING_DEPENDENCIES);
        assert!(out.is_empty());
        assert!(!PageArtifacts::artifact_path(dir.path(), 1).exists());
    }

    #[test]
    fn page_count_failure_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let extractor = FakeExtractor::default().document("good.pdf", &["Foo"]);

        let mut out = Vec::new();
        let result = run(&config(&["good.pdf", "unknown.pdf"], dir.path()), &extractor, &mut out);

        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn label_strips_directory_and_extension() {
        assert_eq!(document_label(Path::new("/tmp/books/3.pdf")), "3");
        assert_eq!(document_label(Path::new("ch1.final.pdf")), "ch1.final");
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_filename_still_labels_and_indexes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let document = Path::new(OsStr::from_bytes(b"ch\xff.pdf"));
        assert_eq!(document_label(document), "ch\u{FFFD}");

        let dir = tempfile::tempdir().expect("tempdir");
        let mut extractor = FakeExtractor::default();
        extractor
            .pages
            .insert((document.to_path_buf(), 1), "Foo".to_string());
        let mut config = config(&[], dir.path());
        config.files = vec![document.to_path_buf(), PathBuf::from("other.pdf")];
        config.pages = Some(1);
        config.limit = 8;

        let output = run_to_string(&config, &extractor).expect("run");

        assert_eq!(output, "Foo: ch\u{FFFD}-2\n");
    }
}
