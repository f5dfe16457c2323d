use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{info, warn};

use crate::util::{command_available, read_text_or_empty, remove_file_if_exists};

const PDFTOTEXT: &str = "pdftotext";
const PDFINFO: &str = "pdfinfo";

/// Produces per-page text for a document.
pub trait PageExtractor {
    /// Programs this extractor needs that are not installed.
    fn missing_programs(&self, needs_page_count: bool) -> Vec<String>;

    fn page_count(&self, document: &Path) -> Result<u32>;

    /// Writes the text of `page` to `output`. A page that cannot be extracted
    /// may leave `output` missing; it is then indexed as empty.
    fn extract_page(&self, document: &Path, page: u32, output: &Path) -> Result<()>;
}

/// Extraction through the poppler command-line tools.
pub struct Poppler {
    pdftotext: String,
    pdfinfo: String,
    pages_pattern: Regex,
}

impl Poppler {
    pub fn new() -> Result<Self> {
        Self::with_programs(PDFTOTEXT, PDFINFO)
    }

    pub fn with_programs(pdftotext: &str, pdfinfo: &str) -> Result<Self> {
        let pages_pattern =
            Regex::new(r"(?m)^Pages:\s*(\d+)").context("failed to compile pdfinfo pages regex")?;
        Ok(Self {
            pdftotext: pdftotext.to_string(),
            pdfinfo: pdfinfo.to_string(),
            pages_pattern,
        })
    }

    fn parse_page_count(&self, report: &str) -> Option<u32> {
        self.pages_pattern
            .captures(report)
            .and_then(|captures| captures.get(1))
            .and_then(|value| value.as_str().parse::<u32>().ok())
    }
}

impl PageExtractor for Poppler {
    fn missing_programs(&self, needs_page_count: bool) -> Vec<String> {
        let mut required = vec![self.pdftotext.as_str()];
        if needs_page_count {
            required.push(self.pdfinfo.as_str());
        }
        required
            .into_iter()
            .filter(|program| !command_available(program))
            .map(str::to_string)
            .collect()
    }

    fn page_count(&self, document: &Path) -> Result<u32> {
        let output = Command::new(&self.pdfinfo)
            .arg(document)
            .output()
            .with_context(|| format!("failed to execute pdfinfo for {}", document.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdfinfo returned non-zero exit status for {}: {}",
                document.display(),
                stderr.trim()
            );
        }

        let report = String::from_utf8_lossy(&output.stdout);
        self.parse_page_count(&report)
            .with_context(|| format!("pdfinfo reported no page count for {}", document.display()))
    }

    fn extract_page(&self, document: &Path, page: u32, output: &Path) -> Result<()> {
        let result = Command::new(&self.pdftotext)
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg(document)
            .arg(output)
            .stdout(Stdio::null())
            .output()
            .with_context(|| format!("failed to execute pdftotext for {}", document.display()))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            warn!(
                document = %document.display(),
                page,
                stderr = %stderr.trim(),
                "pdftotext returned non-zero exit status"
            );
        }

        Ok(())
    }
}

/// Per-page text files of one document, removed when dropped.
///
/// Files are named `out.<page>.txt` inside the work directory. Every page in
/// `[1, end)` is owned, including pages below the offset that are extracted but
/// never indexed.
#[derive(Debug)]
pub struct PageArtifacts {
    work_dir: PathBuf,
    end: u32,
}

impl PageArtifacts {
    pub fn artifact_path(work_dir: &Path, page: u32) -> PathBuf {
        work_dir.join(format!("out.{page}.txt"))
    }

    pub fn path(&self, page: u32) -> PathBuf {
        Self::artifact_path(&self.work_dir, page)
    }

    /// Text of `page`; missing or unreadable artifacts read as empty.
    pub fn read_page(&self, page: u32) -> String {
        read_text_or_empty(&self.path(page))
    }
}

impl Drop for PageArtifacts {
    fn drop(&mut self) {
        info!(
            work_dir = %self.work_dir.display(),
            pages = self.end.saturating_sub(1),
            "clearing page artifacts"
        );
        for page in 1..self.end {
            let path = self.path(page);
            if let Err(err) = remove_file_if_exists(&path) {
                warn!(path = %path.display(), error = %err, "failed to remove page artifact");
            }
        }
    }
}

/// Extracts the pages needed to index `pages` pages starting at `offset`.
pub fn extract_document(
    extractor: &dyn PageExtractor,
    document: &Path,
    offset: u32,
    pages: u32,
    work_dir: &Path,
) -> Result<PageArtifacts> {
    info!(
        document = %document.display(),
        pages,
        offset,
        "extracting pages"
    );

    let artifacts = PageArtifacts {
        work_dir: work_dir.to_path_buf(),
        end: pages.saturating_add(offset.max(1)),
    };

    for page in 1..artifacts.end {
        extractor
            .extract_page(document, page, &artifacts.path(page))
            .with_context(|| format!("failed to extract page {page} of {}", document.display()))?;
    }

    Ok(artifacts)
}
