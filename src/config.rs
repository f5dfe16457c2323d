use std::path::PathBuf;

use tracing::warn;

use crate::cli::{Cli, OutputFormat, ReportOrder};

const BASE_LIMIT: usize = 8;
const FILES_PER_EXTRA_LIMIT: usize = 4;

#[derive(Debug, Clone)]
pub struct IndexConfig {
    pub files: Vec<PathBuf>,
    pub offset: u32,
    /// Explicit page count; `None` means inspect each file.
    pub pages: Option<u32>,
    pub limit: usize,
    pub order: ReportOrder,
    pub format: OutputFormat,
    pub work_dir: PathBuf,
}

impl IndexConfig {
    pub fn from_cli(cli: Cli) -> Self {
        let mut pages = cli.pages;
        if cli.files.len() > 1 && pages.is_some() {
            warn!(
                file_count = cli.files.len(),
                "--pages only applies to a single file; detecting page counts instead"
            );
            pages = None;
        }

        let limit = cli.limit.unwrap_or_else(|| default_limit(cli.files.len()));

        Self {
            files: cli.files,
            offset: cli.offset,
            pages,
            limit,
            order: cli.order,
            format: cli.format,
            work_dir: cli.work_dir,
        }
    }

    pub fn needs_page_count(&self) -> bool {
        self.pages.is_none()
    }
}

pub fn default_limit(file_count: usize) -> usize {
    BASE_LIMIT + file_count.saturating_sub(1) / FILES_PER_EXTRA_LIMIT
}
