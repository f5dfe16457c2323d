use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// With a single PDF, prints an index of words and page numbers. With several
/// PDFs, each page number is prefixed with the file name (without extension)
/// of the PDF it came from; rename files to `<chapter>.pdf` to get chapter
/// prefixes.
///
/// Intermediate `out.<num>.txt` files are written to the work directory and
/// deleted once each PDF is indexed.
#[derive(Parser, Debug)]
#[command(
    name = "pdfindex",
    version,
    about = "Generate a word to page-number index for PDF files"
)]
pub struct Cli {
    /// Total number of pages in the PDF (single-file invocation only)
    #[arg(short, long)]
    pub pages: Option<u32>,

    /// Page number that is actual page 1
    #[arg(short, long, default_value_t = 1)]
    pub offset: u32,

    /// Number of references at which a word is dropped from the index
    /// [default: 8 + (files - 1) / 4]
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Order of words in the index
    #[arg(long, value_enum, default_value_t = ReportOrder::Alphabetical)]
    pub order: ReportOrder,

    /// Output format of the index
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Directory for intermediate per-page text files
    #[arg(long, default_value = ".")]
    pub work_dir: PathBuf,

    #[arg(required = true, value_name = "PDF")]
    pub files: Vec<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReportOrder {
    Alphabetical,
    FirstSeen,
}

impl ReportOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetical",
            Self::FirstSeen => "first-seen",
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Json => "json",
        }
    }
}
