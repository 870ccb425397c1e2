//! CLI binary for pdf2tsv.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2tsv::{
    convert_into, default_output_path, inspect, normalize_file, ExtractionConfig,
    ExtractionProgressCallback, OutputFormat, PageArea, PageSelection, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

/// Spinner shown until the page count is known.
const WAITING: &str = "{spinner:.cyan} {prefix:.bold} {msg}";
/// Bar shown while pages are extracted.
const RUNNING: &str = "{spinner:.cyan} {prefix:.bold} {wide_bar:.cyan/blue} {pos}/{len} pages ({elapsed})";

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸─")
        .tick_chars("◐◓◑◒ ")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per page.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start time of the page currently being read.
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner()
            .with_style(bar_style(WAITING))
            .with_prefix("pdf2tsv")
            .with_message("opening PDF");
        bar.enable_steady_tick(Duration::from_millis(100));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_extraction_start(&self, total_pages: usize) {
        self.bar.set_length(total_pages as u64);
        self.bar.set_style(bar_style(RUNNING));
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracting tables from {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        *self.page_started.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, rows: usize) {
        let elapsed_ms = self
            .page_started
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{rows:>4} rows")),
            dim(&format!("{elapsed_ms}ms")),
        ));
        self.bar.inc(1);
    }

    fn on_extraction_complete(&self, total_pages: usize, total_rows: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} rows from {} pages",
            green("✔"),
            bold(&total_rows.to_string()),
            total_pages
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Publication layout, output next to the input (results.tsv)
  pdf2tsv results.pdf

  # Explicit output file
  pdf2tsv results.pdf -o tables/results.tsv

  # Pages 2 to 5 only, custom crop area in percent (top,left,bottom,right)
  pdf2tsv --pages 2-5 --area 10,0,90,100 results.pdf

  # Crop area in PDF points instead of percent
  pdf2tsv --absolute-area --area 36,40,760,612 results.pdf

  # Raw tables as JSON, no whitespace cleanup
  pdf2tsv --format json results.pdf -o results.json

  # Re-run only the whitespace cleanup on an existing TSV
  pdf2tsv --normalize-only results.tsv

  # Inspect PDF metadata
  pdf2tsv --inspect-only results.pdf

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to a pdfium shared library
  RUST_LOG          Log filter, overrides -v / -q

SETUP:
  pdf2tsv needs a pdfium shared library at run time. It is looked up at
  --pdfium-lib, then PDFIUM_LIB_PATH, then the current directory, then the
  system library path. Prebuilt copies: https://github.com/bblanchon/pdfium-binaries
"#;

/// Extract tables from publication PDFs into tab-separated values.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tsv",
    version,
    about = "Extract tables from publication PDFs into tab-separated values",
    long_about = "Extract the tables of text-based PDF documents into TSV. Rows and columns are \
rebuilt from glyph positions inside a crop area (stream mode), then the file is normalised to \
one tab between fields with no empty cells at either end of a line.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file (or a TSV file with --normalize-only).
    input: PathBuf,

    /// Output file. Default: the input path with a .tsv extension.
    #[arg(short, long, env = "PDF2TSV_OUTPUT")]
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2TSV_PAGES", default_value = "all")]
    pages: String,

    /// Crop area as top,left,bottom,right.
    #[arg(
        long,
        env = "PDF2TSV_AREA",
        default_value = "4.2,6.5,97,100",
        allow_hyphen_values = true,
        long_help = "Crop area as top,left,bottom,right. Percentages of the page size by default;\n\
          PDF points measured from the top-left corner with --absolute-area."
    )]
    area: String,

    /// Read --area as PDF points instead of percentages.
    #[arg(long, env = "PDF2TSV_ABSOLUTE_AREA")]
    absolute_area: bool,

    /// Output format: tsv or json.
    #[arg(long, env = "PDF2TSV_FORMAT", value_enum, default_value = "tsv")]
    format: FormatArg,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2TSV_PASSWORD")]
    password: Option<String>,

    /// Write the extracted TSV without the whitespace cleanup.
    #[arg(long, env = "PDF2TSV_NO_NORMALIZE")]
    no_normalize: bool,

    /// Normalise an existing TSV file in place, no extraction.
    #[arg(long, conflicts_with_all = ["inspect_only", "no_normalize"])]
    normalize_only: bool,

    /// Print PDF metadata only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDF2TSV_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Disable progress bar.
    #[arg(long, env = "PDF2TSV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TSV_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Tsv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Tsv => OutputFormat::Tsv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs unless -v is given.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.normalize_only && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Normalise-only mode ──────────────────────────────────────────────
    if cli.normalize_only {
        let target = cli.output.as_ref().unwrap_or(&cli.input);
        if cli.output.is_some() {
            std::fs::copy(&cli.input, target).with_context(|| {
                format!("Failed to copy {} to {}", cli.input.display(), target.display())
            })?;
        }
        let removed = normalize_file(target).context("Normalisation failed")?;
        if !cli.quiet {
            eprintln!(
                "{}  {}  {}",
                green("✔"),
                bold(&target.display().to_string()),
                dim(&format!("{removed} bytes removed")),
            );
        }
        return Ok(());
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new();
        Some(cb as Arc<dyn ExtractionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input, &config).context("Failed to inspect PDF")?;

        if matches!(cli.format, FormatArg::Json) {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Run extraction ───────────────────────────────────────────────────
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let stats = convert_into(&cli.input, &output_path, &config).context("Extraction failed")?;

    if !cli.quiet {
        eprintln!(
            "{}  {}/{} pages  {} rows  {}ms  →  {}",
            green("✔"),
            stats.processed_pages,
            stats.total_pages,
            stats.total_rows,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
        if stats.empty_pages > 0 {
            eprintln!(
                "   {}",
                dim(&format!("{} pages had no text in the crop area", stats.empty_pages))
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let area = parse_area(&cli.area, cli.absolute_area)?;

    let mut builder = ExtractionConfig::builder()
        .area(area)
        .pages(pages)
        .output_format(cli.format.clone().into())
        .normalize(!cli.no_normalize);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages`: `all`, a single page, an `A-B` range or an `A,B,C` list.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let wanted = s.trim();
    if wanted.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }

    let items: Vec<&str> = wanted.split(',').collect();
    let [item] = items.as_slice() else {
        let pages = items
            .iter()
            .map(|p| page_number(p))
            .collect::<Result<Vec<_>>>()?;
        return Ok(PageSelection::Set(pages));
    };

    match item.split_once('-') {
        Some((first, last)) => {
            let (first, last) = (page_number(first)?, page_number(last)?);
            anyhow::ensure!(
                first <= last,
                "Page range {first}-{last} runs backwards"
            );
            Ok(PageSelection::Range(first, last))
        }
        None => page_number(item).map(PageSelection::Single),
    }
}

/// One 1-indexed page number.
fn page_number(s: &str) -> Result<usize> {
    let s = s.trim();
    let page: usize = s
        .parse()
        .with_context(|| format!("Invalid page number: '{s}'"))?;
    anyhow::ensure!(page >= 1, "Pages are numbered from 1 (got {page})");
    Ok(page)
}

/// Parse `--area` ("top,left,bottom,right") into a `PageArea`.
///
/// Only the shape is checked here; `ExtractionConfigBuilder::build` validates
/// the bounds.
fn parse_area(s: &str, absolute: bool) -> Result<PageArea> {
    let values: Vec<f32> = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f32>()
                .context(format!("Invalid area coordinate: '{}'", v.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    let &[top, left, bottom, right] = values.as_slice() else {
        anyhow::bail!(
            "Area needs four values top,left,bottom,right (got {})",
            values.len()
        );
    };

    Ok(if absolute {
        PageArea::points(top, left, bottom, right)
    } else {
        PageArea::percent(top, left, bottom, right)
    })
}
