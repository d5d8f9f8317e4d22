//! CLI binary for facesheet-deck.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `DeckConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use facesheet_deck::{
    convert_to_file, inspect, DeckConfig, DeckError, DeckProgressCallback, DocumentOrder,
    FormUrlTemplate, ProgressCallback, DECK_FILE_NAME,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
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

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a bar anchored at the bottom of the terminal
/// plus one log line per document.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Per-document start times, keyed by upload position.
    start_times: Mutex<HashMap<usize, Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} documents  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Reading");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    fn elapsed(&self, position: usize) -> String {
        let ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&position)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);
        dim(&format!("{:.1}s", ms as f64 / 1000.0))
    }
}

impl DeckProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.bar.set_length(total_documents as u64);
        self.bar.set_prefix("Building");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Building deck from {total_documents} facesheet(s)…"))
        ));
    }

    fn on_document_start(&self, position: usize, _total: usize, name: &str) {
        self.start_times
            .lock()
            .unwrap()
            .insert(position, Instant::now());
        self.bar.set_message(name.to_string());
    }

    fn on_document_complete(&self, position: usize, total: usize, name: &str, slides: usize) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<40}  {}  {}",
            green("✓"),
            position,
            total,
            name,
            dim(&format!("{slides} slide(s)")),
            self.elapsed(position),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, position: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = if error.chars().count() > 100 {
            format!("{}\u{2026}", error.chars().take(99).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            position,
            total,
            red(&msg),
            self.elapsed(position),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, slides: usize) {
        self.bar.finish_and_clear();
        let failed = self.errors.load(Ordering::SeqCst);
        if failed == 0 {
            eprintln!(
                "{} {} slide(s) from {} document(s)",
                green("✔"),
                bold(&slides.to_string()),
                total_documents
            );
        } else {
            eprintln!(
                "{} {} slide(s)  ({}/{} documents skipped)",
                if slides == 0 { red("✘") } else { cyan("⚠") },
                bold(&slides.to_string()),
                red(&failed.to_string()),
                total_documents,
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Bulk-print download straight into a deck
  facesheet2pptx facesheets.zip --form-url 'https://docs.google.com/forms/d/e/XYZ/viewform?usp=pp_url&entry.123=TEST'

  # A directory of PDFs, slides sorted by file name
  facesheet2pptx ./facesheets --order name -o interview-day.pptx

  # Check what would be extracted (no form URL needed)
  facesheet2pptx --inspect-only ./facesheets

  # Machine-readable summary
  facesheet2pptx ./facesheets --json > summary.json

FORM URL:
  Open the evaluation form, choose "Get pre-filled link", type a placeholder
  (e.g. TEST) into the applicant-name question and copy the link. Everything
  after the second '=' is replaced with each applicant's name.

ENVIRONMENT VARIABLES:
  FACESHEET_FORM_URL       Default for --form-url
  FACESHEET_OUTPUT         Default for --output
  RUST_LOG                 Log filter (overrides -v / -q)
"#;

#[derive(Parser, Debug)]
#[command(
    name = "facesheet2pptx",
    version,
    about = "Turn applicant facesheet PDFs into a PowerPoint deck with QR-coded evaluation links",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Facesheet PDFs, directories of PDFs, or .zip archives.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Pre-filled form link; everything after the second '=' is replaced by the applicant name.
    #[arg(long, env = "FACESHEET_FORM_URL")]
    form_url: Option<String>,

    /// Output presentation path.
    #[arg(short, long, env = "FACESHEET_OUTPUT", default_value = DECK_FILE_NAME)]
    output: PathBuf,

    /// Slide order.
    #[arg(long, env = "FACESHEET_ORDER", value_enum, default_value = "upload")]
    order: OrderArg,

    /// Maximum number of documents per run.
    #[arg(long, env = "FACESHEET_MAX_DOCUMENTS", default_value_t = 500)]
    max_documents: usize,

    /// Maximum size of one PDF in bytes; larger documents are skipped unread.
    #[arg(long, env = "FACESHEET_MAX_DOCUMENT_BYTES", default_value_t = 32 * 1024 * 1024)]
    max_document_bytes: usize,

    /// Deck title stored in the document properties.
    #[arg(long, env = "FACESHEET_TITLE", default_value = "Applicant Facesheets")]
    title: String,

    /// Print the summary (or inspection report) as JSON on stdout.
    #[arg(long)]
    json: bool,

    #[arg(long, env = "FACESHEET_NO_PROGRESS")]
    no_progress: bool,

    /// Only extract and print the fields of each facesheet.
    #[arg(long)]
    inspect_only: bool,

    /// Exit non-zero if any document was skipped.
    #[arg(long)]
    strict: bool,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OrderArg {
    Upload,
    Name,
}

impl From<OrderArg> for DocumentOrder {
    fn from(v: OrderArg) -> Self {
        match v {
            OrderArg::Upload => DocumentOrder::Upload,
            OrderArg::Name => DocumentOrder::FileName,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO-level library logs are suppressed while the progress bar is
    // active; the bar's per-document lines carry the same information.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let report = inspect(&cli.inputs).await.context("Failed to read inputs")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialise report")?
            );
        } else {
            for doc in &report {
                println!("{} {}", bold(&format!("{:>3}.", doc.position)), doc.document);
                match (&doc.record, &doc.error) {
                    (Some(r), _) => {
                        println!("     Name:     {}", r.full_name);
                        println!("     AAMC ID:  {}", r.aamc_id);
                        println!("     School:   {}", r.med_school.replace('\n', " / "));
                        println!("     Photos:   {}", doc.image_count);
                    }
                    (None, Some(e)) => println!("     {}", red(&e.to_string())),
                    (None, None) => {}
                }
            }
        }
        return Ok(());
    }

    // ── Validate the form URL before reading anything ────────────────────
    let form_url = cli
        .form_url
        .clone()
        .context("--form-url (or FACESHEET_FORM_URL) is required unless --inspect-only")?;
    let template = FormUrlTemplate::parse(&form_url)?;
    if !cli.quiet && !cli.json {
        eprintln!("{} {}", dim("Form link prefix:"), template);
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn DeckProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let summary = match convert_to_file(&cli.inputs, &form_url, &cli.output, &config).await {
        Ok(summary) => summary,
        Err(DeckError::AllDocumentsFailed { total, diagnostics }) => {
            for d in &diagnostics {
                eprintln!("  {} {}", red("✗"), d);
            }
            anyhow::bail!("All {total} documents failed; no deck was written");
        }
        Err(e) => return Err(e).context("Deck generation failed"),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        if !summary.diagnostics.is_empty() {
            eprintln!("{}", bold("Skipped documents:"));
            for d in &summary.diagnostics {
                eprintln!("  {} {}", red("✗"), d);
            }
        }
        let stats = &summary.stats;
        eprintln!(
            "{}  {} slide(s) from {}/{} document(s)  {}ms  →  {}",
            if stats.documents_failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            stats.slides,
            stats.documents_succeeded,
            stats.documents_total,
            stats.total_duration_ms,
            bold(&cli.output.display().to_string()),
        );
        if stats.photoless_slides > 0 {
            eprintln!(
                "   {}",
                dim(&format!("{} slide(s) without a photo", stats.photoless_slides))
            );
        }
    }

    if cli.strict && summary.stats.documents_failed > 0 {
        return Err(DeckError::PartialFailure {
            succeeded: summary.stats.documents_succeeded,
            failed: summary.stats.documents_failed,
            total: summary.stats.documents_total,
        }
        .into());
    }

    Ok(())
}

/// Map CLI args to `DeckConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DeckConfig> {
    let mut builder = DeckConfig::builder()
        .max_documents(cli.max_documents)
        .max_document_bytes(cli.max_document_bytes)
        .order(cli.order.clone().into())
        .title(cli.title.clone());

    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_limit_flag_reaches_config() {
        let cli = Cli::try_parse_from([
            "facesheet2pptx",
            "batch.zip",
            "--form-url",
            "https://forms.example/v?usp=pp_url&entry.1=TEST",
            "--max-document-bytes",
            "4096",
        ])
        .unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.max_document_bytes, 4096);
    }

    #[test]
    fn size_limit_defaults_to_library_default() {
        let cli = Cli::try_parse_from(["facesheet2pptx", "a.pdf"]).unwrap();
        let config = build_config(&cli, None).unwrap();
        assert_eq!(config.max_document_bytes, DeckConfig::default().max_document_bytes);
    }

    #[test]
    fn zero_size_limit_is_rejected() {
        let cli = Cli::try_parse_from(["facesheet2pptx", "a.pdf", "--max-document-bytes", "0"]).unwrap();
        assert!(build_config(&cli, None).is_err());
    }
}
