//! logmark entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use core_config::{Config, load_from};
use core_highlight::Highlighter;
use core_viewport::{
    ScrollIntoViewOptions, SlotId, SlotSurface, Viewport, scroll_to_line_with,
};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Once;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "logmark.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "logmark", version, about = "Highlight matches in log lines")]
struct Args {
    /// Log file to read. Standard input is used when omitted.
    pub path: Option<PathBuf>,
    /// Text to highlight (literal, case-insensitive).
    #[arg(short, long, default_value = "")]
    pub query: String,
    /// Line number to scroll into view.
    #[arg(short, long)]
    pub line: Option<usize>,
    /// Lines per page (overrides `[view] page_size`).
    #[arg(long = "page-size")]
    pub page_size: Option<usize>,
    /// Optional configuration file path (overrides discovery of `logmark.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

/// Where a scroll request left the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScrollReport {
    target: SlotId,
    viewport: Viewport,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = std::env::temp_dir();
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_err) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

fn read_lines(reader: impl Read) -> Result<Vec<String>> {
    BufReader::new(reader)
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("reading input lines")
}

fn load_input(args: &Args) -> Result<Vec<String>> {
    match args.path.as_ref() {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            let lines = read_lines(file)?;
            tracing::debug!(target: "io", file = %path.display(), line_count = lines.len(), "file_read_ok");
            Ok(lines)
        }
        None => read_lines(io::stdin().lock()),
    }
}

/// Write each line prefixed by the id of the slot that displays it.
fn render_lines<W: Write>(
    out: &mut W,
    lines: &[String],
    highlighter: Option<&Highlighter>,
    page_size: NonZeroUsize,
) -> io::Result<()> {
    for (n, line) in lines.iter().enumerate() {
        let id = SlotId::for_line(n, page_size);
        match highlighter {
            Some(h) => writeln!(out, "{id}\t{}", h.apply(line))?,
            None => writeln!(out, "{id}\t{line}")?,
        }
    }
    Ok(())
}

/// Mount one slot per displayed row and scroll `line` into view. `None` when
/// the line's slot is not displayed.
fn scroll_report(
    displayed_rows: usize,
    line: usize,
    page_size: NonZeroUsize,
    viewport_rows: usize,
    options: ScrollIntoViewOptions,
) -> Option<ScrollReport> {
    let mut surface = SlotSurface::new(page_size, viewport_rows);
    surface.mount_rows(displayed_rows);
    scroll_to_line_with(&mut surface, line, page_size, options);
    surface.finish_animation();
    surface.last_scrolled().map(|target| ScrollReport {
        target,
        viewport: surface.viewport(),
    })
}

fn build_highlighter(query: &str, config: &Config) -> Option<Highlighter> {
    Highlighter::for_query(query, config.marker())
}

fn run(args: &Args) -> Result<()> {
    let config = load_from(args.config.clone())?;
    let page_size = match args.page_size {
        Some(raw) => NonZeroUsize::new(raw).context("--page-size must be at least 1")?,
        None => config.effective_page_size(),
    };
    let lines = load_input(args)?;
    info!(
        target: "runtime.startup",
        line_count = lines.len(),
        page_size = page_size.get(),
        query_len = args.query.len(),
        config_override = args.config.is_some(),
        "bootstrap_complete"
    );

    let highlighter = build_highlighter(&args.query, &config);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_lines(&mut out, &lines, highlighter.as_ref(), page_size)
        .context("writing output")?;
    out.flush().context("writing output")?;

    if let Some(line) = args.line {
        let displayed = lines.len().min(page_size.get());
        match scroll_report(
            displayed,
            line,
            page_size,
            config.file.view.viewport_rows,
            config.scroll_options(),
        ) {
            Some(report) => eprintln!(
                "{}: rows {}..{}",
                report.target,
                report.viewport.first_row(),
                report.viewport.first_row() + report.viewport.height()
            ),
            None => eprintln!("{} is not displayed", SlotId::for_line(line, page_size)),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let result = run(&args);
    if let Err(err) = &result {
        tracing::error!(target: "runtime", error = %format!("{err:#}"), "run_failed");
    }
    result
}
