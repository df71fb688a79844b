//! jenius-dom - Turn generated exercise pages into tabbed pages

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jenius_dom::dom::parse_html_bytes;
use jenius_dom::{Config, MissingNavPolicy, Report, on_ready};

#[derive(Parser)]
#[command(name = "jenius-dom")]
#[command(version, about = "Turn generated exercise pages into tabbed pages", long_about = None)]
#[command(after_help = "EXAMPLES:
    jenius-dom td1.html -o td1.out.html             Transform a page
    jenius-dom td1.html --label 'Exercice {n}'      French tab labels, print to stdout
    jenius-dom td1.html -o out.html --json          Print the report as JSON")]
struct Cli {
    /// Input HTML page
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON settings file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Tab label template, `{n}` is the exercise number
    #[arg(long, value_name = "TEMPLATE")]
    label: Option<String>,

    /// What to do when a page has exercises but no navigation list
    #[arg(long, value_enum)]
    missing_nav: Option<MissingNavPolicy>,

    /// Print the report as JSON on stdout (requires --output)
    #[arg(long, requires = "output")]
    json: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,

    /// Log each pass
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = load_config(cli)?;

    let bytes = fs::read(&cli.input).map_err(|e| format!("{}: {e}", cli.input.display()))?;
    let mut dom = parse_html_bytes(&bytes);
    let report = on_ready(&mut dom, &config).map_err(|e| e.to_string())?;
    let html = dom.to_html();

    match &cli.output {
        Some(path) => {
            fs::write(path, html).map_err(|e| format!("{}: {e}", path.display()))?;
        }
        None => io::stdout()
            .write_all(html.as_bytes())
            .map_err(|e| e.to_string())?,
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(cli, &report);
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<Config, String> {
    let mut config = match &cli.config {
        Some(path) => {
            let json =
                fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
            Config::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(label) = &cli.label {
        config.navbar.label = label.clone();
    }
    if let Some(policy) = cli.missing_nav {
        config.navbar.missing_nav = policy;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn print_summary(cli: &Cli, report: &Report) {
    let target = cli
        .output
        .as_ref()
        .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());

    eprintln!("{} -> {target}", cli.input.display());
    if report.navbar.removed_navs > 0 {
        eprintln!("  no exercises, removed {} navigation list(s)", report.navbar.removed_navs);
    } else {
        eprintln!(
            "  {} exercise(s), {} tab link(s)",
            report.navbar.sections, report.navbar.entries
        );
    }
    if report.navbar.id_conflicts > 0 {
        eprintln!(
            "  warning: {} section id(s) already used elsewhere in the page",
            report.navbar.id_conflicts
        );
    }
    eprintln!("  {} tag(s) normalized", report.tags_replaced);
}
