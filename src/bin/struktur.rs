//! struktur - find repeated visual structures in a rendered page

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use rs_struktur::{detect_structures, encoding, html, snapshot, Options, Page};

#[derive(Parser)]
#[command(name = "struktur")]
#[command(version, about = "Detect repeated visual structures in a rendered page", long_about = None)]
#[command(after_help = "EXAMPLES:
    struktur page.html                       Detect structures in annotated HTML
    struktur snapshot.json --pretty          Detect structures in a JSON snapshot
    struktur page.html -c config.json -a     Print the page with structures outlined

Set RUST_LOG=rs_struktur=debug to trace the detection stages.")]
struct Cli {
    /// Annotated HTML or JSON snapshot (reads stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Input format
    #[arg(short, long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// JSON file with option overrides, e.g. {"N": 4, "fulltext": true}
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(short, long)]
    pretty: bool,

    /// Print the highlighted page HTML instead of the JSON result
    #[arg(short, long)]
    annotated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Snapshot when the input starts with `{`, HTML otherwise
    Auto,
    Html,
    Snapshot,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<String, String> {
    let mut options = match &cli.config {
        Some(path) => load_options(path)?,
        None => Options::default(),
    };
    if cli.annotated && !options.highlight_struktur && !options.highlight_content {
        options.highlight_struktur = true;
        options.highlight_content = true;
    }

    let input = read_input(cli.input.as_deref())?;
    let page = parse_page(&input, cli.format).map_err(|e| e.to_string())?;
    let result = detect_structures(&page.tree, page.root, &options);

    if cli.annotated {
        Ok(html::to_html(&page.tree, page.root))
    } else if cli.pretty {
        result.to_json_pretty().map_err(|e| e.to_string())
    } else {
        result.to_json().map_err(|e| e.to_string())
    }
}

fn load_options(path: &Path) -> Result<Options, String> {
    let json = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    Options::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>, String> {
    match path {
        Some(path) => fs::read(path).map_err(|e| format!("{}: {e}", path.display())),
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| format!("stdin: {e}"))?;
            Ok(buf)
        }
    }
}

fn parse_page(input: &[u8], format: Format) -> rs_struktur::Result<Page> {
    let text = encoding::transcode_to_utf8(input);
    let is_snapshot = match format {
        Format::Auto => text.trim_start().starts_with('{'),
        Format::Html => false,
        Format::Snapshot => true,
    };

    if is_snapshot {
        snapshot::parse_snapshot(&text)
    } else {
        html::parse_annotated_html(&text)
    }
}
