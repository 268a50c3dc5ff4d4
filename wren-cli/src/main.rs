//! Wren command-line front end
//!
//! Loads a document from a file or URL, runs it through the pipeline and
//! prints the laid-out box tree.
//!
//! - `wren page.html`              # box tree with geometry
//! - `wren --json page.html`       # box tree as JSON
//! - `wren --dom --html '<p>x</p>'` # parsed DOM tree

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, anyhow};
use clap::Parser;
use log::error;
use owo_colors::OwoColorize;
use wren_browser::{
    BoxDump, CachedMetrics, DefaultLoader, FontdueMetrics, PageError, Pipeline, PipelineConfig, RenderedPage,
    ResourceLoader, error_page_html,
};
use wren_css::{ApproximateFontMetrics, FontMetrics};

/// Text longer than this is cut short in the tree listing.
const TEXT_PREVIEW: usize = 30;

/// Wren: lay out an HTML document and print its box tree
#[derive(Parser, Debug)]
#[command(name = "wren")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the box tree of a local file
    wren ./index.html

    # Lay out a remote page at phone width
    wren --width 375 --height 667 https://example.com

    # Add a stylesheet and measure with a real font
    wren --css extra.css --font DejaVuSans.ttf ./index.html

    # Dump the box tree as JSON
    wren --json --html '<h1>Test</h1>'
"#)]
struct Cli {
    /// Path to HTML file or URL to open
    #[arg(value_name = "FILE|URL", required_unless_present = "html")]
    location: Option<String>,

    /// Lay out an HTML string instead of a file or URL
    #[arg(long, value_name = "HTML", conflicts_with = "location")]
    html: Option<String>,

    /// Viewport width in px
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Viewport height in px, for media queries
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Extra author stylesheet, applied after the document's own (repeatable)
    #[arg(long = "css", value_name = "FILE")]
    css: Vec<PathBuf>,

    /// TrueType/OpenType font used to measure text
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,

    /// Skip the built-in user-agent stylesheet
    #[arg(long)]
    no_ua: bool,

    /// Print the box tree as JSON
    #[arg(long)]
    json: bool,

    /// Print the parsed DOM tree before the box tree
    #[arg(long)]
    dom: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    let mut config = PipelineConfig::with_viewport(cli.width, cli.height);
    config.user_agent_stylesheet = !cli.no_ua;
    for path in &cli.css {
        let css = fs::read_to_string(path).with_context(|| format!("reading stylesheet {}", path.display()))?;
        config.extra_css.push(css);
    }

    let inner: Box<dyn FontMetrics + Send> = match &cli.font {
        Some(path) => Box::new(FontdueMetrics::from_file(path)?),
        None => Box::new(ApproximateFontMetrics),
    };
    let metrics = CachedMetrics::new(inner);
    let loader = DefaultLoader;

    let (page, failed) = match load(cli, &mut config, &loader, &metrics) {
        Ok(page) => (page, false),
        Err(e) => {
            error!("{}", e.chain());
            let config = PipelineConfig {
                extra_css: Vec::new(),
                base_url: None,
                ..config
            };
            let page = render(&config, &loader, &metrics, &error_page_html(&e))
                .map_err(|second| anyhow!("error page failed to render: {}", second.chain()))?;
            (page, true)
        }
    };

    if cli.dom {
        println!("{}", "=== DOM Tree ===".bold());
        print!("{}", wren_html::print_tree(&page.dom));
        println!();
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&page.dump())?);
    } else {
        print_page(&page);
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// Fetch the document named on the command line and render it.
fn load(
    cli: &Cli,
    config: &mut PipelineConfig,
    loader: &dyn ResourceLoader,
    metrics: &dyn FontMetrics,
) -> Result<RenderedPage, PageError> {
    let html = if let Some(html) = &cli.html {
        html.clone()
    } else {
        let location = cli.location.as_deref().unwrap_or_default();
        let resource = loader.fetch_document(location)?;
        config.base_url = Some(resource.location);
        resource.text
    };
    render(config, loader, metrics, &html)
}

fn render(
    config: &PipelineConfig,
    loader: &dyn ResourceLoader,
    metrics: &dyn FontMetrics,
    html: &str,
) -> Result<RenderedPage, PageError> {
    Pipeline::new(config, loader, metrics)
        .run(html)?
        .into_page()
        .ok_or_else(|| PageError::Other(anyhow!("pass was cancelled")))
}

/// Print the page header and its box tree.
fn print_page(page: &RenderedPage) {
    let title = page.title.as_deref().unwrap_or("(untitled)");
    println!(
        "{} {} (viewport: {}x{}, content height: {:.1})\n",
        "===".bold(),
        title.bold(),
        page.viewport_width,
        page.viewport_height,
        page.content_height()
    );
    print_box(&page.dump(), 0);
}

/// Recursively print a box with its border box.
fn print_box(dump: &BoxDump, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = match dump.text.as_deref() {
        Some(text) => {
            let preview: String = text.chars().take(TEXT_PREVIEW).collect();
            let suffix = if text.chars().count() > TEXT_PREVIEW { "..." } else { "" };
            format!("{} \"{}{suffix}\"", dump.label, preview.replace('\n', "\\n"))
        }
        None => format!("<{}>", dump.label),
    };
    let name = match dump.label.as_str() {
        "#text" => name.green().to_string(),
        "::marker" => name.magenta().to_string(),
        "anonymous" => name.yellow().to_string(),
        _ => name.blue().bold().to_string(),
    };
    let display = format!("{} {}", dump.outer, dump.inner);
    let r = &dump.rect;
    println!("{indent}[{}] {name} {}", dump.id, display.dimmed());
    println!(
        "{indent}  {}",
        format!("x={:.1} y={:.1} w={:.1} h={:.1}", r.x, r.y, r.width, r.height).cyan()
    );
    for child in &dump.children {
        print_box(child, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_location_or_html_is_required() {
        assert!(Cli::try_parse_from(["wren"]).is_err());
        let cli = Cli::try_parse_from(["wren", "--html", "<p>x</p>", "--width", "320"]).unwrap();
        assert_eq!(cli.width, 320.0);
        assert!(cli.location.is_none());
        assert!(Cli::try_parse_from(["wren", "page.html", "--html", "<p>x</p>"]).is_err());
    }

    #[test]
    fn test_css_is_repeatable() {
        let cli = Cli::try_parse_from(["wren", "a.html", "--css", "one.css", "--css", "two.css", "--json"]).unwrap();
        assert_eq!(cli.css.len(), 2);
        assert!(cli.json);
    }

    #[test]
    fn test_error_page_is_shown_for_a_missing_file() {
        let cli = Cli::try_parse_from(["wren", "/no/such/page.html"]).unwrap();
        let mut config = PipelineConfig::default();
        let err = load(&cli, &mut config, &DefaultLoader, &ApproximateFontMetrics).unwrap_err();
        assert_eq!(err.kind(), wren_browser::ErrorKind::NotFound);
        let page = render(&config, &DefaultLoader, &ApproximateFontMetrics, &error_page_html(&err)).unwrap();
        assert_eq!(page.title.as_deref(), Some("Page not found"));
    }
}
