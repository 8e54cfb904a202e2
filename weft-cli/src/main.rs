//! Weft CLI
//!
//! Parses an HTML document or fragment and prints the resulting tree, the
//! serialized markup, or a JSON report.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use owo_colors::OwoColorize;
use serde_json::json;
use weft_common::ParseError;
use weft_dom::serialize::outer_html;
use weft_dom::{DomTree, Namespace, NodeId};
use weft_html::{FragmentContext, ParseOptions, dump_tree, parse_document, parse_fragment};

/// Weft: parse HTML the way a browser does and inspect the result
#[derive(Parser, Debug)]
#[command(name = "weft")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the DOM tree of a file
    weft ./index.html

    # Read from stdin
    cat index.html | weft -

    # Parse inline HTML
    weft --html '<p>One<p>Two'

    # Parse a fragment as if assigned to a <tr>'s innerHTML
    weft --fragment tr --html '<td>cell'

    # Parse a fragment inside an SVG element
    weft --fragment svg:g --html '<circle r="1"/>'

    # Print serialized markup instead of the tree
    weft --serialize --html '<table><b>x'
"#)]
struct Cli {
    /// Path to an HTML file; `-` or nothing reads stdin
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse this HTML string instead of reading a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Parse as a fragment in this context element (`svg:` or `math:` prefix
    /// for foreign elements)
    #[arg(long, value_name = "CONTEXT")]
    fragment: Option<String>,

    /// Maximum number of parse errors to collect
    #[arg(long, default_value = "100")]
    max_errors: usize,

    /// Base URL used to resolve `<base href>`
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Print a JSON report instead of the tree
    #[arg(long)]
    json: bool,

    /// Print serialized HTML instead of the tree
    #[arg(long)]
    serialize: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

/// What one run produced, independent of document or fragment mode.
struct Report {
    tree: DomTree,
    nodes: Vec<NodeId>,
    errors: Vec<ParseError>,
    base_uri: Option<String>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let input = read_input(&cli)?;
    let options = ParseOptions {
        max_errors: cli.max_errors,
        base_uri: cli.base_url.clone(),
    };

    let report = match cli.fragment.as_deref() {
        Some(context) => {
            let context = parse_context(context);
            info!("parsing fragment in <{}>", context.tag_name);
            let parsed = parse_fragment(&input, Some(&context), &options);
            Report {
                tree: parsed.tree,
                nodes: parsed.nodes,
                errors: parsed.errors,
                base_uri: parsed.base_uri,
            }
        }
        None => {
            info!("parsing document ({} bytes)", input.len());
            let parsed = parse_document(&input, &options);
            let root = parsed.tree.root();
            Report {
                tree: parsed.tree,
                nodes: vec![root],
                errors: parsed.errors,
                base_uri: parsed.base_uri,
            }
        }
    };
    debug!("{} node(s) at top level", report.nodes.len());

    if cli.json {
        print_json(&report)?;
    } else {
        print_report(&report, cli.serialize, !cli.no_color);
    }
    Ok(())
}

/// Read the input named on the command line.
fn read_input(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        return Ok(html.clone());
    }
    match cli.path.as_deref() {
        None | Some("-") => {
            let mut buffer = String::new();
            let _ = io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {path}")),
    }
}

/// `svg:foreignObject` and `math:mi` name foreign context elements; anything
/// else is an HTML element.
fn parse_context(spec: &str) -> FragmentContext {
    match spec.split_once(':') {
        Some(("svg", name)) => FragmentContext::foreign(name, Namespace::Svg),
        Some(("math", name)) => FragmentContext::foreign(name, Namespace::MathMl),
        _ => FragmentContext::html(spec),
    }
}

fn print_report(report: &Report, serialize: bool, color: bool) {
    for &node in &report.nodes {
        if serialize {
            println!("{}", outer_html(&report.tree, node));
        } else {
            print!("{}", dump_tree(&report.tree, node, 0));
        }
    }

    if let Some(ref base) = report.base_uri {
        let line = format!("base: {base}");
        if color {
            println!("{}", line.dimmed());
        } else {
            println!("{line}");
        }
    }

    if report.errors.is_empty() {
        return;
    }
    let heading = format!("{} parse error(s)", report.errors.len());
    if color {
        eprintln!("\n{}", heading.yellow().bold());
    } else {
        eprintln!("\n{heading}");
    }
    for error in &report.errors {
        if color {
            eprintln!("  {} {}", format!("@{}", error.position).red(), error.message);
        } else {
            eprintln!("  @{} {}", error.position, error.message);
        }
    }
}

fn print_json(report: &Report) -> Result<()> {
    let markup: Vec<String> = report
        .nodes
        .iter()
        .map(|&node| outer_html(&report.tree, node))
        .collect();
    let errors: Vec<_> = report
        .errors
        .iter()
        .map(|error| json!({ "position": error.position, "message": error.message }))
        .collect();
    let value = json!({
        "quirks_mode": report.tree.quirks_mode(),
        "base_uri": report.base_uri,
        "nodes": markup,
        "tree": report.tree,
        "errors": errors,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&value).context("failed to encode report")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_context_prefixes() {
        assert_eq!(parse_context("tr"), FragmentContext::html("tr"));
        assert_eq!(
            parse_context("svg:foreignObject"),
            FragmentContext::foreign("foreignObject", Namespace::Svg)
        );
        assert_eq!(
            parse_context("math:mi"),
            FragmentContext::foreign("mi", Namespace::MathMl)
        );
    }
}
