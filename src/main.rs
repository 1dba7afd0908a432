use std::path::PathBuf;

use anyhow::{bail, Context};
use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use chumsky::prelude::*;
use clap::Parser as ClapParser;
use confique::Config as _;
use serde::Serialize;
use tracing::*;

use crate::parser::Json;
use crate::path::Lookup;
use crate::tree::{NodeId, NodeKind, Tree};

mod config;
mod edit_distance;
mod logging;
mod parser;
mod path;
mod spanned;
mod tree;

pub(crate) use spanned::Spanned;

/// Turns a JSON document into a flat, addressable tree.
#[derive(Debug, ClapParser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The path to a JSON file.
    input: PathBuf,

    /// A path to look up, like `$.user.address.city`. Relative forms such as
    /// `user.address.city` are accepted too.
    #[arg(short, long)]
    query: Option<String>,

    /// Print the tree (or the query result) as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// The path to a TOML config file; `jtree.toml` is picked up by default.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Query result record printed in `--json` mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FoundNode {
    anchor_node_id: NodeId,
    display_value: String,
}

fn main() -> anyhow::Result<()> {
    logging::setup_logging();

    let cli = Args::parse();

    debug!(input = ?cli.input);

    let config = load_config(&cli)?;

    let json_string = match std::fs::read_to_string(&cli.input) {
        Ok(file) => file,
        Err(e) => {
            error!(path = ?cli.input, "failed to read input");
            return Err(e)
                .with_context(|| format!("failed to read file `{}`", cli.input.display()));
        }
    };

    let path = cli.input.display().to_string();

    let (document, errors) = parser::parser().parse(&json_string).into_output_errors();

    errors.into_iter().for_each(|e| {
        Report::build(ReportKind::Error, &path, e.span().start)
            .with_message(e.to_string())
            .with_label(
                Label::new((&path, e.span().into_range()))
                    .with_message(e.reason().to_string())
                    .with_color(Color::Red),
            )
            .finish()
            .print((&path, Source::from(&json_string)))
            .unwrap()
    });

    let Some(document) = document else {
        bail!("invalid JSON document");
    };

    debug!(?document);

    let tree = tree::build(&document, &config.layout());

    match &cli.query {
        Some(query) => run_query(&tree, query, &path, &json_string, cli.json)?,
        None if cli.json => println!("{}", serde_json::to_string_pretty(&tree)?),
        None => print_outline(&tree),
    }

    Ok(())
}

fn load_config(cli: &Args) -> anyhow::Result<config::Config> {
    let mut builder = config::Config::builder().env();
    match &cli.config {
        Some(path) => {
            if !path.is_file() {
                bail!("config file `{}` does not exist", path.display());
            }
            builder = builder.file(path);
        }
        None => builder = builder.file("jtree.toml"),
    }

    let config = builder.load().context("failed to load configuration")?;
    debug!(?config);
    Ok(config)
}

fn run_query(
    tree: &Tree<'_>,
    raw_query: &str,
    path: &String,
    src: &str,
    as_json: bool,
) -> anyhow::Result<()> {
    match path::resolve(&tree.nodes, raw_query) {
        Lookup::Found(node) => {
            debug!(id = node.id.0, path = %node.path, "query matched");

            if as_json {
                let record = FoundNode {
                    anchor_node_id: node.id,
                    display_value: node.raw_value.val.display_value(),
                };
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                let summary = match &node.raw_value.val {
                    Json::Object(members) => format!("object with {} members", members.len()),
                    Json::Array(items) => format!("array with {} elements", items.len()),
                    value => value.display_value(),
                };
                Report::build(ReportKind::Advice, path, node.raw_value.span.start)
                    .with_message(format!(
                        "`{}` is a {} node",
                        node.path.as_str().fg(Color::Blue),
                        node.raw_value.val.kind_desc()
                    ))
                    .with_label(
                        Label::new((path, node.raw_value.span.into_range()))
                            .with_message(summary)
                            .with_color(Color::Green),
                    )
                    .finish()
                    .print((path, Source::from(src)))?;
            }
        }
        Lookup::EmptyQuery => {
            println!("enter a path like `$.user.address.city`");
        }
        Lookup::NoMatch(query) => {
            let paths: Vec<&str> = tree.nodes.iter().map(|n| n.path.as_str()).collect();
            match edit_distance::find_best_match_for_name(&paths, &query, None) {
                Some(suggestion) => {
                    bail!("no node found for `{query}`; did you mean `{suggestion}` instead?")
                }
                None => bail!("no node found for `{query}`"),
            }
        }
    }

    Ok(())
}

fn print_outline(tree: &Tree<'_>) {
    for node in &tree.nodes {
        let indent = "  ".repeat(node.depth);
        let kind = node.raw_value.val.kind_desc();
        if node.kind == NodeKind::Primitive {
            println!(
                "{indent}{}: {} ({kind}) {}",
                node.key,
                node.raw_value.val.display_value(),
                node.path
            );
        } else {
            println!("{indent}{} ({kind}) {}", node.key, node.path);
        }
    }
}
