//! Loregraph CLI
//!
//! Inspect saved knowledge-graph query results from the terminal:
//! - summarize a result set (classification, node/relationship counts)
//! - print the tabular projection (or the record listing when it can't be built)
//! - export the graph view as JSON, Graphviz DOT or an HTML explorer page
//! - list the predefined exploration queries

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::env;
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};

use loregraph_core::config::EndpointResolution;
use loregraph_core::project::{project_with, ProjectOptions};
use loregraph_core::queries::{quick_action, quick_actions};
use loregraph_core::record::{read_records, Record};
use loregraph_core::session::GraphView;
use loregraph_core::stats::GraphStats;
use loregraph_core::{fallback_listing, is_graph_result, ExplorerConfig, ResultView};

mod render;
mod viz;

const ENV_LOG: &str = "LOREGRAPH_LOG";

#[derive(Parser)]
#[command(name = "loregraph")]
#[command(
    author,
    version,
    about = "Loregraph: explore knowledge-graph query results as tables and networks"
)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace). Defaults to `LOREGRAPH_LOG` or warn.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record count, classification and graph statistics for a result file.
    Summary {
        /// JSON array of records (`-` for stdin).
        results: PathBuf,
        /// Resolve relationship endpoints in visit order instead of two passes.
        #[arg(long)]
        visit_order: bool,
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the tabular projection of a result file.
    ///
    /// When no table can be built, the error is reported and the first records
    /// are listed instead.
    Table {
        /// JSON array of records (`-` for stdin).
        results: PathBuf,
        /// Use the generic layout even for graph results.
        #[arg(long)]
        generic: bool,
        /// Emit the table as JSON (`columns` + `rows`).
        #[arg(long)]
        json: bool,
    },

    /// Export the node-link view of a result file.
    Graph {
        /// JSON array of records (`-` for stdin).
        results: PathBuf,
        /// Output format: json|dot|html.
        #[arg(long, default_value = "html")]
        format: String,
        /// Write to this file instead of stdout.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Resolve relationship endpoints in visit order instead of two passes.
        #[arg(long)]
        visit_order: bool,
    },

    /// Pretty-print the records verbatim.
    Raw {
        /// JSON array of records (`-` for stdin).
        results: PathBuf,
    },

    /// List the predefined exploration queries, or print one by key.
    Queries {
        #[arg(long)]
        key: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Summary {
            results,
            visit_order,
            json,
        } => cmd_summary(&results, visit_order, json),
        Commands::Table {
            results,
            generic,
            json,
        } => cmd_table(&results, generic, json),
        Commands::Graph {
            results,
            format,
            out,
            visit_order,
        } => cmd_graph(&results, &format, out.as_deref(), visit_order),
        Commands::Raw { results } => cmd_raw(&results),
        Commands::Queries { key } => cmd_queries(key.as_deref()),
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => match env::var(ENV_LOG) {
            Ok(raw) => raw
                .trim()
                .parse::<Level>()
                .map_err(|e| anyhow!("{ENV_LOG}=`{raw}`: {e}"))?,
            Err(_) => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

fn load_config(visit_order: bool) -> Result<ExplorerConfig> {
    let mut config = ExplorerConfig::from_env().context("invalid LOREGRAPH_* environment")?;
    if visit_order {
        config.endpoint_resolution = EndpointResolution::VisitOrder;
    }
    debug!(?config, "loaded configuration");
    Ok(config)
}

fn read_results(path: &Path) -> Result<Vec<Record>> {
    let records = if path == Path::new("-") {
        read_records(io::stdin().lock()).context("failed to load results from stdin")?
    } else {
        let file =
            fs::File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        read_records(BufReader::new(file))
            .with_context(|| format!("failed to load results from {}", path.display()))?
    };
    debug!(records = records.len(), path = %path.display(), "loaded results");
    Ok(records)
}

fn info_line(message: &str) {
    eprintln!("{} {}", "info:".yellow().bold(), message);
}

#[derive(Serialize)]
struct Summary {
    records: usize,
    graph_like: bool,
    stats: GraphStats,
}

fn cmd_summary(results: &Path, visit_order: bool, json: bool) -> Result<()> {
    let config = load_config(visit_order)?;
    let records = read_results(results)?;
    let view = ResultView::build(&records, &config);
    let (stats, placeholders) = match &view {
        ResultView::Populated {
            graph: GraphView::Ready {
                extraction, stats, ..
            },
            ..
        } => (stats.clone(), extraction.placeholder_count()),
        _ => (GraphStats::default(), 0),
    };
    let summary = Summary {
        records: view.record_count(),
        graph_like: view.is_graph_like(),
        stats,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("records: {}", summary.records);
    println!(
        "result kind: {}",
        if summary.graph_like { "graph" } else { "tabular" }
    );
    print!("{}", render::render_stats(&summary.stats));
    if placeholders > 0 {
        info_line(&format!(
            "{placeholders} referenced node(s) were not returned by the query"
        ));
    }
    Ok(())
}

fn cmd_table(results: &Path, generic: bool, json: bool) -> Result<()> {
    let config = load_config(false)?;
    let records = read_results(results)?;
    if records.is_empty() {
        info_line("no results");
        return Ok(());
    }

    let graph_like = !generic && is_graph_result(&records);
    match project_with(&records, graph_like, &ProjectOptions::default()) {
        Ok(table) if json => println!("{}", serde_json::to_string_pretty(&table)?),
        Ok(table) => print!("{}", render::render_table(&table)),
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            for line in fallback_listing(&records, config.fallback_limit) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn cmd_graph(results: &Path, format: &str, out: Option<&Path>, visit_order: bool) -> Result<()> {
    let format = viz::VizFormat::parse(format)?;
    let config = load_config(visit_order)?;
    let records = read_results(results)?;

    let ResultView::Populated {
        graph: GraphView::Ready {
            extraction,
            stats,
            canvas,
        },
        ..
    } = ResultView::build(&records, &config)
    else {
        info_line("no graph data to visualize; return nodes, relationships or paths to see a network");
        return Ok(());
    };

    let doc = viz::VizDocument::new(extraction, stats, canvas);
    let rendered = viz::render(&doc, format)?;
    match out {
        Some(path) => {
            fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!(
                "{} {} ({} nodes, {} relationships)",
                "wrote".green().bold(),
                path.display().to_string().bold(),
                doc.stats.nodes,
                doc.stats.relationships
            );
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn cmd_raw(results: &Path) -> Result<()> {
    let records = read_results(results)?;
    let raw: Vec<serde_json::Value> = records.into_iter().map(serde_json::Value::Object).collect();
    println!("{}", serde_json::to_string_pretty(&raw)?);
    Ok(())
}

fn cmd_queries(key: Option<&str>) -> Result<()> {
    if let Some(key) = key {
        let action = quick_action(key).ok_or_else(|| {
            let known: Vec<&str> = quick_actions().iter().map(|a| a.key).collect();
            anyhow!("unknown quick action `{key}` (expected {})", known.join("|"))
        })?;
        println!("{}", action.query);
        return Ok(());
    }

    for action in quick_actions() {
        let marker = if action.show_network_message {
            " [network]".cyan().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {}{}",
            format!("{:<16}", action.key).bold(),
            action.button_text,
            marker
        );
    }
    Ok(())
}
