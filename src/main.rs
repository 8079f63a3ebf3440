use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use avl_trace::render::{auto_width, render_ascii, render_frame};
use avl_trace::tree::{self, traversal};
use avl_trace::{calculate_layout_with, LayoutConfig, Operation, Session, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "avl-trace", about = "Replay AVL tree inserts and deletes step by step")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run operations and print every recorded frame.
    Trace {
        /// Operations in order: i<key> inserts, d<key> deletes (e.g. i30 i20 i10 d20).
        #[arg(required = true)]
        ops: Vec<Operation>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// y coordinate of the root.
        #[arg(long, default_value_t = 8.0)]
        base_offset: f64,
        /// y distance between depths.
        #[arg(long, default_value_t = 12.0)]
        vertical_spacing: f64,
    },
    /// Apply operations and print only the resulting tree.
    Build {
        /// Operations in order: i<key> inserts, d<key> deletes.
        #[arg(required = true)]
        ops: Vec<Operation>,
        /// Undo this many operations at the end.
        #[arg(long, default_value_t = 0)]
        undo: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "avl_trace=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Trace {
            ops,
            format,
            base_offset,
            vertical_spacing,
        } => run_trace(ops, format, LayoutConfig::new(base_offset, vertical_spacing))?,
        Commands::Build { ops, undo } => run_build(ops, undo)?,
    }

    Ok(())
}

fn session_for(ops: &[Operation], layout: LayoutConfig) -> Session {
    let mut session = Session::new(SessionConfig {
        layout,
        autoplay: false,
        ..SessionConfig::default()
    });
    for &op in ops {
        session.apply(op);
    }
    session
}

fn run_trace(ops: Vec<Operation>, format: Format, layout: LayoutConfig) -> Result<()> {
    let session = session_for(&ops, layout);

    match format {
        Format::Text => {
            for (entry_idx, entry) in session.history().iter().enumerate() {
                let end = session
                    .history()
                    .get(entry_idx + 1)
                    .map_or(session.steps().len(), |next| next.step_index_at_start);
                println!("=== {} ===", entry.label);
                for index in entry.step_index_at_start..end {
                    print!("{}", render_frame(index, &session.steps()[index]));
                }
                println!();
            }
        }
        Format::Json => print_json(&session)?,
    }

    Ok(())
}

#[cfg(feature = "visualize")]
fn print_json(session: &Session) -> Result<()> {
    let json = serde_json::to_string_pretty(session.steps())
        .context("failed to serialize frame trail")?;
    println!("{json}");
    Ok(())
}

#[cfg(not(feature = "visualize"))]
fn print_json(_session: &Session) -> Result<()> {
    anyhow::bail!("JSON output requires building with the `visualize` feature")
}

fn run_build(ops: Vec<Operation>, undo: usize) -> Result<()> {
    let mut session = session_for(&ops, LayoutConfig::default());
    for _ in 0..undo {
        let entry = session
            .undo()
            .with_context(|| format!("cannot undo {undo} of {} operations", ops.len()))?;
        println!("undone: {}", entry.label);
    }

    let root = session.root();
    let laid_out = calculate_layout_with(root, &session.config().layout);
    print!("{}", render_ascii(laid_out.as_deref(), auto_width(laid_out.as_deref()), None));

    let inorder: Vec<String> = traversal::inorder(root)
        .iter()
        .map(|n| n.to_string())
        .collect();
    println!("inorder: {}", inorder.join(" "));
    println!(
        "nodes={}\theight={}\tfingerprint={}",
        tree::len(root),
        tree::height(root),
        traversal::fingerprint(root).to_hex()
    );

    Ok(())
}
