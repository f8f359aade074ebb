//! Development tasks for the tree tensor network workspace.
//!
//! Usage: `cargo xtask <command>`

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for the ttn workspace")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, test, doc)
    Ci,
    /// Build documentation and list the documented crates
    Doc {
        /// Open documentation in browser after generation
        #[arg(long)]
        open: bool,
    },
    /// Run the construction benchmarks
    Bench {
        /// Only run benchmarks whose name matches this filter
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = project_root()?;

    match cli.command {
        Commands::Ci => cmd_ci(&root),
        Commands::Doc { open } => cmd_doc(&root, open),
        Commands::Bench { filter } => cmd_bench(&root, filter.as_deref()),
    }
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask must live one level below the workspace root")
}

fn cmd_ci(root: &Path) -> Result<()> {
    println!("Running cargo fmt...");
    run_cargo(root, &["fmt", "--all", "--", "--check"])?;

    println!("Running cargo clippy...");
    run_cargo(root, &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])?;

    println!("Running cargo test...");
    run_cargo(root, &["test", "--workspace"])?;

    println!("Checking documentation...");
    run_cargo(root, &["doc", "--workspace", "--no-deps"])?;

    println!("All CI checks passed");
    Ok(())
}

fn cmd_doc(root: &Path, open: bool) -> Result<()> {
    let mut args = vec!["doc", "--workspace", "--no-deps"];
    if open {
        args.push("--open");
    }
    run_cargo(root, &args)?;

    for (name, description) in workspace_crates(root)? {
        let doc_dir = root.join("target/doc").join(name.replace('-', "_"));
        println!("  {:<10} {}  ({})", name, description, doc_dir.display());
    }
    Ok(())
}

fn cmd_bench(root: &Path, filter: Option<&str>) -> Result<()> {
    let mut args = vec!["bench", "-p", "ttn-tree", "--bench", "construction"];
    if let Some(filter) = filter {
        args.extend(["--", filter]);
    }
    run_cargo(root, &args)
}

fn run_cargo(dir: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}

/// `(name, description)` of every crate under `crates/`, sorted by name.
fn workspace_crates(root: &Path) -> Result<Vec<(String, String)>> {
    let crates_dir = root.join("crates");
    let mut crates = Vec::new();

    for entry in fs::read_dir(&crates_dir).context("Failed to read crates directory")? {
        let manifest = entry?.path().join("Cargo.toml");
        if !manifest.exists() {
            continue;
        }
        let content = fs::read_to_string(&manifest)?;
        let toml: toml::Value = content
            .parse()
            .with_context(|| format!("Failed to parse {}", manifest.display()))?;

        let package = toml.get("package");
        let name = package
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or_default();
        let description = package
            .and_then(|p| p.get("description"))
            .and_then(|d| d.as_str())
            .unwrap_or("(no description)");

        if !name.is_empty() {
            crates.push((name.to_string(), description.to_string()));
        }
    }

    crates.sort();
    Ok(crates)
}
