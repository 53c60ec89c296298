use anyhow::Result;
use benchnorm::{params::ParsedParams, resolve, Selection};
use clap::Parser;
use std::path::PathBuf;

/// Show how run filenames decode into parameters.
#[derive(Parser)]
#[command(author, version, about = "Decode benchmark run filenames")]
struct Args {
    /// Directory holding the run files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Wildcard pattern relative to --dir
    #[arg(long, default_value = "*.csv")]
    glob: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let paths = resolve::resolve(&args.dir, &Selection::Glob(args.glob.clone()))?;

    if paths.is_empty() {
        println!("no files match {} in {}", args.glob, args.dir.display());
        return Ok(());
    }

    println!("{: <50} {: <20} {}", "File", "Positional", "Keyed");
    println!("{:-<90}", "");
    for path in &paths {
        let params = ParsedParams::from_path(path);
        let positional = params
            .positional()
            .map(|(i, v)| format!("{}:{}", i, v))
            .collect::<Vec<_>>()
            .join(" ");
        let keyed = params
            .keyed()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(" ");
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("{: <50} {: <20} {}", name, positional, keyed);
    }

    Ok(())
}
