use anyhow::{bail, Context, Result};
use benchnorm::{output, pipeline, Attach, Catalogue, Dataset, Format, Selection};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Merge benchmark run CSVs into one time-normalized table"
)]
struct Args {
    /// Directory holding the run files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Named dataset (see --list-datasets)
    #[arg(long, conflicts_with_all = ["glob", "files"])]
    dataset: Option<String>,

    /// Wildcard pattern relative to --dir, e.g. "*,burst,*.csv"
    #[arg(long, conflicts_with = "files")]
    glob: Option<String>,

    /// Explicit run file, repeatable; processed in the given order
    #[arg(long = "file", value_name = "NAME")]
    files: Vec<String>,

    /// YAML manifest with extra datasets
    #[arg(long)]
    manifest: Option<PathBuf>,

    /// Output encoding: csv, json or parquet
    #[arg(long, default_value_t = Format::Csv)]
    format: Format,

    /// Write here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Attach every filename parameter instead of the dataset's fields
    #[arg(long)]
    raw_params: bool,

    /// Print the known datasets and exit
    #[arg(long)]
    list_datasets: bool,
}

fn main() -> Result<()> {
    // ─── 1) init logging, stdout is reserved for data ────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // ─── 2) dataset catalogue ────────────────────────────────────────
    let mut catalogue = Catalogue::builtin();
    if let Some(manifest) = &args.manifest {
        catalogue
            .load_manifest(manifest)
            .with_context(|| format!("loading manifest {}", manifest.display()))?;
    }

    if args.list_datasets {
        for ds in catalogue.iter() {
            println!("{}", describe(ds));
        }
        return Ok(());
    }

    // ─── 3) pick what to merge ───────────────────────────────────────
    let mut dataset = match (&args.dataset, &args.glob, args.files.is_empty()) {
        (Some(name), _, _) => catalogue.get(name)?.clone(),
        (None, Some(pattern), _) => Dataset {
            name: "glob".into(),
            selection: Selection::Glob(pattern.clone()),
            attach: Attach::default(),
        },
        (None, None, false) => Dataset {
            name: "files".into(),
            selection: Selection::Explicit(args.files.clone()),
            attach: Attach::default(),
        },
        (None, None, true) => bail!("nothing to merge: pass --dataset, --glob or --file"),
    };
    if args.raw_params {
        dataset.attach = Attach::RawParams;
    }

    if args.format == Format::Parquet && args.output.is_none() {
        bail!("parquet output needs --output");
    }

    // ─── 4) run, then write only once everything succeeded ──────────
    let table = pipeline::run(&args.dir, &dataset)
        .with_context(|| format!("building dataset `{}`", dataset.name))?;

    match &args.output {
        Some(path) => output::write_file(&table, args.format, path)
            .with_context(|| format!("writing {}", path.display()))?,
        None => output::write_stdout(&table, args.format).context("writing stdout")?,
    }

    info!(rows = table.len(), "done");
    Ok(())
}

fn describe(ds: &Dataset) -> String {
    let selection = match &ds.selection {
        Selection::Explicit(files) => files.join(" "),
        Selection::Glob(pattern) => format!("glob {}", pattern),
    };
    let fields = match &ds.attach {
        Attach::RawParams => "all parameters".to_string(),
        Attach::Projection(specs) => specs
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(","),
    };
    format!("{:<24} [{}] {}", ds.name, fields, selection)
}
