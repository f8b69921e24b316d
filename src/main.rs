use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use degree_trend::pipeline::{analyze_dir, write_matrices};
use degree_trend::sink;
use degree_trend::trend::{rank_tissue, RankOptions};
use degree_trend::{AgeGroups, CorpusConfig};

/// Build gene in-degree and change matrices, or rank genes by trend score.
#[derive(Parser, Debug)]
#[command(name = "degree-trend")]
#[command(author, version, about)]
struct Cli {
    /// Emit JSON log lines instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read <input>/<age>/*.csv edge lists and write both matrices
    Build(BuildArgs),

    /// Score a change matrix and write the ranked genes of one tissue
    Rank(RankArgs),
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Base folder holding one sub-folder per age group
    #[arg(long, short)]
    input: PathBuf,

    /// Ordered age-group labels (comma separated)
    #[arg(long, default_value = "20,30,40,50,60,70")]
    ages: AgeGroups,

    /// Header of the source gene column
    #[arg(long, value_name = "NAME", default_value = "GeneA")]
    source_column: String,

    /// Header of the target gene column
    #[arg(long, value_name = "NAME", default_value = "GeneB")]
    target_column: String,

    /// Output CSV for the in-degree matrix
    #[arg(long, default_value = "output/gene_degree_matrix.csv")]
    degree_out: PathBuf,

    /// Output CSV for the change matrix
    #[arg(long, default_value = "output/gene_degree_changes.csv")]
    change_out: PathBuf,
}

#[derive(Args, Debug)]
struct RankArgs {
    /// Change matrix CSV written by `build`
    #[arg(long, short)]
    changes: PathBuf,

    /// Tissue to rank
    #[arg(long, short)]
    tissue: String,

    /// Output CSV for the ranked `Gene,TrendScore` series
    #[arg(long, short)]
    out: PathBuf,

    /// Also write every tissue's rows with a TrendScore column
    #[arg(long)]
    all_out: Option<PathBuf>,

    /// Leave out genes whose trend score is 0
    #[arg(long)]
    nonzero_only: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_env("DEGREE_TREND_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.cmd {
        Command::Build(args) => {
            let config = CorpusConfig::new()
                .age_groups(args.ages)
                .source_column(&args.source_column)
                .target_column(&args.target_column);

            let analysis = analyze_dir(&args.input, &config);

            write_matrices(&analysis, &args.degree_out, &args.change_out)
                .with_context(|| format!("writing matrices for {}", args.input.display()))?;
        }

        Command::Rank(args) => {
            let f = sink::open_file(&args.changes)?;
            let matrix = sink::read_change_matrix(f)
                .with_context(|| format!("reading change matrix {}", args.changes.display()))?;

            if let Some(all_out) = &args.all_out {
                let w = sink::create_file(all_out)?;
                sink::write_scored_changes(&matrix, w)
                    .with_context(|| format!("writing scored changes to {}", all_out.display()))?;
                info!(path = %all_out.display(), "scored changes written");
            }

            let opts = RankOptions {
                nonzero_only: args.nonzero_only,
            };
            let ranked = rank_tissue(&matrix, &args.tissue, opts);
            if ranked.is_empty() {
                warn!(tissue = %args.tissue, "no genes to rank for this tissue");
            }

            let w = sink::create_file(&args.out)?;
            sink::write_ranked(&ranked, w)
                .with_context(|| format!("writing ranked genes to {}", args.out.display()))?;
            info!(path = %args.out.display(), tissue = %args.tissue, genes = ranked.len(), "ranked series written");
        }
    }

    Ok(())
}
