use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use genbank_harvester::app::{App, RunOptions, RunSummary};
use genbank_harvester::domain::{LengthFilter, TaxonId};
use genbank_harvester::entrez::{EntrezCredentials, EntrezHttpClient};
use genbank_harvester::error::HarvestError;
use genbank_harvester::fasta::{self, SequenceId};
use genbank_harvester::output::JsonOutput;
use genbank_harvester::retriever::Retriever;

#[derive(Parser)]
#[command(name = "gb-harvest")]
#[command(about = "Fetch nucleotide records from NCBI GenBank by taxid, with length filtering, a CSV report and a length chart")]
#[command(version, author)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Search GenBank by taxid and write the report artifacts")]
    Fetch(FetchArgs),
    #[command(about = "Generate random DNA sequences as FASTA files")]
    Generate(GenerateArgs),
}

#[derive(Args)]
struct FetchArgs {
    taxid: String,

    #[arg(long)]
    email: String,

    #[arg(long)]
    api_key: Option<String>,

    #[arg(long)]
    min_length: Option<u64>,

    #[arg(long)]
    max_length: Option<u64>,

    #[arg(long, default_value_t = 0)]
    start: u64,

    #[arg(long, default_value_t = 10)]
    max_records: u64,

    #[arg(long, default_value = ".")]
    outdir: Utf8PathBuf,

    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct GenerateArgs {
    length: usize,

    #[arg(long = "id", required = true)]
    ids: Vec<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long, default_value = "AAA")]
    tag: String,

    #[arg(long, default_value = ".")]
    outdir: Utf8PathBuf,

    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(harvest) = report.downcast_ref::<HarvestError>() {
            return ExitCode::from(map_exit_code(harvest));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &HarvestError) -> u8 {
    match error {
        HarvestError::TaxonNotFound(_)
        | HarvestError::InvalidTaxonId(_)
        | HarvestError::InvalidSequenceId(_) => 2,
        HarvestError::EntrezHttp(_)
        | HarvestError::EntrezStatus { .. }
        | HarvestError::MalformedResponse(_) => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Fetch(args) => run_fetch(args),
        Commands::Generate(args) => run_generate(args),
    }
}

fn run_fetch(args: FetchArgs) -> miette::Result<()> {
    let taxid: TaxonId = args.taxid.parse().into_diagnostic()?;
    let filter = LengthFilter {
        min: args.min_length,
        max: args.max_length,
    };
    let credentials = match args.api_key {
        Some(api_key) => EntrezCredentials::new(args.email).with_api_key(api_key),
        None => EntrezCredentials::from_env(args.email),
    };
    let gateway = EntrezHttpClient::new(credentials).into_diagnostic()?;
    let app = App::new(Retriever::new(gateway));

    let options = RunOptions {
        taxid,
        filter,
        start: args.start,
        max_records: args.max_records,
        outdir: args.outdir,
    };
    let summary = app.run(&options).into_diagnostic()?;

    if args.json {
        JsonOutput::print_run(&summary).into_diagnostic()?;
    } else {
        print_run_summary(&summary);
    }
    Ok(())
}

fn print_run_summary(summary: &RunSummary) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let reset = "\x1b[0m";

    if let Some(organism) = &summary.organism {
        println!("{cyan}Organism: {organism} (TaxID: {}){reset}", summary.taxid);
    }
    if summary.total_count == 0 {
        println!("{yellow}No records matched the criteria.{reset}");
        return;
    }
    println!(
        "{green}Found {} records meeting the criteria.{reset}",
        summary.total_count
    );
    println!("Fetched {} records.", summary.fetched);
    match &summary.report_path {
        Some(path) => println!("{green}CSV report saved to {path}{reset}"),
        None => println!("{yellow}CSV report was not written.{reset}"),
    }
    match &summary.plot_path {
        Some(path) => println!("{green}Plot saved to {path}{reset}"),
        None => println!("{yellow}Plot was not written.{reset}"),
    }
}

fn run_generate(args: GenerateArgs) -> miette::Result<()> {
    std::fs::create_dir_all(args.outdir.as_std_path())
        .map_err(|err| HarvestError::Filesystem(err.to_string()))
        .into_diagnostic()?;

    let mut rng: StdRng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for raw_id in &args.ids {
        let id: SequenceId = raw_id.parse().into_diagnostic()?;
        let sequence = fasta::generate_dna_sequence(&mut rng, args.length);
        let stats = fasta::NucleotideStats::from_sequence(&sequence);
        let tagged = fasta::insert_tag(&mut rng, &sequence, &args.tag);
        let content = fasta::format_fasta(
            &id,
            args.description.as_deref().unwrap_or(""),
            &tagged,
        );

        let path = args.outdir.join(format!("{id}.fasta"));
        std::fs::write(path.as_std_path(), content)
            .map_err(|err| HarvestError::Filesystem(err.to_string()))
            .into_diagnostic()?;
        println!("Saved sequence to {path}");
        print_sequence_stats(&id, &args.tag, &stats);
    }
    Ok(())
}

fn print_sequence_stats(id: &SequenceId, tag: &str, stats: &fasta::NucleotideStats) {
    println!("Statistics for sequence {id} (tag '{tag}' excluded):");
    for base in ['A', 'C', 'G', 'T'] {
        println!(
            "  {base}: {:.2}% ({} nucleotides)",
            stats.percent(base),
            stats.count(base)
        );
    }
    match stats.cg_at_ratio() {
        Some(ratio) => println!("  (C+G)/(A+T) ratio: {ratio:.2}"),
        None => println!("  (C+G)/(A+T) ratio: undefined (no A or T present)"),
    }
}
