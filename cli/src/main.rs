//! aacorpus CLI - corpus building and POSNoise masking tool
//!
//! A command-line tool for turning raw fiction files into a cleaned,
//! author-balanced corpus and masking it for authorship analysis.

mod download;

use aacorpus::curation::DEFAULT_MIN_LENGTH;
use aacorpus::fs_utils::{list_filepaths, TXT_EXTENSION};
use aacorpus::{
    BatchOptions, BatchReport, CleanupOptions, CountOperator, CurationReport, ErrorMode,
    FileSizeOrder, PosnoiseOptions, ResourceCache,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Authorship-analysis corpus builder
#[derive(Parser)]
#[command(
    name = "aacorpus",
    version,
    about = "Build cleaned author corpora and apply POSNoise masking",
    long_about = "aacorpus - corpus builder for authorship analysis.\n\n\
                  Typical workflow:\n  \
                  aacorpus group <dir>                 Move raw files into author directories\n  \
                  aacorpus clean <dir>                 Clean every document in place\n  \
                  aacorpus prune-length <dir>          Delete short documents\n  \
                  aacorpus timespan <dir>              Keep earliest and latest work per author\n  \
                  aacorpus mask <dir> -o <out>         Write POSNoise-masked copies"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON file with `cleanup`, `posnoise` and `batch` option sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Annotation model (`rule-de`, `spacy:<name>`)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Print the operation report as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Process documents in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Abort on the first failed document
    #[arg(long, global = true)]
    strict: bool,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a raw source file
    Download {
        /// Source URL
        url: String,

        /// Destination file
        dest: PathBuf,
    },

    /// Move `<Author>_-_<Title>.txt` files into per-author directories
    Group {
        /// Directory holding the raw files
        base: PathBuf,
    },

    /// Clean documents in place (destructive)
    Clean {
        /// Files or directories (searched recursively for .txt files)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Character budget per document
        #[arg(long)]
        max_chars: Option<usize>,

        /// Paragraphs need more whitespace tokens than this
        #[arg(long)]
        min_paragraph_tokens: Option<usize>,

        /// Extra `word<TAB>TAG` lexicon for the rule-based tagger
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Delete documents shorter than a character threshold
    PruneLength {
        /// Corpus directory
        base: PathBuf,

        /// Minimum document length in characters
        #[arg(long, default_value_t = DEFAULT_MIN_LENGTH)]
        min_length: usize,
    },

    /// Delete author directories whose document count matches a condition
    PruneAuthors {
        /// Corpus directory
        base: PathBuf,

        /// Comparison (lt, le, eq, ne, ge, gt or <, <=, ==, !=, >=, >)
        #[arg(long, default_value = "lt")]
        op: CountOperator,

        /// Document count compared against
        #[arg(long)]
        threshold: usize,
    },

    /// Keep the first N documents of each author by size
    KeepN {
        /// Corpus directory
        base: PathBuf,

        /// Documents to keep per author
        n: usize,

        /// File size ordering
        #[arg(long, default_value = "descending")]
        order: SizeOrder,
    },

    /// Keep only each author's earliest and latest document
    Timespan {
        /// Corpus directory
        base: PathBuf,
    },

    /// Write POSNoise-masked copies of documents
    Mask {
        /// Files or directories (searched recursively for .txt files)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory (default: next to each input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file suffix
        #[arg(long)]
        suffix: Option<String>,

        /// Newline-delimited safe-pattern file (default: bundled German list)
        #[arg(long)]
        patterns: Option<PathBuf>,

        /// Extra `word<TAB>TAG` lexicon for the rule-based tagger
        #[arg(long)]
        lexicon: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

/// File size ordering
#[derive(Clone, ValueEnum)]
enum SizeOrder {
    /// Directory listing order
    Unordered,
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

impl From<SizeOrder> for FileSizeOrder {
    fn from(order: SizeOrder) -> Self {
        match order {
            SizeOrder::Unordered => FileSizeOrder::Unordered,
            SizeOrder::Ascending => FileSizeOrder::Ascending,
            SizeOrder::Descending => FileSizeOrder::Descending,
        }
    }
}

/// Options file passed with `--config`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    cleanup: CleanupOptions,
    posnoise: PosnoiseOptions,
    batch: BatchOptions,
}

impl Config {
    fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(model) = &cli.model {
        config.posnoise.model = model.clone();
    }
    if cli.parallel {
        config.batch.parallel = true;
    }
    if cli.strict {
        config.batch.error_mode = ErrorMode::Strict;
    }
    let mode = config.batch.error_mode;

    match cli.command {
        Commands::Download { url, dest } => {
            download::run_download(&url, &dest)?;
        }

        Commands::Group { base } => {
            let pb = create_spinner("Grouping documents by author...");
            let report = aacorpus::create_author_corpus(&base, mode)?;
            pb.finish_and_clear();
            print_curation(&report, cli.json)?;
        }

        Commands::Clean {
            inputs,
            max_chars,
            min_paragraph_tokens,
            lexicon,
        } => {
            let mut options = config.cleanup;
            if let Some(chars) = max_chars {
                options = options.with_max_total_chars(chars);
            }
            if let Some(tokens) = min_paragraph_tokens {
                options = options.with_min_paragraph_tokens(tokens);
            }

            let paths = skip_outputs(collect_inputs(&inputs)?, &config.posnoise.output_suffix);
            let pb = create_spinner(&format!("Cleaning {} documents...", paths.len()));
            let cache = build_cache(lexicon, None);
            let annotator = cache.annotator(&config.posnoise.model)?;
            let report = aacorpus::construct_documents(
                &paths,
                &options,
                &config.batch,
                annotator.as_ref(),
            )?;
            pb.finish_and_clear();
            print_batch("Cleaned", &report, cli.json)?;
        }

        Commands::PruneLength { base, min_length } => {
            let report = aacorpus::delete_documents_by_length(&base, min_length)?;
            print_curation(&report, cli.json)?;
        }

        Commands::PruneAuthors { base, op, threshold } => {
            let report = aacorpus::delete_authors_by_file_count(&base, op, threshold)?;
            print_curation(&report, cli.json)?;
        }

        Commands::KeepN { base, n, order } => {
            let report = aacorpus::keep_n_documents_per_author(&base, n, order.into())?;
            print_curation(&report, cli.json)?;
        }

        Commands::Timespan { base } => {
            let report = aacorpus::maximize_time_span(&base, mode)?;
            print_curation(&report, cli.json)?;
        }

        Commands::Mask {
            inputs,
            output,
            suffix,
            patterns,
            lexicon,
        } => {
            let mut options = config.posnoise;
            if let Some(dir) = output {
                options = options.with_output_dir(dir);
            }
            if let Some(suffix) = suffix {
                options = options.with_output_suffix(suffix);
            }

            let paths = skip_outputs(collect_inputs(&inputs)?, &options.output_suffix);

            let pb = create_spinner("Loading annotation model...");
            let cache = build_cache(lexicon, patterns);
            cache.safe_patterns(&options.model)?;
            pb.set_message(format!("Masking {} documents...", paths.len()));
            let report = aacorpus::posnoise_files(&paths, &options, &config.batch, &cache)?;
            pb.finish_and_clear();
            print_batch("Masked", &report, cli.json)?;
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn build_cache(lexicon: Option<PathBuf>, patterns: Option<PathBuf>) -> ResourceCache {
    let mut cache = ResourceCache::new();
    if let Some(path) = lexicon {
        cache = cache.with_lexicon(path);
    }
    if let Some(path) = patterns {
        cache = cache.with_pattern_file(path);
    }
    cache
}

/// Expands directories into their `.txt` files; files are taken as given.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_dir() {
            paths.extend(list_filepaths(input, TXT_EXTENSION, true, false)?);
        } else {
            paths.push(input.clone());
        }
    }
    Ok(paths)
}

/// Drops previously masked outputs, which sit next to their inputs.
fn skip_outputs(paths: Vec<PathBuf>, suffix: &str) -> Vec<PathBuf> {
    paths
        .into_iter()
        .filter(|p| !p.to_string_lossy().ends_with(suffix))
        .collect()
}

fn print_curation(report: &CurationReport, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!("{}", report.operation.green().bold());
    println!("{}", "─".repeat(40));
    if !report.moved.is_empty() {
        println!("{}: {}", "Moved".bold(), report.moved.len());
    }
    println!("{}: {}", "Deleted".bold(), report.deleted.len());
    for path in &report.deleted {
        println!("  {} {}", "-".red(), path.display());
    }
    print_failures(report.failed.iter().map(|f| (&f.path, &f.error)));
    Ok(())
}

fn print_batch(
    verb: &str,
    report: &BatchReport,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    println!(
        "{} {} {} of {} documents",
        "✓".green().bold(),
        verb,
        report.processed.len(),
        report.total()
    );
    print_failures(report.failed.iter().map(|f| (&f.path, &f.error)));
    Ok(())
}

fn print_failures<'a>(failures: impl Iterator<Item = (&'a PathBuf, &'a String)>) {
    for (path, error) in failures {
        println!("  {} {}: {}", "!".yellow().bold(), path.display(), error);
    }
}

fn print_version() {
    println!("{} {}", "aacorpus".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Corpus building and POSNoise masking for authorship analysis");
    println!();
    println!("Annotation models: rule-de (built-in), spacy:<name> (spacy feature)");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_prune_authors_args() {
        let cli = Cli::try_parse_from([
            "aacorpus",
            "prune-authors",
            "corpus",
            "--op",
            "<=",
            "--threshold",
            "2",
        ])
        .unwrap();
        match cli.command {
            Commands::PruneAuthors { op, threshold, .. } => {
                assert_eq!(op, CountOperator::Le);
                assert_eq!(threshold, 2);
            }
            _ => panic!("Expected prune-authors"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli =
            Cli::try_parse_from(["aacorpus", "mask", "corpus", "--model", "de", "--strict", "-v"])
                .unwrap();
        assert_eq!(cli.model.as_deref(), Some("de"));
        assert!(cli.strict);
        assert!(cli.verbose);
    }

    #[test]
    fn test_config_sections() {
        let config: Config = serde_json::from_str(
            r#"{"cleanup": {"max_total_chars": 3000}, "batch": {"parallel": true}}"#,
        )
        .unwrap();
        assert_eq!(config.cleanup.max_total_chars, 3000);
        assert!(config.batch.parallel);
        assert_eq!(config.posnoise.model, aacorpus::DEFAULT_MODEL);
    }

    #[test]
    fn test_collect_inputs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Kafka")).unwrap();
        fs::write(dir.path().join("Kafka").join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();

        let paths = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(paths, vec![dir.path().join("Kafka").join("a.txt")]);
    }

    #[test]
    fn test_skip_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let author = dir.path().join("Kafka");
        fs::create_dir(&author).unwrap();
        fs::write(author.join("a.txt"), "a").unwrap();
        fs::write(author.join("a.posnoise.txt"), "masked").unwrap();

        let inputs = collect_inputs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(inputs.len(), 2);
        let paths = skip_outputs(inputs, ".posnoise.txt");
        assert_eq!(paths, vec![author.join("a.txt")]);
    }
}
