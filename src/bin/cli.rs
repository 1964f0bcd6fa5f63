//! Canada Job Bank Scraper CLI
//!
//! Searches jobbank.gc.ca through a headless browser, persists postings in
//! a local SQLite store and exports them to CSV/JSON/Excel.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use jobbank::{
    error::{AppError, Result},
    export::Format,
    models::Config,
    pipeline::{self, BatchOptions, RunOptions},
    services::SearchQuery,
    utils,
};

/// jobbank - Canada Job Bank job-posting scraper
#[derive(Parser, Debug)]
#[command(name = "jobbank", version, about = "Scrapes job postings from the Canada Job Bank")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "jobbank.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for jobs and export the results
    Search {
        /// Job keyword or title
        #[arg(short, long, default_value = "")]
        keyword: String,

        /// Location (city, province, or postal code)
        #[arg(short, long, default_value = "")]
        location: String,

        /// Maximum number of pages to scrape
        #[arg(short, long, default_value_t = 1)]
        pages: u32,

        /// Output file (default: {output.dir}/jobbank_jobs_{timestamp}.{ext})
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Only keep jobs posted directly on the Job Bank
        #[arg(long)]
        job_bank_only: bool,

        /// Skip the persisted store, export to file only
        #[arg(long)]
        no_db: bool,

        /// Run the browser in visible mode
        #[arg(long)]
        no_headless: bool,
    },

    /// Run multiple searches from a TOML batch file
    Batch {
        /// Batch file with [[searches]] entries
        file: PathBuf,

        /// Output format for every search
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Only keep jobs posted directly on the Job Bank
        #[arg(long)]
        job_bank_only: bool,

        /// Skip the persisted store, export to files only
        #[arg(long)]
        no_db: bool,

        /// Run the browser in visible mode
        #[arg(long)]
        no_headless: bool,
    },

    /// Show persisted store statistics
    Stats,

    /// Export the persisted store to a file
    Export {
        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Csv)]
        format: Format,

        /// Only export jobs from one source (e.g. "Job Bank", "Indeed")
        #[arg(long)]
        source: Option<String>,

        /// Include jobs marked inactive
        #[arg(long)]
        include_inactive: bool,
    },
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Search {
            keyword,
            location,
            pages,
            output,
            format,
            job_bank_only,
            no_db,
            no_headless,
        } => {
            if keyword.trim().is_empty() && location.trim().is_empty() {
                return Err(AppError::config(
                    "provide at least a keyword (-k) or a location (-l)",
                ));
            }

            let output = output.unwrap_or_else(|| {
                config
                    .output
                    .dir
                    .join(utils::default_output_stem())
                    .with_extension(format.extension())
            });
            let query = SearchQuery {
                keyword,
                location,
                max_pages: pages,
                job_bank_only,
            };
            let options = RunOptions {
                headless: config.scraper.headless && !no_headless,
                use_store: !no_db,
                output,
                format,
            };

            let report = pipeline::run_search(&config, &query, &options)?;
            log::info!(
                "Done: {} posting(s), {}",
                report.outcome.postings.len(),
                report.output.display()
            );
        }

        Command::Batch {
            file,
            format,
            job_bank_only,
            no_db,
            no_headless,
        } => {
            let options = BatchOptions {
                headless: config.scraper.headless && !no_headless,
                use_store: !no_db,
                job_bank_only,
                format,
            };
            pipeline::run_batch(&config, &file, &options)?;
        }

        Command::Stats => pipeline::run_stats(&config)?,

        Command::Export {
            output,
            format,
            source,
            include_inactive,
        } => {
            pipeline::run_export(&config, &output, format, source.as_deref(), include_inactive)?;
        }
    }

    Ok(())
}
