use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use upstarter::analysis::StartupAnalyzer;
use upstarter::store::{resolve, AnalysisRepository, JsonFileRepository, StoredAnalysis};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a business plan (text) or questionnaire (.yaml/.json)
    Analyze {
        /// Input file
        file: PathBuf,

        /// Override the project title
        #[arg(short, long)]
        title: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Save the result to the analysis store
        #[arg(short, long)]
        save: bool,
    },
    /// List saved analyses, newest first
    List,
    /// Show a saved analysis by id or list index
    Show {
        /// Analysis id or 1-based index as shown in list
        id: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a saved analysis by id or list index
    Delete {
        /// Analysis id or 1-based index as shown in list
        id: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "upstarter")]
#[command(about = "Rule-based startup analysis and valuation CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/upstarter/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match upstarter::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate engine config at startup
    let analyzer = match StartupAnalyzer::try_new(config.engine.clone().unwrap_or_default()) {
        Ok(a) => a,
        Err(errors) => {
            eprintln!("Engine config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    };

    let store_path = match config.store_path.clone() {
        Some(p) => p,
        None => match upstarter::store::get_store_path() {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Store error: {:#}", e);
                std::process::exit(EXIT_STORE);
            }
        },
    };

    if cli.verbose {
        let weights = analyzer.config().effective_weights();
        eprintln!("Score weights:");
        for (name, weight) in weights.entries() {
            eprintln!("  {}: {:.2}", name, weight);
        }
        eprintln!("Store: {}", store_path.display());
    }

    let use_colors = upstarter::output::should_use_colors();

    match cli.command {
        Commands::Analyze {
            file,
            title,
            json,
            save,
        } => {
            let input = match upstarter::loader::load_input(&file, title.as_deref()) {
                Ok(i) => i,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if cli.verbose {
                eprintln!("Read {} as {:?} input", file.display(), input.mode());
            }

            let analysis_start = Instant::now();
            let result = analyzer.analyze(&input);

            if cli.verbose {
                eprintln!(
                    "Analyzed '{}' in {:?}: score {}, {} missing areas",
                    result.project_name,
                    analysis_start.elapsed(),
                    result.overall_score,
                    result.missing_areas.len()
                );
                let f = &result.features;
                eprintln!(
                    "  Features: {} words, team of {}, stage {}",
                    f.word_count,
                    f.team_size,
                    f.stage_or_idea()
                );
            }

            let saved_id = if save {
                let mut repo = open_store(&store_path);
                let id = repo.next_id();
                let record = StoredAnalysis::new(id.clone(), chrono::Utc::now(), result.clone());
                if let Err(e) = repo.set(record) {
                    eprintln!("Failed to save analysis: {:#}", e);
                    std::process::exit(EXIT_STORE);
                }
                Some(id)
            } else {
                None
            };

            print_result(&result, json, use_colors);

            if let Some(id) = saved_id {
                eprintln!("Saved as {}", id);
            }
        }
        Commands::List => {
            let repo = open_store(&store_path);
            let records = match repo.list() {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to list analyses: {:#}", e);
                    std::process::exit(EXIT_STORE);
                }
            };
            println!(
                "{}",
                upstarter::output::format_analysis_table(&records, use_colors)
            );

            if cli.verbose {
                eprintln!();
                eprintln!("Total: {} analyses", records.len());
            }
        }
        Commands::Show { id, json } => {
            let repo = open_store(&store_path);
            let record = find_or_exit(&repo, &id);
            print_result(&record.result, json, use_colors);
        }
        Commands::Delete { id } => {
            let mut repo = open_store(&store_path);
            let record = find_or_exit(&repo, &id);
            match repo.delete(&record.id) {
                Ok(_) => println!("Deleted {} ({})", record.id, record.project_name),
                Err(e) => {
                    eprintln!("Failed to delete analysis: {:#}", e);
                    std::process::exit(EXIT_STORE);
                }
            }
        }
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }

    std::process::exit(EXIT_SUCCESS);
}

fn open_store(path: &std::path::Path) -> JsonFileRepository {
    match JsonFileRepository::open(path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Store error: {:#}", e);
            std::process::exit(EXIT_STORE);
        }
    }
}

fn find_or_exit(repo: &JsonFileRepository, key: &str) -> StoredAnalysis {
    match resolve(repo, key) {
        Ok(Some(record)) => record,
        Ok(None) => {
            eprintln!("No saved analysis matches '{}'.", key);
            std::process::exit(EXIT_INPUT);
        }
        Err(e) => {
            eprintln!("Store error: {:#}", e);
            std::process::exit(EXIT_STORE);
        }
    }
}

fn print_result(result: &upstarter::analysis::AnalysisResult, json: bool, use_colors: bool) {
    if json {
        match serde_json::to_string_pretty(result) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                std::process::exit(EXIT_INPUT);
            }
        }
    } else {
        println!("{}", upstarter::output::format_report(result, use_colors));
    }
}
