use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use headline_topics::config::Config;
use headline_topics::output::terminal;
use headline_topics::{persist, pipeline};

/// Headline topics: discover latent topics in a CSV of news headlines.
///
/// Headlines are cleaned, tokenized, stemmed and counted, then an LDA topic
/// model is fitted with online variational Bayes.
#[derive(Parser)]
#[command(name = "headline-topics", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Settings shared by every subcommand that reads the CSV.
#[derive(clap::Args, Debug, Default)]
struct CorpusArgs {
    /// Path to the headline CSV (overrides TOPICS_CSV_PATH)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Rows kept after preprocessing, 0 for all (overrides TOPICS_ROW_LIMIT)
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and print topics
    Run {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Maximum vocabulary size
        #[arg(long)]
        vocab_size: Option<usize>,

        /// Minimum document frequency (absolute when >= 1, fraction otherwise)
        #[arg(long)]
        min_df: Option<f64>,

        /// Number of topics
        #[arg(long, short = 'k')]
        topics: Option<usize>,

        /// Training iterations
        #[arg(long)]
        max_iter: Option<usize>,

        /// Fixed random seed for reproducible topics
        #[arg(long)]
        seed: Option<u64>,

        /// Words printed per topic
        #[arg(long)]
        terms_per_topic: Option<usize>,

        /// Show the weight next to each topic word
        #[arg(long)]
        weights: bool,

        /// Preview topic mixtures for the first N headlines
        #[arg(long, value_name = "N")]
        doc_topics: Option<usize>,

        /// Save the fitted model and vocabulary as JSON
        #[arg(long, value_name = "PATH")]
        save_model: Option<PathBuf>,
    },

    /// Preview the tokens produced by preprocessing
    Tokens {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Number of rows to show (default: 20)
        #[arg(long, default_value = "20")]
        rows: usize,
    },

    /// Build the vocabulary and print its most frequent terms
    Vocab {
        #[command(flatten)]
        corpus: CorpusArgs,

        /// Number of terms to show (default: 50)
        #[arg(long, default_value = "50")]
        top: usize,
    },

    /// Print the topics of a saved model
    Describe {
        /// Path written by `run --save-model`
        #[arg(long)]
        model: PathBuf,

        /// Words printed per topic (default: 10)
        #[arg(long, default_value = "10")]
        terms_per_topic: usize,

        /// Show the weight next to each topic word
        #[arg(long)]
        weights: bool,
    },
}

impl CorpusArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(csv) = &self.csv {
            config.csv_path = csv.clone();
        }
        if let Some(limit) = self.limit {
            config.row_limit = limit;
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("headline_topics=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            corpus,
            vocab_size,
            min_df,
            topics,
            max_iter,
            seed,
            terms_per_topic,
            weights,
            doc_topics,
            save_model,
        } => {
            let mut config = Config::load()?;
            corpus.apply(&mut config);
            if let Some(v) = vocab_size {
                config.vocab_size = v;
            }
            if let Some(v) = min_df {
                config.min_df = v;
            }
            if let Some(v) = topics {
                config.num_topics = v;
            }
            if let Some(v) = max_iter {
                config.max_iter = v;
            }
            if seed.is_some() {
                config.seed = seed;
            }
            if let Some(v) = terms_per_topic {
                config.terms_per_topic = v;
            }

            println!(
                "Fitting {} topics over {} ...",
                config.num_topics,
                config.csv_path.display()
            );

            let pb = ProgressBar::new(config.max_iter as u64);
            pb.set_style(
                ProgressStyle::default_bar().template("  LDA [{bar:30}] {pos}/{len} ({eta})")?,
            );
            let report = pipeline::run(&config, |stats| pb.set_position(stats.iteration as u64));
            pb.finish_and_clear();
            let report = report?;

            println!(
                "{} {} headlines read, {} kept, {} terms in vocabulary",
                "✓".green(),
                report.record_count,
                report.rows.len(),
                report.vectorizer.vocab_size()
            );
            println!();

            terminal::display_metrics(report.log_likelihood, report.log_perplexity);
            println!();
            terminal::display_topics(&report.topics, &report.vectorizer.vocabulary, weights);

            if let Some(n) = doc_topics {
                let shown = n.min(report.features.len());
                let mixtures = report.model.transform_all(&report.features[..shown])?;
                terminal::display_doc_topics(&report.rows, &mixtures, shown);
            }

            if let Some(path) = save_model {
                let saved = persist::SavedModel::new(report.vectorizer.vocabulary, report.model);
                persist::save_model(&path, &saved)?;
                println!("Model saved to: {}", path.display());
            }
        }

        Commands::Tokens { corpus, rows } => {
            let mut config = Config::load()?;
            corpus.apply(&mut config);
            let (_, tokenized) = pipeline::prepare(&config)?;
            terminal::display_token_preview(&tokenized, rows);
        }

        Commands::Vocab { corpus, top } => {
            let mut config = Config::load()?;
            corpus.apply(&mut config);
            let (_, tokenized) = pipeline::prepare(&config)?;
            let (vectorizer, _) = pipeline::vectorize(&config, &tokenized)?;
            terminal::display_vocabulary(&vectorizer, top);
        }

        Commands::Describe {
            model,
            terms_per_topic,
            weights,
        } => {
            let saved = persist::load_model(&model)?;
            info!(
                k = saved.model.k,
                created_at = %saved.created_at,
                "Loaded saved model"
            );
            println!(
                "{}",
                format!(
                    "Model with {} topics, saved {}",
                    saved.model.k,
                    saved.created_at.format("%Y-%m-%d %H:%M UTC")
                )
                .dimmed()
            );
            let topics = saved.model.describe_topics(terms_per_topic);
            terminal::display_topics(&topics, &saved.vocabulary, weights);
        }
    }

    Ok(())
}
