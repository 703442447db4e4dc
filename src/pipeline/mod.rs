// End-to-end topic modeling pipeline.
//
// load CSV -> annotate -> limit -> vectorize -> fit LDA -> evaluate -> describe
//
// Each stage logs its output size. The CLI subcommands reuse the early
// stages (`prepare`, `vectorize`) without running the whole chain.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::annotate::pipeline::PreprocessConfig;
use crate::annotate::NlpPipeline;
use crate::config::Config;
use crate::corpus::{load_headlines, CsvOptions, Headline};
use crate::features::{CountVectorizer, CountVectorizerModel, CountVectorizerParams, SparseVector};
use crate::lda::{IterationStats, LdaModel, LdaParams, OnlineLda, TopicDescription};

/// A headline after the annotation chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizedHeadline {
    pub publish_date: Option<NaiveDate>,
    pub raw_date: String,
    pub tokens: Vec<String>,
}

/// Everything a full run produces.
#[derive(Debug)]
pub struct PipelineReport {
    /// Rows read from the CSV before the limit
    pub record_count: usize,
    pub rows: Vec<TokenizedHeadline>,
    pub vectorizer: CountVectorizerModel,
    pub features: Vec<SparseVector>,
    pub model: LdaModel,
    pub log_likelihood: f64,
    pub log_perplexity: f64,
    pub topics: Vec<TopicDescription>,
}

impl Config {
    pub fn csv_options(&self) -> CsvOptions {
        CsvOptions {
            text_column: self.text_column.clone(),
            date_column: self.date_column.clone(),
            delimiter: self.delimiter,
            has_header: self.has_header,
        }
    }

    pub fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig {
            extra_stopwords: self.extra_stopwords.clone(),
            ..PreprocessConfig::default()
        }
    }

    pub fn vectorizer_params(&self) -> CountVectorizerParams {
        CountVectorizerParams {
            vocab_size: self.vocab_size,
            min_df: self.min_df,
            ..CountVectorizerParams::default()
        }
    }

    pub fn lda_params(&self) -> LdaParams {
        let params = LdaParams::new(self.num_topics)
            .max_iter(self.max_iter)
            .max_terms_per_topic(self.terms_per_topic);
        match self.seed {
            Some(seed) => params.seed(seed),
            None => params,
        }
    }
}

/// Run every headline through the annotation chain and keep the first
/// `limit` rows (0 keeps all of them).
pub fn preprocess(
    headlines: Vec<Headline>,
    nlp: &NlpPipeline,
    limit: usize,
) -> Vec<TokenizedHeadline> {
    let take = if limit == 0 { usize::MAX } else { limit };
    headlines
        .into_iter()
        .map(|h| TokenizedHeadline {
            tokens: nlp.process(&h.text),
            publish_date: h.publish_date,
            raw_date: h.raw_date,
        })
        .take(take)
        .collect()
}

/// Load the CSV and preprocess it. Returns the raw record count too.
pub fn prepare(config: &Config) -> Result<(usize, Vec<TokenizedHeadline>)> {
    config.require_csv()?;
    let headlines = load_headlines(&config.csv_path, &config.csv_options())?;
    let record_count = headlines.len();

    let nlp = NlpPipeline::standard(&config.preprocess_config());
    let rows = preprocess(headlines, &nlp, config.row_limit);
    let token_count: usize = rows.iter().map(|r| r.tokens.len()).sum();
    info!(
        records = record_count,
        rows = rows.len(),
        tokens = token_count,
        stages = ?nlp.stage_names(),
        "Preprocessed headlines"
    );
    Ok((record_count, rows))
}

/// Fit the vectorizer on tokenized rows and encode them.
pub fn vectorize(
    config: &Config,
    rows: &[TokenizedHeadline],
) -> Result<(CountVectorizerModel, Vec<SparseVector>)> {
    let docs: Vec<Vec<&str>> = rows
        .iter()
        .map(|r| r.tokens.iter().map(String::as_str).collect())
        .collect();
    let vectorizer = CountVectorizer::new(config.vectorizer_params())
        .fit(&docs)
        .context("Failed to build the vocabulary")?;
    let features = vectorizer.transform_all(&docs);
    Ok((vectorizer, features))
}

/// Run the full pipeline, reporting LDA progress through `on_iteration`.
pub fn run<F>(config: &Config, on_iteration: F) -> Result<PipelineReport>
where
    F: FnMut(IterationStats),
{
    let (record_count, rows) = prepare(config)?;
    let (vectorizer, features) = vectorize(config, &rows)?;

    let lda = OnlineLda::new(config.lda_params()).context("Invalid LDA settings")?;
    let model = lda
        .fit_with_progress(&features, on_iteration)
        .context("Failed to fit the topic model")?;

    let log_likelihood = model
        .log_likelihood(&features)
        .context("Failed to compute the log likelihood bound")?;
    let log_perplexity = model
        .log_perplexity(&features)
        .context("Failed to compute the perplexity bound")?;
    let topics = model.describe_topics(lda.params().max_terms_per_topic);

    info!(
        topics = topics.len(),
        log_likelihood, log_perplexity, "Topic model fitted"
    );

    Ok(PipelineReport {
        record_count,
        rows,
        vectorizer,
        features,
        model,
        log_likelihood,
        log_perplexity,
        topics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headline(text: &str) -> Headline {
        Headline {
            publish_date: None,
            raw_date: "20030219".to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_preprocess_applies_limit_after_annotation() {
        let nlp = NlpPipeline::default();
        let rows = preprocess(
            vec![
                headline("police investigate crash"),
                headline("council rates rise"),
                headline("farmers welcome rain"),
            ],
            &nlp,
            2,
        );
        assert_eq!(rows.len(), 2);
        assert!(rows[0].tokens.contains(&"polic".to_string()));
        assert_eq!(rows[1].raw_date, "20030219");
    }

    #[test]
    fn test_preprocess_zero_limit_keeps_all() {
        let nlp = NlpPipeline::default();
        let rows = preprocess(vec![headline("a"), headline("b"), headline("c")], &nlp, 0);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_config_conversions() {
        let config = Config {
            seed: Some(9),
            num_topics: 4,
            terms_per_topic: 7,
            ..Config::default()
        };
        let params = config.lda_params();
        assert_eq!(params.k, 4);
        assert_eq!(params.max_terms_per_topic, 7);
        assert_eq!(params.seed, Some(9));
        assert_eq!(config.vectorizer_params().min_df, 3.0);
        assert_eq!(config.csv_options().text_column, "headline_text");
    }
}
