// Colored terminal output for topics, metrics and previews.
//
// All user-facing printing lives here; main.rs decides what to show and
// delegates the formatting.

use colored::Colorize;

use crate::features::CountVectorizerModel;
use crate::lda::{LdaModel, TopicDescription};
use crate::pipeline::TokenizedHeadline;

const TOPIC_RULE: &str = "*************************";

/// Print the likelihood bound and the perplexity bound.
pub fn display_metrics(log_likelihood: f64, log_perplexity: f64) {
    println!(
        "The lower bound on the log likelihood of the entire corpus: {}",
        log_likelihood
    );
    println!("The upper bound on perplexity: {}", log_perplexity);
}

/// Print each topic's top words between rules of asterisks.
pub fn display_topics(topics: &[TopicDescription], vocabulary: &[String], show_weights: bool) {
    for topic in topics {
        println!("topic: {}", topic.topic);
        println!("{TOPIC_RULE}");
        for (term, weight) in topic.terms(vocabulary).iter().zip(&topic.term_weights) {
            if show_weights {
                println!("{:<20} {}", term, format!("{weight:.4}").dimmed());
            } else {
                println!("{term}");
            }
        }
        println!("{TOPIC_RULE}");
    }
}

/// Show the first `n` rows as raw date plus finished tokens.
pub fn display_token_preview(rows: &[TokenizedHeadline], n: usize) {
    if rows.is_empty() {
        println!("No headlines produced any tokens.");
        return;
    }

    let shown = n.min(rows.len());
    println!(
        "\n{}",
        format!("=== Token Preview ({shown} of {} rows) ===", rows.len()).bold()
    );
    println!();

    for row in rows.iter().take(shown) {
        let tokens = super::truncate_chars(&row.tokens.join(" "), 100);
        println!("  {:<10} {}", row.raw_date.dimmed(), tokens);
    }
    println!();
}

/// Show the `n` most frequent vocabulary terms with their frequencies.
pub fn display_vocabulary(model: &CountVectorizerModel, n: usize) {
    println!(
        "\n{}",
        format!("=== Vocabulary ({} terms) ===", model.vocab_size()).bold()
    );
    println!();

    println!(
        "  {:>5}  {:<20} {:>8}  {:>8}",
        "Index".dimmed(),
        "Term".dimmed(),
        "TF".dimmed(),
        "DF".dimmed(),
    );
    println!("  {}", "-".repeat(46).dimmed());

    for (i, term) in model.vocabulary.iter().enumerate().take(n) {
        println!(
            "  {:>5}  {:<20} {:>8}  {:>8}",
            i, term, model.term_freq[i], model.doc_freq[i]
        );
    }
    println!();
}

/// Show topic mixtures for the first `n` documents.
pub fn display_doc_topics(rows: &[TokenizedHeadline], distributions: &[Vec<f64>], n: usize) {
    println!("\n{}", "=== Document Topics ===".bold());
    println!();

    for (row, dist) in rows.iter().zip(distributions).take(n) {
        let mixture = dist
            .iter()
            .map(|w| format!("{w:.2}"))
            .collect::<Vec<_>>()
            .join(" ");
        let dominant = match LdaModel::dominant_topic(dist) {
            Some(t) => format!("topic {t}").green().to_string(),
            None => "no terms".yellow().to_string(),
        };
        let preview = super::truncate_chars(&row.tokens.join(" "), 60);
        println!("  [{mixture}] {dominant:<10} {}", preview.dimmed());
    }
    println!();
}
