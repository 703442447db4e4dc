// Unit tests for the online LDA optimizer and the fitted model.
//
// Uses small synthetic corpora where the right answer is obvious: two
// groups of documents that share no vocabulary should end up in different
// topics.

use headline_topics::features::SparseVector;
use headline_topics::lda::{LdaError, LdaModel, LdaParams, OnlineLda};

const VOCAB: usize = 6;

/// 20 documents over terms 0-2 followed by 20 documents over terms 3-5.
fn two_clusters() -> Vec<SparseVector> {
    let mut docs = Vec::new();
    for i in 0..20 {
        docs.push(SparseVector::from_pairs(
            VOCAB,
            vec![(0, 3.0 + (i % 3) as f64), (1, 2.0), (2, 1.0 + (i % 2) as f64)],
        ));
    }
    for i in 0..20 {
        docs.push(SparseVector::from_pairs(
            VOCAB,
            vec![(3, 1.0 + (i % 2) as f64), (4, 2.0), (5, 3.0 + (i % 3) as f64)],
        ));
    }
    docs
}

fn fit(params: LdaParams, docs: &[SparseVector]) -> LdaModel {
    OnlineLda::new(params).unwrap().fit(docs).unwrap()
}

fn cluster_params() -> LdaParams {
    LdaParams::new(2)
        .max_iter(100)
        .subsampling_rate(1.0)
        .learning_offset(1.0)
        .learning_decay(0.6)
        .seed(2024)
}

// ============================================================
// Parameter validation
// ============================================================

#[test]
fn rejects_invalid_parameters() {
    for params in [
        LdaParams::new(1),
        LdaParams::new(3).learning_decay(0.4),
        LdaParams::new(3).subsampling_rate(0.0),
        LdaParams::new(3).doc_concentration(vec![0.1; 2]),
        LdaParams::new(3).topic_concentration(-1.0),
    ] {
        let err = OnlineLda::new(params).unwrap_err();
        assert!(matches!(err, LdaError::InvalidParameter(_)), "{err:?}");
    }
}

#[test]
fn rejects_corpus_without_vocabulary() {
    let lda = OnlineLda::new(LdaParams::new(2)).unwrap();
    let docs = vec![SparseVector::empty(0)];
    assert_eq!(lda.fit(&docs).unwrap_err(), LdaError::EmptyVocabulary);
}

// ============================================================
// Fitting
// ============================================================

#[test]
fn separated_clusters_get_different_topics() {
    let docs = two_clusters();
    let model = fit(cluster_params(), &docs);
    let mixtures = model.transform_all(&docs).unwrap();

    let first = LdaModel::dominant_topic(&mixtures[0]).unwrap();
    let second = LdaModel::dominant_topic(&mixtures[20]).unwrap();
    assert_ne!(first, second);

    for mix in &mixtures[..20] {
        assert_eq!(LdaModel::dominant_topic(mix), Some(first));
    }
    for mix in &mixtures[20..] {
        assert_eq!(LdaModel::dominant_topic(mix), Some(second));
    }

    // Each topic's top terms come from its own cluster
    let topics = model.describe_topics(3);
    let mut first_terms = topics[first].term_indices.clone();
    first_terms.sort_unstable();
    assert_eq!(first_terms, vec![0, 1, 2]);
}

#[test]
fn fixed_seed_is_reproducible() {
    let docs = two_clusters();
    let params = LdaParams::new(3).max_iter(10).subsampling_rate(0.5).seed(7);
    let a = fit(params.clone(), &docs);
    let b = fit(params, &docs);
    assert_eq!(a.topics_matrix(), b.topics_matrix());
    assert_eq!(
        a.log_likelihood(&docs).unwrap(),
        b.log_likelihood(&docs).unwrap()
    );
}

#[test]
fn learned_alpha_stays_positive() {
    let docs = two_clusters();
    let model = fit(cluster_params(), &docs);
    let alpha = model.estimated_doc_concentration();
    assert_eq!(alpha.len(), 2);
    assert!(alpha.iter().all(|a| *a > 0.0 && a.is_finite()));
}

#[test]
fn fixed_alpha_is_left_alone() {
    let docs = two_clusters();
    let model = fit(
        cluster_params()
            .doc_concentration(vec![0.3])
            .optimize_doc_concentration(false),
        &docs,
    );
    assert_eq!(model.estimated_doc_concentration().to_vec(), vec![0.3, 0.3]);
    assert_eq!(model.topic_concentration(), 0.5);
}

// ============================================================
// Evaluation
// ============================================================

#[test]
fn bounds_are_finite_with_expected_signs() {
    let docs = two_clusters();
    let model = fit(cluster_params(), &docs);
    let ll = model.log_likelihood(&docs).unwrap();
    let lp = model.log_perplexity(&docs).unwrap();
    assert!(ll.is_finite() && ll < 0.0);
    assert!(lp.is_finite() && lp > 0.0);
}

#[test]
fn describe_topics_weights_descend() {
    let docs = two_clusters();
    let model = fit(cluster_params(), &docs);
    let topics = model.describe_topics(10);
    assert_eq!(topics.len(), 2);
    for topic in &topics {
        // Only VOCAB terms exist
        assert_eq!(topic.term_indices.len(), VOCAB);
        assert!(topic.term_weights.windows(2).all(|w| w[0] >= w[1]));
        let total: f64 = topic.term_weights.iter().sum();
        assert!(total <= 1.0 + 1e-9);
    }
}

#[test]
fn perplexity_needs_tokens() {
    let docs = two_clusters();
    let model = fit(LdaParams::new(2).max_iter(2).seed(1), &docs);
    let empty = vec![SparseVector::empty(VOCAB)];
    assert_eq!(model.log_perplexity(&empty), Err(LdaError::NoTokens));
}
