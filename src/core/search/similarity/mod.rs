// Copyright 2019 Zhizhesihai (Beijing) Technology Limited.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// See the License for the specific language governing permissions and
// limitations under the License.

mod bm25_similarity;

pub use self::bm25_similarity::*;

mod classic_similarity;

pub use self::classic_similarity::*;

use std::fmt::Display;

use core::search::explanation::Explanation;
use core::search::statistics::{CollectionStatistics, TermStatistics};
use core::util::DocId;
use error::Result;

/// Similarity defines the components of scoring.
///
/// At query-time, queries interact with the Similarity via these steps:
/// - `compute_weight` is called a single time, allowing the implementation to
/// compute any statistics (such as IDF, average document length, etc) across
/// the entire collection.
/// - The query normalization process occurs a single time:
/// `SimWeight::get_value_for_normalization` is called for each query leaf,
/// `query_norm` is called for the top-level query, and finally
/// `SimWeight::normalize` passes down the normalization value and any
/// top-level boosts.
/// - For each segment, a `SimScorer` is created with `SimWeight::sim_scorer`
/// and its `score` method is called for each matching document.
pub trait Similarity: Display {
    /// Compute any collection-level weight needed for scoring a query.
    fn compute_weight(
        &self,
        collection_stats: &CollectionStatistics,
        term_stats: &[TermStatistics],
        boost: f32,
    ) -> Box<dyn SimWeight>;

    /// Computes the normalization value for a query given the sum of
    /// `SimWeight::get_value_for_normalization` of each of the query terms.
    ///
    /// By default this is disabled (returns 1).
    fn query_norm(&self, _value_for_normalization: f32) -> f32 {
        1.0f32
    }
}

/// Per-document encoded field length, as written at index time.
pub trait NormValues: Send {
    fn get(&self, doc_id: DocId) -> Result<i64>;
}

/// API for scoring "sloppy" queries such as `SpanQuery` and `PhraseQuery`.
///
/// Frequencies are floating-point values: an approximate within-document
/// frequency adjusted for "sloppiness" by `SimScorer::compute_slop_factor`
pub trait SimScorer: Send {
    /// Score a single document
    /// @param doc document id within the inverted index segment
    /// @param freq sloppy term frequency
    /// @return document's score
    fn score(&mut self, doc: DocId, freq: f32) -> Result<f32>;

    /// Computes the amount of a sloppy phrase match, based on an edit distance.
    fn compute_slop_factor(&self, distance: i32) -> f32;

    /// Returns the term frequency transform of this scorer when its score
    /// decomposes into one, `None` otherwise.
    fn tf_explainer(&self) -> Option<Box<dyn TermFreqExplainer>> {
        None
    }
}

/// A term frequency transform that can be reported on its own.
pub trait TermFreqExplainer: Send {
    fn tf(&self, freq: f32) -> f32;

    fn explain_tf(&self, freq: f32, is_match: bool) -> Explanation {
        Explanation::new(
            is_match,
            self.tf(freq),
            format!("tf(phraseFreq={})", freq),
            vec![],
        )
    }
}

/// Stores the weight for a query across the indexed collection.
pub trait SimWeight {
    /// The value for normalization of contained query clauses (e.g. sum of squared weights).
    fn get_value_for_normalization(&self) -> f32;

    fn normalize(&mut self, query_norm: f32, boost: f32);

    /// Creates a scorer for one segment, `norms` is `None` when the field
    /// omits norms.
    fn sim_scorer(&self, norms: Option<Box<dyn NormValues>>) -> Result<Box<dyn SimScorer>>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use error::ErrorKind;

    /// Norms backed by a slice of encoded bytes, one per document.
    pub struct MockNorms(pub Vec<u8>);

    impl NormValues for MockNorms {
        fn get(&self, doc_id: DocId) -> Result<i64> {
            match self.0.get(doc_id as usize) {
                Some(b) => Ok(i64::from(*b)),
                None => bail!(ErrorKind::IllegalArgument(format!(
                    "no norm for doc {}",
                    doc_id
                ))),
            }
        }
    }

    struct Identity;

    impl TermFreqExplainer for Identity {
        fn tf(&self, freq: f32) -> f32 {
            freq
        }
    }

    #[test]
    fn test_explain_tf_description() {
        let expl = Identity.explain_tf(1.5, true);
        assert!(expl.is_match());
        assert!((expl.value() - 1.5).abs() < ::std::f32::EPSILON);
        assert_eq!(expl.description(), "tf(phraseFreq=1.5)");

        let expl = Identity.explain_tf(0.0, false);
        assert!(!expl.is_match());
        assert_eq!(expl.description(), "tf(phraseFreq=0)");
    }
}
