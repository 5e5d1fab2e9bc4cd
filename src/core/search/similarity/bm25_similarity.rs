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

//! BM25 Similarity. Introduced in Stephen E. Robertson, Steve Walker,
//! Susan Jones, Micheline Hancock-Beaulieu, and Mike Gatford. Okapi at TREC-3.
//! In Proceedings of the Third *T*ext *RE*trieval *C*onference (TREC 1994).
//! Gaithersburg, USA, November 1994.

use std::fmt;
use std::sync::Arc;

use core::search::similarity::{NormValues, SimScorer, SimWeight, Similarity};
use core::search::statistics::{CollectionStatistics, TermStatistics};
use core::util::{DocId, SmallFloat};
use error::Result;

lazy_static! {
    /// Decoded field length for every encoded norm byte.
    static ref NORM_TABLE: [f32; 256] = {
        let mut norm_table: [f32; 256] = [0f32; 256];
        for (i, norm) in norm_table.iter_mut().enumerate().skip(1) {
            let f = SmallFloat::byte315_to_float(i as u8);
            *norm = 1f32 / (f * f);
        }
        norm_table[0] = 1f32 / norm_table[255];
        norm_table
    };
}

pub const DEFAULT_BM25_K1: f32 = 1.2;
pub const DEFAULT_BM25_B: f32 = 0.75;

/// BM25 Similarity.
pub struct BM25Similarity {
    k1: f32,
    b: f32,
}

impl Default for BM25Similarity {
    fn default() -> Self {
        BM25Similarity::new(DEFAULT_BM25_K1, DEFAULT_BM25_B)
    }
}

impl BM25Similarity {
    pub fn new(k1: f32, b: f32) -> BM25Similarity {
        debug_assert!(k1.is_finite() && k1 >= 0.0);
        debug_assert!(b >= 0.0 && b <= 1.0);
        BM25Similarity { k1, b }
    }

    /// Implemented as `1 / (distance + 1)`.
    pub fn sloppy_freq(distance: i32) -> f32 {
        1.0 / (distance as f32 + 1.0)
    }

    /// The average is computed as sumTotalTermFreq / docCount,
    /// or 1 if the index does not store sumTotalTermFreq.
    fn avg_field_length(collection_stats: &CollectionStatistics) -> f32 {
        let sum_total_term_freq = collection_stats.sum_total_term_freq;
        if sum_total_term_freq <= 0 {
            1f32
        } else {
            let doc_count = collection_stats.doc_count_or_max_doc();
            (sum_total_term_freq as f64 / doc_count as f64) as f32
        }
    }

    pub fn encode_norm_value(boost: f32, field_length: i32) -> u8 {
        SmallFloat::encode_length_norm(boost, field_length)
    }

    #[inline]
    fn decode_norm_value(b: usize) -> f32 {
        NORM_TABLE[b]
    }

    fn idf(term_stats: &[TermStatistics], collection_stats: &CollectionStatistics) -> f32 {
        let doc_count = collection_stats.doc_count_or_max_doc() as f64;
        term_stats
            .iter()
            .map(|stat| {
                let doc_freq = stat.doc_freq as f64;
                (1.0 + (doc_count - doc_freq + 0.5) / (doc_freq + 0.5)).ln() as f32
            })
            .sum()
    }
}

impl Similarity for BM25Similarity {
    fn compute_weight(
        &self,
        collection_stats: &CollectionStatistics,
        term_stats: &[TermStatistics],
        boost: f32,
    ) -> Box<dyn SimWeight> {
        let avgdl = BM25Similarity::avg_field_length(collection_stats);
        let idf = BM25Similarity::idf(term_stats, collection_stats);
        let mut cache: [f32; 256] = [0f32; 256];
        for (i, c) in cache.iter_mut().enumerate() {
            *c = self.k1
                * ((1.0 - self.b) + self.b * (BM25Similarity::decode_norm_value(i) / avgdl));
        }

        Box::new(BM25SimWeight::new(self.k1, idf, cache, boost))
    }
}

impl fmt::Display for BM25Similarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BM25Similarity(k1: {}, b: {})", self.k1, self.b)
    }
}

struct BM25SimScorer {
    k1: f32,
    weight: f32,
    cache: Arc<[f32; 256]>,
    norms: Option<Box<dyn NormValues>>,
}

impl BM25SimScorer {
    fn new(weight: &BM25SimWeight, norms: Option<Box<dyn NormValues>>) -> BM25SimScorer {
        BM25SimScorer {
            k1: weight.k1,
            weight: weight.weight,
            cache: Arc::clone(&weight.cache),
            norms,
        }
    }
}

impl SimScorer for BM25SimScorer {
    fn score(&mut self, doc: DocId, freq: f32) -> Result<f32> {
        let norm = if let Some(ref norms) = self.norms {
            let encode_length = (norms.get(doc)? & 0xFF) as usize;
            self.cache[encode_length]
        } else {
            self.k1
        };

        Ok(self.weight * (self.k1 + 1.0) * freq / (freq + norm))
    }

    fn compute_slop_factor(&self, distance: i32) -> f32 {
        BM25Similarity::sloppy_freq(distance)
    }
}

struct BM25SimWeight {
    k1: f32,
    idf: f32,
    cache: Arc<[f32; 256]>,
    weight: f32,
}

impl BM25SimWeight {
    fn new(k1: f32, idf: f32, cache: [f32; 256], boost: f32) -> BM25SimWeight {
        let mut weight = BM25SimWeight {
            k1,
            idf,
            cache: Arc::new(cache),
            weight: 0.0,
        };
        weight.do_normalize(boost);
        weight
    }

    fn do_normalize(&mut self, boost: f32) {
        self.weight = self.idf * boost;
    }
}

impl SimWeight for BM25SimWeight {
    fn get_value_for_normalization(&self) -> f32 {
        self.weight * self.weight
    }

    fn normalize(&mut self, _query_norm: f32, boost: f32) {
        self.do_normalize(boost)
    }

    fn sim_scorer(&self, norms: Option<Box<dyn NormValues>>) -> Result<Box<dyn SimScorer>> {
        Ok(Box::new(BM25SimScorer::new(self, norms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::search::similarity::tests::MockNorms;

    #[test]
    fn test_sane_norm_values() {
        for i in 0..256 {
            let len = BM25Similarity::decode_norm_value(i);
            assert!(len >= 0f32);
            assert!(!len.is_nan());
            assert!(!len.is_infinite());
            if i > 0 {
                assert!(len < BM25Similarity::decode_norm_value(i - 1));
            }
        }
    }

    #[test]
    fn test_idf() {
        let collection_stats = CollectionStatistics::new(String::from("body"), 11, -1, 0, 0);
        let term_stats = vec![TermStatistics::new(Vec::new(), 1, -1)];
        assert!(
            (BM25Similarity::idf(&term_stats, &collection_stats) - (8f32).ln()).abs()
                < 1e-6
        );

        let collection_stats = CollectionStatistics::new(String::from("body"), 35, 32, -1, -1);
        let term_stats = vec![TermStatistics::new(Vec::new(), 1, -1)];
        assert!(
            (BM25Similarity::idf(&term_stats, &collection_stats) - (22f32).ln()).abs()
                < 1e-6
        );
    }

    #[test]
    fn test_avg_field_length() {
        let collection_stats = CollectionStatistics::new(String::from("body"), 11, 5, 0, -1);
        assert!((BM25Similarity::avg_field_length(&collection_stats) - 1f32).abs() < 1e-6);

        let collection_stats = CollectionStatistics::new(String::from("body"), 3, 2, 8, -1);
        assert!((BM25Similarity::avg_field_length(&collection_stats) - 4f32).abs() < 1e-6);

        let collection_stats = CollectionStatistics::new(String::from("body"), 3, -1, 9, -1);
        assert!((BM25Similarity::avg_field_length(&collection_stats) - 3f32).abs() < 1e-6);
    }

    #[test]
    fn test_sloppy_freq() {
        assert!((BM25Similarity::sloppy_freq(0) - 1.0).abs() < ::std::f32::EPSILON);
        assert!((BM25Similarity::sloppy_freq(1) - 0.5).abs() < ::std::f32::EPSILON);
        assert!(BM25Similarity::sloppy_freq(5) < BM25Similarity::sloppy_freq(2));
    }

    #[test]
    fn test_bm25_similarity() {
        let collection_stats = CollectionStatistics::new(String::from("body"), 32, 32, 120, -1);
        let term_stats = vec![TermStatistics::new(Vec::new(), 1, -1)];
        let bm25_sim = BM25Similarity::default();
        let sim_weight = bm25_sim.compute_weight(&collection_stats, &term_stats, 1.0f32);

        let idf = (1.0f64 + 31.5 / 1.5).ln() as f32;
        assert!((sim_weight.get_value_for_normalization() - idf * idf).abs() < 1e-4);

        let short_doc = BM25Similarity::encode_norm_value(1.0, 2);
        let long_doc = BM25Similarity::encode_norm_value(1.0, 40);
        let norms = MockNorms(vec![short_doc, short_doc, long_doc]);
        let mut sim_scorer = sim_weight.sim_scorer(Some(Box::new(norms))).unwrap();

        // same field length
        let score1 = sim_scorer.score(1, 100.0).unwrap();
        let score2 = sim_scorer.score(1, 20.0).unwrap();
        assert!(score1 > score2);

        // same freq, shorter field scores higher
        let score1 = sim_scorer.score(1, 10.0).unwrap();
        let score2 = sim_scorer.score(2, 10.0).unwrap();
        assert!(score1 > score2);

        assert!(sim_scorer.score(3, 1.0).is_err());
        assert!(sim_scorer.tf_explainer().is_none());
    }

    #[test]
    fn test_score_without_norms() {
        let collection_stats = CollectionStatistics::new(String::from("body"), 10, 10, -1, -1);
        let term_stats = vec![TermStatistics::new(Vec::new(), 2, -1)];
        let sim_weight =
            BM25Similarity::new(1.2, 0.75).compute_weight(&collection_stats, &term_stats, 2.0);
        let mut sim_scorer = sim_weight.sim_scorer(None).unwrap();

        let idf = (1.0f64 + 8.5 / 2.5).ln() as f32;
        let expected = 2.0 * idf * 2.2 * 1.5 / (1.5 + 1.2);
        assert!((sim_scorer.score(0, 1.5).unwrap() - expected).abs() < 1e-5);
        assert!((sim_scorer.compute_slop_factor(3) - 0.25).abs() < ::std::f32::EPSILON);
    }
}
