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

//! TF-IDF vector space similarity: `tf(freq) * idf^2 * boost * queryNorm * norm`.

use std::fmt;

use core::search::similarity::{NormValues, SimScorer, SimWeight, Similarity, TermFreqExplainer};
use core::search::statistics::{CollectionStatistics, TermStatistics};
use core::util::{DocId, SmallFloat};
use error::Result;

#[derive(Default)]
pub struct ClassicSimilarity;

impl ClassicSimilarity {
    pub fn tf(freq: f32) -> f32 {
        freq.sqrt()
    }

    pub fn sloppy_freq(distance: i32) -> f32 {
        1.0 / (distance as f32 + 1.0)
    }

    /// Sum of `1 + ln(maxDoc / (docFreq + 1))` over the terms.
    fn idf(term_stats: &[TermStatistics], collection_stats: &CollectionStatistics) -> f32 {
        let num_docs = collection_stats.max_doc as f64;
        term_stats
            .iter()
            .map(|stat| ((num_docs / (stat.doc_freq as f64 + 1.0)).ln() + 1.0) as f32)
            .sum()
    }

    pub fn encode_norm_value(boost: f32, field_length: i32) -> u8 {
        SmallFloat::encode_length_norm(boost, field_length)
    }

    fn decode_norm_value(b: i64) -> f32 {
        SmallFloat::byte315_to_float((b & 0xFF) as u8)
    }
}

impl Similarity for ClassicSimilarity {
    fn compute_weight(
        &self,
        collection_stats: &CollectionStatistics,
        term_stats: &[TermStatistics],
        boost: f32,
    ) -> Box<dyn SimWeight> {
        let idf = ClassicSimilarity::idf(term_stats, collection_stats);
        Box::new(IDFStats::new(idf, boost))
    }

    fn query_norm(&self, sum_of_squared_weights: f32) -> f32 {
        1.0 / sum_of_squared_weights.sqrt()
    }
}

impl fmt::Display for ClassicSimilarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ClassicSimilarity")
    }
}

struct IDFStats {
    idf: f32,
    query_boost: f32,
    query_weight: f32,
    value: f32,
}

impl IDFStats {
    fn new(idf: f32, query_boost: f32) -> IDFStats {
        let mut stats = IDFStats {
            idf,
            query_boost,
            query_weight: idf * query_boost,
            value: 0.0,
        };
        stats.normalize(1.0, 1.0);
        stats
    }
}

impl SimWeight for IDFStats {
    fn get_value_for_normalization(&self) -> f32 {
        self.query_weight * self.query_weight
    }

    fn normalize(&mut self, query_norm: f32, boost: f32) {
        self.query_weight = self.idf * self.query_boost * query_norm * boost;
        self.value = self.query_weight * self.idf;
    }

    fn sim_scorer(&self, norms: Option<Box<dyn NormValues>>) -> Result<Box<dyn SimScorer>> {
        Ok(Box::new(ClassicSimScorer {
            weight_value: self.value,
            norms,
        }))
    }
}

struct ClassicSimScorer {
    weight_value: f32,
    norms: Option<Box<dyn NormValues>>,
}

impl SimScorer for ClassicSimScorer {
    fn score(&mut self, doc: DocId, freq: f32) -> Result<f32> {
        let raw = ClassicSimilarity::tf(freq) * self.weight_value;
        match self.norms {
            Some(ref norms) => Ok(raw * ClassicSimilarity::decode_norm_value(norms.get(doc)?)),
            None => Ok(raw),
        }
    }

    fn compute_slop_factor(&self, distance: i32) -> f32 {
        ClassicSimilarity::sloppy_freq(distance)
    }

    fn tf_explainer(&self) -> Option<Box<dyn TermFreqExplainer>> {
        Some(Box::new(ClassicTf))
    }
}

struct ClassicTf;

impl TermFreqExplainer for ClassicTf {
    fn tf(&self, freq: f32) -> f32 {
        ClassicSimilarity::tf(freq)
    }
}
