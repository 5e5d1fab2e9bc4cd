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

/// Collection-wide statistics of one field, the input of
/// `Similarity::compute_weight`.
///
/// `-1` marks a statistic the index does not record.
#[derive(Clone, Debug)]
pub struct CollectionStatistics {
    pub field: String,
    pub max_doc: i64,
    pub doc_count: i64,
    pub sum_total_term_freq: i64,
    pub sum_doc_freq: i64,
}

impl CollectionStatistics {
    pub fn new(
        field: String,
        max_doc: i64,
        doc_count: i64,
        sum_total_term_freq: i64,
        sum_doc_freq: i64,
    ) -> CollectionStatistics {
        debug_assert!(max_doc >= 0);
        debug_assert!(doc_count >= -1 && doc_count <= max_doc);
        CollectionStatistics {
            field,
            max_doc,
            doc_count,
            sum_total_term_freq,
            sum_doc_freq,
        }
    }

    /// Number of documents with at least one term in the field, falling
    /// back to `max_doc` when unknown.
    pub fn doc_count_or_max_doc(&self) -> i64 {
        if self.doc_count == -1 {
            self.max_doc
        } else {
            self.doc_count
        }
    }
}

#[derive(Clone, Debug)]
pub struct TermStatistics {
    pub term: Vec<u8>,
    pub doc_freq: i64,
    pub total_term_freq: i64,
}

impl TermStatistics {
    pub fn new(term: Vec<u8>, doc_freq: i64, total_term_freq: i64) -> TermStatistics {
        assert!(doc_freq >= 0);
        assert!(total_term_freq == -1 || total_term_freq >= doc_freq);
        TermStatistics {
            term,
            doc_freq,
            total_term_freq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_count_fallback() {
        let stats = CollectionStatistics::new("body".to_string(), 40, -1, 300, 120);
        assert_eq!(stats.doc_count_or_max_doc(), 40);

        let stats = CollectionStatistics::new("body".to_string(), 40, 32, 300, 120);
        assert_eq!(stats.doc_count_or_max_doc(), 32);
    }

    #[test]
    #[should_panic]
    fn test_term_statistics_rejects_total_below_doc_freq() {
        TermStatistics::new(b"quick".to_vec(), 4, 2);
    }
}
