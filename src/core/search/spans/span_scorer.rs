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

use core::search::explanation::Explanation;
use core::search::scorer::Scorer;
use core::search::similarity::{SimScorer, TermFreqExplainer};
use core::search::spans::{SpanSource, Spans};
use core::search::{DocIterator, NO_MORE_DOCS};
use core::util::DocId;
use error::Result;

/// Mutable iteration state of a `SpanScorer`, owned by it alone.
struct SpanScorerState {
    /// `-1` before the first advance, `NO_MORE_DOCS` once finished
    doc: DocId,
    /// accumulated sloppy freq of `doc`
    freq: f32,
    /// number of matches aggregated into `freq`
    num_matches: i32,
    /// the span source has no match left to aggregate
    exhausted: bool,
}

impl SpanScorerState {
    fn new(exhausted: bool) -> Self {
        SpanScorerState {
            doc: if exhausted { NO_MORE_DOCS } else { -1 },
            freq: 0.0,
            num_matches: 0,
            exhausted,
        }
    }

    fn on_real_doc(&self) -> bool {
        self.doc != -1 && self.doc != NO_MORE_DOCS
    }

    fn finish(&mut self) {
        self.doc = NO_MORE_DOCS;
        self.freq = 0.0;
        self.num_matches = 0;
    }
}

/// A `Scorer` over `Spans`.
///
/// All matches of one document are folded into a single sloppy frequency,
/// the sum of `SimScorer::compute_slop_factor(end - start)` over the matches.
/// After a document has been aggregated the span source is left on the first
/// match of the following document.
///
/// Errors from the span source are returned as is. The scorer must not be
/// used again after an error, its state is unspecified.
pub struct SpanScorer<S: Spans> {
    spans: SpanSource<S>,
    doc_scorer: Box<dyn SimScorer>,
    tf_explainer: Option<Box<dyn TermFreqExplainer>>,
    state: SpanScorerState,
}

impl<S: Spans> SpanScorer<S> {
    /// Pulls the first match of `spans`, an empty stream gives a scorer
    /// that is already on `NO_MORE_DOCS`.
    pub fn new(spans: S, doc_scorer: Box<dyn SimScorer>) -> Result<Self> {
        let mut spans = SpanSource::new(spans);
        let exhausted = !spans.next()?;
        if exhausted {
            debug!("span scorer created over empty spans");
        }
        let tf_explainer = doc_scorer.tf_explainer();

        Ok(SpanScorer {
            spans,
            doc_scorer,
            tf_explainer,
            state: SpanScorerState::new(exhausted),
        })
    }

    /// The sloppy frequency of the current document.
    pub fn freq(&self) -> f32 {
        self.state.freq
    }

    /// How many matches were aggregated for the current document.
    pub fn num_matches(&self) -> i32 {
        self.state.num_matches
    }

    /// Explains the term frequency part of the score of `doc`.
    ///
    /// Advances this scorer to `doc`, so it has the same restrictions as
    /// `advance`. A document without matches explains a frequency of 0. When
    /// the `SimScorer` has no term frequency transform the explanation is
    /// empty.
    pub fn explain(&mut self, doc: DocId) -> Result<Explanation> {
        let exp_doc = self.advance(doc)?;
        let is_match = exp_doc == doc;
        let phrase_freq = if is_match { self.state.freq } else { 0.0 };
        if !is_match {
            debug!("explain: doc {} has no span matches, now on {}", doc, exp_doc);
        }

        Ok(match self.tf_explainer {
            Some(ref tf) => tf.explain_tf(phrase_freq, is_match),
            None => Explanation::default(),
        })
    }

    /// Consumes every match of the document the span source is on.
    /// Returns `false` when there is no match left.
    fn set_freq_current_doc(&mut self) -> Result<bool> {
        if self.state.exhausted {
            return Ok(false);
        }

        let doc = self.spans.doc()?;
        debug_assert!(doc > self.state.doc || !self.state.on_real_doc());
        self.state.doc = doc;
        self.state.freq = 0.0;
        self.state.num_matches = 0;

        loop {
            let match_length = self.spans.match_length()?;
            self.state.freq += self.doc_scorer.compute_slop_factor(match_length);
            self.state.num_matches += 1;

            if !self.spans.next()? {
                self.state.exhausted = true;
                break;
            }
            let next_doc = self.spans.doc()?;
            debug_assert!(next_doc >= doc);
            if next_doc != doc {
                break;
            }
        }

        trace!(
            "doc {}: {} span matches, freq {}",
            doc,
            self.state.num_matches,
            self.state.freq
        );
        Ok(true)
    }

    fn next_doc(&mut self) -> Result<DocId> {
        if !self.set_freq_current_doc()? {
            self.state.finish();
        }
        Ok(self.state.doc)
    }
}

impl<S: Spans> Scorer for SpanScorer<S> {
    fn score(&mut self) -> Result<f32> {
        self.doc_scorer.score(self.state.doc, self.state.freq)
    }
}

impl<S: Spans> DocIterator for SpanScorer<S> {
    fn doc_id(&self) -> DocId {
        self.state.doc
    }

    fn next(&mut self) -> Result<DocId> {
        self.next_doc()
    }

    /// Never moves backwards: a _target_ at or before the current document
    /// returns the current document and keeps its frequency.
    fn advance(&mut self, target: DocId) -> Result<DocId> {
        if self.state.doc == NO_MORE_DOCS || (self.state.on_real_doc() && target <= self.state.doc)
        {
            return Ok(self.state.doc);
        }

        // set_freq_current_doc() leaves the span source ahead of the current doc
        if !self.state.exhausted && self.spans.doc()? < target && !self.spans.skip_to(target)? {
            debug!("spans exhausted skipping to doc {}", target);
            self.state.exhausted = true;
        }
        self.next_doc()
    }

    fn cost(&self) -> usize {
        self.spans.cost()
    }
}
