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

use core::search::DocIterator;
use core::util::DocId;
use error::Result;

/// Expert: Common scoring functionality for different types of queries.
///
/// A `Scorer` iterates over documents matching a query in increasing order of doc
/// Id and scores the document it is positioned on.
///
/// **NOTE**: The values `f32::NAN`, `f32::NEGATIVE_INFINITY` and `f32::POSITIVE_INFINITY` are
/// not valid scores.
pub trait Scorer: DocIterator {
    /// Returns the score of the current document matching the query.
    /// Initially invalid, until `DocIterator::next()` or
    /// `DocIterator::advance()` is called the first time.
    fn score(&mut self) -> Result<f32>;
}

impl Scorer for Box<dyn Scorer> {
    fn score(&mut self) -> Result<f32> {
        (**self).score()
    }
}

impl DocIterator for Box<dyn Scorer> {
    fn doc_id(&self) -> DocId {
        (**self).doc_id()
    }

    fn next(&mut self) -> Result<DocId> {
        (**self).next()
    }

    fn advance(&mut self, target: DocId) -> Result<DocId> {
        (**self).advance(target)
    }

    fn slow_advance(&mut self, target: DocId) -> Result<DocId> {
        (**self).slow_advance(target)
    }

    fn cost(&self) -> usize {
        (**self).cost()
    }
}
