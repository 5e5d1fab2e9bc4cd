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

use core::util::{DocId, Position};
use error::{ErrorKind, Result};

/// Expert: an enumeration of span matches, ordered by increasing document
/// number. Positions within one document are consumed in stream order.
///
/// `doc()`, `start()` and `end()` are only meaningful after a call to
/// `next()` or `skip_to()` returned `true`.
pub trait Spans: Send {
    /// Move to the next match, returning `false` once the matches are exhausted.
    fn next(&mut self) -> Result<bool>;

    /// Skips to the first match beyond the current whose document number is
    /// greater than or equal to _target_. Returns `true` iff there is such a
    /// match.
    ///
    /// The default implementation steps with `next()`; cursors backed by
    /// skip lists should override it.
    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        loop {
            if !self.next()? {
                return Ok(false);
            }
            if self.doc() >= target {
                return Ok(true);
            }
        }
    }

    /// Returns the document number of the current match.
    fn doc(&self) -> DocId;

    /// Returns the start position of the current match.
    fn start(&self) -> Position;

    /// Returns the end position of the current match.
    fn end(&self) -> Position;

    /// Estimated number of matches, an upper bound for the number of
    /// documents these spans can produce.
    fn cost(&self) -> usize;
}

impl Spans for Box<dyn Spans> {
    fn next(&mut self) -> Result<bool> {
        (**self).next()
    }

    fn skip_to(&mut self, target: DocId) -> Result<bool> {
        (**self).skip_to(target)
    }

    fn doc(&self) -> DocId {
        (**self).doc()
    }

    fn start(&self) -> Position {
        (**self).start()
    }

    fn end(&self) -> Position {
        (**self).end()
    }

    fn cost(&self) -> usize {
        (**self).cost()
    }
}

/// Positioned view over a `Spans` cursor.
///
/// Does no buffering of its own. The accessors fail with `IllegalState`
/// unless the last `next`/`skip_to` landed on a match.
pub struct SpanSource<S: Spans> {
    spans: S,
    positioned: bool,
}

impl<S: Spans> SpanSource<S> {
    pub fn new(spans: S) -> Self {
        SpanSource {
            spans,
            positioned: false,
        }
    }

    pub fn next(&mut self) -> Result<bool> {
        self.positioned = false;
        self.positioned = self.spans.next()?;
        Ok(self.positioned)
    }

    pub fn skip_to(&mut self, target: DocId) -> Result<bool> {
        self.positioned = false;
        self.positioned = self.spans.skip_to(target)?;
        Ok(self.positioned)
    }

    pub fn get_ref(&self) -> &S {
        &self.spans
    }

    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    pub fn doc(&self) -> Result<DocId> {
        self.ensure_positioned()?;
        Ok(self.spans.doc())
    }

    pub fn start(&self) -> Result<Position> {
        self.ensure_positioned()?;
        Ok(self.spans.start())
    }

    pub fn end(&self) -> Result<Position> {
        self.ensure_positioned()?;
        Ok(self.spans.end())
    }

    /// `end - start` of the current match.
    pub fn match_length(&self) -> Result<i32> {
        Ok(self.end()? - self.start()?)
    }

    pub fn cost(&self) -> usize {
        self.spans.cost()
    }

    #[inline]
    fn ensure_positioned(&self) -> Result<()> {
        if !self.positioned {
            bail!(ErrorKind::IllegalState(
                "spans are not positioned on a match".into()
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::search::tests::*;
    use error::ErrorKind;

    #[test]
    fn test_accessors_before_next() {
        let source = SpanSource::new(MockSpans::new(scenario_matches()));
        assert!(!source.is_positioned());
        match *source.doc().unwrap_err().kind() {
            ErrorKind::IllegalState(_) => {}
            _ => panic!("expected illegal state"),
        }
        assert!(source.start().is_err());
        assert!(source.end().is_err());
        assert!(source.match_length().is_err());
        assert_eq!(source.cost(), 3);
    }

    #[test]
    fn test_next_and_match_length() {
        let mut source = SpanSource::new(MockSpans::new(scenario_matches()));
        assert!(source.next().unwrap());
        assert_eq!(source.doc().unwrap(), 1);
        assert_eq!(source.match_length().unwrap(), 2);

        assert!(source.next().unwrap());
        assert_eq!(source.start().unwrap(), 5);
        assert_eq!(source.end().unwrap(), 6);
        assert_eq!(source.match_length().unwrap(), 1);

        assert!(source.next().unwrap());
        assert!(!source.next().unwrap());
        assert!(source.doc().is_err());
    }

    #[test]
    fn test_skip_to() {
        let mut source = SpanSource::new(MockSpans::new(vec![(1, 0, 1), (4, 2, 5), (9, 0, 3)]));
        assert!(source.skip_to(3).unwrap());
        assert_eq!(source.doc().unwrap(), 4);
        assert!(!source.skip_to(10).unwrap());
        assert!(!source.is_positioned());
    }

    #[test]
    fn test_failure_leaves_source_unpositioned() {
        let mut source = SpanSource::new(MockSpans::failing_at(scenario_matches(), 1));
        assert!(source.next().unwrap());
        match *source.next().unwrap_err().kind() {
            ErrorKind::IterationFailure(_) => {}
            _ => panic!("expected iteration failure"),
        }
        assert!(source.doc().is_err());
    }

    #[test]
    fn test_boxed_spans() {
        let boxed: Box<dyn Spans> = Box::new(MockSpans::new(scenario_matches()));
        let mut source = SpanSource::new(boxed);
        assert!(source.skip_to(2).unwrap());
        assert_eq!(source.doc().unwrap(), 2);
        assert_eq!(source.match_length().unwrap(), 1);
    }
}
