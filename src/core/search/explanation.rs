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

use serde_json;

use error::Result;

/// Describes the score computation for a document and query.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Explanation {
    is_match: bool,
    value: f32,
    description: String,
    details: Vec<Explanation>,
}

impl Default for Explanation {
    /// An explanation carrying no information: not a match, value `0` and an
    /// empty description.
    fn default() -> Self {
        Explanation::new(false, 0.0, String::new(), vec![])
    }
}

impl Explanation {
    pub fn new(
        is_match: bool,
        value: f32,
        description: String,
        details: Vec<Explanation>,
    ) -> Explanation {
        let value = if !is_match { 0.0f32 } else { value };

        Explanation {
            is_match,
            value,
            description,
            details,
        }
    }

    pub fn is_match(&self) -> bool {
        self.is_match
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn details(&self) -> &[Explanation] {
        self.details.as_ref()
    }

    pub fn summary(&self) -> String {
        format!("{} = {}", self.value, self.description)
    }

    /// Renders this explanation and its details as an indented tree.
    pub fn to_string(&self, depth: usize) -> String {
        let mut buffer = "  ".repeat(depth);
        buffer.push_str(&self.summary());
        buffer.push('\n');

        for detail in &self.details {
            buffer.push_str(&detail.to_string(depth + 1))
        }

        buffer
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_zero_without_match() {
        let expl = Explanation::new(false, 3.5, "tf(phraseFreq=0)".to_string(), vec![]);
        assert!(!expl.is_match());
        assert!(expl.value().abs() < ::std::f32::EPSILON);
    }

    #[test]
    fn test_to_string_indents_details() {
        let expl = Explanation::new(
            true,
            2.0,
            "sum of:".to_string(),
            vec![
                Explanation::new(true, 1.5, "a".to_string(), vec![]),
                Explanation::new(true, 0.5, "b".to_string(), vec![]),
            ],
        );
        assert_eq!(expl.to_string(0), "2 = sum of:\n  1.5 = a\n  0.5 = b\n");
    }

    #[test]
    fn test_json() {
        let expl = Explanation::new(true, 1.5, "tf(phraseFreq=2.25)".to_string(), vec![]);
        let json = expl.to_json().unwrap();
        let back: Explanation = serde_json::from_str(&json).unwrap();
        assert!(back.is_match());
        assert!((back.value() - 1.5).abs() < ::std::f32::EPSILON);
        assert_eq!(back.description(), "tf(phraseFreq=2.25)");
        assert!(back.details().is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        let expl = Explanation::default();
        assert!(!expl.is_match());
        assert!(expl.description().is_empty());
        assert_eq!(expl.summary(), "0 = ");
    }
}
