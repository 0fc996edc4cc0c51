//! Scoring engine
//!
//! The ToMo score is the weighted sum of the Likert answers:
//! `score = Σ answers[i] * weight[i]` over every question index, in index
//! order.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::{QuestionCatalog, LIKERT_MAX, LIKERT_MIN};
use crate::{Error, Result};

/// Answers keyed by question index
///
/// Partial while the respondent is filling the assessment in; complete when
/// every index `0..N` holds a value in `[1, 7]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnswerSet {
    values: BTreeMap<usize, u8>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the answer for `index`
    ///
    /// `question_count` bounds the index; the value must lie on the Likert
    /// scale.
    pub fn record(&mut self, index: usize, value: u8, question_count: usize) -> Result<()> {
        if index >= question_count {
            return Err(Error::InvalidInput(format!(
                "question index {} out of range (0..{})",
                index, question_count
            )));
        }
        if !(LIKERT_MIN..=LIKERT_MAX).contains(&value) {
            return Err(Error::InvalidInput(format!(
                "answer {} outside scale {}..={}",
                value, LIKERT_MIN, LIKERT_MAX
            )));
        }
        self.values.insert(index, value);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        self.values.get(&index).copied()
    }

    /// Number of questions answered so far
    pub fn answered(&self) -> usize {
        self.values.len()
    }

    /// True when every index `0..question_count` has an answer
    pub fn is_complete(&self, question_count: usize) -> bool {
        (0..question_count).all(|i| self.values.contains_key(&i))
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(usize, u8)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (usize, u8)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Weighted score of an answer set
///
/// A missing index counts as 0. Callers check completeness first.
pub fn score(answers: &AnswerSet, catalog: &QuestionCatalog) -> f64 {
    catalog
        .questions()
        .iter()
        .enumerate()
        .fold(0.0, |acc, (index, question)| {
            let answer = answers.get(index).unwrap_or(0);
            acc + f64::from(answer) * question.weight
        })
}

/// Two-decimal rendering used by every view that shows a score
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}
