//! Question catalog
//!
//! Static assessment configuration: ordered question prompts with their
//! weights, plus the ordered option lists for age group and job function.
//! The catalog is built once at startup and shared read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{Error, Result};

/// Lowest value on the 7-point Likert scale
pub const LIKERT_MIN: u8 = 1;

/// Highest value on the 7-point Likert scale
pub const LIKERT_MAX: u8 = 7;

/// Caption shown under the low end of the scale
pub const LIKERT_LOW_CAPTION: &str = "전혀 그렇지 않다";

/// Caption shown under the high end of the scale
pub const LIKERT_HIGH_CAPTION: &str = "매우 그렇다";

/// A single Likert-scale question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub prompt: String,
    pub weight: f64,
}

/// Serialized form of the catalog (TOML `[catalog]` table)
///
/// Prompts and weights are parallel lists, one weight per prompt.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub age_groups: Vec<String>,
    #[serde(default)]
    pub job_functions: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
    #[serde(default)]
    pub weights: Vec<f64>,
}

/// Validated, immutable question catalog
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    age_groups: Vec<String>,
    job_functions: Vec<String>,
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog from its serialized form
    ///
    /// Fails with [`Error::Config`] when the weight list does not line up
    /// with the question list or when any option list is empty or repeats
    /// a label.
    pub fn from_config(config: CatalogConfig) -> Result<Self> {
        if config.questions.is_empty() {
            return Err(Error::Config("catalog has no questions".to_string()));
        }
        if config.weights.len() != config.questions.len() {
            return Err(Error::Config(format!(
                "catalog has {} questions but {} weights",
                config.questions.len(),
                config.weights.len()
            )));
        }
        if let Some(bad) = config.weights.iter().find(|w| !w.is_finite()) {
            return Err(Error::Config(format!("weight {} is not finite", bad)));
        }
        validate_options("age_groups", &config.age_groups)?;
        validate_options("job_functions", &config.job_functions)?;

        let questions = config
            .questions
            .into_iter()
            .zip(config.weights)
            .map(|(prompt, weight)| Question { prompt, weight })
            .collect();

        Ok(Self {
            age_groups: config.age_groups,
            job_functions: config.job_functions,
            questions,
        })
    }

    /// Serialized form of this catalog
    pub fn to_config(&self) -> CatalogConfig {
        CatalogConfig {
            age_groups: self.age_groups.clone(),
            job_functions: self.job_functions.clone(),
            questions: self.questions.iter().map(|q| q.prompt.clone()).collect(),
            weights: self.weights(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn age_groups(&self) -> &[String] {
        &self.age_groups
    }

    pub fn job_functions(&self) -> &[String] {
        &self.job_functions
    }

    /// Number of questions (N); valid indices are `0..N`
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Weights in question order
    pub fn weights(&self) -> Vec<f64> {
        self.questions.iter().map(|q| q.weight).collect()
    }

    /// Sum of all weights, in index order
    pub fn total_weight(&self) -> f64 {
        self.questions.iter().map(|q| q.weight).sum()
    }

    pub fn contains_age_group(&self, value: &str) -> bool {
        self.age_groups.iter().any(|g| g == value)
    }

    pub fn contains_job_function(&self, value: &str) -> bool {
        self.job_functions.iter().any(|j| j == value)
    }
}

impl Default for QuestionCatalog {
    /// Compiled-in ToMo catalog
    ///
    /// Twenty prompts over the six motives. Direct motives (play, purpose,
    /// potential) carry positive weights, indirect motives (emotional
    /// pressure, economic pressure, inertia) negative ones. Per motive the
    /// weights add up to 10, 5, 1.66, -1.66, -5 and -10.
    fn default() -> Self {
        const PLAY: f64 = 2.5;
        const PURPOSE: f64 = 1.25;
        const POTENTIAL: f64 = 0.83;
        const EMOTIONAL: f64 = -0.83;
        const ECONOMIC: f64 = -1.25;
        const INERTIA: f64 = -2.5;

        let items: [(&str, f64); 20] = [
            ("나는 지금 하는 일 자체가 즐겁다.", PLAY),
            ("일을 하다 보면 시간 가는 줄 모를 때가 많다.", PLAY),
            ("업무 중에 새로운 방법을 시도해 보는 것이 재미있다.", PLAY),
            ("누가 시키지 않아도 일에 대해 궁금한 점을 찾아본다.", PLAY),
            ("내 일이 다른 사람에게 도움이 된다고 느낀다.", PURPOSE),
            ("우리 조직이 추구하는 가치에 공감한다.", PURPOSE),
            ("내가 하는 일의 결과가 중요하다고 생각한다.", PURPOSE),
            ("내 일이 더 큰 목표에 기여한다고 믿는다.", PURPOSE),
            ("이 일을 통해 내가 원하는 미래에 가까워지고 있다.", POTENTIAL),
            ("지금의 업무 경험이 나의 성장에 도움이 된다.", POTENTIAL),
            ("일을 잘하지 못하면 부끄러울 것 같아서 열심히 한다.", EMOTIONAL),
            ("주변의 기대를 저버리지 않기 위해 일한다.", EMOTIONAL),
            ("보상이나 승진을 위해서 일을 한다.", ECONOMIC),
            ("불이익을 받지 않으려고 일을 한다.", ECONOMIC),
            ("돈을 벌어야 하기 때문에 어쩔 수 없이 일한다.", ECONOMIC),
            ("평가를 잘 받기 위해서만 업무에 신경 쓴다.", ECONOMIC),
            ("왜 이 일을 하고 있는지 잘 모르겠다.", INERTIA),
            ("어제 했으니까 오늘도 그냥 일한다.", INERTIA),
            ("그만둘 이유가 없어서 계속 다니고 있다.", INERTIA),
            ("일에 대해 아무런 감정이 들지 않는다.", INERTIA),
        ];

        Self {
            age_groups: ["20대", "30대", "40대", "50대", "60대 이상"]
                .into_iter()
                .map(String::from)
                .collect(),
            job_functions: ["개발", "기획", "디자인", "마케팅", "영업", "인사", "재무", "기타"]
                .into_iter()
                .map(String::from)
                .collect(),
            questions: items
                .iter()
                .map(|(prompt, weight)| Question {
                    prompt: prompt.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }
}

fn validate_options(field: &str, options: &[String]) -> Result<()> {
    if options.is_empty() {
        return Err(Error::Config(format!("catalog {} is empty", field)));
    }
    let mut seen = HashSet::new();
    for option in options {
        if option.trim().is_empty() {
            return Err(Error::Config(format!("catalog {} has a blank label", field)));
        }
        if !seen.insert(option.as_str()) {
            return Err(Error::Config(format!(
                "catalog {} repeats label '{}'",
                field, option
            )));
        }
    }
    Ok(())
}
