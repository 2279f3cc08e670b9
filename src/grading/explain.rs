use serde::{Deserialize, Serialize};

use crate::grading::normalize_text;

const POINTS_PER_KEYWORD: u32 = 10;
const MAX_POINTS: u32 = 100;
const MAX_OFF_TOPIC_TERMS: usize = 5;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackLevel {
    /// Most key concepts covered (70+ points)
    Excellent,
    /// Some concepts missing (40+ points)
    Partial,
    Review,
}

impl FeedbackLevel {
    fn for_points(points: u32) -> Self {
        if points >= 70 {
            FeedbackLevel::Excellent
        } else if points >= 40 {
            FeedbackLevel::Partial
        } else {
            FeedbackLevel::Review
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExplanationReport {
    pub points: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// First few answer terms that are not keywords
    pub off_topic: Vec<String>,
    pub feedback: FeedbackLevel,
}

/// Score a free-text explanation by the keywords it mentions
pub fn evaluate_explanation(answer: &str, keywords: &[String]) -> ExplanationReport {
    let normalized_answer = normalize_text(answer);
    let terms: Vec<&str> = normalized_answer.split(' ').filter(|t| !t.is_empty()).collect();

    let mut normalized_keywords: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = normalize_text(keyword);
        if !keyword.is_empty() && !normalized_keywords.contains(&keyword) {
            normalized_keywords.push(keyword);
        }
    }

    let (matched, missing): (Vec<String>, Vec<String>) = normalized_keywords
        .into_iter()
        .partition(|keyword| terms.contains(&keyword.as_str()));

    let off_topic = terms
        .iter()
        .filter(|term| !matched.iter().any(|k| k == *term))
        .take(MAX_OFF_TOPIC_TERMS)
        .map(|term| term.to_string())
        .collect();

    let points = (matched.len() as u32 * POINTS_PER_KEYWORD).min(MAX_POINTS);

    ExplanationReport {
        points,
        matched,
        missing,
        off_topic,
        feedback: FeedbackLevel::for_points(points),
    }
}
