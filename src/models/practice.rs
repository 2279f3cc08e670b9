use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// User answers keyed by question id. Values are whatever the front end sent;
/// the grader checks the shape per question type.
pub type UserAnswers = HashMap<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueFalseQuestion {
    pub id: String,
    pub question: String,
    pub correct_answer: bool,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub blanks: usize,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortAnswerQuestion {
    pub id: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default)]
    pub concepts: Vec<String>,
    /// `[itemIndex, conceptIndex]` pairs
    pub correct_pairs: Vec<(usize, usize)>,
    #[serde(default)]
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JustificationQuestion {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub statement: String,
    pub correct_answer: bool,
    /// Reference justification, shown to the learner but never auto-graded
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub points: u32,
}

/// A generated practice question, tagged by `type` the way the front end sends it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice(MultipleChoiceQuestion),
    TrueFalse(TrueFalseQuestion),
    FillBlank(FillBlankQuestion),
    ShortAnswer(ShortAnswerQuestion),
    Relationship(RelationshipQuestion),
    Justification(JustificationQuestion),
}

impl Question {
    pub fn id(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.id,
            Question::TrueFalse(q) => &q.id,
            Question::FillBlank(q) => &q.id,
            Question::ShortAnswer(q) => &q.id,
            Question::Relationship(q) => &q.id,
            Question::Justification(q) => &q.id,
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            Question::MultipleChoice(q) => q.points,
            Question::TrueFalse(q) => q.points,
            Question::FillBlank(q) => q.points,
            Question::ShortAnswer(q) => q.points,
            Question::Relationship(q) => q.points,
            Question::Justification(q) => q.points,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Question::MultipleChoice(_) => "multiple-choice",
            Question::TrueFalse(_) => "true-false",
            Question::FillBlank(_) => "fill-blank",
            Question::ShortAnswer(_) => "short-answer",
            Question::Relationship(_) => "relationship",
            Question::Justification(_) => "justification",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub id: String,
    pub correct: bool,
    pub points_awarded: u32,
}

/// Outcome of grading one practice page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GradeReport {
    pub results: Vec<QuestionResult>,
    /// Number of correct answers
    pub score: usize,
    /// Number of questions graded
    pub total: usize,
    pub points_earned: u32,
    pub points_possible: u32,
}
