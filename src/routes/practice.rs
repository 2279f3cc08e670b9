use axum::Json;
use serde::Deserialize;

use crate::{
    grading::{evaluate_explanation, grade, ExplanationReport},
    models::{GradeReport, Question, UserAnswers},
};

#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub answers: UserAnswers,
}

#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub answer: String,
    pub keywords: Vec<String>,
}

/// Grade a practice page against the learner's answers
pub async fn grade_practice(Json(payload): Json<GradeRequest>) -> Json<GradeReport> {
    Json(grade(&payload.questions, &payload.answers))
}

/// Score an Explain-It answer by keyword coverage
pub async fn explain(Json(payload): Json<ExplainRequest>) -> Json<ExplanationReport> {
    let report = evaluate_explanation(&payload.answer, &payload.keywords);
    tracing::debug!(
        "Explain-It answer scored {} ({} keywords matched)",
        report.points,
        report.matched.len()
    );
    Json(report)
}
