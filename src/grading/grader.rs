use serde_json::Value;

use crate::{
    grading::normalize_text,
    models::{GradeReport, Question, QuestionResult, UserAnswers},
};

/// Check one answer against its question.
///
/// Answers of the wrong shape, or missing answers, count as incorrect.
pub fn is_answer_correct(question: &Question, answer: Option<&Value>) -> bool {
    match question {
        Question::MultipleChoice(q) => answer
            .and_then(Value::as_f64)
            .is_some_and(|choice| choice == q.correct_answer as f64),
        Question::TrueFalse(q) => answer.and_then(Value::as_bool) == Some(q.correct_answer),
        Question::FillBlank(q) => {
            let expected: Vec<String> = q.correct_answers.iter().map(|s| normalize_text(s)).collect();
            let got: Vec<String> = match answer {
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| normalize_text(&answer_text(Some(item))))
                    .collect(),
                Some(Value::String(text)) => vec![normalize_text(text)],
                _ => Vec::new(),
            };
            expected == got
        }
        Question::ShortAnswer(q) => {
            normalize_text(&answer_text(answer)) == normalize_text(&q.correct_answer)
        }
        Question::Relationship(q) => {
            let mut expected = q.correct_pairs.clone();
            let mut got = answer.and_then(relationship_pairs).unwrap_or_default();
            expected.sort();
            got.sort();
            expected == got
        }
        Question::Justification(q) => {
            answer
                .and_then(|value| value.get("answer"))
                .and_then(Value::as_bool)
                == Some(q.correct_answer)
        }
    }
}

/// `[item, concept]` index pairs; `None` if any pair is malformed
fn relationship_pairs(answer: &Value) -> Option<Vec<(usize, usize)>> {
    answer
        .as_array()?
        .iter()
        .map(|pair| match pair.as_array()?.as_slice() {
            [item, concept] => Some((pair_index(item)?, pair_index(concept)?)),
            _ => None,
        })
        .collect()
}

/// Non-negative whole number, whether sent as `1` or `1.0`
fn pair_index(value: &Value) -> Option<usize> {
    if let Some(n) = value.as_u64() {
        return usize::try_from(n).ok();
    }
    let n = value.as_f64()?;
    (n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64).then_some(n as usize)
}

/// Text form of a loose answer value; missing and `null` read as empty
fn answer_text(answer: Option<&Value>) -> String {
    match answer {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Grade a practice page. Every question is graded, answered or not.
pub fn grade(questions: &[Question], answers: &UserAnswers) -> GradeReport {
    let results: Vec<QuestionResult> = questions
        .iter()
        .map(|question| {
            let correct = is_answer_correct(question, answers.get(question.id()));
            tracing::trace!("Question {} ({}): correct={}", question.id(), question.kind(), correct);
            QuestionResult {
                id: question.id().to_string(),
                correct,
                points_awarded: if correct { question.points() } else { 0 },
            }
        })
        .collect();

    let report = GradeReport {
        score: results.iter().filter(|r| r.correct).count(),
        total: questions.len(),
        points_earned: results.iter().map(|r| r.points_awarded).sum(),
        points_possible: questions.iter().map(Question::points).sum(),
        results,
    };

    tracing::debug!(
        "Graded practice page: {}/{} correct, {}/{} points",
        report.score,
        report.total,
        report.points_earned,
        report.points_possible
    );

    report
}
