pub mod explain;
pub mod grader;
pub mod normalize;

pub use explain::{evaluate_explanation, ExplanationReport, FeedbackLevel};
pub use grader::{grade, is_answer_correct};
pub use normalize::normalize_text;
