pub mod practice;
pub mod puzzle;

pub use practice::{
    // Question shapes
    FillBlankQuestion, JustificationQuestion, MultipleChoiceQuestion, Question,
    RelationshipQuestion, ShortAnswerQuestion, TrueFalseQuestion,
    // Grading output
    GradeReport, QuestionResult, UserAnswers,
};
pub use puzzle::{
    CrosswordGrid, CrosswordPlacement, CrosswordWord, EndMarker, LetterGrid, LetterNode,
    NodePosition, Orientation, Position, WordPlacement,
};
