// src/models/question.rs

use serde::{Deserialize, Serialize};

/// A multiple-choice quiz question. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The text content of the question.
    pub question: String,

    /// Option labels in display order (e.g., ["A) 50%", "B) 25%"]).
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub correct: usize,
}

/// DTO for sending a question to the client (excludes the correct index).
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub index: usize,
    pub question: String,
    pub options: Vec<String>,
}

/// The questions the landing page quiz ships with.
pub fn default_questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion {
            question: "What percentage of plastic waste is actually recycled globally?".into(),
            options: vec![
                "A) 50%".into(),
                "B) 25%".into(),
                "C) 9%".into(),
                "D) 75%".into(),
            ],
            correct: 2,
        },
        QuizQuestion {
            question: "Which activity saves the most water?".into(),
            options: vec![
                "A) Taking shorter showers".into(),
                "B) Fixing leaky faucets".into(),
                "C) Using dishwasher".into(),
                "D) Washing car less".into(),
            ],
            correct: 1,
        },
    ]
}

/// DTO for jumping to a question.
#[derive(Debug, Deserialize)]
pub struct DisplayQuestionRequest {
    pub index: usize,
}

/// DTO for picking an option.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOptionRequest {
    pub question_index: usize,
    pub option_index: usize,
}
