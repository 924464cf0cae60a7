// src/services/quiz.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::models::question::{PublicQuestion, QuizQuestion};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("The quiz has no questions")]
    Empty,

    #[error("Question {0} does not exist")]
    QuestionOutOfRange(usize),

    #[error("Question {question} has no option {option}")]
    OptionOutOfRange { question: usize, option: usize },

    #[error("This quiz has already been submitted")]
    AlreadySubmitted,
}

/// Which navigation controls are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub previous_disabled: bool,
    pub show_next: bool,
    pub show_submit: bool,
}

/// Snapshot of a quiz session for the page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    pub position: usize,
    pub total: usize,
    pub question: PublicQuestion,
    pub selected: Option<usize>,
    pub navigation: Navigation,
    pub submitted: bool,
    pub score: Option<usize>,
}

/// One pass through the quiz, from page load to submission.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Arc<[QuizQuestion]>,
    position: usize,
    /// Question index -> selected option. Absent until answered.
    answers: BTreeMap<usize, usize>,
    score: Option<usize>,
}

impl QuizSession {
    pub fn new(questions: Arc<[QuizQuestion]>) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        Ok(Self {
            questions,
            position: 0,
            answers: BTreeMap::new(),
            score: None,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn selection(&self, question: usize) -> Option<usize> {
        self.answers.get(&question).copied()
    }

    pub fn score(&self) -> Option<usize> {
        self.score
    }

    pub fn is_submitted(&self) -> bool {
        self.score.is_some()
    }

    fn last(&self) -> usize {
        self.questions.len() - 1
    }

    /// Makes question `index` the active one.
    pub fn display_question(&mut self, index: usize) -> Result<(), QuizError> {
        if index >= self.questions.len() {
            return Err(QuizError::QuestionOutOfRange(index));
        }
        self.position = index;
        Ok(())
    }

    /// Records `option` for `question`, replacing any earlier pick. Does not advance.
    pub fn select_option(&mut self, question: usize, option: usize) -> Result<(), QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let q = self
            .questions
            .get(question)
            .ok_or(QuizError::QuestionOutOfRange(question))?;
        if option >= q.options.len() {
            return Err(QuizError::OptionOutOfRange { question, option });
        }
        self.answers.insert(question, option);
        Ok(())
    }

    pub fn previous(&mut self) -> usize {
        self.position = self.position.saturating_sub(1);
        self.position
    }

    pub fn next(&mut self) -> usize {
        self.position = (self.position + 1).min(self.last());
        self.position
    }

    /// Scores the session. Unanswered questions never count. Allowed once.
    pub fn submit(&mut self) -> Result<usize, QuizError> {
        if self.is_submitted() {
            return Err(QuizError::AlreadySubmitted);
        }
        let score = self
            .answers
            .iter()
            .filter(|(q, selected)| {
                self.questions
                    .get(**q)
                    .is_some_and(|question| question.correct == **selected)
            })
            .count();
        self.score = Some(score);
        Ok(score)
    }

    pub fn navigation(&self) -> Navigation {
        let on_last = self.position == self.last();
        Navigation {
            previous_disabled: self.position == 0,
            show_next: !on_last,
            show_submit: on_last,
        }
    }

    pub fn view(&self) -> QuizView {
        let current = &self.questions[self.position];
        QuizView {
            position: self.position,
            total: self.questions.len(),
            question: PublicQuestion {
                index: self.position,
                question: current.question.clone(),
                options: current.options.clone(),
            },
            selected: self.selection(self.position),
            navigation: self.navigation(),
            submitted: self.is_submitted(),
            score: self.score,
        }
    }
}
