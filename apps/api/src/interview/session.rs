use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interview::phase::Phase;
use crate::interview::profile::CandidateProfile;
use crate::interview::progress::{compute_progress, Progress};
use crate::interview::transcript::Transcript;

/// One answered technical question. Never mutated after it is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    /// 1-based.
    pub question_number: usize,
    pub question: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

/// All mutable state for one candidate's conversation.
///
/// A reset replaces the whole value; nothing is cleared field by field.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub phase: Phase,
    pub candidate: CandidateProfile,
    /// Questions issued so far in the current assessment run.
    pub q_idx: usize,
    pub total_questions: usize,
    /// Set while an answer is awaited.
    pub current_question: Option<String>,
    pub technical_responses: Vec<AssessmentResponse>,
    pub messages: Transcript,
    pub consent_given: bool,
}

impl Session {
    pub fn new(id: Uuid, total_questions: usize) -> Self {
        Self {
            id,
            started_at: Utc::now(),
            phase: Phase::Welcome,
            candidate: CandidateProfile::default(),
            q_idx: 0,
            total_questions,
            current_question: None,
            technical_responses: Vec::new(),
            messages: Transcript::default(),
            consent_given: false,
        }
    }

    pub fn answered(&self) -> usize {
        self.technical_responses.len()
    }

    pub fn progress(&self) -> Progress {
        compute_progress(&self.phase, self.answered(), self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_defaults() {
        let session = Session::new(Uuid::new_v4(), 3);
        assert_eq!(session.phase, Phase::Welcome);
        assert_eq!(session.q_idx, 0);
        assert_eq!(session.total_questions, 3);
        assert!(session.current_question.is_none());
        assert!(session.technical_responses.is_empty());
        assert!(session.messages.is_empty());
        assert!(!session.consent_given);
        assert_eq!(session.candidate, CandidateProfile::default());
    }

    #[test]
    fn test_progress_uses_answered_count() {
        let mut session = Session::new(Uuid::new_v4(), 3);
        session.phase = Phase::TechnicalAssessment;
        session.q_idx = 2;
        session.technical_responses.push(AssessmentResponse {
            question_number: 1,
            question: "What is a trait object?".to_string(),
            answer: "dyn Trait behind a pointer".to_string(),
            timestamp: Utc::now(),
        });
        assert_eq!(session.progress().label, "Technical Assessment (1/3)");
    }
}
