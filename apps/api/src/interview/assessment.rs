//! Assessment loop — ask → answer → evaluate → repeat, `total_questions` times.
//!
//! Backend failures never stall the loop: a failed generation becomes a
//! fallback question and a failed evaluation becomes a fixed acknowledgement.
//! Both are logged and reported back as operator notices.

use chrono::Utc;
use tracing::{error, info};

use crate::interview::machine::Turn;
use crate::interview::phase::Phase;
use crate::interview::service::{fallback_question, QuestionRequest, EVALUATION_FALLBACK};
use crate::interview::session::AssessmentResponse;

pub const ASSESSMENT_DONE_MESSAGE: &str =
    "🎉 Excellent work – you've completed the technical assessment.";
pub const CLOSING_MESSAGE: &str = "Thank you for completing the screening! Our recruitment team will review \
     your responses within **2-3 business days** and contact you if there is a match.";

impl Turn<'_> {
    /// Issues the next question, or wraps up once all have been asked.
    pub(crate) async fn ask_next_question(&mut self) {
        let total = self.session.total_questions;
        let idx = self.session.q_idx;
        if idx >= total {
            self.finish_assessment();
            return;
        }

        let candidate = &self.session.candidate;
        let request = QuestionRequest {
            tech_stack: &candidate.tech_stack,
            experience: candidate.experience.as_deref(),
            position: candidate.position.as_deref(),
            question_number: idx + 1,
            total_questions: total,
        };
        let generated = self.assessment.generate_question(&request).await;

        let question = match generated {
            Ok(question) => question,
            Err(e) => {
                error!(session_id = %self.session.id, "Error generating question: {e}");
                self.outcome
                    .notices
                    .push(format!("Error generating question {}: {e}", idx + 1));
                fallback_question(&self.session.candidate.tech_stack)
            }
        };

        self.say(format!("**Question {}/{total}**\n\n{question}", idx + 1));
        self.session.current_question = Some(question);
        self.session.q_idx += 1;
    }

    /// Treats `input` as the answer to the outstanding question.
    pub(crate) async fn record_answer(&mut self, input: &str) {
        let question = self.session.current_question.take().unwrap_or_default();
        let question_number = self.session.q_idx;

        self.session.technical_responses.push(AssessmentResponse {
            question_number,
            question: question.clone(),
            answer: input.to_string(),
            timestamp: Utc::now(),
        });
        debug_assert_eq!(self.session.technical_responses.len(), question_number);

        let tech_context = self.session.candidate.tech_context();
        let evaluated = self
            .assessment
            .evaluate_answer(&question, input, &tech_context)
            .await;

        let evaluation = match evaluated {
            Ok(evaluation) => evaluation,
            Err(e) => {
                error!(session_id = %self.session.id, "Error evaluating answer: {e}");
                self.outcome
                    .notices
                    .push(format!("Error evaluating answer {question_number}: {e}"));
                EVALUATION_FALLBACK.to_string()
            }
        };
        self.say(format!("**📊 Evaluation:**\n\n{evaluation}"));

        if self.session.q_idx < self.session.total_questions {
            self.ask_next_question().await;
        } else {
            self.finish_assessment();
        }
    }

    fn finish_assessment(&mut self) {
        info!(
            session_id = %self.session.id,
            "Technical assessment finished with {} answers",
            self.session.technical_responses.len()
        );
        self.say(ASSESSMENT_DONE_MESSAGE);
        self.enter(Phase::Summary);

        let summary = self.session.candidate.final_summary();
        self.say(summary);
        self.say(CLOSING_MESSAGE);
        self.enter(Phase::Completion);
    }
}
