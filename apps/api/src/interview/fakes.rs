//! Scripted `AssessmentService` for tests. Records every call.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::interview::service::{AssessmentService, QuestionRequest};

#[derive(Default)]
pub struct ScriptedAssessment {
    /// 1-based generator call numbers that should fail.
    pub fail_question_calls: HashSet<usize>,
    pub fail_evaluations: bool,
    requested: Mutex<Vec<usize>>,
    evaluated: Mutex<Vec<(String, String, String)>>,
}

impl ScriptedAssessment {
    pub fn failing_questions(calls: &[usize]) -> Self {
        Self {
            fail_question_calls: calls.iter().copied().collect(),
            ..Default::default()
        }
    }

    pub fn failing_evaluations() -> Self {
        Self {
            fail_evaluations: true,
            ..Default::default()
        }
    }

    pub fn question_calls(&self) -> usize {
        self.requested.lock().unwrap().len()
    }

    /// `question_number` of every generator call, in order.
    pub fn requested_numbers(&self) -> Vec<usize> {
        self.requested.lock().unwrap().clone()
    }

    pub fn evaluation_calls(&self) -> usize {
        self.evaluated.lock().unwrap().len()
    }

    /// `(question, answer, tech_context)` of every evaluator call.
    pub fn evaluations(&self) -> Vec<(String, String, String)> {
        self.evaluated.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssessmentService for ScriptedAssessment {
    async fn generate_question(&self, request: &QuestionRequest<'_>) -> Result<String, AppError> {
        let call = {
            let mut requested = self.requested.lock().unwrap();
            requested.push(request.question_number);
            requested.len()
        };
        if self.fail_question_calls.contains(&call) {
            return Err(AppError::Llm("scripted generator outage".to_string()));
        }
        Ok(format!("Scripted question {}?", request.question_number))
    }

    async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        tech_context: &str,
    ) -> Result<String, AppError> {
        self.evaluated.lock().unwrap().push((
            question.to_string(),
            answer.to_string(),
            tech_context.to_string(),
        ));
        if self.fail_evaluations {
            return Err(AppError::Llm("scripted evaluator outage".to_string()));
        }
        Ok("Technical accuracy: 8/10. Clear and correct.".to_string())
    }
}
