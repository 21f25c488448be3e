//! Phase machine — turns one candidate input into state changes and replies.
//!
//! Flow per input: record the user message → dispatch on the current phase →
//! validate → mutate profile / assessment state → append assistant replies.
//!
//! A `Turn` borrows the session exclusively, so one input is fully processed
//! before the next can start.

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Serialize;
use tracing::{debug, info};

use crate::interview::phase::{Phase, PersonalStep, ProfessionalStep};
use crate::interview::profile::{looks_like_email, parse_tech_stack, ProfileField};
use crate::interview::service::AssessmentService;
use crate::interview::session::Session;
use crate::interview::transcript::{Role, TranscriptMessage};

pub const PRIVACY_NOTICE: &str = "Your information will be used solely for recruitment purposes. \
    We comply with GDPR and data-protection regulations. \
    You can request data deletion at any time. \
    We will not store your data after this session is over, so export it if you want a copy.";

/// Canned replies for input that arrives in a phase with no handler.
pub const CLARIFICATION_RESPONSES: [&str; 5] = [
    "I didn't quite understand that 🤔  Could you please re-phrase?",
    "Let me try a different approach – can you give more detail?",
    "Hmm, I'm not sure I follow. Could you clarify?",
    "That's interesting! Can you elaborate a bit more?",
    "I want to be sure I understand – could you re-state that?",
];

pub const SESSION_COMPLETE_MESSAGE: &str =
    "The session is complete. Thank you for using TalentScout! 👋";

/// What a single turn produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnOutcome {
    /// Every message appended this turn, the user's own input first.
    pub messages: Vec<TranscriptMessage>,
    /// Phases entered this turn, in order.
    pub phases: Vec<Phase>,
    /// Operator-facing notes about backend failures that were papered over.
    pub notices: Vec<String>,
}

/// Exclusive view of a session for the duration of one input.
pub struct Turn<'a> {
    pub(crate) session: &'a mut Session,
    pub(crate) assessment: &'a dyn AssessmentService,
    pub(crate) rng: &'a mut (dyn RngCore + Send),
    pub(crate) outcome: TurnOutcome,
}

impl<'a> Turn<'a> {
    pub fn new(
        session: &'a mut Session,
        assessment: &'a dyn AssessmentService,
        rng: &'a mut (dyn RngCore + Send),
    ) -> Self {
        Self {
            session,
            assessment,
            rng,
            outcome: TurnOutcome::default(),
        }
    }

    /// Emits the greeting and consent question. No-op unless in `welcome`.
    pub fn begin(mut self) -> TurnOutcome {
        if self.session.phase != Phase::Welcome {
            return self.outcome;
        }
        debug_assert!(self.session.messages.is_empty());
        self.say("Hello! I'm **TalentScout**, your AI hiring assistant. 👋");
        self.say(
            "This screening takes roughly *5–10 minutes* and uses **AI-powered questions** \
             tailored to your skills and background.",
        );
        self.say(format!(
            "Before we begin, **do you consent** to our privacy policy?\n\n> {PRIVACY_NOTICE}\n\n\
             Please respond with **yes** or **no**."
        ));
        self.enter(Phase::Consent);
        self.outcome
    }

    /// Processes one candidate input to completion.
    pub async fn handle_input(mut self, input: &str) -> TurnOutcome {
        self.push(Role::User, input);

        let phase = self.session.phase;
        match phase {
            Phase::Consent => self.handle_consent(input),
            Phase::PersonalInfo(step) => self.handle_personal(step, input),
            Phase::ProfessionalInfo(step) => self.handle_professional(step, input),
            Phase::TechStack => self.handle_tech_stack(input).await,
            Phase::TechnicalAssessment => self.record_answer(input).await,
            Phase::Completion => self.say(SESSION_COMPLETE_MESSAGE),
            Phase::Welcome | Phase::Summary => self.clarify(),
        }

        self.outcome
    }

    pub(crate) fn say(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content);
    }

    fn push(&mut self, role: Role, content: impl Into<String>) {
        let message = self.session.messages.push(role, content).clone();
        self.outcome.messages.push(message);
    }

    pub(crate) fn enter(&mut self, next: Phase) {
        let from = self.session.phase;
        debug_assert!(
            from.allows_transition_to(&next),
            "illegal phase transition {from:?} -> {next:?}"
        );
        debug!(session_id = %self.session.id, "phase {:?} -> {:?}", from, next);
        self.session.phase = next;
        self.outcome.phases.push(next);
    }

    fn handle_consent(&mut self, input: &str) {
        let answer = input.trim().to_lowercase();
        if answer.starts_with('y') {
            self.session.consent_given = true;
            self.say("Excellent! Let's start with some basic information. What's your **full name**?");
            self.enter(Phase::PersonalInfo(PersonalStep::Name));
        } else if answer.starts_with('n') {
            info!(session_id = %self.session.id, "Candidate declined consent");
            self.say("I understand. Without consent we cannot proceed. Feel free to return when ready. 👋");
            self.enter(Phase::Completion);
        } else {
            self.say("Please reply **yes** or **no** regarding consent.");
        }
    }

    fn handle_personal(&mut self, step: PersonalStep, input: &str) {
        match step {
            PersonalStep::Name => {
                if input.trim().is_empty() {
                    self.say("Please tell me your **full name** to continue.");
                    return;
                }
                self.session.candidate.record(ProfileField::Name, input);
                self.say("Great! What's your **email address**?");
                self.enter(Phase::PersonalInfo(PersonalStep::Email));
            }
            PersonalStep::Email => {
                if !looks_like_email(input) {
                    self.say("That doesn't look like a valid email. Please try again.");
                    return;
                }
                self.session.candidate.record(ProfileField::Email, input);
                self.say("Thanks! What's your **phone number**?");
                self.enter(Phase::PersonalInfo(PersonalStep::Phone));
            }
            PersonalStep::Phone => {
                self.session.candidate.record(ProfileField::Phone, input);
                self.say("And your **current location** (city, country)?");
                self.enter(Phase::PersonalInfo(PersonalStep::Location));
            }
            PersonalStep::Location => {
                self.session.candidate.record(ProfileField::Location, input);
                self.say("Awesome. How many **years of experience** do you have in technology?");
                self.enter(Phase::ProfessionalInfo(ProfessionalStep::Experience));
            }
        }
    }

    fn handle_professional(&mut self, step: ProfessionalStep, input: &str) {
        match step {
            ProfessionalStep::Experience => {
                self.session.candidate.record(ProfileField::Experience, input);
                self.say("What **position(s)** are you interested in or currently seeking?");
                self.enter(Phase::ProfessionalInfo(ProfessionalStep::Position));
            }
            ProfessionalStep::Position => {
                self.session.candidate.record(ProfileField::Position, input);
                self.say(
                    "Great choice! Please list your **tech stack** \
                     (languages / frameworks / tools) separated by commas.",
                );
                self.enter(Phase::TechStack);
            }
        }
    }

    async fn handle_tech_stack(&mut self, input: &str) {
        let techs = parse_tech_stack(input);
        if techs.is_empty() {
            self.say("Please provide at least one technology.");
            return;
        }

        let listed = techs.join(", ");
        self.session.candidate.record_tech_stack(techs);
        self.say(format!("Impressive stack: {listed}"));
        self.say(format!(
            "Perfect! Now I'll generate **AI-powered technical questions** \
             tailored to your skills. Ready for {} questions?",
            self.session.total_questions
        ));

        self.session.q_idx = 0;
        self.session.technical_responses.clear();
        self.session.current_question = None;
        self.enter(Phase::TechnicalAssessment);

        self.ask_next_question().await;
    }

    fn clarify(&mut self) {
        let reply = CLARIFICATION_RESPONSES
            .choose(&mut *self.rng)
            .copied()
            .unwrap_or(CLARIFICATION_RESPONSES[0]);
        self.say(reply);
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    use super::*;
    use crate::interview::fakes::ScriptedAssessment;
    use crate::interview::profile::CandidateProfile;

    fn new_session() -> Session {
        Session::new(Uuid::new_v4(), 3)
    }

    async fn send(
        session: &mut Session,
        service: &ScriptedAssessment,
        rng: &mut StdRng,
        input: &str,
    ) -> TurnOutcome {
        Turn::new(session, service, rng).handle_input(input).await
    }

    /// Drives a fresh session up to the tech-stack prompt.
    async fn through_intake(session: &mut Session, service: &ScriptedAssessment, rng: &mut StdRng) {
        Turn::new(session, service, rng).begin();
        for input in [
            "yes",
            "Ada Lovelace",
            "ada@example.com",
            "+44 20 7946 0000",
            "London, UK",
            "7",
            "Backend Engineer",
        ] {
            send(session, service, rng, input).await;
        }
        assert_eq!(session.phase, Phase::TechStack);
    }

    #[test]
    fn test_begin_emits_welcome_and_enters_consent() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);

        let outcome = Turn::new(&mut session, &service, &mut rng).begin();
        assert_eq!(session.phase, Phase::Consent);
        assert_eq!(outcome.messages.len(), 3);
        assert!(outcome.messages[2].content.contains(PRIVACY_NOTICE));
        assert_eq!(outcome.phases, vec![Phase::Consent]);
    }

    #[test]
    fn test_begin_is_noop_after_welcome() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();
        let outcome = Turn::new(&mut session, &service, &mut rng).begin();
        assert!(outcome.messages.is_empty());
        assert_eq!(session.messages.len(), 3);
    }

    #[tokio::test]
    async fn test_consent_yes_moves_to_name() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();

        let outcome = send(&mut session, &service, &mut rng, "yes").await;
        assert!(session.consent_given);
        assert_eq!(session.phase, Phase::PersonalInfo(PersonalStep::Name));
        assert_eq!(session.phase.step(), Some("name"));
        assert_eq!(outcome.messages[0].role, Role::User);
        assert_eq!(outcome.messages[0].content, "yes");
    }

    #[tokio::test]
    async fn test_consent_is_case_insensitive_prefix() {
        for input in ["Y", "YES please", "yeah", "Yup"] {
            let mut session = new_session();
            let service = ScriptedAssessment::default();
            let mut rng = StdRng::seed_from_u64(7);
            Turn::new(&mut session, &service, &mut rng).begin();
            send(&mut session, &service, &mut rng, input).await;
            assert!(session.consent_given, "input {input:?}");
        }
    }

    #[tokio::test]
    async fn test_consent_no_short_circuits_to_completion() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();

        let outcome = send(&mut session, &service, &mut rng, "No").await;
        assert_eq!(session.phase, Phase::Completion);
        assert!(!session.consent_given);
        assert_eq!(session.candidate, CandidateProfile::default());
        assert_eq!(outcome.phases, vec![Phase::Completion]);
        assert_eq!(service.question_calls(), 0);
    }

    #[tokio::test]
    async fn test_consent_other_input_reprompts() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();

        let outcome = send(&mut session, &service, &mut rng, "maybe later").await;
        assert_eq!(session.phase, Phase::Consent);
        assert!(!session.consent_given);
        assert!(outcome.phases.is_empty());
        assert!(outcome.messages[1].content.contains("yes** or **no"));
    }

    #[tokio::test]
    async fn test_invalid_email_stays_on_email_step() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();
        send(&mut session, &service, &mut rng, "yes").await;
        send(&mut session, &service, &mut rng, "Ada").await;

        for bad in ["ada-at-example", "ada@example", "ada.example.com"] {
            send(&mut session, &service, &mut rng, bad).await;
            assert_eq!(session.phase, Phase::PersonalInfo(PersonalStep::Email));
            assert!(session.candidate.email.is_none());
        }

        send(&mut session, &service, &mut rng, " ada@example.com ").await;
        assert_eq!(session.phase, Phase::PersonalInfo(PersonalStep::Phone));
        assert_eq!(session.candidate.email.as_deref(), Some("ada@example.com"));
    }

    #[tokio::test]
    async fn test_blank_name_reprompts() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();
        send(&mut session, &service, &mut rng, "yes").await;

        send(&mut session, &service, &mut rng, "   ").await;
        assert_eq!(session.phase, Phase::PersonalInfo(PersonalStep::Name));
        assert!(session.candidate.name.is_none());
    }

    #[tokio::test]
    async fn test_intake_fills_profile_in_order() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        through_intake(&mut session, &service, &mut rng).await;

        let c = &session.candidate;
        assert_eq!(c.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(c.phone.as_deref(), Some("+44 20 7946 0000"));
        assert_eq!(c.location.as_deref(), Some("London, UK"));
        assert_eq!(c.experience.as_deref(), Some("7"));
        assert_eq!(c.position.as_deref(), Some("Backend Engineer"));
        assert!(c.tech_stack.is_empty());
    }

    #[tokio::test]
    async fn test_experience_is_freeform() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();
        for input in ["yes", "Ada", "ada@example.com", "123", "London"] {
            send(&mut session, &service, &mut rng, input).await;
        }
        send(&mut session, &service, &mut rng, "about a decade, mostly backend").await;
        assert_eq!(
            session.candidate.experience.as_deref(),
            Some("about a decade, mostly backend")
        );
        assert_eq!(
            session.phase,
            Phase::ProfessionalInfo(ProfessionalStep::Position)
        );
    }

    #[tokio::test]
    async fn test_tech_stack_starts_assessment_with_first_question() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        through_intake(&mut session, &service, &mut rng).await;

        let outcome = send(&mut session, &service, &mut rng, "Python, React, Docker").await;
        assert_eq!(
            session.candidate.tech_stack,
            vec!["Python", "React", "Docker"]
        );
        assert_eq!(session.phase, Phase::TechnicalAssessment);
        assert_eq!(session.q_idx, 1);
        assert!(session.technical_responses.is_empty());
        assert_eq!(service.question_calls(), 1);
        assert_eq!(service.requested_numbers(), vec![1]);

        let last = outcome.messages.last().unwrap();
        assert!(last.content.starts_with("**Question 1/3**"));
        assert_eq!(session.current_question.as_deref(), Some("Scripted question 1?"));
    }

    #[tokio::test]
    async fn test_blank_tech_stack_reprompts() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        through_intake(&mut session, &service, &mut rng).await;

        let outcome = send(&mut session, &service, &mut rng, " , ,  ").await;
        assert_eq!(session.phase, Phase::TechStack);
        assert!(session.candidate.tech_stack.is_empty());
        assert_eq!(
            outcome.messages[1].content,
            "Please provide at least one technology."
        );
        assert_eq!(service.question_calls(), 0);
    }

    #[tokio::test]
    async fn test_completion_absorbs_input() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        Turn::new(&mut session, &service, &mut rng).begin();
        send(&mut session, &service, &mut rng, "no").await;

        for input in ["yes", "hello?", "restart"] {
            let outcome = send(&mut session, &service, &mut rng, input).await;
            assert_eq!(session.phase, Phase::Completion);
            assert_eq!(outcome.messages[1].content, SESSION_COMPLETE_MESSAGE);
            assert!(outcome.phases.is_empty());
        }
    }

    #[tokio::test]
    async fn test_clarification_is_deterministic_for_a_seed() {
        let mut replies = Vec::new();
        for _ in 0..2 {
            let mut session = new_session();
            session.phase = Phase::Summary;
            let service = ScriptedAssessment::default();
            let mut rng = StdRng::seed_from_u64(42);
            let mut run = Vec::new();
            for _ in 0..4 {
                let outcome = send(&mut session, &service, &mut rng, "what now?").await;
                run.push(outcome.messages[1].content.clone());
            }
            assert_eq!(session.phase, Phase::Summary);
            replies.push(run);
        }
        assert_eq!(replies[0], replies[1]);
        assert!(replies[0]
            .iter()
            .all(|r| CLARIFICATION_RESPONSES.contains(&r.as_str())));
    }

    #[tokio::test]
    async fn test_every_turn_moves_forward_only() {
        let mut session = new_session();
        let service = ScriptedAssessment::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut last_index = session.phase.index();
        Turn::new(&mut session, &service, &mut rng).begin();

        for input in [
            "what?", "yes", "Ada", "bad-email", "ada@example.com", "555", "Paris", "3",
            "SRE", "", "Go, Kubernetes", "answer one", "answer two", "answer three",
            "anything else?",
        ] {
            send(&mut session, &service, &mut rng, input).await;
            assert!(session.phase.index() >= last_index);
            last_index = session.phase.index();
        }
        assert_eq!(session.phase, Phase::Completion);
    }
}
