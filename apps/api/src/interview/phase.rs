//! Conversation phases and their fixed linear order.

use serde::{Deserialize, Serialize};

/// Sub-steps of the personal information phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalStep {
    Name,
    Email,
    Phone,
    Location,
}

/// Sub-steps of the professional background phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfessionalStep {
    Experience,
    Position,
}

/// Where a session currently is in the intake conversation.
///
/// Sub-steps live inside their phase so the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "phase", content = "step", rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Welcome,
    Consent,
    PersonalInfo(PersonalStep),
    ProfessionalInfo(ProfessionalStep),
    TechStack,
    TechnicalAssessment,
    Summary,
    Completion,
}

/// Number of top-level phases.
pub const PHASE_COUNT: usize = 8;

impl Phase {
    /// Position in the linear phase order, ignoring sub-steps.
    pub fn index(&self) -> usize {
        match self {
            Phase::Welcome => 0,
            Phase::Consent => 1,
            Phase::PersonalInfo(_) => 2,
            Phase::ProfessionalInfo(_) => 3,
            Phase::TechStack => 4,
            Phase::TechnicalAssessment => 5,
            Phase::Summary => 6,
            Phase::Completion => 7,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Phase::Welcome => "welcome",
            Phase::Consent => "consent",
            Phase::PersonalInfo(_) => "personal_info",
            Phase::ProfessionalInfo(_) => "professional_info",
            Phase::TechStack => "tech_stack",
            Phase::TechnicalAssessment => "technical_assessment",
            Phase::Summary => "summary",
            Phase::Completion => "completion",
        }
    }

    /// Human label shown next to the progress bar.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            Phase::Welcome => "Getting Started",
            Phase::Consent => "Privacy Consent",
            Phase::PersonalInfo(_) => "Personal Information",
            Phase::ProfessionalInfo(_) => "Professional Background",
            Phase::TechStack => "Tech-Stack Review",
            Phase::TechnicalAssessment => "Technical Assessment",
            Phase::Summary => "Summary Review",
            Phase::Completion => "Complete",
        }
    }

    /// The active sub-step, if this phase has one.
    pub fn step(&self) -> Option<&'static str> {
        match self {
            Phase::PersonalInfo(PersonalStep::Name) => Some("name"),
            Phase::PersonalInfo(PersonalStep::Email) => Some("email"),
            Phase::PersonalInfo(PersonalStep::Phone) => Some("phone"),
            Phase::PersonalInfo(PersonalStep::Location) => Some("location"),
            Phase::ProfessionalInfo(ProfessionalStep::Experience) => Some("experience"),
            Phase::ProfessionalInfo(ProfessionalStep::Position) => Some("position"),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Completion)
    }

    /// Title-cased key, e.g. `Technical_Assessment`.
    pub fn title(&self) -> String {
        self.key()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Whether `next` is a legal successor of `self`.
    ///
    /// Legal moves: staying put, the next sub-step within a phase, the next
    /// phase in order, declining consent, and staying in completion.
    pub fn allows_transition_to(&self, next: &Phase) -> bool {
        if self == next {
            return true;
        }
        match (self, next) {
            (Phase::Consent, Phase::Completion) => true,
            (Phase::PersonalInfo(a), Phase::PersonalInfo(b)) => (*b as u8) == (*a as u8) + 1,
            (Phase::ProfessionalInfo(a), Phase::ProfessionalInfo(b)) => {
                (*b as u8) == (*a as u8) + 1
            }
            (Phase::Consent, Phase::PersonalInfo(step)) => *step == PersonalStep::Name,
            (Phase::PersonalInfo(from), Phase::ProfessionalInfo(to)) => {
                *from == PersonalStep::Location && *to == ProfessionalStep::Experience
            }
            (Phase::ProfessionalInfo(from), Phase::TechStack) => *from == ProfessionalStep::Position,
            _ => next.index() == self.index() + 1 && next.step().is_none(),
        }
    }
}
