use crate::services::token::TokenPair;

/// User-facing responses that are expected outcomes, not faults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acknowledgment {
    AlreadyUsed,
    NotActive,
    DidReset,
    UnrecognizedFortune(String),
}

impl Acknowledgment {
    pub fn message(&self) -> String {
        match self {
            Self::AlreadyUsed => "This code has already been used.".to_string(),
            Self::NotActive => "This code is not recognized.".to_string(),
            Self::DidReset => "Kiosk reset.".to_string(),
            Self::UnrecognizedFortune(kind) => format!("Unrecognized fortune type {kind}."),
        }
    }
}

/// Result of one loop iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Idle,
    Diagnostics,
    Reset { catalog_reloaded: bool },
    Seeded(TokenPair),
    Dispensed { issued: TokenPair },
    Acknowledged(Acknowledgment),
    Faulted(String),
}

impl Outcome {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Diagnostics => "diagnostics",
            Self::Reset { .. } => "reset",
            Self::Seeded(_) => "seeded",
            Self::Dispensed { .. } => "dispensed",
            Self::Acknowledged(Acknowledgment::AlreadyUsed) => "already_used",
            Self::Acknowledged(Acknowledgment::NotActive) => "not_active",
            Self::Acknowledged(_) => "acknowledged",
            Self::Faulted(_) => "faulted",
        }
    }
}
