use serde::{Deserialize, Serialize};

pub const ENABLE_HISTORY_OPTION: &str = "Enable history access";
pub const PROCEED_WITHOUT_HISTORY_OPTION: &str = "Proceed with normal response";

pub const HISTORY_ACCESS_PROMPT: &str =
    "History access is disabled. Would you like to enable it or proceed with a normal response?";

/// Consent scope attached to a session's history authorization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessScope {
    #[default]
    None,
    SessionOnly,
    Permanent,
}

/// Per-session history authorization. Starts denied; only consent choices
/// applied through [`apply_choice`] ever flip the flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAuthorization {
    pub granted: bool,
    pub scope: AccessScope,
}

impl SessionAuthorization {
    pub fn denied() -> Self {
        Self::default()
    }
}

/// Outcome of reviewing a history-related query against the session's
/// authorization state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Granted,
    PromptRequired {
        prompt: String,
        options: Vec<String>,
    },
}

pub fn review_history_request(authorization: &SessionAuthorization) -> GateDecision {
    if authorization.granted {
        GateDecision::Granted
    } else {
        GateDecision::PromptRequired {
            prompt: HISTORY_ACCESS_PROMPT.to_string(),
            options: consent_options(),
        }
    }
}

pub fn consent_options() -> Vec<String> {
    vec![
        ENABLE_HISTORY_OPTION.to_string(),
        PROCEED_WITHOUT_HISTORY_OPTION.to_string(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivacyChoice {
    EnableForSession,
    EnablePermanently,
    ProceedWithout,
}

impl PrivacyChoice {
    /// Parses a consent option string. Accepts the two-option prompt
    /// wording as well as the longer three-way phrasing some clients send.
    pub fn parse(option: &str) -> Option<Self> {
        match option.trim().to_ascii_lowercase().as_str() {
            "enable history access" | "enable just for this session" => {
                Some(Self::EnableForSession)
            }
            "enable permanently" => Some(Self::EnablePermanently),
            "proceed with normal response" | "ignore this query" => Some(Self::ProceedWithout),
            _ => None,
        }
    }

    pub fn confirmation_text(self) -> &'static str {
        match self {
            Self::EnableForSession => {
                "History access has been enabled. You can now ask history-related questions."
            }
            Self::EnablePermanently => {
                "History access enabled permanently. You can now ask history-related questions."
            }
            Self::ProceedWithout => "Okay, proceeding with a normal response.",
        }
    }

    fn granted_scope(self) -> Option<AccessScope> {
        match self {
            Self::EnableForSession => Some(AccessScope::SessionOnly),
            Self::EnablePermanently => Some(AccessScope::Permanent),
            Self::ProceedWithout => None,
        }
    }
}

/// Applies a consent choice to the session's authorization state. Grants
/// are one-way: declining a later prompt never reverts an earlier grant.
pub fn apply_choice(authorization: &mut SessionAuthorization, choice: PrivacyChoice) {
    if let Some(scope) = choice.granted_scope() {
        authorization.granted = true;
        authorization.scope = scope;
    }
}
