//! Named fallback strategies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External collaborator a primary call targets. Each has its own health
/// record and its own degraded-mode behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackStrategy {
    EmailService,
    SmsService,
    WordpressCms,
    ChatbotAi,
    Database,
}

impl FallbackStrategy {
    pub const ALL: [FallbackStrategy; 5] = [
        FallbackStrategy::EmailService,
        FallbackStrategy::SmsService,
        FallbackStrategy::WordpressCms,
        FallbackStrategy::ChatbotAi,
        FallbackStrategy::Database,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackStrategy::EmailService => "EMAIL_SERVICE",
            FallbackStrategy::SmsService => "SMS_SERVICE",
            FallbackStrategy::WordpressCms => "WORDPRESS_CMS",
            FallbackStrategy::ChatbotAi => "CHATBOT_AI",
            FallbackStrategy::Database => "DATABASE",
        }
    }
}

impl fmt::Display for FallbackStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised strategy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown fallback strategy: {0}")]
pub struct UnknownStrategy(pub String);

impl FromStr for FallbackStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        FallbackStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("email_service".parse(), Ok(FallbackStrategy::EmailService));
        assert_eq!("wordpress-cms".parse(), Ok(FallbackStrategy::WordpressCms));
        assert!("PODCAST".parse::<FallbackStrategy>().is_err());
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&FallbackStrategy::ChatbotAi).unwrap();
        assert_eq!(json, "\"CHATBOT_AI\"");
    }
}
