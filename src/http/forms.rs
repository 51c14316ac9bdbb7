//! Contact form payload and its field rules.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{ErrorCode, Failure};
use crate::http::envelope::FieldError;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const MESSAGE_MIN_CHARS: usize = 10;
pub const MESSAGE_MAX_CHARS: usize = 2000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub consent: bool,
    /// Hidden field; bots fill it in.
    pub honeypot: Option<String>,
}

impl ContactForm {
    /// Every rule the submission breaks, in field order.
    pub fn validate(&self) -> Vec<Failure> {
        let mut failures = Vec::new();
        let mut check = |field: &str, code: Option<&str>| {
            if let Some(code) = code {
                failures.push(Failure::validation(field, code));
            }
        };

        check("name", name_rule(self.name.trim()));
        check("email", email_rule(self.email.trim()));
        check("phone", phone_rule(&self.phone));
        check("message", message_rule(self.message.trim()));
        check("consent", (!self.consent).then_some("consent_required"));
        failures
    }

    pub fn is_spam(&self) -> bool {
        self.honeypot.as_deref().is_some_and(|h| !h.trim().is_empty())
    }

    /// Body sent to the email service.
    pub fn email_payload(&self) -> Value {
        json!({
            "name": self.name.trim(),
            "email": self.email.trim().to_lowercase(),
            "phone": phone_digits(&self.phone),
            "message": self.message.trim(),
        })
    }
}

/// Turns validation failures into envelope entries with patient-facing text.
pub fn field_errors(failures: &[Failure]) -> Vec<FieldError> {
    failures
        .iter()
        .filter_map(|failure| match failure {
            Failure::Validation { field, code } => Some(FieldError {
                field: field.clone(),
                code: code.clone(),
                message: ErrorCode::validation(code).message().user_message.to_string(),
            }),
            _ => None,
        })
        .collect()
}

fn name_rule(name: &str) -> Option<&'static str> {
    let len = name.chars().count();
    if name.is_empty() {
        Some("name_required")
    } else if len < NAME_MIN_CHARS {
        Some("name_too_short")
    } else if len > NAME_MAX_CHARS {
        Some("name_too_long")
    } else if !name
        .chars()
        .all(|c| c.is_alphabetic() || c.is_whitespace() || matches!(c, '\'' | '-' | '.'))
    {
        Some("name_invalid")
    } else {
        None
    }
}

fn email_rule(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("email_required");
    }
    if email.chars().count() > EMAIL_MAX_CHARS {
        return Some("email_too_long");
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
        }
        None => false,
    };
    (!valid).then_some("email_invalid")
}

fn phone_digits(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    match digits.strip_prefix("55") {
        Some(rest) if phone.trim_start().starts_with('+') => rest.to_string(),
        _ => digits,
    }
}

fn phone_rule(phone: &str) -> Option<&'static str> {
    if phone.trim().is_empty() {
        return Some("phone_required");
    }
    let digits = phone_digits(phone);
    let valid = match digits.len() {
        11 => digits.as_bytes()[2] == b'9',
        10 => (b'2'..=b'8').contains(&digits.as_bytes()[2]),
        _ => false,
    } && digits[..2].parse::<u8>().is_ok_and(|ddd| ddd >= 11);
    (!valid).then_some("phone_invalid")
}

fn message_rule(message: &str) -> Option<&'static str> {
    let len = message.chars().count();
    let lower = message.to_lowercase();
    if message.is_empty() {
        Some("message_required")
    } else if len < MESSAGE_MIN_CHARS {
        Some("message_too_short")
    } else if len > MESSAGE_MAX_CHARS {
        Some("message_too_long")
    } else if ["http://", "https://", "www."].iter().any(|p| lower.contains(p)) {
        Some("message_contains_links")
    } else {
        None
    }
}
