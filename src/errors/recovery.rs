//! Recovery guidance derived from a classification.

use crate::errors::classifier::ErrorClassification;
use crate::errors::taxonomy::ErrorType;

/// Public clinic phone shown when email delivery is down.
pub const CLINIC_PHONE_INTL: &str = "+55 33 99860-1427";

/// Ordered recovery steps for a classified error.
///
/// Starts with the message table's recovery sentence, then appends steps
/// specific to the error type. Blank steps are dropped.
pub fn recovery_steps(classification: &ErrorClassification) -> Vec<String> {
    let mut steps = vec![classification.message().recovery.to_string()];

    let extra: &[&str] = match classification.error_type {
        ErrorType::Network => &[
            "Verifique sua conexão Wi-Fi ou dados móveis.",
            "Tente recarregar a página.",
        ],
        ErrorType::Recaptcha => &[
            "Limpe o cache e cookies do navegador.",
            "Tente usar o modo anônimo do navegador.",
        ],
        ErrorType::RateLimit => &[
            "Aguarde alguns minutos antes de tentar novamente.",
            "Se precisar de ajuda urgente, ligue diretamente para nós.",
        ],
        ErrorType::EmailService => &["Tente novamente em alguns minutos."],
        _ => &["Se o problema persistir, entre em contato conosco."],
    };
    steps.extend(extra.iter().map(|s| s.to_string()));

    if classification.error_type == ErrorType::EmailService {
        steps.push(format!("Entre em contato por telefone: {CLINIC_PHONE_INTL}"));
    }

    steps.retain(|s| !s.trim().is_empty());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::classifier::{ErrorClassifier, Failure, NetworkKind};

    #[test]
    fn test_network_steps() {
        let c = ErrorClassifier::default().classify(&Failure::Network(NetworkKind::Failed));
        let steps = recovery_steps(&c);
        assert_eq!(steps[0], "Verifique sua conexão e tente novamente.");
        assert_eq!(steps.len(), 3);
        assert!(steps.iter().any(|s| s.contains("Wi-Fi")));
    }

    #[test]
    fn test_email_service_steps_include_phone() {
        let c = ErrorClassifier::default().classify(&Failure::api("email_send_failed"));
        let steps = recovery_steps(&c);
        assert!(steps.last().is_some_and(|s| s.contains(CLINIC_PHONE_INTL)));
    }

    #[test]
    fn test_default_steps() {
        let c = ErrorClassifier::default().classify(&Failure::validation("name", "name_required"));
        let steps = recovery_steps(&c);
        assert_eq!(
            steps,
            vec![
                "Por favor, insira seu nome completo.".to_string(),
                "Se o problema persistir, entre em contato conosco.".to_string(),
            ]
        );
    }
}
