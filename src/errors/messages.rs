//! User-facing message table keyed by [`ErrorCode`].
//!
//! Every entry carries the Portuguese copy shown to patients, the recovery
//! hint, the screen-reader label and the retry hints consumed by
//! [`RetryPolicy::for_classification`](crate::resilience::policy::RetryPolicy::for_classification).

use serde::Serialize;

use crate::errors::taxonomy::{ErrorCode, Severity};

/// Static description of how an error is surfaced and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    pub user_message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    pub severity: Severity,
    pub recovery: &'static str,
    pub aria_label: &'static str,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
}

const fn field_error(
    field: &'static str,
    severity: Severity,
    user_message: &'static str,
    recovery: &'static str,
    aria_label: &'static str,
) -> ErrorMessage {
    ErrorMessage {
        user_message,
        field: Some(field),
        severity,
        recovery,
        aria_label,
        retryable: false,
        retry_delay_ms: None,
        max_retries: None,
    }
}

const fn retryable(
    severity: Severity,
    user_message: &'static str,
    recovery: &'static str,
    aria_label: &'static str,
    retry_delay_ms: u64,
    max_retries: u32,
) -> ErrorMessage {
    ErrorMessage {
        user_message,
        field: None,
        severity,
        recovery,
        aria_label,
        retryable: true,
        retry_delay_ms: Some(retry_delay_ms),
        max_retries: Some(max_retries),
    }
}

const fn terminal(
    severity: Severity,
    user_message: &'static str,
    recovery: &'static str,
    aria_label: &'static str,
) -> ErrorMessage {
    ErrorMessage {
        user_message,
        field: None,
        severity,
        recovery,
        aria_label,
        retryable: false,
        retry_delay_ms: None,
        max_retries: None,
    }
}

static NAME_REQUIRED: ErrorMessage = field_error(
    "name",
    Severity::Medium,
    "O nome é obrigatório.",
    "Por favor, insira seu nome completo.",
    "Erro no campo nome: nome é obrigatório",
);
static NAME_TOO_SHORT: ErrorMessage = field_error(
    "name",
    Severity::Low,
    "O nome deve ter pelo menos 3 caracteres.",
    "Por favor, insira seu nome completo.",
    "Erro no campo nome: muito curto",
);
static NAME_TOO_LONG: ErrorMessage = field_error(
    "name",
    Severity::Low,
    "O nome é muito longo.",
    "Use no máximo 50 caracteres.",
    "Erro no campo nome: muito longo",
);
static NAME_INVALID: ErrorMessage = field_error(
    "name",
    Severity::Low,
    "Nome contém caracteres inválidos.",
    "Use apenas letras e espaços.",
    "Erro no campo nome: caracteres inválidos",
);
static EMAIL_REQUIRED: ErrorMessage = field_error(
    "email",
    Severity::Medium,
    "O email é obrigatório.",
    "Por favor, insira um endereço de email válido.",
    "Erro no campo email: email é obrigatório",
);
static EMAIL_INVALID: ErrorMessage = field_error(
    "email",
    Severity::Low,
    "Email inválido.",
    "Verifique o formato do email (ex: nome@dominio.com).",
    "Erro no campo email: formato inválido",
);
static EMAIL_TOO_LONG: ErrorMessage = field_error(
    "email",
    Severity::Low,
    "Email muito longo.",
    "Use no máximo 100 caracteres.",
    "Erro no campo email: muito longo",
);
static PHONE_REQUIRED: ErrorMessage = field_error(
    "phone",
    Severity::Medium,
    "O telefone é obrigatório.",
    "Por favor, insira um número de telefone válido.",
    "Erro no campo telefone: telefone é obrigatório",
);
static PHONE_INVALID: ErrorMessage = field_error(
    "phone",
    Severity::Low,
    "Telefone inválido.",
    "Insira um número de telefone válido com DDD.",
    "Erro no campo telefone: formato inválido",
);
static MESSAGE_REQUIRED: ErrorMessage = field_error(
    "message",
    Severity::Medium,
    "A mensagem é obrigatória.",
    "Por favor, descreva sua consulta ou dúvida.",
    "Erro no campo mensagem: mensagem é obrigatória",
);
static MESSAGE_TOO_SHORT: ErrorMessage = field_error(
    "message",
    Severity::Low,
    "A mensagem é muito curta.",
    "A mensagem deve ter pelo menos 10 caracteres.",
    "Erro no campo mensagem: muito curta",
);
static MESSAGE_TOO_LONG: ErrorMessage = field_error(
    "message",
    Severity::Low,
    "A mensagem é muito longa.",
    "Use no máximo 2000 caracteres.",
    "Erro no campo mensagem: muito longa",
);
static MESSAGE_CONTAINS_LINKS: ErrorMessage = field_error(
    "message",
    Severity::Medium,
    "Links não são permitidos na mensagem.",
    "Remova qualquer link ou URL da mensagem.",
    "Erro no campo mensagem: contém links não permitidos",
);
static CONSENT_REQUIRED: ErrorMessage = field_error(
    "consent",
    Severity::Medium,
    "É necessário aceitar os termos de privacidade.",
    "Marque a caixa de consentimento para continuar.",
    "Erro no consentimento: aceitação dos termos é obrigatória",
);
static VALIDATION_INVALID: ErrorMessage = ErrorMessage {
    field: None,
    ..field_error(
        "",
        Severity::Low,
        "Valor inválido.",
        "Verifique o valor inserido.",
        "Erro de validação: valor inválido",
    )
};

static NETWORK_OFFLINE: ErrorMessage = retryable(
    Severity::High,
    "Você está offline.",
    "Verifique sua conexão com a internet e tente novamente.",
    "Erro de conexão: sem conexão com a internet",
    2_000,
    5,
);
static NETWORK_TIMEOUT: ErrorMessage = retryable(
    Severity::Medium,
    "A conexão expirou.",
    "Tente novamente em alguns instantes.",
    "Erro de conexão: tempo limite excedido",
    1_000,
    3,
);
static NETWORK_FAILED: ErrorMessage = retryable(
    Severity::Medium,
    "Falha na conexão.",
    "Verifique sua conexão e tente novamente.",
    "Erro de conexão: falha na comunicação",
    1_500,
    3,
);
static NETWORK_DNS: ErrorMessage = retryable(
    Severity::High,
    "Erro de resolução de DNS.",
    "Verifique sua conexão DNS ou tente novamente mais tarde.",
    "Erro de conexão: problema de DNS",
    3_000,
    2,
);

static API_MISSING_TOKEN: ErrorMessage = retryable(
    Severity::High,
    "Token de verificação ausente.",
    "Recarregue a página e tente novamente.",
    "Erro de segurança: token de verificação ausente",
    2_000,
    2,
);
static API_RECAPTCHA_FAILED: ErrorMessage = retryable(
    Severity::High,
    "Falha na verificação de segurança.",
    "Aguarde alguns instantes e tente novamente.",
    "Erro de segurança: falha na verificação reCAPTCHA",
    3_000,
    2,
);
static API_MISSING_REQUIRED_FIELDS: ErrorMessage = terminal(
    Severity::Medium,
    "Campos obrigatórios não preenchidos.",
    "Preencha todos os campos obrigatórios.",
    "Erro de validação: campos obrigatórios não preenchidos",
);
static API_RATE_LIMITED: ErrorMessage = retryable(
    Severity::Medium,
    "Muitas tentativas. Aguarde um momento.",
    "Aguarde alguns minutos antes de tentar novamente.",
    "Erro de limite: muitas tentativas realizadas",
    60_000,
    1,
);
static API_EMAIL_SERVICE_ERROR: ErrorMessage = retryable(
    Severity::High,
    "Erro no serviço de email.",
    "Tente novamente mais tarde ou entre em contato por telefone.",
    "Erro de serviço: falha no envio de email",
    5_000,
    2,
);
static API_SERVER_ERROR: ErrorMessage = retryable(
    Severity::High,
    "Erro interno do servidor.",
    "Tente novamente em alguns minutos.",
    "Erro do servidor: erro interno",
    10_000,
    2,
);
static API_SERVICE_UNAVAILABLE: ErrorMessage = retryable(
    Severity::High,
    "Serviço temporariamente indisponível.",
    "Tente novamente em alguns minutos ou entre em contato por telefone.",
    "Erro de serviço: serviço indisponível",
    15_000,
    1,
);

static RECAPTCHA_MISSING_TOKEN: ErrorMessage = retryable(
    Severity::High,
    "Verificação de segurança não concluída.",
    "Recarregue a página e tente novamente.",
    "Erro de segurança: verificação reCAPTCHA não concluída",
    2_000,
    2,
);
static RECAPTCHA_MISSING_SECRET: ErrorMessage = terminal(
    Severity::Critical,
    "Erro de configuração de segurança.",
    "Entre em contato com o suporte técnico.",
    "Erro crítico: configuração de segurança incorreta",
);
static RECAPTCHA_VERIFICATION_FAILED: ErrorMessage = retryable(
    Severity::High,
    "Falha na verificação reCAPTCHA.",
    "Aguarde alguns instantes e tente novamente.",
    "Erro de segurança: falha na verificação reCAPTCHA",
    3_000,
    2,
);
static RECAPTCHA_LOW_SCORE: ErrorMessage = retryable(
    Severity::High,
    "Verificação de segurança falhou.",
    "Tente novamente ou use outro navegador.",
    "Erro de segurança: pontuação baixa no reCAPTCHA",
    5_000,
    1,
);
static RECAPTCHA_NETWORK_ERROR: ErrorMessage = retryable(
    Severity::Medium,
    "Erro na verificação de segurança.",
    "Verifique sua conexão e tente novamente.",
    "Erro de conexão: falha na verificação de segurança",
    2_000,
    3,
);

static EMAIL_SERVICE_UNAVAILABLE: ErrorMessage = retryable(
    Severity::High,
    "Serviço de email indisponível.",
    "Tente novamente mais tarde ou entre em contato por telefone.",
    "Erro de serviço: serviço de email indisponível",
    10_000,
    2,
);
static EMAIL_SEND_FAILED: ErrorMessage = retryable(
    Severity::High,
    "Falha ao enviar email.",
    "Tente novamente ou entre em contato diretamente.",
    "Erro de envio: falha ao enviar email",
    5_000,
    2,
);
static EMAIL_TEMPLATE_ERROR: ErrorMessage = retryable(
    Severity::Medium,
    "Erro na formatação do email.",
    "Tente novamente. Se persistir, entre em contato por telefone.",
    "Erro de formatação: problema no template de email",
    2_000,
    1,
);

static TIMEOUT: ErrorMessage = retryable(
    Severity::Medium,
    "A operação demorou mais que o esperado.",
    "Tente novamente com uma conexão mais estável.",
    "Erro de tempo: operação demorou muito para completar",
    2_000,
    2,
);
static UNKNOWN: ErrorMessage = retryable(
    Severity::Medium,
    "Ocorreu um erro inesperado.",
    "Tente novamente. Se o problema persistir, entre em contato conosco.",
    "Erro desconhecido: ocorreu um problema inesperado",
    3_000,
    2,
);

impl ErrorCode {
    /// Message table entry for this code.
    pub fn message(&self) -> &'static ErrorMessage {
        match self {
            ErrorCode::ValidationNameRequired => &NAME_REQUIRED,
            ErrorCode::ValidationNameTooShort => &NAME_TOO_SHORT,
            ErrorCode::ValidationNameTooLong => &NAME_TOO_LONG,
            ErrorCode::ValidationNameInvalid => &NAME_INVALID,
            ErrorCode::ValidationEmailRequired => &EMAIL_REQUIRED,
            ErrorCode::ValidationEmailInvalid => &EMAIL_INVALID,
            ErrorCode::ValidationEmailTooLong => &EMAIL_TOO_LONG,
            ErrorCode::ValidationPhoneRequired => &PHONE_REQUIRED,
            ErrorCode::ValidationPhoneInvalid => &PHONE_INVALID,
            ErrorCode::ValidationMessageRequired => &MESSAGE_REQUIRED,
            ErrorCode::ValidationMessageTooShort => &MESSAGE_TOO_SHORT,
            ErrorCode::ValidationMessageTooLong => &MESSAGE_TOO_LONG,
            ErrorCode::ValidationMessageContainsLinks => &MESSAGE_CONTAINS_LINKS,
            ErrorCode::ValidationConsentRequired => &CONSENT_REQUIRED,
            ErrorCode::ValidationInvalid => &VALIDATION_INVALID,
            ErrorCode::NetworkOffline => &NETWORK_OFFLINE,
            ErrorCode::NetworkTimeout => &NETWORK_TIMEOUT,
            ErrorCode::NetworkFailed => &NETWORK_FAILED,
            ErrorCode::NetworkDnsError => &NETWORK_DNS,
            ErrorCode::ApiMissingToken => &API_MISSING_TOKEN,
            ErrorCode::ApiRecaptchaFailed => &API_RECAPTCHA_FAILED,
            ErrorCode::ApiMissingRequiredFields => &API_MISSING_REQUIRED_FIELDS,
            ErrorCode::ApiRateLimited => &API_RATE_LIMITED,
            ErrorCode::ApiEmailServiceError => &API_EMAIL_SERVICE_ERROR,
            ErrorCode::ApiServerError => &API_SERVER_ERROR,
            ErrorCode::ApiServiceUnavailable => &API_SERVICE_UNAVAILABLE,
            ErrorCode::RecaptchaMissingToken => &RECAPTCHA_MISSING_TOKEN,
            ErrorCode::RecaptchaMissingSecret => &RECAPTCHA_MISSING_SECRET,
            ErrorCode::RecaptchaVerificationFailed => &RECAPTCHA_VERIFICATION_FAILED,
            ErrorCode::RecaptchaLowScore => &RECAPTCHA_LOW_SCORE,
            ErrorCode::RecaptchaNetworkError => &RECAPTCHA_NETWORK_ERROR,
            ErrorCode::EmailServiceUnavailable => &EMAIL_SERVICE_UNAVAILABLE,
            ErrorCode::EmailSendFailed => &EMAIL_SEND_FAILED,
            ErrorCode::EmailTemplateError => &EMAIL_TEMPLATE_ERROR,
            ErrorCode::Timeout => &TIMEOUT,
            ErrorCode::Unknown => &UNKNOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_code_has_complete_copy() {
        for code in ErrorCode::ALL {
            let msg = code.message();
            assert!(!msg.user_message.is_empty(), "{} has no user message", code);
            assert!(!msg.recovery.is_empty(), "{} has no recovery", code);
            assert!(!msg.aria_label.is_empty(), "{} has no aria label", code);
            if msg.retryable {
                assert!(msg.max_retries.unwrap_or(0) >= 1, "{} retryable without budget", code);
                assert!(msg.retry_delay_ms.is_some(), "{} retryable without delay", code);
            }
        }
    }

    #[test]
    fn test_validation_entries_are_not_retryable() {
        for code in ErrorCode::ALL
            .iter()
            .filter(|c| c.as_str().starts_with("validation."))
        {
            assert!(!code.message().retryable, "{} should not retry", code);
        }
    }

    #[test]
    fn test_rate_limit_copy() {
        let msg = ErrorCode::ApiRateLimited.message();
        assert_eq!(msg.user_message, "Muitas tentativas. Aguarde um momento.");
        assert_eq!(msg.retry_delay_ms, Some(60_000));
        assert_eq!(msg.severity, Severity::Medium);
    }

    #[test]
    fn test_missing_secret_is_critical_and_terminal() {
        let msg = ErrorCode::RecaptchaMissingSecret.message();
        assert_eq!(msg.severity, Severity::Critical);
        assert!(!msg.retryable);
    }
}
