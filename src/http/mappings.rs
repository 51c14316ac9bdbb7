//! Server-side error code table.
//!
//! Each [`ApiErrorCode`] maps to exactly one [`ErrorMapping`]; the match in
//! [`ApiErrorCode::mapping`] is exhaustive.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::Severity;
use crate::fallback::FallbackStrategy;

/// Coarse grouping shown to clients and used to pick presenter actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Authentication,
    Authorization,
    RateLimit,
    ExternalService,
    Database,
    Network,
    Security,
    BusinessLogic,
    System,
}

/// Level a response is logged at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

/// Hint describing the degraded mode used for an unavailable service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticFallbackHint {
    pub action: &'static str,
    pub message: &'static str,
}

/// Static description of an error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorMapping {
    pub status: StatusCode,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub user_message: &'static str,
    pub technical_message: &'static str,
    pub recovery: &'static str,
    pub aria_label: &'static str,
    pub retryable: bool,
    /// Seconds, sent as `Retry-After`.
    pub retry_after: Option<u64>,
    pub fallback: Option<StaticFallbackHint>,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    ValidationError,
    MissingRequiredFields,
    InvalidEmailFormat,
    InvalidPhoneFormat,
    ConsentRequired,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimitExceeded,
    SpamDetected,
    EmailServiceUnavailable,
    SmsServiceUnavailable,
    WordpressUnavailable,
    OpenaiUnavailable,
    DatabaseConnectionError,
    DatabaseTimeout,
    AppointmentSlotUnavailable,
    AppointmentOutsideHours,
    SecurityThreatDetected,
    InvalidJson,
    InternalServerError,
    MethodNotAllowed,
    NetworkError,
    TimeoutError,
}

impl ApiErrorCode {
    pub const ALL: [ApiErrorCode; 24] = [
        ApiErrorCode::ValidationError,
        ApiErrorCode::MissingRequiredFields,
        ApiErrorCode::InvalidEmailFormat,
        ApiErrorCode::InvalidPhoneFormat,
        ApiErrorCode::ConsentRequired,
        ApiErrorCode::Unauthorized,
        ApiErrorCode::Forbidden,
        ApiErrorCode::NotFound,
        ApiErrorCode::RateLimitExceeded,
        ApiErrorCode::SpamDetected,
        ApiErrorCode::EmailServiceUnavailable,
        ApiErrorCode::SmsServiceUnavailable,
        ApiErrorCode::WordpressUnavailable,
        ApiErrorCode::OpenaiUnavailable,
        ApiErrorCode::DatabaseConnectionError,
        ApiErrorCode::DatabaseTimeout,
        ApiErrorCode::AppointmentSlotUnavailable,
        ApiErrorCode::AppointmentOutsideHours,
        ApiErrorCode::SecurityThreatDetected,
        ApiErrorCode::InvalidJson,
        ApiErrorCode::InternalServerError,
        ApiErrorCode::MethodNotAllowed,
        ApiErrorCode::NetworkError,
        ApiErrorCode::TimeoutError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiErrorCode::ValidationError => "VALIDATION_ERROR",
            ApiErrorCode::MissingRequiredFields => "MISSING_REQUIRED_FIELDS",
            ApiErrorCode::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            ApiErrorCode::InvalidPhoneFormat => "INVALID_PHONE_FORMAT",
            ApiErrorCode::ConsentRequired => "CONSENT_REQUIRED",
            ApiErrorCode::Unauthorized => "UNAUTHORIZED",
            ApiErrorCode::Forbidden => "FORBIDDEN",
            ApiErrorCode::NotFound => "NOT_FOUND",
            ApiErrorCode::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            ApiErrorCode::SpamDetected => "SPAM_DETECTED",
            ApiErrorCode::EmailServiceUnavailable => "EMAIL_SERVICE_UNAVAILABLE",
            ApiErrorCode::SmsServiceUnavailable => "SMS_SERVICE_UNAVAILABLE",
            ApiErrorCode::WordpressUnavailable => "WORDPRESS_UNAVAILABLE",
            ApiErrorCode::OpenaiUnavailable => "OPENAI_UNAVAILABLE",
            ApiErrorCode::DatabaseConnectionError => "DATABASE_CONNECTION_ERROR",
            ApiErrorCode::DatabaseTimeout => "DATABASE_TIMEOUT",
            ApiErrorCode::AppointmentSlotUnavailable => "APPOINTMENT_SLOT_UNAVAILABLE",
            ApiErrorCode::AppointmentOutsideHours => "APPOINTMENT_OUTSIDE_HOURS",
            ApiErrorCode::SecurityThreatDetected => "SECURITY_THREAT_DETECTED",
            ApiErrorCode::InvalidJson => "INVALID_JSON",
            ApiErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
            ApiErrorCode::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiErrorCode::NetworkError => "NETWORK_ERROR",
            ApiErrorCode::TimeoutError => "TIMEOUT_ERROR",
        }
    }

    pub fn parse(code: &str) -> Option<ApiErrorCode> {
        ApiErrorCode::ALL.into_iter().find(|c| c.as_str() == code)
    }

    /// Error reported when a strategy's primary and fallback both fail.
    pub fn for_strategy(strategy: FallbackStrategy) -> ApiErrorCode {
        match strategy {
            FallbackStrategy::EmailService => ApiErrorCode::EmailServiceUnavailable,
            FallbackStrategy::SmsService => ApiErrorCode::SmsServiceUnavailable,
            FallbackStrategy::WordpressCms => ApiErrorCode::WordpressUnavailable,
            FallbackStrategy::ChatbotAi => ApiErrorCode::OpenaiUnavailable,
            FallbackStrategy::Database => ApiErrorCode::DatabaseConnectionError,
        }
    }

    pub fn mapping(&self) -> &'static ErrorMapping {
        match self {
            ApiErrorCode::ValidationError => &VALIDATION_ERROR,
            ApiErrorCode::MissingRequiredFields => &MISSING_REQUIRED_FIELDS,
            ApiErrorCode::InvalidEmailFormat => &INVALID_EMAIL_FORMAT,
            ApiErrorCode::InvalidPhoneFormat => &INVALID_PHONE_FORMAT,
            ApiErrorCode::ConsentRequired => &CONSENT_REQUIRED,
            ApiErrorCode::Unauthorized => &UNAUTHORIZED,
            ApiErrorCode::Forbidden => &FORBIDDEN,
            ApiErrorCode::NotFound => &NOT_FOUND,
            ApiErrorCode::RateLimitExceeded => &RATE_LIMIT_EXCEEDED,
            ApiErrorCode::SpamDetected => &SPAM_DETECTED,
            ApiErrorCode::EmailServiceUnavailable => &EMAIL_SERVICE_UNAVAILABLE,
            ApiErrorCode::SmsServiceUnavailable => &SMS_SERVICE_UNAVAILABLE,
            ApiErrorCode::WordpressUnavailable => &WORDPRESS_UNAVAILABLE,
            ApiErrorCode::OpenaiUnavailable => &OPENAI_UNAVAILABLE,
            ApiErrorCode::DatabaseConnectionError => &DATABASE_CONNECTION_ERROR,
            ApiErrorCode::DatabaseTimeout => &DATABASE_TIMEOUT,
            ApiErrorCode::AppointmentSlotUnavailable => &APPOINTMENT_SLOT_UNAVAILABLE,
            ApiErrorCode::AppointmentOutsideHours => &APPOINTMENT_OUTSIDE_HOURS,
            ApiErrorCode::SecurityThreatDetected => &SECURITY_THREAT_DETECTED,
            ApiErrorCode::InvalidJson => &INVALID_JSON,
            ApiErrorCode::InternalServerError => &INTERNAL_SERVER_ERROR,
            ApiErrorCode::MethodNotAllowed => &METHOD_NOT_ALLOWED,
            ApiErrorCode::NetworkError => &NETWORK_ERROR,
            ApiErrorCode::TimeoutError => &TIMEOUT_ERROR,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const BASE: ErrorMapping = ErrorMapping {
    status: StatusCode::BAD_REQUEST,
    category: ErrorCategory::Validation,
    severity: Severity::Medium,
    user_message: "",
    technical_message: "",
    recovery: "",
    aria_label: "",
    retryable: false,
    retry_after: None,
    fallback: None,
    log_level: LogLevel::Warn,
};

static VALIDATION_ERROR: ErrorMapping = ErrorMapping {
    user_message: "Os dados fornecidos são inválidos.",
    technical_message: "Request validation failed",
    recovery: "Verifique os campos obrigatórios e tente novamente.",
    aria_label: "Erro de validação: dados inválidos fornecidos",
    ..BASE
};
static MISSING_REQUIRED_FIELDS: ErrorMapping = ErrorMapping {
    user_message: "Campos obrigatórios não foram preenchidos.",
    technical_message: "Required fields are missing",
    recovery: "Preencha todos os campos obrigatórios e tente novamente.",
    aria_label: "Erro de validação: campos obrigatórios não preenchidos",
    ..BASE
};
static INVALID_EMAIL_FORMAT: ErrorMapping = ErrorMapping {
    severity: Severity::Low,
    user_message: "O formato do email é inválido.",
    technical_message: "Email format validation failed",
    recovery: "Verifique o formato do email (exemplo: nome@dominio.com).",
    aria_label: "Erro no campo email: formato inválido",
    log_level: LogLevel::Info,
    ..BASE
};
static INVALID_PHONE_FORMAT: ErrorMapping = ErrorMapping {
    severity: Severity::Low,
    user_message: "O formato do telefone é inválido.",
    technical_message: "Phone format validation failed",
    recovery: "Insira um número de telefone válido com DDD (exemplo: 11999999999).",
    aria_label: "Erro no campo telefone: formato inválido",
    log_level: LogLevel::Info,
    ..BASE
};
static CONSENT_REQUIRED: ErrorMapping = ErrorMapping {
    user_message: "É necessário aceitar os termos de privacidade para continuar.",
    technical_message: "LGPD consent not provided",
    recovery: "Marque a caixa de consentimento e tente novamente.",
    aria_label: "Erro de consentimento: aceitação dos termos é obrigatória",
    ..BASE
};
static UNAUTHORIZED: ErrorMapping = ErrorMapping {
    status: StatusCode::UNAUTHORIZED,
    category: ErrorCategory::Authentication,
    severity: Severity::High,
    user_message: "Acesso não autorizado.",
    technical_message: "Authentication required",
    recovery: "Faça login novamente para continuar.",
    aria_label: "Erro de autenticação: acesso não autorizado",
    retryable: true,
    ..BASE
};
static FORBIDDEN: ErrorMapping = ErrorMapping {
    status: StatusCode::FORBIDDEN,
    category: ErrorCategory::Authorization,
    severity: Severity::High,
    user_message: "Você não tem permissão para realizar esta ação.",
    technical_message: "Insufficient permissions",
    recovery: "Entre em contato com o administrador se necessário.",
    aria_label: "Erro de autorização: permissões insuficientes",
    ..BASE
};
static NOT_FOUND: ErrorMapping = ErrorMapping {
    status: StatusCode::NOT_FOUND,
    severity: Severity::Low,
    user_message: "O recurso solicitado não foi encontrado.",
    technical_message: "Route not found",
    recovery: "Verifique o endereço e tente novamente.",
    aria_label: "Erro de navegação: recurso não encontrado",
    log_level: LogLevel::Info,
    ..BASE
};
static RATE_LIMIT_EXCEEDED: ErrorMapping = ErrorMapping {
    status: StatusCode::TOO_MANY_REQUESTS,
    category: ErrorCategory::RateLimit,
    user_message: "Muitas tentativas realizadas. Aguarde um momento.",
    technical_message: "Rate limit exceeded",
    recovery: "Aguarde alguns minutos antes de tentar novamente.",
    aria_label: "Erro de limite: muitas tentativas realizadas",
    retryable: true,
    retry_after: Some(300),
    ..BASE
};
static SPAM_DETECTED: ErrorMapping = ErrorMapping {
    category: ErrorCategory::Security,
    severity: Severity::High,
    user_message: "Atividade suspeita detectada.",
    technical_message: "Spam detection triggered",
    recovery: "Aguarde alguns minutos e tente novamente.",
    aria_label: "Erro de segurança: atividade suspeita detectada",
    retryable: true,
    retry_after: Some(600),
    ..BASE
};
static EMAIL_SERVICE_UNAVAILABLE: ErrorMapping = ErrorMapping {
    status: StatusCode::BAD_GATEWAY,
    category: ErrorCategory::ExternalService,
    severity: Severity::High,
    user_message: "Serviço de email temporariamente indisponível.",
    technical_message: "Email service connection failed",
    recovery: "Tente novamente em alguns minutos ou entre em contato por telefone.",
    aria_label: "Erro de serviço: email indisponível",
    retryable: true,
    fallback: Some(StaticFallbackHint {
        action: "queue_for_retry",
        message: "Sua mensagem foi salva e será enviada assim que o serviço for restaurado.",
    }),
    log_level: LogLevel::Error,
    ..BASE
};
static SMS_SERVICE_UNAVAILABLE: ErrorMapping = ErrorMapping {
    status: StatusCode::BAD_GATEWAY,
    category: ErrorCategory::ExternalService,
    severity: Severity::High,
    user_message: "Serviço de SMS temporariamente indisponível.",
    technical_message: "SMS service connection failed",
    recovery: "Tente novamente em alguns minutos. Você receberá confirmação por email.",
    aria_label: "Erro de serviço: SMS indisponível",
    retryable: true,
    fallback: Some(StaticFallbackHint {
        action: "email_only",
        message: "Confirmação será enviada apenas por email.",
    }),
    log_level: LogLevel::Error,
    ..BASE
};
static WORDPRESS_UNAVAILABLE: ErrorMapping = ErrorMapping {
    status: StatusCode::BAD_GATEWAY,
    category: ErrorCategory::ExternalService,
    user_message: "Sistema de conteúdo temporariamente indisponível.",
    technical_message: "WordPress CMS connection failed",
    recovery: "Tente recarregar a página em alguns minutos.",
    aria_label: "Erro de serviço: sistema de conteúdo indisponível",
    retryable: true,
    fallback: Some(StaticFallbackHint {
        action: "cached_content",
        message: "Exibindo conteúdo em cache.",
    }),
    log_level: LogLevel::Error,
    ..BASE
};
static OPENAI_UNAVAILABLE: ErrorMapping = ErrorMapping {
    status: StatusCode::BAD_GATEWAY,
    category: ErrorCategory::ExternalService,
    user_message: "Assistente virtual temporariamente indisponível.",
    technical_message: "Chatbot API connection failed",
    recovery: "Tente novamente em alguns minutos ou entre em contato diretamente.",
    aria_label: "Erro de serviço: assistente virtual indisponível",
    retryable: true,
    fallback: Some(StaticFallbackHint {
        action: "static_responses",
        message: "Para agendamentos, ligue (33) 99860-1427 ou use nosso WhatsApp.",
    }),
    log_level: LogLevel::Error,
    ..BASE
};
static DATABASE_CONNECTION_ERROR: ErrorMapping = ErrorMapping {
    status: StatusCode::SERVICE_UNAVAILABLE,
    category: ErrorCategory::Database,
    severity: Severity::Critical,
    user_message: "Serviço temporariamente indisponível.",
    technical_message: "Database connection failed",
    recovery: "Tente novamente em alguns minutos.",
    aria_label: "Erro de sistema: serviço temporariamente indisponível",
    retryable: true,
    log_level: LogLevel::Error,
    ..BASE
};
static DATABASE_TIMEOUT: ErrorMapping = ErrorMapping {
    status: StatusCode::GATEWAY_TIMEOUT,
    category: ErrorCategory::Database,
    severity: Severity::High,
    user_message: "A operação demorou mais que o esperado.",
    technical_message: "Database operation timeout",
    recovery: "Tente novamente com uma conexão mais estável.",
    aria_label: "Erro de tempo: operação demorou muito para completar",
    retryable: true,
    log_level: LogLevel::Error,
    ..BASE
};
static APPOINTMENT_SLOT_UNAVAILABLE: ErrorMapping = ErrorMapping {
    status: StatusCode::CONFLICT,
    category: ErrorCategory::BusinessLogic,
    user_message: "O horário selecionado não está mais disponível.",
    technical_message: "Appointment slot conflict detected",
    recovery: "Escolha outro horário disponível.",
    aria_label: "Erro de agendamento: horário não disponível",
    log_level: LogLevel::Info,
    ..BASE
};
static APPOINTMENT_OUTSIDE_HOURS: ErrorMapping = ErrorMapping {
    status: StatusCode::UNPROCESSABLE_ENTITY,
    category: ErrorCategory::BusinessLogic,
    user_message: "Horário fora do funcionamento da clínica.",
    technical_message: "Appointment time outside business hours",
    recovery: "Escolha um horário entre 08:00 e 18:00, de segunda a sexta-feira.",
    aria_label: "Erro de agendamento: horário fora do funcionamento",
    log_level: LogLevel::Info,
    ..BASE
};
static SECURITY_THREAT_DETECTED: ErrorMapping = ErrorMapping {
    category: ErrorCategory::Security,
    severity: Severity::High,
    user_message: "Solicitação bloqueada por motivos de segurança.",
    technical_message: "Security threat detected in request",
    recovery: "Verifique os dados enviados e tente novamente.",
    aria_label: "Erro de segurança: solicitação bloqueada",
    ..BASE
};
static INVALID_JSON: ErrorMapping = ErrorMapping {
    user_message: "Formato de dados inválido.",
    technical_message: "Invalid JSON in request body",
    recovery: "Recarregue a página e tente novamente.",
    aria_label: "Erro de formato: dados inválidos",
    retryable: true,
    ..BASE
};
static INTERNAL_SERVER_ERROR: ErrorMapping = ErrorMapping {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    category: ErrorCategory::System,
    severity: Severity::Critical,
    user_message: "Ocorreu um erro interno do sistema.",
    technical_message: "Internal server error",
    recovery: "Tente novamente em alguns minutos. Se persistir, entre em contato conosco.",
    aria_label: "Erro do sistema: erro interno",
    retryable: true,
    log_level: LogLevel::Error,
    ..BASE
};
static METHOD_NOT_ALLOWED: ErrorMapping = ErrorMapping {
    status: StatusCode::METHOD_NOT_ALLOWED,
    user_message: "Método de solicitação não permitido.",
    technical_message: "HTTP method not allowed",
    recovery: "Recarregue a página e tente novamente.",
    aria_label: "Erro de método: solicitação não permitida",
    ..BASE
};
static NETWORK_ERROR: ErrorMapping = ErrorMapping {
    status: StatusCode::BAD_GATEWAY,
    category: ErrorCategory::Network,
    severity: Severity::High,
    user_message: "Erro de conexão de rede.",
    technical_message: "Network connection failed",
    recovery: "Verifique sua conexão com a internet e tente novamente.",
    aria_label: "Erro de rede: falha na conexão",
    retryable: true,
    log_level: LogLevel::Error,
    ..BASE
};
static TIMEOUT_ERROR: ErrorMapping = ErrorMapping {
    status: StatusCode::GATEWAY_TIMEOUT,
    category: ErrorCategory::Network,
    user_message: "A conexão expirou.",
    technical_message: "Request timeout",
    recovery: "Tente novamente com uma conexão mais estável.",
    aria_label: "Erro de tempo: conexão expirou",
    retryable: true,
    ..BASE
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let expected = [
            (ApiErrorCode::ValidationError, 400),
            (ApiErrorCode::MissingRequiredFields, 400),
            (ApiErrorCode::InvalidEmailFormat, 400),
            (ApiErrorCode::InvalidPhoneFormat, 400),
            (ApiErrorCode::ConsentRequired, 400),
            (ApiErrorCode::Unauthorized, 401),
            (ApiErrorCode::Forbidden, 403),
            (ApiErrorCode::NotFound, 404),
            (ApiErrorCode::RateLimitExceeded, 429),
            (ApiErrorCode::SpamDetected, 400),
            (ApiErrorCode::EmailServiceUnavailable, 502),
            (ApiErrorCode::SmsServiceUnavailable, 502),
            (ApiErrorCode::WordpressUnavailable, 502),
            (ApiErrorCode::OpenaiUnavailable, 502),
            (ApiErrorCode::DatabaseConnectionError, 503),
            (ApiErrorCode::DatabaseTimeout, 504),
            (ApiErrorCode::AppointmentSlotUnavailable, 409),
            (ApiErrorCode::AppointmentOutsideHours, 422),
            (ApiErrorCode::SecurityThreatDetected, 400),
            (ApiErrorCode::InvalidJson, 400),
            (ApiErrorCode::InternalServerError, 500),
            (ApiErrorCode::MethodNotAllowed, 405),
            (ApiErrorCode::NetworkError, 502),
            (ApiErrorCode::TimeoutError, 504),
        ];
        assert_eq!(expected.len(), ApiErrorCode::ALL.len());
        for (code, status) in expected {
            assert_eq!(code.mapping().status.as_u16(), status, "{code}");
        }
    }

    #[test]
    fn test_every_mapping_is_complete() {
        for code in ApiErrorCode::ALL {
            let m = code.mapping();
            assert!((400..=599).contains(&m.status.as_u16()));
            assert!(!m.user_message.is_empty(), "{code}");
            assert!(!m.technical_message.is_empty(), "{code}");
            assert!(!m.recovery.is_empty(), "{code}");
            assert!(!m.aria_label.is_empty(), "{code}");
            assert_eq!(ApiErrorCode::parse(code.as_str()), Some(code));
        }
    }

    #[test]
    fn test_retry_after_values() {
        assert_eq!(ApiErrorCode::RateLimitExceeded.mapping().retry_after, Some(300));
        assert_eq!(ApiErrorCode::SpamDetected.mapping().retry_after, Some(600));
        assert_eq!(ApiErrorCode::NetworkError.mapping().retry_after, None);
    }
}
