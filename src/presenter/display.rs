//! Display configuration for presented errors.

use serde::{Deserialize, Serialize};

use crate::errors::Severity;
use crate::http::envelope::{FallbackHint, FieldError};
use crate::http::mappings::ErrorCategory;

/// Where the UI renders the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Toast,
    Inline,
    Modal,
    Banner,
}

impl DisplayType {
    /// Field errors sit next to their control; otherwise urgency decides.
    pub fn default_for(severity: Severity, has_field: bool) -> Self {
        if has_field {
            return DisplayType::Inline;
        }
        match severity {
            Severity::Critical => DisplayType::Modal,
            Severity::High => DisplayType::Banner,
            Severity::Medium | Severity::Low => DisplayType::Toast,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Retry,
    Contact,
    Reload,
    Dismiss,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Retry => "Tentar Novamente",
            ActionKind::Contact => "Entrar em Contato",
            ActionKind::Reload => "Recarregar Página",
            ActionKind::Dismiss => "Fechar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    pub label: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub primary: bool,
}

impl ErrorAction {
    fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            label: kind.label(),
            primary: kind == ActionKind::Retry,
        }
    }
}

/// Inputs the action list depends on.
#[derive(Debug, Clone, Copy)]
pub struct ActionInputs<'a> {
    pub retryable: bool,
    pub retry_available: bool,
    pub severity: Severity,
    pub category: ErrorCategory,
    pub code: &'a str,
}

/// Ordered actions: retry, contact, reload, then dismiss.
pub fn actions_for(inputs: ActionInputs<'_>) -> Vec<ErrorAction> {
    let mut actions = Vec::with_capacity(4);
    if inputs.retryable && inputs.retry_available {
        actions.push(ErrorAction::new(ActionKind::Retry));
    }
    if inputs.severity.is_urgent() || inputs.category == ErrorCategory::ExternalService {
        actions.push(ErrorAction::new(ActionKind::Contact));
    }
    if matches!(inputs.category, ErrorCategory::System | ErrorCategory::Network)
        || inputs.code == "NETWORK_ERROR"
    {
        actions.push(ErrorAction::new(ActionKind::Reload));
    }
    actions.push(ErrorAction::new(ActionKind::Dismiss));
    actions
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessibility {
    pub aria_label: String,
    pub role: &'static str,
    pub tab_index: i32,
}

impl Accessibility {
    pub fn alert(aria_label: impl Into<String>) -> Self {
        Self {
            aria_label: aria_label.into(),
            role: "alert",
            tab_index: -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    #[serde(rename = "type")]
    pub display_type: DisplayType,
    pub title: &'static str,
    pub message: String,
    pub recovery: String,
    pub severity: Severity,
    pub actions: Vec<ErrorAction>,
    pub accessibility: Accessibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<Vec<FieldError>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackHint>,
    pub auto_close: bool,
    pub persistent: bool,
}

pub fn title_for(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "Erro Crítico",
        Severity::High => "Erro",
        Severity::Medium => "Atenção",
        Severity::Low => "Aviso",
    }
}

/// Human label for a form field; unknown fields are shown as-is.
pub fn field_label(field: &str) -> String {
    let label = match field {
        "name" => "Nome",
        "email" => "Email",
        "phone" => "Telefone",
        "message" => "Mensagem",
        "consent" => "Consentimento",
        "appointment_date" => "Data do Agendamento",
        "appointment_time" => "Horário do Agendamento",
        other => other,
    };
    label.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(severity: Severity, category: ErrorCategory) -> ActionInputs<'static> {
        ActionInputs {
            retryable: true,
            retry_available: true,
            severity,
            category,
            code: "X",
        }
    }

    fn kinds(actions: &[ErrorAction]) -> Vec<ActionKind> {
        actions.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn test_action_order() {
        let actions = actions_for(inputs(Severity::Critical, ErrorCategory::System));
        assert_eq!(
            kinds(&actions),
            vec![ActionKind::Retry, ActionKind::Contact, ActionKind::Reload, ActionKind::Dismiss]
        );
        assert!(actions[0].primary);
    }

    #[test]
    fn test_retry_needs_handler() {
        let mut i = inputs(Severity::Low, ErrorCategory::Validation);
        i.retry_available = false;
        assert_eq!(kinds(&actions_for(i)), vec![ActionKind::Dismiss]);
    }

    #[test]
    fn test_external_service_gets_contact() {
        let mut i = inputs(Severity::Medium, ErrorCategory::ExternalService);
        i.retryable = false;
        assert_eq!(kinds(&actions_for(i)), vec![ActionKind::Contact, ActionKind::Dismiss]);
    }

    #[test]
    fn test_default_display_type() {
        assert_eq!(DisplayType::default_for(Severity::Low, true), DisplayType::Inline);
        assert_eq!(DisplayType::default_for(Severity::Critical, false), DisplayType::Modal);
        assert_eq!(DisplayType::default_for(Severity::High, false), DisplayType::Banner);
        assert_eq!(DisplayType::default_for(Severity::Medium, false), DisplayType::Toast);
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(field_label("phone"), "Telefone");
        assert_eq!(field_label("crm_number"), "crm_number");
    }
}
