//! Canned chatbot answers used while the AI service is down.

use serde_json::{json, Value};

use crate::config::ClinicConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Topic {
    Emergency,
    Scheduling,
    Services,
    Location,
    Greeting,
}

const EMERGENCY: &[&str] = &["emergência", "emergencia", "urgente", "dor"];
const SCHEDULING: &[&str] = &["agendar", "consulta", "horário", "horario"];
const SERVICES: &[&str] = &["serviço", "servico", "exame", "cirurgia"];
const LOCATION: &[&str] = &["endereço", "endereco", "localização", "onde"];

fn topic(message: &str) -> Topic {
    let message = message.to_lowercase();
    let mentions = |words: &[&str]| words.iter().any(|w| message.contains(w));

    if mentions(EMERGENCY) {
        Topic::Emergency
    } else if mentions(SCHEDULING) {
        Topic::Scheduling
    } else if mentions(SERVICES) {
        Topic::Services
    } else if mentions(LOCATION) {
        Topic::Location
    } else {
        Topic::Greeting
    }
}

/// Static reply for a patient message. Emergency language always wins.
pub fn static_chatbot_response(message: Option<&str>, clinic: &ClinicConfig) -> String {
    match topic(message.unwrap_or_default()) {
        Topic::Emergency => format!(
            "🚨 Para emergências oftalmológicas, procure atendimento médico imediato ou ligue para {}.",
            clinic.phone
        ),
        Topic::Scheduling => format!(
            "📅 Para agendamentos, ligue {} ou use nosso WhatsApp. Atendemos {}.",
            clinic.phone, clinic.opening_hours
        ),
        Topic::Services => "👁️ Oferecemos consultas, exames especializados, cirurgias de catarata, \
             tratamento de glaucoma e muito mais. Entre em contato para mais informações."
            .to_string(),
        Topic::Location => format!("📍 Estamos localizados na {}.", clinic.address),
        Topic::Greeting => format!(
            "👋 Olá! Sou o assistente da {}. Para agendamentos e informações, ligue {} ou use nosso WhatsApp. Como posso ajudar?",
            clinic.name, clinic.phone
        ),
    }
}

/// Contact block attached to every static reply.
pub fn contact_info(clinic: &ClinicConfig) -> Value {
    json!({
        "phone": clinic.phone,
        "whatsapp": clinic.whatsapp_url,
        "message": "Para agendamentos e dúvidas, entre em contato diretamente.",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emergency_mentions_phone() {
        let clinic = ClinicConfig::default();
        let reply = static_chatbot_response(Some("Estou com DOR no olho, é urgente"), &clinic);
        assert!(reply.starts_with("🚨"));
        assert!(reply.contains(&clinic.phone));
    }

    #[test]
    fn test_emergency_beats_scheduling() {
        let clinic = ClinicConfig::default();
        let reply = static_chatbot_response(Some("quero agendar consulta urgente"), &clinic);
        assert!(reply.starts_with("🚨"));
    }

    #[test]
    fn test_topics() {
        let clinic = ClinicConfig::default();
        assert!(static_chatbot_response(Some("Quero agendar"), &clinic).starts_with("📅"));
        assert!(static_chatbot_response(Some("Fazem exame de vista?"), &clinic).starts_with("👁️"));
        assert!(static_chatbot_response(Some("Qual o endereço?"), &clinic).contains("Caratinga"));
        assert!(static_chatbot_response(None, &clinic).starts_with("👋"));
    }
}
