//! User-facing message catalog.
//!
//! Every terminal outcome of the cascade or the friend workflow maps to
//! exactly one message here, in the configured language. Admin-side
//! approval prompts are not localized.

use serde::{Deserialize, Serialize};

/// Message language for requester-facing text.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Pt,
}

pub fn found_in_library(lang: Lang, title: &str, server_name: &str) -> String {
    match lang {
        Lang::En => format!("✅ '{title}' is already available on your Plex: {server_name}."),
        Lang::Pt => format!("✅ '{title}' já está disponível no seu Plex: {server_name}."),
    }
}

pub fn found_on_streaming(lang: Lang, title: &str, providers: &[String]) -> String {
    let services = providers.join(", ");
    match lang {
        Lang::En => format!("📺 '{title}' is available for streaming on: {services}."),
        Lang::Pt => format!("📺 '{title}' está disponível para streaming em: {services}."),
    }
}

pub fn pending_request(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => format!("⏳ '{title}' has already been requested and is pending."),
        Lang::Pt => format!("⏳ '{title}' já foi pedido e está pendente."),
    }
}

pub fn not_available(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => {
            format!("ℹ️ '{title}' is not available. Ask an administrator to add it with /request.")
        }
        Lang::Pt => {
            format!("ℹ️ '{title}' não está disponível. Peça para um administrador adicioná-lo com /request.")
        }
    }
}

pub fn added_and_searching(lang: Lang, title: &str, service: &str) -> String {
    match lang {
        Lang::En => format!("✅ '{title}' was added to {service} and the search has started."),
        Lang::Pt => format!("✅ '{title}' foi adicionado ao {service} e a busca foi iniciada."),
    }
}

pub fn already_in_service(lang: Lang, title: &str, service: &str) -> String {
    match lang {
        Lang::En => format!("ℹ️ '{title}' already exists in {service}."),
        Lang::Pt => format!("ℹ️ '{title}' já existe no {service}."),
    }
}

pub fn add_failed(lang: Lang, title: &str, service: &str) -> String {
    match lang {
        Lang::En => format!("❌ Failed to add '{title}' to {service}."),
        Lang::Pt => format!("❌ Falha ao adicionar '{title}' ao {service}."),
    }
}

pub fn missing_cross_reference(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => {
            format!("❌ Could not find a TVDB id for '{title}'. It cannot be added to Sonarr.")
        }
        Lang::Pt => {
            format!("❌ Não foi possível encontrar o TVDB ID para '{title}'. Não pode ser adicionado ao Sonarr.")
        }
    }
}

pub fn section_not_configured(lang: Lang, section: &str) -> String {
    match lang {
        Lang::En => format!("⚠️ The '{section}' section is not configured. The admin needs to fix the config file."),
        Lang::Pt => format!("⚠️ A seção '{section}' não está configurada. O admin precisa ajustar o arquivo de configuração."),
    }
}

pub fn request_limit_reached(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "🚦 You have reached your daily request limit. Try again tomorrow.",
        Lang::Pt => "🚦 Você atingiu seu limite diário de pedidos. Tente novamente amanhã.",
    }
}

pub fn no_results(lang: Lang, query: &str) -> String {
    match lang {
        Lang::En => format!("🤷 No results found for '{query}'. Try being more specific."),
        Lang::Pt => format!("🤷 Nenhum resultado encontrado para '{query}'. Tente ser mais específico."),
    }
}

pub fn request_already_in_library(lang: Lang, title: &str, server_name: &str) -> String {
    match lang {
        Lang::En => format!("✅ '{title}' is already available on {server_name}, no request needed."),
        Lang::Pt => format!("✅ '{title}' já está disponível em {server_name}, não precisa pedir."),
    }
}

pub fn request_sent(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => format!("📨 Your request for '{title}' was sent to the admin."),
        Lang::Pt => format!("📨 Seu pedido de '{title}' foi enviado ao admin."),
    }
}

pub fn request_approved(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => format!("🎉 Your request for '{title}' was approved and is on its way."),
        Lang::Pt => format!("🎉 Seu pedido de '{title}' foi aprovado e está a caminho."),
    }
}

pub fn request_declined(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => format!("🚫 Your request for '{title}' was declined by the admin."),
        Lang::Pt => format!("🚫 Seu pedido de '{title}' foi recusado pelo admin."),
    }
}

pub fn request_approved_but_failed(lang: Lang, title: &str) -> String {
    match lang {
        Lang::En => {
            format!("⚠️ Your request for '{title}' was approved but could not be added. The admin will follow up.")
        }
        Lang::Pt => {
            format!("⚠️ Seu pedido de '{title}' foi aprovado mas não pôde ser adicionado. O admin vai verificar.")
        }
    }
}

pub fn admin_not_configured(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "⚠️ Admin not configured. Cannot process requests.",
        Lang::Pt => "⚠️ Admin não configurado. Não é possível processar pedidos.",
    }
}

pub fn not_authenticated(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "🚫 You are not on this bot's user list. Ask the admin to invite you.",
        Lang::Pt => "🚫 Você não está na lista de usuários deste bot. Peça um convite ao admin.",
    }
}

pub fn admin_only(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "⛔ This command is for the administrator only.",
        Lang::Pt => "⛔ Este comando é apenas para o administrador.",
    }
}

pub fn generic_failure(lang: Lang) -> &'static str {
    match lang {
        Lang::En => "❌ Something went wrong. Please try again later.",
        Lang::Pt => "❌ Algo deu errado. Por favor, tente novamente mais tarde.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_deserializes_from_config_value() {
        let lang: Lang = serde_json::from_str("\"pt\"").unwrap();
        assert_eq!(lang, Lang::Pt);
        let lang: Lang = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Lang::En);
    }

    #[test]
    fn test_every_outcome_has_both_languages() {
        for lang in [Lang::En, Lang::Pt] {
            assert!(!found_in_library(lang, "Arrival", "home").is_empty());
            assert!(!found_on_streaming(lang, "Arrival", &["Netflix".to_string()]).is_empty());
            assert!(!pending_request(lang, "Arrival").is_empty());
            assert!(!not_available(lang, "Arrival").is_empty());
            assert!(!request_limit_reached(lang).is_empty());
            assert!(!request_sent(lang, "Arrival").is_empty());
        }
    }
}
