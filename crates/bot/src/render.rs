//! Rendering of core outcomes into user-facing text.
//!
//! One message per terminal outcome, in the configured language.

use reelbot_core::{
    texts, AcquisitionOutcome, Availability, Lang, MediaKind, MediaQuery, RequestReception, Role,
};

pub fn availability_message(lang: Lang, query: &MediaQuery, availability: &Availability) -> String {
    match availability {
        Availability::FoundInLibrary { server_name } => {
            texts::found_in_library(lang, &query.title, server_name)
        }
        Availability::FoundOnStreaming { providers } => {
            texts::found_on_streaming(lang, &query.title, providers)
        }
        Availability::PendingRequest { tracker_title } => {
            texts::pending_request(lang, tracker_title)
        }
        Availability::NotFound => texts::not_available(lang, &query.title),
    }
}

pub fn acquisition_message(lang: Lang, query: &MediaQuery, outcome: &AcquisitionOutcome) -> String {
    let service = match query.kind {
        MediaKind::Movie => "Radarr",
        MediaKind::Show => "Sonarr",
    };
    match outcome {
        AcquisitionOutcome::Submitted => texts::added_and_searching(lang, &query.title, service),
        AcquisitionOutcome::AlreadyPresent => {
            texts::already_in_service(lang, &query.title, service)
        }
        AcquisitionOutcome::Failed { .. } => texts::add_failed(lang, &query.title, service),
        AcquisitionOutcome::MissingCrossReference => {
            texts::missing_cross_reference(lang, &query.title)
        }
        AcquisitionOutcome::NotConfigured { .. } => {
            let section = match query.kind {
                MediaKind::Movie => "radarr",
                MediaKind::Show => "sonarr",
            };
            texts::section_not_configured(lang, section)
        }
    }
}

pub fn reception_message(lang: Lang, reception: &RequestReception, query_text: &str) -> String {
    match reception {
        RequestReception::RateLimited => texts::request_limit_reached(lang).to_string(),
        RequestReception::CatalogNotConfigured => texts::section_not_configured(lang, "tmdb"),
        RequestReception::SearchFailed => texts::generic_failure(lang).to_string(),
        RequestReception::NoResults => texts::no_results(lang, query_text),
        RequestReception::AlreadyInLibrary { title, server_name } => {
            texts::request_already_in_library(lang, title, server_name)
        }
        RequestReception::AdminNotConfigured => texts::admin_not_configured(lang).to_string(),
        RequestReception::ForwardFailed => texts::generic_failure(lang).to_string(),
        RequestReception::Forwarded { title } => texts::request_sent(lang, title),
    }
}

pub fn help_text(role: Role) -> &'static str {
    match role {
        Role::Admin => {
            "👑 Admin commands\n\n\
             /movie <title> - search and add a movie\n\
             /show <title> - search and add a show\n\
             /request <movie|show> <title> - request like a friend would\n\
             /debug <movie|show> <title> - step-by-step availability diagnostic\n\
             /help - show this message"
        }
        Role::Friend => {
            "👥 Friend commands\n\n\
             /movie <title> - check a movie's availability\n\
             /show <title> - check a show's availability\n\
             /request <movie|show> <title> - ask the admin for new media\n\
             /help - show this message"
        }
    }
}
