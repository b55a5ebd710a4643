//! Update handlers: command dispatch, search cards and callback actions.

use std::sync::Arc;

use teloxide::{
    dispatching::UpdateFilterExt,
    prelude::*,
    types::{
        CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId,
    },
};
use tracing::{error, warn};

use reelbot_core::{
    authenticate, require_admin, resolver, texts, ApprovalToken, Availability, Caller,
    CatalogEntry, MediaKind, MediaQuery, Role,
};

use crate::commands::{parse_kind_and_query, Command};
use crate::render;
use crate::state::{AppState, SearchSession};

/// Overview cap on search cards.
const CARD_OVERVIEW_LIMIT: usize = 700;

pub async fn run_dispatcher(bot: Bot, state: Arc<AppState>) {
    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint({
                    let state = state.clone();
                    move |bot: Bot, msg: Message, cmd: Command| {
                        let state = state.clone();
                        async move { on_command(bot, msg, cmd, state).await }
                    }
                }),
        )
        .branch(Update::filter_callback_query().endpoint({
            let state = state.clone();
            move |bot: Bot, q: CallbackQuery| {
                let state = state.clone();
                async move { on_callback(bot, q, state).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<AppState>,
) -> ResponseResult<()> {
    let lang = state.config.language;
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let user_id = user.id.0 as i64;

    // Explicit guard ahead of every command: unknown callers get exactly
    // one rejection message.
    let caller = match authenticate(&state.config, user_id) {
        Ok(caller) => caller,
        Err(_) => {
            bot.send_message(msg.chat.id, texts::not_authenticated(lang))
                .await?;
            return Ok(());
        }
    };

    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, render::help_text(caller.role))
                .await?;
        }
        Command::Movie(query) => {
            start_search(&bot, &state, &msg, &caller, MediaKind::Movie, query.trim()).await?;
        }
        Command::Show(query) => {
            start_search(&bot, &state, &msg, &caller, MediaKind::Show, query.trim()).await?;
        }
        Command::Request(args) => {
            let Some((kind, query)) = parse_kind_and_query(&args) else {
                bot.send_message(msg.chat.id, "Usage: /request <movie|show> <title>")
                    .await?;
                return Ok(());
            };
            let requester_name = user.first_name.clone();
            let reception = state
                .workflow
                .handle_request(user_id, &requester_name, kind, query)
                .await;
            bot.send_message(
                msg.chat.id,
                render::reception_message(lang, &reception, query),
            )
            .await?;
        }
        Command::Debug(args) => {
            if require_admin(&caller).is_err() {
                bot.send_message(msg.chat.id, texts::admin_only(lang)).await?;
                return Ok(());
            }
            let Some((kind, query)) = parse_kind_and_query(&args) else {
                bot.send_message(msg.chat.id, "Usage: /debug <movie|show> <title>")
                    .await?;
                return Ok(());
            };
            run_debug(&bot, &state, msg.chat.id, kind, query).await?;
        }
    }
    Ok(())
}

/// Run a catalog search and show the first result card.
async fn start_search(
    bot: &Bot,
    state: &AppState,
    msg: &Message,
    caller: &Caller,
    kind: MediaKind,
    query: &str,
) -> ResponseResult<()> {
    let lang = state.config.language;

    if query.is_empty() {
        bot.send_message(
            msg.chat.id,
            format!("Usage: /{} <title>", kind.as_str()),
        )
        .await?;
        return Ok(());
    }

    let Some(catalog) = state.catalog.as_ref() else {
        bot.send_message(msg.chat.id, texts::section_not_configured(lang, "tmdb"))
            .await?;
        return Ok(());
    };

    let results = match catalog.search(query, kind).await {
        Ok(results) => results,
        Err(e) => {
            warn!(error = %e, query, "catalog search failed");
            bot.send_message(msg.chat.id, texts::generic_failure(lang))
                .await?;
            return Ok(());
        }
    };

    if results.is_empty() {
        bot.send_message(msg.chat.id, texts::no_results(lang, query))
            .await?;
        return Ok(());
    }

    state.sessions.write().await.insert(
        msg.chat.id.0,
        SearchSession {
            kind,
            results,
            index: 0,
            card_message_id: None,
        },
    );

    show_card(bot, state, msg.chat.id, caller.role).await
}

/// Send (or replace) the card for the session's current result.
async fn show_card(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
    role: Role,
) -> ResponseResult<()> {
    let Some(session) = state.sessions.read().await.get(&chat_id.0).cloned() else {
        return Ok(());
    };
    let Some(entry) = session.results.get(session.index) else {
        return Ok(());
    };

    let caption = card_caption(entry);
    let markup = card_keyboard(entry, &session, role);

    // Replacing beats editing here: the poster changes between results.
    if let Some(previous) = session.card_message_id {
        let _ = bot.delete_message(chat_id, MessageId(previous)).await;
    }

    let poster = match entry.poster_path.as_deref() {
        Some(path) => {
            crate::notifier::fetch_image(&state.http, &reelbot_core::poster_url(path)).await
        }
        None => None,
    };

    let sent = match poster {
        Some(bytes) => {
            bot.send_photo(chat_id, InputFile::memory(bytes))
                .caption(caption)
                .reply_markup(markup)
                .await?
        }
        None => {
            bot.send_message(chat_id, caption)
                .reply_markup(markup)
                .await?
        }
    };

    if let Some(session) = state.sessions.write().await.get_mut(&chat_id.0) {
        session.card_message_id = Some(sent.id.0);
    }
    Ok(())
}

fn card_caption(entry: &CatalogEntry) -> String {
    let year = entry
        .year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let overview: String = entry
        .overview
        .as_deref()
        .unwrap_or("No overview available.")
        .chars()
        .take(CARD_OVERVIEW_LIMIT)
        .collect();
    format!("{} ({year})\n\n{overview}", entry.title)
}

fn card_keyboard(
    entry: &CatalogEntry,
    session: &SearchSession,
    role: Role,
) -> InlineKeyboardMarkup {
    let action_label = match role {
        Role::Admin => "➕ Add",
        Role::Friend => "🔎 Check availability",
    };
    let mut rows = vec![vec![InlineKeyboardButton::callback(
        action_label,
        format!("add_{}_{}", session.kind.as_str(), entry.id),
    )]];

    let mut nav = Vec::new();
    if session.index > 0 {
        nav.push(InlineKeyboardButton::callback("⬅️ Previous", "nav_prev"));
    }
    if session.index + 1 < session.results.len() {
        nav.push(InlineKeyboardButton::callback("Next ➡️", "nav_next"));
    }
    if !nav.is_empty() {
        rows.push(nav);
    }

    InlineKeyboardMarkup::new(rows)
}

async fn on_callback(bot: Bot, q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let lang = state.config.language;
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(data) = q.data.clone() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    let message_id = message.id();
    let user_id = q.from.id.0 as i64;

    let caller = match authenticate(&state.config, user_id) {
        Ok(caller) => caller,
        Err(_) => {
            bot.send_message(chat_id, texts::not_authenticated(lang))
                .await?;
            return Ok(());
        }
    };

    if data == "nav_prev" || data == "nav_next" {
        {
            let mut sessions = state.sessions.write().await;
            if let Some(session) = sessions.get_mut(&chat_id.0) {
                if data == "nav_next" && session.index + 1 < session.results.len() {
                    session.index += 1;
                } else if data == "nav_prev" && session.index > 0 {
                    session.index -= 1;
                }
            }
        }
        return show_card(&bot, &state, chat_id, caller.role).await;
    }

    if let Some(rest) = data.strip_prefix("add_") {
        return on_add_action(&bot, &state, &caller, chat_id, rest).await;
    }

    if ApprovalToken::matches(&data) {
        return on_approval_action(&bot, &state, &caller, &q, chat_id, message_id, &data).await;
    }

    warn!(data = %data, user_id, "unknown callback payload");
    Ok(())
}

/// The card's main action: run the cascade, and for admins trigger
/// acquisition on a clean miss.
async fn on_add_action(
    bot: &Bot,
    state: &AppState,
    caller: &Caller,
    chat_id: ChatId,
    args: &str,
) -> ResponseResult<()> {
    let lang = state.config.language;

    let entry = {
        let sessions = state.sessions.read().await;
        let session = sessions.get(&chat_id.0);
        parse_add_args(args).and_then(|(kind, id)| {
            session
                .filter(|s| s.kind == kind)
                .and_then(|s| s.results.iter().find(|e| e.id == id).cloned())
                .map(|entry| (kind, entry))
        })
    };
    let Some((kind, entry)) = entry else {
        bot.send_message(chat_id, texts::generic_failure(lang)).await?;
        return Ok(());
    };

    // Clear the card; the outcome message replaces it.
    if let Some(card_id) = state
        .sessions
        .write()
        .await
        .remove(&chat_id.0)
        .and_then(|s| s.card_message_id)
    {
        let _ = bot.delete_message(chat_id, MessageId(card_id)).await;
    }

    let query = MediaQuery {
        title: entry.title.clone(),
        year: entry.year,
        catalog_id: entry.id,
        kind,
    };

    let availability = state.resolver.verify(&query).await;
    match availability {
        Availability::NotFound => match caller.role {
            Role::Admin => {
                let outcome = state
                    .trigger
                    .acquire(&query, reelbot_core::QualityTier::Standard)
                    .await;
                bot.send_message(chat_id, render::acquisition_message(lang, &query, &outcome))
                    .await?;
            }
            Role::Friend => {
                bot.send_message(chat_id, texts::not_available(lang, &query.title))
                    .await?;
            }
        },
        found => {
            bot.send_message(chat_id, render::availability_message(lang, &query, &found))
                .await?;
        }
    }
    Ok(())
}

fn parse_add_args(args: &str) -> Option<(MediaKind, u32)> {
    let (kind, id) = args.split_once('_')?;
    Some((MediaKind::from_str_strict(kind)?, id.parse().ok()?))
}

/// An admin pressed approve/approve-4K/decline on a request card.
async fn on_approval_action(
    bot: &Bot,
    state: &AppState,
    caller: &Caller,
    q: &CallbackQuery,
    chat_id: ChatId,
    message_id: MessageId,
    data: &str,
) -> ResponseResult<()> {
    let lang = state.config.language;

    if require_admin(caller).is_err() {
        bot.send_message(chat_id, texts::admin_only(lang)).await?;
        return Ok(());
    }

    let token = match ApprovalToken::decode(data) {
        Ok(token) => token,
        Err(e) => {
            // A token that fails to decode is a defect, not user error.
            error!(data = %data, error = %e, "malformed approval token");
            bot.send_message(chat_id, texts::generic_failure(lang)).await?;
            return Ok(());
        }
    };

    let current_text = q
        .message
        .as_ref()
        .and_then(|m| m.regular_message())
        .and_then(|m| m.text().or(m.caption()))
        .unwrap_or_default()
        .to_string();

    state
        .workflow
        .handle_decision(&token, chat_id.0, message_id.0, &current_text)
        .await;
    Ok(())
}

/// Admin diagnostic: report every cascade stage independently.
async fn run_debug(
    bot: &Bot,
    state: &AppState,
    chat_id: ChatId,
    kind: MediaKind,
    query: &str,
) -> ResponseResult<()> {
    let report = |text: String| bot.send_message(chat_id, format!("🐛 {text}"));

    let Some(catalog) = state.catalog.as_ref() else {
        report("TMDB is not configured; nothing to diagnose.".to_string()).await?;
        return Ok(());
    };

    report(format!("Starting diagnostic for '{query}' ({}).", kind.as_str())).await?;

    let entry = match catalog.search(query, kind).await {
        Ok(results) => results.into_iter().next(),
        Err(e) => {
            report(format!("Catalog search failed: {e}")).await?;
            return Ok(());
        }
    };
    let Some(entry) = entry else {
        report(format!("No catalog results for '{query}'. Diagnostic finished.")).await?;
        return Ok(());
    };
    let year = entry.year.map(|y| y.to_string()).unwrap_or_else(|| "?".into());
    report(format!("Catalog found: '{}' ({year}) [ID: {}]", entry.title, entry.id)).await?;

    // Library stage.
    match state.library.as_ref() {
        None => report("Library: not configured.".to_string()).await?,
        Some(library) => match library.search(&entry.title).await {
            Err(e) => report(format!("Library: lookup failed ({e}).")).await?,
            Ok(items) => {
                let hit = items.iter().find(|item| {
                    item.has_media
                        && item.year == entry.year
                        && item.title.eq_ignore_ascii_case(&entry.title)
                });
                match hit {
                    Some(item) => {
                        report(format!("Library: found on {} with media attached.", item.server_name))
                            .await?
                    }
                    None => report("Library: no playable match.".to_string()).await?,
                }
            }
        },
    };

    // Streaming stage.
    match catalog
        .watch_providers(entry.id, kind, &state.config.tmdb.region)
        .await
    {
        Err(e) => report(format!("Streaming: lookup failed ({e}).")).await?,
        Ok(names) => {
            let matched = resolver::matching_providers(&names, &state.config.subscribed_services);
            if matched.is_empty() {
                report(format!(
                    "Streaming: {} providers reported, none subscribed.",
                    names.len()
                ))
                .await?
            } else {
                report(format!("Streaming: available on {}.", matched.join(", "))).await?
            }
        }
    };

    // Tracker stage.
    match state.tracker.as_ref() {
        None => report("Tracker: not configured.".to_string()).await?,
        Some(tracker) => match tracker.find_by_catalog_id(entry.id).await {
            Err(e) => report(format!("Tracker: lookup failed ({e}).")).await?,
            Ok(Some(found)) => {
                report(format!(
                    "Tracker: already requested as '{}'.",
                    found.title.unwrap_or_else(|| entry.title.clone())
                ))
                .await?
            }
            Ok(None) => report("Tracker: no existing request.".to_string()).await?,
        },
    };

    report("Diagnostic finished.".to_string()).await?;
    Ok(())
}
