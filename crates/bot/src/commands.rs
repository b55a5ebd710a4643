//! Bot command definitions and argument parsing.

use teloxide::utils::command::BotCommands;

use reelbot_core::MediaKind;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "search for a movie")]
    Movie(String),
    #[command(description = "search for a show")]
    Show(String),
    #[command(description = "ask for new media: /request <movie|show> <title>")]
    Request(String),
    #[command(description = "step-by-step availability diagnostic (admin)")]
    Debug(String),
    #[command(description = "show this help")]
    Help,
}

/// Parse "<movie|show> <title>" arguments for /request and /debug.
pub fn parse_kind_and_query(args: &str) -> Option<(MediaKind, &str)> {
    let trimmed = args.trim();
    let (kind_word, rest) = trimmed.split_once(char::is_whitespace)?;
    let kind = MediaKind::from_str_strict(&kind_word.to_lowercase())?;
    let query = rest.trim();
    if query.is_empty() {
        return None;
    }
    Some((kind, query))
}
