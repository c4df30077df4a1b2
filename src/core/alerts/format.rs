// Text rendering for Discord messages.

use chrono::{DateTime, Utc};

use crate::core::model::{Element, NotificationCandidate, RankedOpponent};

/// English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st, ...
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub fn element_emoji(element: Element) -> &'static str {
    match element {
        Element::Fire => ":fire:",
        Element::Earth => ":evergreen_tree:",
        Element::Lightning => ":zap:",
        Element::Water => ":droplet:",
    }
}

/// Discord renders this as "in 25 minutes" in the reader's locale.
pub fn relative_timestamp(at: DateTime<Utc>) -> String {
    format!("<t:{}:R>", at.timestamp())
}

pub fn opponent_suffix(opponent: &RankedOpponent) -> String {
    format!(
        " - {}% - {} {} ({})",
        opponent.win_percentage,
        element_emoji(opponent.opponent.element),
        ordinal(opponent.ordinal),
        opponent.opponent.power
    )
}

fn optional_opponent_suffix(candidate: &NotificationCandidate) -> String {
    candidate
        .opponent
        .as_ref()
        .map(opponent_suffix)
        .unwrap_or_default()
}

/// Sentence used when a single character is the only news.
pub fn single_character_message(
    account_name: &str,
    candidate: &NotificationCandidate,
    threshold: u8,
) -> String {
    let base = match candidate.threshold_reached_at {
        None => format!(
            "`{account_name}`'s {} character reached {threshold} stamina ({})",
            ordinal(candidate.ordinal),
            candidate.stamina
        ),
        Some(at) => format!(
            "`{account_name}`'s {} character reaches {threshold} stamina ({}) - {}",
            ordinal(candidate.ordinal),
            candidate.stamina,
            relative_timestamp(at)
        ),
    };
    format!("{base}{}", optional_opponent_suffix(candidate))
}

/// One bullet line in the aggregate message.
pub fn character_line(candidate: &NotificationCandidate) -> String {
    let base = format!("• {} ({})", ordinal(candidate.ordinal), candidate.stamina);
    match candidate.threshold_reached_at {
        None => format!("{base}{}", optional_opponent_suffix(candidate)),
        Some(at) => format!(
            "{base} - {}{}",
            relative_timestamp(at),
            optional_opponent_suffix(candidate)
        ),
    }
}

/// Account header followed by one line per character.
pub fn account_block(account_name: &str, candidates: &[NotificationCandidate]) -> String {
    let lines: Vec<String> = candidates.iter().map(character_line).collect();
    format!("`{account_name}`\n{}", lines.join("\n"))
}

pub fn aggregate_title(threshold: u8) -> String {
    format!("Characters reached {threshold} stamina")
}
