// Turns a cycle's candidates into outgoing messages.

use super::batcher::{batch, DISCORD_DESCRIPTION_LIMIT};
use super::format::{account_block, aggregate_title, single_character_message};
use super::model::{AccountAlerts, AlertMessage};

/// Build the messages for one cycle.
///
/// A lone character on a lone account gets a short sentence. Anything more
/// becomes a titled list, split into as many messages as the length limit
/// requires. Accounts without candidates are left out.
pub fn compose_messages(accounts: &[AccountAlerts], threshold: u8) -> Vec<AlertMessage> {
    let active: Vec<&AccountAlerts> = accounts.iter().filter(|a| !a.is_empty()).collect();

    match active.as_slice() {
        [] => Vec::new(),
        [account] if account.candidates.len() == 1 => vec![AlertMessage {
            title: None,
            description: single_character_message(
                &account.name,
                &account.candidates[0],
                threshold,
            ),
        }],
        _ => {
            let blocks: Vec<String> = active
                .iter()
                .map(|account| account_block(&account.name, &account.candidates))
                .collect();
            batch(&blocks, DISCORD_DESCRIPTION_LIMIT)
                .into_iter()
                .map(|description| AlertMessage {
                    title: Some(aggregate_title(threshold)),
                    description,
                })
                .collect()
        }
    }
}
