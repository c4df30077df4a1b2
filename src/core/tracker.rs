use chrono::{DateTime, Duration, FixedOffset, Utc};

use super::config::{AccountConfig, WatchConfig};
use super::error::{Error, Result};
use super::ledger::LedgerReader;
use super::model::{NotificationCandidate, Opponent, RankedOpponent, TokenId, TrackedAccount, TrackedCharacter};
use super::odds::best_opponent;
use super::power::{aligned_attack_power, character_power, weapon_attributes};
use super::schedule::predict;
use super::stats::decode_opponent;

/// Wall clock used for scheduling; local time decides the hour boundary.
pub type Clock = dyn Fn() -> DateTime<FixedOffset> + Send + Sync;

/// The parts of the configuration a stamina check needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckPolicy {
    pub threshold: u8,
    pub regen_per_unit: Duration,
    pub win_percentage_threshold: f64,
}

impl From<&WatchConfig> for CheckPolicy {
    fn from(config: &WatchConfig) -> Self {
        Self {
            threshold: config.stamina_threshold,
            regen_per_unit: config.stamina_regen,
            win_percentage_threshold: config.win_percentage_threshold,
        }
    }
}

/// Load the characters of every configured account, in configuration order.
///
/// Fails when an account does not own its configured weapon.
pub async fn initialize_accounts(
    accounts: &[AccountConfig],
    ledger: &dyn LedgerReader,
) -> Result<Vec<TrackedAccount>> {
    let mut tracked = Vec::with_capacity(accounts.len());
    for account in accounts {
        let characters = ledger
            .owned_character_ids(account.address)
            .await?
            .into_iter()
            .enumerate()
            .map(|(i, id)| TrackedCharacter::new(id, i + 1))
            .collect::<Vec<_>>();

        if let Some(weapon_id) = account.weapon_id {
            let weapons = ledger.owned_weapon_ids(account.address).await?;
            if !weapons.contains(&weapon_id) {
                return Err(Error::DataInconsistency(format!(
                    "Account `{}` does not own weapon ID `{}`!",
                    account.name, weapon_id
                )));
            }
        }

        log::info!(
            "Tracking {} characters for account {}",
            characters.len(),
            account.name
        );
        tracked.push(TrackedAccount {
            address: account.address,
            name: account.name.clone(),
            weapon_id: account.weapon_id,
            characters,
        });
    }
    Ok(tracked)
}

/// Best target for a character fighting with `weapon`.
pub async fn fetch_best_opponent(
    ledger: &dyn LedgerReader,
    character: TokenId,
    weapon: TokenId,
) -> Result<Option<RankedOpponent>> {
    let targets = ledger.opponents(character, weapon).await?;
    let attributes = ledger.character_attributes(character).await?;
    let record = ledger.weapon_record(weapon).await?;

    let weapon = weapon_attributes(&record, attributes.element);
    let aligned = aligned_attack_power(character_power(attributes.level), &weapon);
    let opponents: Vec<Opponent> = targets.iter().map(|word| decode_opponent(*word)).collect();
    Ok(best_opponent(aligned, attributes.element, weapon.element, &opponents))
}

/// Sample every due character of `account` and reschedule it.
///
/// Characters whose check time is still ahead are skipped without a ledger
/// call. With a weapon configured, a notable character whose best fight is
/// below the win threshold is neither reported nor rescheduled. An error
/// stops the account midway; schedules already written are kept.
pub async fn check_account(
    account: &mut TrackedAccount,
    ledger: &dyn LedgerReader,
    policy: &CheckPolicy,
    clock: &Clock,
) -> Result<Vec<NotificationCandidate>> {
    let weapon_id = account.weapon_id;
    let mut candidates = Vec::new();

    for character in account.characters.iter_mut() {
        let now = clock();
        if !character.is_due(now.with_timezone(&Utc)) {
            log::debug!(
                "Skipping character {} until {}",
                character.id,
                character.next_check
            );
            continue;
        }

        let stamina = ledger.stamina(character.id).await?;
        let prediction = predict(&now, stamina, policy.threshold, policy.regen_per_unit);
        log::debug!(
            "Character {} has {} stamina: {:?}",
            character.id,
            stamina,
            prediction.outcome
        );

        if !prediction.outcome.is_notable() {
            character.next_check = prediction.next_check;
            continue;
        }

        let opponent = match weapon_id {
            Some(weapon) => match fetch_best_opponent(ledger, character.id, weapon).await? {
                Some(best) if best.win_percentage >= policy.win_percentage_threshold => Some(best),
                best => {
                    log::debug!(
                        "Character {} best fight {:?}% is below {}%, checking again next cycle",
                        character.id,
                        best.map(|b| b.win_percentage),
                        policy.win_percentage_threshold
                    );
                    continue;
                }
            },
            None => None,
        };

        character.next_check = prediction.next_check;
        candidates.push(NotificationCandidate {
            ordinal: character.ordinal,
            stamina,
            threshold_reached_at: prediction.threshold_reached_at,
            opponent,
        });
    }

    Ok(candidates)
}
