// In-memory ledger and transport used by the async tests.

use std::collections::HashMap;
use std::sync::Mutex;

use alloy_primitives::Address;
use async_trait::async_trait;

use super::alerts::model::AlertMessage;
use super::alerts::transport::NotificationTransport;
use super::error::{Error, Result};
use super::ledger::{LedgerReader, TARGET_COUNT};
use super::model::{CharacterAttributes, TokenId, WeaponRecord};

#[derive(Default)]
pub struct FakeLedger {
    pub characters: HashMap<Address, Vec<TokenId>>,
    pub weapons: HashMap<Address, Vec<TokenId>>,
    pub stamina: Mutex<HashMap<TokenId, u8>>,
    pub attributes: HashMap<TokenId, CharacterAttributes>,
    pub weapon_records: HashMap<TokenId, WeaponRecord>,
    pub targets: HashMap<TokenId, [u32; TARGET_COUNT]>,
    /// Every stamina read, in order.
    pub stamina_reads: Mutex<Vec<TokenId>>,
}

impl FakeLedger {
    pub fn set_stamina(&self, character: TokenId, value: u8) {
        self.stamina.lock().unwrap().insert(character, value);
    }

    pub fn reads(&self) -> Vec<TokenId> {
        self.stamina_reads.lock().unwrap().clone()
    }

    fn missing(what: &str, id: impl std::fmt::Display) -> Error {
        Error::RemoteCall(format!("no {what} for {id}"))
    }
}

#[async_trait]
impl LedgerReader for FakeLedger {
    async fn owned_character_ids(&self, owner: Address) -> Result<Vec<TokenId>> {
        Ok(self.characters.get(&owner).cloned().unwrap_or_default())
    }

    async fn owned_weapon_ids(&self, owner: Address) -> Result<Vec<TokenId>> {
        Ok(self.weapons.get(&owner).cloned().unwrap_or_default())
    }

    async fn stamina(&self, character: TokenId) -> Result<u8> {
        self.stamina_reads.lock().unwrap().push(character);
        self.stamina
            .lock()
            .unwrap()
            .get(&character)
            .copied()
            .ok_or_else(|| Self::missing("stamina", character))
    }

    async fn character_attributes(&self, character: TokenId) -> Result<CharacterAttributes> {
        self.attributes
            .get(&character)
            .copied()
            .ok_or_else(|| Self::missing("character", character))
    }

    async fn weapon_record(&self, weapon: TokenId) -> Result<WeaponRecord> {
        self.weapon_records
            .get(&weapon)
            .copied()
            .ok_or_else(|| Self::missing("weapon", weapon))
    }

    async fn opponents(&self, character: TokenId, _weapon: TokenId) -> Result<[u32; TARGET_COUNT]> {
        self.targets
            .get(&character)
            .copied()
            .ok_or_else(|| Self::missing("targets", character))
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<AlertMessage>>,
}

impl RecordingTransport {
    pub fn messages(&self) -> Vec<AlertMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationTransport for RecordingTransport {
    async fn send(&self, message: &AlertMessage) -> Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
