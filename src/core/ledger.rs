// Read access to the game contracts.

use alloy_primitives::Address;
use async_trait::async_trait;

use super::error::Result;
use super::model::{CharacterAttributes, TokenId, WeaponRecord};

/// Number of targets the game offers per character and weapon.
pub const TARGET_COUNT: usize = 4;

#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn owned_character_ids(&self, owner: Address) -> Result<Vec<TokenId>>;

    async fn owned_weapon_ids(&self, owner: Address) -> Result<Vec<TokenId>>;

    /// Current stamina, 0..=200.
    async fn stamina(&self, character: TokenId) -> Result<u8>;

    async fn character_attributes(&self, character: TokenId) -> Result<CharacterAttributes>;

    async fn weapon_record(&self, weapon: TokenId) -> Result<WeaponRecord>;

    /// Packed target words; decode with [`super::stats::decode_opponent`].
    async fn opponents(&self, character: TokenId, weapon: TokenId) -> Result<[u32; TARGET_COUNT]>;
}
