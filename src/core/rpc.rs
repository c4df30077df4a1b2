// JSON-RPC `eth_call` client for the game contracts.

use std::sync::atomic::{AtomicU64, Ordering};

use alloy_primitives::{hex, keccak256, Address};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::config::ContractAddresses;
use super::error::{Error, Result};
use super::ledger::{LedgerReader, TARGET_COUNT};
use super::model::{CharacterAttributes, Element, TokenId, WeaponRecord};

const WORD: usize = 32;

fn selector(signature: &str) -> [u8; 4] {
    let h = keccak256(signature.as_bytes());
    [h[0], h[1], h[2], h[3]]
}

fn encode_uint(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Calldata for a function taking only `uint256` arguments.
pub fn encode_call(signature: &str, args: &[u64]) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + args.len() * WORD);
    data.extend_from_slice(&selector(signature));
    for arg in args {
        data.extend_from_slice(&encode_uint(*arg));
    }
    data
}

/// View over ABI-encoded return data.
pub struct ReturnData {
    bytes: Vec<u8>,
}

impl ReturnData {
    pub fn from_hex(raw: &str) -> Result<Self> {
        let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
            .map_err(|e| Error::RemoteCall(format!("Malformed call result '{raw}': {e}")))?;
        Ok(Self { bytes })
    }

    fn word(&self, index: usize) -> Result<&[u8]> {
        index
            .checked_mul(WORD)
            .and_then(|start| Some(start..start.checked_add(WORD)?))
            .and_then(|range| self.bytes.get(range))
            .ok_or_else(|| Error::RemoteCall(format!("Call result too short for word {index}")))
    }

    /// Word as an unsigned integer; values above `u64::MAX` are rejected.
    pub fn uint(&self, index: usize) -> Result<u64> {
        let word = self.word(index)?;
        let (high, low) = word.split_at(WORD - 8);
        if high.iter().any(|b| *b != 0) {
            return Err(Error::RemoteCall(format!("Word {index} does not fit in 64 bits")));
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(low);
        Ok(u64::from_be_bytes(buf))
    }

    pub fn uint_as<T: TryFrom<u64>>(&self, index: usize) -> Result<T> {
        let value = self.uint(index)?;
        T::try_from(value)
            .map_err(|_| Error::RemoteCall(format!("Word {index} out of range: {value}")))
    }

    /// Single dynamic `uint256[]` return value.
    pub fn uint_array(&self) -> Result<Vec<u64>> {
        let words = self.bytes.len() / WORD;
        let offset = self.uint(0)?;
        if offset % WORD as u64 != 0 || offset / WORD as u64 >= words as u64 {
            return Err(Error::RemoteCall(format!("Bad array offset {offset}")));
        }
        let head = (offset / WORD as u64) as usize;
        let len = self.uint(head)?;
        if len > (words - head - 1) as u64 {
            return Err(Error::RemoteCall(format!(
                "Array length {len} exceeds call result"
            )));
        }
        (0..len as usize).map(|i| self.uint(head + 1 + i)).collect()
    }
}

#[derive(Serialize)]
struct RpcRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

pub struct JsonRpcLedger {
    client: Client,
    url: String,
    contracts: ContractAddresses,
    next_id: AtomicU64,
}

impl JsonRpcLedger {
    pub fn new(client: Client, url: impl Into<String>, contracts: ContractAddresses) -> Self {
        Self {
            client,
            url: url.into(),
            contracts,
            next_id: AtomicU64::new(1),
        }
    }

    async fn call(&self, to: Address, from: Option<Address>, data: Vec<u8>) -> Result<ReturnData> {
        let mut tx = json!({
            "to": to.to_string(),
            "data": hex::encode_prefixed(data),
        });
        if let Some(from) = from {
            tx["from"] = Value::String(from.to_string());
        }
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method: "eth_call",
            params: json!([tx, "latest"]),
        };

        let response: RpcResponse = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(Error::RemoteCall(format!(
                "eth_call to {to} failed ({}): {}",
                err.code, err.message
            )));
        }
        let result = response
            .result
            .ok_or_else(|| Error::RemoteCall(format!("eth_call to {to} returned no result")))?;
        ReturnData::from_hex(&result)
    }

    fn weapons_contract(&self) -> Result<Address> {
        self.contracts.weapons.ok_or_else(|| {
            Error::Configuration("Weapons contract address is not configured".to_string())
        })
    }
}

#[async_trait]
impl LedgerReader for JsonRpcLedger {
    async fn owned_character_ids(&self, owner: Address) -> Result<Vec<TokenId>> {
        self.call(self.contracts.game, Some(owner), encode_call("getMyCharacters()", &[]))
            .await?
            .uint_array()
    }

    async fn owned_weapon_ids(&self, owner: Address) -> Result<Vec<TokenId>> {
        self.call(self.contracts.game, Some(owner), encode_call("getMyWeapons()", &[]))
            .await?
            .uint_array()
    }

    async fn stamina(&self, character: TokenId) -> Result<u8> {
        self.call(
            self.contracts.characters,
            None,
            encode_call("getStaminaPoints(uint256)", &[character]),
        )
        .await?
        .uint_as(0)
    }

    async fn character_attributes(&self, character: TokenId) -> Result<CharacterAttributes> {
        // (xp, level, trait, staminaTimestamp, ...)
        let data = self
            .call(self.contracts.characters, None, encode_call("get(uint256)", &[character]))
            .await?;
        Ok(CharacterAttributes {
            level: data.uint_as(1)?,
            element: Element::from_bits(data.uint_as(2)?),
        })
    }

    async fn weapon_record(&self, weapon: TokenId) -> Result<WeaponRecord> {
        // (properties, stat1, stat2, stat3, level, blade, crossguard, grip,
        //  pommel, burnPoints, bonusPower)
        let data = self
            .call(self.weapons_contract()?, None, encode_call("get(uint256)", &[weapon]))
            .await?;
        Ok(WeaponRecord {
            properties: data.uint_as(0)?,
            stats: [data.uint_as(1)?, data.uint_as(2)?, data.uint_as(3)?],
            bonus_power: data.uint_as(10)?,
        })
    }

    async fn opponents(&self, character: TokenId, weapon: TokenId) -> Result<[u32; TARGET_COUNT]> {
        let data = self
            .call(
                self.contracts.game,
                None,
                encode_call("getTargets(uint256,uint256)", &[character, weapon]),
            )
            .await?;
        let mut targets = [0u32; TARGET_COUNT];
        for (i, target) in targets.iter_mut().enumerate() {
            *target = data.uint_as(i)?;
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(values: &[u64]) -> String {
        let bytes: Vec<u8> = values.iter().flat_map(|v| encode_uint(*v)).collect();
        hex::encode_prefixed(bytes)
    }

    #[test]
    fn test_encode_call_layout() {
        let data = encode_call("getTargets(uint256,uint256)", &[7, 300]);
        assert_eq!(data.len(), 4 + 2 * WORD);
        assert_eq!(&data[..4], &selector("getTargets(uint256,uint256)"));
        assert_eq!(data[4 + WORD - 1], 7);
        assert_eq!(&data[4 + 2 * WORD - 2..], &[1, 44]);
    }

    #[test]
    fn test_selector_of_known_signature() {
        // ERC-20 transfer
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_decode_static_words() {
        let data = ReturnData::from_hex(&words(&[12, 30, 2])).unwrap();
        assert_eq!(data.uint(0).unwrap(), 12);
        assert_eq!(data.uint_as::<u32>(1).unwrap(), 30);
        assert_eq!(Element::from_bits(data.uint_as(2).unwrap()), Element::Lightning);
        assert!(data.uint(3).is_err());
    }

    #[test]
    fn test_decode_out_of_range() {
        let data = ReturnData::from_hex(&words(&[300])).unwrap();
        assert!(data.uint_as::<u8>(0).is_err());

        let mut wide = encode_uint(1).to_vec();
        wide[0] = 1;
        let data = ReturnData::from_hex(&hex::encode_prefixed(wide)).unwrap();
        assert!(data.uint(0).is_err());
    }

    #[test]
    fn test_decode_uint_array() {
        // offset 0x20, length 3, items
        let data = ReturnData::from_hex(&words(&[32, 3, 11, 22, 33])).unwrap();
        assert_eq!(data.uint_array().unwrap(), vec![11, 22, 33]);

        let empty = ReturnData::from_hex(&words(&[32, 0])).unwrap();
        assert!(empty.uint_array().unwrap().is_empty());

        let truncated = ReturnData::from_hex(&words(&[32, 3, 11])).unwrap();
        assert!(truncated.uint_array().is_err());
    }

    #[test]
    fn test_decode_uint_array_rejects_wild_offsets() {
        let huge_offset = ReturnData::from_hex(&words(&[0xFFFF_FFFF_FFFF_FFE0, 0])).unwrap();
        assert!(matches!(huge_offset.uint_array(), Err(Error::RemoteCall(_))));

        let past_end = ReturnData::from_hex(&words(&[64, 0])).unwrap();
        assert!(past_end.uint_array().is_err());

        let huge_len = ReturnData::from_hex(&words(&[32, u64::MAX])).unwrap();
        assert!(matches!(huge_len.uint_array(), Err(Error::RemoteCall(_))));

        let data = ReturnData::from_hex(&words(&[1])).unwrap();
        assert!(data.uint(usize::MAX).is_err());
    }

    #[test]
    fn test_malformed_hex() {
        assert!(ReturnData::from_hex("0xzz").is_err());
    }
}
