use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::Address;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::alerts::format::ordinal;
use super::error::{Error, Result};
use super::model::TokenId;

const HOUR_IN_MILLISECONDS: u64 = 3_600_000;
const MAX_STAMINA: i64 = 200;
const DEFAULT_CHARACTERS_CONTRACT: &str = "0xc6f252c2CdD4087e30608A35c022ce490B58179b";
const DEFAULT_GAME_CONTRACT: &str = "0x39Bea96e13453Ed52A734B6ACEeD4c41F57B2271";

lazy_static! {
    static ref WEBHOOK_URL: Regex = Regex::new(
        r"^https://(?:(?:ptb|canary)\.)?discord(?:app)?\.com/api(?:/v\d{1,2})?/webhooks/\d+/[\w-]+/?$"
    )
    .expect("Invalid webhook regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Bsc,
    Heco,
    Okex,
}

impl Network {
    pub fn default_provider(self) -> &'static str {
        match self {
            Self::Bsc => "https://bsc-dataseed1.binance.org:443",
            Self::Heco => "https://http-mainnet.hecochain.com",
            Self::Okex => "https://exchainrpc.okex.org",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bsc" => Some(Self::Bsc),
            "heco" => Some(Self::Heco),
            "okex" => Some(Self::Okex),
            _ => None,
        }
    }
}

/// Raw settings as read from `settings.json` and the environment.
/// Nothing here is validated; see [`Settings::validate`].
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub discord_webhook_url: String,
    pub discord_webhook_id: String,
    pub discord_webhook_token: String,
    pub wait_timeout_ms: u64,
    pub stamina_threshold: i64,
    pub network: Network,
    /// Overrides the network's default RPC endpoint.
    pub blockchain_provider: Option<String>,
    pub addresses: Vec<String>,
    pub account_names: Vec<String>,
    pub win_percentage_threshold: f64,
    /// One weapon per address; enables fight odds when set.
    pub weapon_ids: Vec<String>,
    pub characters_contract: String,
    pub game_contract: String,
    pub weapons_contract: Option<String>,
    pub stamina_regen_minutes: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            discord_webhook_url: String::new(),
            discord_webhook_id: String::new(),
            discord_webhook_token: String::new(),
            wait_timeout_ms: HOUR_IN_MILLISECONDS,
            stamina_threshold: 160,
            network: Network::Bsc,
            blockchain_provider: None,
            addresses: Vec::new(),
            account_names: Vec::new(),
            win_percentage_threshold: 98.0,
            weapon_ids: Vec::new(),
            characters_contract: DEFAULT_CHARACTERS_CONTRACT.to_string(),
            game_contract: DEFAULT_GAME_CONTRACT.to_string(),
            weapons_contract: None,
            stamina_regen_minutes: 5,
        }
    }
}

/// Split a comma separated list, dropping blank entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl Settings {
    /// Apply environment overrides. Unparseable numbers keep the current value.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DISCORD_WEBHOOK_URL") {
            self.discord_webhook_url = url;
        }
        if let Some(id) = lookup("DISCORD_WEBHOOK_ID") {
            self.discord_webhook_id = id;
        }
        if let Some(token) = lookup("DISCORD_WEBHOOK_TOKEN") {
            self.discord_webhook_token = token;
        }
        if let Some(wait) = lookup("WAIT_TIMEOUT").and_then(|v| v.trim().parse().ok()) {
            self.wait_timeout_ms = wait;
        }
        if let Some(threshold) = lookup("STAMINA_THRESHOLD").and_then(|v| v.trim().parse().ok()) {
            self.stamina_threshold = threshold;
        }
        if let Some(network) = lookup("NETWORK").as_deref().and_then(Network::parse) {
            self.network = network;
        }
        if let Some(provider) = lookup("BLOCKCHAIN_PROVIDER").filter(|v| !v.trim().is_empty()) {
            self.blockchain_provider = Some(provider.trim().to_string());
        }
        if let Some(addresses) = lookup("ADDRESSES") {
            self.addresses = split_list(&addresses);
        }
        if let Some(names) = lookup("ACCOUNT_NAMES") {
            self.account_names = split_list(&names);
        }
        if let Some(win) = lookup("WIN_PERCENTAGE_THRESHOLD").and_then(|v| v.trim().parse().ok()) {
            self.win_percentage_threshold = win;
        }
        if let Some(weapons) = lookup("WEAPON_IDS") {
            self.weapon_ids = split_list(&weapons);
        }
        if let Some(contract) = lookup("WEAPONS_CONTRACT").filter(|v| !v.trim().is_empty()) {
            self.weapons_contract = Some(contract.trim().to_string());
        }
    }

    fn webhook_url(&self) -> Result<String> {
        let url = self.discord_webhook_url.trim();
        if !url.is_empty() {
            if !WEBHOOK_URL.is_match(url) {
                return Err(Error::Configuration(format!(
                    "'{url}' is not a valid Discord webhook URL"
                )));
            }
            return Ok(url.to_string());
        }

        let id = self.discord_webhook_id.trim();
        let token = self.discord_webhook_token.trim();
        if id.is_empty() || token.is_empty() {
            return Err(Error::Configuration(
                "You need to specify either Discord Webhook URL or both Discord Webhook ID and token!"
                    .to_string(),
            ));
        }
        Ok(format!("https://discord.com/api/webhooks/{id}/{token}"))
    }

    /// Check the settings and turn them into an immutable [`WatchConfig`].
    pub fn validate(&self) -> Result<WatchConfig> {
        let webhook_url = self.webhook_url()?;

        if !(0..=MAX_STAMINA).contains(&self.stamina_threshold) {
            return Err(Error::Configuration(format!(
                "Stamina threshold needs to be between 0 and {MAX_STAMINA}!"
            )));
        }
        let stamina_threshold = self.stamina_threshold as u8;

        if self.stamina_regen_minutes == 0 {
            return Err(Error::Configuration(
                "Stamina regeneration time must be positive".to_string(),
            ));
        }

        if self.addresses.is_empty() {
            return Err(Error::Configuration(
                "You need to specify an address!".to_string(),
            ));
        }
        let addresses = self
            .addresses
            .iter()
            .map(|address| parse_address(address))
            .collect::<Result<Vec<_>>>()?;

        let names = if self.account_names.is_empty() {
            (1..=addresses.len()).map(ordinal).collect()
        } else {
            self.account_names.clone()
        };
        if names.len() != addresses.len() {
            return Err(Error::Configuration(
                "Length of addresses and account names needs to match!".to_string(),
            ));
        }

        let fight_odds = !self.weapon_ids.is_empty();
        let weapon_ids: Vec<Option<TokenId>> = if fight_odds {
            if self.weapon_ids.len() != addresses.len() {
                return Err(Error::Configuration(
                    "Length of addresses and weapon IDs needs to match!".to_string(),
                ));
            }
            self.weapon_ids
                .iter()
                .map(|id| {
                    id.parse::<TokenId>().map(Some).map_err(|_| {
                        Error::Configuration(format!("'{id}' is not a valid weapon ID"))
                    })
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            vec![None; addresses.len()]
        };

        let weapons = match (&self.weapons_contract, fight_odds) {
            (Some(contract), _) => Some(parse_address(contract)?),
            (None, true) => {
                return Err(Error::Configuration(
                    "Weapon IDs require the weapons contract address".to_string(),
                ))
            }
            (None, false) => None,
        };

        let accounts = addresses
            .into_iter()
            .zip(names)
            .zip(weapon_ids)
            .map(|((address, name), weapon_id)| AccountConfig {
                address,
                name,
                weapon_id,
            })
            .collect();

        Ok(WatchConfig {
            webhook_url,
            wait_timeout: Duration::from_millis(self.wait_timeout_ms),
            stamina_threshold,
            provider_url: self
                .blockchain_provider
                .clone()
                .unwrap_or_else(|| self.network.default_provider().to_string()),
            accounts,
            win_percentage_threshold: self.win_percentage_threshold,
            contracts: ContractAddresses {
                characters: parse_address(&self.characters_contract)?,
                game: parse_address(&self.game_contract)?,
                weapons,
            },
            stamina_regen: chrono::Duration::minutes(i64::from(self.stamina_regen_minutes)),
        })
    }
}

fn parse_address(raw: &str) -> Result<Address> {
    Address::from_str(raw.trim())
        .map_err(|_| Error::Configuration(format!("'{raw}' is not a valid address")))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    pub address: Address,
    pub name: String,
    pub weapon_id: Option<TokenId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractAddresses {
    pub characters: Address,
    pub game: Address,
    pub weapons: Option<Address>,
}

/// Validated, immutable configuration threaded through the watcher.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub webhook_url: String,
    pub wait_timeout: Duration,
    pub stamina_threshold: u8,
    pub provider_url: String,
    pub accounts: Vec<AccountConfig>,
    pub win_percentage_threshold: f64,
    pub contracts: ContractAddresses,
    /// Time to regenerate one stamina point.
    pub stamina_regen: chrono::Duration,
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_path: config_dir.join("settings.json"),
        }
    }

    /// Load `settings.json`, falling back to defaults when it is missing or invalid.
    pub fn load(&self) -> Settings {
        if !self.config_path.exists() {
            return Settings::default();
        }
        match fs::read_to_string(&self.config_path)
            .map_err(Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(Error::from))
        {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!(
                    "Ignoring {}: {}",
                    self.config_path.display(),
                    e
                );
                Settings::default()
            }
        }
    }
}
