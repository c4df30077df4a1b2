use std::sync::Arc;

use chrono::Local;

use super::alerts::engine::compose_messages;
use super::alerts::model::AccountAlerts;
use super::alerts::transport::NotificationTransport;
use super::config::WatchConfig;
use super::error::Result;
use super::ledger::LedgerReader;
use super::model::TrackedAccount;
use super::tracker::{check_account, initialize_accounts, CheckPolicy, Clock};

pub struct CycleOutput {
    pub messages_sent: usize,
}

/// Owns the tracked accounts and runs one poll cycle at a time.
pub struct Coordinator {
    ledger: Arc<dyn LedgerReader>,
    transport: Arc<dyn NotificationTransport>,
    config: WatchConfig,
    accounts: Vec<TrackedAccount>,
    clock: Box<Clock>,
}

impl Coordinator {
    /// Fetch every account's characters and verify weapon ownership.
    pub async fn initialize(
        config: WatchConfig,
        ledger: Arc<dyn LedgerReader>,
        transport: Arc<dyn NotificationTransport>,
    ) -> Result<Self> {
        let accounts = initialize_accounts(&config.accounts, ledger.as_ref()).await?;
        Ok(Self {
            ledger,
            transport,
            config,
            accounts,
            clock: Box::new(|| Local::now().fixed_offset()),
        })
    }

    pub fn with_clock(mut self, clock: Box<Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn accounts(&self) -> &[TrackedAccount] {
        &self.accounts
    }

    /// Check all accounts in order, then send whatever came up.
    ///
    /// The first error ends the cycle. Accounts checked before it keep their
    /// new schedules and nothing is sent.
    pub async fn tick(&mut self) -> Result<CycleOutput> {
        let policy = CheckPolicy::from(&self.config);
        let mut alerts = Vec::with_capacity(self.accounts.len());

        for account in self.accounts.iter_mut() {
            let candidates =
                check_account(account, self.ledger.as_ref(), &policy, self.clock.as_ref()).await?;
            alerts.push(AccountAlerts {
                name: account.name.clone(),
                candidates,
            });
        }

        let messages = compose_messages(&alerts, self.config.stamina_threshold);
        for message in &messages {
            self.transport.send(message).await?;
        }
        Ok(CycleOutput {
            messages_sent: messages.len(),
        })
    }
}
