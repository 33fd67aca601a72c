//! Currency wallet: per-currency carried and banked balances

use serde::{Deserialize, Serialize};

use super::RECORD_VERSION;
use crate::sim::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyBalance {
    pub currency: Currency,
    /// Carried amount
    pub wallet: u32,
    /// Banked amount
    pub bank: u32,
}

impl CurrencyBalance {
    pub fn empty(currency: Currency) -> Self {
        Self {
            currency,
            wallet: 0,
            bank: 0,
        }
    }
}

/// Balances for every currency, indexed by `Currency::index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyWallet {
    pub version: String,
    pub balances: [CurrencyBalance; Currency::COUNT],
}

impl Default for CurrencyWallet {
    fn default() -> Self {
        Self {
            version: RECORD_VERSION.to_string(),
            balances: Currency::ALL.map(CurrencyBalance::empty),
        }
    }
}

impl CurrencyWallet {
    pub const FILE_NAME: &'static str = "inventory_currency.json";

    pub fn balance(&self, currency: Currency) -> &CurrencyBalance {
        &self.balances[currency.index()]
    }

    fn balance_mut(&mut self, currency: Currency) -> &mut CurrencyBalance {
        &mut self.balances[currency.index()]
    }

    /// Add to the carried amount
    pub fn deposit(&mut self, currency: Currency, amount: u32) {
        let balance = self.balance_mut(currency);
        balance.wallet = balance.wallet.saturating_add(amount);
    }

    /// Deposit a whole run's haul, indexed like `Currency::ALL`
    pub fn deposit_all(&mut self, amounts: &[u32; Currency::COUNT]) {
        for currency in Currency::ALL {
            self.deposit(currency, amounts[currency.index()]);
        }
    }

    /// Move everything carried into the bank; returns the amount moved
    pub fn bank(&mut self, currency: Currency) -> u32 {
        let balance = self.balance_mut(currency);
        let moved = balance.wallet;
        balance.bank = balance.bank.saturating_add(moved);
        balance.wallet = 0;
        moved
    }

    /// Bank every currency; returns the total moved
    pub fn bank_all(&mut self) -> u32 {
        Currency::ALL
            .into_iter()
            .fold(0u32, |moved, currency| moved.saturating_add(self.bank(currency)))
    }

    /// Carried plus banked
    pub fn total(&self, currency: Currency) -> u32 {
        let balance = self.balance(currency);
        balance.wallet.saturating_add(balance.bank)
    }
}
