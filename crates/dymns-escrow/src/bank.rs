//! Account ledger.
//!
//! Every transfer is atomic: either both sides move or neither does.

use dymns_store::{keys, record};
use dymns_types::{constants, module_address, DymnsError, Money, Result, Storage};
use rust_decimal::Decimal;

/// Account-ledger operations the marketplace relies on.
///
/// The store is passed per call so balances share the caller's transaction.
pub trait BankKeeper {
    /// Address of the module account holding escrow.
    fn module_address(&self) -> &str;

    /// Create `coin` out of thin air in `to`.
    fn mint(&self, storage: &mut dyn Storage, to: &str, coin: &Money) -> Result<()>;

    /// Destroy `coin` held by `from`.
    ///
    /// # Errors
    /// Returns [`DymnsError::InsufficientFunds`] if `from` holds less.
    fn burn(&self, storage: &mut dyn Storage, from: &str, coin: &Money) -> Result<()>;

    /// Move `coin` from `from` into the module account.
    ///
    /// # Errors
    /// Returns [`DymnsError::InsufficientFunds`] if `from` holds less.
    fn send_coins_from_account_to_module(
        &self,
        storage: &mut dyn Storage,
        from: &str,
        coin: &Money,
    ) -> Result<()>;

    /// Move `coin` from the module account to `to`.
    ///
    /// # Errors
    /// Returns [`DymnsError::InsufficientFunds`] if the module holds less.
    fn send_coins_from_module_to_account(
        &self,
        storage: &mut dyn Storage,
        to: &str,
        coin: &Money,
    ) -> Result<()>;

    fn balance(&self, storage: &dyn Storage, address: &str, denom: &str) -> Result<Decimal>;

    /// Every non-zero balance of `address`, ordered by denom.
    fn all_balances(&self, storage: &dyn Storage, address: &str) -> Result<Vec<Money>>;

    fn module_balance(&self, storage: &dyn Storage, denom: &str) -> Result<Decimal> {
        self.balance(storage, self.module_address(), denom)
    }
}

/// A [`BankKeeper`] that keeps balances in the KV store.
#[derive(Debug, Clone)]
pub struct Bank {
    module_address: String,
}

impl Bank {
    /// Bank whose module account is derived from the DymNS module name.
    #[must_use]
    pub fn new() -> Self {
        Self::with_module_address(module_address(constants::MODULE_NAME))
    }

    #[must_use]
    pub fn with_module_address(module_address: String) -> Self {
        Self { module_address }
    }

    fn write_balance(storage: &mut dyn Storage, address: &str, denom: &str, amount: Decimal) -> Result<()> {
        let key = keys::balance(address, denom);
        if amount.is_zero() {
            storage.remove(&key);
            Ok(())
        } else {
            record::save(storage, &key, &amount)
        }
    }

    fn credited(address: &str, balance: Decimal, coin: &Money) -> Result<Decimal> {
        balance
            .checked_add(coin.amount)
            .ok_or_else(|| DymnsError::BalanceOverflow {
                account: address.to_string(),
                denom: coin.denom.clone(),
                balance,
                amount: coin.amount,
            })
    }

    fn check_coin(coin: &Money) -> Result<()> {
        if coin.is_valid() {
            Ok(())
        } else {
            Err(DymnsError::invalid(format!("invalid coin: {coin}")))
        }
    }

    fn transfer(&self, storage: &mut dyn Storage, from: &str, to: &str, coin: &Money) -> Result<()> {
        Self::check_coin(coin)?;
        if coin.amount.is_zero() || from == to {
            return Ok(());
        }
        let from_balance = self.balance(storage, from, &coin.denom)?;
        if from_balance < coin.amount {
            return Err(DymnsError::InsufficientFunds {
                account: from.to_string(),
                denom: coin.denom.clone(),
                needed: coin.amount,
                available: from_balance,
            });
        }
        let to_balance = Self::credited(to, self.balance(storage, to, &coin.denom)?, coin)?;
        Self::write_balance(storage, from, &coin.denom, from_balance - coin.amount)?;
        Self::write_balance(storage, to, &coin.denom, to_balance)?;
        tracing::debug!(from, to, amount = %coin, "bank transfer");
        Ok(())
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl BankKeeper for Bank {
    fn module_address(&self) -> &str {
        &self.module_address
    }

    fn mint(&self, storage: &mut dyn Storage, to: &str, coin: &Money) -> Result<()> {
        Self::check_coin(coin)?;
        let credited = Self::credited(to, self.balance(storage, to, &coin.denom)?, coin)?;
        Self::write_balance(storage, to, &coin.denom, credited)
    }

    fn burn(&self, storage: &mut dyn Storage, from: &str, coin: &Money) -> Result<()> {
        Self::check_coin(coin)?;
        let current = self.balance(storage, from, &coin.denom)?;
        if current < coin.amount {
            return Err(DymnsError::InsufficientFunds {
                account: from.to_string(),
                denom: coin.denom.clone(),
                needed: coin.amount,
                available: current,
            });
        }
        Self::write_balance(storage, from, &coin.denom, current - coin.amount)
    }

    fn send_coins_from_account_to_module(
        &self,
        storage: &mut dyn Storage,
        from: &str,
        coin: &Money,
    ) -> Result<()> {
        self.transfer(storage, from, &self.module_address, coin)
    }

    fn send_coins_from_module_to_account(
        &self,
        storage: &mut dyn Storage,
        to: &str,
        coin: &Money,
    ) -> Result<()> {
        self.transfer(storage, &self.module_address, to, coin)
    }

    fn balance(&self, storage: &dyn Storage, address: &str, denom: &str) -> Result<Decimal> {
        Ok(record::load(storage, &keys::balance(address, denom))?.unwrap_or(Decimal::ZERO))
    }

    fn all_balances(&self, storage: &dyn Storage, address: &str) -> Result<Vec<Money>> {
        let prefix = keys::balances_of(address);
        storage
            .scan_prefix(&prefix)
            .map(|(key, bytes)| -> Result<Money> {
                let denom = String::from_utf8_lossy(&key[prefix.len()..]).into_owned();
                let amount: Decimal = serde_json::from_slice(&bytes)?;
                Ok(Money::new(denom, amount))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use dymns_types::{dummy, MemStorage};

    use super::*;

    fn adym(n: i64) -> Money {
        Money::new("adym", Decimal::new(n, 0))
    }

    #[test]
    fn mint_increases_balance() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        let user = dummy::address(1);
        bank.mint(&mut store, &user, &adym(1000)).unwrap();
        bank.mint(&mut store, &user, &adym(500)).unwrap();
        assert_eq!(bank.balance(&store, &user, "adym").unwrap(), Decimal::new(1500, 0));
    }

    #[test]
    fn send_to_module_and_back() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        let user = dummy::address(1);
        bank.mint(&mut store, &user, &adym(1000)).unwrap();

        bank.send_coins_from_account_to_module(&mut store, &user, &adym(400)).unwrap();
        assert_eq!(bank.balance(&store, &user, "adym").unwrap(), Decimal::new(600, 0));
        assert_eq!(bank.module_balance(&store, "adym").unwrap(), Decimal::new(400, 0));

        let other = dummy::address(2);
        bank.send_coins_from_module_to_account(&mut store, &other, &adym(400)).unwrap();
        assert_eq!(bank.module_balance(&store, "adym").unwrap(), Decimal::ZERO);
        assert_eq!(bank.balance(&store, &other, "adym").unwrap(), Decimal::new(400, 0));
    }

    #[test]
    fn insufficient_funds_leaves_balances_unchanged() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        let user = dummy::address(1);
        bank.mint(&mut store, &user, &adym(100)).unwrap();
        let before = store.clone();

        let err = bank
            .send_coins_from_account_to_module(&mut store, &user, &adym(200))
            .unwrap_err();
        assert!(matches!(err, DymnsError::InsufficientFunds { .. }));
        assert_eq!(store, before);

        let err = bank
            .send_coins_from_module_to_account(&mut store, &user, &adym(1))
            .unwrap_err();
        assert!(matches!(err, DymnsError::InsufficientFunds { .. }));
    }

    #[test]
    fn zero_balances_are_not_stored() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        let user = dummy::address(1);
        bank.mint(&mut store, &user, &adym(100)).unwrap();
        bank.burn(&mut store, &user, &adym(100)).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn all_balances_lists_denoms_in_order() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        let user = dummy::address(1);
        bank.mint(&mut store, &user, &Money::new("uatom", Decimal::ONE)).unwrap();
        bank.mint(&mut store, &user, &adym(5)).unwrap();
        bank.mint(&mut store, &dummy::address(2), &adym(7)).unwrap();
        assert_eq!(
            bank.all_balances(&store, &user).unwrap(),
            vec![adym(5), Money::new("uatom", Decimal::ONE)]
        );
    }

    #[test]
    fn credit_past_max_is_an_error() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        let rich = dummy::address(1);
        let user = dummy::address(2);
        bank.mint(&mut store, &rich, &Money::new("adym", Decimal::MAX)).unwrap();
        bank.mint(&mut store, &user, &adym(10)).unwrap();
        let before = store.clone();

        let err = bank.mint(&mut store, &rich, &adym(1)).unwrap_err();
        assert!(matches!(err, DymnsError::BalanceOverflow { .. }), "{err}");
        assert_eq!(store, before);

        bank.send_coins_from_account_to_module(&mut store, &rich, &Money::new("adym", Decimal::MAX))
            .unwrap();
        let before = store.clone();
        let err = bank.send_coins_from_account_to_module(&mut store, &user, &adym(10)).unwrap_err();
        assert!(matches!(err, DymnsError::BalanceOverflow { .. }), "{err}");
        assert_eq!(store, before);
    }

    #[test]
    fn negative_coin_rejected() {
        let mut store = MemStorage::new();
        let bank = Bank::new();
        assert!(bank.mint(&mut store, &dummy::address(1), &adym(-1)).is_err());
    }
}
