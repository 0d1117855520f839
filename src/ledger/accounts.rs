//! The ledger: an owned map from trader to balances.
//!
//! ## Semantics
//!
//! - Unknown traders read as zero and are not an error.
//! - An entry is created by the first mutation and never removed.
//! - `debit` refuses to drive a balance negative. The matching loop still
//!   pre-checks with `available` before settling, so a settlement never
//!   fails half-way.
//!
//! Entries live in a `BTreeMap` so snapshots and digests come out in trader
//! order regardless of insertion history.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::error::{EngineError, EngineResult};
use crate::ledger::{AccountBalance, Balances};
use crate::types::{Currency, Shortfall, TraderId};

/// Per-trader balances in the base and quote currencies.
///
/// ## Example
///
/// ```
/// use fxmatch::ledger::Ledger;
/// use fxmatch::types::Currency;
/// use rust_decimal_macros::dec;
///
/// let mut ledger = Ledger::new();
/// ledger.credit(1, Currency::Quote, dec!(2000)).unwrap();
///
/// assert_eq!(ledger.available(1, Currency::Quote), dec!(2000));
/// assert_eq!(ledger.available(99, Currency::Base), dec!(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    accounts: BTreeMap<TraderId, Balances>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of traders with an entry
    #[inline]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Balance of `trader` in `currency`; zero for unknown traders
    pub fn available(&self, trader: TraderId, currency: Currency) -> Decimal {
        self.accounts
            .get(&trader)
            .map_or(Decimal::ZERO, |balances| balances.get(currency))
    }

    /// Both balances of `trader`; zero for unknown traders
    pub fn balances(&self, trader: TraderId) -> Balances {
        self.accounts.get(&trader).copied().unwrap_or_default()
    }

    /// Fail with a [`Shortfall`] unless `trader` holds at least `required`
    pub fn ensure_available(
        &self,
        trader: TraderId,
        currency: Currency,
        required: Decimal,
    ) -> Result<(), Shortfall> {
        let available = self.available(trader, currency);
        if available < required {
            return Err(Shortfall::new(trader, currency, required, available));
        }
        Ok(())
    }

    /// Read-only view of every trader's balances, ordered by trader id
    pub fn snapshot(&self) -> Vec<AccountBalance> {
        self.iter()
            .map(|(trader, balances)| AccountBalance::new(trader, balances))
            .collect()
    }

    /// Iterate over `(trader, balances)` in trader order
    pub fn iter(&self) -> impl Iterator<Item = (TraderId, Balances)> + '_ {
        self.accounts.iter().map(|(trader, balances)| (*trader, *balances))
    }

    /// Sum of all balances per currency
    ///
    /// # Errors
    ///
    /// [`EngineError::Overflow`] if a sum leaves the decimal range.
    pub fn totals(&self) -> EngineResult<Balances> {
        self.accounts
            .values()
            .try_fold(Balances::default(), |acc, balances| {
                let overflow = || EngineError::Overflow("ledger totals");
                Ok(Balances::new(
                    acc.base.checked_add(balances.base).ok_or_else(overflow)?,
                    acc.quote.checked_add(balances.quote).ok_or_else(overflow)?,
                ))
            })
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Add `amount` to a balance, creating the entry if needed
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] for negative amounts,
    /// [`EngineError::Overflow`] or [`EngineError::PrecisionLoss`] if the new
    /// balance cannot be held exactly. The ledger is unchanged on error.
    pub fn credit(&mut self, trader: TraderId, currency: Currency, amount: Decimal) -> EngineResult<()> {
        ensure_non_negative(amount)?;

        let updated = exact_add(self.available(trader, currency), amount, "balance credit")?;
        *self.accounts.entry(trader).or_default().get_mut(currency) = updated;
        Ok(())
    }

    /// Subtract `amount` from a balance
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidAmount`] for negative amounts,
    /// [`EngineError::InsufficientBalance`] if the balance would go negative.
    /// The ledger is unchanged on error.
    pub fn debit(&mut self, trader: TraderId, currency: Currency, amount: Decimal) -> EngineResult<()> {
        ensure_non_negative(amount)?;
        self.ensure_available(trader, currency, amount)?;

        let updated = exact_sub(self.available(trader, currency), amount, "balance debit")?;
        *self.accounts.entry(trader).or_default().get_mut(currency) = updated;
        Ok(())
    }

    /// Seed a starting balance. Same as [`Ledger::credit`].
    pub fn deposit(&mut self, trader: TraderId, currency: Currency, amount: Decimal) -> EngineResult<()> {
        self.credit(trader, currency, amount)
    }

    /// Move `value` quote from buyer to seller and `volume` base from seller
    /// to buyer.
    ///
    /// Both sides are checked before anything is touched, buyer first. All
    /// four new balances are computed before any is written, so the ledger
    /// is unchanged on error.
    pub fn settle(
        &mut self,
        buyer: TraderId,
        seller: TraderId,
        volume: Decimal,
        value: Decimal,
    ) -> EngineResult<()> {
        ensure_non_negative(volume)?;
        ensure_non_negative(value)?;
        self.ensure_available(buyer, Currency::Quote, value)?;
        self.ensure_available(seller, Currency::Base, volume)?;

        if buyer == seller {
            // Both legs land on one entry and cancel out
            return Ok(());
        }

        let paying = self.balances(buyer);
        let delivering = self.balances(seller);
        let buyer_after = Balances::new(
            exact_add(paying.base, volume, "settlement")?,
            exact_sub(paying.quote, value, "settlement")?,
        );
        let seller_after = Balances::new(
            exact_sub(delivering.base, volume, "settlement")?,
            exact_add(delivering.quote, value, "settlement")?,
        );

        self.accounts.insert(buyer, buyer_after);
        self.accounts.insert(seller, seller_after);
        Ok(())
    }

    /// Feed the canonical ledger encoding into a state-root hasher
    pub fn digest(&self, hasher: &mut Sha256) {
        for (trader, balances) in &self.accounts {
            hasher.update(trader.to_le_bytes());
            hasher.update(balances.base.normalize().to_string().as_bytes());
            hasher.update([0u8]);
            hasher.update(balances.quote.normalize().to_string().as_bytes());
            hasher.update([0u8]);
        }
    }
}

fn ensure_non_negative(amount: Decimal) -> EngineResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(EngineError::InvalidAmount { amount });
    }
    Ok(())
}

/// `a + b`, failing unless the sum is held exactly
fn exact_add(a: Decimal, b: Decimal, what: &'static str) -> EngineResult<Decimal> {
    let sum = a.checked_add(b).ok_or(EngineError::Overflow(what))?;
    ensure_exact(sum, a, b, what)
}

/// `a - b`, failing unless the difference is held exactly
fn exact_sub(a: Decimal, b: Decimal, what: &'static str) -> EngineResult<Decimal> {
    let difference = a.checked_sub(b).ok_or(EngineError::Overflow(what))?;
    ensure_exact(difference, a, b, what)
}

/// An exact sum or difference keeps the larger scale of its non-zero
/// operands; a smaller scale means digits were rounded away.
fn ensure_exact(result: Decimal, a: Decimal, b: Decimal, what: &'static str) -> EngineResult<Decimal> {
    let scale = [a, b]
        .iter()
        .filter(|operand| !operand.is_zero())
        .map(Decimal::scale)
        .max()
        .unwrap_or(0);

    if !result.is_zero() && result.scale() < scale {
        return Err(EngineError::PrecisionLoss(what));
    }
    Ok(result)
}

// ============================================================================
// Unit Tests
// ============================================================================
