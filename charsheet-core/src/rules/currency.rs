//! Spending coins with change-making.

use crate::inventory::{Currency, Denomination};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpendError {
    #[error("Not enough coin: need {needed} cp, have {available} cp")]
    Insufficient { needed: u64, available: u64 },
}

/// Pay `amount` coins of `denomination`.
///
/// Coins of the requested denomination are used first, then lower ones.
/// If that still falls short, the smallest higher coin that covers the rest
/// is broken and change is returned in gp, sp and cp.
pub fn spend(purse: &mut Currency, denomination: Denomination, amount: u32) -> Result<(), SpendError> {
    let needed = amount as u64 * denomination.value_cp();
    let available = purse.total_cp();
    if needed > available {
        return Err(SpendError::Insufficient { needed, available });
    }

    let mut remaining = needed;
    for coin in Denomination::all().iter().rev().filter(|d| **d <= denomination) {
        let value = coin.value_cp();
        let held = purse.get_mut(*coin);
        let used = (*held as u64).min(remaining / value);
        *held -= used as u32;
        remaining -= used * value;
    }

    for coin in Denomination::all() {
        if remaining == 0 {
            break;
        }
        let value = coin.value_cp();
        while remaining > 0 && purse.get(coin) > 0 {
            *purse.get_mut(coin) -= 1;
            if value >= remaining {
                give_change(purse, value - remaining);
                remaining = 0;
            } else {
                remaining -= value;
            }
        }
    }
    Ok(())
}

fn give_change(purse: &mut Currency, mut change: u64) {
    for coin in [Denomination::Gold, Denomination::Silver, Denomination::Copper] {
        let value = coin.value_cp();
        purse.add(coin, (change / value) as u32);
        change %= value;
    }
}
