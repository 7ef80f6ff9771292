//! Admission, update, eviction and selection rules.
//!
//! Everything here is a pure function of amounts and queue entries so the
//! rules can be exercised without storage, tokens or signatures.

use crate::errors::Error;
use crate::types::{Bid, EvictionPolicy, QueueEntry};
use soroban_sdk::Vec;

/// A challenger must reach `highest * 105 / 100`, compared without division.
pub const INCREMENT_NUMERATOR: i128 = 105;
pub const INCREMENT_DENOMINATOR: i128 = 100;

pub fn meets_increment(amount: i128, highest: i128) -> Result<bool, Error> {
    let scaled_amount = amount
        .checked_mul(INCREMENT_DENOMINATOR)
        .ok_or(Error::ArithmeticOverflow)?;
    let scaled_highest = highest
        .checked_mul(INCREMENT_NUMERATOR)
        .ok_or(Error::ArithmeticOverflow)?;
    Ok(scaled_amount >= scaled_highest)
}

/// Checks a brand new bid of `amount` against the minimum and the leader.
pub fn check_admission(minimum: i128, highest: Option<i128>, amount: i128) -> Result<(), Error> {
    if amount < minimum {
        return Err(Error::BidBelowMinimum);
    }
    if let Some(highest) = highest {
        if !meets_increment(amount, highest)? {
            return Err(Error::BidNotFivePercentHigher);
        }
    }
    Ok(())
}

/// Checks raising a bid from `previous` by `added` and returns the new total.
///
/// The total is compared with the current leader, which may be the same bid.
pub fn check_update(highest: Option<i128>, previous: i128, added: i128) -> Result<i128, Error> {
    if added <= 0 {
        return Err(Error::InvalidAmount);
    }
    let total = previous
        .checked_add(added)
        .ok_or(Error::ArithmeticOverflow)?;
    if let Some(highest) = highest {
        if !meets_increment(total, highest)? {
            return Err(Error::BidNotFivePercentHigher);
        }
    }
    Ok(total)
}

/// The leading bid is only ever removed by winning a mint.
pub fn check_cancel(highest_id: Option<u64>, bid_id: u64) -> Result<(), Error> {
    if highest_id == Some(bid_id) {
        return Err(Error::HighestBidNotRevocable);
    }
    Ok(())
}

/// Returns the bid displaced by an admission under `policy`, if any.
///
/// `incoming` is the id of the bid being raised, or `None` for a new bid. A bid
/// never evicts itself.
pub fn eviction_target(
    policy: EvictionPolicy,
    highest: Option<&Bid>,
    incoming: Option<u64>,
) -> Option<Bid> {
    match (policy, highest) {
        (EvictionPolicy::EvictOnOutbid, Some(leader)) if Some(leader.id) != incoming => {
            Some(leader.clone())
        }
        _ => None,
    }
}

/// Strict queue order: larger amount first, then earlier arrival.
pub fn outranks(a: &QueueEntry, b: &QueueEntry) -> bool {
    a.amount > b.amount || (a.amount == b.amount && a.seq < b.seq)
}

pub fn insertion_index(queue: &Vec<QueueEntry>, entry: &QueueEntry) -> u32 {
    let mut index = 0;
    for existing in queue.iter() {
        if outranks(entry, &existing) {
            break;
        }
        index += 1;
    }
    index
}

pub fn position_of(queue: &Vec<QueueEntry>, bid_id: u64) -> Option<u32> {
    let mut index = 0;
    for existing in queue.iter() {
        if existing.bid_id == bid_id {
            return Some(index);
        }
        index += 1;
    }
    None
}

/// The winner is the head of the queue.
pub fn select_winner(queue: &Vec<QueueEntry>) -> Option<u64> {
    queue.first().map(|entry| entry.bid_id)
}
