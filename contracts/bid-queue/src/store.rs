//! The set of active bids and its priority queue.
//!
//! Bids live under their own keys; the queue holds `(id, amount, seq)` entries
//! sorted so that its head is always the highest bid.

use crate::ranking;
use crate::storage;
use crate::types::{Bid, QueueEntry};
use soroban_sdk::{BytesN, Env, Vec};

fn entry_of(bid: &Bid) -> QueueEntry {
    QueueEntry {
        bid_id: bid.id,
        amount: bid.amount,
        seq: bid.seq,
    }
}

pub fn get(env: &Env, bid_id: u64) -> Option<Bid> {
    storage::get_bid(env, bid_id)
}

pub fn highest_id(env: &Env) -> Option<u64> {
    ranking::select_winner(&storage::get_queue(env))
}

pub fn highest(env: &Env) -> Option<Bid> {
    highest_id(env).and_then(|id| storage::get_bid(env, id))
}

pub fn size(env: &Env) -> u32 {
    storage::get_queue(env).len()
}

pub fn ids(env: &Env) -> Vec<u64> {
    let mut ids = Vec::new(env);
    for entry in storage::get_queue(env).iter() {
        ids.push_back(entry.bid_id);
    }
    ids
}

pub fn find_by_key(env: &Env, key: &BytesN<32>) -> Option<u64> {
    storage::get_target_bid(env, key)
}

/// Stores a new bid, queues it, and indexes it by bidder and optionally by key.
pub fn insert(env: &Env, bid: &Bid, index_key: bool) {
    storage::save_bid(env, bid);

    let mut queue = storage::get_queue(env);
    let entry = entry_of(bid);
    let index = ranking::insertion_index(&queue, &entry);
    queue.insert(index, entry);
    storage::set_queue(env, &queue);

    storage::add_bid_to_bidder(env, &bid.bidder, bid.id);
    if index_key {
        storage::set_target_bid(env, &bid.key, bid.id);
    }
}

/// Persists a changed amount and moves the bid to its new queue position.
pub fn reposition(env: &Env, bid: &Bid) {
    storage::save_bid(env, bid);

    let mut queue = storage::get_queue(env);
    if let Some(index) = ranking::position_of(&queue, bid.id) {
        queue.remove(index);
    }
    let entry = entry_of(bid);
    let index = ranking::insertion_index(&queue, &entry);
    queue.insert(index, entry);
    storage::set_queue(env, &queue);
}

pub fn remove(env: &Env, bid: &Bid) {
    storage::remove_bid(env, bid.id);

    let mut queue = storage::get_queue(env);
    if let Some(index) = ranking::position_of(&queue, bid.id) {
        queue.remove(index);
    }
    storage::set_queue(env, &queue);

    storage::remove_bid_from_bidder(env, &bid.bidder, bid.id);
    if storage::get_target_bid(env, &bid.key) == Some(bid.id) {
        storage::remove_target_bid(env, &bid.key);
    }
}
