use crate::types::{AuctionConfig, AuctionState, Bid, DataKey, Escrow, QueueEntry, Role};
use soroban_sdk::{Address, BytesN, Env, Vec};

// TTL constants
pub const DAY_IN_LEDGERS: u32 = 17280;
pub const PERSISTENT_TTL_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
const PERSISTENT_TTL_THRESHOLD: u32 = PERSISTENT_TTL_AMOUNT - DAY_IN_LEDGERS;
const INSTANCE_TTL_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_AMOUNT - DAY_IN_LEDGERS;

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_AMOUNT);
}

fn bump(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_AMOUNT);
}

// ========== Initialization ==========

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Initialized)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&DataKey::Initialized, &true);
}

// ========== Config / State ==========

pub fn get_config(env: &Env) -> Option<AuctionConfig> {
    env.storage().instance().get(&DataKey::Config)
}

pub fn set_config(env: &Env, config: &AuctionConfig) {
    env.storage().instance().set(&DataKey::Config, config);
}

pub fn get_state(env: &Env) -> Option<AuctionState> {
    env.storage().instance().get(&DataKey::State)
}

pub fn set_state(env: &Env, state: &AuctionState) {
    env.storage().instance().set(&DataKey::State, state);
}

pub fn get_escrow(env: &Env) -> Escrow {
    env.storage()
        .instance()
        .get(&DataKey::Escrow)
        .unwrap_or(Escrow {
            escrowed: 0,
            proceeds: 0,
            withdrawn: 0,
        })
}

pub fn set_escrow(env: &Env, escrow: &Escrow) {
    env.storage().instance().set(&DataKey::Escrow, escrow);
}

// ========== Minting authority ==========

pub fn get_minter(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Minter)
}

pub fn set_minter(env: &Env, minter: &Address) {
    env.storage().instance().set(&DataKey::Minter, minter);
}

// ========== Roles ==========

pub fn has_role(env: &Env, role: Role, account: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Role(role, account.clone()))
}

pub fn set_role(env: &Env, role: Role, account: &Address) {
    let key = DataKey::Role(role, account.clone());
    env.storage().persistent().set(&key, &true);
    bump(env, &key);
}

pub fn remove_role(env: &Env, role: Role, account: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Role(role, account.clone()));
}

pub fn get_admin_count(env: &Env) -> u32 {
    env.storage()
        .instance()
        .get(&DataKey::AdminCount)
        .unwrap_or(0)
}

pub fn set_admin_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::AdminCount, &count);
}

// ========== Counters ==========

pub fn increment_bid_counter(env: &Env) -> u64 {
    let counter: u64 = env
        .storage()
        .instance()
        .get(&DataKey::BidCounter)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&DataKey::BidCounter, &counter);
    counter
}

pub fn increment_arrival_seq(env: &Env) -> u64 {
    let seq: u64 = env
        .storage()
        .instance()
        .get(&DataKey::ArrivalSeq)
        .unwrap_or(0)
        + 1;
    env.storage().instance().set(&DataKey::ArrivalSeq, &seq);
    seq
}

// ========== Bids ==========

pub fn get_bid(env: &Env, bid_id: u64) -> Option<Bid> {
    let key = DataKey::Bid(bid_id);
    let bid = env.storage().persistent().get::<_, Bid>(&key);
    if bid.is_some() {
        bump(env, &key);
    }
    bid
}

pub fn save_bid(env: &Env, bid: &Bid) {
    let key = DataKey::Bid(bid.id);
    env.storage().persistent().set(&key, bid);
    bump(env, &key);
}

pub fn remove_bid(env: &Env, bid_id: u64) {
    env.storage().persistent().remove(&DataKey::Bid(bid_id));
}

pub fn get_queue(env: &Env) -> Vec<QueueEntry> {
    let key = DataKey::Queue;
    let queue = env
        .storage()
        .persistent()
        .get::<_, Vec<QueueEntry>>(&key)
        .unwrap_or(Vec::new(env));
    if !queue.is_empty() {
        bump(env, &key);
    }
    queue
}

pub fn set_queue(env: &Env, queue: &Vec<QueueEntry>) {
    let key = DataKey::Queue;
    env.storage().persistent().set(&key, queue);
    bump(env, &key);
}

// ========== Bidder index ==========

pub fn get_bidder_bids(env: &Env, bidder: &Address) -> Vec<u64> {
    let key = DataKey::BidderBids(bidder.clone());
    match env.storage().persistent().get::<_, Vec<u64>>(&key) {
        Some(bids) => {
            bump(env, &key);
            bids
        }
        None => Vec::new(env),
    }
}

pub fn add_bid_to_bidder(env: &Env, bidder: &Address, bid_id: u64) {
    let key = DataKey::BidderBids(bidder.clone());
    let mut bids = get_bidder_bids(env, bidder);
    bids.push_back(bid_id);
    env.storage().persistent().set(&key, &bids);
    bump(env, &key);
}

pub fn remove_bid_from_bidder(env: &Env, bidder: &Address, bid_id: u64) {
    let key = DataKey::BidderBids(bidder.clone());
    let bids = get_bidder_bids(env, bidder);
    let mut remaining = Vec::new(env);
    for id in bids.iter() {
        if id != bid_id {
            remaining.push_back(id);
        }
    }
    if remaining.is_empty() {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &remaining);
        bump(env, &key);
    }
}

// ========== Target key index ==========

pub fn get_target_bid(env: &Env, key: &BytesN<32>) -> Option<u64> {
    let key = DataKey::TargetKey(key.clone());
    let bid_id = env.storage().persistent().get::<_, u64>(&key);
    if bid_id.is_some() {
        bump(env, &key);
    }
    bid_id
}

pub fn set_target_bid(env: &Env, key: &BytesN<32>, bid_id: u64) {
    let key = DataKey::TargetKey(key.clone());
    env.storage().persistent().set(&key, &bid_id);
    bump(env, &key);
}

pub fn remove_target_bid(env: &Env, key: &BytesN<32>) {
    env.storage()
        .persistent()
        .remove(&DataKey::TargetKey(key.clone()));
}

// ========== Nonces ==========

pub fn is_nonce_used(env: &Env, nonce: &BytesN<32>) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Nonce(nonce.clone()))
}

pub fn mark_nonce_used(env: &Env, nonce: &BytesN<32>) {
    let key = DataKey::Nonce(nonce.clone());
    env.storage().persistent().set(&key, &true);
    bump(env, &key);
}
