use crate::types::Role;
use soroban_sdk::{contractevent, Address, String};

/// Event emitted when the contract is initialized
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Initialized {
    #[topic]
    pub admin: Address,
    pub token: Address,
    pub minimum_bid: i128,
    pub mint_limit: u32,
}

/// Event emitted when a new bid enters the queue
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateBid {
    #[topic]
    pub bid_id: u64,
    #[topic]
    pub bidder: Address,
    pub amount: i128,
    pub target: String,
}

/// Event emitted when a bid is raised
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdateBid {
    #[topic]
    pub bid_id: u64,
    #[topic]
    pub bidder: Address,
    pub total: i128,
    pub added: i128,
}

/// Event emitted when the owner withdraws a bid
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CancelBid {
    #[topic]
    pub bid_id: u64,
    #[topic]
    pub bidder: Address,
    pub refunded: i128,
}

/// Event emitted when an outbid leader is removed and refunded
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EvictBid {
    #[topic]
    pub bid_id: u64,
    #[topic]
    pub bidder: Address,
    pub refunded: i128,
}

/// Event emitted when the winning bid is minted
#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Minted {
    #[topic]
    pub bid_id: u64,
    #[topic]
    pub bidder: Address,
    pub token_id: u64,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    #[topic]
    pub to: Address,
    pub amount: i128,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MinterChanged {
    #[topic]
    pub admin: Address,
    pub minter: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleGranted {
    #[topic]
    pub role: Role,
    #[topic]
    pub account: Address,
    pub sender: Address,
}

#[contractevent]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleRevoked {
    #[topic]
    pub role: Role,
    #[topic]
    pub account: Address,
    pub sender: Address,
}
