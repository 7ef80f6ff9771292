use soroban_sdk::{contracttype, Address, BytesN, String};

/// How bid identities are derived from a submission.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum IdStrategy {
    /// Every submission gets a fresh id from the counter.
    Counter = 0,
    /// Submissions are keyed by `(bidder, target, token_uri)`; bidding again
    /// on the same key raises the existing bid.
    TargetHash = 1,
}

/// What happens to the leading bid when a higher one is admitted.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum EvictionPolicy {
    /// The outbid leader is removed and refunded immediately.
    EvictOnOutbid = 0,
    /// The outbid leader stays queued and may win a later mint.
    Retain = 1,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum SignatureMode {
    /// Signatures carry a nonce that is burned on first use.
    NonceBound = 0,
    /// Signatures cover `(target, token_uri)` only and may be presented again.
    ContentBound = 1,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum MintPhase {
    Open = 0,
    Eligible = 1,
    Exhausted = 2,
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    DefaultAdmin = 0,
}

/// Deployment-time configuration, fixed by `initialize`.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct AuctionConfig {
    /// Signature domain name.
    pub name: String,
    /// Signature domain version.
    pub version: String,
    /// Asset bids are escrowed in.
    pub token: Address,
    /// Uncompressed secp256k1 public key of the signing authority.
    pub authority: BytesN<65>,
    pub minimum_bid: i128,
    /// Seconds that must pass between two mints.
    pub cooldown: u64,
    pub mint_limit: u32,
    pub id_strategy: IdStrategy,
    pub eviction: EvictionPolicy,
    pub signature_mode: SignatureMode,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Bid {
    pub id: u64,
    pub key: BytesN<32>,
    pub bidder: Address,
    pub amount: i128,
    pub target: String,
    pub token_uri: String,
    pub created_at: u64,
    pub updated_at: u64,
    /// Arrival order of the last amount change, used to break ties.
    pub seq: u64,
}

/// Ordering record kept in the queue so ranking never has to load bids.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct QueueEntry {
    pub bid_id: u64,
    pub amount: i128,
    pub seq: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuctionState {
    pub last_mint_at: u64,
    pub mint_count: u32,
    pub mint_limit: u32,
}

/// Custody pools sharing the contract's token balance.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Escrow {
    /// Sum of all active bid amounts.
    pub escrowed: i128,
    /// Value of won bids not yet withdrawn.
    pub proceeds: i128,
    /// Lifetime total paid out by `withdraw`.
    pub withdrawn: i128,
}

/// Authority signature: `r || s` plus the recovery id.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthoritySignature {
    pub signature: BytesN<64>,
    pub recovery_id: u32,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Config,
    State,
    Escrow,
    Minter,
    AdminCount,
    BidCounter,
    ArrivalSeq,
    Queue,
    Bid(u64),
    BidderBids(Address),
    TargetKey(BytesN<32>),
    Nonce(BytesN<32>),
    Role(Role, Address),
}
