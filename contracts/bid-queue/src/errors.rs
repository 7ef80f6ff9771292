use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Lifecycle
    NotInitialized = 1,
    AlreadyInitialized = 2,
    InvalidConfig = 3,
    MinterNotSet = 4,

    // Bid validation
    BidBelowMinimum = 10,
    BidNotFivePercentHigher = 11,
    InvalidAmount = 12,
    InvalidSignature = 13,
    ExpiredSignature = 14,
    BidNotFound = 15,
    NotBidOwner = 16,
    HighestBidNotRevocable = 17,
    ArithmeticOverflow = 18,

    // Mint timing
    NotYetCallable = 20,
    LimitExceeded = 21,
    NoActiveBids = 22,

    // Authorization
    Unauthorized = 30,
    LastAdmin = 31,
    NothingToWithdraw = 32,
}
