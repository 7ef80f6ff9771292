use soroban_sdk::{contractclient, Address, Env, String};

/// The external contract that issues the token won by a bid.
#[contractclient(name = "MintingAuthorityClient")]
pub trait MintingAuthority {
    fn mint(env: Env, to: Address, token_uri: String) -> u64;
}
