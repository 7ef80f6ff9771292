
use crate::{
    AuctionConfig, AuthoritySignature, BidQueueContract, BidQueueContractClient, Error,
    EvictionPolicy, IdStrategy, SignatureMode, DAY_IN_SECONDS,
};
use core::fmt::Debug;
use k256::ecdsa::SigningKey;
use soroban_sdk::{
    contract, contractimpl, symbol_short,
    testutils::{Address as _, Events as _, Ledger},
    token, Address, BytesN, Env, Event, String, Val, Vec,
};

pub const MINIMUM_BID: i128 = 1_000;
pub const MINT_LIMIT: u32 = 2;
pub const STARTING_BALANCE: i128 = 10_000_000;
pub const TARGET: &str = "https://example.com/listing/1";
pub const TOKEN_URI: &str = "ipfs://bafy/metadata.json";

/// Stand-in for the external minting authority. Records who received each
/// token id.
#[contract]
pub struct MockMinter;

#[contractimpl]
impl MockMinter {
    pub fn mint(env: Env, to: Address, token_uri: String) -> u64 {
        let id: u64 = env
            .storage()
            .instance()
            .get(&symbol_short!("next"))
            .unwrap_or(0)
            + 1;
        env.storage().instance().set(&symbol_short!("next"), &id);
        env.storage().persistent().set(&id, &(to, token_uri));
        id
    }

    pub fn owner_of(env: Env, token_id: u64) -> Option<Address> {
        env.storage()
            .persistent()
            .get::<_, (Address, String)>(&token_id)
            .map(|(owner, _)| owner)
    }

    pub fn uri_of(env: Env, token_id: u64) -> Option<String> {
        env.storage()
            .persistent()
            .get::<_, (Address, String)>(&token_id)
            .map(|(_, uri)| uri)
    }
}

/// Off-chain signer holding a secp256k1 key.
pub struct Authority {
    key: SigningKey,
}

impl Authority {
    pub fn new(seed: u8) -> Self {
        Self {
            key: SigningKey::from_slice(&[seed; 32]).unwrap(),
        }
    }

    pub fn public_key(&self, env: &Env) -> BytesN<65> {
        let point = self.key.verifying_key().to_encoded_point(false);
        let mut bytes = [0u8; 65];
        bytes.copy_from_slice(point.as_bytes());
        BytesN::from_array(env, &bytes)
    }

    pub fn sign(&self, env: &Env, digest: &BytesN<32>) -> AuthoritySignature {
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest.to_array())
            .unwrap();
        let mut bytes = [0u8; 64];
        bytes.copy_from_slice(&signature.to_bytes());
        AuthoritySignature {
            signature: BytesN::from_array(env, &bytes),
            recovery_id: recovery_id.to_byte() as u32,
        }
    }
}

pub struct TestSetup {
    pub env: Env,
    pub client: BidQueueContractClient<'static>,
    pub contract: Address,
    pub admin: Address,
    pub alice: Address,
    pub bob: Address,
    pub carol: Address,
    pub token: token::TokenClient<'static>,
    pub minter: MockMinterClient<'static>,
    pub authority: Authority,
}

pub fn nonce(env: &Env, n: u32) -> BytesN<32> {
    let mut bytes = [0u8; 32];
    bytes[28..].copy_from_slice(&n.to_be_bytes());
    BytesN::from_array(env, &bytes)
}

pub fn text(env: &Env, value: &str) -> String {
    String::from_str(env, value)
}

pub fn setup_test() -> TestSetup {
    setup_with(
        IdStrategy::Counter,
        EvictionPolicy::EvictOnOutbid,
        SignatureMode::NonceBound,
    )
}

pub fn setup_with(
    id_strategy: IdStrategy,
    eviction: EvictionPolicy,
    signature_mode: SignatureMode,
) -> TestSetup {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(1_000);

    let contract = env.register(BidQueueContract, ());
    let client = BidQueueContractClient::new(&env, &contract);

    let admin = Address::generate(&env);
    let alice = Address::generate(&env);
    let bob = Address::generate(&env);
    let carol = Address::generate(&env);

    let token_admin = Address::generate(&env);
    let token_address = env
        .register_stellar_asset_contract_v2(token_admin)
        .address();
    let token = token::TokenClient::new(&env, &token_address);
    let token_admin_client = token::StellarAssetClient::new(&env, &token_address);
    for bidder in [&alice, &bob, &carol] {
        token_admin_client.mint(bidder, &STARTING_BALANCE);
    }

    let minter_address = env.register(MockMinter, ());
    let minter = MockMinterClient::new(&env, &minter_address);

    let authority = Authority::new(7);
    let config = AuctionConfig {
        name: text(&env, "BidQueue"),
        version: text(&env, "1"),
        token: token_address,
        authority: authority.public_key(&env),
        minimum_bid: MINIMUM_BID,
        cooldown: DAY_IN_SECONDS,
        mint_limit: MINT_LIMIT,
        id_strategy,
        eviction,
        signature_mode,
    };
    client.initialize(&admin, &config);
    client.set_minter(&admin, &minter_address);

    TestSetup {
        env,
        client,
        contract,
        admin,
        alice,
        bob,
        carol,
        token,
        minter,
        authority,
    }
}

/// Registers a second, uninitialized auction in the same environment.
pub fn register_auction(env: &Env) -> BidQueueContractClient<'static> {
    let contract = env.register(BidQueueContract, ());
    BidQueueContractClient::new(env, &contract)
}

/// Collapses a `try_*` result into the contract's own error.
pub fn contract_result<T, C: Debug, I: Debug>(
    result: Result<Result<T, C>, Result<Error, I>>,
) -> Result<T, Error> {
    match result {
        Ok(Ok(value)) => Ok(value),
        Err(Ok(error)) => Err(error),
        Ok(Err(conversion)) => panic!("unexpected conversion error: {:?}", conversion),
        Err(Err(invoke)) => panic!("unexpected host error: {:?}", invoke),
    }
}

pub fn advance_ledger(env: &Env, seconds: u64) {
    env.ledger().with_mut(|li| {
        li.timestamp += seconds;
    });
}

impl TestSetup {
    pub fn sign_bid(
        &self,
        n: u32,
        bidder: &Address,
        target: &str,
        amount: i128,
    ) -> AuthoritySignature {
        let digest = self.client.bid_digest(
            &nonce(&self.env, n),
            bidder,
            &text(&self.env, target),
            &text(&self.env, TOKEN_URI),
            &amount,
        );
        self.authority.sign(&self.env, &digest)
    }

    pub fn sign_action(&self, n: u32, bid_id: u64) -> AuthoritySignature {
        let digest = self.client.action_digest(&nonce(&self.env, n), &bid_id);
        self.authority.sign(&self.env, &digest)
    }

    pub fn sign_content(&self, target: &str) -> AuthoritySignature {
        let digest = self
            .client
            .content_digest(&text(&self.env, target), &text(&self.env, TOKEN_URI));
        self.authority.sign(&self.env, &digest)
    }

    /// Submits a nonce-bound bid on the default target.
    pub fn bid(&self, bidder: &Address, n: u32, amount: i128) -> u64 {
        self.bid_on(bidder, n, TARGET, amount)
    }

    pub fn bid_on(&self, bidder: &Address, n: u32, target: &str, amount: i128) -> u64 {
        let signature = self.sign_bid(n, bidder, target, amount);
        self.client.submit_bid(
            bidder,
            &nonce(&self.env, n),
            &text(&self.env, target),
            &text(&self.env, TOKEN_URI),
            &amount,
            &signature,
        )
    }

    pub fn try_bid_on(
        &self,
        bidder: &Address,
        n: u32,
        target: &str,
        amount: i128,
    ) -> Result<u64, Error> {
        let signature = self.sign_bid(n, bidder, target, amount);
        self.try_bid_signed(bidder, n, target, amount, &signature)
    }

    pub fn try_bid(&self, bidder: &Address, n: u32, amount: i128) -> Result<u64, Error> {
        self.try_bid_on(bidder, n, TARGET, amount)
    }

    pub fn try_bid_signed(
        &self,
        bidder: &Address,
        n: u32,
        target: &str,
        amount: i128,
        signature: &AuthoritySignature,
    ) -> Result<u64, Error> {
        contract_result(self.client.try_submit_bid(
            bidder,
            &nonce(&self.env, n),
            &text(&self.env, target),
            &text(&self.env, TOKEN_URI),
            &amount,
            signature,
        ))
    }

    pub fn update(&self, bidder: &Address, n: u32, bid_id: u64, amount: i128) {
        let signature = self.sign_action(n, bid_id);
        self.client
            .update_bid(bidder, &nonce(&self.env, n), &bid_id, &amount, &signature);
    }

    pub fn cancel(&self, bidder: &Address, n: u32, bid_id: u64) {
        let signature = self.sign_action(n, bid_id);
        self.client
            .cancel_bid(bidder, &nonce(&self.env, n), &bid_id, &signature);
    }

    pub fn try_update(&self, bidder: &Address, n: u32, bid_id: u64, amount: i128) -> Result<(), Error> {
        let signature = self.sign_action(n, bid_id);
        contract_result(self.client.try_update_bid(
            bidder,
            &nonce(&self.env, n),
            &bid_id,
            &amount,
            &signature,
        ))
    }

    pub fn try_cancel(&self, bidder: &Address, n: u32, bid_id: u64) -> Result<(), Error> {
        let signature = self.sign_action(n, bid_id);
        contract_result(self.client.try_cancel_bid(
            bidder,
            &nonce(&self.env, n),
            &bid_id,
            &signature,
        ))
    }

    pub fn advance_to_mint(&self) {
        advance_ledger(&self.env, DAY_IN_SECONDS);
    }

    /// The contract holds exactly the active escrow plus unwithdrawn proceeds,
    /// and the escrow equals the sum of queued bids.
    pub fn assert_solvent(&self) {
        let escrow = self.client.get_escrow();
        assert_eq!(
            self.token.balance(&self.contract),
            escrow.escrowed + escrow.proceeds
        );

        let mut queued = 0;
        for bid_id in self.client.get_queue().iter() {
            queued += self.client.get_bid(&bid_id).amount;
        }
        assert_eq!(escrow.escrowed, queued);
    }

    /// Asserts that the most recent events published by the auction are
    /// `expected`, in order. Must run before any other contract call.
    pub fn assert_last_events(&self, expected: &[&dyn Event]) {
        let mut published: Vec<(Address, Vec<Val>, Val)> = Vec::new(&self.env);
        for event in self.env.events().all().iter() {
            if event.0 == self.contract {
                published.push_back(event);
            }
        }

        let count = expected.len() as u32;
        assert!(published.len() >= count);
        let tail = published.slice(published.len() - count..);

        let mut wanted: Vec<(Address, Vec<Val>, Val)> = Vec::new(&self.env);
        for event in expected {
            wanted.push_back((
                self.contract.clone(),
                event.topics(&self.env),
                event.data(&self.env),
            ));
        }
        assert_eq!(tail, wanted);
    }
}
