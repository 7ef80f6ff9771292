#![no_std]

mod access;
mod clock;
mod errors;
mod events;
mod minter;
mod ranking;
mod signature;
mod storage;
mod store;
mod types;

use soroban_sdk::{contract, contractimpl, log, token, Address, BytesN, Env, String, Vec};

use events::{
    CancelBid, CreateBid, EvictBid, Initialized, MinterChanged, Minted, RoleGranted, RoleRevoked,
    UpdateBid, Withdrawn,
};
use signature::{PendingNonce, Secp256k1Verifier, SignatureValidator};

pub use clock::DAY_IN_SECONDS;
pub use errors::Error;
pub use minter::{MintingAuthority, MintingAuthorityClient};
pub use types::{
    AuctionConfig, AuctionState, AuthoritySignature, Bid, EvictionPolicy, Escrow, IdStrategy,
    MintPhase, Role, SignatureMode,
};

/// Sealed-bid auction queue that mints to the highest bidder once per cooldown.
///
/// Bids are admitted only with a signature from the configured authority, must
/// clear the minimum and beat the leader by 5%, and are escrowed in the
/// configured token until they win, are cancelled, or are evicted.
#[contract]
pub struct BidQueueContract;

#[contractimpl]
impl BidQueueContract {
    pub fn initialize(env: Env, admin: Address, config: AuctionConfig) -> Result<(), Error> {
        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        if config.minimum_bid <= 0 || config.mint_limit == 0 || config.name.len() == 0 {
            return Err(Error::InvalidConfig);
        }

        storage::set_config(&env, &config);
        storage::set_state(
            &env,
            &AuctionState {
                last_mint_at: env.ledger().timestamp(),
                mint_count: 0,
                mint_limit: config.mint_limit,
            },
        );
        storage::set_escrow(
            &env,
            &Escrow {
                escrowed: 0,
                proceeds: 0,
                withdrawn: 0,
            },
        );
        access::grant(&env, Role::DefaultAdmin, &admin);
        storage::set_initialized(&env);
        storage::extend_instance_ttl(&env);

        Initialized {
            admin,
            token: config.token,
            minimum_bid: config.minimum_bid,
            mint_limit: config.mint_limit,
        }
        .publish(&env);

        Ok(())
    }

    // ========== BIDDING ==========

    /// Places a bid of `amount` for `(target, token_uri)` and returns its id.
    ///
    /// Under `IdStrategy::TargetHash` a bidder that already holds a bid for the
    /// same target raises that bid instead and gets its id back.
    pub fn submit_bid(
        env: Env,
        bidder: Address,
        nonce: BytesN<32>,
        target: String,
        token_uri: String,
        amount: i128,
        signature: AuthoritySignature,
    ) -> Result<u64, Error> {
        bidder.require_auth();
        let config = load_config(&env)?;

        let validator = SignatureValidator::new(&env, &config, Secp256k1Verifier);
        let pending =
            validator.check_bid(&nonce, &bidder, &target, &token_uri, amount, &signature)?;

        let key = signature::bid_key(&env, &bidder, &target, &token_uri);
        if config.id_strategy == IdStrategy::TargetHash {
            if let Some(existing) = store::find_by_key(&env, &key) {
                let bid = store::get(&env, existing).ok_or(Error::BidNotFound)?;
                raise_bid(&env, &config, bid, amount, pending)?;
                return Ok(existing);
            }
        }

        let highest = store::highest(&env);
        ranking::check_admission(config.minimum_bid, highest.as_ref().map(|b| b.amount), amount)?;

        if let Some(outbid) = ranking::eviction_target(config.eviction, highest.as_ref(), None) {
            evict(&env, &config, &outbid)?;
        }
        pending.consume(&env);
        escrow_in(&env, &config, &bidder, amount)?;

        let now = env.ledger().timestamp();
        let bid = Bid {
            id: storage::increment_bid_counter(&env),
            key,
            bidder: bidder.clone(),
            amount,
            target: target.clone(),
            token_uri,
            created_at: now,
            updated_at: now,
            seq: storage::increment_arrival_seq(&env),
        };
        store::insert(&env, &bid, config.id_strategy == IdStrategy::TargetHash);
        storage::extend_instance_ttl(&env);

        log!(&env, "bid created", bid.id, amount);
        CreateBid {
            bid_id: bid.id,
            bidder,
            amount,
            target,
        }
        .publish(&env);

        Ok(bid.id)
    }

    /// Adds `amount` on top of an existing bid owned by `bidder`.
    pub fn update_bid(
        env: Env,
        bidder: Address,
        nonce: BytesN<32>,
        bid_id: u64,
        amount: i128,
        signature: AuthoritySignature,
    ) -> Result<(), Error> {
        bidder.require_auth();
        let config = load_config(&env)?;

        let bid = owned_bid(&env, &bidder, bid_id)?;
        let validator = SignatureValidator::new(&env, &config, Secp256k1Verifier);
        let pending = validator.check_action(&nonce, &bid, &signature)?;

        raise_bid(&env, &config, bid, amount, pending)
    }

    /// Withdraws a queued bid and refunds it in full. The leading bid cannot be
    /// cancelled.
    pub fn cancel_bid(
        env: Env,
        bidder: Address,
        nonce: BytesN<32>,
        bid_id: u64,
        signature: AuthoritySignature,
    ) -> Result<(), Error> {
        bidder.require_auth();
        let config = load_config(&env)?;

        let bid = owned_bid(&env, &bidder, bid_id)?;
        let validator = SignatureValidator::new(&env, &config, Secp256k1Verifier);
        let pending = validator.check_action(&nonce, &bid, &signature)?;
        ranking::check_cancel(store::highest_id(&env), bid.id)?;

        refund(&env, &config, &bid)?;
        pending.consume(&env);
        storage::extend_instance_ttl(&env);

        log!(&env, "bid cancelled", bid.id, bid.amount);
        CancelBid {
            bid_id: bid.id,
            bidder,
            refunded: bid.amount,
        }
        .publish(&env);

        Ok(())
    }

    // ========== MINTING ==========

    /// Mints to the highest bidder once the cooldown has elapsed and returns
    /// the token id issued by the minting authority.
    pub fn mint(env: Env) -> Result<u64, Error> {
        let config = load_config(&env)?;
        let mut state = load_state(&env)?;
        let now = env.ledger().timestamp();

        clock::ensure_mintable(&state, config.cooldown, now)?;
        let minter = storage::get_minter(&env).ok_or(Error::MinterNotSet)?;
        let winner = store::highest(&env).ok_or(Error::NoActiveBids)?;

        store::remove(&env, &winner);
        let mut escrow = storage::get_escrow(&env);
        escrow.escrowed = escrow
            .escrowed
            .checked_sub(winner.amount)
            .ok_or(Error::ArithmeticOverflow)?;
        escrow.proceeds = escrow
            .proceeds
            .checked_add(winner.amount)
            .ok_or(Error::ArithmeticOverflow)?;
        storage::set_escrow(&env, &escrow);

        clock::record_mint(&mut state, now);
        storage::set_state(&env, &state);

        let token_id =
            MintingAuthorityClient::new(&env, &minter).mint(&winner.bidder, &winner.token_uri);
        storage::extend_instance_ttl(&env);

        log!(&env, "minted", winner.id, token_id, state.mint_count);
        Minted {
            bid_id: winner.id,
            bidder: winner.bidder,
            token_id,
            amount: winner.amount,
        }
        .publish(&env);

        Ok(token_id)
    }

    // ========== ADMINISTRATION ==========

    /// Pays out all proceeds of won bids to `to`. Escrow of active bids is
    /// never touched.
    pub fn withdraw(env: Env, admin: Address, to: Address) -> Result<i128, Error> {
        let config = load_config(&env)?;
        access::require_role(&env, Role::DefaultAdmin, &admin)?;

        let mut escrow = storage::get_escrow(&env);
        let amount = escrow.proceeds;
        if amount <= 0 {
            return Err(Error::NothingToWithdraw);
        }

        escrow.proceeds = 0;
        escrow.withdrawn = escrow
            .withdrawn
            .checked_add(amount)
            .ok_or(Error::ArithmeticOverflow)?;
        storage::set_escrow(&env, &escrow);

        token::TokenClient::new(&env, &config.token).transfer(
            &env.current_contract_address(),
            &to,
            &amount,
        );

        log!(&env, "proceeds withdrawn", amount);
        Withdrawn { to, amount }.publish(&env);

        Ok(amount)
    }

    pub fn set_minter(env: Env, admin: Address, minter: Address) -> Result<(), Error> {
        load_config(&env)?;
        access::require_role(&env, Role::DefaultAdmin, &admin)?;

        storage::set_minter(&env, &minter);
        storage::extend_instance_ttl(&env);

        MinterChanged { admin, minter }.publish(&env);
        Ok(())
    }

    pub fn grant_role(env: Env, admin: Address, role: Role, account: Address) -> Result<(), Error> {
        load_config(&env)?;
        access::require_role(&env, Role::DefaultAdmin, &admin)?;

        if access::grant(&env, role, &account) {
            RoleGranted {
                role,
                account,
                sender: admin,
            }
            .publish(&env);
        }
        Ok(())
    }

    pub fn revoke_role(env: Env, admin: Address, role: Role, account: Address) -> Result<(), Error> {
        load_config(&env)?;
        access::require_role(&env, Role::DefaultAdmin, &admin)?;

        if access::revoke(&env, role, &account)? {
            RoleRevoked {
                role,
                account,
                sender: admin,
            }
            .publish(&env);
        }
        Ok(())
    }

    // ========== QUERIES ==========

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        access::has_role(&env, role, &account)
    }

    /// Leading bidder and amount; `(None, 0)` when no bid is active.
    pub fn get_highest_bid(env: Env) -> (Option<Address>, i128) {
        match store::highest(&env) {
            Some(bid) => (Some(bid.bidder), bid.amount),
            None => (None, 0),
        }
    }

    pub fn get_highest_bid_id(env: Env) -> Option<u64> {
        store::highest_id(&env)
    }

    pub fn get_bid(env: Env, bid_id: u64) -> Result<Bid, Error> {
        store::get(&env, bid_id).ok_or(Error::BidNotFound)
    }

    pub fn get_queue_size(env: Env) -> u32 {
        store::size(&env)
    }

    /// Active bid ids, highest first.
    pub fn get_queue(env: Env) -> Vec<u64> {
        store::ids(&env)
    }

    pub fn get_bid_list(env: Env, bidder: Address) -> Vec<u64> {
        storage::get_bidder_bids(&env, &bidder)
    }

    /// Id of the bid keyed by `(bidder, target, token_uri)` under the
    /// target-keyed strategy.
    pub fn find_bid(env: Env, bidder: Address, target: String, token_uri: String) -> Option<u64> {
        let key = signature::bid_key(&env, &bidder, &target, &token_uri);
        store::find_by_key(&env, &key)
    }

    pub fn get_config(env: Env) -> Result<AuctionConfig, Error> {
        load_config(&env)
    }

    pub fn get_state(env: Env) -> Result<AuctionState, Error> {
        load_state(&env)
    }

    pub fn get_phase(env: Env) -> Result<MintPhase, Error> {
        let config = load_config(&env)?;
        let state = load_state(&env)?;
        Ok(clock::phase(&state, config.cooldown, env.ledger().timestamp()))
    }

    pub fn get_escrow(env: Env) -> Escrow {
        storage::get_escrow(&env)
    }

    pub fn get_minter(env: Env) -> Option<Address> {
        storage::get_minter(&env)
    }

    pub fn is_nonce_used(env: Env, nonce: BytesN<32>) -> bool {
        storage::is_nonce_used(&env, &nonce)
    }

    // ========== SIGNING HELPERS ==========

    /// Digest the authority signs to allow `submit_bid` in nonce-bound mode.
    pub fn bid_digest(
        env: Env,
        nonce: BytesN<32>,
        account: Address,
        target: String,
        token_uri: String,
        price: i128,
    ) -> Result<BytesN<32>, Error> {
        let config = load_config(&env)?;
        Ok(
            signature::bid_digest(&env, &config, &nonce, &account, &target, &token_uri, price)
                .to_bytes(),
        )
    }

    /// Digest the authority signs to allow `update_bid` or `cancel_bid` in
    /// nonce-bound mode.
    pub fn action_digest(env: Env, nonce: BytesN<32>, bid_id: u64) -> Result<BytesN<32>, Error> {
        let config = load_config(&env)?;
        Ok(signature::action_digest(&env, &config, &nonce, bid_id).to_bytes())
    }

    /// Digest the authority signs in content-bound mode.
    pub fn content_digest(env: Env, target: String, token_uri: String) -> Result<BytesN<32>, Error> {
        let config = load_config(&env)?;
        Ok(signature::content_digest(&env, &config, &target, &token_uri).to_bytes())
    }
}

fn load_config(env: &Env) -> Result<AuctionConfig, Error> {
    storage::get_config(env).ok_or(Error::NotInitialized)
}

fn load_state(env: &Env) -> Result<AuctionState, Error> {
    storage::get_state(env).ok_or(Error::NotInitialized)
}

fn owned_bid(env: &Env, bidder: &Address, bid_id: u64) -> Result<Bid, Error> {
    let bid = store::get(env, bid_id).ok_or(Error::BidNotFound)?;
    if bid.bidder != *bidder {
        return Err(Error::NotBidOwner);
    }
    Ok(bid)
}

fn raise_bid(
    env: &Env,
    config: &AuctionConfig,
    mut bid: Bid,
    added: i128,
    pending: PendingNonce,
) -> Result<(), Error> {
    let highest = store::highest(env);
    let total = ranking::check_update(highest.as_ref().map(|b| b.amount), bid.amount, added)?;

    if let Some(outbid) = ranking::eviction_target(config.eviction, highest.as_ref(), Some(bid.id)) {
        evict(env, config, &outbid)?;
    }
    pending.consume(env);
    escrow_in(env, config, &bid.bidder, added)?;

    bid.amount = total;
    bid.updated_at = env.ledger().timestamp();
    bid.seq = storage::increment_arrival_seq(env);
    store::reposition(env, &bid);
    storage::extend_instance_ttl(env);

    log!(env, "bid raised", bid.id, total);
    UpdateBid {
        bid_id: bid.id,
        bidder: bid.bidder,
        total,
        added,
    }
    .publish(env);

    Ok(())
}

fn evict(env: &Env, config: &AuctionConfig, bid: &Bid) -> Result<(), Error> {
    refund(env, config, bid)?;

    log!(env, "bid evicted", bid.id, bid.amount);
    EvictBid {
        bid_id: bid.id,
        bidder: bid.bidder.clone(),
        refunded: bid.amount,
    }
    .publish(env);

    Ok(())
}

fn escrow_in(env: &Env, config: &AuctionConfig, bidder: &Address, amount: i128) -> Result<(), Error> {
    let token_client = token::TokenClient::new(env, &config.token);
    token_client.transfer(bidder, &env.current_contract_address(), &amount);

    let mut escrow = storage::get_escrow(env);
    escrow.escrowed = escrow
        .escrowed
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    storage::set_escrow(env, &escrow);
    Ok(())
}

/// Returns a bid's full escrow to its owner, then drops it from the store.
fn refund(env: &Env, config: &AuctionConfig, bid: &Bid) -> Result<(), Error> {
    let token_client = token::TokenClient::new(env, &config.token);
    token_client.transfer(&env.current_contract_address(), &bid.bidder, &bid.amount);

    let mut escrow = storage::get_escrow(env);
    escrow.escrowed = escrow
        .escrowed
        .checked_sub(bid.amount)
        .ok_or(Error::ArithmeticOverflow)?;
    storage::set_escrow(env, &escrow);

    store::remove(env, bid);
    Ok(())
}

#[cfg(test)]
mod test;
