//! Authority signature checks for bid admission.
//!
//! Every authorization is a keccak-256 digest over a typed message prefixed by
//! a domain separator that binds the contract name and version, the network id
//! and this contract's address, so a signature issued for one deployment is
//! worthless on any other.

use crate::errors::Error;
use crate::storage;
use crate::types::{AuctionConfig, AuthoritySignature, Bid, SignatureMode};
use soroban_sdk::{crypto::Hash, xdr::ToXdr, Address, Bytes, BytesN, Env, String};

const DOMAIN_TYPE: &[u8] =
    b"BidQueueDomain(string name,string version,bytes32 network,address verifyingContract)";
const BID_TYPE: &[u8] =
    b"AddBid(bytes32 nonce,address account,string target,string tokenUri,int128 price)";
const ACTION_TYPE: &[u8] = b"UpdateRevoke(bytes32 nonce,uint64 bidId)";
const CONTENT_TYPE: &[u8] = b"BidContent(string target,string tokenUri)";

/// Order `n` of the secp256k1 group, big-endian.
pub const CURVE_ORDER: [u8; 32] = [
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe,
    0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36, 0x41, 0x41,
];

/// `n / 2`, the largest `s` the host accepts.
const HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Screens `r || s` so the host is never handed a signature it would trap on:
/// both scalars non-zero, `r < n` and `s` in the lower half of the order.
pub fn is_canonical(signature: &BytesN<64>) -> bool {
    let bytes = signature.to_array();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    r != [0u8; 32] && s != [0u8; 32] && r < CURVE_ORDER && s <= HALF_ORDER
}

/// Recovers the public key that produced a signature over `digest`.
pub trait SignatureVerifier {
    fn recover(&self, env: &Env, digest: &Hash<32>, signature: &AuthoritySignature) -> BytesN<65>;
}

pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn recover(&self, env: &Env, digest: &Hash<32>, signature: &AuthoritySignature) -> BytesN<65> {
        env.crypto()
            .secp256k1_recover(digest, &signature.signature, signature.recovery_id)
    }
}

/// A nonce that passed validation but has not been burned yet.
///
/// Callers consume it only once every other admission check has passed.
#[must_use]
pub struct PendingNonce(Option<BytesN<32>>);

impl PendingNonce {
    pub fn consume(self, env: &Env) {
        if let Some(nonce) = self.0 {
            storage::mark_nonce_used(env, &nonce);
        }
    }
}

pub struct SignatureValidator<'a, V: SignatureVerifier> {
    env: &'a Env,
    config: &'a AuctionConfig,
    verifier: V,
}

impl<'a, V: SignatureVerifier> SignatureValidator<'a, V> {
    pub fn new(env: &'a Env, config: &'a AuctionConfig, verifier: V) -> Self {
        Self {
            env,
            config,
            verifier,
        }
    }

    /// Authorizes a new submission of `price` for `(target, token_uri)`.
    pub fn check_bid(
        &self,
        nonce: &BytesN<32>,
        account: &Address,
        target: &String,
        token_uri: &String,
        price: i128,
        signature: &AuthoritySignature,
    ) -> Result<PendingNonce, Error> {
        match self.config.signature_mode {
            SignatureMode::NonceBound => {
                let digest = bid_digest(self.env, self.config, nonce, account, target, token_uri, price);
                self.check_single_use(nonce, &digest, signature)
            }
            SignatureMode::ContentBound => {
                let digest = content_digest(self.env, self.config, target, token_uri);
                self.check_authority(&digest, signature)?;
                Ok(PendingNonce(None))
            }
        }
    }

    /// Authorizes an update or cancellation of an existing bid.
    pub fn check_action(
        &self,
        nonce: &BytesN<32>,
        bid: &Bid,
        signature: &AuthoritySignature,
    ) -> Result<PendingNonce, Error> {
        match self.config.signature_mode {
            SignatureMode::NonceBound => {
                let digest = action_digest(self.env, self.config, nonce, bid.id);
                self.check_single_use(nonce, &digest, signature)
            }
            SignatureMode::ContentBound => {
                let digest = content_digest(self.env, self.config, &bid.target, &bid.token_uri);
                self.check_authority(&digest, signature)?;
                Ok(PendingNonce(None))
            }
        }
    }

    fn check_single_use(
        &self,
        nonce: &BytesN<32>,
        digest: &Hash<32>,
        signature: &AuthoritySignature,
    ) -> Result<PendingNonce, Error> {
        if storage::is_nonce_used(self.env, nonce) {
            return Err(Error::ExpiredSignature);
        }
        self.check_authority(digest, signature)?;
        Ok(PendingNonce(Some(nonce.clone())))
    }

    fn check_authority(&self, digest: &Hash<32>, signature: &AuthoritySignature) -> Result<(), Error> {
        if signature.recovery_id > 3 || !is_canonical(&signature.signature) {
            return Err(Error::InvalidSignature);
        }
        let signer = self.verifier.recover(self.env, digest, signature);
        if signer != self.config.authority {
            return Err(Error::InvalidSignature);
        }
        Ok(())
    }
}

fn keccak(env: &Env, bytes: &Bytes) -> BytesN<32> {
    env.crypto().keccak256(bytes).to_bytes()
}

fn hash_str(env: &Env, value: &String) -> BytesN<32> {
    keccak(env, &value.clone().to_xdr(env))
}

fn type_hash(env: &Env, signature: &[u8]) -> BytesN<32> {
    keccak(env, &Bytes::from_slice(env, signature))
}

pub fn domain_separator(env: &Env, config: &AuctionConfig) -> BytesN<32> {
    let mut buf = Bytes::new(env);
    buf.append(&type_hash(env, DOMAIN_TYPE).into());
    buf.append(&hash_str(env, &config.name).into());
    buf.append(&hash_str(env, &config.version).into());
    buf.append(&env.ledger().network_id().into());
    buf.append(&env.current_contract_address().to_xdr(env));
    keccak(env, &buf)
}

fn typed_digest(env: &Env, config: &AuctionConfig, struct_hash: BytesN<32>) -> Hash<32> {
    let mut buf = Bytes::from_array(env, &[0x19, 0x01]);
    buf.append(&domain_separator(env, config).into());
    buf.append(&struct_hash.into());
    env.crypto().keccak256(&buf)
}

pub fn bid_digest(
    env: &Env,
    config: &AuctionConfig,
    nonce: &BytesN<32>,
    account: &Address,
    target: &String,
    token_uri: &String,
    price: i128,
) -> Hash<32> {
    let mut buf = Bytes::new(env);
    buf.append(&type_hash(env, BID_TYPE).into());
    buf.append(&nonce.clone().into());
    buf.append(&account.clone().to_xdr(env));
    buf.append(&hash_str(env, target).into());
    buf.append(&hash_str(env, token_uri).into());
    buf.extend_from_array(&price.to_be_bytes());
    typed_digest(env, config, keccak(env, &buf))
}

pub fn action_digest(env: &Env, config: &AuctionConfig, nonce: &BytesN<32>, bid_id: u64) -> Hash<32> {
    let mut buf = Bytes::new(env);
    buf.append(&type_hash(env, ACTION_TYPE).into());
    buf.append(&nonce.clone().into());
    buf.extend_from_array(&bid_id.to_be_bytes());
    typed_digest(env, config, keccak(env, &buf))
}

pub fn content_digest(env: &Env, config: &AuctionConfig, target: &String, token_uri: &String) -> Hash<32> {
    let mut buf = Bytes::new(env);
    buf.append(&type_hash(env, CONTENT_TYPE).into());
    buf.append(&hash_str(env, target).into());
    buf.append(&hash_str(env, token_uri).into());
    typed_digest(env, config, keccak(env, &buf))
}

/// Deterministic identity of a `(bidder, target, token_uri)` submission.
pub fn bid_key(env: &Env, bidder: &Address, target: &String, token_uri: &String) -> BytesN<32> {
    let mut buf = bidder.clone().to_xdr(env);
    buf.append(&hash_str(env, target).into());
    buf.append(&hash_str(env, token_uri).into());
    keccak(env, &buf)
}
