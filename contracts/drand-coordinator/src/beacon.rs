use cosmwasm_std::{Addr, Uint256};
use drand_verify::Pubkey;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// drand quicknet public key (G2, 96 bytes), scheme bls-unchained-g1-rfc9380.
pub const QUICKNET_PK_HEX: &str = "83cf0f2896adee7eb8b5f01fcad3912212c437e0073e911fb90022d3e760183c8c4b450b6a0a6c3ac6a5776a2d1064510d1fec758c921cc22b0e17e63aaf4bcb5ed66304de9cf809bd274ca73bab4af5a6e9c76a4bc09e76eae8991ef5ece45a";

#[derive(Error, Debug, PartialEq)]
pub enum BeaconError {
    #[error("invalid pubkey length (expected 96 bytes)")]
    InvalidPubkeyLength,

    #[error("invalid pubkey (failed to parse G2 point)")]
    InvalidPubkey,

    #[error("verification failed: {0}")]
    VerificationFailed(String),

    #[error("invalid BLS signature")]
    InvalidSignature,
}

/// BLS-verify an unchained quicknet beacon and return `sha256(signature)`.
pub fn verify_quicknet_beacon(
    pubkey_bytes: &[u8],
    round: u64,
    signature: &[u8],
) -> Result<[u8; 32], BeaconError> {
    let pk_fixed: [u8; 96] = pubkey_bytes
        .try_into()
        .map_err(|_| BeaconError::InvalidPubkeyLength)?;
    let pk = drand_verify::G2PubkeyRfc::from_fixed(pk_fixed)
        .map_err(|_| BeaconError::InvalidPubkey)?;

    // Unchained scheme: no previous signature
    let is_valid = pk
        .verify(round, &[], signature)
        .map_err(|e| BeaconError::VerificationFailed(format!("{:?}", e)))?;
    if !is_valid {
        return Err(BeaconError::InvalidSignature);
    }

    Ok(Sha256::digest(signature).into())
}

/// Unix time at which `round` is published. Round 1 is emitted at genesis.
pub fn round_publish_time(genesis_time: u64, period_seconds: u64, round: u64) -> u64 {
    genesis_time.saturating_add(round.saturating_sub(1).saturating_mul(period_seconds))
}

/// First round published strictly after `timestamp`. A request made at
/// `timestamp` may only ever be answered with this round.
pub fn next_round_after(genesis_time: u64, period_seconds: u64, timestamp: u64) -> u64 {
    if timestamp < genesis_time {
        return 1;
    }
    let elapsed_rounds = (timestamp - genesis_time) / period_seconds.max(1);
    elapsed_rounds.saturating_add(2)
}

/// Expand one beacon into `num_words` words bound to a single request:
/// `word_i = sha256(randomness || requester || request_id_be || i_be)`.
pub fn derive_random_words(
    randomness: &[u8],
    requester: &Addr,
    request_id: u64,
    num_words: u32,
) -> Vec<Uint256> {
    (0..num_words)
        .map(|i| {
            let mut hasher = Sha256::new();
            hasher.update(randomness);
            hasher.update(requester.as_bytes());
            hasher.update(request_id.to_be_bytes());
            hasher.update(i.to_be_bytes());
            Uint256::from_be_bytes(hasher.finalize().into())
        })
        .collect()
}
