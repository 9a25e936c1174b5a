use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<CoordinatorConfig> = Item::new("config");
pub const BEACONS: Map<u64, StoredBeacon> = Map::new("beacons");
pub const LATEST_ROUND: Item<u64> = Item::new("latest_round");
/// Outstanding requests keyed by (requester, request id)
pub const REQUESTS: Map<(&Addr, u64), RandomnessRequest> = Map::new("requests");
pub const FULFILLMENTS: Map<(&Addr, u64), Fulfillment> = Map::new("fulfillments");

#[cw_serde]
pub struct CoordinatorConfig {
    pub admin: Addr,
    pub operators: Vec<Addr>,
    /// Quicknet public key, 96 bytes (G2 point)
    pub quicknet_pubkey: Vec<u8>,
    pub chain_hash: String,
    /// Genesis time of the drand network (unix seconds)
    pub genesis_time: u64,
    /// Period between rounds in seconds (3 for quicknet)
    pub period_seconds: u64,
    pub min_request_confirmations: u64,
    pub max_callback_gas_limit: u64,
    pub max_num_words: u32,
}

#[cw_serde]
pub struct StoredBeacon {
    pub round: u64,
    /// sha256(signature), 32 bytes
    pub randomness: Vec<u8>,
    /// BLS signature on G1, 48 bytes
    pub signature: Vec<u8>,
    pub verified: bool,
    pub submitted_at: Timestamp,
    pub submitted_by: Addr,
}

#[cw_serde]
pub struct RandomnessRequest {
    pub requester: Addr,
    pub request_id: u64,
    pub min_confirmations: u64,
    pub callback_gas_limit: u64,
    pub num_words: u32,
    pub requested_at: Timestamp,
    pub requested_height: u64,
    /// The only drand round this request can be fulfilled with: the first
    /// one published after `requested_at`
    pub target_round: u64,
}

#[cw_serde]
pub struct Fulfillment {
    pub requester: Addr,
    pub request_id: u64,
    pub drand_round: u64,
    pub random_words: Vec<Uint256>,
    pub fulfilled_at: Timestamp,
    pub fulfilled_by: Addr,
    /// False when the requester's callback failed. Never redelivered.
    pub callback_success: bool,
    pub callback_error: Option<String>,
}
