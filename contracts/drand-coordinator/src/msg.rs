use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::state::{CoordinatorConfig, Fulfillment, RandomnessRequest, StoredBeacon};

#[cw_serde]
pub struct InstantiateMsg {
    pub operators: Vec<String>,
    /// Hex-encoded quicknet public key (96 bytes = 192 hex chars)
    pub quicknet_pubkey_hex: String,
    pub chain_hash: String,
    pub genesis_time: u64,
    pub period_seconds: u64,
    pub min_request_confirmations: u64,
    pub max_callback_gas_limit: u64,
    pub max_num_words: u32,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Register a randomness request. Called by consumer contracts;
    /// same shape as `lucky_draw_common::CoordinatorExecuteMsg`.
    RequestRandomness {
        request_id: u64,
        min_confirmations: u64,
        callback_gas_limit: u64,
        num_words: u32,
    },
    /// Submit a drand beacon for verification and storage.
    SubmitBeacon {
        round: u64,
        /// Hex-encoded BLS signature (48 bytes = 96 hex chars)
        signature_hex: String,
    },
    /// Answer a pending request from the beacon of its target round and call
    /// the requester back. Operator only.
    FulfillRequest { requester: String, request_id: u64 },
    /// Update operator list (admin only).
    UpdateOperators {
        add: Vec<String>,
        remove: Vec<String>,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(CoordinatorConfig)]
    Config {},

    #[returns(Option<StoredBeacon>)]
    Beacon { round: u64 },

    #[returns(u64)]
    LatestRound {},

    #[returns(Option<RandomnessRequest>)]
    Request { requester: String, request_id: u64 },

    #[returns(Option<Fulfillment>)]
    Fulfillment { requester: String, request_id: u64 },
}

#[cw_serde]
pub struct MigrateMsg {}
