use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128, Uint256};
use lucky_draw_common::types::RaffleState;

use crate::state::{PendingRequest, RaffleConfig, RoundResult};

#[cw_serde]
pub struct InstantiateMsg {
    pub entrance_fee: Uint128,
    pub denom: String,
    pub interval_seconds: u64,
    /// Randomness coordinator allowed to call `ReceiveRandomness`
    pub coordinator: String,
    pub min_confirmations: u64,
    pub callback_gas_limit: u64,
    pub num_words: u32,
    /// Minimum age of a pending request before `AbandonRequest` is accepted
    pub request_timeout_seconds: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Buy one entry. Send at least the entrance fee in `denom`.
    Enter {},
    /// Start a draw once `CheckUpkeep` reports it is needed. Anyone can call.
    PerformUpkeep { perform_data: Binary },
    /// Randomness callback. Coordinator only.
    ReceiveRandomness {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
    /// Drop an outstanding request and reopen the round with its entries intact.
    /// Admin only, and only once the request has timed out.
    AbandonRequest {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(RaffleState)]
    RaffleState {},
    #[returns(Uint128)]
    EntranceFee {},
    #[returns(u64)]
    Interval {},
    #[returns(Addr)]
    Player { index: u32 },
    #[returns(PlayersResponse)]
    Players {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(u32)]
    NumPlayers {},
    #[returns(PoolBalanceResponse)]
    PoolBalance {},
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(Timestamp)]
    LastTimestamp {},
    #[returns(Option<PendingRequest>)]
    PendingRequest {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep { check_data: Binary },
    #[returns(Option<RoundResult>)]
    Round { round: u64 },
    #[returns(RoundHistoryResponse)]
    RoundHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
pub struct PlayerEntry {
    pub index: u32,
    pub player: Addr,
}

#[cw_serde]
pub struct PlayersResponse {
    pub round: u64,
    pub players: Vec<PlayerEntry>,
}

#[cw_serde]
pub struct PoolBalanceResponse {
    pub round: u64,
    pub balance: Uint128,
    pub denom: String,
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    /// `check_data` passed through unchanged
    pub perform_data: Binary,
}

#[cw_serde]
pub struct RoundHistoryResponse {
    pub rounds: Vec<RoundResult>,
}
