use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128, Uint256};
use cw_storage_plus::{Item, Map};
use lucky_draw_common::types::{RaffleState, RandomnessRequestParams};

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const STATUS: Item<RaffleStatus> = Item::new("status");
pub const LEDGER: Item<crate::ledger::EntryLedger> = Item::new("ledger");
/// Entry slots keyed by (round, slot index). Old rounds are never read by the
/// ledger again, so clearing only needs to advance the round.
pub const PLAYERS: Map<(u64, u32), Addr> = Map::new("players");
/// Present exactly while the round is `Calculating`.
pub const PENDING_REQUEST: Item<PendingRequest> = Item::new("pending_request");
pub const ROUND_RESULTS: Map<u64, RoundResult> = Map::new("round_results");

#[cw_serde]
pub struct RaffleConfig {
    pub admin: Addr,
    /// Minimum deposit per entry, in `denom`
    pub entrance_fee: Uint128,
    pub denom: String,
    /// Minimum seconds between two draws
    pub interval_seconds: u64,
    /// Only this address may deliver randomness
    pub coordinator: Addr,
    pub request_params: RandomnessRequestParams,
    /// Seconds a request must stay unanswered before the admin may abandon it
    pub request_timeout_seconds: u64,
}

#[cw_serde]
pub struct RaffleStatus {
    pub raffle_state: RaffleState,
    /// Block time of the last completed draw (instantiation for the first round)
    pub last_timestamp: Timestamp,
    pub recent_winner: Option<Addr>,
    pub next_request_id: u64,
    pub rounds_completed: u64,
    pub total_paid_out: Uint128,
}

#[cw_serde]
pub struct PendingRequest {
    pub request_id: u64,
    pub round: u64,
    pub requested_at: Timestamp,
    pub requested_height: u64,
}

#[cw_serde]
pub struct RoundResult {
    pub round: u64,
    pub winner: Addr,
    pub payout: Uint128,
    pub num_players: u32,
    pub request_id: u64,
    pub random_word: Uint256,
    pub winner_index: u32,
    pub completed_at: Timestamp,
}
