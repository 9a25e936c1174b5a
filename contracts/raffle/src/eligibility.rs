use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;
use lucky_draw_common::types::RaffleState;

use crate::ledger::EntryLedger;
use crate::state::{RaffleConfig, RaffleStatus};

/// Outcome of the upkeep probe, with every conjunct kept for diagnostics.
#[cw_serde]
pub struct UpkeepCheck {
    pub upkeep_needed: bool,
    pub time_passed: bool,
    pub is_open: bool,
    pub has_balance: bool,
    pub has_players: bool,
}

/// Decide whether a draw may be triggered at `now`. Reads only.
pub fn check_upkeep(
    now: Timestamp,
    config: &RaffleConfig,
    status: &RaffleStatus,
    ledger: &EntryLedger,
) -> UpkeepCheck {
    // A clock behind last_timestamp counts as no time elapsed
    let elapsed = now.seconds().saturating_sub(status.last_timestamp.seconds());
    let time_passed = elapsed >= config.interval_seconds;
    let is_open = status.raffle_state == RaffleState::Open;
    let has_balance = !ledger.balance.is_zero();
    let has_players = ledger.num_players > 0;

    UpkeepCheck {
        upkeep_needed: time_passed && is_open && has_balance && has_players,
        time_passed,
        is_open,
        has_balance,
        has_players,
    }
}
