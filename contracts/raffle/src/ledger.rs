use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdError, StdResult, Storage, Uint128};
use cw_storage_plus::Bound;
use lucky_draw_common::types::RaffleState;

use crate::error::ContractError;
use crate::state::{LEDGER, PLAYERS};

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Participants and pooled balance of the current round.
///
/// Slots live in `PLAYERS` under the round number, so the ledger itself only
/// carries counters and stays O(1) to load and clear.
#[cw_serde]
pub struct EntryLedger {
    pub round: u64,
    pub num_players: u32,
    pub balance: Uint128,
}

impl Default for EntryLedger {
    fn default() -> Self {
        EntryLedger {
            round: 1,
            num_players: 0,
            balance: Uint128::zero(),
        }
    }
}

impl EntryLedger {
    pub fn load(storage: &dyn Storage) -> StdResult<Self> {
        LEDGER.load(storage)
    }

    pub fn save(&self, storage: &mut dyn Storage) -> StdResult<()> {
        LEDGER.save(storage, self)
    }

    /// Append `participant` as a new slot and add `amount` to the pool.
    /// Returns the slot index. The fee is checked before the round state.
    pub fn record_entry(
        &mut self,
        storage: &mut dyn Storage,
        raffle_state: &RaffleState,
        entrance_fee: Uint128,
        participant: &Addr,
        amount: Uint128,
    ) -> Result<u32, ContractError> {
        if amount < entrance_fee {
            return Err(ContractError::InsufficientFee {
                sent: amount,
                required: entrance_fee,
            });
        }
        if *raffle_state != RaffleState::Open {
            return Err(ContractError::RoundNotOpen {
                raffle_state: raffle_state.clone(),
            });
        }

        let slot = self.num_players;
        let num_players = slot
            .checked_add(1)
            .ok_or_else(|| StdError::generic_err("player slots exhausted for this round"))?;
        let balance = self.balance.checked_add(amount)?;

        PLAYERS.save(storage, (self.round, slot), participant)?;
        self.num_players = num_players;
        self.balance = balance;
        self.save(storage)?;

        Ok(slot)
    }

    pub fn participant_at(&self, storage: &dyn Storage, index: u32) -> Result<Addr, ContractError> {
        if index >= self.num_players {
            return Err(ContractError::IndexOutOfRange {
                index,
                num_players: self.num_players,
            });
        }
        Ok(PLAYERS.load(storage, (self.round, index))?)
    }

    pub fn participants(
        &self,
        storage: &dyn Storage,
        start_after: Option<u32>,
        limit: Option<u32>,
    ) -> StdResult<Vec<(u32, Addr)>> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
        let start = start_after.map(Bound::exclusive);

        PLAYERS
            .prefix(self.round)
            .range(storage, start, None, Order::Ascending)
            .take(limit)
            .collect()
    }

    /// Empty the ledger and move on to the next round. Payout only.
    pub fn clear(&mut self) -> StdResult<()> {
        self.round = self
            .round
            .checked_add(1)
            .ok_or_else(|| StdError::generic_err("round counter exhausted"))?;
        self.num_players = 0;
        self.balance = Uint128::zero();
        Ok(())
    }
}
