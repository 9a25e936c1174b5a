use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdResult};
use cw_storage_plus::Bound;

use crate::eligibility::check_upkeep;
use crate::error::ContractError;
use crate::ledger::EntryLedger;
use crate::msg::{
    CheckUpkeepResponse, PlayerEntry, PlayersResponse, PoolBalanceResponse, RoundHistoryResponse,
};
use crate::state::{CONFIG, PENDING_REQUEST, ROUND_RESULTS, STATUS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_raffle_state(deps: Deps) -> StdResult<Binary> {
    let status = STATUS.load(deps.storage)?;
    to_json_binary(&status.raffle_state)
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.entrance_fee)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_player(deps: Deps, index: u32) -> Result<Binary, ContractError> {
    let ledger = EntryLedger::load(deps.storage)?;
    let player = ledger.participant_at(deps.storage, index)?;
    Ok(to_json_binary(&player)?)
}

pub fn query_players(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let ledger = EntryLedger::load(deps.storage)?;
    let players = ledger
        .participants(deps.storage, start_after, limit)?
        .into_iter()
        .map(|(index, player)| PlayerEntry { index, player })
        .collect();

    to_json_binary(&PlayersResponse {
        round: ledger.round,
        players,
    })
}

pub fn query_num_players(deps: Deps) -> StdResult<Binary> {
    let ledger = EntryLedger::load(deps.storage)?;
    to_json_binary(&ledger.num_players)
}

pub fn query_pool_balance(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let ledger = EntryLedger::load(deps.storage)?;
    to_json_binary(&PoolBalanceResponse {
        round: ledger.round,
        balance: ledger.balance,
        denom: config.denom,
    })
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let status = STATUS.load(deps.storage)?;
    to_json_binary(&status.recent_winner)
}

pub fn query_last_timestamp(deps: Deps) -> StdResult<Binary> {
    let status = STATUS.load(deps.storage)?;
    to_json_binary(&status.last_timestamp)
}

pub fn query_pending_request(deps: Deps) -> StdResult<Binary> {
    let pending = PENDING_REQUEST.may_load(deps.storage)?;
    to_json_binary(&pending)
}

pub fn query_check_upkeep(deps: Deps, env: Env, check_data: Binary) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let status = STATUS.load(deps.storage)?;
    let ledger = EntryLedger::load(deps.storage)?;

    let check = check_upkeep(env.block.time, &config, &status, &ledger);
    to_json_binary(&CheckUpkeepResponse {
        upkeep_needed: check.upkeep_needed,
        perform_data: check_data,
    })
}

pub fn query_round(deps: Deps, round: u64) -> StdResult<Binary> {
    let result = ROUND_RESULTS.may_load(deps.storage, round)?;
    to_json_binary(&result)
}

pub fn query_round_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let rounds = ROUND_RESULTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, result)| result))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&RoundHistoryResponse { rounds })
}
