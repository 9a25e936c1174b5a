use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdError, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use lucky_draw_common::types::{RaffleState, RandomnessRequestParams};

use crate::error::ContractError;
use crate::execute;
use crate::ledger::EntryLedger;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{RaffleConfig, RaffleStatus, CONFIG, STATUS};

const CONTRACT_NAME: &str = "crates.io:lucky-draw-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const PAYOUT_REPLY_ID: u64 = 1;

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    execute::validate_config(&msg)?;

    let config = RaffleConfig {
        admin: info.sender.clone(),
        entrance_fee: msg.entrance_fee,
        denom: msg.denom,
        interval_seconds: msg.interval_seconds,
        coordinator: deps.api.addr_validate(&msg.coordinator)?,
        request_params: RandomnessRequestParams {
            min_confirmations: msg.min_confirmations,
            callback_gas_limit: msg.callback_gas_limit,
            num_words: msg.num_words,
        },
        request_timeout_seconds: msg.request_timeout_seconds,
    };
    CONFIG.save(deps.storage, &config)?;

    let status = RaffleStatus {
        raffle_state: RaffleState::Open,
        last_timestamp: env.block.time,
        recent_winner: None,
        next_request_id: 1,
        rounds_completed: 0,
        total_paid_out: Uint128::zero(),
    };
    STATUS.save(deps.storage, &status)?;
    EntryLedger::default().save(deps.storage)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Enter {} => execute::enter(deps, env, info),
        ExecuteMsg::PerformUpkeep { perform_data } => {
            execute::perform_upkeep(deps, env, info, perform_data)
        }
        ExecuteMsg::ReceiveRandomness {
            request_id,
            random_words,
        } => execute::receive_randomness(deps, env, info, request_id, random_words),
        ExecuteMsg::AbandonRequest {} => execute::abandon_request(deps, env, info),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> Result<Binary, ContractError> {
    let res = match msg {
        QueryMsg::Config {} => query::query_config(deps)?,
        QueryMsg::RaffleState {} => query::query_raffle_state(deps)?,
        QueryMsg::EntranceFee {} => query::query_entrance_fee(deps)?,
        QueryMsg::Interval {} => query::query_interval(deps)?,
        QueryMsg::Player { index } => query::query_player(deps, index)?,
        QueryMsg::Players { start_after, limit } => {
            query::query_players(deps, start_after, limit)?
        }
        QueryMsg::NumPlayers {} => query::query_num_players(deps)?,
        QueryMsg::PoolBalance {} => query::query_pool_balance(deps)?,
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps)?,
        QueryMsg::LastTimestamp {} => query::query_last_timestamp(deps)?,
        QueryMsg::PendingRequest {} => query::query_pending_request(deps)?,
        QueryMsg::CheckUpkeep { check_data } => query::query_check_upkeep(deps, env, check_data)?,
        QueryMsg::Round { round } => query::query_round(deps, round)?,
        QueryMsg::RoundHistory { start_after, limit } => {
            query::query_round_history(deps, start_after, limit)?
        }
    };
    Ok(res)
}

#[entry_point]
pub fn reply(_deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        PAYOUT_REPLY_ID => execute::handle_payout_reply(msg),
        id => Err(StdError::generic_err(format!("unknown reply id {}", id)).into()),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
