use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdError, StdResult,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{CoordinatorConfig, CONFIG, LATEST_ROUND};

const CONTRACT_NAME: &str = "crates.io:lucky-draw-drand-coordinator";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const CALLBACK_REPLY_ID: u64 = 1;

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let pubkey_bytes = hex::decode(&msg.quicknet_pubkey_hex).map_err(|_| {
        ContractError::InvalidHex {
            field: "quicknet_pubkey_hex".to_string(),
        }
    })?;
    if pubkey_bytes.len() != 96 {
        return Err(ContractError::InvalidPubkeyLength {
            got: pubkey_bytes.len(),
        });
    }
    if msg.period_seconds == 0 || msg.max_num_words == 0 || msg.max_callback_gas_limit == 0 {
        return Err(ContractError::InvalidRequest {
            reason: "period_seconds, max_num_words and max_callback_gas_limit must be non-zero"
                .to_string(),
        });
    }

    let mut operators = Vec::new();
    for op in &msg.operators {
        operators.push(deps.api.addr_validate(op)?);
    }

    let config = CoordinatorConfig {
        admin: info.sender.clone(),
        operators,
        quicknet_pubkey: pubkey_bytes,
        chain_hash: msg.chain_hash,
        genesis_time: msg.genesis_time,
        period_seconds: msg.period_seconds,
        min_request_confirmations: msg.min_request_confirmations,
        max_callback_gas_limit: msg.max_callback_gas_limit,
        max_num_words: msg.max_num_words,
    };

    CONFIG.save(deps.storage, &config)?;
    LATEST_ROUND.save(deps.storage, &0u64)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "drand-coordinator")
        .add_attribute("admin", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RequestRandomness {
            request_id,
            min_confirmations,
            callback_gas_limit,
            num_words,
        } => execute::request_randomness(
            deps,
            env,
            info,
            request_id,
            min_confirmations,
            callback_gas_limit,
            num_words,
        ),
        ExecuteMsg::SubmitBeacon {
            round,
            signature_hex,
        } => execute::submit_beacon(deps, env, info, round, signature_hex),
        ExecuteMsg::FulfillRequest {
            requester,
            request_id,
        } => execute::fulfill_request(deps, env, info, requester, request_id),
        ExecuteMsg::UpdateOperators { add, remove } => {
            execute::update_operators(deps, env, info, add, remove)
        }
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::Beacon { round } => query::query_beacon(deps, round),
        QueryMsg::LatestRound {} => query::query_latest_round(deps),
        QueryMsg::Request {
            requester,
            request_id,
        } => query::query_request(deps, requester, request_id),
        QueryMsg::Fulfillment {
            requester,
            request_id,
        } => query::query_fulfillment(deps, requester, request_id),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        CALLBACK_REPLY_ID => execute::handle_callback_reply(deps, msg),
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
