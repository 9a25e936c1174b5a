use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    from_json, to_json_binary, wasm_execute, Addr, DepsMut, Env, Event, MessageInfo, Reply,
    Response, SubMsg, SubMsgResult,
};
use lucky_draw_common::msg::ConsumerExecuteMsg;

use crate::beacon::{
    derive_random_words, next_round_after, round_publish_time, verify_quicknet_beacon,
};
use crate::contract::CALLBACK_REPLY_ID;
use crate::error::ContractError;
use crate::state::{
    Fulfillment, RandomnessRequest, StoredBeacon, BEACONS, CONFIG, FULFILLMENTS, LATEST_ROUND,
    REQUESTS,
};

/// Identifies the request a callback reply belongs to.
#[cw_serde]
pub struct CallbackReplyPayload {
    pub requester: Addr,
    pub request_id: u64,
}

/// Register a randomness request from a consumer contract. Anyone can call;
/// the sender becomes the callback target.
pub fn request_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    min_confirmations: u64,
    callback_gas_limit: u64,
    num_words: u32,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if num_words == 0 || num_words > config.max_num_words {
        return Err(ContractError::InvalidRequest {
            reason: format!(
                "num_words must be between 1 and {}, got {}",
                config.max_num_words, num_words
            ),
        });
    }
    if callback_gas_limit == 0 || callback_gas_limit > config.max_callback_gas_limit {
        return Err(ContractError::InvalidRequest {
            reason: format!(
                "callback_gas_limit must be between 1 and {}, got {}",
                config.max_callback_gas_limit, callback_gas_limit
            ),
        });
    }
    if min_confirmations < config.min_request_confirmations {
        return Err(ContractError::InvalidRequest {
            reason: format!(
                "min_confirmations must be at least {}, got {}",
                config.min_request_confirmations, min_confirmations
            ),
        });
    }

    let key = (&info.sender, request_id);
    if REQUESTS.has(deps.storage, key) || FULFILLMENTS.has(deps.storage, key) {
        return Err(ContractError::RequestAlreadyExists {
            requester: info.sender.to_string(),
            request_id,
        });
    }

    let target_round = next_round_after(
        config.genesis_time,
        config.period_seconds,
        env.block.time.seconds(),
    );
    let request = RandomnessRequest {
        requester: info.sender.clone(),
        request_id,
        min_confirmations,
        callback_gas_limit,
        num_words,
        requested_at: env.block.time,
        requested_height: env.block.height,
        target_round,
    };
    REQUESTS.save(deps.storage, key, &request)?;

    Ok(Response::new()
        .add_attribute("action", "request_randomness")
        .add_attribute("requester", info.sender.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("target_round", target_round.to_string())
        .add_event(
            Event::new("lucky_draw_randomness_requested")
                .add_attribute("requester", info.sender.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("target_round", target_round.to_string())
                .add_attribute(
                    "target_publish_time",
                    round_publish_time(config.genesis_time, config.period_seconds, target_round)
                        .to_string(),
                )
                .add_attribute("num_words", num_words.to_string())
                .add_attribute("min_confirmations", min_confirmations.to_string())
                .add_attribute("height", env.block.height.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Submit a drand beacon. Only operators can call this.
pub fn submit_beacon(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    round: u64,
    signature_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can submit beacons".to_string(),
        });
    }

    if BEACONS.has(deps.storage, round) {
        return Err(ContractError::BeaconAlreadyExists { round });
    }

    let signature = hex::decode(&signature_hex).map_err(|_| ContractError::InvalidHex {
        field: "signature_hex".to_string(),
    })?;

    let randomness = verify_quicknet_beacon(&config.quicknet_pubkey, round, &signature)
        .map_err(|e| ContractError::VerificationFailed {
            reason: e.to_string(),
        })?;

    let beacon = StoredBeacon {
        round,
        randomness: randomness.to_vec(),
        signature,
        verified: true,
        submitted_at: env.block.time,
        submitted_by: info.sender.clone(),
    };
    BEACONS.save(deps.storage, round, &beacon)?;

    let current_latest = LATEST_ROUND.may_load(deps.storage)?.unwrap_or(0);
    if round > current_latest {
        LATEST_ROUND.save(deps.storage, &round)?;
    }

    Ok(Response::new()
        .add_attribute("action", "submit_beacon")
        .add_attribute("round", round.to_string())
        .add_attribute("submitted_by", info.sender.to_string())
        .add_event(
            Event::new("lucky_draw_beacon_submitted")
                .add_attribute("round", round.to_string())
                .add_attribute("randomness", hex::encode(randomness))
                .add_attribute("submitted_by", info.sender.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Answer a pending request. Operator only.
///
/// 1. Request must exist and have waited `min_confirmations` blocks
/// 2. Beacon for the request's `target_round` must be stored; no other round is used
/// 3. Derive the words, consume the request, record the fulfillment
/// 4. Call the requester back; a failing callback is recorded in `reply`
pub fn fulfill_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    requester: String,
    request_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    if !config.operators.contains(&info.sender) {
        return Err(ContractError::Unauthorized {
            reason: "only operators can fulfill requests".to_string(),
        });
    }

    let requester = deps.api.addr_validate(&requester)?;
    let request = REQUESTS
        .may_load(deps.storage, (&requester, request_id))?
        .ok_or(ContractError::RequestNotFound {
            requester: requester.to_string(),
            request_id,
        })?;

    let ready_at_height = request
        .requested_height
        .saturating_add(request.min_confirmations);
    if env.block.height < ready_at_height {
        return Err(ContractError::NotEnoughConfirmations {
            request_id,
            ready_at_height,
        });
    }

    let round = request.target_round;
    let beacon = BEACONS
        .may_load(deps.storage, round)?
        .ok_or(ContractError::BeaconNotFound { round })?;

    let random_words =
        derive_random_words(&beacon.randomness, &requester, request_id, request.num_words);

    REQUESTS.remove(deps.storage, (&requester, request_id));
    FULFILLMENTS.save(
        deps.storage,
        (&requester, request_id),
        &Fulfillment {
            requester: requester.clone(),
            request_id,
            drand_round: round,
            random_words: random_words.clone(),
            fulfilled_at: env.block.time,
            fulfilled_by: info.sender.clone(),
            callback_success: true,
            callback_error: None,
        },
    )?;

    let callback = wasm_execute(
        requester.to_string(),
        &ConsumerExecuteMsg::ReceiveRandomness {
            request_id,
            random_words,
        },
        vec![],
    )?;
    let callback = SubMsg::reply_on_error(callback, CALLBACK_REPLY_ID)
        .with_gas_limit(request.callback_gas_limit)
        .with_payload(to_json_binary(&CallbackReplyPayload {
            requester: requester.clone(),
            request_id,
        })?);

    Ok(Response::new()
        .add_submessage(callback)
        .add_attribute("action", "fulfill_request")
        .add_attribute("requester", requester.to_string())
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("lucky_draw_randomness_fulfilled")
                .add_attribute("requester", requester.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("drand_round", round.to_string())
                .add_attribute("randomness", hex::encode(&beacon.randomness))
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Record a failed callback. The coordinator's own state is kept so the
/// request stays consumed.
pub fn handle_callback_reply(deps: DepsMut, msg: Reply) -> Result<Response, ContractError> {
    let reason = match msg.result {
        SubMsgResult::Ok(_) => return Ok(Response::new()),
        SubMsgResult::Err(reason) => reason,
    };
    let payload: CallbackReplyPayload = from_json(&msg.payload)?;
    let key = (&payload.requester, payload.request_id);

    let mut fulfillment = FULFILLMENTS.load(deps.storage, key)?;
    fulfillment.callback_success = false;
    fulfillment.callback_error = Some(reason.clone());
    FULFILLMENTS.save(deps.storage, key, &fulfillment)?;

    Ok(Response::new()
        .add_attribute("action", "callback_failed")
        .add_attribute("request_id", payload.request_id.to_string())
        .add_event(
            Event::new("lucky_draw_callback_failed")
                .add_attribute("requester", payload.requester.to_string())
                .add_attribute("request_id", payload.request_id.to_string())
                .add_attribute("error", reason),
        ))
}

/// Update the operator list. Admin only.
pub fn update_operators(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    add: Vec<String>,
    remove: Vec<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;

    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can update operators".to_string(),
        });
    }

    for addr_str in &remove {
        let addr = deps.api.addr_validate(addr_str)?;
        config.operators.retain(|a| *a != addr);
    }

    for addr_str in &add {
        let addr = deps.api.addr_validate(addr_str)?;
        if !config.operators.contains(&addr) {
            config.operators.push(addr);
        }
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_operators")
        .add_attribute("added", add.join(","))
        .add_attribute("removed", remove.join(",")))
}
