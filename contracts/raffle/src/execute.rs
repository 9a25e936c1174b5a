use cosmwasm_schema::cw_serde;
use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, DepsMut, Env, Event, MessageInfo,
    Reply, Response, StdError, SubMsg, SubMsgResult, Uint128, Uint256,
};
use lucky_draw_common::types::RaffleState;

use crate::contract::PAYOUT_REPLY_ID;
use crate::eligibility::check_upkeep;
use crate::error::ContractError;
use crate::ledger::EntryLedger;
use crate::msg::InstantiateMsg;
use crate::randomness;
use crate::state::{RoundResult, CONFIG, PENDING_REQUEST, ROUND_RESULTS, STATUS};

/// Carried on the payout submessage so a failed transfer can be reported.
#[cw_serde]
pub struct PayoutReplyPayload {
    pub winner: Addr,
    pub amount: Uint128,
    pub round: u64,
}

/// Reject configurations a raffle could never complete a round with.
pub fn validate_config(msg: &InstantiateMsg) -> Result<(), ContractError> {
    if msg.entrance_fee.is_zero() {
        return Err(ContractError::InvalidConfig {
            reason: "entrance_fee must be greater than zero".to_string(),
        });
    }
    if msg.interval_seconds == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "interval_seconds must be greater than zero".to_string(),
        });
    }
    if msg.denom.trim().is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must not be empty".to_string(),
        });
    }
    if msg.num_words == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "num_words must be at least 1".to_string(),
        });
    }
    if msg.callback_gas_limit == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "callback_gas_limit must be greater than zero".to_string(),
        });
    }
    if msg.request_timeout_seconds == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "request_timeout_seconds must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Sum of the funds sent in `denom`. Any other denom is rejected.
fn deposited_amount(info: &MessageInfo, denom: &str) -> Result<Uint128, ContractError> {
    let mut amount = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != denom {
            return Err(ContractError::WrongDenom {
                expected: denom.to_string(),
                denom: coin.denom.clone(),
            });
        }
        amount = amount.checked_add(coin.amount)?;
    }
    Ok(amount)
}

/// Buy one entry into the current round.
pub fn enter(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let amount = deposited_amount(&info, &config.denom)?;

    let status = STATUS.load(deps.storage)?;
    let mut ledger = EntryLedger::load(deps.storage)?;
    let slot = ledger.record_entry(
        deps.storage,
        &status.raffle_state,
        config.entrance_fee,
        &info.sender,
        amount,
    )?;

    Ok(Response::new()
        .add_attribute("action", "enter")
        .add_attribute("player", info.sender.to_string())
        .add_attribute("round", ledger.round.to_string())
        .add_event(
            Event::new("lucky_draw_raffle_enter")
                .add_attribute("player", info.sender.to_string())
                .add_attribute("round", ledger.round.to_string())
                .add_attribute("slot", slot.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("pool_balance", ledger.balance.to_string()),
        ))
}

/// Trigger a draw. Anyone can call; the eligibility check is re-run here so
/// an early or empty trigger fails without touching state.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    perform_data: Binary,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut status = STATUS.load(deps.storage)?;
    let ledger = EntryLedger::load(deps.storage)?;

    let check = check_upkeep(env.block.time, &config, &status, &ledger);
    if !check.upkeep_needed {
        return Err(ContractError::UpkeepNotNeeded {
            balance: ledger.balance,
            num_players: ledger.num_players,
            raffle_state: status.raffle_state,
        });
    }

    status.raffle_state = RaffleState::Calculating;
    let (pending, request_msg) =
        randomness::request(deps.storage, &env, &config, &mut status, ledger.round)?;
    STATUS.save(deps.storage, &status)?;

    Ok(Response::new()
        .add_message(request_msg)
        .set_data(to_json_binary(&pending.request_id)?)
        .add_attribute("action", "perform_upkeep")
        .add_attribute("request_id", pending.request_id.to_string())
        .add_attribute("perform_data", hex::encode(perform_data.as_slice()))
        .add_event(
            Event::new("lucky_draw_winner_requested")
                .add_attribute("request_id", pending.request_id.to_string())
                .add_attribute("round", ledger.round.to_string())
                .add_attribute("num_players", ledger.num_players.to_string())
                .add_attribute("pool_balance", ledger.balance.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Fulfillment callback from the coordinator.
///
/// 1. Only the configured coordinator may call
/// 2. Consume the pending request matching `request_id`
/// 3. winner_index = random_words[0] mod num_players (count taken before clearing)
/// 4. Record the result, clear the ledger, reset the timer, reopen the round
/// 5. Pay the whole pool to the winner; a rejected transfer reverts all of the above
pub fn receive_randomness(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.coordinator {
        return Err(ContractError::Unauthorized {
            reason: "only the randomness coordinator can deliver randomness".to_string(),
        });
    }

    let pending = randomness::fulfill(deps.storage, request_id)?;
    let random_word = *random_words.first().ok_or(ContractError::NoRandomWords)?;

    let mut status = STATUS.load(deps.storage)?;
    let mut ledger = EntryLedger::load(deps.storage)?;

    let num_players = ledger.num_players;
    let winner_index = randomness::winner_index(random_word, num_players)?;
    let winner = ledger.participant_at(deps.storage, winner_index)?;
    let payout = ledger.balance;
    let round = ledger.round;

    ROUND_RESULTS.save(
        deps.storage,
        round,
        &RoundResult {
            round,
            winner: winner.clone(),
            payout,
            num_players,
            request_id: pending.request_id,
            random_word,
            winner_index,
            completed_at: env.block.time,
        },
    )?;

    ledger.clear()?;
    ledger.save(deps.storage)?;

    status.recent_winner = Some(winner.clone());
    status.last_timestamp = env.block.time;
    status.raffle_state = RaffleState::Open;
    status.rounds_completed = status
        .rounds_completed
        .checked_add(1)
        .ok_or_else(|| StdError::generic_err("round counter exhausted"))?;
    status.total_paid_out = status.total_paid_out.checked_add(payout)?;
    STATUS.save(deps.storage, &status)?;

    let payout_msg = SubMsg::reply_on_error(
        BankMsg::Send {
            to_address: winner.to_string(),
            amount: coins(payout.u128(), &config.denom),
        },
        PAYOUT_REPLY_ID,
    )
    .with_payload(to_json_binary(&PayoutReplyPayload {
        winner: winner.clone(),
        amount: payout,
        round,
    })?);

    Ok(Response::new()
        .add_submessage(payout_msg)
        .add_attribute("action", "receive_randomness")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("payout", payout.to_string())
        .add_event(
            Event::new("lucky_draw_winner_picked")
                .add_attribute("winner", winner.to_string())
                .add_attribute("amount", payout.to_string())
                .add_attribute("denom", config.denom)
                .add_attribute("round", round.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("winner_index", winner_index.to_string())
                .add_attribute("num_players", num_players.to_string())
                .add_attribute("random_word", random_word.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Failed payouts abort the whole fulfillment: the round stays `Calculating`
/// and the pool stays in the contract.
pub fn handle_payout_reply(msg: Reply) -> Result<Response, ContractError> {
    match msg.result {
        SubMsgResult::Ok(_) => Ok(Response::new()),
        SubMsgResult::Err(reason) => {
            let payload: PayoutReplyPayload = from_json(&msg.payload)?;
            Err(ContractError::PayoutFailed {
                winner: payload.winner.to_string(),
                amount: payload.amount.to_string(),
                reason,
            })
        }
    }
}

/// Reopen a round whose randomness never arrived. Admin only, and only after
/// `request_timeout_seconds` have passed since the request.
/// Entries and the pool are kept; a late callback for the dropped id fails.
pub fn abandon_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: "only admin can abandon a randomness request".to_string(),
        });
    }

    let pending = PENDING_REQUEST
        .may_load(deps.storage)?
        .ok_or(ContractError::NotCalculating)?;

    let abandon_after = pending
        .requested_at
        .seconds()
        .saturating_add(config.request_timeout_seconds);
    if env.block.time.seconds() < abandon_after {
        return Err(ContractError::RequestNotTimedOut {
            request_id: pending.request_id,
            abandon_after,
        });
    }
    PENDING_REQUEST.remove(deps.storage);

    let mut status = STATUS.load(deps.storage)?;
    status.raffle_state = RaffleState::Open;
    STATUS.save(deps.storage, &status)?;

    Ok(Response::new()
        .add_attribute("action", "abandon_request")
        .add_attribute("request_id", pending.request_id.to_string())
        .add_event(
            Event::new("lucky_draw_request_abandoned")
                .add_attribute("request_id", pending.request_id.to_string())
                .add_attribute("round", pending.round.to_string())
                .add_attribute(
                    "pending_seconds",
                    env.block
                        .time
                        .seconds()
                        .saturating_sub(pending.requested_at.seconds())
                        .to_string(),
                ),
        ))
}
