use cosmwasm_std::{wasm_execute, CosmosMsg, Env, StdError, Storage, Uint128, Uint256};
use lucky_draw_common::msg::CoordinatorExecuteMsg;

use crate::error::ContractError;
use crate::state::{PendingRequest, RaffleConfig, RaffleStatus, PENDING_REQUEST};

/// Allocate a request id, record it as pending and build the coordinator call.
///
/// The request is fire-and-forget: the round stays `Calculating` until the
/// coordinator delivers `ReceiveRandomness` in a later transaction.
pub fn request(
    storage: &mut dyn Storage,
    env: &Env,
    config: &RaffleConfig,
    status: &mut RaffleStatus,
    round: u64,
) -> Result<(PendingRequest, CosmosMsg), ContractError> {
    if let Some(pending) = PENDING_REQUEST.may_load(storage)? {
        return Err(ContractError::RequestAlreadyPending {
            request_id: pending.request_id,
        });
    }

    let request_id = status.next_request_id;
    status.next_request_id = request_id
        .checked_add(1)
        .ok_or_else(|| StdError::generic_err("request ids exhausted"))?;

    let pending = PendingRequest {
        request_id,
        round,
        requested_at: env.block.time,
        requested_height: env.block.height,
    };
    PENDING_REQUEST.save(storage, &pending)?;

    let params = &config.request_params;
    let msg = wasm_execute(
        config.coordinator.to_string(),
        &CoordinatorExecuteMsg::RequestRandomness {
            request_id,
            min_confirmations: params.min_confirmations,
            callback_gas_limit: params.callback_gas_limit,
            num_words: params.num_words,
        },
        vec![],
    )?;

    Ok((pending, msg.into()))
}

/// Consume the pending request matching `request_id`.
/// Covers ids never issued, already fulfilled and abandoned alike.
pub fn fulfill(
    storage: &mut dyn Storage,
    request_id: u64,
) -> Result<PendingRequest, ContractError> {
    let pending = PENDING_REQUEST
        .may_load(storage)?
        .filter(|p| p.request_id == request_id)
        .ok_or(ContractError::UnknownRequest { request_id })?;
    PENDING_REQUEST.remove(storage);
    Ok(pending)
}

/// `random_word mod num_players`.
///
/// Carries the usual modulo bias of roughly num_players / 2^256, negligible for
/// oracle-grade words and realistic player counts.
pub fn winner_index(random_word: Uint256, num_players: u32) -> Result<u32, ContractError> {
    if num_players == 0 {
        return Err(ContractError::IndexOutOfRange {
            index: 0,
            num_players,
        });
    }
    let index = Uint128::try_from(random_word % Uint256::from(num_players))?;
    // Strictly below num_players, so it fits in u32
    Ok(index.u128() as u32)
}
