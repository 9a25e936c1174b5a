use cosmwasm_std::{ConversionOverflowError, OverflowError, StdError, Uint128};
use lucky_draw_common::types::RaffleState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    ConversionOverflow(#[from] ConversionOverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("insufficient entrance fee: sent {sent}, need {required}")]
    InsufficientFee { sent: Uint128, required: Uint128 },

    #[error("raffle is not open (state: {raffle_state})")]
    RoundNotOpen { raffle_state: RaffleState },

    #[error("must send {expected}, got {denom}")]
    WrongDenom { expected: String, denom: String },

    #[error(
        "upkeep not needed (balance: {balance}, players: {num_players}, state: {raffle_state})"
    )]
    UpkeepNotNeeded {
        balance: Uint128,
        num_players: u32,
        raffle_state: RaffleState,
    },

    #[error("randomness request {request_id} already pending")]
    RequestAlreadyPending { request_id: u64 },

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("fulfillment carried no random words")]
    NoRandomWords,

    #[error("player index {index} out of range ({num_players} players)")]
    IndexOutOfRange { index: u32, num_players: u32 },

    #[error("payout of {amount} to {winner} failed: {reason}")]
    PayoutFailed {
        winner: String,
        amount: String,
        reason: String,
    },

    #[error("request {request_id} can be abandoned from {abandon_after}")]
    RequestNotTimedOut { request_id: u64, abandon_after: u64 },

    #[error("raffle is not calculating")]
    NotCalculating,

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },
}
