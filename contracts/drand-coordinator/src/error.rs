use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("beacon for round {round} already exists")]
    BeaconAlreadyExists { round: u64 },

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("beacon not found for round {round}")]
    BeaconNotFound { round: u64 },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("invalid randomness request: {reason}")]
    InvalidRequest { reason: String },

    #[error("request {request_id} from {requester} already exists")]
    RequestAlreadyExists { requester: String, request_id: u64 },

    #[error("request {request_id} from {requester} not found")]
    RequestNotFound { requester: String, request_id: u64 },

    #[error("request {request_id} needs confirmations until height {ready_at_height}")]
    NotEnoughConfirmations { request_id: u64, ready_at_height: u64 },
}
