use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Execute messages a consumer sends to the randomness coordinator.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    /// Ask for `num_words` random words. `request_id` is allocated by the
    /// requester and echoed back in the callback.
    RequestRandomness {
        request_id: u64,
        min_confirmations: u64,
        callback_gas_limit: u64,
        num_words: u32,
    },
}

/// Callback the coordinator delivers to the requesting contract.
///
/// Consumers must expose a matching `ReceiveRandomness` variant on their own
/// `ExecuteMsg` so the JSON shape lines up.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    ReceiveRandomness {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}
