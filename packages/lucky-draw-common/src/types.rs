use cosmwasm_schema::cw_serde;

/// Lifecycle state of the current raffle round.
#[cw_serde]
pub enum RaffleState {
    /// Accepting entries; a draw may be triggered once eligible.
    Open,
    /// A randomness request is outstanding; entries and new draws are rejected.
    Calculating,
}

impl RaffleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RaffleState::Open => "open",
            RaffleState::Calculating => "calculating",
        }
    }
}

impl std::fmt::Display for RaffleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters forwarded to the coordinator with every randomness request.
#[cw_serde]
pub struct RandomnessRequestParams {
    /// Blocks the coordinator must wait after the request before fulfilling it
    pub min_confirmations: u64,
    /// Gas limit applied to the fulfillment callback
    pub callback_gas_limit: u64,
    /// Number of random words requested. The raffle consumes exactly one.
    pub num_words: u32,
}
