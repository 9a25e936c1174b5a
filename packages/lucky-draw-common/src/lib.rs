pub mod msg;
pub mod types;

pub use msg::{ConsumerExecuteMsg, CoordinatorExecuteMsg};
pub use types::{RaffleState, RandomnessRequestParams};
