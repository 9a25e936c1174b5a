pub mod contract;
pub mod eligibility;
pub mod error;
pub mod execute;
pub mod ledger;
pub mod msg;
pub mod query;
pub mod randomness;
pub mod state;

pub use crate::error::ContractError;
