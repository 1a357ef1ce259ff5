use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Disposal '{disposal_id}' is already settled")]
    AlreadySettled { disposal_id: String },

    #[error("Insufficient inventory to settle disposal '{disposal_id}': short by {short_by} shares")]
    InsufficientInventory { disposal_id: String, short_by: i64 },

    #[error("Disposal '{0}' not found")]
    DisposalNotFound(String),
}
