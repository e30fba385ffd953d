//! Result types for the email-change service

use uuid::Uuid;

/// Outcome of a successful email-change request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A confirmation message was sent to the new address
    ConfirmationSent {
        /// Provider id of the delivered message
        message_id: String,
    },
    /// The requested address is already the account's current address;
    /// nothing was issued and nothing was sent
    AlreadyCurrent,
}

/// Outcome of a successful email-change confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailChangeConfirmed {
    /// The account whose email changed
    pub account_id: Uuid,
    /// The address the account now holds
    pub email: String,
    /// Instruction to the session layer: the current authentication
    /// session must be dropped. Always set; the swap is performed here,
    /// the session teardown is not.
    pub invalidate_session: bool,
}
