/// Reasons a submission does not start a new turn.
///
/// Both are handled locally by refusing to send; neither is shown to the user
/// as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TurnRejected {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is still streaming")]
    TurnInFlight,
}
