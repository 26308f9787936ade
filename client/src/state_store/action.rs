#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreateRoom,
    JoinRoom { identifier: String },
    LeaveRoom,
    UpdatePendingInput { text: String },
    SendMessage,
    UpdatePendingPot { text: String },
    AddPot,
    RetrievePot,
    Exit,
}
