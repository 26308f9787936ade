use comms::command::{
    JoinRoomCommand, LeaveRoomCommand, PotAmount, PotCommand, SendMessageCommand, UserCommand,
};

use crate::state_store::Room;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PotAction {
    Add,
    Retrieve,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandDispatcher {
    send_target: bool,
}

impl CommandDispatcher {
    pub fn new(send_target: bool) -> Self {
        CommandDispatcher { send_target }
    }

    /// Turns the pending input of the room into a message, the input is left for the caller
    /// to clear once the message went out. Empty input yields no command.
    pub fn send_message(&self, room: &Room) -> Option<UserCommand> {
        if room.pending_input.is_empty() {
            return None;
        }

        Some(UserCommand::SendMessage(SendMessageCommand {
            message: room.pending_input.clone(),
            target: self.send_target.then(|| room.display_name.clone()),
        }))
    }

    pub fn join_room(&self, room: &Room) -> UserCommand {
        UserCommand::JoinRoom(JoinRoomCommand {
            message: room.identifier.clone(),
        })
    }

    pub fn leave_room(&self, room: &Room) -> UserCommand {
        UserCommand::LeaveRoom(LeaveRoomCommand {
            message: room.display_name.clone(),
        })
    }

    /// The amount is sent as typed, text without a leading number goes out as [PotAmount::NotANumber]
    pub fn adjust_pot(&self, action: PotAction, pending_pot: &str) -> UserCommand {
        let command = PotCommand {
            pot: PotAmount::parse(pending_pot),
        };

        match action {
            PotAction::Add => UserCommand::AddPot(command),
            PotAction::Retrieve => UserCommand::RetrievePot(command),
        }
    }
}
