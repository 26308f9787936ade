use client::{
    connection::ConnectionStatus,
    state_store::{Room, State},
};
use comms::event::{Event, InboundMessage, Sender};

pub fn print_usage() {
    println!("commands: /create, /join <room>, /leave, /pot <amount>, /add [amount], /retrieve [amount], /quit");
    println!("anything else is sent to the room");
}

/// Remembers what was printed so far, so each state update only prints what changed
#[derive(Debug, Default)]
pub struct Screen {
    status: Option<ConnectionStatus>,
    last_error: Option<String>,
    room: Option<String>,
    printed_messages: usize,
}

impl Screen {
    pub fn render(&mut self, state: &State) {
        if self.status.as_ref() != Some(&state.connection_status) {
            println!("{}", describe_status(&state.connection_status));
            self.status = Some(state.connection_status.clone());
        }

        if state.last_error != self.last_error {
            if let Some(err) = state.last_error.as_ref() {
                println!("! {}", err);
            }
            self.last_error = state.last_error.clone();
        }

        if let Some(room) = state.active_room() {
            self.render_room(room);
        }
    }

    fn render_room(&mut self, room: &Room) {
        // a replaced room starts with an empty log, even when the identifier is the same
        if self.room.as_deref() != Some(room.identifier.as_str())
            || room.messages.len() < self.printed_messages
        {
            println!("== room {} ==", room.display_name);
            self.room = Some(room.identifier.clone());
            self.printed_messages = 0;
        }

        for message in room.messages.iter().skip(self.printed_messages) {
            println!("{}", format_message(message));
        }

        self.printed_messages = room.messages.len();
    }
}

fn describe_status(status: &ConnectionStatus) -> String {
    match status {
        ConnectionStatus::Closed => String::from("-- not connected"),
        ConnectionStatus::Connecting { url } => format!("-- connecting to {}", url),
        ConnectionStatus::Open { url } => format!("-- connected to {}", url),
        ConnectionStatus::Errored { err } => format!("-- connection failed: {}", err),
    }
}

fn sender_name(sender: &Option<Sender>) -> &str {
    sender
        .as_ref()
        .map(|sender| sender.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("someone")
}

fn format_message(message: &InboundMessage) -> String {
    match message.event() {
        Some(Event::SendMessage(event)) => match event.sender.as_ref() {
            Some(_) => format!("{}: {}", sender_name(&event.sender), event.message),
            None => format!("* {}", event.message),
        },
        Some(Event::UpdatePot(event)) => format!("[pot {}] {}", event.pot, event.message),
        Some(Event::UserJoin(event)) => format!("* {} is online", sender_name(&event.sender)),
        Some(Event::UserLeft(event)) => format!("* {} went offline", sender_name(&event.sender)),
        Some(Event::RoomJoined(event)) => format!("* {}", event.message),
        None => message.raw().to_string(),
    }
}
