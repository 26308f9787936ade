use std::io::{BufRead, ErrorKind};

use client::{state_store::action::Action, state_store::State, termination::Interrupted};
use tokio::sync::{
    broadcast,
    mpsc::{self, UnboundedReceiver, UnboundedSender},
};
use tracing::warn;

use self::ui::Screen;

mod ui;

/// Line oriented frontend, reads commands from stdin and prints the room as it changes
pub struct LineFrontend {
    action_tx: UnboundedSender<Action>,
}

impl LineFrontend {
    pub fn new() -> (Self, UnboundedReceiver<Action>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        (Self { action_tx }, action_rx)
    }

    pub async fn main_loop(
        self,
        mut state_rx: UnboundedReceiver<State>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
    ) -> anyhow::Result<Interrupted> {
        let mut lines = spawn_stdin_reader();
        let mut stdin_open = true;
        let mut screen = Screen::default();

        ui::print_usage();

        loop {
            tokio::select! {
                maybe_line = lines.recv(), if stdin_open => match maybe_line {
                    Some(Ok(line)) => match parse_line(&line) {
                        Some(actions) => {
                            for action in actions {
                                // the store is gone only while shutting down
                                let _ = self.action_tx.send(action);
                            }
                        }
                        None => ui::print_usage(),
                    },
                    Some(Err(err)) => {
                        warn!(error = %err, "skipping a line that could not be read");
                    }
                    // stdin was closed, end the session
                    None => {
                        stdin_open = false;
                        let _ = self.action_tx.send(Action::Exit);
                    }
                },
                // Handle state updates
                Some(state) = state_rx.recv() => {
                    screen.render(&state);
                },
                // Catch and handle interrupt signal to gracefully shutdown
                Ok(interrupted) = interrupt_rx.recv() => {
                    break Ok(interrupted);
                }
            }
        }
    }
}

// blocking reads live on their own thread so they never hold up the runtime shutdown
fn spawn_stdin_reader() -> UnboundedReceiver<std::io::Result<String>> {
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || forward_lines(std::io::stdin().lock(), line_tx));

    line_rx
}

fn forward_lines(reader: impl BufRead, line_tx: UnboundedSender<std::io::Result<String>>) {
    for line in reader.lines() {
        // an undecodable line is consumed whole, any other failure ends the input
        let fatal = matches!(&line, Err(err) if err.kind() != ErrorKind::InvalidData);

        if line_tx.send(line).is_err() || fatal {
            break;
        }
    }
}

/// Maps a typed line to the actions it stands for, `None` for unknown commands
fn parse_line(line: &str) -> Option<Vec<Action>> {
    let Some(command) = line.strip_prefix('/') else {
        return Some(vec![
            Action::UpdatePendingInput {
                text: String::from(line),
            },
            Action::SendMessage,
        ]);
    };

    let (name, argument) = match command.split_once(' ') {
        Some((name, argument)) => (name, argument.trim()),
        None => (command, ""),
    };

    let actions = match (name, argument) {
        ("create", _) => vec![Action::CreateRoom],
        ("join", "") => return None,
        ("join", identifier) => vec![Action::JoinRoom {
            identifier: String::from(identifier),
        }],
        ("leave", _) => vec![Action::LeaveRoom],
        ("pot", text) => vec![Action::UpdatePendingPot {
            text: String::from(text),
        }],
        ("add", "") => vec![Action::AddPot],
        ("add", text) => vec![
            Action::UpdatePendingPot {
                text: String::from(text),
            },
            Action::AddPot,
        ],
        ("retrieve", "") => vec![Action::RetrievePot],
        ("retrieve", text) => vec![
            Action::UpdatePendingPot {
                text: String::from(text),
            },
            Action::RetrievePot,
        ],
        ("quit", _) => vec![Action::Exit],
        _ => return None,
    };

    Some(actions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_sent_as_message() {
        assert_eq!(
            parse_line("hello there"),
            Some(vec![
                Action::UpdatePendingInput {
                    text: String::from("hello there")
                },
                Action::SendMessage,
            ])
        );
    }

    #[test]
    fn test_room_commands() {
        assert_eq!(parse_line("/create"), Some(vec![Action::CreateRoom]));
        assert_eq!(
            parse_line("/join abc"),
            Some(vec![Action::JoinRoom {
                identifier: String::from("abc")
            }])
        );
        assert_eq!(parse_line("/join"), None);
        assert_eq!(parse_line("/leave"), Some(vec![Action::LeaveRoom]));
        assert_eq!(parse_line("/quit"), Some(vec![Action::Exit]));
    }

    #[test]
    fn test_pot_commands_keep_the_typed_text() {
        assert_eq!(
            parse_line("/add ten"),
            Some(vec![
                Action::UpdatePendingPot {
                    text: String::from("ten")
                },
                Action::AddPot,
            ])
        );
        assert_eq!(parse_line("/retrieve"), Some(vec![Action::RetrievePot]));
        assert_eq!(
            parse_line("/pot 5"),
            Some(vec![Action::UpdatePendingPot {
                text: String::from("5")
            }])
        );
    }

    #[test]
    fn test_undecodable_lines_do_not_end_the_input() {
        let (line_tx, mut line_rx) = mpsc::unbounded_channel();

        forward_lines(std::io::Cursor::new(b"one\n\xff\xfe\ntwo\n".to_vec()), line_tx);

        assert_eq!(line_rx.try_recv().unwrap().unwrap(), "one");
        assert_eq!(
            line_rx.try_recv().unwrap().unwrap_err().kind(),
            ErrorKind::InvalidData
        );
        assert_eq!(line_rx.try_recv().unwrap().unwrap(), "two");
        assert!(line_rx.try_recv().is_err());
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(parse_line("/dance"), None);
        assert_eq!(parse_line("/help"), None);
    }
}
