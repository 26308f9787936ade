use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// User Command for posting a message to the room the connection is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessageCommand {
    // The content of the message.
    pub message: String,
    // Display name of the room, only some servers expect it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// User Command announcing that the user joined a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRoomCommand {
    // The identifier of the room that was joined.
    pub message: String,
}

/// User Command for leaving a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRoomCommand {
    // The display name of the room to leave.
    pub message: String,
}

/// User Command for moving chips into or out of the room pot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotCommand {
    #[serde(default)]
    pub pot: PotAmount,
}

/// A user command which can be sent to the server over an open room connection.
/// All commands are processed in the context of the room the connection was opened for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum UserCommand {
    SendMessage(SendMessageCommand),
    JoinRoom(JoinRoomCommand),
    LeaveRoom(LeaveRoomCommand),
    AddPot(PotCommand),
    RetrievePot(PotCommand),
}

/// Amount of chips typed by the user.
///
/// The amount is taken from free text without validation. Text that does not
/// start with a number becomes [PotAmount::NotANumber], which goes over the
/// wire as `null` exactly like a browser serializes `NaN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PotAmount {
    Number(i64),
    #[default]
    NotANumber,
}

impl PotAmount {
    /// Parses the leading integer of `input` with `parseInt` rules: leading
    /// whitespace and an optional sign are skipped, a `0x` prefix switches to
    /// hexadecimal, and anything after the last digit is ignored.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let (radix, digits) = match rest.get(..2) {
            Some("0x") | Some("0X") => (16, &rest[2..]),
            _ => (10, rest),
        };

        let end = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        let digits = &digits[..end];

        if digits.is_empty() {
            return PotAmount::NotANumber;
        }

        // out of range amounts saturate instead of failing
        let magnitude = i64::from_str_radix(digits, radix).unwrap_or(i64::MAX);

        PotAmount::Number(if negative {
            magnitude.saturating_neg()
        } else {
            magnitude
        })
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            PotAmount::Number(amount) => Some(*amount),
            PotAmount::NotANumber => None,
        }
    }
}

impl From<i64> for PotAmount {
    fn from(amount: i64) -> Self {
        PotAmount::Number(amount)
    }
}

impl Serialize for PotAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PotAmount::Number(amount) => serializer.serialize_i64(*amount),
            PotAmount::NotANumber => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for PotAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<i64>::deserialize(deserializer)?
            .map_or(PotAmount::NotANumber, PotAmount::Number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // given a command enum, and an expect string, asserts that command is serialized / deserialized appropiately
    fn assert_command_serialization(command: &UserCommand, expected: &str) {
        let serialized = serde_json::to_string(&command).unwrap();
        assert_eq!(serialized, expected);
        let deserialized: UserCommand = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, *command);
    }

    #[test]
    fn test_send_message_command() {
        let command = UserCommand::SendMessage(SendMessageCommand {
            message: "hello".to_string(),
            target: None,
        });

        assert_command_serialization(&command, r#"{"action":"send-message","message":"hello"}"#);
    }

    #[test]
    fn test_send_message_command_with_target() {
        let command = UserCommand::SendMessage(SendMessageCommand {
            message: "hello".to_string(),
            target: Some("lobby".to_string()),
        });

        assert_command_serialization(
            &command,
            r#"{"action":"send-message","message":"hello","target":"lobby"}"#,
        );
    }

    #[test]
    fn test_join_command() {
        let command = UserCommand::JoinRoom(JoinRoomCommand {
            message: "abc".to_string(),
        });

        assert_command_serialization(&command, r#"{"action":"join-room","message":"abc"}"#);
    }

    #[test]
    fn test_leave_command() {
        let command = UserCommand::LeaveRoom(LeaveRoomCommand {
            message: "abc".to_string(),
        });

        assert_command_serialization(&command, r#"{"action":"leave-room","message":"abc"}"#);
    }

    #[test]
    fn test_pot_commands() {
        assert_command_serialization(
            &UserCommand::AddPot(PotCommand { pot: 25.into() }),
            r#"{"action":"add-pot","pot":25}"#,
        );
        assert_command_serialization(
            &UserCommand::RetrievePot(PotCommand { pot: 10.into() }),
            r#"{"action":"retrieve-pot","pot":10}"#,
        );
    }

    #[test]
    fn test_not_a_number_pot_goes_over_the_wire_as_null() {
        let command = UserCommand::AddPot(PotCommand {
            pot: PotAmount::parse("lots"),
        });

        assert_command_serialization(&command, r#"{"action":"add-pot","pot":null}"#);
    }

    #[test]
    fn test_missing_pot_is_not_a_number() {
        let command: UserCommand = serde_json::from_str(r#"{"action":"retrieve-pot"}"#).unwrap();

        assert_eq!(
            command,
            UserCommand::RetrievePot(PotCommand {
                pot: PotAmount::NotANumber
            })
        );
    }

    #[test]
    fn test_pot_amount_parsing() {
        assert_eq!(PotAmount::parse("42"), PotAmount::Number(42));
        assert_eq!(PotAmount::parse("  -7"), PotAmount::Number(-7));
        assert_eq!(PotAmount::parse("+3"), PotAmount::Number(3));
        assert_eq!(PotAmount::parse("12chips"), PotAmount::Number(12));
        assert_eq!(PotAmount::parse("0x1f"), PotAmount::Number(31));
        assert_eq!(PotAmount::parse(""), PotAmount::NotANumber);
        assert_eq!(PotAmount::parse("-"), PotAmount::NotANumber);
        assert_eq!(PotAmount::parse("abc"), PotAmount::NotANumber);
        assert_eq!(PotAmount::parse("1.5"), PotAmount::Number(1));
        assert_eq!(
            PotAmount::parse("99999999999999999999"),
            PotAmount::Number(i64::MAX)
        );
    }
}
