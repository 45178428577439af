use crate::domain::{ChatId, MessageRef, UserId};

/// Cross-messenger incoming update model.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Callback(CallbackQuery),
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub display_name: String,
    pub name: String,
    pub args: String,
}

impl Command {
    /// Split `/cmd@botname arg1 ...` into a lowercase command name and its arguments.
    pub fn parse_text(text: &str) -> Option<(String, String)> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text.splitn(2, char::is_whitespace);
        let first = parts.next().unwrap_or("").trim();
        let rest = parts.next().unwrap_or("").trim().to_string();

        let cmd = first
            .trim_start_matches('/')
            .split('@')
            .next()
            .unwrap_or("")
            .to_lowercase();

        if cmd.is_empty() {
            return None;
        }
        Some((cmd, rest))
    }
}

#[derive(Clone, Debug)]
pub struct CallbackQuery {
    pub user_id: UserId,
    pub display_name: String,
    pub callback_id: String,
    pub data: String,
    /// Message the pressed button is attached to.
    pub message: Option<MessageRef>,
}

/// Inline keyboard, one button per row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub buttons: Vec<InlineButton>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    pub fn new(label: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback_data: callback_data.into(),
        }
    }
}

impl InlineKeyboard {
    pub fn new(buttons: Vec<InlineButton>) -> Self {
        Self { buttons }
    }

    pub fn push(mut self, button: InlineButton) -> Self {
        self.buttons.push(button);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_command() {
        assert_eq!(
            Command::parse_text("/list"),
            Some(("list".to_string(), String::new()))
        );
    }

    #[test]
    fn parses_bot_suffix_and_args() {
        assert_eq!(
            Command::parse_text("  /Stop@dock_bot  web  db "),
            Some(("stop".to_string(), "web  db".to_string()))
        );
    }

    #[test]
    fn rejects_non_commands() {
        assert_eq!(Command::parse_text("hello"), None);
        assert_eq!(Command::parse_text("/"), None);
        assert_eq!(Command::parse_text("/@bot"), None);
    }
}
