//! Command and button handling.
//!
//! Every update is handled on its own with data fetched fresh from the runtime;
//! `ContainerBot` holds only shared, immutable handles.

use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    domain::{ChatId, MessageRef, UserId},
    messaging::{
        port::MessagingPort,
        types::{CallbackQuery, Command, IncomingUpdate, InlineButton, InlineKeyboard},
    },
    runtime::{Container, ContainerRuntime, RuntimeResult},
    Result,
};

pub const SHOW_COMMANDS_LABEL: &str = "Show Commands";
pub const SHOW_COMMANDS_TOKEN: &str = "show_commands";
const STOP_TOKEN_PREFIX: &str = "stop_";

pub const COMMANDS_TEXT: &str = "Available commands:\n\
/list - Lists running Docker containers.\n\
/stop - Stops a running Docker container.";
pub const NO_CONTAINERS_TEXT: &str = "No running containers.";
pub const NO_CONTAINERS_TO_STOP_TEXT: &str = "No running containers to stop.";
const LIST_HEADER: &str = "Running containers:\n";
const STOP_MENU_HEADER: &str = "Select the container to stop:\n";

/// Chat commands the bot reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    List,
    Stop,
}

impl BotCommand {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "start" => Some(Self::Start),
            "list" => Some(Self::List),
            "stop" => Some(Self::Stop),
            _ => None,
        }
    }
}

/// Parsed inline-button payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ShowCommands,
    Stop { container_id: String },
}

impl Action {
    pub fn parse(token: &str) -> Option<Self> {
        if token == SHOW_COMMANDS_TOKEN {
            return Some(Self::ShowCommands);
        }
        match token.strip_prefix(STOP_TOKEN_PREFIX) {
            Some(id) if !id.is_empty() => Some(Self::Stop {
                container_id: id.to_string(),
            }),
            _ => None,
        }
    }

    pub fn token(&self) -> String {
        match self {
            Self::ShowCommands => SHOW_COMMANDS_TOKEN.to_string(),
            Self::Stop { container_id } => format!("{STOP_TOKEN_PREFIX}{container_id}"),
        }
    }
}

pub fn show_commands_button() -> InlineButton {
    InlineButton::new(SHOW_COMMANDS_LABEL, SHOW_COMMANDS_TOKEN)
}

pub fn show_commands_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![show_commands_button()])
}

pub fn welcome_text(display_name: &str) -> String {
    format!(
        "Hello {display_name}! I am your bot for managing Docker. Press the button to see the available commands."
    )
}

/// `/list` reply body.
pub fn render_container_list(containers: &[Container]) -> String {
    if containers.is_empty() {
        return NO_CONTAINERS_TEXT.to_string();
    }
    let mut out = LIST_HEADER.to_string();
    for c in containers {
        out.push_str(&format!("- {} ({})\n", c.name, c.short_id));
    }
    out
}

/// `/stop` reply body and keyboard.
pub fn render_stop_menu(containers: &[Container]) -> (String, InlineKeyboard) {
    if containers.is_empty() {
        return (
            NO_CONTAINERS_TO_STOP_TEXT.to_string(),
            show_commands_keyboard(),
        );
    }

    let keyboard = containers
        .iter()
        .fold(InlineKeyboard::default(), |kb, c| {
            let action = Action::Stop {
                container_id: c.short_id.clone(),
            };
            kb.push(InlineButton::new(
                format!("{} ({})", c.name, c.short_id),
                action.token(),
            ))
        })
        .push(show_commands_button());

    (STOP_MENU_HEADER.to_string(), keyboard)
}

pub fn stop_outcome_text(container_id: &str, outcome: &RuntimeResult<()>) -> String {
    match outcome {
        Ok(()) => format!("Container {container_id} stopped successfully."),
        Err(e) => format!("Error stopping container {container_id}: {e}"),
    }
}

/// The bot session: maps commands and button presses to runtime calls.
pub struct ContainerBot {
    runtime: Arc<dyn ContainerRuntime>,
    messenger: Arc<dyn MessagingPort>,
}

impl ContainerBot {
    pub fn new(runtime: Arc<dyn ContainerRuntime>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self { runtime, messenger }
    }

    pub async fn handle(&self, update: IncomingUpdate) -> Result<()> {
        match update {
            IncomingUpdate::Command(cmd) => self.handle_command(cmd).await,
            IncomingUpdate::Callback(q) => self.handle_callback(q).await,
        }
    }

    /// Unknown commands are ignored.
    pub async fn handle_command(&self, cmd: Command) -> Result<()> {
        let Some(command) = BotCommand::from_name(&cmd.name) else {
            return Ok(());
        };

        info!(
            user = %cmd.display_name,
            user_id = cmd.user_id.0,
            "User {} ({}) has executed the /{} command",
            cmd.display_name,
            cmd.user_id.0,
            cmd.name
        );

        match command {
            BotCommand::Start => self.start(cmd.chat_id, &cmd.display_name).await,
            BotCommand::List => self.list(cmd.chat_id).await,
            BotCommand::Stop => self.stop_menu(cmd.chat_id).await,
        }
    }

    /// Unknown tokens are answered and otherwise ignored.
    pub async fn handle_callback(&self, q: CallbackQuery) -> Result<()> {
        // Answer first so the button does not look stuck.
        self.messenger
            .answer_callback_query(&q.callback_id)
            .await?;

        let Some(action) = Action::parse(&q.data) else {
            return Ok(());
        };

        match action {
            Action::ShowCommands => {
                log_press(&q.display_name, q.user_id, "requested to see the commands");
                let Some(chat_id) = q.message.map(|m| m.chat_id) else {
                    warn!("show_commands pressed without an originating chat");
                    return Ok(());
                };
                self.show_commands(chat_id).await
            }
            Action::Stop { container_id } => {
                log_press(
                    &q.display_name,
                    q.user_id,
                    &format!("requested to stop the container with ID: {container_id}"),
                );
                let Some(msg) = q.message else {
                    warn!(container_id = %container_id, "stop pressed without an originating message");
                    return Ok(());
                };
                self.stop(msg, &container_id).await
            }
        }
    }

    async fn start(&self, chat_id: ChatId, display_name: &str) -> Result<()> {
        self.messenger
            .send_inline_keyboard(chat_id, &welcome_text(display_name), show_commands_keyboard())
            .await?;
        Ok(())
    }

    async fn show_commands(&self, chat_id: ChatId) -> Result<()> {
        self.messenger
            .send_inline_keyboard(chat_id, COMMANDS_TEXT, show_commands_keyboard())
            .await?;
        Ok(())
    }

    async fn list(&self, chat_id: ChatId) -> Result<()> {
        let containers = self.runtime.list_containers().await?;
        self.messenger
            .send_inline_keyboard(
                chat_id,
                &render_container_list(&containers),
                show_commands_keyboard(),
            )
            .await?;
        Ok(())
    }

    async fn stop_menu(&self, chat_id: ChatId) -> Result<()> {
        let containers = self.runtime.list_containers().await?;
        let (text, keyboard) = render_stop_menu(&containers);
        self.messenger
            .send_inline_keyboard(chat_id, &text, keyboard)
            .await?;
        Ok(())
    }

    /// Runtime failures are rendered into the menu message, never propagated.
    async fn stop(&self, msg: MessageRef, container_id: &str) -> Result<()> {
        let outcome = self.runtime.stop_container(container_id).await;
        if let Err(e) = &outcome {
            warn!(container_id = %container_id, error = %e, "failed to stop container");
        }

        self.messenger
            .edit_inline_keyboard(
                msg,
                &stop_outcome_text(container_id, &outcome),
                show_commands_keyboard(),
            )
            .await
    }
}

fn log_press(display_name: &str, user_id: UserId, what: &str) {
    info!(
        user = %display_name,
        user_id = user_id.0,
        "User {} ({}) has {}",
        display_name,
        user_id.0,
        what
    );
}
