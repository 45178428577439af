//! Telegram update handlers.
//!
//! Each handler converts a teloxide update into a `dockbot-core` `IncomingUpdate`
//! and hands it to `ContainerBot`. Errors are returned to the dispatcher, whose
//! error handler logs them and drops the update.

use std::sync::Arc;

use teloxide::types::{CallbackQuery, Message, User};

use dockbot_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{self, Command, IncomingUpdate},
};

use crate::router::AppState;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

fn user_id(user: &User) -> UserId {
    UserId(user.id.0 as i64)
}

fn message_ref(msg: &Message) -> MessageRef {
    MessageRef {
        chat_id: ChatId(msg.chat.id.0),
        message_id: MessageId(msg.id.0),
    }
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some((name, args)) = msg.text().and_then(Command::parse_text) else {
        return Ok(());
    };
    let Some(user) = msg.from() else {
        return Ok(());
    };

    let cmd = Command {
        chat_id: ChatId(msg.chat.id.0),
        user_id: user_id(user),
        display_name: user.first_name.clone(),
        name,
        args,
    };

    state.bot.handle(IncomingUpdate::Command(cmd)).await?;
    Ok(())
}

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> HandlerResult {
    let message = q.message.as_ref().map(message_ref);

    let update = IncomingUpdate::Callback(types::CallbackQuery {
        user_id: user_id(&q.from),
        display_name: q.from.first_name.clone(),
        callback_id: q.id.clone(),
        data: q.data.clone().unwrap_or_default(),
        message,
    });

    state.bot.handle(update).await?;
    Ok(())
}
