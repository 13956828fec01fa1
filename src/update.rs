use chrono::Utc;
use serde::Serialize;

use crate::cli::Profile;

/// User id stamped on the synthetic bot that authored a callback's
/// originating message. The receiving bot only needs the field present.
const BOT_SENDER_ID: i64 = 987654321;

/// A Telegram user or bot, as embedded in webhook updates.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    pub first_name: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub username: String,
    pub first_name: String,
}

/// One special entity in a message text, e.g. the bot_command span that
/// makes frameworks route "/random" as a command.
#[derive(Debug, Clone, Serialize)]
pub struct MessageEntity {
    #[serde(rename = "type")]
    pub kind: String,
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: User,
    pub chat: Chat,
    pub date: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<MessageEntity>>,
}

/// An inline-keyboard button press, with the message the button lived on.
#[derive(Debug, Clone, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Message,
    pub chat_instance: String,
    pub data: String,
}

/// The webhook envelope for one incoming event.
///
/// See also: <https://core.telegram.org/bots/api#update>.
#[derive(Debug, Clone, Serialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(flatten)]
    pub payload: UpdatePayload,
}

/// Exactly one payload variant is present per update; the enum makes
/// emitting both (or neither) unrepresentable.
#[derive(Debug, Clone, Serialize)]
pub enum UpdatePayload {
    #[serde(rename = "message")]
    Message(Message),
    #[serde(rename = "callback_query")]
    CallbackQuery(CallbackQuery),
}

impl Update {
    /// Human-readable description of the update for the delivery report.
    pub fn kind(&self) -> String {
        match &self.payload {
            UpdatePayload::Message(message) if message.text.starts_with('/') => {
                format!("command ({})", message.text)
            }
            UpdatePayload::Message(_) => "message".to_string(),
            UpdatePayload::CallbackQuery(query) => format!("callback_query ({})", query.data),
        }
    }
}

/// Placeholder id derived from the wall clock; meaningless outside this
/// single request.
fn synthetic_id() -> i64 {
    Utc::now().timestamp_millis() % 1_000_000
}

/// First letter uppercased, rest lowercased, matching how Telegram clients
/// tend to display bare usernames as first names.
fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn sender(profile: &Profile) -> User {
    User {
        id: profile.user_id,
        is_bot: false,
        first_name: capitalized(&profile.username),
        username: profile.username.clone(),
        language_code: Some(profile.language_code.clone()),
    }
}

fn private_chat(profile: &Profile) -> Chat {
    Chat {
        id: profile.chat_id,
        kind: "private".to_string(),
        username: profile.username.clone(),
        first_name: capitalized(&profile.username),
    }
}

fn build_message(profile: &Profile, text: &str, message_id: i64) -> Message {
    Message {
        message_id,
        from: sender(profile),
        chat: private_chat(profile),
        date: Utc::now().timestamp(),
        text: text.to_string(),
        entities: None,
    }
}

/// Update for a free-form text message.
pub fn message_update(profile: &Profile, text: &str) -> Update {
    let message_id = synthetic_id();
    Update {
        update_id: message_id,
        payload: UpdatePayload::Message(build_message(profile, text, message_id)),
    }
}

/// Update for a bot command. Same shape as a text message, plus a
/// bot_command entity spanning the command token (arguments excluded).
pub fn command_update(profile: &Profile, command: &str) -> Update {
    let message_id = synthetic_id();
    let mut message = build_message(profile, command, message_id);

    let length = command
        .split_whitespace()
        .next()
        .unwrap_or(command)
        .chars()
        .count();
    message.entities = Some(vec![MessageEntity {
        kind: "bot_command".to_string(),
        offset: 0,
        length,
    }]);

    Update {
        update_id: message_id,
        payload: UpdatePayload::Message(message),
    }
}

/// Update for a callback query (inline button press). Carries a synthetic
/// originating message so the bot can locate context such as the message
/// it would edit in response.
pub fn callback_update(profile: &Profile, data: &str) -> Update {
    let update_id = synthetic_id();

    let origin = Message {
        message_id: synthetic_id(),
        from: User {
            id: BOT_SENDER_ID,
            is_bot: true,
            first_name: "Test Bot".to_string(),
            username: "test_bot".to_string(),
            language_code: None,
        },
        chat: private_chat(profile),
        date: Utc::now().timestamp(),
        text: "Simulated message with inline keyboard".to_string(),
        entities: None,
    };

    Update {
        update_id,
        payload: UpdatePayload::CallbackQuery(CallbackQuery {
            id: format!("test_callback_{update_id}"),
            from: sender(profile),
            message: origin,
            chat_instance: format!("test_instance_{}", profile.user_id),
            data: data.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            user_id: 42,
            chat_id: 42,
            username: "test_user".to_string(),
            language_code: "en".to_string(),
        }
    }

    fn payload_keys(update: &Update) -> Vec<String> {
        let value = serde_json::to_value(update).unwrap();
        ["message", "callback_query"]
            .iter()
            .filter(|key| value.get(**key).is_some())
            .map(|key| key.to_string())
            .collect()
    }

    #[test]
    fn test_message_update_carries_text_and_sender() {
        let update = message_update(&profile(), "a happy pop song about summer");
        let value = serde_json::to_value(&update).unwrap();

        assert_eq!(
            value["message"]["text"],
            "a happy pop song about summer"
        );
        assert_eq!(value["message"]["from"]["id"], 42);
        assert_eq!(value["message"]["from"]["is_bot"], false);
        assert_eq!(value["message"]["from"]["first_name"], "Test_user");
        assert_eq!(value["message"]["from"]["language_code"], "en");
        assert_eq!(value["message"]["chat"]["id"], 42);
        assert_eq!(value["message"]["chat"]["type"], "private");
        // Plain messages carry no entities at all
        assert!(value["message"].get("entities").is_none());
    }

    #[test]
    fn test_command_update_tags_bot_command_entity() {
        let update = command_update(&profile(), "/random now please");
        let value = serde_json::to_value(&update).unwrap();

        assert_eq!(value["message"]["text"], "/random now please");
        let entity = &value["message"]["entities"][0];
        assert_eq!(entity["type"], "bot_command");
        assert_eq!(entity["offset"], 0);
        // Only "/random", not the arguments
        assert_eq!(entity["length"], 7);
    }

    #[test]
    fn test_callback_update_carries_data_and_origin() {
        let update = callback_update(&profile(), "random_repeat");
        let value = serde_json::to_value(&update).unwrap();

        let query = &value["callback_query"];
        assert_eq!(query["data"], "random_repeat");
        assert_eq!(query["from"]["id"], 42);
        assert_eq!(query["from"]["is_bot"], false);
        assert_eq!(query["message"]["from"]["is_bot"], true);
        assert_eq!(query["message"]["chat"]["id"], 42);
        assert_eq!(query["chat_instance"], "test_instance_42");
        assert!(query["id"].as_str().unwrap().starts_with("test_callback_"));
    }

    #[test]
    fn test_exactly_one_payload_variant_is_emitted() {
        let p = profile();
        assert_eq!(payload_keys(&command_update(&p, "/start")), ["message"]);
        assert_eq!(payload_keys(&message_update(&p, "hello")), ["message"]);
        assert_eq!(
            payload_keys(&callback_update(&p, "random_repeat")),
            ["callback_query"]
        );
    }

    #[test]
    fn test_chat_id_override_flows_into_payload() {
        let mut p = profile();
        p.chat_id = -100555;
        let update = message_update(&p, "hi");
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["message"]["chat"]["id"], -100555);
        assert_eq!(value["message"]["from"]["id"], 42);
    }

    #[test]
    fn test_kind_describes_each_variant() {
        let p = profile();
        assert_eq!(command_update(&p, "/start").kind(), "command (/start)");
        assert_eq!(message_update(&p, "hello").kind(), "message");
        assert_eq!(
            callback_update(&p, "random_repeat").kind(),
            "callback_query (random_repeat)"
        );
    }

    #[test]
    fn test_capitalized_handles_edge_cases() {
        assert_eq!(capitalized("test_user"), "Test_user");
        assert_eq!(capitalized("ALICE"), "Alice");
        assert_eq!(capitalized(""), "");
    }
}
