use clap::{ArgGroup, Parser};

pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:3000/api/index";
pub const DEFAULT_USER_ID: i64 = 123456789;

const AFTER_HELP: &str = "\
Examples:
  # Send the /random command
  tgsim --command /random

  # Send a free-form text message
  tgsim --text \"a happy pop song about summer\"

  # Press an inline-keyboard button
  tgsim --callback random_repeat

  # Custom user id and language
  tgsim --command /random --user-id 123456 --language ru

Each flag falls back to its environment variable (WEBHOOK_URL, SECRET_TOKEN,
USER_ID, CHAT_ID, USERNAME, LANGUAGE_CODE) before the built-in default. A
.env file in the working directory is loaded first.";

/// Simulate a Telegram user interacting with a webhook-mode bot deployment.
#[derive(Debug, Parser)]
#[command(
    name = "tgsim",
    version,
    about = "Send synthetic Telegram webhook updates to a bot deployment",
    after_help = AFTER_HELP
)]
#[command(group(
    ArgGroup::new("input")
        .required(true)
        .args(["command", "text", "callback"])
))]
pub struct Cli {
    /// Send a bot command (e.g. "/random", "/help")
    #[arg(long, value_name = "COMMAND")]
    pub command: Option<String>,

    /// Send a free-form text message
    #[arg(long, value_name = "TEXT")]
    pub text: Option<String>,

    /// Simulate a button click carrying this callback data (e.g. "random_repeat")
    #[arg(long, value_name = "DATA")]
    pub callback: Option<String>,

    /// Webhook endpoint the update is POSTed to
    #[arg(long, env = "WEBHOOK_URL", default_value = DEFAULT_WEBHOOK_URL)]
    pub webhook_url: String,

    /// Shared secret sent in the X-Telegram-Bot-Api-Secret-Token header
    #[arg(long, env = "SECRET_TOKEN", hide_env_values = true)]
    pub secret_token: String,

    /// Telegram user id of the simulated sender
    #[arg(long, env = "USER_ID", default_value_t = DEFAULT_USER_ID)]
    pub user_id: i64,

    /// Chat id (defaults to the user id, simulating a private chat)
    #[arg(long, env = "CHAT_ID", allow_negative_numbers = true)]
    pub chat_id: Option<i64>,

    /// Username of the simulated sender
    #[arg(long, env = "USERNAME", default_value = "test_user")]
    pub username: String,

    /// Language code reported for the simulated sender
    #[arg(long = "language", env = "LANGUAGE_CODE", default_value = "en")]
    pub language_code: String,
}

/// Which of the three update shapes this invocation asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(String),
    Text(String),
    Callback(String),
}

/// Identity of the simulated user, fully resolved.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user_id: i64,
    pub chat_id: i64,
    pub username: String,
    pub language_code: String,
}

impl Cli {
    pub fn input(&self) -> Input {
        match (&self.command, &self.text, &self.callback) {
            (Some(command), _, _) => Input::Command(command.clone()),
            (_, Some(text), _) => Input::Text(text.clone()),
            (_, _, Some(data)) => Input::Callback(data.clone()),
            // The "input" arg group rejects the empty invocation before we get here
            (None, None, None) => unreachable!("one input mode is required"),
        }
    }

    pub fn profile(&self) -> Profile {
        Profile {
            user_id: self.user_id,
            chat_id: self.chat_id.unwrap_or(self.user_id),
            username: self.username.clone(),
            language_code: self.language_code.clone(),
        }
    }
}
