use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub telegram: TelegramConfig,
    pub openai: OpenAiConfig,
    pub chat: ChatConfig,
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot token from @BotFather. Empty means the Telegram transport
    /// cannot start; local mode works without it.
    pub token: String,
    pub api_url: String,
    pub poll_timeout_s: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// Empty key selects the stub reply provider.
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    pub free_messages_per_day: u32,
    pub history_turns: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub dir: String,
    pub db_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig {
                token: "".to_string(),
                api_url: "https://api.telegram.org".to_string(),
                poll_timeout_s: 30,
            },
            openai: OpenAiConfig {
                api_key: "".to_string(),
                api_url: "https://api.openai.com".to_string(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.9,
                max_tokens: 600,
            },
            chat: ChatConfig {
                free_messages_per_day: 15,
                history_turns: 16,
            },
            data: DataConfig {
                dir: "data".to_string(),
                db_url: "sqlite://data/lana.db".to_string(),
            },
        }
    }
}

impl Config {
    /// Environment variables take precedence over the config file, so
    /// secrets never need to live on disk.
    pub fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("TELEGRAM_BOT_TOKEN") {
            if !v.is_empty() {
                self.telegram.token = v;
            }
        }
        if let Ok(v) = std::env::var("OPENAI_API_KEY") {
            if !v.is_empty() {
                self.openai.api_key = v;
            }
        }
        if let Ok(v) = std::env::var("LANA_MODEL") {
            if !v.is_empty() {
                self.openai.model = v;
            }
        }
        if let Ok(v) = std::env::var("FREE_MESSAGES_PER_DAY") {
            if let Ok(n) = v.parse() {
                self.chat.free_messages_per_day = n;
            }
        }
        if let Ok(v) = std::env::var("HISTORY_TURNS") {
            if let Ok(n) = v.parse() {
                self.chat.history_turns = n;
            }
        }
        if let Ok(v) = std::env::var("LANA_DB") {
            if !v.is_empty() {
                self.data.db_url = format!("sqlite://{v}");
            }
        }
    }

    /// Upper bound on stored convo rows per user: one user and one
    /// assistant row per remembered turn.
    pub fn history_keep_rows(&self) -> i64 {
        i64::from(self.chat.history_turns) * 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_limits() {
        let config = Config::default();
        assert_eq!(config.chat.free_messages_per_day, 15);
        assert_eq!(config.chat.history_turns, 16);
        assert_eq!(config.history_keep_rows(), 32);
        assert_eq!(config.openai.model, "gpt-4o-mini");
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
