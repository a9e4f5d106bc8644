use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the site serving the chatbot endpoint
    #[arg(long, env = "CHATBOT_URL")]
    pub base_url: Option<String>,

    /// Chat request timeout in seconds
    #[arg(long, env = "CHAT_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send messages through the chat widget and print the transcript
    Chat {
        /// Messages to send, in order
        #[arg(required = true)]
        messages: Vec<String>,
    },
    /// Score a password the way the signup meter does
    Strength {
        password: String,
    },
    /// Run the login or signup validator
    Validate {
        /// Validate the signup form instead of the login form
        #[arg(long)]
        signup: bool,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        confirm: String,
    },
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub chat: ChatConfig,
    pub chrome: ChromeConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    pub base_url: String,
    pub endpoint: String,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChromeConfig {
    pub header_offset: f64,
    pub reveal_margin: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SpeechConfig {
    pub lang: String,
    pub interim_results: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layering: defaults < config file < `DOCBOT_` environment < CLI flags.
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("chat.base_url", "http://127.0.0.1:5000")?
            .set_default("chat.endpoint", "/chatbot")?
            .set_default("chrome.header_offset", 80.0)?
            .set_default("chrome.reveal_margin", 100.0)?
            .set_default("speech.lang", "en-US")?
            .set_default("speech.interim_results", false)?;

        // Explicit file must exist; the cwd fallback is optional.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        } else if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
        }

        // E.g. DOCBOT_CHAT__BASE_URL=http://localhost:8000
        builder = builder.add_source(
            Environment::with_prefix("DOCBOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(url) = &cli.base_url {
            builder = builder.set_override("chat.base_url", url.as_str())?;
        }
        if let Some(secs) = cli.timeout {
            builder = builder.set_override("chat.request_timeout_secs", secs)?;
        }

        builder.build()?.try_deserialize()
    }
}
