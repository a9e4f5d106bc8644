//! Docbot Web command line
//!
//! Drives the page behaviours headlessly: chat against a live `/chatbot`
//! endpoint, score passwords, run the auth validator.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use dotenvy::dotenv;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use docbot_web::chat::{HttpChatTransport, RecognitionConfig, Sender, SpeechCapability};
use docbot_web::chrome::{self, ChromeSettings};
use docbot_web::config::{AppConfig, Cli, Command};
use docbot_web::dialog::ConsoleDialogs;
use docbot_web::dom::EventType;
use docbot_web::{Page, PageScripts, ScriptDeps, pages};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (M-LOG-STRUCTURED)
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    // Load .env (if present)
    let _ = dotenv();

    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli).context("Configuration error")?;

    info!(
        name: "config.loaded",
        base_url = %config.chat.base_url,
        endpoint = %config.chat.endpoint,
        "Configuration loaded"
    );

    match cli.command {
        Some(Command::Chat { messages }) => run_chat(&config, &messages).await,
        Some(Command::Strength { password }) => {
            let score = chrome::score(&password);
            let label = chrome::classify(&password).map_or("-", |s| s.label());
            println!("{score} {label}");
            Ok(())
        }
        Some(Command::Validate {
            signup,
            username,
            email,
            password,
            confirm,
        }) => run_validate(&config, signup, [username, email, password, confirm]),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

fn deps(config: &AppConfig) -> anyhow::Result<ScriptDeps> {
    let transport = HttpChatTransport::from_config(&config.chat)?;
    Ok(ScriptDeps {
        transport: Arc::new(transport),
        // No speech engine on the terminal.
        speech: SpeechCapability::Unsupported,
        recognition: RecognitionConfig::from(&config.speech),
        chrome: ChromeSettings::from(&config.chrome),
    })
}

async fn run_chat(config: &AppConfig, messages: &[String]) -> anyhow::Result<()> {
    let page = Page::new(pages::chat_page(), Arc::new(ConsoleDialogs));
    let scripts = PageScripts::mount(&page, deps(config)?)?;
    let Some(widget) = scripts.chat().cloned() else {
        bail!("chat page has no chat widget");
    };

    for message in messages {
        widget.set_input(message.as_str());
        page.dispatch(widget.form(), EventType::Submit);
        page.run_until_idle().await;
    }

    for message in widget.messages() {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Bot => "bot",
        };
        println!("{who}: {}", message.text);
    }

    scripts.dispose();
    Ok(())
}

fn run_validate(config: &AppConfig, signup: bool, values: [String; 4]) -> anyhow::Result<()> {
    let doc = if signup {
        pages::signup_page()
    } else {
        pages::login_page()
    };
    let page = Page::new(doc, Arc::new(ConsoleDialogs));
    let scripts = PageScripts::mount(&page, deps(config)?)?;

    let form = {
        let mut doc = page.document();
        for (id, value) in ["username", "email", "password", "confirm_password"]
            .into_iter()
            .zip(values)
        {
            if let Some(node) = doc.element_by_id(id) {
                doc[node].set_value(value);
            }
        }
        doc.query_selector(".auth-form")?
            .context("page has no auth form")?
    };

    let outcome = page.dispatch(form, EventType::Submit);
    if outcome.default_prevented {
        println!("blocked");
    } else {
        println!("submitted");
    }

    scripts.dispose();
    Ok(())
}
