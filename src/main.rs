//! `dreamteller` binary: run the service or drive the form from a terminal.
//!
//! ```bash
//! LLM_API_KEY=sk-... dreamteller serve --port 8001
//! dreamteller dream --text "I was swimming through a library" --format podcast
//! dreamteller session 3f2c... --server http://localhost:8001
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use dreamteller::client::DreamClient;
use dreamteller::config::Config;
use dreamteller::form::DreamForm;
use dreamteller::model::{DreamGeneration, FormatType};
use dreamteller::server::{self, AppState};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SERVER: &str = "http://localhost:8001";

#[derive(Parser)]
#[command(name = "dreamteller", version, about = "Transform your dreams into videos and podcasts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (form page + API)
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Submit a dream and print the story
    Dream {
        #[arg(long, short)]
        text: String,
        #[arg(long, short, default_value = "video")]
        format: FormatType,
        /// Skip the narration track (video only)
        #[arg(long)]
        no_audio: bool,
        #[arg(long)]
        session: Option<String>,
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Show one generation by id
    Show {
        id: String,
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// List generations for a session
    Session {
        session_id: String,
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Post a status check and list recent ones
    Ping {
        #[arg(long, default_value = "dreamteller-cli")]
        client_name: String,
        #[arg(long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = Config::load();

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).compact().init();

    match Cli::parse().command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            info!(
                version = env!("CARGO_PKG_VERSION"),
                model = %config.llm.model,
                "Dream Teller starting"
            );
            let state = Arc::new(AppState::from_config(&config).await?);
            let listener = tokio::net::TcpListener::bind(config.server.bind_addr())
                .await
                .with_context(|| format!("failed to bind {}", config.server.bind_addr()))?;
            server::serve(listener, state, &config).await
        }
        Command::Dream {
            text,
            format,
            no_audio,
            session,
            server,
        } => {
            let client = DreamClient::new(&server)?;
            let mut form = match session {
                Some(id) => DreamForm::with_session(id),
                None => DreamForm::new(),
            };
            form.set_dream_text(text);
            form.select_format(format);
            form.set_include_audio(!no_audio);
            form.submit(&client).await?;

            if let Some(alert) = form.alert() {
                bail!("{}", alert);
            }
            if let Some(dream) = form.result() {
                print_dream(dream);
            }
            Ok(())
        }
        Command::Show { id, server } => {
            let dream = DreamClient::new(&server)?.get_dream(&id).await?;
            print_dream(&dream);
            Ok(())
        }
        Command::Session { session_id, server } => {
            let dreams = DreamClient::new(&server)?.session_dreams(&session_id).await?;
            if dreams.is_empty() {
                println!("No dreams for session {}", session_id);
            }
            for dream in &dreams {
                println!(
                    "{}  {:<7}  {:?}  {}",
                    dream.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    dream.format_type,
                    dream.status,
                    dream.id
                );
            }
            Ok(())
        }
        Command::Ping {
            client_name,
            server,
        } => {
            let client = DreamClient::new(&server)?;
            println!("{}", client.api_info().await?.message);
            let created = client.create_status(&client_name).await?;
            println!("Recorded status check {}", created.id);
            println!("{} status checks on record", client.list_status().await?.len());
            Ok(())
        }
    }
}

fn print_dream(dream: &DreamGeneration) {
    println!("Dream {} ({}, session {})", dream.id, dream.format_type, dream.session_id);
    println!();
    println!("{}", dream.generated_story);
    println!();
    if let Some(url) = &dream.video_url {
        println!("Video: {}", url);
    }
    if let Some(url) = &dream.audio_url {
        println!("Audio: {}", url);
    }
}
