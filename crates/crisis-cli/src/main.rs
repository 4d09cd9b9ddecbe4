use std::io::{self, Write};
use std::sync::Arc;

use advisory_llm::GeminiProvider;
use clap::Parser;
use colored::Colorize;
use crisis_core::{ChatRole, Config, Coordinates, DisasterKind, DISASTER_CATALOG};
use session_orchestrator::{
    LocationProvider, SessionOrchestrator, StaticLocationProvider, UnsupportedLocationProvider,
    UnsupportedSpeechRecognizer, VoiceInputController,
};

mod logging;

use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "crisis-cli")]
#[command(about = "Emergency assistance in the terminal")]
#[command(version)]
struct Cli {
    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY")]
    api_key: Option<String>,

    /// Gemini API base URL
    #[arg(long, env = "API_BASE")]
    api_base: Option<String>,

    /// Model name
    #[arg(long, env = "MODEL")]
    model: Option<String>,

    /// Device latitude; without a position the session falls back to a typed address
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Device longitude
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,

    /// Start directly with this disaster instead of asking
    #[arg(long)]
    disaster: Option<String>,

    /// Enable debug mode
    #[arg(long, short, default_value = "false")]
    debug: bool,
}

enum ChatExit {
    Reset,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = Config::new();
    if cli.api_key.is_some() {
        config.api_key = cli.api_key.clone();
    }
    if cli.api_base.is_some() {
        config.api_base = cli.api_base.clone();
    }
    if cli.model.is_some() {
        config.model = cli.model.clone();
    }
    if config.api_key.is_none() {
        eprintln!(
            "{}",
            "⚠️  No API key configured; guidance will fall back to standard protocols.".yellow()
        );
    }
    log::debug!("Model: {} at {}", config.model(), config.api_base());

    let provider: Arc<dyn LocationProvider> = match (cli.lat, cli.lng) {
        (Some(lat), Some(lng)) => match Coordinates::new(lat, lng) {
            Some(coords) => Arc::new(StaticLocationProvider::new(coords)),
            None => anyhow::bail!("Invalid coordinates: {}, {}", lat, lng),
        },
        _ => Arc::new(UnsupportedLocationProvider),
    };

    let session = Arc::new(SessionOrchestrator::from_ports(
        Arc::new(GeminiProvider::from_config(&config)),
        provider,
        &config,
    ));
    let voice = VoiceInputController::new(Arc::new(UnsupportedSpeechRecognizer), session.clone());

    println!("{}", "🚨 CrisisGuard".red().bold());
    println!("{}", "Type /quit at any prompt to leave".dimmed());
    if !voice.state().supported {
        println!("{}", "Voice input unavailable in the terminal".dimmed());
    }

    let mut preset = cli.disaster.clone();
    loop {
        let Some(kind) = choose_disaster(preset.take())? else {
            break;
        };

        println!("{}", format!("{} {} selected. Locating...", kind.icon, kind.name).cyan());
        session.start_assessment(kind.name).await;

        if !resolve_location(&session).await? {
            break;
        }

        let label = "Describe the situation (Enter for general protocol, /skip for chat):";
        let Some(severity) = prompt(label)? else {
            break;
        };
        if severity == "/skip" {
            session.skip_to_chat();
        } else {
            println!("{}", "⏳ Contacting AI Command...".dimmed());
            session.generate_protocol(&severity).await;
            print_protocol(&session);
            session.proceed_to_chat();
        }

        match run_chat(&session).await? {
            ChatExit::Reset => {
                session.reset_session();
                println!();
            }
            ChatExit::Quit => break,
        }
    }

    println!("{}", "Stay safe.".cyan());
    Ok(())
}

/// Read one trimmed line. `None` on end of input or `/quit`.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{} ", label.cyan().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Ok(None);
    }
    let input = input.trim();
    if input.eq_ignore_ascii_case("/quit") || input.eq_ignore_ascii_case("exit") {
        return Ok(None);
    }
    Ok(Some(input.to_string()))
}

fn choose_disaster(preset: Option<String>) -> io::Result<Option<&'static DisasterKind>> {
    if let Some(kind) = preset.as_deref().and_then(DisasterKind::find) {
        return Ok(Some(kind));
    }

    for (i, kind) in DISASTER_CATALOG.iter().enumerate() {
        println!("  {:>2}. {} {}", i + 1, kind.icon, kind.name);
    }

    loop {
        let Some(choice) = prompt("What is happening?")? else {
            return Ok(None);
        };
        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| DISASTER_CATALOG.get(i))
            .or_else(|| DisasterKind::find(&choice));
        match picked {
            Some(kind) => return Ok(Some(kind)),
            None => println!("{}", "Pick a number or a name from the list".red()),
        }
    }
}

/// Report the acquired position, or collect a manual address while in
/// fallback mode. Returns false when the user quits.
async fn resolve_location(session: &SessionOrchestrator) -> io::Result<bool> {
    loop {
        let state = session.location().state();
        if !state.is_fallback_mode {
            println!("{}", format!("📍 {}", state.effective_location()).green());
            if let Some(url) = state.map_query_url() {
                println!("{}", url.dimmed());
            }
            return Ok(true);
        }

        if let Some(error) = &state.error {
            println!("{}", format!("📍 GPS unavailable: {}", error).yellow());
        }
        let Some(address) = prompt("Enter your address (/retry for GPS, Enter to skip):")? else {
            return Ok(false);
        };
        if address == "/retry" {
            session.retry_location().await;
            continue;
        }
        session.update_manual_address(address);
        let location = session.location().effective_location();
        if location.is_unknown() {
            println!("{}", "📍 Location unknown; guidance will be general".yellow());
        } else {
            println!("{}", format!("📍 {}", location).green());
        }
        return Ok(true);
    }
}

fn print_protocol(session: &SessionOrchestrator) {
    let state = session.snapshot();
    println!();
    println!("{}", "🛡️  Survival Protocol".red().bold());
    println!("{}", state.protocol);

    if state.resources.is_empty() {
        println!("{}", "No nearby resources found".dimmed());
    } else {
        println!();
        println!("{}", "🏥 Nearby Resources".green().bold());
        for resource in &state.resources {
            println!(
                "  • {} ({:?}) {} ☎ {}",
                resource.name.bold(),
                resource.category,
                resource.address,
                resource.phone
            );
        }
    }
    println!();
}

async fn run_chat(session: &SessionOrchestrator) -> io::Result<ChatExit> {
    println!("{}", "💬 Crisis Response Specialist (/reset to start over)".cyan().bold());

    loop {
        let Some(input) = prompt("You:")? else {
            return Ok(ChatExit::Quit);
        };
        if input.eq_ignore_ascii_case("/reset") {
            return Ok(ChatExit::Reset);
        }
        if input.is_empty() {
            continue;
        }

        session.send_message(&input).await;

        let state = session.snapshot();
        if let Some(reply) = state
            .chat_history
            .last()
            .filter(|m| m.role == ChatRole::Model)
        {
            println!("{} {}", "Specialist:".green().bold(), reply.text);
        }
        println!();
    }
}
