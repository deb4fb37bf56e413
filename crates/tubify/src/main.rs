use std::fs;
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{Input, theme::ColorfulTheme};
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use tubify_config::{
    CONFIG_KEYS, TubifyConfigData, config_exists, get_config_value, load_config, open_in_editor,
    resolve_json_output, resolve_simple_output, resolve_spotify_auth, resolve_youtube_key,
    save_config, set_config_value,
};
use tubify_convert::{Converter, ConverterConfig};
use tubify_core::{ConversionResult, ReqwestTransport, Service, TubifyError, TubifyResult};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Open config file in editor
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Pretty,
    Simple,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tubify")]
#[command(version, about = "Convert between Spotify, YouTube and YouTube Music links", long_about = None)]
struct Cli {
    /// Treat every input as a song title instead of a link
    #[arg(long)]
    title: bool,
    /// Read inputs from a file, one per line
    #[arg(long)]
    input: Option<String>,
    /// Print only the resolved URLs
    #[arg(long)]
    simple: bool,
    /// Print results as JSON
    #[arg(long)]
    json: bool,
    /// Log requests and token activity to stderr
    #[arg(short, long)]
    verbose: bool,
    #[arg(value_name = "LINK_OR_TITLE")]
    inputs: Vec<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Handle config commands first
    if let Some(Commands::Config { action }) = cli.command {
        if let Err(err) = handle_config_command(action) {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
        return;
    }

    let mut config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", style("Error:").red());
            std::process::exit(1);
        }
    };

    let mut inputs = gather_inputs(&cli).unwrap_or_else(|err| {
        eprintln!("{} {err}", style("Error:").red());
        std::process::exit(1);
    });

    if inputs.is_empty() {
        eprintln!("{} no links or titles provided", style("Error:").red());
        std::process::exit(1);
    }

    prompt_first_time_setup(&mut config);

    let converter = build_converter(&config).unwrap_or_else(|err| {
        eprintln!("{} {err}", style("Error:").red());
        std::process::exit(1);
    });

    let mode = output_mode(&cli, &config);
    let mut success = 0usize;
    let mut failed = 0usize;

    for input in inputs.drain(..) {
        let result = if cli.title {
            converter.from_title(&input).await
        } else {
            converter.convert(&input).await
        };
        match result {
            Ok(result) => {
                success += 1;
                print_result(&result, mode);
            }
            Err(err) => {
                failed += 1;
                eprintln!("{} {input}: {err}", style("Failed").red());
                if matches!(err, TubifyError::NotConfigured(_)) {
                    eprintln!(
                        "  {} run `tubify config set youtube.api_key <KEY>` and set spotify.client_id / spotify.client_secret",
                        style("Hint:").yellow()
                    );
                }
            }
        }
    }

    if mode == OutputMode::Pretty {
        print_summary(success + failed, success, failed);
    }
    if failed > 0 {
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .init();
}

fn build_converter(config: &TubifyConfigData) -> TubifyResult<Converter> {
    let converter_config = ConverterConfig {
        youtube_api_key: resolve_youtube_key(config),
        spotify: resolve_spotify_auth(config)?,
    };
    debug!(spotify = converter_config.spotify.mode_name(), "building converter");
    let transport = Arc::new(ReqwestTransport::new()?);
    Converter::new(converter_config, transport)
}

fn output_mode(cli: &Cli, config: &TubifyConfigData) -> OutputMode {
    if cli.json || resolve_json_output(config).unwrap_or(false) {
        OutputMode::Json
    } else if cli.simple || resolve_simple_output(config).unwrap_or(false) {
        OutputMode::Simple
    } else {
        OutputMode::Pretty
    }
}

fn gather_inputs(cli: &Cli) -> Result<Vec<String>, TubifyError> {
    let mut inputs = cli.inputs.clone();

    if let Some(path) = &cli.input {
        let content = fs::read_to_string(path)
            .map_err(|err| TubifyError::Config(format!("failed to read input file: {err}")))?;
        inputs.extend(parse_lines(&content));
    }

    if inputs.is_empty() && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|err| TubifyError::Config(format!("failed to read stdin: {err}")))?;
        inputs.extend(parse_lines(&buffer));
    }

    Ok(inputs)
}

fn parse_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect()
}

fn prompt_first_time_setup(config: &mut TubifyConfigData) {
    // An existing config file is never re-prompted
    if config_exists().unwrap_or(false) || !io::stdin().is_terminal() {
        return;
    }
    let spotify_ready = resolve_spotify_auth(config).is_ok_and(|auth| auth.is_enabled());
    if resolve_youtube_key(config).is_some() && spotify_ready {
        return;
    }

    let theme = ColorfulTheme::default();
    println!(
        "{} Let's configure your tubify credentials",
        style("First-time setup:").bold().cyan()
    );

    config.youtube.api_key = prompt_optional(&theme, "YouTube Data API key");
    config.spotify.client_id = prompt_optional(&theme, "Spotify client id");
    config.spotify.client_secret = prompt_optional(&theme, "Spotify client secret");

    // Always create config file on first run
    if let Err(err) = save_config(config) {
        warn!(%err, "failed to save config");
        eprintln!("{} {err}", style("Warning:").yellow());
    } else {
        println!(
            "{} Config file created at ~/.tubify/config.toml",
            style("✓").green()
        );
    }
}

fn prompt_optional(theme: &ColorfulTheme, prompt: &str) -> Option<String> {
    let input: String = Input::with_theme(theme)
        .with_prompt(format!("{prompt} (press Enter to skip)"))
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();
    let input = input.trim().to_string();
    (!input.is_empty()).then_some(input)
}

fn handle_config_command(action: ConfigAction) -> TubifyResult<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = load_config()?;
            match get_config_value(&config, &key) {
                Some(v) => println!("{key} = {v}"),
                None => println!("{key} = <null>"),
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            set_config_value(&key, &value)?;
            println!("{} Set {key} = {value}", style("✓").green());
            Ok(())
        }
        ConfigAction::List => {
            let config = load_config()?;
            println!("Current configuration:");
            let mut section = "";
            for key in CONFIG_KEYS {
                let (current, name) = key.split_once('.').unwrap_or(("", key));
                if current != section {
                    println!("\n[{current}]");
                    section = current;
                }
                let value = get_config_value(&config, key);
                println!("{name} = {}", display_config_value(name, value.as_deref()));
            }
            Ok(())
        }
        ConfigAction::Edit => {
            open_in_editor()?;
            Ok(())
        }
    }
}

fn display_config_value(name: &str, value: Option<&str>) -> String {
    match value {
        None => "<null>".to_string(),
        Some(_) if name.contains("secret") || name.contains("key") || name.contains("code") => {
            "<set>".to_string()
        }
        Some(value) => value.to_string(),
    }
}

fn print_result(result: &ConversionResult, mode: OutputMode) {
    match mode {
        OutputMode::Json => match serde_json::to_string_pretty(result) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("{} {err}", style("Error:").red()),
        },
        OutputMode::Simple => {
            for service in [Service::YouTube, Service::YouTubeMusic, Service::Spotify] {
                let url = result.url_for(service);
                if !url.is_empty() {
                    println!("{url}");
                }
            }
        }
        OutputMode::Pretty => {
            let source = result
                .source
                .map(|service| service.display_name())
                .unwrap_or("Title");
            println!("{} {source} - {}", style("From:").cyan(), result.name);
            for service in [Service::YouTube, Service::YouTubeMusic, Service::Spotify] {
                let url = result.url_for(service);
                let label = format!("{}:", service.display_name());
                if url.is_empty() {
                    println!("  {} (no match)", style(label).red());
                } else {
                    println!("  {} {url}", style(label).green());
                }
            }
            println!();
        }
    }
}

fn print_summary(total: usize, success: usize, failed: usize) {
    println!(
        "{} Total: {} | Success: {} | Failed: {}",
        style("Summary:").bold(),
        total,
        success,
        failed
    );
}
