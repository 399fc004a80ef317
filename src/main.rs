use clap::Parser;
use json_hydrate::config::cli::DEFAULT_CONFIG_FILE;
use json_hydrate::config::{Command, HydrateArgs, MovieArgs, OutputFormat};
use json_hydrate::utils::error::ErrorSeverity;
use json_hydrate::utils::output::{render_csv, render_json};
use json_hydrate::utils::validation::{validate_path, Validate};
use json_hydrate::utils::logger;
use json_hydrate::{
    hydrate_record, hydrate_records, AppConfig, CliConfig, Collection, EnvToken, FetchClient,
    HydrateOptions, MovieService, NoToken, Result,
};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting json-hydrate CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let outcome = match &cli.command {
        Command::Hydrate(args) => run_hydrate(&config, args),
        Command::Movie(args) => run_movie(&config, args).await,
    };

    match outcome {
        Ok(()) => {
            tracing::info!("✅ Done");
        }
        Err(e) => {
            tracing::error!(
                "❌ json-hydrate failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            AppConfig::from_file(path)?
        }
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            tracing::info!("📁 Loading configuration from: {}", DEFAULT_CONFIG_FILE);
            AppConfig::from_file(DEFAULT_CONFIG_FILE)?
        }
        None => {
            tracing::debug!("No configuration file, using defaults");
            AppConfig::default()
        }
    };
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

fn read_input(path: Option<&str>) -> Result<serde_json::Value> {
    let content = match path {
        Some(path) => {
            validate_path("input", path)?;
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&content)?)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            validate_path("output", path)?;
            std::fs::write(path, content)?;
            tracing::info!("📁 Output saved to: {}", path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn options(config: &AppConfig, ignore_errors: bool) -> HydrateOptions {
    HydrateOptions {
        ignore_errors: ignore_errors || config.hydration.ignore_errors,
    }
}

fn run_hydrate(config: &AppConfig, args: &HydrateArgs) -> Result<()> {
    let template = config.template(&args.template)?;
    let raw = read_input(args.input.as_deref())?;

    let rendered = if args.single {
        let entity = hydrate_record(&raw, &template)?;
        match args.format {
            OutputFormat::Json => render_json(&entity)?,
            OutputFormat::Csv => render_csv(&template, std::slice::from_ref(&entity))?,
        }
    } else {
        let collection = hydrate_records(
            &raw,
            Collection::default(),
            || template.clone(),
            options(config, args.ignore_errors),
        )?;
        tracing::info!("✅ Hydrated {} records", collection.len());
        match args.format {
            OutputFormat::Json => render_json(&collection)?,
            OutputFormat::Csv => render_csv(&template, &collection.data)?,
        }
    };

    write_output(args.output.as_deref(), &rendered)
}

async fn run_movie(config: &AppConfig, args: &MovieArgs) -> Result<()> {
    let timeout = Duration::from_secs(config.timeout_seconds());
    let client = match &config.api.token_env {
        Some(var) => FetchClient::with_timeout(EnvToken::new(var.as_str()), timeout)?,
        None => FetchClient::with_timeout(NoToken, timeout)?,
    };
    let service =
        MovieService::new(client, config).with_options(options(config, args.ignore_errors));

    let rendered = if args.search {
        render_json(&service.search_movies(&args.title).await?)?
    } else {
        render_json(&service.fetch_movie(&args.title).await?)?
    };
    write_output(None, &rendered)
}
