mod cli;

use audiopress::{config, server, transcode};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: String,
    port: u16,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting Audiopress server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "audiopress=trace,tower_http=debug".to_string()
        } else {
            "audiopress=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Convert { input, output_dir } => {
            convert_file(&input, output_dir.as_deref(), cli.config.as_deref())
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("audiopress {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn convert_file(
    input: &std::path::Path,
    output_dir: Option<&std::path::Path>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let output_dir = output_dir
        .map(|p| p.to_path_buf())
        .or_else(|| input.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    tracing::info!("Converting file: {:?}", input);

    let output = transcode::convert_to_mp3(input, &output_dir, &config.tools)?;

    println!("Output: {}", output.display());
    Ok(())
}

fn check_tools(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking external tools...\n");

    let tool = transcode::check_ffmpeg(&config.tools);

    let status = if tool.available { "✓" } else { "✗" };
    print!("{} {}", status, tool.name);
    if let Some(ref version) = tool.version {
        print!(" ({})", version);
    }
    if let Some(ref path) = tool.path {
        print!(" - {}", path.display());
    }
    println!();

    println!();
    if tool.available {
        println!("ffmpeg is available!");
    } else {
        println!(
            "ffmpeg is missing. Install it system-wide or place the binary in {:?}.",
            config.tools.fallback_dir
        );
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upload ceiling: {} MiB", config.upload.max_size_mb);
            println!("  Fallback dir: {:?}", config.tools.fallback_dir);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Upload ceiling: {} MiB", config.upload.max_size_mb);
        }
    }

    Ok(())
}
