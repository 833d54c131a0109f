use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::{error, info};

use core_logging::LoggingPlugin;
use scribe_core::controller::JsonDataProcessor;
use scribe_core::{BuildDefaults, Editor, EditorConfig, PluginDescriptor};

/// Scribe: converts rich-text content through a plugin-configured editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Editor configuration file (.json, .yaml or .toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load JSON content into the editor and print what it serializes back
    Convert {
        /// File holding the JSON content
        input: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the plugins in the order they are loaded
    Plugins,
}

/// Plugins every Scribe build ships with. Logging comes first so it is set
/// up before the others initialize.
fn build_defaults() -> BuildDefaults {
    core_blocks::with_block_plugins(BuildDefaults::new().with_plugin(PluginDescriptor::of::<LoggingPlugin>()))
}

fn load_config(path: Option<&Path>) -> scribe_core::Result<EditorConfig> {
    match path {
        Some(path) => Ok(EditorConfig::from_path(path)?),
        None => Ok(EditorConfig::new()),
    }
}

async fn convert(config: EditorConfig, input: &Path, pretty: bool) -> scribe_core::Result<String> {
    let data = std::fs::read_to_string(input)
        .map_err(|e| scribe_core::Error::Other(format!("Cannot read '{}': {}", input.display(), e)))?;
    let editor = Editor::create_with_defaults(Some(&data), config, build_defaults()).await?;
    if pretty {
        editor.set_data_processor(Box::new(JsonDataProcessor::pretty()));
    }
    let output = editor.get_data()?;
    editor.destroy().await?;
    Ok(output)
}

async fn list_plugins(config: EditorConfig) -> scribe_core::Result<Vec<String>> {
    let editor = Editor::create_with_defaults(None, config, build_defaults()).await?;
    let names = editor.plugins().names();
    editor.destroy().await?;
    Ok(names)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match args.command {
        Commands::Convert { input, pretty } => convert(config, &input, pretty).await.map(|output| println!("{}", output)),
        Commands::Plugins => list_plugins(config).await.map(|names| {
            println!("Plugins in load order:");
            for (index, name) in names.iter().enumerate() {
                println!("  {}. {}", index + 1, name);
            }
        }),
    };

    match result {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
