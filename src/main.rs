use clap::Parser;
use healthwatch::cli::{
    handle_classify, handle_completions, handle_config_init, handle_replay, handle_watch,
    load_config, Cli, Commands, ConfigCommands,
};
use std::io;

async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Replay(args) => {
            let config = load_config(&args.monitor)?;
            healthwatch::logging::init_tracing(&config.logging)?;
            let output = handle_replay(&args, &config).await?;
            println!("{}", output);
        }
        Commands::Watch(args) => {
            let config = load_config(&args.monitor)?;
            healthwatch::logging::init_tracing(&config.logging)?;
            handle_watch(&args, &config, &mut io::stdout()).await?;
        }
        Commands::Classify(args) => println!("{}", handle_classify(&args)?),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args)?,
        },
        Commands::Completions(args) => handle_completions(&args, &mut io::stdout()),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
