use clap::Parser;
use feedback_widget::cli::commands::{cmd_classify, cmd_locate, cmd_report, cmd_serialize};
use feedback_widget::cli::config::{Cli, Commands, load_config, merge_overrides};
use feedback_widget::cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), feedback_widget::WidgetError> {
    // CLI > config file > defaults
    let config = merge_overrides(load_config(cli.config.as_deref())?, cli);

    let output = match &cli.command {
        Commands::Classify { snapshot } => cmd_classify(snapshot)?,
        Commands::Locate { snapshot, target } => cmd_locate(snapshot, target)?,
        Commands::Serialize {
            snapshot,
            target,
            depth,
        } => cmd_serialize(snapshot, target, depth.unwrap_or(config.child_depth))?,
        Commands::Report {
            snapshot,
            target,
            text,
            send,
        } => cmd_report(snapshot, target, text, *send, &config)?,
    };

    print!("{}", output);
    Ok(())
}
