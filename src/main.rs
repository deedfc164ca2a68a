use aws_bp_check::{cli::Cli, handlers};
use clap::Parser;
use colored::Colorize;
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    if cli.list_rules {
        handlers::handle_list_rules();
        return;
    }

    match handlers::handle_check(&cli).await {
        // Findings are advisory unless asked otherwise.
        Ok(report) if cli.fail_on_findings && report.has_findings() => process::exit(1),
        Ok(_) => {}
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}
