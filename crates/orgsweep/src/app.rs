use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn build_cli() -> Command {
    Command::new("orgsweep")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tear down an API organization's resources in dependency order")
        .long_about(
            "orgsweep reads a hierarchy snapshot of an API-management organization and \
             deletes its resources in dependency order: proxies first, then shared flows, \
             products, apps and developers, key/value maps, environments, reports, data \
             collectors, environment groups, and finally runtime instances. Resources that \
             are still depended upon are skipped, and the updated snapshot is written back \
             so a later run can finish the job.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("clean")
                .about("Run the full cleanup against the remote organization")
                .arg(
                    Arg::new("org")
                        .long("org")
                        .short('o')
                        .help("Organization to sweep (overrides config)"),
                )
                .arg(
                    Arg::new("domain")
                        .long("domain")
                        .help("API host to send requests to (overrides config)"),
                )
                .arg(
                    Arg::new("hierarchy")
                        .long("hierarchy")
                        .help("Path to the hierarchy snapshot to read (overrides config)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("Path to write the post-run snapshot to (overrides config)"),
                )
                .arg(
                    Arg::new("protected")
                        .long("protected")
                        .help("Path to a file naming proxies that must never be deleted"),
                )
                .arg(
                    Arg::new("token-env")
                        .long("token-env")
                        .help("Environment variable holding the bearer token (overrides config)"),
                )
                .arg(
                    Arg::new("dry-run")
                        .long("dry-run")
                        .help("Log every delete instead of sending it")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output the run summary in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Summarize a hierarchy snapshot without touching the remote")
                .arg(
                    Arg::new("hierarchy")
                        .help("Path to the hierarchy snapshot (defaults to config)")
                        .index(1),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output in JSON format")
                        .action(ArgAction::SetTrue),
                ),
        )
}

#[allow(dead_code)]
pub fn get_matches() -> ArgMatches {
    build_cli().get_matches()
}
