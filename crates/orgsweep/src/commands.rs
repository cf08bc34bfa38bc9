use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::ArgMatches;
use tracing::{error, info, warn};

use orgsweep_core::api::{ApiClient, DryRun, EnvToken, HttpClient, OrgApi};
use orgsweep_core::cleaners::CleanContext;
use orgsweep_core::config::{SweepConfig, load_protected_list};
use orgsweep_core::errors::ConfigError;
use orgsweep_core::graph::{ResourceGraph, load_snapshot};
use orgsweep_core::runner::{RunSummary, run_cleanup};

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> SweepConfig {
    match SweepConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.orgsweep/config.toml and ./.orgsweep/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            SweepConfig::default()
        }
    }
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("clean", sub_matches)) => handle_clean_command(sub_matches),
        Some(("inspect", sub_matches)) => handle_inspect_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Apply CLI overrides on top of the loaded config (highest priority).
fn apply_clean_overrides(config: &mut SweepConfig, matches: &ArgMatches) {
    if let Some(org) = matches.get_one::<String>("org") {
        config.api.organization = Some(org.clone());
    }
    if let Some(domain) = matches.get_one::<String>("domain") {
        config.api.domain = domain.clone();
    }
    if let Some(token_env) = matches.get_one::<String>("token-env") {
        config.api.token_env = token_env.clone();
    }
    if let Some(hierarchy) = matches.get_one::<String>("hierarchy") {
        config.snapshot.input = Some(PathBuf::from(hierarchy));
    }
    if let Some(output) = matches.get_one::<String>("output") {
        config.snapshot.output = PathBuf::from(output);
    }
    if let Some(protected) = matches.get_one::<String>("protected") {
        config.protected.file = Some(PathBuf::from(protected));
    }
}

fn handle_clean_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config_with_warning();
    apply_clean_overrides(&mut config, matches);

    let Some(organization) = config.api.organization.clone() else {
        eprintln!("❌ No organization configured. Pass --org or set api.organization in config.");
        return Err(ConfigError::MissingOrganization.into());
    };
    let Some(input) = config.snapshot.input.clone() else {
        eprintln!("❌ No snapshot configured. Pass --hierarchy or set snapshot.input in config.");
        return Err(ConfigError::MissingSnapshot.into());
    };

    let protected = match &config.protected.file {
        Some(path) => load_protected_list(path)?,
        None => BTreeSet::new(),
    };

    let mut graph = load_snapshot(&input)?;
    let dry_run = matches.get_flag("dry-run");

    info!(
        event = "cli.clean_started",
        organization = %organization,
        hierarchy = %input.display(),
        dry_run = dry_run,
        protected = protected.len()
    );

    let http = HttpClient::new(Box::new(EnvToken::new(config.api.token_env.clone())));
    let client: Box<dyn ApiClient> = if dry_run {
        Box::new(DryRun::new(http))
    } else {
        Box::new(http)
    };

    let api = OrgApi::new(&config.api.domain, &organization);
    let ctx = CleanContext::new(client.as_ref(), &api);
    let summary = run_cleanup(&mut graph, &ctx, protected, &config.snapshot.output, dry_run);

    info!(
        event = "cli.clean_completed",
        deleted = summary.totals.deleted,
        skipped = summary.totals.skipped,
        retained = summary.totals.retained
    );

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_run_summary(&organization, &summary, dry_run);
    }

    if !summary.snapshot_saved {
        eprintln!(
            "❌ Failed to write the post-run snapshot to '{}'",
            summary.snapshot_path
        );
        return Err("Snapshot write failed".into());
    }

    Ok(())
}

fn print_run_summary(organization: &str, summary: &RunSummary, dry_run: bool) {
    let mode = if dry_run { " (dry run)" } else { "" };
    println!(
        "🧹 Swept organization '{}'{} in {}ms",
        organization, mode, summary.duration_ms
    );

    for outcome in &summary.cleaners {
        match &outcome.error {
            Some(error) => println!("   {:<14} ⚠️  {}", outcome.name, error),
            None => println!(
                "   {:<14} {} deleted, {} skipped, {} retained",
                outcome.name, outcome.stats.deleted, outcome.stats.skipped, outcome.stats.retained
            ),
        }
    }

    println!(
        "Totals: {} deleted, {} skipped, {} retained",
        summary.totals.deleted, summary.totals.skipped, summary.totals.retained
    );
    if summary.snapshot_saved {
        println!("Snapshot written to {}", summary.snapshot_path);
    }
}

#[derive(serde::Serialize)]
struct SnapshotSummary {
    proxies: usize,
    sharedflows: usize,
    api_products: usize,
    apps: usize,
    developers: usize,
    organization_kvms: usize,
    environment_kvms: usize,
    environments: usize,
}

impl SnapshotSummary {
    fn of(graph: &ResourceGraph) -> Self {
        Self {
            proxies: graph.proxies.len(),
            sharedflows: graph.sharedflows.len(),
            api_products: graph.api_products.len(),
            apps: graph.apps.len(),
            developers: graph.developers.len(),
            organization_kvms: graph.organization_kvms.len(),
            environment_kvms: graph.environments.iter().map(|e| e.kvms.len()).sum(),
            environments: graph.environments.len(),
        }
    }
}

fn handle_inspect_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();

    let Some(path) = matches
        .get_one::<String>("hierarchy")
        .map(PathBuf::from)
        .or_else(|| config.snapshot.input.clone())
    else {
        eprintln!("❌ No snapshot configured. Pass --hierarchy or set snapshot.input in config.");
        return Err(ConfigError::MissingSnapshot.into());
    };

    info!(event = "cli.inspect_started", hierarchy = %path.display());

    let graph = load_snapshot(&path)?;
    let summary = SnapshotSummary::of(&graph);

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Snapshot {}", path.display());
        println!("   proxies:           {}", summary.proxies);
        println!("   sharedflows:       {}", summary.sharedflows);
        println!("   api products:      {}", summary.api_products);
        println!("   apps:              {}", summary.apps);
        println!("   developers:        {}", summary.developers);
        println!("   org kvms:          {}", summary.organization_kvms);
        println!("   environment kvms:  {}", summary.environment_kvms);
        println!("   environments:      {}", summary.environments);
    }

    Ok(())
}
