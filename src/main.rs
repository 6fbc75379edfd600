use anyhow::Context;
use appreg_audit::adapters::outbound::console::StderrProgressReporter;
use appreg_audit::adapters::outbound::network::{
    CachingServicePrincipalRepository, GraphClient, GraphClientConfig,
};
use appreg_audit::application::dto::{AuditRequest, OutputFormat};
use appreg_audit::application::factories::{FormatterFactory, PresenterFactory, PresenterType};
use appreg_audit::application::use_cases::{
    AuditApplicationsUseCase, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CONCURRENT_LOOKUPS,
};
use appreg_audit::audit::policies::RiskPolicy;
use appreg_audit::cli::Args;
use appreg_audit::config::{discover_config, load_config_from_path, ConfigFile};
use appreg_audit::shared::error::ExitCode;
use appreg_audit::shared::Result;
use clap::Parser;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    init_tracing(args.verbose);

    match run(args) {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            for cause in e.chain().skip(1) {
                eprintln!("\nCaused by: {}", cause);
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `--verbose`
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "appreg_audit=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: Args) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let settings = ScanSettings::resolve(&args, config)?;

    // Create adapters (Dependency Injection)
    let client = GraphClient::new(settings.client.clone())?;
    let service_principals = CachingServicePrincipalRepository::new(client.clone());
    let progress_reporter = StderrProgressReporter::new();

    let use_case = AuditApplicationsUseCase::new(
        client.clone(),
        client,
        service_principals,
        progress_reporter,
    )
    .with_policy(settings.policy.clone())
    .with_max_concurrent_lookups(settings.max_concurrent_lookups)
    .with_lookup_timeout(settings.lookup_timeout);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let request = AuditRequest::new(settings.filter.clone());
    let response = runtime.block_on(use_case.execute(request))?;

    eprintln!("{}", FormatterFactory::progress_message(settings.format));
    let formatter = FormatterFactory::create(settings.format);
    let formatted_output = formatter.format(&response.report)?;

    let presenter = PresenterFactory::create(PresenterType::from_output(args.output.clone()));
    presenter.present(&formatted_output)?;

    if args.fail_on_findings && response.has_findings() {
        Ok(ExitCode::FindingsDetected)
    } else {
        Ok(ExitCode::Success)
    }
}

/// Explicit `--config` path, or `appreg-audit.config.yml` in the working directory
fn load_config(args: &Args) -> Result<ConfigFile> {
    if let Some(path) = args.config.as_deref() {
        return load_config_from_path(path);
    }

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(discover_config(&cwd)?.unwrap_or_default())
}

/// Effective settings after merging CLI > config file > defaults
#[derive(Debug)]
struct ScanSettings {
    format: OutputFormat,
    filter: Option<String>,
    client: GraphClientConfig,
    lookup_timeout: Duration,
    max_concurrent_lookups: usize,
    policy: RiskPolicy,
}

impl ScanSettings {
    fn resolve(args: &Args, config: ConfigFile) -> Result<Self> {
        let format = match args.format {
            Some(format) => format,
            None => config.output_format()?.unwrap_or_default(),
        };

        let mut client = GraphClientConfig::new(args.token.clone().unwrap_or_default());
        if let Some(endpoint) = args.endpoint.clone().or(config.endpoint) {
            client.endpoint = endpoint;
        }
        if let Some(endpoint) = args.secondary_endpoint.clone().or(config.secondary_endpoint) {
            client.secondary_endpoint = endpoint;
        }
        if let Some(secs) = config.request_timeout_secs {
            client.request_timeout = Duration::from_secs(secs);
        }

        let mut policy = RiskPolicy::default();
        if let Some(permissions) = config.high_risk_permissions {
            policy = policy.with_high_risk_permissions(permissions);
        }
        if let Some(name) = config.graph_resource_name {
            policy = policy.with_graph_resource_name(name);
        }
        if let Some(days) = config.expiry_threshold_days {
            policy = policy.with_expiry_threshold_days(days);
        }

        Ok(Self {
            format,
            filter: args.filter.clone().or(config.filter),
            client,
            lookup_timeout: config
                .lookup_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_LOOKUP_TIMEOUT),
            max_concurrent_lookups: args
                .max_concurrent_lookups
                .map(usize::from)
                .or(config.max_concurrent_lookups)
                .unwrap_or(DEFAULT_MAX_CONCURRENT_LOOKUPS),
            policy,
        })
    }
}
