// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the altinn-test-tokens project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Command line front end of the Altinn test token generator

use std::path::PathBuf;
use std::process;

use altinn_test_tokens::certificates::PemDirectoryStore;
use altinn_test_tokens::config::{output_config_schema, Config};
use altinn_test_tokens::token::{
    dump, EnterpriseRequest, EnterpriseUserRequest, PersonalRequest, TokenError, TokenIssuer,
    ValidatedRequest,
};
use clap::{Args, CommandFactory, Parser, Subcommand};
use log::{debug, info};
use thiserror::Error;

/// Issue signed Altinn test tokens
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Directory holding the <environment>.pem signing keys (overrides config)
    #[arg(long)]
    certificates_dir: Option<PathBuf>,

    /// Token lifetime in seconds when a command sets none (overrides config)
    #[arg(long)]
    default_ttl: Option<u32>,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    show_config_schema: bool,

    /// Only print the token
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Token for an organization
    Enterprise(EnterpriseArgs),
    /// Token for an organization acting on behalf of a user
    EnterpriseUser(EnterpriseUserArgs),
    /// Token for an end user
    Personal(PersonalArgs),
    /// Decode a token without verifying its signature
    Dump {
        #[arg(long)]
        token: String,
    },
}

#[derive(Debug, Args)]
struct EnterpriseArgs {
    #[arg(long)]
    env: String,
    /// Scopes separated by commas or spaces
    #[arg(long)]
    scopes: String,
    #[arg(long)]
    org: String,
    #[arg(long)]
    org_no: String,
    #[arg(long)]
    supplier_org_no: Option<String>,
    #[arg(long)]
    ttl: Option<u32>,
    #[arg(long)]
    delegation_source: Option<String>,
    /// Also print the decoded token
    #[arg(long)]
    dump: bool,
}

#[derive(Debug, Args)]
struct EnterpriseUserArgs {
    #[arg(long)]
    env: String,
    #[arg(long)]
    scopes: String,
    #[arg(long)]
    org: Option<String>,
    #[arg(long)]
    org_no: String,
    #[arg(long)]
    supplier_org_no: Option<String>,
    #[arg(long)]
    party_id: String,
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    user_name: String,
    #[arg(long)]
    ttl: Option<u32>,
    #[arg(long)]
    delegation_source: Option<String>,
    #[arg(long)]
    dump: bool,
}

#[derive(Debug, Args)]
struct PersonalArgs {
    #[arg(long)]
    env: String,
    #[arg(long)]
    scopes: String,
    #[arg(long)]
    user_id: String,
    #[arg(long)]
    party_id: String,
    #[arg(long)]
    pid: String,
    #[arg(long, default_value = "3")]
    auth_lvl: String,
    #[arg(long)]
    consumer_org_no: String,
    #[arg(long)]
    user_name: String,
    #[arg(long)]
    client_amr: String,
    #[arg(long)]
    ttl: Option<u32>,
    #[arg(long)]
    dump: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Configuration loading failed: {0:#}")]
    Config(anyhow::Error),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl CliError {
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 1,
            CliError::Token(error) => error.exit_code(),
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        config: config_path,
        certificates_dir,
        default_ttl,
        show_config_schema,
        quiet,
        command,
    } = cli;

    if show_config_schema {
        return output_config_schema().map_err(CliError::Config);
    }

    let Some(command) = command else {
        Cli::command()
            .print_help()
            .map_err(|e| CliError::Config(e.into()))?;
        return Ok(());
    };

    let load_config = move || -> Result<Config, CliError> {
        let mut config = Config::from_file(&config_path).map_err(CliError::Config)?;
        config.apply_args(certificates_dir, default_ttl);
        debug!("Using signing keys from {:?}", config.certificates.directory);
        Ok(config)
    };

    let (config, validated, show_dump) = match command {
        Command::Dump { token } => {
            println!("{}", dump(&token)?);
            return Ok(());
        }
        Command::Enterprise(args) => {
            let config = load_config()?;
            let validated = EnterpriseRequest {
                env: args.env,
                scopes: args.scopes,
                org: args.org,
                org_no: args.org_no,
                supplier_org_no: args.supplier_org_no,
                ttl: args.ttl,
                delegation_source: args.delegation_source,
            }
            .validate(&config, config.token.default_ttl)?;
            (config, validated, args.dump)
        }
        Command::EnterpriseUser(args) => {
            let config = load_config()?;
            let validated = EnterpriseUserRequest {
                env: args.env,
                scopes: args.scopes,
                org: args.org,
                org_no: args.org_no,
                supplier_org_no: args.supplier_org_no,
                party_id: args.party_id,
                user_id: args.user_id,
                user_name: args.user_name,
                ttl: args.ttl,
                delegation_source: args.delegation_source,
            }
            .validate(&config, config.token.default_ttl)?;
            (config, validated, args.dump)
        }
        Command::Personal(args) => {
            let config = load_config()?;
            let validated = PersonalRequest {
                env: args.env,
                scopes: args.scopes,
                user_id: args.user_id,
                party_id: args.party_id,
                pid: args.pid,
                auth_lvl: args.auth_lvl,
                consumer_org_no: args.consumer_org_no,
                user_name: args.user_name,
                client_amr: args.client_amr,
                ttl: args.ttl,
            }
            .validate(&config, config.token.default_ttl)?;
            (config, validated, args.dump)
        }
    };

    let issuer = TokenIssuer::new(PemDirectoryStore::new(&config.certificates.directory));
    let token = issue(&issuer, validated, quiet).await?;

    if show_dump {
        println!();
        println!("{}", dump(&token)?);
    }

    Ok(())
}

async fn issue(
    issuer: &TokenIssuer<PemDirectoryStore>,
    (env, params, ttl): ValidatedRequest,
    quiet: bool,
) -> Result<String, TokenError> {
    let token = issuer.issue(&env, &params, ttl).await?;
    info!("Issued {} token for {}", params.flavor(), env);

    if quiet {
        println!("{}", token);
    } else {
        println!("✅ Token created successfully!");
        println!("🌍 Environment: {}", env);
        println!("🏷️  Flavor: {}", params.flavor());
        println!("⏱️  Duration: {} seconds", ttl);
        println!("🎫 Token: {}", token);
    }

    Ok(token)
}
