/* This file is part of EcoSphere DAO
 *
 * Copyright (C) 2024-2026 EcoSphere DAO contributors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as
 * published by the Free Software Foundation, either version 3 of the
 * License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use std::{process::exit, time::Duration};

use log::error;
use ethers::types::Address;
use serde::Deserialize;
use structopt::StructOpt;
use structopt_toml::StructOptToml;
use url::Url;

use ecosphere::{
    cli_desc,
    cli_util::ShellCommand,
    eth::{self, ContractAddresses, EthSettings},
    interactive::{handle_command, interactive},
    util::{
        cli::{init_logger, spawn_config},
        path::get_config_path,
    },
    watch::watch,
    Eco, Error, ErrorClass, Result,
};

const CONFIG_FILE: &str = "ecosphere.toml";
const CONFIG_FILE_CONTENTS: &str = include_str!("../ecosphere.toml");

#[derive(Clone, Debug, Deserialize, StructOpt, StructOptToml)]
#[serde(default)]
#[structopt(name = "ecosphere", about = cli_desc!())]
struct Args {
    #[structopt(short, long)]
    /// Configuration file to use
    config: Option<String>,

    #[structopt(short, long, default_value = "http://127.0.0.1:8545")]
    /// Ethereum JSON-RPC endpoint
    endpoint: Url,

    #[structopt(long, default_value = "31337")]
    /// Chain ID the contracts are deployed on
    chain_id: u64,

    #[structopt(long, default_value = "0x5FbDB2315678afecb367f032d93F642f64180aa3")]
    /// EcoToken contract address
    token_address: String,

    #[structopt(long, default_value = "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512")]
    /// DAOGovernance contract address
    dao_address: String,

    #[structopt(long, default_value = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0")]
    /// ESGCredits contract address
    esg_address: String,

    #[structopt(long)]
    /// Hex-encoded private key to sign transactions with
    private_key: Option<String>,

    #[structopt(subcommand)]
    /// Sub command to execute
    command: Subcmd,

    #[structopt(short, long)]
    /// Set log file to ouput into
    log: Option<String>,

    #[structopt(short, parse(from_occurrences))]
    /// Increase verbosity (-vv supported)
    verbose: u8,
}

#[derive(Clone, Debug, Deserialize, StructOpt)]
enum Subcmd {
    /// Show token balances, voting power and ESG credits
    Dashboard,

    /// List governance proposals
    Proposals,

    /// Show a single proposal
    Proposal {
        /// Proposal ID
        proposal_id: u64,
    },

    /// Submit a new proposal
    Propose {
        /// Proposal description
        description: Vec<String>,
    },

    /// Vote on an open proposal
    Vote {
        /// Proposal ID
        proposal_id: u64,
    },

    /// Execute a proposal that reached quorum
    Execute {
        /// Proposal ID
        proposal_id: u64,
    },

    /// List ESG credits on offer
    Market,

    /// Buy ESG credits
    Buy {
        /// Credit ID to buy
        credit_id: u64,

        /// Number of credits
        amount: u64,
    },

    /// Sell ESG credits
    Sell {
        #[structopt(long, default_value = "1")]
        /// Credit ID to sell
        credit_id: u64,

        /// Number of credits
        amount: u64,
    },

    /// Send ECO to an account on another chain
    Transfer {
        /// Recipient address
        to: Address,

        /// Amount in whole ECO
        amount: u64,

        /// Chain ID the tokens are released on
        destination_chain_id: u64,
    },

    /// Mark a project as verified
    Verify {
        /// Project ID
        project_id: u64,
    },

    /// Start an interactive shell
    Interactive,

    /// Reprint the proposal list on every new block
    Watch {
        #[structopt(long, default_value = "5")]
        /// Polling interval in seconds
        interval: u64,
    },
}

impl Subcmd {
    /// Shell equivalent of a one-shot subcommand.
    fn into_shell_command(self) -> Option<ShellCommand> {
        let command = match self {
            Subcmd::Dashboard => ShellCommand::Dashboard,
            Subcmd::Proposals => ShellCommand::Proposals,
            Subcmd::Proposal { proposal_id } => ShellCommand::Proposal(proposal_id),
            Subcmd::Propose { description } => ShellCommand::Propose(description.join(" ")),
            Subcmd::Vote { proposal_id } => ShellCommand::Vote(proposal_id),
            Subcmd::Execute { proposal_id } => ShellCommand::Execute(proposal_id),
            Subcmd::Market => ShellCommand::Market,
            Subcmd::Buy { credit_id, amount } => ShellCommand::Buy { credit_id, amount },
            Subcmd::Sell { credit_id, amount } => ShellCommand::Sell { credit_id, amount },
            Subcmd::Transfer { to, amount, destination_chain_id } => {
                ShellCommand::Transfer { to, amount, destination_chain_id }
            }
            Subcmd::Verify { project_id } => ShellCommand::VerifyProject(project_id),
            Subcmd::Interactive | Subcmd::Watch { .. } => return None,
        };

        Some(command)
    }
}

async fn realmain(args: Args) -> Result<()> {
    let contracts =
        ContractAddresses::parse(&args.token_address, &args.dao_address, &args.esg_address)?;
    let settings = EthSettings {
        endpoint: args.endpoint.clone(),
        contracts,
        private_key: args.private_key.clone(),
    };

    let client = eth::connect(&settings).await?;
    let eco = Eco::connect(client, args.chain_id).await?;

    match args.command {
        Subcmd::Interactive => {
            interactive(&eco).await;
            Ok(())
        }

        Subcmd::Watch { interval } => watch(&eco, Duration::from_secs(interval.max(1))).await,

        cmd => match cmd.into_shell_command() {
            Some(command) => handle_command(&eco, command).await,
            None => Ok(()),
        },
    }
}

/// Load CLI arguments merged over the config file, creating the default
/// config on first run.
fn load_args() -> Result<Args> {
    let args = Args::from_args_with_toml("").map_err(|e| Error::ParseFailed(e.to_string()))?;
    let cfg_path = get_config_path(args.config, CONFIG_FILE)?;
    spawn_config(&cfg_path, CONFIG_FILE_CONTENTS.as_bytes())?;

    let contents = std::fs::read_to_string(&cfg_path)?;
    Args::from_args_with_toml(&contents).map_err(|e| Error::ParseFailed(e.to_string()))
}

fn run() -> Result<()> {
    let args = load_args()?;
    init_logger(args.verbose, args.log.as_deref())?;

    // ethers' HTTP transport needs a tokio reactor
    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    rt.block_on(realmain(args))
}

fn main() {
    let Err(e) = run() else { return };
    error!(target: "ecosphere", "{e}");

    if e.class() == ErrorClass::Connectivity {
        eprintln!("Network Error");
        eprintln!("{}", e.user_message());
        exit(2);
    }

    eprintln!("{}", e.user_message());
    exit(1);
}
