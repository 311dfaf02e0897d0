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

use std::io::{stdin, stdout, Write};

use futures::StreamExt;
use log::error;
use smol::{
    io::{AsyncBufReadExt, BufReader},
    Unblock,
};

use crate::{
    cli_desc,
    cli_util::{
        confirmation_message, format_eco, parse_command, prettytable_balances,
        prettytable_governance, prettytable_market, prettytable_proposal, prettytable_proposals,
        short_account, ShellCommand,
    },
    market::listings,
    Eco, Result,
};

/// Auxiliary function to print the help message.
fn help() {
    println!("{}", cli_desc!());
    println!("Commands:");
    println!("\thelp: Prints the help message");
    println!("\tdashboard: Show token balances, voting power and ESG credits");
    println!("\tproposals: List governance proposals");
    println!("\tproposal <proposal-id>: Show a single proposal");
    println!("\tpropose <description>: Submit a new proposal");
    println!("\tvote <proposal-id>: Vote on an open proposal");
    println!("\texecute <proposal-id>: Execute a proposal that reached quorum");
    println!("\tmarket: List ESG credits on offer");
    println!("\tbuy <credit-id> <amount>: Buy ESG credits");
    println!("\tsell <amount> [credit-id]: Sell ESG credits (default credit 1)");
    println!("\ttransfer <to> <amount> <destination-chain-id>: Send ECO to another chain");
    println!("\tverify <project-id>: Mark a project as verified");
    println!("\trefresh: Reload the proposal list");
    println!("\tquorum: Recompute and show the quorum threshold");
    println!("\texit, quit: Leave the shell");
}

/// Run a single parsed command against the session, printing its output.
pub async fn handle_command(eco: &Eco, command: ShellCommand) -> Result<()> {
    match command {
        ShellCommand::Help => help(),
        // The shell loop handles leaving; one-shot callers never produce it
        ShellCommand::Exit => {}

        ShellCommand::Refresh | ShellCommand::Proposals => {
            let proposals = eco.refresh_proposals().await?;
            if proposals.is_empty() {
                println!("No proposals found");
                return Ok(())
            }
            let threshold = eco.quorum().await;
            println!("{}", prettytable_proposals(&proposals, &threshold));
        }

        ShellCommand::Proposal(proposal_id) => {
            let proposal = eco.proposal_by_id(proposal_id).await?;
            let threshold = eco.quorum().await;
            println!("{}", prettytable_proposal(&proposal, &threshold));
        }

        ShellCommand::Quorum => {
            let threshold = eco.refresh_quorum().await?;
            println!("Quorum threshold: {} ECO", format_eco(threshold.0));
        }

        ShellCommand::Dashboard => {
            let balances = eco.balances().await?;
            println!("Account: {} (chain ID {})", short_account(&eco.account), eco.chain_id);
            println!("{}", prettytable_balances(&balances));
            println!("{}", prettytable_governance(&balances));
        }

        ShellCommand::Propose(description) => {
            let confirmation = eco.submit_proposal(&description).await?;
            println!("{}", confirmation_message(&confirmation));
        }

        ShellCommand::Vote(proposal_id) => {
            let confirmation = eco.vote(proposal_id).await?;
            println!("{}", confirmation_message(&confirmation));
        }

        ShellCommand::Execute(proposal_id) => {
            let confirmation = eco.execute(proposal_id).await?;
            println!("{}", confirmation_message(&confirmation));
        }

        ShellCommand::Market => println!("{}", prettytable_market(listings())),

        ShellCommand::Buy { credit_id, amount } => {
            let confirmation = eco.buy(credit_id, amount).await?;
            println!("{}", confirmation_message(&confirmation));
        }

        ShellCommand::Sell { credit_id, amount } => {
            let confirmation = eco.sell(credit_id, amount).await?;
            println!("{}", confirmation_message(&confirmation));
        }

        ShellCommand::Transfer { to, amount, destination_chain_id } => {
            let confirmation = eco.transfer(to, amount, destination_chain_id).await?;
            println!("{}", confirmation_message(&confirmation));
        }

        ShellCommand::VerifyProject(project_id) => {
            let confirmation = eco.verify_project(project_id).await?;
            println!("{}", confirmation_message(&confirmation));
        }
    }

    Ok(())
}

fn prompt() {
    print!("ecosphere> ");
    let _ = stdout().flush();
}

/// Auxiliary function to start provided Eco as an interactive shell.
/// Reads one command per line from stdin until EOF or `exit`.
pub async fn interactive(eco: &Eco) {
    println!("Connected as {} on chain ID {}", short_account(&eco.account), eco.chain_id);
    println!("Type \"help\" for a list of commands");

    let mut lines = BufReader::new(Unblock::new(stdin())).lines();

    loop {
        prompt();

        // Grab input or end on Ctrl-D
        let line = match lines.next().await {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                error!(target: "ecosphere::interactive", "Failed reading stdin: {e}");
                break
            }
            None => break,
        };

        let command = match parse_command(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue
            }
        };

        if command == ShellCommand::Exit {
            break
        }

        if let Err(e) = handle_command(eco, command).await {
            error!(target: "ecosphere::interactive", "{e}");
            eprintln!("{}", e.user_message());
        }
    }

    println!();
}
