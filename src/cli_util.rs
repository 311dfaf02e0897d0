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

use ethers::{
    types::{Address, U256},
    utils::{format_units, to_checksum},
};
use prettytable::{format, row, Table};

use crate::{
    eth::parse_address,
    market::{CreditListing, DEFAULT_SELL_CREDIT_ID},
    model::{Confirmation, QuorumThreshold},
    projector::{ProposalAction, ProposalViewModel},
    token::{Balances, ECO_DECIMALS},
    Error, Result,
};

/// Format a base-unit token amount as ECO, without trailing zeros.
pub fn format_eco(amount: U256) -> String {
    let Ok(s) = format_units(amount, ECO_DECIMALS) else { return format!("{amount} wei") };

    if !s.contains('.') {
        return s
    }

    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Checksummed address shortened to its first 6 and last 4 characters.
pub fn short_account(account: &Address) -> String {
    let full = to_checksum(account, None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// Auxiliary function to parse a positive integer amount.
pub fn parse_amount(s: &str) -> Result<u64> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err(Error::InvalidAmount(String::from("amount must be greater than zero"))),
        Ok(v) => Ok(v),
        Err(_) => Err(Error::InvalidAmount(format!("\"{s}\" is not a whole number"))),
    }
}

/// Auxiliary function to parse a proposal or credit ID.
pub fn parse_id(s: &str) -> Result<u64> {
    s.trim().parse::<u64>().map_err(|_| Error::ParseFailed(format!("\"{s}\" is not a valid ID")))
}

/// One-line summary of a confirmed write.
pub fn confirmation_message(confirmation: &Confirmation) -> String {
    let mut msg =
        format!("{} (tx {:#x}", confirmation.action.success_message(), confirmation.tx_hash);
    if let Some(block) = confirmation.block_number {
        msg.push_str(&format!(", block {block}"));
    }
    msg.push(')');
    msg
}

pub fn prettytable_proposals(proposals: &[ProposalViewModel], threshold: &QuorumThreshold) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["ID", "Description", "Proposer", "Votes", "Status", "Quorum", "Actions"]);

    for p in proposals {
        let quorum = match p.quorum_reached {
            true => String::from("Reached"),
            false => format!("{} / {}", format_eco(p.vote_count), format_eco(threshold.0)),
        };

        let actions: Vec<&str> = p
            .actions()
            .iter()
            .map(|a| match a {
                ProposalAction::Vote => "vote",
                ProposalAction::Execute => "execute",
            })
            .collect();
        let actions = match actions.is_empty() {
            true => String::from("-"),
            false => actions.join(", "),
        };

        table.add_row(row![
            p.id,
            p.description,
            short_account(&p.proposer),
            format_eco(p.vote_count),
            p.status(),
            quorum,
            actions
        ]);
    }

    table
}

/// Detail view of a single proposal.
pub fn prettytable_proposal(proposal: &ProposalViewModel, threshold: &QuorumThreshold) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(row!["ID", proposal.id]);
    table.add_row(row!["Description", proposal.description]);
    table.add_row(row!["Proposer", to_checksum(&proposal.proposer, None)]);
    table.add_row(row!["Votes", format_eco(proposal.vote_count)]);
    table.add_row(row!["Quorum", format_eco(threshold.0)]);
    table.add_row(row!["Quorum Reached", proposal.quorum_reached]);
    table.add_row(row!["Status", proposal.status()]);

    table
}

pub fn prettytable_balances(balances: &Balances) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Asset", "Balance"]);
    table.add_row(row!["ECO", format_eco(balances.eco)]);
    table.add_row(row!["Voting Power", format_eco(balances.voting_power)]);
    for (credit_id, balance) in &balances.credits {
        table.add_row(row![format!("ESG Credit #{credit_id}"), balance]);
    }

    table
}

pub fn prettytable_governance(balances: &Balances) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Total Supply", "Quorum", "Threshold"]);
    table.add_row(row![
        format_eco(balances.total_supply),
        format!("{}%", balances.quorum_percentage),
        format_eco(balances.quorum.0)
    ]);

    table
}

pub fn prettytable_market(listings: &[CreditListing]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["ID", "Name", "Available", "Price (ECO)"]);
    for l in listings {
        table.add_row(row![l.id, l.name, l.available, l.price]);
    }

    table
}

/// A parsed interactive shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Exit,
    Refresh,
    Quorum,
    Dashboard,
    Proposals,
    Proposal(u64),
    Propose(String),
    Vote(u64),
    Execute(u64),
    Market,
    Buy { credit_id: u64, amount: u64 },
    Sell { credit_id: u64, amount: u64 },
    Transfer { to: Address, amount: u64, destination_chain_id: u64 },
    VerifyProject(u64),
}

/// Parse a shell line. Blank lines are `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let line = line.trim();
    let mut parts = line.split_whitespace();
    let Some(cmd) = parts.next() else { return Ok(None) };
    let args: Vec<&str> = parts.collect();

    let usage = |u: &str| Error::ParseFailed(format!("Usage: {u}"));

    let command = match (cmd, args.as_slice()) {
        ("help", []) => ShellCommand::Help,
        ("exit" | "quit", []) => ShellCommand::Exit,
        ("refresh", []) => ShellCommand::Refresh,
        ("quorum", []) => ShellCommand::Quorum,
        ("dashboard", []) => ShellCommand::Dashboard,
        ("proposals", []) => ShellCommand::Proposals,
        ("market", []) => ShellCommand::Market,

        ("propose", []) => return Err(usage("propose <description>")),
        // Keep the description as typed, minus the command word
        ("propose", _) => ShellCommand::Propose(line[cmd.len()..].trim().to_string()),

        ("proposal", [id]) => ShellCommand::Proposal(parse_id(id)?),
        ("proposal", _) => return Err(usage("proposal <proposal-id>")),

        ("vote", [id]) => ShellCommand::Vote(parse_id(id)?),
        ("vote", _) => return Err(usage("vote <proposal-id>")),

        ("execute", [id]) => ShellCommand::Execute(parse_id(id)?),
        ("execute", _) => return Err(usage("execute <proposal-id>")),

        ("buy", [id, amount]) => {
            ShellCommand::Buy { credit_id: parse_id(id)?, amount: parse_amount(amount)? }
        }
        ("buy", _) => return Err(usage("buy <credit-id> <amount>")),

        ("sell", [amount]) => {
            ShellCommand::Sell { credit_id: DEFAULT_SELL_CREDIT_ID, amount: parse_amount(amount)? }
        }
        ("sell", [amount, id]) => {
            ShellCommand::Sell { credit_id: parse_id(id)?, amount: parse_amount(amount)? }
        }
        ("sell", _) => return Err(usage("sell <amount> [credit-id]")),

        ("transfer", [to, amount, chain_id]) => ShellCommand::Transfer {
            to: parse_address(to)?,
            amount: parse_amount(amount)?,
            destination_chain_id: parse_id(chain_id)?,
        },
        ("transfer", _) => return Err(usage("transfer <to> <amount> <destination-chain-id>")),

        ("verify", [id]) => ShellCommand::VerifyProject(parse_id(id)?),
        ("verify", _) => return Err(usage("verify <project-id>")),

        (
            "help" | "exit" | "quit" | "refresh" | "quorum" | "dashboard" | "proposals" | "market",
            _,
        ) => return Err(usage(cmd)),

        _ => return Err(Error::ParseFailed(format!("Unknown command: {cmd}"))),
    };

    Ok(Some(command))
}
