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

use std::fmt;

use ethers::types::{Address, TxHash, U256};

use crate::{Error, Result};

/// A governance proposal as stored by the `DAOGovernance` contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Index assigned by the contract at submission time
    pub id: u64,
    pub description: String,
    pub proposer: Address,
    /// Accumulated voting weight, in token base units
    pub vote_count: U256,
    pub executed: bool,
}

impl Proposal {
    pub fn status(&self) -> ProposalStatus {
        if self.executed {
            ProposalStatus::Executed
        } else {
            ProposalStatus::Open
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    Open,
    Executed,
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "Pending"),
            Self::Executed => write!(f, "Executed"),
        }
    }
}

/// Votes a proposal needs before it can be executed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct QuorumThreshold(pub U256);

impl QuorumThreshold {
    /// `total_supply * percentage / 100`, multiplying first.
    pub fn from_supply(total_supply: U256, percentage: U256) -> Result<Self> {
        let Some(product) = total_supply.checked_mul(percentage) else {
            return Err(Error::ArithmeticOverflow("quorum threshold"))
        };

        Ok(Self(product / U256::from(100u8)))
    }

    pub fn is_reached_by(&self, votes: U256) -> bool {
        votes >= self.0
    }
}

impl From<u64> for QuorumThreshold {
    fn from(v: u64) -> Self {
        Self(U256::from(v))
    }
}

/// Contract writes the client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteAction {
    SubmitProposal,
    Vote,
    Execute,
    BuyCredits,
    SellCredits,
    Transfer,
    VerifyProject,
}

impl WriteAction {
    pub fn success_message(&self) -> &'static str {
        match self {
            Self::SubmitProposal => "Proposal submitted successfully!",
            Self::Vote => "Vote cast successfully!",
            Self::Execute => "Proposal executed successfully!",
            Self::BuyCredits => "Purchase successful!",
            Self::SellCredits => "Sale successful!",
            Self::Transfer => "Cross-chain transfer initiated successfully!",
            Self::VerifyProject => "Project verified successfully!",
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::SubmitProposal => "Failed to submit proposal. Run with -v for details.",
            Self::Vote => "Failed to cast vote. Run with -v for details.",
            Self::Execute => "Failed to execute proposal. Run with -v for details.",
            Self::BuyCredits => "Failed to buy ESG credits. Run with -v for details.",
            Self::SellCredits => "Failed to sell ESG credits. Run with -v for details.",
            Self::Transfer => "Failed to initiate cross-chain transfer. Run with -v for details.",
            Self::VerifyProject => "Failed to verify project. Run with -v for details.",
        }
    }
}

impl fmt::Display for WriteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SubmitProposal => "submit proposal",
            Self::Vote => "cast vote",
            Self::Execute => "execute proposal",
            Self::BuyCredits => "buy ESG credits",
            Self::SellCredits => "sell ESG credits",
            Self::Transfer => "initiate cross-chain transfer",
            Self::VerifyProject => "verify project",
        };
        write!(f, "{s}")
    }
}

/// Handle for a transaction that was accepted by the node but may not be mined yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWrite {
    pub action: WriteAction,
    pub tx_hash: TxHash,
}

/// A mined, successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub action: WriteAction,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}
