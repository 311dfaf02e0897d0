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

use std::sync::Arc;

use ethers::types::Address;
use log::{debug, info};
use smol::lock::RwLock;

/// Error codes
pub mod error;
pub use error::{Error, ErrorClass, Result};

/// Proposal, quorum and transaction types
pub mod model;
use model::QuorumThreshold;

/// Proposal view projection
pub mod projector;
use projector::ProposalViewModel;

/// Contract client capability
pub mod client;
use client::DaoClientPtr;

/// `ethers` implementation of the contract client
pub mod eth;

/// Session functionality related to DAO proposals
pub mod dao;

/// Session functionality related to token balances
pub mod token;

/// ESG credit marketplace
pub mod market;

/// CLI utility functions
pub mod cli_util;

/// Interactive shell
pub mod interactive;

/// Block polling
pub mod watch;

/// Path and logging helpers
pub mod util;

/// Description string for CLI `about` fields
#[macro_export]
macro_rules! cli_desc {
    () => {{
        let desc = format!(
            "{} {}\n{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_DESCRIPTION")
        );
        Box::leak(desc.into_boxed_str()) as &'static str
    }};
}

/// A connected dashboard session.
///
/// Holds the injected contract client for the lifetime of the session,
/// along with the state derived from it. The proposal list and the quorum
/// threshold are only ever replaced wholesale.
pub struct Eco {
    /// Contract client every read and write goes through
    pub client: DaoClientPtr,
    /// Account transactions are sent from
    pub account: Address,
    /// Chain ID verified at connection time
    pub chain_id: u64,
    quorum: RwLock<QuorumThreshold>,
    proposals: RwLock<Arc<Vec<ProposalViewModel>>>,
}

impl Eco {
    /// Verify the network, resolve the account and derive the quorum threshold.
    pub async fn connect(client: DaoClientPtr, expected_chain_id: u64) -> Result<Self> {
        let chain_id = client.chain_id().await?;
        debug!(target: "ecosphere", "Connected to chain ID {chain_id}");
        if chain_id != expected_chain_id {
            return Err(Error::WrongNetwork { expected: expected_chain_id, actual: chain_id })
        }

        let account = client.account().await?;
        info!(target: "ecosphere", "Connected account: {account:#x}");

        let eco = Self {
            client,
            account,
            chain_id,
            quorum: RwLock::new(QuorumThreshold::default()),
            proposals: RwLock::new(Arc::new(vec![])),
        };
        eco.refresh_quorum().await?;

        Ok(eco)
    }

    /// Current quorum threshold.
    pub async fn quorum(&self) -> QuorumThreshold {
        *self.quorum.read().await
    }

    /// Recompute the quorum threshold from total supply and percentage.
    pub async fn refresh_quorum(&self) -> Result<QuorumThreshold> {
        let percentage = self.client.quorum_percentage().await?;
        let total_supply = self.client.total_supply().await?;
        let threshold = QuorumThreshold::from_supply(total_supply, percentage)?;
        debug!(
            target: "ecosphere",
            "Quorum percentage: {percentage}, total supply: {total_supply}, threshold: {}",
            threshold.0
        );

        *self.quorum.write().await = threshold;
        Ok(threshold)
    }

    /// Snapshot of the last successfully fetched proposal list.
    pub async fn proposals(&self) -> Arc<Vec<ProposalViewModel>> {
        self.proposals.read().await.clone()
    }

    async fn replace_proposals(&self, proposals: Vec<ProposalViewModel>) -> Arc<Vec<ProposalViewModel>> {
        let proposals = Arc::new(proposals);
        *self.proposals.write().await = proposals.clone();
        proposals
    }
}
