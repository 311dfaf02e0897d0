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

use async_trait::async_trait;
use ethers::types::{Address, U256};

use crate::{
    model::{Confirmation, PendingWrite, Proposal},
    Result,
};

/// Shared handle to a contract client, owned by the session.
pub type DaoClientPtr = Arc<dyn DaoClient>;

/// Everything the dashboard needs from the `EcoToken`, `DAOGovernance`
/// and `ESGCredits` contracts and the node behind them.
///
/// Implementations map their transport failures onto the crate
/// [`Error`](crate::Error) classes: reads return `ReadFailed`, sends return
/// `WriteRejected`/`Unauthorized`, and `confirm` returns `WriteReverted` or
/// `WriteUnconfirmed`.
#[async_trait]
pub trait DaoClient: Send + Sync {
    /// Chain ID reported by the node
    async fn chain_id(&self) -> Result<u64>;

    /// Account transactions are sent from
    async fn account(&self) -> Result<Address>;

    async fn block_number(&self) -> Result<u64>;

    // DAOGovernance
    async fn proposal_count(&self) -> Result<u64>;
    async fn get_proposal(&self, index: u64) -> Result<Proposal>;
    async fn quorum_percentage(&self) -> Result<U256>;
    async fn submit_proposal(&self, description: &str) -> Result<PendingWrite>;
    async fn vote(&self, proposal_id: u64) -> Result<PendingWrite>;
    async fn execute_proposal(&self, proposal_id: u64) -> Result<PendingWrite>;

    // EcoToken
    async fn total_supply(&self) -> Result<U256>;
    async fn token_balance(&self, owner: Address) -> Result<U256>;
    /// Lock `amount` base units for release to `to` on another chain
    async fn cross_chain_transfer(
        &self,
        to: Address,
        amount: U256,
        destination_chain_id: u64,
    ) -> Result<PendingWrite>;
    async fn verify_project(&self, project_id: u64) -> Result<PendingWrite>;

    // ESGCredits
    async fn credit_balance(&self, owner: Address, credit_id: u64) -> Result<U256>;
    async fn mint_credits(&self, credit_id: u64, amount: U256, value: U256)
        -> Result<PendingWrite>;
    async fn burn_credits(&self, credit_id: u64, amount: U256) -> Result<PendingWrite>;

    /// Wait until `pending` is mined and check that it succeeded.
    async fn confirm(&self, pending: PendingWrite) -> Result<Confirmation>;
}
