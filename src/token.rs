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

use ethers::types::{Address, U256};
use log::{debug, info};

use crate::{
    model::{Confirmation, QuorumThreshold},
    Eco, Error, Result,
};

/// ESG credit IDs shown on the dashboard
pub const TRACKED_CREDIT_IDS: [u64; 3] = [1, 2, 3];

/// Decimals of the `EcoToken` ERC-20
pub const ECO_DECIMALS: u32 = 18;

/// Everything the dashboard shows for the connected account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balances {
    /// `EcoToken` balance, in base units
    pub eco: U256,
    /// Voting weight; the governance contract weighs votes by token balance
    pub voting_power: U256,
    pub total_supply: U256,
    pub quorum_percentage: U256,
    pub quorum: QuorumThreshold,
    /// `(credit_id, balance)` for each tracked ESG credit
    pub credits: Vec<(u64, U256)>,
}

/// Convert a whole ECO amount to base units.
pub fn eco_to_wei(amount: u64) -> Result<U256> {
    U256::from(amount)
        .checked_mul(U256::exp10(ECO_DECIMALS as usize))
        .ok_or(Error::ArithmeticOverflow("ECO amount"))
}

impl Eco {
    /// Fetch token, voting and ESG credit balances of the connected account.
    pub async fn balances(&self) -> Result<Balances> {
        debug!(target: "ecosphere::token", "Fetching balances for {:#x}", self.account);
        let eco = self.client.token_balance(self.account).await?;
        let total_supply = self.client.total_supply().await?;
        let quorum_percentage = self.client.quorum_percentage().await?;
        let quorum = QuorumThreshold::from_supply(total_supply, quorum_percentage)?;

        let mut credits = Vec::with_capacity(TRACKED_CREDIT_IDS.len());
        for credit_id in TRACKED_CREDIT_IDS {
            credits.push((credit_id, self.client.credit_balance(self.account, credit_id).await?));
        }

        Ok(Balances { eco, voting_power: eco, total_supply, quorum_percentage, quorum, credits })
    }

    /// Send `amount` whole ECO to `to` on `destination_chain_id` through
    /// the token's bridge entry point.
    pub async fn transfer(
        &self,
        to: Address,
        amount: u64,
        destination_chain_id: u64,
    ) -> Result<Confirmation> {
        if amount == 0 {
            return Err(Error::InvalidAmount(String::from("amount must be greater than zero")))
        }
        if destination_chain_id == self.chain_id {
            return Err(Error::SameChainTransfer(destination_chain_id))
        }
        let value = eco_to_wei(amount)?;

        info!(
            target: "ecosphere::token",
            "Transferring {amount} ECO to {to:#x} on chain ID {destination_chain_id}"
        );
        let pending = self.client.cross_chain_transfer(to, value, destination_chain_id).await?;
        self.client.confirm(pending).await
    }

    /// Mark a project as verified on the token contract.
    pub async fn verify_project(&self, project_id: u64) -> Result<Confirmation> {
        info!(target: "ecosphere::token", "Verifying project {project_id}");
        let pending = self.client.verify_project(project_id).await?;
        self.client.confirm(pending).await
    }
}
