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

use log::{debug, error, info, warn};

use crate::{
    model::{Confirmation, PendingWrite, Proposal},
    projector::{project, ProposalViewModel},
    Eco, Error, Result,
};

impl Eco {
    /// Fetch every proposal from the contract, in ascending ID order.
    pub async fn fetch_proposals(&self) -> Result<Vec<Proposal>> {
        let count = self.client.proposal_count().await?;
        debug!(target: "ecosphere::dao", "Fetching {count} proposals");

        // The count is contract-reported, so nothing is reserved up front
        let mut proposals = vec![];
        for i in 0..count {
            proposals.push(self.client.get_proposal(i).await?);
        }

        Ok(proposals)
    }

    /// Fetch the proposal list and replace the stored projection with it.
    ///
    /// On failure the stored list is left as it was. Concurrent refreshes
    /// each fetch on their own and whichever finishes last is kept.
    pub async fn refresh_proposals(&self) -> Result<Arc<Vec<ProposalViewModel>>> {
        let proposals = match self.fetch_proposals().await {
            Ok(p) => p,
            Err(e) => {
                error!(target: "ecosphere::dao", "Failed to fetch proposals: {e}");
                return Err(e)
            }
        };

        let threshold = self.quorum().await;
        Ok(self.replace_proposals(project(&proposals, &threshold)).await)
    }

    /// Find a proposal in the stored list, refreshing once if it is missing.
    pub async fn proposal_by_id(&self, proposal_id: u64) -> Result<ProposalViewModel> {
        if let Some(p) = self.proposals().await.iter().find(|p| p.id == proposal_id) {
            return Ok(p.clone())
        }

        self.fresh_proposal_by_id(proposal_id).await
    }

    /// Refresh the stored list and find a proposal in it.
    async fn fresh_proposal_by_id(&self, proposal_id: u64) -> Result<ProposalViewModel> {
        let proposals = self.refresh_proposals().await?;
        match proposals.iter().find(|p| p.id == proposal_id) {
            Some(p) => Ok(p.clone()),
            None => Err(Error::ProposalNotFound(proposal_id)),
        }
    }

    /// Submit a new proposal with the given description.
    pub async fn submit_proposal(&self, description: &str) -> Result<Confirmation> {
        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription)
        }

        info!(target: "ecosphere::dao", "Submitting proposal: {description}");
        let pending = self.client.submit_proposal(description).await?;
        self.finish_write(pending).await
    }

    /// Cast the connected account's vote on an open proposal.
    pub async fn vote(&self, proposal_id: u64) -> Result<Confirmation> {
        let proposal = self.proposal_by_id(proposal_id).await?;
        if !proposal.can_vote() {
            return Err(Error::ProposalExecuted(proposal_id))
        }

        info!(target: "ecosphere::dao", "Voting on proposal {proposal_id}");
        let pending = self.client.vote(proposal_id).await?;
        self.finish_write(pending).await
    }

    /// Execute an open proposal that has reached quorum.
    pub async fn execute(&self, proposal_id: u64) -> Result<Confirmation> {
        let mut proposal = self.proposal_by_id(proposal_id).await?;

        // The stored tally may predate votes cast since the last refresh
        if proposal.actionable && !proposal.quorum_reached {
            proposal = self.fresh_proposal_by_id(proposal_id).await?;
        }

        if !proposal.actionable {
            return Err(Error::ProposalExecuted(proposal_id))
        }
        if !proposal.can_execute() {
            return Err(Error::QuorumNotReached(proposal_id))
        }

        info!(target: "ecosphere::dao", "Executing proposal {proposal_id}");
        let pending = self.client.execute_proposal(proposal_id).await?;
        self.finish_write(pending).await
    }

    /// Wait for a proposal write to confirm, then reload the list.
    async fn finish_write(&self, pending: PendingWrite) -> Result<Confirmation> {
        let confirmation = self.client.confirm(pending).await?;

        if let Err(e) = self.refresh_proposals().await {
            warn!(target: "ecosphere::dao", "Proposal list not refreshed after write: {e}");
        }

        Ok(confirmation)
    }
}
