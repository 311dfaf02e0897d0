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

//! Projection of raw proposal records into what the dashboard shows.
//!
//! The projection is a pure function of the fetched proposals and the
//! quorum threshold. It never touches the network and never fails; if a
//! fetch fails the caller keeps its previous projection instead.

use std::ops::Deref;

use crate::model::{Proposal, QuorumThreshold};

/// Actions a user can take on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalAction {
    Vote,
    Execute,
}

/// A proposal together with its derived display state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalViewModel {
    pub proposal: Proposal,
    /// `vote_count >= threshold`
    pub quorum_reached: bool,
    /// `!executed`
    pub actionable: bool,
}

impl ProposalViewModel {
    pub fn new(proposal: Proposal, threshold: &QuorumThreshold) -> Self {
        let quorum_reached = threshold.is_reached_by(proposal.vote_count);
        let actionable = !proposal.executed;
        Self { proposal, quorum_reached, actionable }
    }

    pub fn can_vote(&self) -> bool {
        self.actionable
    }

    pub fn can_execute(&self) -> bool {
        self.actionable && self.quorum_reached
    }

    /// Offered actions, in display order.
    pub fn actions(&self) -> Vec<ProposalAction> {
        let mut actions = vec![];
        if self.can_vote() {
            actions.push(ProposalAction::Vote);
        }
        if self.can_execute() {
            actions.push(ProposalAction::Execute);
        }
        actions
    }
}

impl Deref for ProposalViewModel {
    type Target = Proposal;

    fn deref(&self) -> &Proposal {
        &self.proposal
    }
}

/// Project `proposals` against `threshold`, preserving input order.
pub fn project(proposals: &[Proposal], threshold: &QuorumThreshold) -> Vec<ProposalViewModel> {
    proposals.iter().map(|p| ProposalViewModel::new(p.clone(), threshold)).collect()
}

#[cfg(test)]
mod tests {
    use ethers::types::{Address, U256};

    use super::*;

    fn proposal(id: u64, votes: u64, executed: bool) -> Proposal {
        Proposal {
            id,
            description: format!("Proposal {id}"),
            proposer: Address::from_low_u64_be(id + 1),
            vote_count: U256::from(votes),
            executed,
        }
    }

    #[test]
    fn preserves_length_and_order() {
        let input: Vec<Proposal> =
            (0..16).map(|i| proposal(i, (i * 7) % 11, i % 3 == 0)).collect();
        let output = project(&input, &QuorumThreshold::from(5));

        assert_eq!(output.len(), input.len());
        for (vm, p) in output.iter().zip(input.iter()) {
            assert_eq!(&vm.proposal, p);
        }
    }

    #[test]
    fn quorum_boundary_is_inclusive() {
        let threshold = QuorumThreshold::from(50);
        let output = project(
            &[proposal(0, 49, false), proposal(1, 50, false), proposal(2, 51, false)],
            &threshold,
        );
        assert!(!output[0].quorum_reached);
        assert!(output[1].quorum_reached);
        assert!(output[2].quorum_reached);
    }

    #[test]
    fn executed_offers_nothing() {
        let output = project(&[proposal(0, 0, true), proposal(1, 1000, true)], &QuorumThreshold::from(10));
        for vm in output {
            assert!(!vm.actionable);
            assert!(!vm.can_vote());
            assert!(!vm.can_execute());
            assert!(vm.actions().is_empty());
        }
    }

    #[test]
    fn open_below_quorum_offers_only_vote() {
        let output = project(&[proposal(0, 3, false)], &QuorumThreshold::from(10));
        assert_eq!(output[0].actions(), vec![ProposalAction::Vote]);

        let output = project(&[proposal(0, 10, false)], &QuorumThreshold::from(10));
        assert_eq!(output[0].actions(), vec![ProposalAction::Vote, ProposalAction::Execute]);
    }

    #[test]
    fn idempotent() {
        let input = vec![proposal(0, 40, false), proposal(1, 60, true), proposal(2, 50, false)];
        let threshold = QuorumThreshold::from(50);
        assert_eq!(project(&input, &threshold), project(&input, &threshold));
    }

    #[test]
    fn mixed_scenario() {
        let input = vec![proposal(0, 40, false), proposal(1, 60, true)];
        let output = project(&input, &QuorumThreshold::from(50));

        assert_eq!(output.len(), 2);
        assert_eq!(output[0].id, 0);
        assert!(!output[0].quorum_reached);
        assert!(output[0].actionable);
        assert_eq!(output[1].id, 1);
        assert!(output[1].quorum_reached);
        assert!(!output[1].actionable);
    }

    #[test]
    fn empty_input() {
        assert!(project(&[], &QuorumThreshold::from(50)).is_empty());
    }

    #[test]
    fn zero_threshold_reaches_quorum_immediately() {
        let output = project(&[proposal(0, 0, false)], &QuorumThreshold::default());
        assert!(output[0].quorum_reached);
        assert!(output[0].can_execute());
    }
}
