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

//! Contract bindings. Only the methods the client calls are declared.

pub mod token {
    ethers::contract::abigen!(
        EcoToken,
        r#"[
            function totalSupply() external view returns (uint256)
            function balanceOf(address account) external view returns (uint256)
            function initiateCrossChainTransfer(address to, uint256 amount, uint256 destinationChainId) external
            function verifyProject(uint256 projectId) external
        ]"#
    );
}

pub mod governance {
    ethers::contract::abigen!(
        DaoGovernance,
        r#"[
            function proposalCount() external view returns (uint256)
            function getProposal(uint256 proposalId) external view returns (string, address, uint256, bool)
            function quorumPercentage() external view returns (uint256)
            function submitProposal(string description) external
            function vote(uint256 proposalId) external
            function executeProposal(uint256 proposalId) external
        ]"#
    );
}

pub mod credits {
    ethers::contract::abigen!(
        EsgCredits,
        r#"[
            function balanceOf(address account, uint256 id) external view returns (uint256)
            function mint(uint256 id, uint256 amount, bytes data) external payable
            function burn(uint256 id, uint256 amount, bytes data) external
        ]"#
    );
}

pub use credits::EsgCredits;
pub use governance::DaoGovernance;
pub use token::EcoToken;
