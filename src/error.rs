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

// Hello developer. Please add your error to the according subsection
// that is commented, or make a new subsection. Keep it clean.

use std::fmt;

use crate::model::WriteAction;

/// Main result type used throughout the codebase.
pub type Result<T> = std::result::Result<T, Error>;

/// What a failed contract read was trying to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Proposals,
    Balances,
    Quorum,
    Network,
}

impl fmt::Display for ReadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Proposals => "proposals",
            Self::Balances => "balances",
            Self::Quorum => "quorum",
            Self::Network => "network state",
        };
        write!(f, "{s}")
    }
}

/// Coarse classification used to decide how a failure is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// No provider/account, or wrong network. Blocks the whole session.
    Connectivity,
    /// A contract read failed. Shown inline, data left stale.
    Read,
    /// A transaction was rejected, reverted or never confirmed.
    Write,
    /// Refused locally before anything was sent.
    Input,
}

/// General library errors used throughout the codebase.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    // ===================
    // Connectivity errors
    // ===================
    #[error("Ethereum provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("No account available on the provider")]
    NoAccount,

    #[error("Wrong network: expected chain ID {expected}, connected to {actual}")]
    WrongNetwork { expected: u64, actual: u64 },

    #[error("Invalid signing key: {0}")]
    InvalidSigningKey(String),

    // ===========
    // Read errors
    // ===========
    #[error("Failed to fetch {target}: {reason}")]
    ReadFailed { target: ReadTarget, reason: String },

    // ============
    // Write errors
    // ============
    #[error("Failed to {action}: {reason}")]
    WriteRejected { action: WriteAction, reason: String },

    #[error("Failed to {action}: transaction {tx_hash} reverted")]
    WriteReverted { action: WriteAction, tx_hash: String },

    #[error("Failed to {action}: transaction {tx_hash} was dropped before confirmation")]
    WriteUnconfirmed { action: WriteAction, tx_hash: String },

    #[error("Not authorized to {action}: {reason}")]
    Unauthorized { action: WriteAction, reason: String },

    // ====================
    // Local refusal errors
    // ====================
    #[error("Proposal description must not be empty")]
    EmptyDescription,

    #[error("Proposal {0} not found")]
    ProposalNotFound(u64),

    #[error("Proposal {0} has already been executed")]
    ProposalExecuted(u64),

    #[error("Proposal {0} has not reached quorum")]
    QuorumNotReached(u64),

    #[error("Unknown ESG credit: {0}")]
    UnknownCredit(u64),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Destination chain ID {0} is the connected chain")]
    SameChainTransfer(u64),

    #[error("Arithmetic overflow while computing {0}")]
    ArithmeticOverflow(&'static str),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    // ====================
    // Miscellaneous errors
    // ====================
    #[error("IO error: {0}")]
    Io(String),

    #[error("Logger initialization failed: {0}")]
    LoggerInit(String),

    #[error("Could not fetch path for home directory")]
    HomeDirNotFound,
}

/// Revert reason fragments emitted by the usual OpenZeppelin guards
/// (`Ownable`, `AccessControl`) and hand-written `require`s.
const AUTHORIZATION_MARKERS: &[&str] = &[
    "not the owner",
    "not authorized",
    "unauthorized",
    "accesscontrol",
    "missing role",
    "only owner",
    "onlyowner",
    "caller is not",
];

impl Error {
    /// Build the write error for a failed send, picking out the
    /// authorization sub-case from the revert reason.
    pub fn from_write_failure(action: WriteAction, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let lowered = reason.to_lowercase();
        if AUTHORIZATION_MARKERS.iter().any(|m| lowered.contains(m)) {
            return Self::Unauthorized { action, reason }
        }

        Self::WriteRejected { action, reason }
    }

    pub fn read(target: ReadTarget, reason: impl fmt::Display) -> Self {
        Self::ReadFailed { target, reason: reason.to_string() }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::ProviderUnavailable(_) |
            Self::NoAccount |
            Self::WrongNetwork { .. } |
            Self::InvalidSigningKey(_) => ErrorClass::Connectivity,

            Self::ReadFailed { .. } => ErrorClass::Read,

            Self::WriteRejected { .. } |
            Self::WriteReverted { .. } |
            Self::WriteUnconfirmed { .. } |
            Self::Unauthorized { .. } => ErrorClass::Write,

            Self::EmptyDescription |
            Self::ProposalNotFound(_) |
            Self::ProposalExecuted(_) |
            Self::QuorumNotReached(_) |
            Self::UnknownCredit(_) |
            Self::InvalidAmount(_) |
            Self::SameChainTransfer(_) |
            Self::ArithmeticOverflow(_) |
            Self::ParseFailed(_) |
            Self::InvalidAddress(_) |
            Self::Io(_) |
            Self::LoggerInit(_) |
            Self::HomeDirNotFound => ErrorClass::Input,
        }
    }

    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderUnavailable(_) | Self::NoAccount => String::from(
                "No Ethereum wallet detected. Please run a node or configure a signing key.",
            ),
            Self::WrongNetwork { expected, .. } => {
                format!("Please connect to the network with chain ID {expected}")
            }
            Self::ReadFailed { target: ReadTarget::Proposals, .. } => {
                String::from("Failed to load proposals. Please try again later.")
            }
            Self::ReadFailed { target, .. } => {
                format!("Failed to fetch {target}. Run with -v for details.")
            }
            Self::Unauthorized { .. } => {
                String::from("You are not authorized to perform this action.")
            }
            Self::WriteRejected { action, .. } |
            Self::WriteReverted { action, .. } |
            Self::WriteUnconfirmed { action, .. } => action.failure_message().to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<log::SetLoggerError> for Error {
    fn from(err: log::SetLoggerError) -> Self {
        Self::LoggerInit(err.to_string())
    }
}
