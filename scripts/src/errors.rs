//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error loading or validating the deploy configuration
    Config(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// A named account could not be resolved to an address
    Resolution(String),
    /// Error locating or parsing a compilation artifact
    ArtifactParsing(String),
    /// Error constructing constructor calldata for a contract
    CalldataConstruction(String),
    /// Error reading a deployment record
    ReadDeployments(String),
    /// Error writing a deployment record
    WriteDeployments(String),
    /// Error submitting or confirming a deployment transaction
    ContractDeployment(String),
}

impl ScriptError {
    /// Whether this error came from resolving a named account
    pub fn is_resolution(&self) -> bool {
        matches!(self, ScriptError::Resolution(_))
    }

    /// Whether this error came from the deployment of an artifact
    pub fn is_deployment(&self) -> bool {
        matches!(
            self,
            ScriptError::ArtifactParsing(_)
                | ScriptError::CalldataConstruction(_)
                | ScriptError::ReadDeployments(_)
                | ScriptError::WriteDeployments(_)
                | ScriptError::ContractDeployment(_)
        )
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Config(s) => write!(f, "error loading config: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::Resolution(s) => write!(f, "error resolving named account: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
        }
    }
}

impl Error for ScriptError {}
