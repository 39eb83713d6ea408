//! Deploy scripts, each deploying one piece of the project and tagged so
//! that a subset can be selected at run time

pub mod web3_arena;

use async_trait::async_trait;

use crate::{accounts::AccountResolver, engine::DeploymentEngine, errors::ScriptError};

/// The environment a deploy script runs against
#[derive(Clone, Copy)]
pub struct DeployEnv<'a> {
    /// Resolves named account roles on the active network
    pub accounts: &'a dyn AccountResolver,
    /// Deploys artifacts on the active network
    pub deployments: &'a dyn DeploymentEngine,
}

/// A single deploy script
#[async_trait]
pub trait DeployScript: Send + Sync {
    /// A unique identifier of the script
    fn id(&self) -> &'static str;

    /// The tags the script can be selected by
    fn tags(&self) -> &'static [&'static str];

    /// Run the script
    async fn run(&self, env: &DeployEnv<'_>) -> Result<(), ScriptError>;
}

/// Every deploy script of the project, in execution order
pub fn all_scripts() -> Vec<Box<dyn DeployScript>> {
    vec![Box::new(web3_arena::Web3Arena1155)]
}
