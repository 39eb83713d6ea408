//! Selection and sequential execution of deploy scripts

use itertools::Itertools;
use tracing::info;

use crate::{
    deploy::{DeployEnv, DeployScript},
    errors::ScriptError,
};

/// The scripts carrying at least one of the given tags, or every script if
/// no tags are given
pub fn select<'s>(
    scripts: &'s [Box<dyn DeployScript>],
    tags: &[String],
) -> Vec<&'s dyn DeployScript> {
    scripts
        .iter()
        .map(|script| script.as_ref())
        .filter(|script| {
            tags.is_empty() || script.tags().iter().any(|t| tags.iter().any(|s| s == t))
        })
        .collect()
}

/// Run the selected scripts in order, stopping at the first failure.
///
/// Returns the IDs of the scripts that ran.
pub async fn run_scripts(
    scripts: &[Box<dyn DeployScript>],
    tags: &[String],
    env: &DeployEnv<'_>,
) -> Result<Vec<&'static str>, ScriptError> {
    let selected = select(scripts, tags);
    if !tags.is_empty() {
        info!(
            "running {} script(s) tagged {}",
            selected.len(),
            tags.iter().join(", ")
        );
    }

    let mut ran = Vec::with_capacity(selected.len());
    for script in selected {
        info!("running `{}`", script.id());
        script.run(env).await?;
        ran.push(script.id());
    }

    Ok(ran)
}
