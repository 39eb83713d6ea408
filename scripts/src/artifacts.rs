//! Loading of compiled contract artifacts and construction of their init code

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolType, DynSolValue, Specifier},
    json_abi::{JsonAbi, Param},
    primitives::Bytes,
};
use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::{constants::JSON_EXTENSION, errors::ScriptError};

/// A compiled contract, as emitted into the artifacts directory
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// The name of the contract
    pub contract_name: String,
    /// The source file the contract was compiled from
    #[serde(default)]
    pub source_name: Option<String>,
    /// The contract interface
    pub abi: JsonAbi,
    /// The creation bytecode
    pub bytecode: Bytes,
    /// The runtime bytecode
    #[serde(default)]
    pub deployed_bytecode: Bytes,
}

impl Artifact {
    /// Parse an artifact from its JSON representation
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        serde_json::from_str(json).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))
    }

    /// The constructor parameters of the contract
    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor()
            .map(|c| c.inputs.as_slice())
            .unwrap_or_default()
    }

    /// Build the contract creation code: the bytecode followed by the
    /// ABI-encoded constructor arguments.
    ///
    /// Each argument is given in its string form and coerced to the type of
    /// the corresponding constructor parameter.
    pub fn init_code(&self, args: &[String]) -> Result<Bytes, ScriptError> {
        let inputs = self.constructor_inputs();
        if inputs.len() != args.len() {
            return Err(ScriptError::CalldataConstruction(format!(
                "{} takes {} constructor arguments, {} given",
                self.contract_name,
                inputs.len(),
                args.len()
            )));
        }

        let values = inputs
            .iter()
            .zip(args)
            .map(|(param, arg)| coerce_arg(param, arg))
            .collect::<Result<Vec<_>, _>>()?;

        let mut code = self.bytecode.to_vec();
        code.extend(DynSolValue::Tuple(values).abi_encode_params());
        Ok(code.into())
    }
}

/// Coerce a string argument to the type of the given parameter
fn coerce_arg(param: &Param, arg: &str) -> Result<DynSolValue, ScriptError> {
    let ty: DynSolType = param
        .resolve()
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    ty.coerce_str(arg).map_err(|e| {
        ScriptError::CalldataConstruction(format!(
            "argument `{}` ({}): {}",
            param.name,
            ty.sol_type_name(),
            e
        ))
    })
}

/// Find the artifact file for the given contract under the artifacts directory.
///
/// Symlinked directories are not followed.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<PathBuf, ScriptError> {
    let file_name = format!("{name}.{JSON_EXTENSION}");
    let mut candidates = Vec::new();
    for entry in WalkDir::new(artifacts_dir) {
        let entry = entry.map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
        if entry.file_type().is_file() && entry.file_name() == file_name.as_str() {
            candidates.push(entry.into_path());
        }
    }

    match candidates.len() {
        0 => Err(ScriptError::ArtifactParsing(format!(
            "no artifact for `{name}` under {}",
            artifacts_dir.display()
        ))),
        1 => Ok(candidates.remove(0)),
        _ => Err(ScriptError::ArtifactParsing(format!(
            "multiple artifacts for `{name}`: {:?}",
            candidates
        ))),
    }
}

/// Load the artifact of the given contract from the artifacts directory
pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<Artifact, ScriptError> {
    let path = find_artifact(artifacts_dir, name)?;
    debug!("loading artifact {}", path.display());

    let json = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;
    let artifact = Artifact::from_json(&json)?;

    if artifact.contract_name != name {
        return Err(ScriptError::ArtifactParsing(format!(
            "{} holds contract `{}`, expected `{name}`",
            path.display(),
            artifact.contract_name
        )));
    }

    // Interfaces and abstract contracts compile to empty bytecode
    if artifact.bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "`{name}` has no creation bytecode"
        )));
    }

    Ok(artifact)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{fs, path::Path};

    use alloy::primitives::U256;

    use crate::errors::ScriptError;

    use super::{load_artifact, Artifact};

    /// A minimal artifact without a constructor
    pub(crate) fn artifact_json(name: &str, bytecode: &str) -> String {
        format!(
            r#"{{
                "_format": "hh-sol-artifact-1",
                "contractName": "{name}",
                "sourceName": "contracts/{name}.sol",
                "abi": [
                    {{
                        "type": "function",
                        "name": "uri",
                        "inputs": [
                            {{ "name": "id", "type": "uint256", "internalType": "uint256" }}
                        ],
                        "outputs": [{{ "name": "", "type": "string", "internalType": "string" }}],
                        "stateMutability": "view"
                    }}
                ],
                "bytecode": "{bytecode}",
                "deployedBytecode": "0x6080",
                "linkReferences": {{}},
                "deployedLinkReferences": {{}}
            }}"#
        )
    }

    /// Write an artifact the way the compiler lays it out
    pub(crate) fn write_artifact(artifacts_dir: &Path, name: &str, json: &str) {
        let dir = artifacts_dir.join("contracts").join(format!("{name}.sol"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.json")), json).unwrap();
        fs::write(dir.join(format!("{name}.dbg.json")), "{}").unwrap();
    }

    #[test]
    fn test_load_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let json = artifact_json("Web3Arena1155", "0x6080604052");
        write_artifact(dir.path(), "Web3Arena1155", &json);

        let artifact = load_artifact(dir.path(), "Web3Arena1155").unwrap();
        assert_eq!(artifact.contract_name, "Web3Arena1155");
        assert_eq!(
            artifact.source_name.as_deref(),
            Some("contracts/Web3Arena1155.sol")
        );
        assert!(artifact.constructor_inputs().is_empty());

        // No constructor means the init code is exactly the bytecode
        let init_code = artifact.init_code(&[]).unwrap();
        assert_eq!(init_code, artifact.bytecode);
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifact(dir.path(), "Web3Arena1155").unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
        assert!(err.is_deployment());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dir_not_followed() {
        let dir = tempfile::tempdir().unwrap();
        let json = artifact_json("Web3Arena1155", "0x6080604052");
        write_artifact(dir.path(), "Web3Arena1155", &json);

        // A link back to the artifacts root would otherwise repeat every file
        let link = dir.path().join("contracts").join("loop");
        std::os::unix::fs::symlink(dir.path(), &link).unwrap();

        let path = super::find_artifact(dir.path(), "Web3Arena1155").unwrap();
        assert!(!path.starts_with(&link));

        let artifact = load_artifact(dir.path(), "Web3Arena1155").unwrap();
        assert_eq!(artifact.contract_name, "Web3Arena1155");
    }

    #[test]
    fn test_missing_artifacts_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_artifact(&dir.path().join("artifacts"), "Web3Arena1155").unwrap_err();
        assert!(matches!(err, ScriptError::ArtifactParsing(_)));
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_artifact(dir.path(), "IArena", &artifact_json("IArena", "0x"));

        assert!(load_artifact(dir.path(), "IArena").is_err());
    }

    #[test]
    fn test_constructor_args_encoded() {
        let artifact = Artifact::from_json(
            r#"{
                "contractName": "Token",
                "abi": [
                    {
                        "type": "constructor",
                        "inputs": [
                            { "name": "supply", "type": "uint256", "internalType": "uint256" }
                        ],
                        "stateMutability": "nonpayable"
                    }
                ],
                "bytecode": "0x6080"
            }"#,
        )
        .unwrap();

        let init_code = artifact.init_code(&["42".to_string()]).unwrap();
        assert_eq!(init_code.len(), 2 + 32);
        assert_eq!(&init_code[..2], &[0x60, 0x80]);
        assert_eq!(U256::from_be_slice(&init_code[2..]), U256::from(42));

        let err = artifact.init_code(&[]).unwrap_err();
        assert!(matches!(err, ScriptError::CalldataConstruction(_)));

        let err = artifact.init_code(&["forty-two".to_string()]).unwrap_err();
        assert!(matches!(err, ScriptError::CalldataConstruction(_)));
    }
}
