//! JSON ABI loading for the token factory.
//!
//! The factory's interface is shipped as a JSON ABI file. Before any
//! transaction is built the file is parsed and its `create` function is
//! checked against the compiled [`IBitcoinAssetsErc20Factory`] binding, so a
//! stale or mismatched ABI fails before anything is signed.

use crate::factory::IBitcoinAssetsErc20Factory::createCall;
use alloy_json_abi::{Function, JsonAbi};
use alloy_primitives::Selector;
use alloy_sol_types::SolCall;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the factory function that deploys a token.
pub const CREATE_FUNCTION: &str = "create";

#[derive(Debug, Error)]
pub enum AbiError {
    /// The ABI file could not be read
    #[error("failed to read contract ABI {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ABI is not valid JSON ABI
    #[error("failed to parse contract ABI: {0}")]
    Parse(#[from] serde_json::Error),

    /// The ABI has no function with the expected name
    #[error("contract ABI does not declare a `{0}` function")]
    MissingFunction(&'static str),

    /// The ABI declares `create`, but with different parameters
    #[error("contract ABI `create` does not match the binding: expected {expected}, found {found:?}")]
    SelectorMismatch {
        expected: String,
        found: Vec<String>,
    },
}

/// The parsed factory ABI together with its verified `create` function.
#[derive(Debug, Clone)]
pub struct FactoryAbi {
    abi: JsonAbi,
    create: Function,
}

impl FactoryAbi {
    /// Read and verify the ABI file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AbiError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AbiError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&contents)
    }

    /// Parse and verify a JSON ABI document.
    pub fn from_json(json: &str) -> Result<Self, AbiError> {
        let abi: JsonAbi = serde_json::from_str(json)?;
        let create = verify_create(&abi)?;

        Ok(Self { abi, create })
    }

    /// The full parsed ABI.
    pub const fn abi(&self) -> &JsonAbi {
        &self.abi
    }

    /// Canonical signature of `create`, e.g. `create(string,string,...)`.
    pub fn create_signature(&self) -> String {
        self.create.signature()
    }

    /// 4-byte selector of `create`.
    pub fn create_selector(&self) -> Selector {
        self.create.selector()
    }
}

fn verify_create(abi: &JsonAbi) -> Result<Function, AbiError> {
    let overloads = abi
        .function(CREATE_FUNCTION)
        .ok_or(AbiError::MissingFunction(CREATE_FUNCTION))?;

    let expected = Selector::from(createCall::SELECTOR);

    overloads
        .iter()
        .find(|f| f.selector() == expected)
        .cloned()
        .ok_or_else(|| AbiError::SelectorMismatch {
            expected: createCall::SIGNATURE.to_string(),
            found: overloads.iter().map(Function::signature).collect(),
        })
}
