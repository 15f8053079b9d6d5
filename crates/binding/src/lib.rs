//! Contract bindings for the token factory and the tokens it deploys.
//!
//! - `factory`: the BEVM ERC20 factory (`create`)
//! - `token`: the ERC20 interface of a deployed token
//! - `abi`: verification of the factory's JSON ABI file against the binding
//!
//! Bindings are generated using alloy's `sol!` macro.

pub mod abi;
pub mod factory;
pub mod token;
