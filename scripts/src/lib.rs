//! Scripts for deploying the Web3Arena smart contracts.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod accounts;
pub mod artifacts;
pub mod cli;
pub mod client;
mod commands;
pub mod config;
pub mod constants;
pub mod deploy;
pub mod deployments;
pub mod engine;
pub mod errors;
pub mod runner;
