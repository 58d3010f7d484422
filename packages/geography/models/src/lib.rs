#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Brazilian state (UF) codes and municipality types.

pub mod uf;

use serde::{Deserialize, Serialize};

pub use uf::Uf;

/// A municipality as listed by the IBGE localities service.
///
/// The service returns the full regional hierarchy for every entry; only
/// the geocode and name are kept, and only the geocode is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Municipality {
    /// Seven-digit IBGE geocode (e.g. `3550308` for São Paulo).
    pub id: u64,
    /// Municipality name.
    #[serde(rename = "nome", default)]
    pub name: String,
}
