//! Declarative access-control policy deployment.
//!
//! [`PolicyDeployer::deploy`] walks a [`PolicyConfig`] and issues
//! create/grant calls against the injected catalog client in declared
//! order. There is no rollback: a failing step aborts the deploy and
//! already-applied grants stay applied, so every step logs its
//! database/table/role context before propagating the error.

pub mod config;
pub mod deployer;
pub mod error;

pub use config::{
    ColumnAccess, ColumnFilterPolicy, ColumnPolicy, DatabaseGrant, DatabasePolicy, PolicyConfig,
    PolicySettings, RowFilterPolicy, TablePolicy,
};
pub use deployer::{DeploySummary, PolicyDeployer};
pub use error::{PolicyError, PolicyResult};
