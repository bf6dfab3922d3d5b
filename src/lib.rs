//! docker-ucp - converge Docker Universal Control Plane and Trusted Registry
//!
//! Reads a declarative manifest describing whether this host should run a
//! UCP controller, join an existing control plane, or remove it (and the same
//! for a DTR replica), then shells out to the Docker CLI to get there:
//!
//! - Manifest loading with typed schema resolution
//! - Flag assembly for the `docker/ucp` and `docker/dtr` bootstrappers
//! - Idempotency guards based on marker containers
//! - Fixed-delay retries around every command

pub mod config;
pub mod error;
pub mod exec;
pub mod flags;
pub mod gate;
pub mod plan;

pub use error::{Result, UcpError};
