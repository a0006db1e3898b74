//! Retry module (ergonomic namespace)
//! - policy.rs: retry policy, exponential schedule and jittered waits
//! - backoff.rs: the retry engine driving an operation under a policy

pub mod backoff;
pub mod policy;

pub use self::backoff::*;
pub use self::policy::*;
