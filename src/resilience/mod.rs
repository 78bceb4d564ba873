//! Resilience helpers.
//!
//! Every RPC call carries its own timeout (see `blockchain::client`); this
//! module only provides the backoff schedule used between failed probes.

pub mod backoff;
