//! Clients for the external systems the bot talks to.
//!
//! - [`git`]: the remote configuration repository, reached through the system
//!   `git` binary. Every operation gets its own throwaway working copy.

pub mod git;
