//! Git integration module.
//!
//! Provides:
//! - GitRepo: note reads/writes via libgit2 notes
//! - Remote transfer: staging fetch, fast-forward-only notes push
//! - Ancestry checks against remote-tracking heads

mod remote;
mod repo;

pub use repo::GitRepo;
