//! Voxa: a session-oriented voice agent service.
//!
//! Callers create named sessions, each bound to a persona (system prompt), a
//! model and a set of tools, then exchange turns with them. Replies are shaped
//! for speech: short, plain sentences without markup.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use voxa::prelude::*;
//!
//! # async fn example() -> voxa::error::Result<()> {
//! let providers = Arc::new(ProviderRegistry::with_defaults(VoxaConfig::from_env()));
//! let sessions = SessionRegistry::new(Arc::new(ToolRegistry::builtin()), providers);
//!
//! let config = AgentConfig::builder()
//!     .system_prompt("You are the front desk of a small bistro.")
//!     .preset("restaurant")
//!     .build();
//! let session = sessions.create("caller-1", config).await?;
//! let reply = session.chat("Do you have a table for four tonight?").await?;
//! println!("{}", reply.text);
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;

#[cfg(feature = "server")]
pub mod cli;

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "server")]
pub mod telemetry;
