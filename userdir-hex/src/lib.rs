//! # Userdir Hex
//!
//! Application service layer, transfer engine, and HTTP adapter for the
//! user directory service.
//!
//! ## Architecture
//!
//! - `engine` - Balance transfer engine (concurrency control lives here)
//! - `service` - Application service (orchestrates domain operations)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: AccountStore`, allowing
//! different store implementations to be injected.

pub mod engine;
pub mod inbound;
pub mod service;


pub use engine::TransferEngine;
pub use service::DirectoryService;
