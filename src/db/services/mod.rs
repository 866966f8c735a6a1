//! High-level data access API. Encapsulates all query logic so handlers, the
//! monitor, and the bot work with domain models without touching the schema
//! directly. One sub-module per domain entity; everything is re-exported here
//! for access under `crate::db::services::`.

pub mod audit_service;
pub mod document_service;
pub mod event_service;
pub mod inventory_service;
pub mod settings_service;
pub mod ticket_service;
pub mod user_service;

pub use audit_service::*;
pub use document_service::*;
pub use event_service::*;
pub use inventory_service::*;
pub use settings_service::*;
pub use ticket_service::*;
pub use user_service::*;
