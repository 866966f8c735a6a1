//! SeaORM entities, one module per table.

pub mod audit_log;
pub mod calendar_event;
pub mod document;
pub mod inventory_item;
pub mod setting;
pub mod ticket;
pub mod user;

// Prelude module for easy importing of all entities and their related types.
pub mod prelude {
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;
    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;

    pub use super::inventory_item::ActiveModel as InventoryItemActiveModel;
    pub use super::inventory_item::Column as InventoryItemColumn;
    pub use super::inventory_item::Entity as InventoryItem;
    pub use super::inventory_item::Model as InventoryItemModel;

    pub use super::ticket::ActiveModel as TicketActiveModel;
    pub use super::ticket::Column as TicketColumn;
    pub use super::ticket::Entity as Ticket;
    pub use super::ticket::Model as TicketModel;

    pub use super::document::ActiveModel as DocumentActiveModel;
    pub use super::document::Column as DocumentColumn;
    pub use super::document::Entity as Document;
    pub use super::document::Model as DocumentModel;

    pub use super::calendar_event::ActiveModel as CalendarEventActiveModel;
    pub use super::calendar_event::Column as CalendarEventColumn;
    pub use super::calendar_event::Entity as CalendarEvent;
    pub use super::calendar_event::Model as CalendarEventModel;

    pub use super::audit_log::ActiveModel as AuditLogActiveModel;
    pub use super::audit_log::Column as AuditLogColumn;
    pub use super::audit_log::Entity as AuditLog;
    pub use super::audit_log::Model as AuditLogModel;

    pub use super::setting::ActiveModel as SettingActiveModel;
    pub use super::setting::Column as SettingColumn;
    pub use super::setting::Entity as Setting;
    pub use super::setting::Model as SettingModel;
}
