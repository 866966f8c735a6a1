use sea_orm::entity::prelude::*;
use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "user_role_enum")]
pub enum UserRole {
    #[sea_orm(string_value = "engineer")]
    #[serde(rename = "engineer")]
    Engineer,
    #[sea_orm(string_value = "accountant")]
    #[serde(rename = "accountant")]
    Accountant,
    #[sea_orm(string_value = "admin")]
    #[serde(rename = "admin")]
    Admin,
    #[sea_orm(string_value = "superAdmin")]
    #[serde(rename = "superAdmin")]
    SuperAdmin,
}

impl UserRole {
    /// Whether a user with this role may act in a context requiring `required`.
    /// Admins satisfy any non-super-admin requirement; super-admin is exclusive.
    pub fn can_act_as(&self, required: &UserRole) -> bool {
        match required {
            UserRole::SuperAdmin => matches!(self, UserRole::SuperAdmin),
            UserRole::Admin => self.is_admin(),
            _ => self == required || self.is_admin(),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "item_category_enum")]
pub enum ItemCategory {
    #[sea_orm(string_value = "consumable")]
    #[serde(rename = "consumable")]
    Consumable,
    #[sea_orm(string_value = "material")]
    #[serde(rename = "material")]
    Material,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "ticket_status_enum")]
pub enum TicketStatus {
    #[sea_orm(string_value = "open")]
    #[serde(rename = "open")]
    Open,
    #[sea_orm(string_value = "in_progress")]
    #[serde(rename = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    #[serde(rename = "resolved")]
    Resolved,
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Engineer.can_act_as(&UserRole::Engineer));
        assert!(UserRole::Admin.can_act_as(&UserRole::Engineer));
        assert!(UserRole::SuperAdmin.can_act_as(&UserRole::Accountant));
        assert!(!UserRole::Accountant.can_act_as(&UserRole::Engineer));
        assert!(!UserRole::Engineer.can_act_as(&UserRole::Admin));
        assert!(UserRole::SuperAdmin.can_act_as(&UserRole::Admin));
        assert!(!UserRole::Admin.can_act_as(&UserRole::SuperAdmin));
    }
}
