//! User Model
//!
//! Users carry a JSON array of role names. Some roles attach extra data
//! (for example a cook belongs to a storage), surfaced as `additional`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Back-office role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Every registered customer; never assigned through the back office
    User,
    Driver,
    Storage,
    Operator,
    Reviews,
    Cook,
    Stats,
}

impl Role {
    /// Roles an operator may grant, in display order
    pub const ASSIGNABLE: [Role; 6] = [
        Role::Driver,
        Role::Storage,
        Role::Operator,
        Role::Reviews,
        Role::Cook,
        Role::Stats,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Driver => "driver",
            Role::Storage => "storage",
            Role::Operator => "operator",
            Role::Reviews => "reviews",
            Role::Cook => "cook",
            Role::Stats => "stats",
        }
    }

    /// Human-readable label shown in the back office
    pub const fn label(&self) -> &'static str {
        match self {
            Role::User => "Користувач",
            Role::Driver => "Водій",
            Role::Storage => "Кафе",
            Role::Operator => "Оператор",
            Role::Reviews => "Відгуки",
            Role::Cook => "Кухар",
            Role::Stats => "Статистика",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "user" => Some(Role::User),
            "driver" => Some(Role::Driver),
            "storage" => Some(Role::Storage),
            "operator" => Some(Role::Operator),
            "reviews" => Some(Role::Reviews),
            "cook" => Some(Role::Cook),
            "stats" => Some(Role::Stats),
            _ => None,
        }
    }

    /// name → label for every assignable role
    pub fn labels() -> BTreeMap<&'static str, &'static str> {
        Self::ASSIGNABLE
            .iter()
            .map(|role| (role.name(), role.label()))
            .collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// User row as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    /// JSON array of role names
    #[cfg_attr(feature = "db", sqlx(json))]
    pub roles: Vec<String>,
}

impl UserRow {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.name())
    }
}

/// User as listed in the back office
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub roles: Vec<String>,
    /// Role-specific data, e.g. `{"storage_id": 3}` for cooks
    pub additional: Map<String, Value>,
}

impl From<UserRow> for UserView {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            phone: row.phone,
            roles: row.roles,
            additional: Map::new(),
        }
    }
}

/// Profile of the authenticated caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub roles: Vec<String>,
}

impl From<UserRow> for UserProfile {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            phone: row.phone,
            avatar: row.avatar,
            roles: row.roles,
        }
    }
}

/// Replace a user's roles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetUserRoles {
    pub roles: Vec<String>,
    /// Storage a cook is attached to; required when `roles` contains `cook`
    #[serde(default)]
    pub storage_id: Option<i64>,
}

impl SetUserRoles {
    pub fn contains(&self, role: Role) -> bool {
        self.roles.iter().any(|r| r == role.name())
    }
}
