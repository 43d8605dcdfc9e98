//! Abilities granted to a caller
//!
//! The ability set is decided once per request from the verified token and
//! handed to every service function, which checks it before touching storage.

use serde::{Deserialize, Serialize};
use shared::error::AppError;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Operator,
    Driver,
    Storage,
    Reviews,
    Cook,
    Stats,
}

impl Ability {
    pub const fn name(&self) -> &'static str {
        match self {
            Ability::Operator => "operator",
            Ability::Driver => "driver",
            Ability::Storage => "storage",
            Ability::Reviews => "reviews",
            Ability::Cook => "cook",
            Ability::Stats => "stats",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "operator" => Some(Ability::Operator),
            "driver" => Some(Ability::Driver),
            "storage" => Some(Ability::Storage),
            "reviews" => Some(Ability::Reviews),
            "cook" => Some(Ability::Cook),
            "stats" => Some(Ability::Stats),
            _ => None,
        }
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i64,
    abilities: BTreeSet<Ability>,
}

impl Principal {
    pub fn new(user_id: i64, abilities: impl IntoIterator<Item = Ability>) -> Self {
        Self {
            user_id,
            abilities: abilities.into_iter().collect(),
        }
    }

    /// Build from token claim strings; unknown names are dropped.
    pub fn from_claims(user_id: i64, names: &[String]) -> Self {
        let abilities = names.iter().filter_map(|name| {
            let ability = Ability::from_name(name);
            if ability.is_none() {
                tracing::debug!(user_id, ability = %name, "Ignoring unknown ability in token");
            }
            ability
        });
        Self::new(user_id, abilities)
    }

    pub fn can(&self, ability: Ability) -> bool {
        self.abilities.contains(&ability)
    }

    pub fn abilities(&self) -> impl Iterator<Item = Ability> + '_ {
        self.abilities.iter().copied()
    }
}

/// Fail with `PermissionDenied` unless the principal holds `ability`.
pub fn assert_ability(principal: &Principal, ability: Ability) -> Result<(), AppError> {
    if principal.can(ability) {
        Ok(())
    } else {
        tracing::warn!(user_id = principal.user_id, %ability, "Ability check failed");
        Err(AppError::permission_denied(format!("Missing ability: {ability}"))
            .with_detail("ability", ability.name()))
    }
}
