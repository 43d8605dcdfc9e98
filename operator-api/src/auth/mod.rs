//! Operator authentication and ability checks

pub mod ability;
pub mod operator_auth;

pub use ability::{Ability, Principal, assert_ability};
