//! Inputs and outcome of the all-or-nothing family setup write.

use babycontrol_core::types::DbId;

use crate::models::baby::{Baby, CreateBaby};
use crate::models::caretaker::Caretaker;
use crate::models::family::Family;
use crate::models::settings::Settings;

/// Who is creating the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOrigin {
    /// A holder of setup token `id`; the token is consumed in the same transaction.
    Token(DbId),
    /// An account without a family; the account is linked in the same transaction.
    Account(DbId),
}

/// A caretaker to create alongside the family. The PIN arrives hashed.
#[derive(Debug, Clone)]
pub struct SetupCaretaker {
    pub login_id: String,
    pub name: String,
    pub caretaker_type: Option<String>,
    pub role: String,
    pub security_pin_hash: String,
}

/// Everything written by a family setup.
#[derive(Debug, Clone)]
pub struct FamilySetup {
    pub slug: String,
    pub name: String,
    pub security_pin_hash: String,
    pub auth_type: String,
    pub caretakers: Vec<SetupCaretaker>,
    pub baby: Option<CreateBaby>,
    pub origin: SetupOrigin,
}

/// Rows created by a successful setup.
#[derive(Debug, Clone)]
pub struct CreatedFamily {
    pub family: Family,
    pub settings: Settings,
    pub caretakers: Vec<Caretaker>,
    pub baby: Option<Baby>,
}

/// Result of a setup attempt. Non-`Created` outcomes roll back.
#[derive(Debug)]
pub enum SetupOutcome {
    Created(Box<CreatedFamily>),
    /// The setup token was already used or has expired.
    TokenSpent,
    /// The account is already linked to a family.
    AccountAlreadyLinked,
}
