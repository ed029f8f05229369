use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown user role `{0}`")]
    UnknownRole(String),
    #[error("unknown transaction kind `{0}`")]
    UnknownKind(String),
    #[error("transaction {0} references neither a withdraw nor a deposit account")]
    NoAccounts(i64),
    #[error("transaction {0} references account {1} without its number")]
    MissingAccountNumber(i64, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Admin,
}

impl FromStr for UserRole {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "CUSTOMER" => Ok(Self::Customer),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ModelError::UnknownRole(other.to_owned())),
        }
    }
}

/// The `gubun` of a transaction record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl FromStr for TransactionKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAW" => Ok(Self::Withdraw),
            "TRANSFER" => Ok(Self::Transfer),
            other => Err(ModelError::UnknownKind(other.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Account {
    pub id: i64,
    pub number: i64,
    pub balance: i64,
    pub user_id: i64,
}

impl Account {
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub fullname: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub fullname: String,
    pub role: String,
}

impl TryFrom<UserRow> for User {
    type Error = ModelError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            fullname: row.fullname,
            role: row.role.parse()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRef {
    pub id: i64,
    pub number: i64,
}

/// One side of a transaction together with the balance that account had
/// right after the transaction was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub account: AccountRef,
    pub balance_after: Option<i64>,
}

/// Which accounts a transaction touches. A record always touches at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parties {
    Withdraw(Leg),
    Deposit(Leg),
    Transfer { withdraw: Leg, deposit: Leg },
}

impl Parties {
    pub fn withdraw(&self) -> Option<&Leg> {
        match self {
            Self::Withdraw(leg) | Self::Transfer { withdraw: leg, .. } => Some(leg),
            Self::Deposit(_) => None,
        }
    }

    pub fn deposit(&self) -> Option<&Leg> {
        match self {
            Self::Deposit(leg) | Self::Transfer { deposit: leg, .. } => Some(leg),
            Self::Withdraw(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub kind: TransactionKind,
    pub sender: String,
    pub receiver: String,
    pub amount: i64,
    pub parties: Parties,
    pub tel: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Transaction {
    pub fn withdraw_account_balance(&self) -> Option<i64> {
        self.parties.withdraw().and_then(|leg| leg.balance_after)
    }

    pub fn deposit_account_balance(&self) -> Option<i64> {
        self.parties.deposit().and_then(|leg| leg.balance_after)
    }
}

/// Flat shape of a transaction joined with the numbers of both accounts.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub gubun: String,
    pub sender: String,
    pub receiver: String,
    pub amount: i64,
    pub withdraw_account_id: Option<i64>,
    pub withdraw_account_number: Option<i64>,
    pub withdraw_account_balance: Option<i64>,
    pub deposit_account_id: Option<i64>,
    pub deposit_account_number: Option<i64>,
    pub deposit_account_balance: Option<i64>,
    pub tel: Option<String>,
    pub created_at: NaiveDateTime,
}

fn leg(
    transaction_id: i64,
    account_id: Option<i64>,
    number: Option<i64>,
    balance_after: Option<i64>,
) -> Result<Option<Leg>, ModelError> {
    let Some(id) = account_id else {
        return Ok(None);
    };
    let number = number.ok_or(ModelError::MissingAccountNumber(transaction_id, id))?;

    Ok(Some(Leg {
        account: AccountRef { id, number },
        balance_after,
    }))
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = ModelError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let withdraw = leg(
            row.id,
            row.withdraw_account_id,
            row.withdraw_account_number,
            row.withdraw_account_balance,
        )?;
        let deposit = leg(
            row.id,
            row.deposit_account_id,
            row.deposit_account_number,
            row.deposit_account_balance,
        )?;

        let parties = match (withdraw, deposit) {
            (Some(withdraw), Some(deposit)) => Parties::Transfer { withdraw, deposit },
            (Some(withdraw), None) => Parties::Withdraw(withdraw),
            (None, Some(deposit)) => Parties::Deposit(deposit),
            (None, None) => return Err(ModelError::NoAccounts(row.id)),
        };

        Ok(Self {
            id: row.id,
            kind: row.gubun.parse()?,
            sender: row.sender,
            receiver: row.receiver,
            amount: row.amount,
            parties,
            tel: row.tel,
            created_at: row.created_at,
        })
    }
}
