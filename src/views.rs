//! Response view-models for account endpoints.
//!
//! Account-level views are plain structs. The transaction carried inside the
//! deposit, withdraw, transfer and detail views is one [`TransactionView`]
//! whose serialized fields are chosen by its [`ViewKind`].

use chrono::NaiveDateTime;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{Account, Parties, Transaction, TransactionKind, User};

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NO_TEL: &str = "없음";

pub const SUCCESS_CODE: i32 = 1;
pub const FAILURE_CODE: i32 = -1;

/// Envelope wrapped around every JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDto<T> {
    pub code: i32,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> ResponseDto<T> {
    pub fn success(msg: impl Into<String>, data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            msg: msg.into(),
            data: Some(data),
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            code: FAILURE_CODE,
            msg: msg.into(),
            data: None,
        }
    }
}

pub fn format_timestamp(at: &NaiveDateTime) -> String {
    at.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Id,
    Gubun,
    Sender,
    Receiver,
    Amount,
    Tel,
    CreatedAt,
    Balance,
}

impl TransactionField {
    const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Gubun => "gubun",
            Self::Sender => "sender",
            Self::Receiver => "receiver",
            Self::Amount => "amount",
            Self::Tel => "tel",
            Self::CreatedAt => "createdAt",
            Self::Balance => "balance",
        }
    }
}

/// The response a transaction is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Deposit,
    Withdraw,
    Transfer,
    Detail,
}

impl ViewKind {
    /// Serialized fields, in output order.
    pub const fn fields(self) -> &'static [TransactionField] {
        use TransactionField::*;

        match self {
            Self::Deposit => &[Id, Gubun, Sender, Receiver, Amount, Tel, CreatedAt],
            Self::Withdraw | Self::Transfer => &[Id, Gubun, Sender, Receiver, Amount, CreatedAt],
            Self::Detail => &[Id, Gubun, Amount, Sender, Receiver, Tel, CreatedAt, Balance],
        }
    }

    /// Whether the view keeps the deposit-side balance for in-process checks.
    /// It is never serialized.
    const fn keeps_deposit_balance(self) -> bool {
        matches!(self, Self::Deposit | Self::Transfer)
    }
}

/// Balance shown to the owner of `viewing_number` for one transaction.
///
/// A withdrawal shows the withdraw side and a deposit the deposit side. For a
/// transfer the viewer sees the deposit side only when they own the deposit
/// account; every other viewer sees the withdraw side.
pub fn resolve_balance(transaction: &Transaction, viewing_number: i64) -> Option<i64> {
    match &transaction.parties {
        Parties::Withdraw(withdraw) => withdraw.balance_after,
        Parties::Deposit(deposit) => deposit.balance_after,
        Parties::Transfer { withdraw, deposit } => {
            if deposit.account.number == viewing_number {
                deposit.balance_after
            } else {
                withdraw.balance_after
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionView {
    kind: ViewKind,
    id: i64,
    gubun: TransactionKind,
    sender: String,
    receiver: String,
    amount: i64,
    tel: Option<String>,
    created_at: String,
    balance: Option<i64>,
    deposit_account_balance: Option<i64>,
}

impl TransactionView {
    /// Projects a transaction for one of the views that carry no viewer.
    pub fn new(kind: ViewKind, transaction: &Transaction) -> Self {
        Self {
            kind,
            id: transaction.id,
            gubun: transaction.kind,
            sender: transaction.sender.clone(),
            receiver: transaction.receiver.clone(),
            amount: transaction.amount,
            tel: transaction.tel.clone(),
            created_at: format_timestamp(&transaction.created_at),
            balance: None,
            deposit_account_balance: if kind.keeps_deposit_balance() {
                transaction.deposit_account_balance()
            } else {
                None
            },
        }
    }

    /// Projects a transaction into an account-detail row as seen from
    /// `viewing_number`.
    pub fn project(transaction: &Transaction, viewing_number: i64) -> Self {
        let mut view = Self::new(ViewKind::Detail, transaction);
        view.balance = resolve_balance(transaction, viewing_number);
        view.tel = Some(
            transaction
                .tel
                .clone()
                .unwrap_or_else(|| NO_TEL.to_owned()),
        );
        view
    }

    pub fn tel(&self) -> Option<&str> {
        self.tel.as_deref()
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    pub fn balance(&self) -> Option<i64> {
        self.balance
    }

    pub fn deposit_account_balance(&self) -> Option<i64> {
        self.deposit_account_balance
    }
}

impl Serialize for TransactionView {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.kind.fields();
        let mut map = serializer.serialize_map(Some(fields.len()))?;

        for field in fields {
            let key = field.key();
            match field {
                TransactionField::Id => map.serialize_entry(key, &self.id)?,
                TransactionField::Gubun => map.serialize_entry(key, &self.gubun)?,
                TransactionField::Sender => map.serialize_entry(key, &self.sender)?,
                TransactionField::Receiver => map.serialize_entry(key, &self.receiver)?,
                TransactionField::Amount => map.serialize_entry(key, &self.amount)?,
                TransactionField::Tel => map.serialize_entry(key, &self.tel)?,
                TransactionField::CreatedAt => map.serialize_entry(key, &self.created_at)?,
                TransactionField::Balance => map.serialize_entry(key, &self.balance)?,
            }
        }

        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSaveResponse {
    pub id: i64,
    pub number: i64,
    pub balance: i64,
}

impl From<&Account> for AccountSaveResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            number: account.number,
            balance: account.balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: i64,
    pub number: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountListResponse {
    pub fullname: String,
    pub accounts: Vec<AccountSummary>,
}

impl AccountListResponse {
    pub fn new(user: &User, accounts: &[Account]) -> Self {
        Self {
            fullname: user.fullname.clone(),
            accounts: accounts
                .iter()
                .map(|account| AccountSummary {
                    id: account.id,
                    number: account.number,
                    balance: account.balance,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDepositResponse {
    pub id: i64,
    pub number: i64,
    pub transaction: TransactionView,
}

impl AccountDepositResponse {
    pub fn new(account: &Account, transaction: &Transaction) -> Self {
        Self {
            id: account.id,
            number: account.number,
            transaction: TransactionView::new(ViewKind::Deposit, transaction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountWithdrawResponse {
    pub id: i64,
    pub number: i64,
    pub balance: i64,
    pub transaction: TransactionView,
}

impl AccountWithdrawResponse {
    pub fn new(account: &Account, transaction: &Transaction) -> Self {
        Self {
            id: account.id,
            number: account.number,
            balance: account.balance,
            transaction: TransactionView::new(ViewKind::Withdraw, transaction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountTransferResponse {
    pub id: i64,
    pub number: i64,
    pub balance: i64,
    pub transaction: TransactionView,
}

impl AccountTransferResponse {
    pub fn new(account: &Account, transaction: &Transaction) -> Self {
        Self {
            id: account.id,
            number: account.number,
            balance: account.balance,
            transaction: TransactionView::new(ViewKind::Transfer, transaction),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDetailResponse {
    pub id: i64,
    pub number: i64,
    pub balance: i64,
    pub transactions: Vec<TransactionView>,
}

impl AccountDetailResponse {
    pub fn new(account: &Account, transactions: &[Transaction]) -> Self {
        Self {
            id: account.id,
            number: account.number,
            balance: account.balance,
            transactions: transactions
                .iter()
                .map(|transaction| TransactionView::project(transaction, account.number))
                .collect(),
        }
    }
}
