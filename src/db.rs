use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Account, Transaction, TransactionRow, User, UserRow};

pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(1)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

pub async fn find_user(pool: &PgPool, user_id: i64) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, UserRow>("SELECT id, fullname, role FROM user_tb WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(User::try_from).transpose()?)
}

pub async fn find_account_by_number(
    pool: &PgPool,
    number: i64,
) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(
        "SELECT id, number, balance, user_id FROM account_tb WHERE number = $1",
    )
    .bind(number)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}

pub async fn find_accounts_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Account>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(
        "SELECT id, number, balance, user_id FROM account_tb WHERE user_id = $1 ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(accounts)
}

/// Transactions touching the account, most recent first.
pub async fn find_transactions_by_account(
    pool: &PgPool,
    account_id: i64,
) -> Result<Vec<Transaction>, AppError> {
    let rows = sqlx::query_as::<_, TransactionRow>(
        "SELECT t.id, t.gubun, t.sender, t.receiver, t.amount, \
                t.withdraw_account_id, wa.number AS withdraw_account_number, t.withdraw_account_balance, \
                t.deposit_account_id, da.number AS deposit_account_number, t.deposit_account_balance, \
                t.tel, t.created_at \
         FROM transaction_tb t \
         LEFT JOIN account_tb wa ON wa.id = t.withdraw_account_id \
         LEFT JOIN account_tb da ON da.id = t.deposit_account_id \
         WHERE t.withdraw_account_id = $1 OR t.deposit_account_id = $1 \
         ORDER BY t.created_at DESC, t.id DESC",
    )
    .bind(account_id)
    .fetch_all(pool)
    .await?;

    let transactions = rows
        .into_iter()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}
