use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};

use crate::db;
use crate::error::AppError;
use crate::models::Account;
use crate::routes::AppState;
use crate::security::Caller;
use crate::views::{AccountDetailResponse, AccountListResponse, ResponseDto};

pub async fn handler_health() -> &'static str {
    "OK"
}

pub async fn handler_account_list(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ResponseDto<AccountListResponse>>, AppError> {
    let user = db::find_user(&state.pool, caller.user_id())
        .await?
        .ok_or(AppError::UserNotFound)?;
    let accounts = db::find_accounts_by_user(&state.pool, user.id).await?;

    Ok(Json(ResponseDto::success(
        "유저별 계좌목록보기 성공",
        AccountListResponse::new(&user, &accounts),
    )))
}

fn ensure_owner(account: &Account, caller: &Caller) -> Result<(), AppError> {
    if account.is_owned_by(caller.user_id()) {
        return Ok(());
    }

    tracing::debug!(
        number = account.number,
        user_id = caller.user_id(),
        "account detail refused"
    );
    Err(AppError::NotAccountOwner)
}

pub async fn handler_account_detail(
    Path(number): Path<i64>,
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<ResponseDto<AccountDetailResponse>>, AppError> {
    let account = db::find_account_by_number(&state.pool, number)
        .await?
        .ok_or(AppError::AccountNotFound)?;

    ensure_owner(&account, &caller)?;

    let transactions = db::find_transactions_by_account(&state.pool, account.id).await?;

    Ok(Json(ResponseDto::success(
        "계좌상세보기 성공",
        AccountDetailResponse::new(&account, &transactions),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn account() -> Account {
        Account {
            id: 1,
            number: 1111,
            balance: 1000,
            user_id: 1,
        }
    }

    #[test]
    fn owner_may_view_account() {
        assert!(ensure_owner(&account(), &Caller::new(1, UserRole::Customer)).is_ok());
    }

    #[test]
    fn other_user_is_refused() {
        let result = ensure_owner(&account(), &Caller::new(2, UserRole::Customer));

        assert!(matches!(result, Err(AppError::NotAccountOwner)));
    }
}
