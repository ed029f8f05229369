use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::ModelError;
use crate::views::ResponseDto;

pub const SERVER_ERROR_MESSAGE: &str = "서버 오류";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("계좌를 찾을 수 없습니다")]
    AccountNotFound,
    #[error("계좌 소유자가 아닙니다")]
    NotAccountOwner,
    #[error("유저를 찾을 수 없습니다")]
    UserNotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt record: {0}")]
    Model(#[from] ModelError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::AccountNotFound | Self::NotAccountOwner | Self::UserNotFound => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(_) | Self::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            SERVER_ERROR_MESSAGE.to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ResponseDto::<()>::failure(msg))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::AccountNotFound, StatusCode::BAD_REQUEST)]
    #[case(AppError::NotAccountOwner, StatusCode::BAD_REQUEST)]
    #[case(AppError::Database(sqlx::Error::RowNotFound), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Model(ModelError::NoAccounts(1)), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    async fn body_of(error: AppError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[rstest]
    #[case(
        AppError::AccountNotFound,
        r#"{"code":-1,"msg":"계좌를 찾을 수 없습니다","data":null}"#
    )]
    #[case(
        AppError::NotAccountOwner,
        r#"{"code":-1,"msg":"계좌 소유자가 아닙니다","data":null}"#
    )]
    #[case(
        AppError::UserNotFound,
        r#"{"code":-1,"msg":"유저를 찾을 수 없습니다","data":null}"#
    )]
    #[tokio::test]
    async fn client_errors_render_their_message(
        #[case] error: AppError,
        #[case] expected: &str,
    ) {
        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn server_errors_hide_their_cause() {
        let error = AppError::Database(sqlx::Error::Protocol("relation account_tb is gone".to_owned()));
        let cause = error.to_string();

        let (status, body) = body_of(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, r#"{"code":-1,"msg":"서버 오류","data":null}"#);
        assert!(!body.contains("account_tb"));
        assert!(!body.contains(&cause));
    }
}
