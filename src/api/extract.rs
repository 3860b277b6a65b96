use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections are reported through `AppError`, so a malformed
/// body gets the same JSON error shape as every other failure
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
