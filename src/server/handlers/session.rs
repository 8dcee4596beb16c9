use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynSession;
use crate::entities::{Authorization, Coordinate, Session};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct AuthorizationParams {
    authorization: Authorization,
}

pub async fn find(Extension(api): Extension<DynSession>) -> Json<Session> {
    api.snapshot().into()
}

pub async fn authorization(
    Extension(api): Extension<DynSession>,
    Json(params): Json<AuthorizationParams>,
) -> Result<Json<Session>, Error> {
    api.authorization_changed(params.authorization).await?;

    Ok(api.snapshot().into())
}

pub async fn refresh_location(
    Extension(api): Extension<DynSession>,
) -> Result<Json<Session>, Error> {
    api.refresh_location().await?;

    Ok(api.snapshot().into())
}

pub async fn set_source(
    Extension(api): Extension<DynSession>,
    Json(coordinate): Json<Coordinate>,
) -> Result<Json<Session>, Error> {
    api.set_source(coordinate).await?;

    Ok(api.snapshot().into())
}

pub async fn dismiss_alert(Extension(api): Extension<DynSession>) -> Result<Json<Session>, Error> {
    api.dismiss_alert().await?;

    Ok(api.snapshot().into())
}

pub async fn retry(Extension(api): Extension<DynSession>) -> Result<Json<Session>, Error> {
    api.retry().await?;

    Ok(api.snapshot().into())
}
