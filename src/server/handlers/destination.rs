use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynSession;
use crate::entities::{Coordinate, Session};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct SetParams {
    coordinate: Coordinate,
    name: Option<String>,
}

pub async fn set(
    Extension(api): Extension<DynSession>,
    Json(params): Json<SetParams>,
) -> Result<Json<Session>, Error> {
    api.set_destination(params.coordinate, params.name).await?;

    Ok(api.snapshot().into())
}

pub async fn tap(
    Extension(api): Extension<DynSession>,
    Json(coordinate): Json<Coordinate>,
) -> Result<Json<Session>, Error> {
    api.tap_map(coordinate).await?;

    Ok(api.snapshot().into())
}

pub async fn clear(Extension(api): Extension<DynSession>) -> Result<Json<Session>, Error> {
    api.clear_destination().await?;

    Ok(api.snapshot().into())
}
