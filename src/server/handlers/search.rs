use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};

use crate::api::DynSession;
use crate::entities::Session;
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct QueryParams {
    query: String,
}

pub async fn open(Extension(api): Extension<DynSession>) -> Result<Json<Session>, Error> {
    api.open_search().await?;

    Ok(api.snapshot().into())
}

pub async fn close(Extension(api): Extension<DynSession>) -> Result<Json<Session>, Error> {
    api.close_search().await?;

    Ok(api.snapshot().into())
}

pub async fn query(
    Extension(api): Extension<DynSession>,
    Json(params): Json<QueryParams>,
) -> Result<Json<Session>, Error> {
    api.set_query(params.query).await?;

    Ok(api.snapshot().into())
}

pub async fn select(
    Extension(api): Extension<DynSession>,
    Path(id): Path<usize>,
) -> Result<Json<Session>, Error> {
    api.select_candidate(id).await?;

    Ok(api.snapshot().into())
}
