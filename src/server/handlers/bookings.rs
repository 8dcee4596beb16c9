use axum::extract::{Extension, Json, Path};

use crate::api::DynSession;
use crate::entities::{Booking, Session};
use crate::error::Error;

pub async fn create(Extension(api): Extension<DynSession>) -> Result<Json<Booking>, Error> {
    let booking = api.confirm_booking().await?;

    Ok(booking.into())
}

pub async fn cancel(
    Extension(api): Extension<DynSession>,
    Path(id): Path<String>,
) -> Result<Json<Session>, Error> {
    api.cancel_booking(id).await?;

    Ok(api.snapshot().into())
}
