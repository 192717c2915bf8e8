// Car endpoints

use std::num::NonZeroU64;

use serde_json::Value;
use tracing::warn;

use crate::error::Error;
use crate::gateway::{RequestGateway, RequestOptions};
use crate::models::{CarRecord, NewCar};

impl RequestGateway {
    /// `GET /api/cars` -- every car owned by the session's user.
    ///
    /// Records without a usable `id` are skipped with a warning; the rest
    /// of the list is still returned.
    pub async fn list_cars(&self) -> Result<Vec<CarRecord>, Error> {
        let records: Vec<Value> = self.call("/api/cars", RequestOptions::get()).await?.json()?;
        Ok(records
            .into_iter()
            .filter_map(|record| match serde_json::from_value(record) {
                Ok(car) => Some(car),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable car record");
                    None
                }
            })
            .collect())
    }

    /// `POST /api/cars`
    pub async fn create_car(&self, car: &NewCar) -> Result<CarRecord, Error> {
        self.call("/api/cars", RequestOptions::post().with_json(car)?)
            .await?
            .json()
    }

    /// `DELETE /api/cars/{id}`
    pub async fn delete_car(&self, id: NonZeroU64) -> Result<Value, Error> {
        let resp = self
            .call(&format!("/api/cars/{id}"), RequestOptions::delete())
            .await?;
        Ok(resp.body)
    }
}
