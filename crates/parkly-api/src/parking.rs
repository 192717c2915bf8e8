// Parking endpoints
//
// Both commands take pre-validated bodies: `NonZeroU64` ids guarantee that
// malformed identifiers never reach the wire.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::Error;
use crate::gateway::{RequestGateway, RequestOptions};
use crate::models::{ParkingSession, StartParking, StopParking};

impl RequestGateway {
    /// `POST /api/parking/start`
    pub async fn start_parking(&self, command: &StartParking) -> Result<ParkingSession, Error> {
        debug!(
            car_id = command.car_id.get(),
            parking_spot_id = command.parking_spot_id.get(),
            "starting parking"
        );
        let resp = self
            .call(
                "/api/parking/start",
                RequestOptions::post().with_json(command)?,
            )
            .await?;
        // Some deployments acknowledge with a bare message instead of the record.
        // The service has accepted the start either way.
        match resp.body {
            Value::Object(fields) => Ok(serde_json::from_value(Value::Object(fields.clone()))
                .unwrap_or_else(|e| {
                    warn!(error = %e, "unreadable parking session, keeping raw fields");
                    ParkingSession {
                        extra: fields,
                        ..ParkingSession::default()
                    }
                })),
            _ => Ok(ParkingSession::default()),
        }
    }

    /// `POST /api/parking/end`
    pub async fn stop_parking(&self, command: &StopParking) -> Result<Value, Error> {
        debug!(car_id = command.car_id.get(), "stopping parking");
        let resp = self
            .call("/api/parking/end", RequestOptions::post().with_json(command)?)
            .await?;
        Ok(resp.body)
    }
}
