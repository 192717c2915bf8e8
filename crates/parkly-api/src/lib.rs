// parkly-api: Async Rust client for the parking-management service

pub mod cars;
pub mod error;
pub mod gateway;
pub mod models;
pub mod parking;
pub mod transport;
pub mod users;

pub use error::Error;
pub use gateway::{ApiResponse, Outcome, RequestGateway, RequestOptions, ResponseInspector};
pub use models::{
    CarRecord, LoginResponse, NewCar, ParkingSession, Registration, StartParking, StopParking,
    UserId, UserRecord,
};
pub use transport::{TlsMode, TransportConfig};
