// Domain layer: park, zone, reservation and user records plus the ports the
// service layer talks through. No dependencies on other layers.

pub mod event;
pub mod invoice;
pub mod park;
pub mod ports;
pub mod reservation;
pub mod user;
pub mod zone;
