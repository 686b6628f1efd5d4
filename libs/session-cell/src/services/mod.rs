pub mod booking;
pub mod negotiation;
