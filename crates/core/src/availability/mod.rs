//! Availability-record collaborator ports

pub mod ports;
