//! User-record collaborator ports

pub mod ports;
