//! Request interceptors applied by the transport.

pub mod auth;
