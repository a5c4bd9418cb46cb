//! API services: the transport plus one module per admin domain.

pub mod auth;
pub mod blog;
pub mod certification;
pub mod client;
pub mod collection;
pub mod comment;
pub mod contact;
pub mod dashboard;
pub mod education;
pub mod experience;
pub mod media;
pub mod newsletter;
pub mod project;
pub mod resource;
pub mod settings;
pub mod skill;
pub mod testimonial;
