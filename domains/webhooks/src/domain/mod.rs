//! Webhooks domain model

pub mod entities;
