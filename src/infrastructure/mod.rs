//! Infrastructure layer - Store, pipeline and service implementations

pub mod batch;
pub mod catalog;
pub mod ingestion;
pub mod logging;
pub mod notification;
pub mod services;
