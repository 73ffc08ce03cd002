//! Bulk action coordination

mod coordinator;

pub use coordinator::BatchOperationCoordinator;
