//! Business logic services.

pub mod maintenance_service;

pub use maintenance_service::{
    CreateWindowRequest, CurrentStatus, MaintenanceService, TickSummary, UpdateWindowRequest,
    WindowPage,
};
