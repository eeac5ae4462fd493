//! egui rendering. Everything drawn here comes from a built `DashboardView`;
//! no statistics are computed while painting.

pub mod panels;
pub mod plot;
pub mod sections;
