//! Query executor module.

mod plan;
mod runner;

pub use plan::QueryPlan;
pub use runner::QueryRunner;
