pub mod reports;
pub mod scenarios;
pub mod tester;

pub use scenarios::{ScenarioEnv, find_scenario, list_scenarios};
pub use tester::*;
