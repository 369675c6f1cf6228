pub mod custodian_tests;
pub mod planner_tests;
