//! Unit and scenario tests for the planning core.


mod hierarchy_tests;
mod invariant_tests;
mod priority_tests;
mod store_tests;
