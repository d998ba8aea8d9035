//! Test modules for the station binary.

mod scenario_tests;
