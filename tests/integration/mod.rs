//! Integration test modules.

mod workout_execution_test;
