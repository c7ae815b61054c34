//! Unit tests for ssm-shell
//!
//! These tests drive whole sessions against in-memory fakes and run fast
//! without touching any cloud account.

mod architecture;
mod property_tests;
