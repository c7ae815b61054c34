//! Integration tests for ssm-shell
//!
//! These tests spawn the actual binary and check behaviour that does not
//! need a cloud account.

mod cli_tests;
