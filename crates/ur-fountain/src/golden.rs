//! Golden vector tests for the fountain transport.
//!
//! These tests pin down deterministic, interop-critical behavior with
//! concrete scenarios and reference values.
