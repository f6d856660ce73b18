//! Scenario tests for the packet codec.

mod helpers;
