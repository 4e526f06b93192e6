//! Integration test driver for the `tests/integration/` submodules.
//!
//! Each `mod` below maps to a file that exercises the controller against
//! mock adapters.  All tests run on the host with no real hardware.

mod dispatcher_tests;
mod mock_hw;
