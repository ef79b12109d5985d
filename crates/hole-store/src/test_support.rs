//! Shared test utilities for hole-store unit tests.
