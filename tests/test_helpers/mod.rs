//! Shared fakes and builders for integration tests.
