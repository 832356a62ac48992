//! Shared fixtures and assertions for the integration tests.
