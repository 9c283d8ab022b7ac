//! Unit tests for the volunteer task lifecycle.
