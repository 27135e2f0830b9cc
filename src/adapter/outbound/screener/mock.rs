//! In-memory company source for unit tests.
