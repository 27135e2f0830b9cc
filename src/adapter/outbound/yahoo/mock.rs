//! Canned market data for unit tests.
