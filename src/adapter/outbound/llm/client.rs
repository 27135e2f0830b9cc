//! Scripted LLM used by unit tests.
