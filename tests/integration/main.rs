//! Integration tests for hackterm.

mod cli_test;
mod document_test;
mod session_test;
