//! Gateway Tests

mod conversation_tests;
mod room_tests;
