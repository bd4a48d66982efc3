//! End-to-end scenario tests for the engine method dispatcher.

mod scenarios;

const fn main() {}
