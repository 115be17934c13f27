//! Driving adapters: everything that turns external input into domain
//! calls.

pub mod http;
