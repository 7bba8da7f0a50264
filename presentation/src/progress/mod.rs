//! Progress display while a turn streams

pub mod reporter;
