//! Order engine tests over an in-memory database

pub(crate) mod fixtures;
