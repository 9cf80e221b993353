mod common;
mod service;

pub(crate) use common::*;
