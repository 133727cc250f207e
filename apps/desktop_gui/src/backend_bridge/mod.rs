//! Backend bridge: command queue types and the worker thread that drains it.

pub mod commands;
pub mod runtime;
