//! Flutter bridge surface for Notely core.

pub mod api;
