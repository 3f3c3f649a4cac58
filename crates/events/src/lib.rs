//! Domain events emitted by storefront aggregates.

pub mod event;

pub use event::Event;
