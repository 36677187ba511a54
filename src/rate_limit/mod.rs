pub mod debouncer;

pub use debouncer::Debouncer;
