//! Concrete entropy sources.

pub mod counting;
pub mod os;
pub mod reader;
pub mod rng;

pub use counting::CountingSource;
pub use os::OsSource;
pub use reader::ReaderSource;
pub use rng::RngSource;
