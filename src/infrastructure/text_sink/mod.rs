//! Text insertion adapters

pub mod enigo;
pub mod noop;

pub use self::enigo::EnigoTextSink;
pub use noop::NoOpTextSink;
