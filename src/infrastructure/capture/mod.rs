//! Audio capture adapters

pub mod cpal_engine;

pub use cpal_engine::CpalCaptureEngine;
