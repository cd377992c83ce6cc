//! Audio domain: frame batches, sessions, format conversion, WAV encoding

pub mod blob;
pub mod frame;
pub mod resample;
pub mod session;
pub mod wav;

pub use blob::{EncodedAudioBlob, PcmFormat};
pub use frame::AudioFrameBatch;
pub use resample::{resample, ConversionFailed, TARGET_SAMPLE_RATE};
pub use session::{RecordingSession, SessionId};
pub use wav::{encode, EncodeError};
