//! Encoded audio blob value object

/// Declared PCM format of an encoded blob
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl PcmFormat {
    /// The speech format the transcription service expects:
    /// mono, 16 kHz, 16-bit
    pub const fn speech() -> Self {
        Self {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
        }
    }
}

impl Default for PcmFormat {
    fn default() -> Self {
        Self::speech()
    }
}

/// Immutable encoded audio produced once per recording session and consumed
/// exactly once by the transcription client.
#[derive(Debug, Clone)]
pub struct EncodedAudioBlob {
    bytes: Vec<u8>,
    format: PcmFormat,
}

impl EncodedAudioBlob {
    pub fn new(bytes: Vec<u8>, format: PcmFormat) -> Self {
        Self { bytes, format }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }

    /// Human-readable size for status lines
    pub fn human_readable_size(&self) -> String {
        let bytes = self.size_bytes();
        if bytes < 1024 {
            format!("{} B", bytes)
        } else if bytes < 1024 * 1024 {
            format!("{:.1} KB", bytes as f64 / 1024.0)
        } else {
            format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
        }
    }
}
