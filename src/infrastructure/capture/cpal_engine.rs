//! Microphone capture engine using cpal
//!
//! The cpal stream is not Send, so it lives on a dedicated thread for the
//! whole session; an atomic flag tells that thread when to tear the stream
//! down. The device callback does the minimum possible work: copy the
//! delivered block into a frame batch, append it to the live session, and
//! publish a peak-level sample for metering. Format conversion and WAV
//! encoding happen after stop, off the callback thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleFormat, SampleRate, StreamConfig};
use tokio::sync::{oneshot, watch};

use crate::application::ports::{CaptureEngine, CaptureError};
use crate::domain::audio::{
    encode, resample, AudioFrameBatch, EncodedAudioBlob, PcmFormat, RecordingSession, SessionId,
    TARGET_SAMPLE_RATE,
};

/// Frames requested per device callback
const CALLBACK_FRAMES: u32 = 1024;

/// Poll interval for the stream-holding thread
const RUN_POLL_MS: u64 = 50;

type SharedSession = Arc<StdMutex<Option<RecordingSession>>>;

/// Capture engine backed by the default cpal input device
pub struct CpalCaptureEngine {
    session: SharedSession,
    is_recording: Arc<AtomicBool>,
    level_tx: watch::Sender<f32>,
    worker: StdMutex<Option<std::thread::JoinHandle<()>>>,
}

impl CpalCaptureEngine {
    pub fn new() -> Self {
        let (level_tx, _) = watch::channel(0.0f32);
        Self {
            session: Arc::new(StdMutex::new(None)),
            is_recording: Arc::new(AtomicBool::new(false)),
            level_tx,
            worker: StdMutex::new(None),
        }
    }

    /// Pick an input configuration the device supports.
    /// Prefers ranges that include the target rate, then fewer channels.
    fn pick_input_config(
        device: &cpal::Device,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let supported = device
            .supported_input_configs()
            .map_err(|_| CaptureError::DeviceUnavailable)?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for range in supported {
            if range.sample_format() != SampleFormat::F32
                && range.sample_format() != SampleFormat::I16
            {
                continue;
            }

            let includes_target = range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE;

            let better = match &best {
                None => true,
                Some(current) => {
                    let current_includes_target = current.min_sample_rate().0 <= TARGET_SAMPLE_RATE
                        && current.max_sample_rate().0 >= TARGET_SAMPLE_RATE;
                    (includes_target && !current_includes_target)
                        || (includes_target == current_includes_target
                            && range.channels() < current.channels())
                }
            };
            if better {
                best = Some(range);
            }
        }

        let range = best.ok_or(CaptureError::DeviceUnavailable)?;

        let sample_rate = if range.min_sample_rate().0 <= TARGET_SAMPLE_RATE
            && range.max_sample_rate().0 >= TARGET_SAMPLE_RATE
        {
            SampleRate(TARGET_SAMPLE_RATE)
        } else {
            range.min_sample_rate()
        };

        let format = range.sample_format();
        let config = StreamConfig {
            channels: range.channels(),
            sample_rate,
            buffer_size: BufferSize::Fixed(CALLBACK_FRAMES),
        };

        Ok((config, format))
    }

    /// Build the input stream, retrying with the device's default block size
    /// when the driver refuses fixed sizing.
    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        format: SampleFormat,
        session: SharedSession,
        is_recording: Arc<AtomicBool>,
        level_tx: watch::Sender<f32>,
    ) -> Result<cpal::Stream, CaptureError> {
        let mut config = config.clone();
        match Self::build_stream_once(
            device,
            &config,
            format,
            session.clone(),
            is_recording.clone(),
            level_tx.clone(),
        ) {
            Ok(stream) => Ok(stream),
            Err(_) => {
                config.buffer_size = BufferSize::Default;
                Self::build_stream_once(device, &config, format, session, is_recording, level_tx)
            }
        }
    }

    fn build_stream_once(
        device: &cpal::Device,
        config: &StreamConfig,
        format: SampleFormat,
        session: SharedSession,
        is_recording: Arc<AtomicBool>,
        level_tx: watch::Sender<f32>,
    ) -> Result<cpal::Stream, CaptureError> {
        let channels = config.channels;
        let sample_rate = config.sample_rate.0;
        let err_fn = |err| eprintln!("audio stream error: {}", err);

        let stream = match format {
            SampleFormat::F32 => device
                .build_input_stream(
                    config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        if !is_recording.load(Ordering::SeqCst) {
                            return;
                        }
                        let batch = AudioFrameBatch::copy_from(data, channels, sample_rate);
                        let _ = level_tx.send(batch.peak());
                        if let Ok(mut guard) = session.lock() {
                            if let Some(session) = guard.as_mut() {
                                session.push(batch);
                            }
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|_| CaptureError::DeviceUnavailable)?,

            SampleFormat::I16 => device
                .build_input_stream(
                    config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        if !is_recording.load(Ordering::SeqCst) {
                            return;
                        }
                        let samples: Vec<f32> =
                            data.iter().map(|&s| s as f32 / 32768.0).collect();
                        let batch = AudioFrameBatch::new(samples, channels, sample_rate);
                        let _ = level_tx.send(batch.peak());
                        if let Ok(mut guard) = session.lock() {
                            if let Some(session) = guard.as_mut() {
                                session.push(batch);
                            }
                        }
                    },
                    err_fn,
                    None,
                )
                .map_err(|_| CaptureError::DeviceUnavailable)?,

            _ => return Err(CaptureError::DeviceUnavailable),
        };

        Ok(stream)
    }

    /// Convert every captured batch to the speech format and wrap the result
    /// in a WAV container. Batches that fail conversion are dropped and the
    /// rest of the session is kept.
    fn finalize(session: RecordingSession) -> Option<EncodedAudioBlob> {
        let id = session.id();
        let mut converted = Vec::with_capacity(session.batch_count());

        for batch in session.into_batches() {
            match resample(&batch, TARGET_SAMPLE_RATE) {
                Ok(batch) => converted.push(batch),
                Err(e) => eprintln!("dropping unconvertible batch in session {}: {}", id, e),
            }
        }

        match encode(&converted, PcmFormat::speech()) {
            Ok(blob) => Some(blob),
            Err(e) => {
                eprintln!("failed to encode session {}: {}", id, e);
                None
            }
        }
    }

    async fn shutdown_worker(&self) {
        self.is_recording.store(false, Ordering::SeqCst);

        let handle = {
            let mut guard = self.worker.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        };

        if let Some(handle) = handle {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }

        let _ = self.level_tx.send(0.0);
    }
}

impl Default for CpalCaptureEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureEngine for CpalCaptureEngine {
    async fn start(&self, id: SessionId) -> Result<(), CaptureError> {
        if self.is_recording.swap(true, Ordering::SeqCst) {
            return Err(CaptureError::AlreadyRecording);
        }

        {
            let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
            *guard = Some(RecordingSession::new(id));
        }

        let session = Arc::clone(&self.session);
        let is_recording = Arc::clone(&self.is_recording);
        let level_tx = self.level_tx.clone();
        let (ready_tx, ready_rx) = oneshot::channel::<Result<(), CaptureError>>();

        let handle = std::thread::spawn(move || {
            let host = cpal::default_host();
            let device = match host.default_input_device() {
                Some(device) => device,
                None => {
                    let _ = ready_tx.send(Err(CaptureError::DeviceUnavailable));
                    return;
                }
            };

            let (config, format) = match Self::pick_input_config(&device) {
                Ok(picked) => picked,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            let stream = match Self::build_stream(
                &device,
                &config,
                format,
                session,
                is_recording.clone(),
                level_tx,
            ) {
                Ok(stream) => stream,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            if stream.play().is_err() {
                let _ = ready_tx.send(Err(CaptureError::DeviceUnavailable));
                return;
            }

            let _ = ready_tx.send(Ok(()));

            while is_recording.load(Ordering::SeqCst) {
                std::thread::sleep(std::time::Duration::from_millis(RUN_POLL_MS));
            }

            drop(stream);
        });

        let started = match ready_rx.await {
            Ok(result) => result,
            Err(_) => Err(CaptureError::DeviceUnavailable),
        };

        if let Err(e) = started {
            self.is_recording.store(false, Ordering::SeqCst);
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
            let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
            *guard = None;
            return Err(e);
        }

        let mut guard = self.worker.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(handle);

        Ok(())
    }

    async fn stop(&self) -> Option<EncodedAudioBlob> {
        if !self.is_recording.load(Ordering::SeqCst) {
            return None;
        }

        self.shutdown_worker().await;

        let session = {
            let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
            guard.take()
        }?;

        if session.is_empty() {
            return None;
        }

        tokio::task::spawn_blocking(move || Self::finalize(session))
            .await
            .ok()
            .flatten()
    }

    async fn cancel(&self) {
        self.shutdown_worker().await;

        let mut guard = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    fn is_recording(&self) -> bool {
        self.is_recording.load(Ordering::SeqCst)
    }

    fn meter(&self) -> watch::Receiver<f32> {
        self.level_tx.subscribe()
    }
}
