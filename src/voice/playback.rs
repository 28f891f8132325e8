//! Audio playback to speakers

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate};
use tokio::sync::oneshot;

use crate::services::AudioPlayer;
use crate::{Error, Result};

/// Extra time allowed past the clip length before giving up on the device
const COMPLETION_GRACE: Duration = Duration::from_millis(750);

/// Decoded mono clip
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    /// Mono samples in [-1.0, 1.0]
    pub samples: Vec<f32>,

    /// Samples per second
    pub sample_rate: u32,
}

impl Clip {
    /// Playback length
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.samples.len() as f64 / f64::from(self.sample_rate))
    }
}

/// Plays MP3 files on the default output device
pub struct CpalPlayer {
    device: Device,
}

impl CpalPlayer {
    /// Open the default output device
    ///
    /// # Errors
    ///
    /// Returns error if no output device is available
    pub fn new() -> Result<Self> {
        let device = cpal::default_host()
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            "audio playback initialized"
        );

        Ok(Self { device })
    }

    /// Pick a config running at the clip's rate, mono preferred
    fn stream_config(&self, sample_rate: u32) -> Result<cpal::StreamConfig> {
        let rate = SampleRate(sample_rate);
        let supports = |c: &cpal::SupportedStreamConfigRange, channels: u16| {
            c.channels() == channels
                && c.sample_format() == cpal::SampleFormat::F32
                && c.min_sample_rate() <= rate
                && c.max_sample_rate() >= rate
        };

        let configs: Vec<_> = self
            .device
            .supported_output_configs()
            .map_err(|e| Error::PlaybackFailure(e.to_string()))?
            .collect();

        configs
            .iter()
            .find(|c| supports(c, 1))
            .or_else(|| configs.iter().find(|c| supports(c, 2)))
            .map(|c| c.clone().with_sample_rate(rate).config())
            .ok_or_else(|| {
                Error::PlaybackFailure(format!("no output config for {sample_rate} Hz"))
            })
    }

    /// Play a decoded clip, resolving once the last sample has been written
    #[allow(clippy::future_not_send)]
    async fn play_clip(&self, clip: Clip) -> Result<()> {
        if clip.samples.is_empty() {
            return Ok(());
        }

        let config = self.stream_config(clip.sample_rate)?;
        let channels = usize::from(config.channels);
        let wait = clip.duration() + COMPLETION_GRACE;
        let sample_count = clip.samples.len();

        let samples = Arc::new(clip.samples);
        let position = Arc::new(AtomicUsize::new(0));
        let (done_tx, done_rx) = oneshot::channel::<()>();
        let done_tx = Arc::new(Mutex::new(Some(done_tx)));

        let stream = {
            let samples = Arc::clone(&samples);
            let position = Arc::clone(&position);
            let done_tx = Arc::clone(&done_tx);
            self.device
                .build_output_stream(
                    &config,
                    move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                        let mut pos = position.load(Ordering::Relaxed);
                        for frame in data.chunks_mut(channels) {
                            let sample = samples.get(pos).copied().unwrap_or(0.0);
                            frame.fill(sample);
                            if pos < samples.len() {
                                pos += 1;
                            }
                        }
                        position.store(pos, Ordering::Relaxed);

                        if pos >= samples.len() {
                            if let Some(tx) = done_tx.lock().ok().and_then(|mut t| t.take()) {
                                let _ = tx.send(());
                            }
                        }
                    },
                    |err| {
                        tracing::error!(error = %err, "audio playback error");
                    },
                    None,
                )
                .map_err(|e| Error::PlaybackFailure(e.to_string()))?
        };

        stream
            .play()
            .map_err(|e| Error::PlaybackFailure(e.to_string()))?;

        // Dropping the stream on any exit (including cancellation) stops the device
        let finished = tokio::time::timeout(wait, done_rx).await;
        drop(stream);

        match finished {
            Ok(Ok(())) => {
                tracing::debug!(samples = sample_count, "playback complete");
                Ok(())
            }
            Ok(Err(_)) => Err(Error::PlaybackFailure("stream closed early".to_string())),
            Err(_) => Err(Error::PlaybackFailure(format!(
                "device stalled at sample {} of {sample_count}",
                position.load(Ordering::Relaxed)
            ))),
        }
    }
}

#[async_trait(?Send)]
impl AudioPlayer for CpalPlayer {
    async fn play(&mut self, path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| Error::PlaybackFailure(format!("{}: {e}", path.display())))?;
        let clip = decode_mp3(&bytes)?;
        self.play_clip(clip).await
    }
}

/// Decode MP3 bytes to a mono clip
///
/// # Errors
///
/// Returns error if the data is not decodable MP3
pub fn decode_mp3(mp3_data: &[u8]) -> Result<Clip> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(mp3_data));
    let mut samples = Vec::new();
    let mut sample_rate = 0u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                sample_rate = u32::try_from(frame.sample_rate).unwrap_or(sample_rate);
                let channels = frame.channels.max(1);
                #[allow(clippy::cast_precision_loss)]
                samples.extend(frame.data.chunks(channels).map(|chunk| {
                    let sum: f32 = chunk.iter().map(|&s| f32::from(s) / 32768.0).sum();
                    sum / chunk.len() as f32
                }));
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(Error::PlaybackFailure(format!("MP3 decode error: {e}"))),
        }
    }

    if sample_rate == 0 && !samples.is_empty() {
        return Err(Error::PlaybackFailure("MP3 stream has no sample rate".to_string()));
    }

    Ok(Clip {
        samples,
        sample_rate,
    })
}
