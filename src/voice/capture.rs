//! Audio capture from microphone

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Captures mono audio from an input device
pub struct AudioCapture {
    device: Device,
    config: StreamConfig,
    buffer: Arc<Mutex<Vec<f32>>>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Open an input device by name, or the default device
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be found or has no usable config
    pub fn open(device_name: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();

        let device = match device_name {
            Some(wanted) => host
                .input_devices()
                .map_err(|e| Error::Audio(e.to_string()))?
                .find(|d| d.name().is_ok_and(|n| n.contains(wanted)))
                .ok_or_else(|| Error::Audio(format!("no input device matching {wanted:?}")))?,
            None => host
                .default_input_device()
                .ok_or_else(|| Error::Audio("no input device available".to_string()))?,
        };

        let rate = SampleRate(SAMPLE_RATE);
        let configs: Vec<_> = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .filter(|c| {
                c.sample_format() == cpal::SampleFormat::F32
                    && c.min_sample_rate() <= rate
                    && c.max_sample_rate() >= rate
            })
            .collect();

        // Mono preferred, anything else is downmixed in the callback
        let supported_config = configs
            .iter()
            .find(|c| c.channels() == 1)
            .or_else(|| configs.first())
            .ok_or_else(|| Error::Audio("no suitable audio config found".to_string()))?;

        let config = supported_config.clone().with_sample_rate(rate).config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            channels = config.channels,
            "audio capture initialized"
        );

        Ok(Self {
            device,
            config,
            buffer: Arc::new(Mutex::new(Vec::new())),
            stream: None,
        })
    }

    /// Start capturing audio
    ///
    /// # Errors
    ///
    /// Returns error if capture fails
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let buffer = Arc::clone(&self.buffer);
        let channels = usize::from(self.config.channels.max(1));

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = buffer.lock() {
                        if channels == 1 {
                            buf.extend_from_slice(data);
                        } else {
                            #[allow(clippy::cast_precision_loss)]
                            buf.extend(
                                data.chunks(channels)
                                    .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32),
                            );
                        }
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop capturing audio
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!("audio capture stopped");
        }
    }

    /// Take the samples captured since the last call
    #[must_use]
    pub fn take_buffer(&self) -> Vec<f32> {
        self.buffer
            .lock()
            .map(|mut buf| std::mem::take(&mut *buf))
            .unwrap_or_default()
    }

    /// Drop whatever has been captured so far
    pub fn clear_buffer(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Check if currently capturing
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }
}

impl Drop for AudioCapture {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Convert f32 samples to WAV bytes for STT APIs
///
/// # Errors
///
/// Returns error if WAV encoding fails
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
