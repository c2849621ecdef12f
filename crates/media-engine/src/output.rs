// crates/media-engine/src/output.rs
//! cpal output stream fed from the playback thread

use crate::error::{EngineError, EngineResult};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleRate, Stream, StreamConfig};
use crossbeam_channel::{Receiver, TryRecvError};

/// Output on the host's default device
///
/// Not `Send`: it lives and dies on the playback thread.
pub struct AudioOutput {
    device: Device,
    device_name: String,
    config: StreamConfig,
    stream: Option<Stream>,
}

impl AudioOutput {
    pub fn new(sample_rate: u32, channels: u16) -> EngineResult<Self> {
        if sample_rate == 0 || channels == 0 {
            return Err(EngineError::OutputError(format!(
                "Invalid stream format: {} Hz, {} channels",
                sample_rate, channels
            )));
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::OutputError("No output device available".to_string()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".to_string());

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self {
            device,
            device_name,
            config,
            stream: None,
        })
    }

    /// Starts pulling interleaved samples from `rx`
    ///
    /// Underruns are filled with silence, which is also what a paused
    /// decoder produces.
    pub fn play(&mut self, rx: Receiver<Vec<f32>>) -> EngineResult<()> {
        let mut buffer: Vec<f32> = Vec::new();
        let mut position = 0;
        let device_name = self.device_name.clone();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for sample in data.iter_mut() {
                        if position >= buffer.len() {
                            match rx.try_recv() {
                                Ok(next) => {
                                    buffer = next;
                                    position = 0;
                                }
                                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => {
                                    *sample = 0.0;
                                    continue;
                                }
                            }
                        }

                        *sample = buffer.get(position).copied().unwrap_or(0.0);
                        position += 1;
                    }
                },
                move |err| {
                    log::error!("Audio output error on device '{}': {}", device_name, err);
                },
                None,
            )
            .map_err(|e| EngineError::OutputError(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| EngineError::OutputError(format!("Failed to start stream: {}", e)))?;

        self.stream = Some(stream);
        log::info!("Audio output started on device: {}", self.device_name);
        Ok(())
    }

    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            log::info!("Audio output stopped on device: {}", self.device_name);
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}

impl Drop for AudioOutput {
    fn drop(&mut self) {
        self.stop();
    }
}
