//! Real-time output through cpal.

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, SizedSample,
};
use tracing::{debug, error, info};

use crate::{
    error::{EngineError, Result},
    host::{AudioContext, AudioHost, Renderer, StreamInfo},
    MAX_BLOCK_SIZE,
};

/// The platform's default output device.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpalHost;

impl CpalHost {
    pub fn new() -> Self {
        Self
    }
}

impl AudioHost for CpalHost {
    type Context = CpalContext;

    fn open(&self) -> Result<CpalContext> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| EngineError::platform("no default output device available"))?;
        let config = device
            .default_output_config()
            .map_err(|err| EngineError::platform(format!("no default output config: {err}")))?;

        debug!(
            host = ?host.id(),
            device = %device.name().unwrap_or_else(|_| "unknown".to_string()),
            ?config,
            "audio context opened"
        );

        Ok(CpalContext {
            device,
            config,
            stream: None,
        })
    }
}

pub struct CpalContext {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    stream: Option<cpal::Stream>,
}

impl AudioContext for CpalContext {
    fn info(&self) -> StreamInfo {
        StreamInfo {
            sample_rate: self.config.sample_rate().0,
            channels: self.config.channels(),
        }
    }

    fn play(&mut self, renderer: Renderer) -> Result<()> {
        if self.stream.is_some() {
            return Err(EngineError::stream("context is already playing"));
        }

        let config: cpal::StreamConfig = self.config.clone().into();
        let stream = match self.config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&self.device, &config, renderer),
            cpal::SampleFormat::I16 => build_stream::<i16>(&self.device, &config, renderer),
            cpal::SampleFormat::U16 => build_stream::<u16>(&self.device, &config, renderer),
            other => Err(EngineError::stream(format!(
                "unsupported sample format {other:?}"
            ))),
        }?;

        stream
            .play()
            .map_err(|err| EngineError::stream(err.to_string()))?;
        info!(
            sample_rate = config.sample_rate.0,
            channels = config.channels,
            "audio stream started"
        );

        self.stream = Some(stream);
        Ok(())
    }

    fn close(mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream
                .pause()
                .map_err(|err| EngineError::stream(err.to_string()))?;
        }
        Ok(())
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut renderer: Renderer,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let mut scratch = vec![0.0f32; MAX_BLOCK_SIZE * channels];

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for chunk in data.chunks_mut(scratch.len()) {
                    let block = &mut scratch[..chunk.len()];
                    renderer.process(block);
                    for (out, &sample) in chunk.iter_mut().zip(block.iter()) {
                        *out = T::from_sample(sample);
                    }
                }
            },
            |err| error!("audio stream error: {err}"),
            None,
        )
        .map_err(|err| EngineError::stream(err.to_string()))
}
