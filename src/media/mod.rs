//! Decoding audio into an in-memory PCM buffer.
//!
//! Both players decode the whole input up front and hand the resulting buffer
//! to the output engine. Decoding itself is delegated to rodio's decoder, so
//! the supported formats are whatever rodio was built with (wav, mp3, vorbis
//! and flac with the default features).

use rodio::{Decoder, Source};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use std::time::Duration;

/// Interleaved `f32` samples plus the format needed to play them back.
#[derive(Debug, Clone, PartialEq)]
pub struct PcmBuffer {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl PcmBuffer {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self, Box<dyn Error>> {
        if channels == 0 {
            return Err("Audio has no channels".into());
        }
        if sample_rate == 0 {
            return Err("Audio has a sample rate of 0 Hz".into());
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn Error>> {
        let file = File::open(path)
            .map_err(|e| format!("Cannot open {}: {e}", path.display()))?;
        let buffer = Self::decode(BufReader::new(file))?;

        log::info!(
            "Decoded {}: {} Hz, {} channels, {:?}",
            path.display(),
            buffer.sample_rate,
            buffer.channels,
            buffer.duration()
        );
        Ok(buffer)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn Error>> {
        let len = bytes.len();
        let buffer = Self::decode(Cursor::new(bytes))?;

        log::info!(
            "Decoded {len} bytes: {} Hz, {} channels, {:?}",
            buffer.sample_rate,
            buffer.channels,
            buffer.duration()
        );
        Ok(buffer)
    }

    fn decode<R>(reader: R) -> Result<Self, Box<dyn Error>>
    where
        R: Read + Seek + Send + Sync + 'static,
    {
        let decoder = Decoder::new(reader)?;
        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        let samples: Vec<f32> = decoder.collect();

        Self::new(samples, channels, sample_rate)
    }

    /// Number of whole frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Frame index for a time offset, clamped to the end of the buffer.
    pub fn frame_at_seconds(&self, seconds: f32) -> usize {
        let frame = (seconds.max(0.0) as f64 * self.sample_rate as f64) as usize;
        frame.min(self.frames())
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    /// Interleaved samples of one frame, or `None` past the end.
    pub fn frame(&self, index: usize) -> Option<&[f32]> {
        let channels = self.channels as usize;
        let start = index.checked_mul(channels)?;
        self.samples.get(start..start + channels)
    }
}
