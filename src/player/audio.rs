//! Audio playback engine driven by a pre-decoded PCM buffer.
//!
//! The engine owns the output stream and a rodio sink. Playback is a
//! [`PcmSource`] pulling frames out of the shared buffer: rodio's mixer calls
//! it from the audio thread, it copies the frame under the cursor, scales it by
//! the current volume and advances the cursor. Everything the UI thread needs
//! to observe lives in [`PlaybackState`], shared through an `Arc` and only
//! touched with atomics. When the cursor runs off the end, the source itself
//! rewinds it, clears the playing flag and raises the finished signal.
//!
//! Each source is stamped with the generation it was started under. Stopping,
//! pausing or loading a new file bumps the generation, which silences any
//! source still queued on the audio thread and makes its completion signal
//! stale, so a late callback can never rewind or end a newer playback.

use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};
use std::error::Error;
use std::path::Path;
use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering},
};
use std::thread;
use std::time::Duration;

use deck_player::media::PcmBuffer;

const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// State shared between the engine and the source on the audio thread.
pub struct PlaybackState {
    cursor: AtomicUsize,
    volume: AtomicU32,
    playing: AtomicBool,
    generation: AtomicU64,
    // Generation whose source ran off the end of the buffer, 0 when none
    finished: AtomicU64,
}

impl PlaybackState {
    fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
            volume: AtomicU32::new(1.0f32.to_bits()),
            playing: AtomicBool::new(false),
            generation: AtomicU64::new(1),
            finished: AtomicU64::new(0),
        }
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    fn bump_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume.load(Ordering::Relaxed))
    }

    fn set_volume(&self, volume: f32) {
        self.volume.store(volume.to_bits(), Ordering::Relaxed);
    }

    fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    fn set_cursor(&self, frame: usize) {
        self.cursor.store(frame, Ordering::Relaxed);
    }

    fn has_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire) == self.generation()
    }

    // End of buffer: rewind, drop out of playing, then publish the generation
    fn mark_finished(&self, generation: u64) {
        self.set_cursor(0);
        self.playing.store(false, Ordering::Release);
        self.finished.store(generation, Ordering::Release);
    }

    /// Consume the completion signal of the current generation.
    fn take_finished(&self) -> bool {
        let generation = self.generation();
        self.finished
            .compare_exchange(generation, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// The output callback: a rodio source reading frames from the shared buffer.
pub struct PcmSource {
    buffer: Arc<PcmBuffer>,
    state: Arc<PlaybackState>,
    generation: u64,
    frame: usize,
    channel: usize,
    gain: f32,
    done: bool,
}

impl PcmSource {
    fn new(buffer: Arc<PcmBuffer>, state: Arc<PlaybackState>, generation: u64) -> Self {
        Self {
            buffer,
            state,
            generation,
            frame: 0,
            channel: 0,
            gain: 1.0,
            done: false,
        }
    }
}

impl Iterator for PcmSource {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if !self.state.is_current(self.generation) {
            self.done = true;
            return None;
        }

        // Pick up seeks and volume changes once per frame
        if self.channel == 0 {
            self.frame = self.state.cursor();
            self.gain = self.state.volume();
        }

        let Some(samples) = self.buffer.frame(self.frame) else {
            self.done = true;
            log::debug!("Reached end of buffer at frame {}", self.frame);
            self.state.mark_finished(self.generation);
            return None;
        };
        let sample = samples[self.channel] * self.gain;

        self.channel += 1;
        if self.channel == samples.len() {
            self.channel = 0;
            // Leave the cursor alone if the UI seeked while this frame was playing
            let _ = self.state.cursor.compare_exchange(
                self.frame,
                self.frame + 1,
                Ordering::Relaxed,
                Ordering::Relaxed,
            );
        }

        Some(sample)
    }
}

impl Source for PcmSource {
    fn current_span_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        self.buffer.channels
    }

    fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.buffer.duration())
    }
}

pub struct AudioEngine {
    stream: OutputStream,
    sink: Sink,
    state: Arc<PlaybackState>,
    buffer: Option<Arc<PcmBuffer>>,
}

impl AudioEngine {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        stream.log_on_drop(false);
        let sink = Sink::connect_new(stream.mixer());

        Ok(Self {
            stream,
            sink,
            state: Arc::new(PlaybackState::new()),
            buffer: None,
        })
    }

    /// Stops playback first, so a file that fails to decode leaves the engine idle.
    pub fn load_file(&mut self, path: &Path) -> Result<(), Box<dyn Error>> {
        self.stop();
        let buffer = PcmBuffer::from_file(path)?;
        self.load_buffer(buffer, path.to_string_lossy().to_string());
        Ok(())
    }

    /// Replace the current buffer wholesale. Playback stops and the cursor rewinds.
    pub fn load_buffer(&mut self, buffer: PcmBuffer, label: String) {
        self.stop();

        log::info!(
            "Loaded {label}: {} frames, {} Hz, {} channels",
            buffer.frames(),
            buffer.sample_rate,
            buffer.channels
        );

        self.buffer = Some(Arc::new(buffer));
    }

    pub fn play(&mut self) {
        let Some(buffer) = self.buffer.clone() else {
            return;
        };
        if self.is_playing() {
            return;
        }
        if self.state.cursor() >= buffer.frames() {
            self.state.set_cursor(0);
        }

        let generation = self.halt_output();
        self.sink.append(PcmSource::new(buffer, self.state.clone(), generation));
        self.sink.play();
        self.state.playing.store(true, Ordering::Release);

        log::info!("Playing from frame {}", self.state.cursor());
    }

    pub fn pause(&mut self) {
        if self.is_playing() {
            self.halt_output();
            self.state.playing.store(false, Ordering::Release);
            log::info!("Paused at frame {}", self.state.cursor());
        }
    }

    pub fn stop(&mut self) {
        self.halt_output();
        self.state.playing.store(false, Ordering::Release);
        self.state.set_cursor(0);
    }

    // Invalidate the queued source and start over on a fresh sink
    fn halt_output(&mut self) -> u64 {
        let generation = self.state.bump_generation();
        self.sink.stop();
        self.sink = Sink::connect_new(self.stream.mixer());
        generation
    }

    pub fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::Acquire) && !self.state.has_finished()
    }

    /// Consume the end-of-buffer signal. The cursor is already back at the start.
    pub fn take_finished(&mut self) -> bool {
        let finished = self.state.take_finished();
        if finished {
            log::info!("Playback finished");
        }
        finished
    }

    /// Block until the buffer has played out or `stop` is raised.
    ///
    /// Returns `true` when playback reached the end on its own.
    pub fn wait_until_done(&mut self, stop: &AtomicBool) -> bool {
        while self.is_playing() {
            if stop.load(Ordering::Acquire) {
                self.stop();
                return false;
            }
            thread::sleep(WAIT_POLL_INTERVAL);
        }
        self.take_finished()
    }

    pub fn set_position(&mut self, seconds: f32) {
        if let Some(buffer) = &self.buffer {
            let frame = buffer.frame_at_seconds(seconds);
            self.state.set_cursor(frame);
            log::debug!("Seek to frame {frame}");
        }
    }

    pub fn seek_relative(&mut self, seconds: f32) {
        let target = self.position().as_secs_f32() + seconds;
        self.set_position(target.max(0.0));
    }

    pub fn set_volume(&self, volume: f32) {
        self.state.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn position(&self) -> Duration {
        match &self.buffer {
            Some(buffer) => {
                let frame = self.state.cursor().min(buffer.frames());
                Duration::from_secs_f64(frame as f64 / buffer.sample_rate as f64)
            }
            None => Duration::ZERO,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.buffer.as_ref().map(|buffer| buffer.duration())
    }

    pub fn get_progress(&self) -> f32 {
        match &self.buffer {
            Some(buffer) if buffer.frames() > 0 => {
                (self.state.cursor() as f32 / buffer.frames() as f32).min(1.0)
            }
            _ => 0.0,
        }
    }
}
