use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use avtask_core::{AudioPlayer, Repeat};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

/// Plays one sound at a time on the default output device.
pub struct RodioPlayer {
    // Dropping the stream silences every sink, so it lives as long as the player.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
    volume: f32,
}

impl RodioPlayer {
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default().context("opening audio output device")?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
            volume: 1.0,
        })
    }
}

impl AudioPlayer for RodioPlayer {
    fn play(&mut self, path: &Path, repeat: Repeat) -> Result<()> {
        self.stop();
        let file = File::open(path).with_context(|| format!("opening audio {}", path.display()))?;
        let source = Decoder::new(BufReader::new(file))
            .with_context(|| format!("decoding audio {}", path.display()))?;

        let sink = Sink::try_new(&self.handle).context("creating audio sink")?;
        sink.set_volume(self.volume);
        match repeat {
            Repeat::Once => sink.append(source),
            Repeat::Forever => sink.append(source.repeat_infinite()),
        }
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }
}
