use std::fmt;
use std::io::{Cursor, Read};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};

use super::{AssetError, AssetResult, AssetStream};

/// Decoded audio, ready for a playback backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundData {
    /// Interleaved samples in `[-1.0, 1.0]`; stereo is `[L, R, L, R, ...]`.
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl SoundData {
    /// Duration in seconds.
    pub fn duration(&self) -> f32 {
        if self.channels == 0 || self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.channels as f32 / self.sample_rate as f32
    }
}

enum Source {
    Decoded { data: Arc<SoundData>, music: bool },
    Error(Arc<AssetError>),
}

/// Playable sound handle.
///
/// A sound that failed to load is still a valid handle: it carries its error,
/// ignores volume and looping changes, and refuses to play. Audio is treated
/// as non-critical, so loading never fails outright.
pub struct Sound {
    source: Source,
    volume: f32,
    looping: bool,
    playing: bool,
}

impl Sound {
    pub fn new(data: SoundData, music: bool) -> Self {
        Self {
            source: Source::Decoded { data: Arc::new(data), music },
            volume: 1.0,
            looping: false,
            playing: false,
        }
    }

    /// Error sentinel carrying the reason the sound could not be loaded.
    pub fn error(err: AssetError) -> Self {
        Self { source: Source::Error(Arc::new(err)), volume: 0.0, looping: false, playing: false }
    }

    pub fn load_error(&self) -> Option<&AssetError> {
        match &self.source {
            Source::Error(err) => Some(err),
            Source::Decoded { .. } => None,
        }
    }

    pub fn data(&self) -> Option<&Arc<SoundData>> {
        match &self.source {
            Source::Decoded { data, .. } => Some(data),
            Source::Error(_) => None,
        }
    }

    pub fn is_music(&self) -> bool {
        matches!(self.source, Source::Decoded { music: true, .. })
    }

    /// True when the sound has data to play.
    pub fn prepare(&self) -> bool {
        self.data().is_some()
    }

    /// Marks the sound as playing. Returns `false` (and does nothing) for error sounds.
    pub fn play(&mut self) -> bool {
        if !self.prepare() {
            return false;
        }
        self.playing = true;
        true
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_looping(&mut self, looping: bool) {
        if self.prepare() {
            self.looping = looping;
        }
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Volume in `[0, 1]`; error sounds stay at 0.
    pub fn set_volume(&mut self, volume: f32) {
        if self.prepare() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl fmt::Debug for Sound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Sound");
        match &self.source {
            Source::Decoded { data, music } => d
                .field("channels", &data.channels)
                .field("sample_rate", &data.sample_rate)
                .field("music", music),
            Source::Error(err) => d.field("error", &err.to_string()),
        };
        d.field("playing", &self.playing).finish()
    }
}

/// Turns an asset stream into a sound.
///
/// `path` is the resolved asset path; decoders may use its extension as a
/// format hint.
pub trait AudioDecoder: Send + Sync {
    fn create_sound(&self, path: &str, stream: AssetStream, music: bool) -> AssetResult<Sound>;
}

/// Default decoder: `hound` for `.wav`, `symphonia` for every other format.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleDecoder;

impl AudioDecoder for SampleDecoder {
    fn create_sound(&self, path: &str, mut stream: AssetStream, music: bool) -> AssetResult<Sound> {
        let mut bytes = Vec::new();
        stream.read_to_end(&mut bytes).map_err(|e| AssetError::io(path, e))?;

        let extension = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        let data = match extension.as_deref() {
            Some("wav") => decode_wav(&bytes),
            ext => decode_symphonia(&bytes, ext),
        }
        .map_err(|e| AssetError::decode(path, e))?;

        log::debug!(
            "decoded {path}: {} ch, {} Hz, {:.2}s",
            data.channels,
            data.sample_rate,
            data.duration()
        );
        Ok(Sound::new(data, music))
    }
}

fn decode_wav(bytes: &[u8]) -> anyhow::Result<SoundData> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes)).context("invalid WAV header")?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<_>, _>>(),
        hound::SampleFormat::Int => {
            let max_value = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|s| s as f32 / max_value))
                .collect()
        }
    }
    .context("failed to read WAV samples")?;

    Ok(SoundData { samples, channels: spec.channels, sample_rate: spec.sample_rate })
}

fn decode_symphonia(bytes: &[u8], extension: Option<&str>) -> anyhow::Result<SoundData> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes.to_vec())), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }
    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .context("unrecognized audio format")?;
    let mut format_reader = probed.format;

    let track = format_reader
        .default_track()
        .ok_or_else(|| anyhow!("no default audio track"))?;
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.ok_or_else(|| anyhow!("unknown sample rate"))?;
    let channels = track.codec_params.channels.ok_or_else(|| anyhow!("unknown channel count"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("unsupported codec")?;

    let mut samples = Vec::<f32>::new();
    loop {
        let packet = match format_reader.next_packet() {
            Ok(packet) => packet,
            // End of stream.
            Err(symphonia::core::errors::Error::IoError(_)) => break,
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
                buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buf.samples());
            }
            // A corrupt packet is skipped; the rest of the stream is still usable.
            Err(symphonia::core::errors::Error::DecodeError(msg)) => {
                log::debug!("skipping undecodable audio packet: {msg}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(SoundData { samples, channels: channels.count() as u16, sample_rate })
}
