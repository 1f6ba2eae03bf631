//! Configuration types for audio extraction.
//!
//! Two structs cover every knob:
//!
//! * [`AudioProfile`] — the encoder parameters handed to the tool
//!   (sample rate, channels, bitrate, container). Its defaults reproduce the
//!   fixed command line `-vn -ar 44100 -ac 2 -b:a 192k -f mp3` exactly.
//! * [`ConversionConfig`] — how the tool is driven: the profile, whether an
//!   existing output may be overwritten, and where relayed output goes.
//!
//! Both are built through a validating builder, as in
//! [`ConversionConfig::builder()`].

use crate::error::Vid2Mp3Error;
use crate::sink::SharedSink;
use serde::{Deserialize, Serialize};
use std::fmt;

// ── Audio profile ─────────────────────────────────────────────────────────

/// Encoder parameters for the extracted audio track.
///
/// # Example
/// ```rust
/// use vid2mp3::AudioProfile;
///
/// let profile = AudioProfile::builder()
///     .bitrate_kbps(320)
///     .build()
///     .unwrap();
/// assert_eq!(profile.sample_rate_hz, 44_100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProfile {
    /// Drop every video stream (`-vn`). Default: true.
    pub disable_video: bool,

    /// Output sample rate in Hz (`-ar`). Default: 44100.
    pub sample_rate_hz: u32,

    /// Output channel count (`-ac`). Default: 2.
    pub channels: u8,

    /// Audio bitrate in kbit/s (`-b:a <N>k`). Default: 192.
    pub bitrate_kbps: u32,

    /// Output container/muxer name (`-f`). Default: "mp3".
    ///
    /// Also used as the file extension for generated output names.
    pub format: String,
}

impl Default for AudioProfile {
    fn default() -> Self {
        Self {
            disable_video: true,
            sample_rate_hz: 44_100,
            channels: 2,
            bitrate_kbps: 192,
            format: "mp3".to_string(),
        }
    }
}

impl AudioProfile {
    /// Create a new builder for `AudioProfile`.
    pub fn builder() -> AudioProfileBuilder {
        AudioProfileBuilder {
            profile: Self::default(),
        }
    }

    /// Tool flags for this profile, in command-line order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(9);
        if self.disable_video {
            args.push("-vn".to_string());
        }
        args.extend([
            "-ar".to_string(),
            self.sample_rate_hz.to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
            "-b:a".to_string(),
            format!("{}k", self.bitrate_kbps),
            "-f".to_string(),
            self.format.clone(),
        ]);
        args
    }

    fn validate(&self) -> Result<(), Vid2Mp3Error> {
        if self.sample_rate_hz == 0 {
            return Err(Vid2Mp3Error::InvalidConfig(
                "Sample rate must be ≥ 1 Hz".into(),
            ));
        }
        if self.channels == 0 {
            return Err(Vid2Mp3Error::InvalidConfig("Channels must be ≥ 1".into()));
        }
        if self.bitrate_kbps == 0 {
            return Err(Vid2Mp3Error::InvalidConfig(
                "Bitrate must be ≥ 1 kbit/s".into(),
            ));
        }
        if self.format.is_empty() || self.format.chars().any(char::is_whitespace) {
            return Err(Vid2Mp3Error::InvalidConfig(format!(
                "Format must be a single non-empty word, got {:?}",
                self.format
            )));
        }
        Ok(())
    }
}

/// Builder for [`AudioProfile`].
#[derive(Debug)]
pub struct AudioProfileBuilder {
    profile: AudioProfile,
}

impl AudioProfileBuilder {
    pub fn disable_video(mut self, v: bool) -> Self {
        self.profile.disable_video = v;
        self
    }

    pub fn sample_rate_hz(mut self, hz: u32) -> Self {
        self.profile.sample_rate_hz = hz;
        self
    }

    pub fn channels(mut self, n: u8) -> Self {
        self.profile.channels = n;
        self
    }

    pub fn bitrate_kbps(mut self, kbps: u32) -> Self {
        self.profile.bitrate_kbps = kbps;
        self
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.profile.format = format.into();
        self
    }

    /// Build the profile, validating constraints.
    pub fn build(self) -> Result<AudioProfile, Vid2Mp3Error> {
        self.profile.validate()?;
        Ok(self.profile)
    }
}

// ── Conversion config ─────────────────────────────────────────────────────

/// How a conversion is run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use vid2mp3::{AudioProfile, ConversionConfig};
///
/// let config = ConversionConfig::builder()
///     .profile(AudioProfile::default())
///     .overwrite(true)
///     .build()
///     .unwrap();
/// assert!(config.overwrite);
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Encoder parameters. Default: [`AudioProfile::default()`].
    pub profile: AudioProfile,

    /// Pass `-y` so the tool replaces an existing output file. Default: false.
    ///
    /// Off keeps the command line identical to the fixed form. The tool's
    /// stdin is the null device, so without this flag an existing output
    /// makes ffmpeg refuse and exit non-zero instead of prompting.
    pub overwrite: bool,

    /// Receiver for relayed tool output. `None` prints to stdout.
    pub output_sink: Option<SharedSink>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("profile", &self.profile)
            .field("overwrite", &self.overwrite)
            .field(
                "output_sink",
                &self.output_sink.as_ref().map(|_| "<dyn OutputSink>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn profile(mut self, profile: AudioProfile) -> Self {
        self.config.profile = profile;
        self
    }

    pub fn overwrite(mut self, v: bool) -> Self {
        self.config.overwrite = v;
        self
    }

    pub fn output_sink(mut self, sink: SharedSink) -> Self {
        self.config.output_sink = Some(sink);
        self
    }

    /// Build the configuration, validating the profile.
    pub fn build(self) -> Result<ConversionConfig, Vid2Mp3Error> {
        self.config.profile.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profile_matches_fixed_command_line() {
        let args = AudioProfile::default().to_args();
        assert_eq!(
            args,
            ["-vn", "-ar", "44100", "-ac", "2", "-b:a", "192k", "-f", "mp3"]
        );
    }

    #[test]
    fn keeping_video_drops_vn_flag() {
        let profile = AudioProfile::builder().disable_video(false).build().unwrap();
        let args = profile.to_args();
        assert!(!args.iter().any(|a| a == "-vn"));
        assert_eq!(args[0], "-ar");
    }

    #[test]
    fn builder_overrides_fields() {
        let p = AudioProfile::builder()
            .sample_rate_hz(48_000)
            .channels(1)
            .bitrate_kbps(320)
            .format("ogg")
            .build()
            .unwrap();
        assert_eq!(
            p.to_args(),
            ["-vn", "-ar", "48000", "-ac", "1", "-b:a", "320k", "-f", "ogg"]
        );
    }

    #[test]
    fn zero_values_rejected() {
        assert!(AudioProfile::builder().sample_rate_hz(0).build().is_err());
        assert!(AudioProfile::builder().channels(0).build().is_err());
        assert!(AudioProfile::builder().bitrate_kbps(0).build().is_err());
    }

    #[test]
    fn bad_format_rejected() {
        let err = AudioProfile::builder().format("").build().unwrap_err();
        assert!(matches!(err, Vid2Mp3Error::InvalidConfig(_)));
        assert!(AudioProfile::builder().format("mp 3").build().is_err());
    }

    #[test]
    fn config_build_validates_profile() {
        let bad = AudioProfile {
            channels: 0,
            ..AudioProfile::default()
        };
        let err = ConversionConfig::builder().profile(bad).build().unwrap_err();
        assert!(err.to_string().contains("Channels"));
    }

    #[test]
    fn config_defaults() {
        let c = ConversionConfig::default();
        assert!(!c.overwrite);
        assert!(c.output_sink.is_none());
        assert_eq!(c.profile, AudioProfile::default());
    }

    #[test]
    fn profile_serde_roundtrip_keeps_names() {
        let json = serde_json::to_value(AudioProfile::default()).unwrap();
        assert_eq!(json["sample_rate_hz"], 44_100);
        assert_eq!(json["format"], "mp3");
    }
}
