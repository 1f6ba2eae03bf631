//! Conversion progress read from ffmpeg's status lines.
//!
//! While encoding, ffmpeg redraws a status line such as
//!
//! ```text
//! size=     512kB time=00:00:30.00 bitrate= 139.8kbits/s speed=61.2x
//! ```
//!
//! The `time=` field is the amount of media written so far. The runner
//! passes every relayed line through [`parse_progress_time`] and reports hits
//! to [`crate::sink::OutputSink::on_progress`].

use std::time::Duration;

/// Media time from the `time=HH:MM:SS.xx` field of an ffmpeg status line.
///
/// Returns `None` for lines without the field, for `time=N/A`, and for the
/// negative timestamps ffmpeg prints before the first packet.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use vid2mp3::parse_progress_time;
///
/// let t = parse_progress_time("size= 256kB time=00:01:02.50 bitrate=128.0kbits/s");
/// assert_eq!(t, Some(Duration::from_millis(62_500)));
/// ```
pub fn parse_progress_time(line: &str) -> Option<Duration> {
    let start = line.find("time=")? + "time=".len();
    let value = line[start..].split_whitespace().next()?;

    let mut parts = value.splitn(3, ':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    let whole = hours.checked_mul(3600)?.checked_add(minutes * 60)?;
    Some(Duration::from_secs(whole) + Duration::try_from_secs_f64(seconds).ok()?)
}
