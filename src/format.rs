//! Transcript output formatting: plain text, SRT, and WebVTT.

/// Comma-separated list of recognized output format names, for error messages.
pub const VALID_FORMATS: &str = "text, srt, vtt";

/// Output representation selected per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Srt,
    Vtt,
}

impl OutputFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(OutputFormat::Text),
            "srt" => Some(OutputFormat::Srt),
            "vtt" => Some(OutputFormat::Vtt),
            _ => None,
        }
    }
}

/// The two subtitle timestamp dialects: SRT delimits milliseconds with a
/// comma, WebVTT with a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleDialect {
    Srt,
    Vtt,
}

/// A contiguous interval of transcribed speech.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Spoken text, possibly padded with whitespace by the model.
    pub text: String,
}

/// What the transcription collaborator hands back: the full transcript plus
/// the timed segments it was assembled from, in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptionResult {
    pub text: String,
    pub segments: Vec<Segment>,
}

/// Format a non-negative number of seconds as `HH:MM:SS,mmm` (SRT) or
/// `HH:MM:SS.mmm` (VTT).
///
/// Every field truncates; 59.9995s yields 999 milliseconds rather than
/// rolling over into the next second. Negative or non-finite input is not
/// guarded against.
pub fn format_timestamp(seconds: f64, dialect: SubtitleDialect) -> String {
    let hours = (seconds / 3600.0) as u32;
    let minutes = ((seconds % 3600.0) / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    let millis = ((seconds - seconds.floor()) * 1000.0) as u32;
    match dialect {
        SubtitleDialect::Srt => format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}"),
        SubtitleDialect::Vtt => format!("{hours:02}:{minutes:02}:{secs:02}.{millis:03}"),
    }
}

/// The transcript as a single string, untouched.
pub fn format_as_text(result: &TranscriptionResult) -> String {
    result.text.clone()
}

/// SubRip: 1-based index, timestamp line, trimmed text, blocks separated by
/// a blank line. Empty segment list formats to an empty string.
pub fn format_as_srt(result: &TranscriptionResult) -> String {
    let mut blocks = Vec::with_capacity(result.segments.len());
    for (idx, segment) in result.segments.iter().enumerate() {
        let start = format_timestamp(segment.start, SubtitleDialect::Srt);
        let end = format_timestamp(segment.end, SubtitleDialect::Srt);
        blocks.push(format!(
            "{}\n{start} --> {end}\n{}\n",
            idx + 1,
            segment.text.trim()
        ));
    }
    blocks.join("\n").trim().to_string()
}

/// WebVTT: `WEBVTT` header, then unindexed cue blocks. The header survives
/// even when there are no segments.
pub fn format_as_vtt(result: &TranscriptionResult) -> String {
    let mut blocks = vec!["WEBVTT\n".to_string()];
    for segment in &result.segments {
        let start = format_timestamp(segment.start, SubtitleDialect::Vtt);
        let end = format_timestamp(segment.end, SubtitleDialect::Vtt);
        blocks.push(format!("{start} --> {end}\n{}\n", segment.text.trim()));
    }
    blocks.join("\n").trim().to_string()
}

pub fn render(result: &TranscriptionResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_as_text(result),
        OutputFormat::Srt => format_as_srt(result),
        OutputFormat::Vtt => format_as_vtt(result),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_segments() -> TranscriptionResult {
        TranscriptionResult {
            text: "hi bye".to_string(),
            segments: vec![
                Segment {
                    start: 0.0,
                    end: 1.2,
                    text: " hi ".to_string(),
                },
                Segment {
                    start: 1.2,
                    end: 2.5,
                    text: "bye".to_string(),
                },
            ],
        }
    }

    #[test]
    fn timestamp_srt_dialect() {
        assert_eq!(format_timestamp(0.0, SubtitleDialect::Srt), "00:00:00,000");
        assert_eq!(format_timestamp(1.5, SubtitleDialect::Srt), "00:00:01,500");
        assert_eq!(
            format_timestamp(3661.5, SubtitleDialect::Srt),
            "01:01:01,500"
        );
    }

    #[test]
    fn timestamp_vtt_dialect() {
        assert_eq!(format_timestamp(0.0, SubtitleDialect::Vtt), "00:00:00.000");
        assert_eq!(
            format_timestamp(3661.5, SubtitleDialect::Vtt),
            "01:01:01.500"
        );
    }

    #[test]
    fn timestamp_is_fixed_width() {
        for &s in &[0.0, 0.001, 59.999, 60.0, 3599.5, 86399.999] {
            assert_eq!(format_timestamp(s, SubtitleDialect::Srt).len(), 12);
            assert_eq!(format_timestamp(s, SubtitleDialect::Vtt).len(), 12);
        }
    }

    #[test]
    fn timestamp_truncates_at_millisecond_boundary() {
        // No carry into the seconds field.
        assert_eq!(
            format_timestamp(59.9995, SubtitleDialect::Srt),
            "00:00:59,999"
        );
        assert_eq!(
            format_timestamp(0.9999, SubtitleDialect::Srt),
            "00:00:00,999"
        );
    }

    #[test]
    fn text_is_verbatim_passthrough() {
        let result = TranscriptionResult {
            text: "hello".to_string(),
            segments: Vec::new(),
        };
        assert_eq!(format_as_text(&result), "hello");
        assert_eq!(format_as_text(&TranscriptionResult::default()), "");
    }

    #[test]
    fn srt_blocks_are_indexed_and_trimmed() {
        let expected = "1\n00:00:00,000 --> 00:00:01,200\nhi\n\n2\n00:00:01,200 --> 00:00:02,500\nbye";
        assert_eq!(format_as_srt(&two_segments()), expected);
    }

    #[test]
    fn srt_of_no_segments_is_empty() {
        assert_eq!(format_as_srt(&TranscriptionResult::default()), "");
    }

    #[test]
    fn vtt_carries_header_and_cues() {
        let expected =
            "WEBVTT\n\n00:00:00.000 --> 00:00:01.200\nhi\n\n00:00:01.200 --> 00:00:02.500\nbye";
        assert_eq!(format_as_vtt(&two_segments()), expected);
    }

    #[test]
    fn vtt_of_no_segments_is_bare_header() {
        assert_eq!(format_as_vtt(&TranscriptionResult::default()), "WEBVTT");
    }

    #[test]
    fn format_names_parse() {
        assert_eq!(OutputFormat::parse("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("srt"), Some(OutputFormat::Srt));
        assert_eq!(OutputFormat::parse("vtt"), Some(OutputFormat::Vtt));
        assert_eq!(OutputFormat::parse("ass"), None);
        assert_eq!(OutputFormat::parse("SRT"), None);
    }
}
