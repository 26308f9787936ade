use serde::{de::DeserializeOwned, Serialize};

pub const NEW_LINE: char = '\n';

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("segment {index} of the frame is not valid JSON: {source}")]
    InvalidSegment {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode value into a frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Splits a websocket frame into its line segments.
///
/// Both `\n` and `\r\n` end a segment. A frame ending with a line break
/// yields a trailing empty segment, which in turn fails to decode.
pub fn split_segments(payload: &str) -> Vec<&str> {
    let segments: Vec<&str> = payload.split(NEW_LINE).collect();
    let last = segments.len() - 1;

    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            // only a '\r' right before a '\n' belongs to the line break
            if index < last {
                segment.strip_suffix('\r').unwrap_or(segment)
            } else {
                segment
            }
        })
        .collect()
}

/// Decodes every segment of a frame independently, in segment order.
///
/// Segments are not buffered across frames, a value split over two frames
/// fails to decode in both.
pub fn decode_frame<T: DeserializeOwned>(
    payload: &str,
) -> impl Iterator<Item = Result<T, FrameError>> + '_ {
    split_segments(payload)
        .into_iter()
        .enumerate()
        .map(|(index, segment)| {
            serde_json::from_str::<T>(segment)
                .map_err(|source| FrameError::InvalidSegment { index, source })
        })
}

/// Joins the serialized values into a single frame, one value per line
pub fn encode_frame<T: Serialize>(values: &[T]) -> Result<String, FrameError> {
    let mut frame = String::new();

    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            frame.push(NEW_LINE);
        }
        frame.push_str(&serde_json::to_string(value)?);
    }

    Ok(frame)
}
