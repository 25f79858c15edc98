use crate::anchor::SeekAnchor;
use crate::stream_handle::StreamHandle;
use log::debug;
use thiserror::Error;

/// A single cursor move: where to measure from and how far to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeekRequest {
    pub anchor: SeekAnchor,
    pub delta: i64,
}

impl SeekRequest {
    pub fn new(anchor: SeekAnchor, delta: i64) -> Self {
        SeekRequest { anchor, delta }
    }

    /// Build a request from the host's `whence` symbol and offset.
    pub fn from_whence(whence: &str, delta: i64) -> Self {
        SeekRequest::new(SeekAnchor::from_symbol(whence), delta)
    }
}

/// Reasons a seek can fail.
///
/// The messages are what the host shows to its users, so they're kept stable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekError {
    #[error("seek is not supported on this file")]
    NotSeekable,
    #[error("file has been closed")]
    Closed,
    #[error("seek failed, invalid offset!")]
    InvalidOffset,
    #[error("seek failed!")]
    SeekFailed,
}

/// How offset arithmetic relative to the cursor treats overflow.
///
/// Arithmetic relative to the end of the stream is always checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// `current + delta` wraps and whatever comes out is handed to the stream.
    #[default]
    Compatible,
    /// `current + delta` overflowing fails with `InvalidOffset`.
    Checked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeekOptions {
    pub overflow: OverflowPolicy,
}

/// Move the cursor of `handle` as described by `request`.
///
/// Returns the new absolute offset, which is also where the stream's cursor is
/// afterwards. Nothing is retried.
pub fn seek<H: StreamHandle + ?Sized>(
    handle: &mut H,
    request: SeekRequest,
    options: SeekOptions,
) -> Result<i64, SeekError> {
    if !handle.is_seekable_kind() {
        debug!("refusing to seek on {:?} resource", handle.kind());
        return Err(SeekError::NotSeekable);
    }
    // must come before any size/offset query
    if handle.is_closed() {
        return Err(SeekError::Closed);
    }

    let target = compute_target(handle, request, options)?;
    debug!(
        "seeking to {} ({} {:+})",
        target, request.anchor, request.delta
    );

    match handle.seek_to(target) {
        Ok(()) => Ok(target),
        Err(e) => {
            debug!("underlying seek to {} failed: {}", target, e);
            Err(SeekError::SeekFailed)
        }
    }
}

fn compute_target<H: StreamHandle + ?Sized>(
    handle: &mut H,
    request: SeekRequest,
    options: SeekOptions,
) -> Result<i64, SeekError> {
    let delta = request.delta;
    match request.anchor {
        // negative targets are left for the stream to reject
        SeekAnchor::Start => Ok(delta),
        SeekAnchor::End => {
            let size = match handle.size() {
                Some(size) if size > 0 => size,
                other => {
                    debug!("stream size unusable for seeking from end: {:?}", other);
                    return Err(SeekError::InvalidOffset);
                }
            };
            size.checked_add(delta).ok_or(SeekError::InvalidOffset)
        }
        SeekAnchor::Current => {
            let current = handle.offset().map_err(|e| {
                debug!("couldn't query stream offset: {}", e);
                SeekError::SeekFailed
            })?;
            match options.overflow {
                OverflowPolicy::Compatible => Ok(current.wrapping_add(delta)),
                OverflowPolicy::Checked => {
                    current.checked_add(delta).ok_or(SeekError::InvalidOffset)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_handle::ResourceKind;
    use rstest::{fixture, rstest};
    use std::io;

    /// Stream that records every collaborator query made against it.
    #[derive(Debug)]
    struct RecordingStream {
        kind: ResourceKind,
        closed: bool,
        size: Option<i64>,
        offset: i64,
        size_queries: usize,
        offset_queries: usize,
        seeks: Vec<i64>,
    }

    impl RecordingStream {
        fn queried(&self) -> bool {
            self.size_queries > 0 || self.offset_queries > 0 || !self.seeks.is_empty()
        }
    }

    impl StreamHandle for RecordingStream {
        fn kind(&self) -> ResourceKind {
            self.kind
        }

        fn is_closed(&mut self) -> bool {
            self.closed
        }

        fn size(&mut self) -> Option<i64> {
            self.size_queries += 1;
            self.size
        }

        fn offset(&mut self) -> io::Result<i64> {
            self.offset_queries += 1;
            Ok(self.offset)
        }

        fn seek_to(&mut self, target: i64) -> io::Result<()> {
            self.seeks.push(target);
            if target < 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "negative position",
                ));
            }
            self.offset = target;
            Ok(())
        }
    }

    #[fixture]
    fn stream() -> RecordingStream {
        let _ = env_logger::builder().is_test(true).try_init();
        RecordingStream {
            kind: ResourceKind::File,
            closed: false,
            size: Some(50),
            offset: 100,
            size_queries: 0,
            offset_queries: 0,
            seeks: vec![],
        }
    }

    #[rstest]
    fn test_current_backwards(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::Current, -10),
            SeekOptions::default(),
        );
        assert_eq!(result, Ok(90));
        assert_eq!(stream.offset, 90);
    }

    #[rstest]
    fn test_end_without_delta(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::End, 0),
            SeekOptions::default(),
        );
        assert_eq!(result, Ok(50));
        assert_eq!(stream.offset, 50);
    }

    #[rstest]
    #[case(50, 10, 60)]
    #[case(50, -50, 0)]
    #[case(1, i64::MAX - 1, i64::MAX)]
    fn test_end_adds_size(
        mut stream: RecordingStream,
        #[case] size: i64,
        #[case] delta: i64,
        #[case] expected: i64,
    ) {
        stream.size = Some(size);
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::End, delta),
            SeekOptions::default(),
        );
        assert_eq!(result, Ok(expected));
        assert_eq!(stream.offset, expected);
    }

    #[rstest]
    #[case(Some(0), 5)]
    #[case(Some(0), 0)]
    #[case(Some(-1), 10)]
    #[case(None, 0)]
    fn test_end_with_unusable_size(
        mut stream: RecordingStream,
        #[case] size: Option<i64>,
        #[case] delta: i64,
    ) {
        stream.size = size;
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::End, delta),
            SeekOptions::default(),
        );
        assert_eq!(result, Err(SeekError::InvalidOffset));
        assert!(stream.seeks.is_empty());
        assert_eq!(stream.offset, 100);
    }

    #[rstest]
    #[case(OverflowPolicy::Compatible)]
    #[case(OverflowPolicy::Checked)]
    fn test_end_overflow_never_reaches_stream(
        mut stream: RecordingStream,
        #[case] overflow: OverflowPolicy,
    ) {
        stream.size = Some(i64::MAX - 5);
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::End, 6),
            SeekOptions { overflow },
        );
        assert_eq!(result, Err(SeekError::InvalidOffset));
        assert!(stream.seeks.is_empty());
    }

    #[rstest]
    #[case(SeekAnchor::Start)]
    #[case(SeekAnchor::End)]
    #[case(SeekAnchor::Current)]
    fn test_closed_stream_is_not_queried(mut stream: RecordingStream, #[case] anchor: SeekAnchor) {
        stream.closed = true;
        let result = seek(
            &mut stream,
            SeekRequest::new(anchor, 0),
            SeekOptions::default(),
        );
        assert_eq!(result, Err(SeekError::Closed));
        assert!(!stream.queried());
    }

    #[rstest]
    #[case(ResourceKind::Pipe, false)]
    #[case(ResourceKind::Terminal, false)]
    #[case(ResourceKind::Pipe, true)]
    fn test_unseekable_kind_wins_over_closed(
        mut stream: RecordingStream,
        #[case] kind: ResourceKind,
        #[case] closed: bool,
    ) {
        stream.kind = kind;
        stream.closed = closed;
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::Start, 0),
            SeekOptions::default(),
        );
        assert_eq!(result, Err(SeekError::NotSeekable));
        assert!(!stream.queried());
    }

    #[rstest]
    fn test_current_zero_is_idempotent(mut stream: RecordingStream) {
        for _ in 0..3 {
            let result = seek(
                &mut stream,
                SeekRequest::new(SeekAnchor::Current, 0),
                SeekOptions::default(),
            );
            assert_eq!(result, Ok(100));
        }
        assert_eq!(stream.offset, 100);
        assert_eq!(stream.seeks, vec![100, 100, 100]);
    }

    #[rstest]
    fn test_unknown_whence_behaves_like_current(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::from_whence("xyz", 7),
            SeekOptions::default(),
        );
        assert_eq!(result, Ok(107));
        assert_eq!(stream.size_queries, 0);
        assert_eq!(stream.offset_queries, 1);
    }

    #[rstest]
    fn test_start_uses_delta_as_is(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::Start, 3),
            SeekOptions::default(),
        );
        assert_eq!(result, Ok(3));
        assert!(stream.size_queries == 0 && stream.offset_queries == 0);
    }

    #[rstest]
    fn test_negative_start_rejected_by_stream(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::Start, -1),
            SeekOptions::default(),
        );
        assert_eq!(result, Err(SeekError::SeekFailed));
        assert_eq!(stream.seeks, vec![-1]);
        assert_eq!(stream.offset, 100);
    }

    #[rstest]
    fn test_current_overflow_compatible_wraps(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::Current, i64::MAX),
            SeekOptions::default(),
        );
        // wrapped target is negative, so the stream refuses it
        assert_eq!(result, Err(SeekError::SeekFailed));
        assert_eq!(stream.seeks, vec![100i64.wrapping_add(i64::MAX)]);
    }

    #[rstest]
    fn test_current_overflow_checked(mut stream: RecordingStream) {
        let result = seek(
            &mut stream,
            SeekRequest::new(SeekAnchor::Current, i64::MAX),
            SeekOptions {
                overflow: OverflowPolicy::Checked,
            },
        );
        assert_eq!(result, Err(SeekError::InvalidOffset));
        assert!(stream.seeks.is_empty());
    }

    #[rstest]
    #[case(SeekError::NotSeekable, "seek is not supported on this file")]
    #[case(SeekError::Closed, "file has been closed")]
    #[case(SeekError::InvalidOffset, "seek failed, invalid offset!")]
    #[case(SeekError::SeekFailed, "seek failed!")]
    fn test_error_messages(#[case] error: SeekError, #[case] message: &str) {
        assert_eq!(error.to_string(), message);
    }
}
