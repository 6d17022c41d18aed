//! Batch planner for playlist mutations.
//!
//! Spotify accepts at most [`MAX_CHUNK_SIZE`] items per add/remove/replace
//! call. Larger requests are split into consecutive chunks that are sent one
//! after another; the first failing chunk stops the batch and the outcome
//! records how far it got.

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::{ErrorKind, ToolError};
use crate::spotify::{SpotifyApi, SpotifyError, TrackRef};

/// Per-call item ceiling of the playlist endpoints.
pub const MAX_CHUNK_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOperation {
    Add,
    Remove,
    /// First chunk replaces the playlist contents, the rest are appended.
    Replace,
}

impl BatchOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Replace => "replace",
        }
    }
}

/// A bulk mutation of one playlist.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub playlist_id: String,
    pub operation: BatchOperation,
    pub items: Vec<TrackRef>,
    /// Insert position for `Add`; appended when `None`.
    pub position: Option<u32>,
    /// Snapshot the first `Remove` chunk is applied against.
    pub snapshot_id: Option<String>,
}

impl BatchRequest {
    pub fn new(playlist_id: impl Into<String>, operation: BatchOperation, items: Vec<TrackRef>) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            operation,
            items,
            position: None,
            snapshot_id: None,
        }
    }

    pub fn with_position(mut self, position: Option<u32>) -> Self {
        self.position = position;
        self
    }

    pub fn with_snapshot(mut self, snapshot_id: Option<String>) -> Self {
        self.snapshot_id = snapshot_id;
        self
    }

    /// For `Add` with a position, every item must land at an index that fits in a `u32`.
    pub fn check_position(&self) -> Result<(), SpotifyError> {
        let Some(position) = self.position.filter(|_| self.operation == BatchOperation::Add)
        else {
            return Ok(());
        };
        let fits = u32::try_from(self.items.len())
            .ok()
            .and_then(|n| position.checked_add(n))
            .is_some();
        if fits {
            Ok(())
        } else {
            Err(SpotifyError::Validation(format!(
                "position {} is out of range for {} item(s)",
                position,
                self.items.len()
            )))
        }
    }
}

/// The chunk that stopped a batch.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkFailure {
    /// 1-based chunk index.
    pub chunk: usize,
    /// Index of the chunk's first item in the request.
    pub item_offset: usize,
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip)]
    pub error: SpotifyError,
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub operation: BatchOperation,
    pub playlist_id: String,
    pub requested: usize,
    pub items_processed: usize,
    pub chunks_planned: usize,
    pub chunks_issued: usize,
    pub snapshot_id: Option<String>,
    pub failure: Option<ChunkFailure>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// The error to report for a failed batch.
    ///
    /// A failure on the first chunk is reported as the plain remote error;
    /// anything later is a partial batch.
    pub fn error(&self) -> Option<ToolError> {
        let failure = self.failure.as_ref()?;
        if failure.chunk == 1 {
            return Some(ToolError::Remote(failure.error.clone()));
        }
        Some(ToolError::PartialBatch {
            succeeded: self.items_processed,
            failed_chunk: failure.chunk,
            chunks_planned: self.chunks_planned,
            source: failure.error.clone(),
        })
    }
}

/// Split references into consecutive chunks of at most [`MAX_CHUNK_SIZE`].
pub fn plan_chunks(items: &[TrackRef]) -> std::slice::Chunks<'_, TrackRef> {
    items.chunks(MAX_CHUNK_SIZE)
}

/// Number of calls a batch of `len` items needs.
pub fn chunk_count(len: usize) -> usize {
    len.div_ceil(MAX_CHUNK_SIZE)
}

/// Apply a batch request, one chunk at a time.
#[instrument(skip_all, fields(playlist_id = %request.playlist_id, operation = request.operation.as_str(), items = request.items.len()))]
pub async fn run_batch(api: &dyn SpotifyApi, request: &BatchRequest) -> BatchOutcome {
    let total = request.items.len();
    let mut outcome = BatchOutcome {
        operation: request.operation,
        playlist_id: request.playlist_id.clone(),
        requested: total,
        items_processed: 0,
        chunks_planned: chunk_count(total),
        chunks_issued: 0,
        snapshot_id: request.snapshot_id.clone(),
        failure: None,
    };

    if let Err(error) = request.check_position() {
        outcome.failure = Some(chunk_failure(1, 0, error));
        return outcome;
    }

    // An empty replace still clears the playlist.
    if total == 0 && request.operation == BatchOperation::Replace {
        outcome.chunks_planned = 1;
        outcome.chunks_issued = 1;
        return match api.replace_playlist_items(&request.playlist_id, &[]).await {
            Ok(snapshot) => {
                outcome.snapshot_id = Some(snapshot);
                outcome
            }
            Err(error) => {
                outcome.failure = Some(chunk_failure(1, 0, error));
                outcome
            }
        };
    }

    for (index, chunk) in plan_chunks(&request.items).enumerate() {
        let uris: Vec<String> = chunk.iter().map(TrackRef::uri).collect();
        let chunk_number = index + 1;

        info!(
            "Batch {} on playlist {}: chunk {}/{} ({} items, {} of {} done)",
            request.operation.as_str(),
            request.playlist_id,
            chunk_number,
            outcome.chunks_planned,
            uris.len(),
            outcome.items_processed,
            total
        );

        outcome.chunks_issued += 1;
        let result = match request.operation {
            BatchOperation::Add => {
                let position = request
                    .position
                    .map(|p| p.saturating_add(outcome.items_processed as u32));
                api.add_playlist_items(&request.playlist_id, &uris, position)
                    .await
            }
            BatchOperation::Remove => {
                api.remove_playlist_items(
                    &request.playlist_id,
                    &uris,
                    outcome.snapshot_id.as_deref(),
                )
                .await
            }
            BatchOperation::Replace if index == 0 => {
                api.replace_playlist_items(&request.playlist_id, &uris)
                    .await
            }
            BatchOperation::Replace => {
                api.add_playlist_items(&request.playlist_id, &uris, None)
                    .await
            }
        };

        match result {
            Ok(snapshot) => {
                outcome.items_processed += uris.len();
                outcome.snapshot_id = Some(snapshot);
            }
            Err(error) => {
                warn!(
                    "Batch {} stopped at chunk {}/{}: {}",
                    request.operation.as_str(),
                    chunk_number,
                    outcome.chunks_planned,
                    error
                );
                outcome.failure = Some(chunk_failure(chunk_number, outcome.items_processed, error));
                break;
            }
        }
    }

    outcome
}

fn chunk_failure(chunk: usize, item_offset: usize, error: SpotifyError) -> ChunkFailure {
    ChunkFailure {
        chunk,
        item_offset,
        kind: ErrorKind::from(&error),
        message: error.to_string(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::fake::{FakeSpotify, test_uri};

    fn refs(n: usize) -> Vec<TrackRef> {
        (0..n).map(|i| TrackRef::parse(&test_uri(i)).unwrap()).collect()
    }

    fn mutation_calls(api: &FakeSpotify) -> usize {
        api.calls()
            .iter()
            .filter(|c| matches!(c.as_str(), "add" | "remove" | "replace"))
            .count()
    }

    #[test]
    fn test_plan_chunks_sizes() {
        let items = refs(250);
        let sizes: Vec<usize> = plan_chunks(&items).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
    }

    #[test]
    fn test_chunk_count() {
        for (n, expected) in [(0, 0), (1, 1), (99, 1), (100, 1), (101, 2), (250, 3), (1000, 10)] {
            assert_eq!(chunk_count(n), expected, "n = {}", n);
        }
    }

    #[tokio::test]
    async fn test_chunk_calls_cover_all_items() {
        for n in [1, 99, 100, 101, 250, 1000] {
            let api = FakeSpotify::new();
            let request = BatchRequest::new("pl", BatchOperation::Add, refs(n));
            let outcome = run_batch(&api, &request).await;

            assert!(outcome.is_success());
            assert_eq!(outcome.items_processed, n);
            assert_eq!(outcome.chunks_issued, chunk_count(n));

            let mutations = api.mutations();
            assert_eq!(mutations.len(), chunk_count(n));
            assert!(mutations.iter().all(|m| m.uris.len() <= MAX_CHUNK_SIZE));
            let sent: Vec<String> = mutations.into_iter().flat_map(|m| m.uris).collect();
            let expected: Vec<String> = (0..n).map(test_uri).collect();
            assert_eq!(sent, expected);
        }
    }

    #[tokio::test]
    async fn test_add_250_items() {
        let api = FakeSpotify::new();
        let request = BatchRequest::new("pl", BatchOperation::Add, refs(250));
        let outcome = run_batch(&api, &request).await;

        let sizes: Vec<usize> = api.mutations().iter().map(|m| m.uris.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(outcome.items_processed, 250);
        assert_eq!(outcome.snapshot_id.as_deref(), Some("snapshot-3"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        for op in [BatchOperation::Add, BatchOperation::Remove] {
            let api = FakeSpotify::new();
            let outcome = run_batch(&api, &BatchRequest::new("pl", op, Vec::new())).await;
            assert!(outcome.is_success());
            assert_eq!(outcome.items_processed, 0);
            assert_eq!(outcome.chunks_issued, 0);
            assert!(api.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_add_with_position_keeps_order() {
        let api = FakeSpotify::new();
        let request =
            BatchRequest::new("pl", BatchOperation::Add, refs(250)).with_position(Some(10));
        run_batch(&api, &request).await;

        let positions: Vec<Option<u32>> = api.mutations().iter().map(|m| m.position).collect();
        assert_eq!(positions, vec![Some(10), Some(110), Some(210)]);
    }

    #[tokio::test]
    async fn test_add_position_out_of_range_is_rejected() {
        let api = FakeSpotify::new();
        let request = BatchRequest::new("pl", BatchOperation::Add, refs(250))
            .with_position(Some(u32::MAX - 50));
        let outcome = run_batch(&api, &request).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.chunks_issued, 0);
        assert_eq!(outcome.items_processed, 0);
        assert!(api.calls().is_empty());

        let err = outcome.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
        assert!(matches!(err, ToolError::Remote(SpotifyError::Validation(_))));
    }

    #[test]
    fn test_check_position_bounds() {
        let at_edge = BatchRequest::new("pl", BatchOperation::Add, refs(10))
            .with_position(Some(u32::MAX - 10));
        assert!(at_edge.check_position().is_ok());

        let past_edge = at_edge.clone().with_position(Some(u32::MAX - 9));
        assert!(past_edge.check_position().is_err());

        let remove = BatchRequest::new("pl", BatchOperation::Remove, refs(10))
            .with_position(Some(u32::MAX));
        assert!(remove.check_position().is_ok());
    }

    #[tokio::test]
    async fn test_remove_chains_snapshots() {
        let api = FakeSpotify::new();
        let request = BatchRequest::new("pl", BatchOperation::Remove, refs(201))
            .with_snapshot(Some("snapshot-0".into()));
        let outcome = run_batch(&api, &request).await;

        let snapshots: Vec<Option<String>> =
            api.mutations().into_iter().map(|m| m.snapshot_id).collect();
        assert_eq!(
            snapshots,
            vec![
                Some("snapshot-0".to_string()),
                Some("snapshot-1".to_string()),
                Some("snapshot-2".to_string()),
            ]
        );
        assert_eq!(outcome.snapshot_id.as_deref(), Some("snapshot-3"));
    }

    #[tokio::test]
    async fn test_replace_then_append() {
        let api = FakeSpotify::new();
        let request = BatchRequest::new("pl", BatchOperation::Replace, refs(250));
        let outcome = run_batch(&api, &request).await;

        let ops: Vec<&str> = api.mutations().iter().map(|m| m.op).collect();
        assert_eq!(ops, vec!["replace", "add", "add"]);
        assert_eq!(outcome.items_processed, 250);
    }

    #[tokio::test]
    async fn test_empty_replace_clears() {
        let api = FakeSpotify::new();
        let outcome = run_batch(&api, &BatchRequest::new("pl", BatchOperation::Replace, Vec::new())).await;
        assert!(outcome.is_success());
        let mutations = api.mutations();
        assert_eq!(mutations.len(), 1);
        assert_eq!(mutations[0].op, "replace");
        assert!(mutations[0].uris.is_empty());
    }

    #[tokio::test]
    async fn test_chunk_two_of_three_rate_limited() {
        let api = FakeSpotify::new()
            .fail_mutation(2, SpotifyError::RateLimited { retry_after: Some(30) });
        let request = BatchRequest::new("pl", BatchOperation::Add, refs(250));
        let outcome = run_batch(&api, &request).await;

        assert!(!outcome.is_success());
        assert_eq!(outcome.items_processed, 100);
        assert_eq!(outcome.chunks_issued, 2);
        assert_eq!(mutation_calls(&api), 2, "chunk 3 must not be attempted");

        let failure = outcome.failure.as_ref().unwrap();
        assert_eq!(failure.chunk, 2);
        assert_eq!(failure.item_offset, 100);
        assert_eq!(failure.kind, ErrorKind::RemoteRateLimitError);

        let err = outcome.error().unwrap();
        assert_eq!(err.kind(), ErrorKind::RemoteRateLimitError);
        assert!(matches!(
            err,
            ToolError::PartialBatch {
                succeeded: 100,
                failed_chunk: 2,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_chunk_k_failure_stops_batch() {
        for k in 1..=5 {
            let api = FakeSpotify::new().fail_mutation(k, SpotifyError::Unavailable("boom".into()));
            let outcome = run_batch(&api, &BatchRequest::new("pl", BatchOperation::Add, refs(500))).await;
            assert_eq!(outcome.items_processed, (k - 1) * MAX_CHUNK_SIZE);
            assert_eq!(mutation_calls(&api), k);
        }
    }

    #[tokio::test]
    async fn test_first_chunk_failure_is_plain_remote_error() {
        let api = FakeSpotify::new().fail_mutation(1, SpotifyError::NotFound("playlist".into()));
        let outcome = run_batch(&api, &BatchRequest::new("pl", BatchOperation::Add, refs(150))).await;

        assert_eq!(outcome.items_processed, 0);
        let err = outcome.error().unwrap();
        assert!(matches!(err, ToolError::Remote(SpotifyError::NotFound(_))));
        assert_eq!(err.kind(), ErrorKind::RemoteNotFoundError);
    }

    #[tokio::test]
    async fn test_outcome_serializes() {
        let api = FakeSpotify::new();
        let outcome = run_batch(&api, &BatchRequest::new("pl", BatchOperation::Add, refs(3))).await;
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["operation"], "add");
        assert_eq!(json["items_processed"], 3);
        assert!(json["failure"].is_null());
    }
}
