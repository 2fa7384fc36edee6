//! # ephem-core: tokenized, deny-by-default access control
//!
//! `ephem-core` composes C1 ([`ephem_types::TokenGenerator`]), C2
//! ([`ephem_blob::BlobStore`]), and C3 ([`ephem_index::MetadataIndex`])
//! into the two operations that matter: [`UploadCoordinator::upload`]
//! and [`AccessArbiter::access`]. Nothing here depends on an HTTP
//! framework — the adapter layer decodes a request into an
//! [`UploadInput`] or a raw token string and calls straight through.
//!
//! The clock is an injected [`Clock`] capability rather than a direct
//! `SystemTime::now()` call, so tests can pin "now" and exercise the
//! expiry boundary exactly.

mod arbiter;
mod clock;
mod coordinator;
mod error;
mod outcome;

pub use arbiter::AccessArbiter;
pub use clock::{Clock, FixedClock, SystemClock};
pub use coordinator::{UploadCoordinator, UploadInput, UploadReceipt};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use outcome::{AccessOutcome, DenyReason};

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;
    use ephem_blob::{BlobError, BlobResult, BlobStore, MemoryBlobStore, PutMeta, StoredBlob};
    use ephem_index::{IndexResult, MemoryMetadataIndex, MetadataIndex, MetadataRecord};
    use ephem_types::{BlobReference, RandomTokenGenerator, Token};

    use super::*;

    const TTL_MS: i64 = 60_000;
    const SKEW_MS: i64 = 5_000;

    fn accepted() -> HashSet<String> {
        ["image/jpeg", "image/png"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn coordinator(clock: Arc<dyn Clock>) -> (UploadCoordinator, Arc<MemoryBlobStore>, Arc<MemoryMetadataIndex>) {
        let blob = Arc::new(MemoryBlobStore::new());
        let index = Arc::new(MemoryMetadataIndex::new());
        let coordinator = UploadCoordinator::new(
            blob.clone(),
            index.clone(),
            Arc::new(RandomTokenGenerator),
            clock,
            accepted(),
            5 * 1024 * 1024,
            TTL_MS,
        );
        (coordinator, blob, index)
    }

    fn arbiter(
        blob: Arc<dyn BlobStore>,
        index: Arc<dyn MetadataIndex>,
        clock: Arc<dyn Clock>,
    ) -> AccessArbiter {
        AccessArbiter::new(blob, index, clock, SKEW_MS)
    }

    // S1 — happy path.
    #[tokio::test]
    async fn happy_path_roundtrips_bytes_and_content_type() {
        let clock = Arc::new(FixedClock(1_000_000));
        let (coordinator, blob, index) = coordinator(clock.clone());

        let receipt = coordinator
            .upload(UploadInput::new(Bytes::from(vec![0x01; 1024]), "image/jpeg"))
            .await
            .unwrap();

        assert_eq!(receipt.expires_at_epoch_ms, 1_060_000);

        let access_clock = Arc::new(FixedClock(1_030_000));
        let arbiter = arbiter(blob, index, access_clock);
        let outcome = arbiter.access(&receipt.token).await.unwrap();

        match outcome {
            AccessOutcome::Allowed(bytes, record) => {
                assert_eq!(bytes, Bytes::from(vec![0x01; 1024]));
                assert_eq!(record.content_type.as_deref(), Some("image/jpeg"));
            }
            AccessOutcome::Denied(reason) => panic!("expected allowed, got denied({reason:?})"),
        }
    }

    // S2 — expired by a lot.
    #[tokio::test]
    async fn expired_well_past_grace_is_denied_and_blob_untouched() {
        let upload_clock = Arc::new(FixedClock(1_000_000));
        let (coordinator, blob, index) = coordinator(upload_clock);
        let receipt = coordinator
            .upload(UploadInput::new(Bytes::from_static(b"x"), "image/png"))
            .await
            .unwrap();

        let tracking_blob = Arc::new(TrackingBlobStore::new(blob));
        let access_clock = Arc::new(FixedClock(1_070_000));
        let arbiter = arbiter(tracking_blob.clone(), index, access_clock);

        let outcome = arbiter.access(&receipt.token).await.unwrap();
        assert!(matches!(outcome, AccessOutcome::Denied(DenyReason::Expired)));
        assert_eq!(tracking_blob.get_calls(), 0);
    }

    // S3 — expired within grace.
    #[tokio::test]
    async fn access_within_grace_window_is_allowed() {
        let upload_clock = Arc::new(FixedClock(1_000_000));
        let (coordinator, blob, index) = coordinator(upload_clock);
        let receipt = coordinator
            .upload(UploadInput::new(Bytes::from_static(b"x"), "image/png"))
            .await
            .unwrap();

        let access_clock = Arc::new(FixedClock(1_064_000));
        let arbiter = arbiter(blob, index, access_clock);
        let outcome = arbiter.access(&receipt.token).await.unwrap();
        assert!(outcome.is_allowed());
    }

    // S4 — missing token.
    #[tokio::test]
    async fn unknown_token_is_denied_missing_and_blob_untouched() {
        let blob = Arc::new(TrackingBlobStore::new(Arc::new(MemoryBlobStore::new())));
        let index = Arc::new(MemoryMetadataIndex::new());
        let arbiter = arbiter(blob.clone(), index, Arc::new(FixedClock(0)));

        let outcome = arbiter
            .access(&Token::from_string("never-issued".to_string()))
            .await
            .unwrap();

        assert!(matches!(outcome, AccessOutcome::Denied(DenyReason::Missing)));
        assert_eq!(blob.get_calls(), 0);
    }

    // S5 — invalid token shape.
    #[tokio::test]
    async fn blank_token_is_denied_invalid_without_touching_index_or_blob() {
        let blob = Arc::new(TrackingBlobStore::new(Arc::new(MemoryBlobStore::new())));
        let index = Arc::new(TrackingIndex::new(Arc::new(MemoryMetadataIndex::new())));
        let arbiter = arbiter(blob.clone(), index.clone(), Arc::new(FixedClock(0)));

        for candidate in ["", "   "] {
            let outcome = arbiter
                .access(&Token::from_string(candidate.to_string()))
                .await
                .unwrap();
            assert!(matches!(outcome, AccessOutcome::Denied(DenyReason::Invalid)));
        }

        assert_eq!(blob.get_calls(), 0);
        assert_eq!(index.get_calls(), 0);
    }

    // S6 — reject oversized.
    #[tokio::test]
    async fn oversized_upload_is_rejected_before_touching_any_adapter() {
        let blob = Arc::new(TrackingBlobStore::new(Arc::new(MemoryBlobStore::new())));
        let index = Arc::new(TrackingIndex::new(Arc::new(MemoryMetadataIndex::new())));
        let coordinator = UploadCoordinator::new(
            blob.clone(),
            index.clone(),
            Arc::new(RandomTokenGenerator),
            Arc::new(FixedClock(0)),
            accepted(),
            10,
            TTL_MS,
        );

        let err = coordinator
            .upload(UploadInput::new(Bytes::from(vec![0u8; 6 * 1024 * 1024]), "image/jpeg"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::TooLarge);
        assert_eq!(blob.save_calls(), 0);
        assert_eq!(index.put_calls(), 0);
    }

    // S7 — reject unsupported type.
    #[tokio::test]
    async fn unsupported_content_type_is_rejected_before_touching_any_adapter() {
        let blob = Arc::new(TrackingBlobStore::new(Arc::new(MemoryBlobStore::new())));
        let index = Arc::new(TrackingIndex::new(Arc::new(MemoryMetadataIndex::new())));
        let coordinator = UploadCoordinator::new(
            blob.clone(),
            index.clone(),
            Arc::new(RandomTokenGenerator),
            Arc::new(FixedClock(0)),
            accepted(),
            5 * 1024 * 1024,
            TTL_MS,
        );

        let err = coordinator
            .upload(UploadInput::new(Bytes::from_static(b"x"), "application/octet-stream"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedType);
        assert_eq!(blob.save_calls(), 0);
        assert_eq!(index.put_calls(), 0);
    }

    // Policy boundary: now = E, E+1, E+s-1, E+s, E+s+1.
    #[tokio::test]
    async fn policy_boundary_matches_exact_thresholds() {
        const E: i64 = 2_000_000;
        let cases: [(i64, bool); 5] = [
            (E, true),
            (E + 1, true),
            (E + SKEW_MS - 1, true),
            (E + SKEW_MS, true),
            (E + SKEW_MS + 1, false),
        ];

        for (now, expect_allowed) in cases {
            let blob = Arc::new(MemoryBlobStore::new());
            let index = Arc::new(MemoryMetadataIndex::new());
            let token = Token::from_string(format!("boundary-{now}"));
            index
                .put(MetadataRecord::new(
                    token.clone(),
                    blob.save(Bytes::from_static(b"x"), PutMeta::new("image/png"))
                        .await
                        .unwrap(),
                    E,
                    Some("image/png".to_string()),
                ))
                .await
                .unwrap();

            let arbiter = arbiter(blob, index, Arc::new(FixedClock(now)));
            let outcome = arbiter.access(&token).await.unwrap();
            assert_eq!(outcome.is_allowed(), expect_allowed, "now={now}");
        }
    }

    // Ordering on upload: C2.save < C1.mint < C3.put.
    #[tokio::test]
    async fn upload_ordering_is_save_then_mint_then_put() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let blob = Arc::new(OrderTrackingBlobStore::new(
            Arc::new(MemoryBlobStore::new()),
            order.clone(),
        ));
        let index = Arc::new(OrderTrackingIndex::new(
            Arc::new(MemoryMetadataIndex::new()),
            order.clone(),
        ));
        let tokens = Arc::new(OrderTrackingTokenGenerator::new(order.clone()));

        let coordinator = UploadCoordinator::new(
            blob,
            index,
            tokens,
            Arc::new(FixedClock(0)),
            accepted(),
            5 * 1024 * 1024,
            TTL_MS,
        );

        coordinator
            .upload(UploadInput::new(Bytes::from_static(b"x"), "image/png"))
            .await
            .unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["save", "mint", "put"]);
    }

    // Fault isolation: C2.save fails → no mint, no put.
    #[tokio::test]
    async fn blob_save_failure_aborts_before_mint_and_put() {
        let index = Arc::new(TrackingIndex::new(Arc::new(MemoryMetadataIndex::new())));
        let tokens = Arc::new(CountingTokenGenerator::default());
        let coordinator = UploadCoordinator::new(
            Arc::new(AlwaysFailBlobStore),
            index.clone(),
            tokens.clone(),
            Arc::new(FixedClock(0)),
            accepted(),
            5 * 1024 * 1024,
            TTL_MS,
        );

        let err = coordinator
            .upload(UploadInput::new(Bytes::from_static(b"x"), "image/png"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BlobFault);
        assert_eq!(tokens.mint_calls(), 0);
        assert_eq!(index.put_calls(), 0);
    }

    // Immutability: repeated C3.get after a successful put returns the
    // same fields forever.
    #[tokio::test]
    async fn repeated_get_after_put_is_immutable() {
        let clock = Arc::new(FixedClock(5_000_000));
        let (coordinator, _blob, index) = coordinator(clock);
        let receipt = coordinator
            .upload(UploadInput::new(Bytes::from_static(b"x"), "image/jpeg"))
            .await
            .unwrap();

        let first = index.get(&receipt.token).await.unwrap().unwrap();
        let second = index.get(&receipt.token).await.unwrap().unwrap();
        assert_eq!(first, second);
    }

    struct TrackingBlobStore {
        inner: Arc<dyn BlobStore>,
        save_calls: AtomicUsize,
        get_calls: AtomicUsize,
    }

    impl TrackingBlobStore {
        fn new(inner: Arc<dyn BlobStore>) -> Self {
            Self {
                inner,
                save_calls: AtomicUsize::new(0),
                get_calls: AtomicUsize::new(0),
            }
        }

        fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }

        fn save_calls(&self) -> usize {
            self.save_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BlobStore for TrackingBlobStore {
        async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference> {
            self.save_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.save(bytes, meta).await
        }

        async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(reference).await
        }

        async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
            self.inner.content_type_of(reference).await
        }
    }

    struct TrackingIndex {
        inner: Arc<dyn MetadataIndex>,
        put_calls: AtomicUsize,
        get_calls: AtomicUsize,
    }

    impl TrackingIndex {
        fn new(inner: Arc<dyn MetadataIndex>) -> Self {
            Self {
                inner,
                put_calls: AtomicUsize::new(0),
                get_calls: AtomicUsize::new(0),
            }
        }

        fn put_calls(&self) -> usize {
            self.put_calls.load(Ordering::SeqCst)
        }

        fn get_calls(&self) -> usize {
            self.get_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MetadataIndex for TrackingIndex {
        async fn put(&self, record: MetadataRecord) -> IndexResult<()> {
            self.put_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.put(record).await
        }

        async fn get(&self, token: &Token) -> IndexResult<Option<MetadataRecord>> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            self.inner.get(token).await
        }
    }

    struct AlwaysFailBlobStore;

    #[async_trait]
    impl BlobStore for AlwaysFailBlobStore {
        async fn save(&self, _bytes: Bytes, _meta: PutMeta) -> BlobResult<BlobReference> {
            Err(BlobError::backend(std::io::Error::other("simulated fault")))
        }

        async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
            Err(BlobError::not_found(reference.as_str()))
        }

        async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
            Err(BlobError::not_found(reference.as_str()))
        }
    }

    #[derive(Default, Clone)]
    struct CountingTokenGenerator {
        calls: Arc<AtomicUsize>,
    }

    impl CountingTokenGenerator {
        fn mint_calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ephem_types::TokenGenerator for CountingTokenGenerator {
        fn mint(&self) -> Result<Token, ephem_types::EntropyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            RandomTokenGenerator.mint()
        }
    }

    struct OrderTrackingBlobStore {
        inner: Arc<dyn BlobStore>,
        order: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl OrderTrackingBlobStore {
        fn new(inner: Arc<dyn BlobStore>, order: Arc<std::sync::Mutex<Vec<&'static str>>>) -> Self {
            Self { inner, order }
        }
    }

    #[async_trait]
    impl BlobStore for OrderTrackingBlobStore {
        async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference> {
            self.order.lock().unwrap().push("save");
            self.inner.save(bytes, meta).await
        }

        async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
            self.inner.get(reference).await
        }

        async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
            self.inner.content_type_of(reference).await
        }
    }

    struct OrderTrackingIndex {
        inner: Arc<dyn MetadataIndex>,
        order: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl OrderTrackingIndex {
        fn new(inner: Arc<dyn MetadataIndex>, order: Arc<std::sync::Mutex<Vec<&'static str>>>) -> Self {
            Self { inner, order }
        }
    }

    #[async_trait]
    impl MetadataIndex for OrderTrackingIndex {
        async fn put(&self, record: MetadataRecord) -> IndexResult<()> {
            self.order.lock().unwrap().push("put");
            self.inner.put(record).await
        }

        async fn get(&self, token: &Token) -> IndexResult<Option<MetadataRecord>> {
            self.inner.get(token).await
        }
    }

    struct OrderTrackingTokenGenerator {
        order: Arc<std::sync::Mutex<Vec<&'static str>>>,
    }

    impl OrderTrackingTokenGenerator {
        fn new(order: Arc<std::sync::Mutex<Vec<&'static str>>>) -> Self {
            Self { order }
        }
    }

    impl ephem_types::TokenGenerator for OrderTrackingTokenGenerator {
        fn mint(&self) -> Result<Token, ephem_types::EntropyError> {
            self.order.lock().unwrap().push("mint");
            RandomTokenGenerator.mint()
        }
    }
}
