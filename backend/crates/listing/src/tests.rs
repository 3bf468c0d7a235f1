//! Unit and HTTP contract tests for the listing crate

#[cfg(test)]
mod error_tests {
    use crate::domain::value_object::listing_status::ListingStatus;
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(ListingError, StatusCode)> = vec![
            (ListingError::ListingNotFound, StatusCode::NOT_FOUND),
            (ListingError::DocumentNotFound, StatusCode::NOT_FOUND),
            (ListingError::NotOwner, StatusCode::FORBIDDEN),
            (ListingError::ListerRequired, StatusCode::FORBIDDEN),
            (ListingError::KycRequired, StatusCode::FORBIDDEN),
            (
                ListingError::IllegalTransition {
                    from: ListingStatus::Closed,
                    to: ListingStatus::Live,
                },
                StatusCode::CONFLICT,
            ),
            (
                ListingError::NotEditable(ListingStatus::Live),
                StatusCode::CONFLICT,
            ),
            (ListingError::SharesLocked, StatusCode::CONFLICT),
            (ListingError::HasMintedShares, StatusCode::CONFLICT),
            (ListingError::NotApproved, StatusCode::CONFLICT),
            (
                ListingError::UnknownCode {
                    field: "status",
                    value: "SOLD".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                ListingError::Chain(chain::ChainError::Transport("timeout".into())),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (error, expected_status) in test_cases {
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }
}

#[cfg(test)]
mod mint_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    use auth::{AuthUser, UserRole};
    use chain::{
        ChainError, ChainResult, MintReceipt, MintRequest, MinterConfig, OfflineShareMinter,
        ShareMinter,
    };
    use jobs::JobHandler;
    use kernel::id::UserId;
    use platform::retry::RetryPolicy;
    use serde_json::json;

    use crate::application::{ListingConfig, MintListingSharesJob, MintSharesUseCase};
    use crate::domain::entity::listing::{Listing, NewListing};
    use crate::domain::repository::{ListingRepository, ShareRepository};
    use crate::domain::value_object::{geo_json::GeoJson, listing_status::ListingStatus};
    use crate::infra::memory::InMemoryListingRepository;

    fn minter_config(config: &ListingConfig) -> MinterConfig {
        MinterConfig {
            program_id: config.program_id,
            metadata_base_url: "https://meta.deedify.test".into(),
            retry: RetryPolicy::default(),
        }
    }

    async fn live_listing(repo: &InMemoryListingRepository, total_shares: i32) -> Listing {
        let mut listing = Listing::new(
            UserId::new(),
            NewListing {
                title: "Cedar Ridge".into(),
                description: None,
                geo_json: GeoJson::new(json!({"type": "Point", "coordinates": [1, 2]})).unwrap(),
                parcel_size: 40.0,
                total_shares,
                price_per_share: 2_500,
            },
        );
        let admin = AuthUser {
            user_id: UserId::new(),
            role: UserRole::Admin,
            email: "admin@deedify.test".into(),
        };
        listing.transition(ListingStatus::Live, &admin).unwrap();
        repo.create(&listing).await.unwrap();
        listing
    }

    /// Fails once `budget` mints have succeeded
    struct FlakyMinter {
        inner: OfflineShareMinter,
        budget: AtomicU32,
    }

    impl ShareMinter for FlakyMinter {
        async fn mint_share(&self, request: &MintRequest) -> ChainResult<MintReceipt> {
            if self.budget.load(Ordering::SeqCst) == 0 {
                return Err(ChainError::Transport("connection reset".into()));
            }
            self.budget.fetch_sub(1, Ordering::SeqCst);
            ShareMinter::mint_share(&self.inner, request).await
        }
    }

    #[tokio::test]
    async fn test_mints_every_share_to_owner() {
        let repo = Arc::new(InMemoryListingRepository::new());
        let config = Arc::new(ListingConfig::development());
        let minter = Arc::new(OfflineShareMinter::new(minter_config(&config)));
        let listing = live_listing(&repo, 5).await;

        let use_case = MintSharesUseCase::new(repo.clone(), minter, config);
        assert_eq!(use_case.execute(listing.id).await.unwrap(), 5);

        let shares = repo.list_shares(listing.id).await.unwrap();
        let indexes: Vec<i32> = shares.iter().map(|s| s.index_number).collect();
        assert_eq!(indexes, vec![0, 1, 2, 3, 4]);
        assert!(shares.iter().all(|s| s.owner_id == Some(listing.owner_id)));

        // 二回目は何もしない
        assert_eq!(use_case.execute(listing.id).await.unwrap(), 0);
        assert_eq!(repo.share_count(listing.id), 5);
    }

    #[tokio::test]
    async fn test_interrupted_run_keeps_progress() {
        let repo = Arc::new(InMemoryListingRepository::new());
        let mut config = ListingConfig::development();
        config.mint_batch_size = 2;
        let config = Arc::new(config);
        let listing = live_listing(&repo, 6).await;

        let flaky = Arc::new(FlakyMinter {
            inner: OfflineShareMinter::new(minter_config(&config)),
            budget: AtomicU32::new(3),
        });
        let use_case = MintSharesUseCase::new(repo.clone(), flaky.clone(), config.clone());
        assert!(use_case.execute(listing.id).await.is_err());
        assert_eq!(repo.minted_indexes(listing.id).await.unwrap(), vec![0, 1, 2]);

        flaky.budget.store(10, Ordering::SeqCst);
        assert_eq!(use_case.execute(listing.id).await.unwrap(), 3);
        assert_eq!(repo.share_count(listing.id), 6);
    }

    #[tokio::test]
    async fn test_job_handler_failure_modes() {
        let repo = Arc::new(InMemoryListingRepository::new());
        let config = Arc::new(ListingConfig::development());
        let minter = Arc::new(OfflineShareMinter::new(minter_config(&config)));
        let job = MintListingSharesJob::new(repo.clone(), minter, config);

        assert_eq!(job.kind(), "mint_listing_shares");

        let bad_payload = job.run(&json!({"listingId": 42})).await.unwrap_err();
        assert!(bad_payload.is_permanent());

        let missing = job
            .run(&json!({"listingId": UserId::new().to_string()}))
            .await
            .unwrap_err();
        assert!(missing.is_permanent());

        let listing = live_listing(&repo, 3).await;
        job.run(&json!({"listingId": listing.id.to_string()}))
            .await
            .unwrap();
        assert_eq!(repo.share_count(listing.id), 3);
    }
}

#[cfg(test)]
mod status_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    use auth::{AuthUser, UserRole};
    use chain::{MinterConfig, OfflineShareMinter};
    use chrono::{DateTime, Utc};
    use jobs::{InMemoryJobQueue, Job, JobError, JobHandler, JobQueue, JobResult};
    use kernel::id::{JobId, UserId};
    use platform::retry::RetryPolicy;
    use serde_json::{Value, json};

    use crate::application::{ChangeStatusUseCase, ListingConfig, MintListingSharesJob};
    use crate::domain::entity::listing::{Listing, NewListing};
    use crate::domain::repository::ListingRepository;
    use crate::domain::value_object::{geo_json::GeoJson, listing_status::ListingStatus};
    use crate::error::ListingError;
    use crate::infra::memory::InMemoryListingRepository;

    /// Delegates to an in-memory queue unless `down` is set
    #[derive(Default)]
    struct SwitchableQueue {
        inner: InMemoryJobQueue,
        down: AtomicBool,
    }

    impl JobQueue for SwitchableQueue {
        async fn enqueue(&self, kind: &str, payload: Value, max_attempts: i32) -> JobResult<JobId> {
            if self.down.load(Ordering::SeqCst) {
                return Err(JobError::Failed("queue unavailable".into()));
            }
            self.inner.enqueue(kind, payload, max_attempts).await
        }

        async fn claim_next(&self) -> JobResult<Option<Job>> {
            self.inner.claim_next().await
        }

        async fn complete(&self, id: JobId) -> JobResult<()> {
            self.inner.complete(id).await
        }

        async fn fail(&self, id: JobId, error: &str, retry_at: Option<DateTime<Utc>>) -> JobResult<()> {
            self.inner.fail(id, error, retry_at).await
        }

        async fn requeue_stuck(&self, older_than: Duration) -> JobResult<u64> {
            self.inner.requeue_stuck(older_than).await
        }

        async fn find(&self, id: JobId) -> JobResult<Option<Job>> {
            self.inner.find(id).await
        }
    }

    fn admin() -> AuthUser {
        AuthUser {
            user_id: UserId::new(),
            role: UserRole::Admin,
            email: "admin@deedify.test".into(),
        }
    }

    async fn pending_listing(repo: &InMemoryListingRepository) -> Listing {
        let listing = Listing::new(
            UserId::new(),
            NewListing {
                title: "Juniper Flats".into(),
                description: None,
                geo_json: GeoJson::new(json!({"type": "Point", "coordinates": [3, 4]})).unwrap(),
                parcel_size: 12.0,
                total_shares: 4,
                price_per_share: 1_000,
            },
        );
        repo.create(&listing).await.unwrap();
        listing
    }

    #[tokio::test]
    async fn test_failed_enqueue_keeps_listing_approvable() {
        let repo = Arc::new(InMemoryListingRepository::new());
        let queue = Arc::new(SwitchableQueue::default());
        let use_case = ChangeStatusUseCase::new(
            repo.clone(),
            queue.clone(),
            Arc::new(ListingConfig::development()),
        );
        let listing = pending_listing(&repo).await;
        let admin = admin();

        queue.down.store(true, Ordering::SeqCst);
        assert!(matches!(
            use_case.execute(&admin, listing.id, ListingStatus::Live).await,
            Err(ListingError::Job(_))
        ));
        let stored = repo.find_by_id(listing.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ListingStatus::Pending);

        queue.down.store(false, Ordering::SeqCst);
        let live = use_case
            .execute(&admin, listing.id, ListingStatus::Live)
            .await
            .unwrap();
        assert_eq!(live.status, ListingStatus::Live);
        assert_eq!(queue.inner.jobs_of_kind("mint_listing_shares").len(), 1);
    }

    #[tokio::test]
    async fn test_mint_job_waits_for_approval() {
        let repo = Arc::new(InMemoryListingRepository::new());
        let config = Arc::new(ListingConfig::development());
        let minter = Arc::new(OfflineShareMinter::new(MinterConfig {
            program_id: config.program_id,
            metadata_base_url: "https://meta.deedify.test".into(),
            retry: RetryPolicy::default(),
        }));
        let job = MintListingSharesJob::new(repo.clone(), minter, config);
        let listing = pending_listing(&repo).await;

        let err = job
            .run(&json!({"listingId": listing.id.to_string()}))
            .await
            .unwrap_err();
        assert!(!err.is_permanent());
        assert_eq!(repo.share_count(listing.id), 0);
    }
}

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use jobs::InMemoryJobQueue;
    use kernel::id::UserId;
    use platform::jwt::{DEFAULT_TOKEN_TTL, TokenCodec};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::{ListingConfig, MINT_LISTING_SHARES};
    use crate::infra::memory::InMemoryListingRepository;
    use crate::presentation::router::listing_router_generic;

    struct Harness {
        app: Router,
        queue: Arc<InMemoryJobQueue>,
        tokens: TokenCodec,
        /// KYC VERIFIED lister
        lister: UserId,
    }

    fn harness() -> Harness {
        let repo = InMemoryListingRepository::new();
        let lister = UserId::new();
        repo.verify_kyc(lister);

        let queue = Arc::new(InMemoryJobQueue::new());
        let tokens = TokenCodec::new(b"listing-test-secret", DEFAULT_TOKEN_TTL);
        let app = listing_router_generic(
            repo,
            queue.clone(),
            ListingConfig::development(),
            tokens.clone(),
        );
        Harness {
            app,
            queue,
            tokens,
            lister,
        }
    }

    impl Harness {
        fn token(&self, user_id: UserId, role: &str) -> String {
            self.tokens
                .issue(&user_id.to_string(), role, "someone@deedify.test")
                .unwrap()
        }

        async fn send(
            &self,
            method: &str,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let body = match body {
                Some(json) => {
                    builder = builder.header(header::CONTENT_TYPE, "application/json");
                    Body::from(json.to_string())
                }
                None => Body::empty(),
            };
            let response = self
                .app
                .clone()
                .oneshot(builder.body(body).unwrap())
                .await
                .unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }

        /// PENDING listing owned by the verified lister: (owner token, id)
        async fn pending_listing(&self) -> (String, String) {
            let token = self.token(self.lister, "LISTER");
            let (status, body) = self
                .send("POST", "/listings", Some(&token), Some(listing_body()))
                .await;
            assert_eq!(status, StatusCode::CREATED);
            (token, body["id"].as_str().unwrap().to_string())
        }
    }

    fn listing_body() -> Value {
        json!({
            "title": "Willow Creek Farm",
            "description": "Forty acres of bottomland",
            "geoJson": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]},
            "parcelSize": 40.5,
            "totalShares": 100,
            "pricePerShare": 12_500
        })
    }

    #[tokio::test]
    async fn test_create_requires_verified_lister() {
        let h = harness();

        let investor = h.token(UserId::new(), "INVESTOR");
        let (status, _) = h
            .send("POST", "/listings", Some(&investor), Some(listing_body()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let unverified = h.token(UserId::new(), "LISTER");
        let (status, body) = h
            .send("POST", "/listings", Some(&unverified), Some(listing_body()))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["action"].is_string());

        let (status, _) = h.send("POST", "/listings", None, Some(listing_body())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_returns_pending_with_chain_address() {
        let h = harness();

        let (status, body) = h
            .send(
                "POST",
                "/listings",
                Some(&h.token(h.lister, "LISTER")),
                Some(listing_body()),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["ownerId"], h.lister.to_string());
        let address = body["chainAddress"].as_str().unwrap();
        assert!((32..=44).contains(&address.len()));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_fields() {
        let h = harness();
        let token = h.token(h.lister, "LISTER");

        let (status, body) = h
            .send(
                "POST",
                "/listings",
                Some(&token),
                Some(json!({
                    "title": "ab",
                    "geoJson": {"type": "Polygon", "coordinates": []},
                    "parcelSize": 1.0,
                    "totalShares": 0,
                    "pricePerShare": 100
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = body["details"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert_eq!(fields, vec!["title", "totalShares"]);

        let mut bad_geo = listing_body();
        bad_geo["geoJson"] = json!({"coordinates": []});
        let (status, body) = h
            .send("POST", "/listings", Some(&token), Some(bad_geo))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "geoJson");
    }

    #[tokio::test]
    async fn test_approval_enqueues_minting_once() {
        let h = harness();
        let (owner_token, id) = h.pending_listing().await;
        let admin = h.token(UserId::new(), "ADMIN");

        // 所有者は承認できない
        let (status, _) = h
            .send(
                "POST",
                &format!("/listings/{id}/status"),
                Some(&owner_token),
                Some(json!({"status": "LIVE"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        for (to, expected) in [("LIVE", "LIVE"), ("PAUSED", "PAUSED"), ("LIVE", "LIVE")] {
            let (status, body) = h
                .send(
                    "POST",
                    &format!("/listings/{id}/status"),
                    Some(&admin),
                    Some(json!({"status": to})),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], expected);
        }

        let jobs = h.queue.jobs_of_kind(MINT_LISTING_SHARES);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].payload["listingId"], id);
    }

    #[tokio::test]
    async fn test_illegal_transition_conflicts() {
        let h = harness();
        let (_, id) = h.pending_listing().await;
        let admin = h.token(UserId::new(), "ADMIN");

        let (status, _) = h
            .send(
                "POST",
                &format!("/listings/{id}/status"),
                Some(&admin),
                Some(json!({"status": "PAUSED"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = h
            .send(
                "POST",
                &format!("/listings/{id}/status"),
                Some(&admin),
                Some(json!({"status": "ARCHIVED"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_visibility_of_pending_listing() {
        let h = harness();
        let (owner_token, id) = h.pending_listing().await;
        let stranger = h.token(UserId::new(), "INVESTOR");

        let (status, _) = h
            .send("GET", &format!("/listings/{id}"), Some(&stranger), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = h
            .send("GET", &format!("/listings/{id}"), Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = h.send("GET", "/listings/public", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["items"].as_array().unwrap().is_empty());

        let (_, body) = h.send("GET", "/listings", Some(&owner_token), None).await;
        assert_eq!(body["items"].as_array().unwrap().len(), 1);

        let (_, body) = h.send("GET", "/listings", Some(&stranger), None).await;
        assert!(body["items"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_owner_edits_and_deletes_pending_listing() {
        let h = harness();
        let (owner_token, id) = h.pending_listing().await;

        let (status, body) = h
            .send(
                "PATCH",
                &format!("/listings/{id}"),
                Some(&owner_token),
                Some(json!({"title": "Willow Creek North", "totalShares": 50})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Willow Creek North");
        assert_eq!(body["totalShares"], 50);

        let other = h.token(UserId::new(), "LISTER");
        let (status, _) = h
            .send("DELETE", &format!("/listings/{id}"), Some(&other), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = h
            .send("DELETE", &format!("/listings/{id}"), Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = h
            .send("GET", &format!("/listings/{id}"), Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_documents_lifecycle() {
        let h = harness();
        let (owner_token, id) = h.pending_listing().await;

        let (status, body) = h
            .send(
                "POST",
                &format!("/listings/{id}/documents"),
                Some(&owner_token),
                Some(json!({"kind": "DEED", "storagePath": "deeds/willow-creek.pdf"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["kind"], "DEED");
        let document_id = body["id"].as_str().unwrap().to_string();

        let (_, list) = h
            .send("GET", &format!("/listings/{id}/documents"), Some(&owner_token), None)
            .await;
        assert_eq!(list.as_array().unwrap().len(), 1);

        let stranger = h.token(UserId::new(), "INVESTOR");
        let (status, _) = h
            .send("DELETE", &format!("/documents/{document_id}"), Some(&stranger), None)
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = h
            .send("DELETE", &format!("/documents/{document_id}"), Some(&owner_token), None)
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
