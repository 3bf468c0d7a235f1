//! Unit and HTTP contract tests for the market crate

#[cfg(test)]
mod error_tests {
    use crate::domain::OrderStatus;
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use listing::ListingStatus;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(MarketError, StatusCode)> = vec![
            (MarketError::MintNotFound, StatusCode::NOT_FOUND),
            (MarketError::OrderNotFound, StatusCode::NOT_FOUND),
            (MarketError::NoMatchingBid, StatusCode::NOT_FOUND),
            (MarketError::NotShareHolder, StatusCode::FORBIDDEN),
            (MarketError::NotOrderOwner, StatusCode::FORBIDDEN),
            (MarketError::KycRequired, StatusCode::FORBIDDEN),
            (
                MarketError::ListingNotLive(ListingStatus::Paused),
                StatusCode::CONFLICT,
            ),
            (MarketError::AlreadyListed, StatusCode::CONFLICT),
            (MarketError::OwnShare, StatusCode::CONFLICT),
            (
                MarketError::OrderNotOpen(OrderStatus::Filled),
                StatusCode::CONFLICT,
            ),
            (MarketError::SellerChanged, StatusCode::CONFLICT),
            (MarketError::PriceRequired, StatusCode::BAD_REQUEST),
            (
                MarketError::PriceTooHigh { max: 100 },
                StatusCode::BAD_REQUEST,
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
mod settle_tests {
    use std::sync::Arc;

    use auth::{AuthUser, UserRole};
    use kernel::id::{ListingId, UserId};
    use kernel::page::Page;
    use listing::ListingStatus;

    use crate::application::{
        BuyShareUseCase, ListShareUseCase, MarketConfig, SellShareUseCase, SettleOrderUseCase,
    };
    use crate::domain::repository::MarketRepository;
    use crate::domain::{OrderStatus, OrderType};
    use crate::error::MarketError;
    use crate::infra::memory::InMemoryMarketRepository;

    const MINT: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    fn investor(user_id: UserId) -> AuthUser {
        AuthUser {
            user_id,
            role: UserRole::Investor,
            email: "investor@deedify.test".into(),
        }
    }

    struct Fixture {
        repo: Arc<InMemoryMarketRepository>,
        config: Arc<MarketConfig>,
        holder: AuthUser,
        buyer: AuthUser,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(InMemoryMarketRepository::new());
        let holder = investor(UserId::new());
        let buyer = investor(UserId::new());
        repo.add_share(MINT, ListingId::new(), Some(holder.user_id), ListingStatus::Live);
        repo.verify_kyc(holder.user_id);
        repo.verify_kyc(buyer.user_id);
        Fixture {
            repo,
            config: Arc::new(MarketConfig::development()),
            holder,
            buyer,
        }
    }

    #[tokio::test]
    async fn test_settle_moves_share_to_buyer() {
        let f = fixture();
        let list = ListShareUseCase::new(f.repo.clone(), f.config.clone())
            .execute(&f.holder, MINT, 75_00)
            .await
            .unwrap();
        let buy = BuyShareUseCase::new(f.repo.clone(), f.config.clone())
            .execute(&f.buyer, MINT, None)
            .await
            .unwrap();
        assert_eq!(buy.price, 75_00);

        let settle = SettleOrderUseCase::new(f.repo.clone());
        // maker 側の ID でも決済できる
        let pair = settle.settle(list.id, "pi_3Nabc").await.unwrap();
        assert_eq!(pair.taker.id, buy.id);
        assert_eq!(pair.maker.id, list.id);
        assert_eq!(f.repo.share_owner(MINT), Some(f.buyer.user_id));

        for id in [list.id, buy.id] {
            let order = f.repo.find_order(id).await.unwrap().unwrap();
            assert_eq!(order.status, OrderStatus::Filled);
            assert_eq!(order.payment_reference.as_deref(), Some("pi_3Nabc"));
        }

        // 再送は何もしない
        settle.settle(buy.id, "pi_3Nabc").await.unwrap();
        assert_eq!(f.repo.share_owner(MINT), Some(f.buyer.user_id));
    }

    #[tokio::test]
    async fn test_release_reopens_list() {
        let f = fixture();
        let list = ListShareUseCase::new(f.repo.clone(), f.config.clone())
            .execute(&f.holder, MINT, 75_00)
            .await
            .unwrap();
        let buy = BuyShareUseCase::new(f.repo.clone(), f.config.clone())
            .execute(&f.buyer, MINT, None)
            .await
            .unwrap();

        let pair = SettleOrderUseCase::new(f.repo.clone())
            .release(buy.id)
            .await
            .unwrap();
        assert_eq!(pair.taker.status, OrderStatus::Cancelled);
        assert_eq!(pair.maker.status, OrderStatus::Open);

        let list = f.repo.find_order(list.id).await.unwrap().unwrap();
        assert_eq!(list.status, OrderStatus::Open);
        assert_eq!(list.matched_order_id, None);
        assert_eq!(f.repo.share_owner(MINT), Some(f.holder.user_id));
    }

    #[tokio::test]
    async fn test_sell_into_best_bid_and_settle() {
        let f = fixture();
        let low_bidder = investor(UserId::new());
        f.repo.verify_kyc(low_bidder.user_id);

        let buy = BuyShareUseCase::new(f.repo.clone(), f.config.clone());
        let low = buy.execute(&low_bidder, MINT, Some(40_00)).await.unwrap();
        let high = buy.execute(&f.buyer, MINT, Some(55_00)).await.unwrap();
        assert_eq!(low.status, OrderStatus::Open);
        assert_eq!(high.order_type, OrderType::Buy);

        let sell = SellShareUseCase::new(f.repo.clone(), f.config.clone());
        assert!(matches!(
            sell.execute(&f.holder, MINT, Some(60_00)).await,
            Err(MarketError::NoMatchingBid)
        ));

        let order = sell.execute(&f.holder, MINT, Some(50_00)).await.unwrap();
        assert_eq!(order.order_type, OrderType::Sell);
        assert_eq!(order.matched_order_id, Some(high.id));
        assert_eq!(order.buyer_id, Some(f.buyer.user_id));

        let settle = SettleOrderUseCase::new(f.repo.clone());
        settle.settle(order.id, "cs_test_a1").await.unwrap();
        assert_eq!(f.repo.share_owner(MINT), Some(f.buyer.user_id));

        // 低い入札は残る
        let low = f.repo.find_order(low.id).await.unwrap().unwrap();
        assert_eq!(low.status, OrderStatus::Open);
    }

    #[tokio::test]
    async fn test_buy_and_sell_refused_once_listing_closed() {
        const CLOSED_MINT: &str = "7EYnhQoR9YM3N7UoaKRoA44Uy8JeaZV3qyouov87awMs";
        let f = fixture();
        f.repo.add_share(CLOSED_MINT, ListingId::new(), Some(f.holder.user_id), ListingStatus::Closed);

        let buy = BuyShareUseCase::new(f.repo.clone(), f.config.clone());
        assert!(matches!(
            buy.execute(&f.buyer, CLOSED_MINT, Some(50_00)).await,
            Err(MarketError::ListingNotLive(ListingStatus::Closed))
        ));

        let sell = SellShareUseCase::new(f.repo.clone(), f.config.clone());
        assert!(matches!(
            sell.execute(&f.holder, CLOSED_MINT, None).await,
            Err(MarketError::ListingNotLive(ListingStatus::Closed))
        ));
        assert!(f.repo.orders_of(f.buyer.user_id, Page::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_settle_unmatched_or_unknown_order() {
        let f = fixture();
        let list = ListShareUseCase::new(f.repo.clone(), f.config.clone())
            .execute(&f.holder, MINT, 10_00)
            .await
            .unwrap();

        let settle = SettleOrderUseCase::new(f.repo.clone());
        assert!(matches!(
            settle.settle(list.id, "pi_x").await,
            Err(MarketError::NotMatched)
        ));
        assert!(matches!(
            settle.release(kernel::id::OrderId::new()).await,
            Err(MarketError::OrderNotFound)
        ));
    }
}

#[cfg(test)]
mod http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::id::{ListingId, UserId};
    use listing::ListingStatus;
    use platform::jwt::{DEFAULT_TOKEN_TTL, TokenCodec};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::MarketConfig;
    use crate::infra::memory::InMemoryMarketRepository;
    use crate::presentation::router::market_router_generic;

    const MINT: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
    const PAUSED_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
    const UNKNOWN_MINT: &str = "So11111111111111111111111111111111111111112";

    struct Harness {
        app: Router,
        tokens: TokenCodec,
        holder: UserId,
        buyer: UserId,
        /// Not KYC verified
        newcomer: UserId,
    }

    fn harness() -> Harness {
        let repo = InMemoryMarketRepository::new();
        let holder = UserId::new();
        let buyer = UserId::new();
        repo.add_share(MINT, ListingId::new(), Some(holder), ListingStatus::Live);
        repo.add_share(PAUSED_MINT, ListingId::new(), Some(holder), ListingStatus::Paused);
        repo.verify_kyc(holder);
        repo.verify_kyc(buyer);

        let tokens = TokenCodec::new(b"market-test-secret", DEFAULT_TOKEN_TTL);
        let app = market_router_generic(repo, MarketConfig::development(), tokens.clone());
        Harness {
            app,
            tokens,
            holder,
            buyer,
            newcomer: UserId::new(),
        }
    }

    impl Harness {
        fn token(&self, user_id: UserId) -> String {
            self.tokens
                .issue(&user_id.to_string(), "INVESTOR", "trader@deedify.test")
                .unwrap()
        }

        async fn send(&self, method: &str, uri: &str, user: UserId, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token(user)));
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
    }

    #[tokio::test]
    async fn test_unknown_mint_is_not_found() {
        let h = harness();
        for path in ["/marketplace/buy", "/marketplace/sell"] {
            let (status, body) = h
                .send("POST", path, h.buyer, Some(json!({"shareMint": UNKNOWN_MINT, "price": 100})))
                .await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
            assert_eq!(body["statusCode"], 404);
        }
    }

    #[tokio::test]
    async fn test_requires_bearer_token() {
        let h = harness();
        let response = h
            .app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/marketplace/orders")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_then_buy_matches() {
        let h = harness();

        let (status, list) = h
            .send("POST", "/marketplace/list", h.holder, Some(json!({"shareMint": MINT, "price": 12_500})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(list["type"], "LIST");
        assert_eq!(list["status"], "OPEN");

        let (status, _) = h
            .send("POST", "/marketplace/list", h.holder, Some(json!({"shareMint": MINT, "price": 13_000})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = h
            .send("POST", "/marketplace/buy", h.holder, Some(json!({"shareMint": MINT})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, buy) = h
            .send("POST", "/marketplace/buy", h.buyer, Some(json!({"shareMint": MINT})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(buy["type"], "BUY");
        assert_eq!(buy["status"], "PENDING");
        assert_eq!(buy["price"], 12_500);
        assert_eq!(buy["matchedOrderId"], list["id"]);

        let (_, pending) = h
            .send("GET", "/marketplace/orders?status=PENDING", h.buyer, None)
            .await;
        assert_eq!(pending["items"].as_array().unwrap().len(), 2);

        let (_, mine) = h.send("GET", "/marketplace/orders/mine", h.buyer, None).await;
        let mine = mine["items"].as_array().unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0]["id"], buy["id"]);
    }

    #[tokio::test]
    async fn test_list_guards() {
        let h = harness();

        let (status, _) = h
            .send("POST", "/marketplace/list", h.buyer, Some(json!({"shareMint": MINT, "price": 100})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = h
            .send("POST", "/marketplace/list", h.holder, Some(json!({"shareMint": PAUSED_MINT, "price": 100})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = h
            .send("POST", "/marketplace/list", h.holder, Some(json!({"shareMint": "short", "price": 0})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_buy_without_list_needs_price_and_kyc() {
        let h = harness();

        let (status, body) = h
            .send("POST", "/marketplace/buy", h.buyer, Some(json!({"shareMint": MINT})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["field"], "price");

        let (status, body) = h
            .send("POST", "/marketplace/buy", h.newcomer, Some(json!({"shareMint": MINT, "price": 9_000})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(body["action"].is_string());

        let (status, bid) = h
            .send("POST", "/marketplace/buy", h.buyer, Some(json!({"shareMint": MINT, "price": 9_000})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(bid["status"], "OPEN");
        assert_eq!(bid["sellerId"], h.holder.to_string());
    }

    #[tokio::test]
    async fn test_sell_without_bid_is_not_found() {
        let h = harness();
        let (status, _) = h
            .send("POST", "/marketplace/sell", h.holder, Some(json!({"shareMint": MINT})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cancel_rules() {
        let h = harness();
        let (_, list) = h
            .send("POST", "/marketplace/list", h.holder, Some(json!({"shareMint": MINT, "price": 5_000})))
            .await;

        let (status, _) = h
            .send("POST", "/marketplace/cancel", h.buyer, Some(json!({"orderId": list["id"]})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, cancelled) = h
            .send("POST", "/marketplace/cancel", h.holder, Some(json!({"orderId": list["id"]})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["status"], "CANCELLED");

        let (status, _) = h
            .send("POST", "/marketplace/cancel", h.holder, Some(json!({"orderId": list["id"]})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = h
            .send(
                "POST",
                "/marketplace/cancel",
                h.holder,
                Some(json!({"orderId": UserId::new().to_string()})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
