//! Application Layer

pub mod cancel;
pub mod config;
pub mod place;
pub mod query;
pub mod settle;

pub use cancel::CancelOrderUseCase;
pub use config::MarketConfig;
pub use place::{BuyShareUseCase, ListShareUseCase, SellShareUseCase};
pub use query::{ListOrdersUseCase, MyOrdersUseCase};
pub use settle::{MatchedPair, SettleOrderUseCase};

use kernel::id::UserId;

use crate::domain::entity::share::TradableShare;
use crate::domain::repository::MarketRepository;
use crate::error::{MarketError, MarketResult};

pub(crate) async fn ensure_kyc<R>(repo: &R, user_id: UserId) -> MarketResult<()>
where
    R: MarketRepository + Sync,
{
    if repo.is_kyc_verified(user_id).await? {
        Ok(())
    } else {
        Err(MarketError::KycRequired)
    }
}

pub(crate) async fn load_share<R>(repo: &R, mint_address: &str) -> MarketResult<TradableShare>
where
    R: MarketRepository + Sync,
{
    repo.find_share(mint_address)
        .await?
        .ok_or(MarketError::MintNotFound)
}

/// Orders only trade shares of LIVE listings
pub(crate) fn ensure_tradable(share: &TradableShare) -> MarketResult<()> {
    if share.is_tradable() {
        Ok(())
    } else {
        Err(MarketError::ListingNotLive(share.listing_status))
    }
}

pub(crate) fn check_price(config: &MarketConfig, price: i64) -> MarketResult<i64> {
    if price > config.max_price {
        return Err(MarketError::PriceTooHigh {
            max: config.max_price,
        });
    }
    Ok(price)
}
