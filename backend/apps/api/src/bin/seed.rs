//! Development seed
//!
//! Creates an admin, a lister, an investor (all KYC verified) and one LIVE
//! listing owned by the lister. Users that already exist are reused.
//! Runs sequentially; every step logs what it did.

use std::sync::Arc;

use auth::application::{KycTarget, RegisterInput, RegisterUseCase, UpdateKycUseCase};
use auth::domain::value_object::user_password::{NewPassword, UserPassword};
use auth::{
    AuthConfig, AuthUser, Email, KycStatus, PgUserRepository, User, UserRepository, UserRole,
};
use jobs::PgJobQueue;
use listing::application::{ChangeStatusUseCase, CreateListingUseCase};
use listing::domain::GeoJson;
use listing::domain::entity::listing::NewListing;
use listing::{ListingConfig, ListingStatus, PgListingRepository};
use platform::config::{env_or, optional_env, require_env};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PASSWORD: &str = "Deedify-Seed-2024";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,auth=info,listing=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&require_env("DATABASE_URL")?)
        .await?;
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    let password = env_or("SEED_PASSWORD", DEFAULT_PASSWORD);
    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let auth_config = Arc::new(AuthConfig::development());

    let admin = ensure_admin(&users, "admin@deedify.local", &password).await?;
    let lister = ensure_user(&users, &auth_config, "lister@deedify.local", &password, UserRole::Lister).await?;
    let investor =
        ensure_user(&users, &auth_config, "investor@deedify.local", &password, UserRole::Investor).await?;

    let listing_config = Arc::new(match optional_env("SOLANA_SHARE_PROGRAM_ID") {
        Some(raw) => ListingConfig::new(raw.trim().parse()?),
        None => ListingConfig::development(),
    });
    let listings = Arc::new(PgListingRepository::new(pool.clone()));
    let queue = Arc::new(PgJobQueue::new(pool.clone()));

    let listing = CreateListingUseCase::new(listings.clone(), listing_config.clone())
        .execute(
            &actor(&lister),
            NewListing {
                title: "Willow Creek Pasture".to_string(),
                description: Some("40 acres of fenced pasture with year-round creek access".to_string()),
                geo_json: GeoJson::new(json!({
                    "type": "Polygon",
                    "coordinates": [[
                        [-97.7431, 30.2672],
                        [-97.7380, 30.2672],
                        [-97.7380, 30.2630],
                        [-97.7431, 30.2630],
                        [-97.7431, 30.2672]
                    ]]
                }))?,
                parcel_size: 40.0,
                total_shares: 100,
                price_per_share: 25_000,
            },
        )
        .await?;

    // 承認で LIVE になり、ミントジョブが積まれる
    let listing = ChangeStatusUseCase::new(listings, queue, listing_config)
        .execute(&actor(&admin), listing.id, ListingStatus::Live)
        .await?;

    tracing::info!(
        admin = %admin.email.as_str(),
        lister = %lister.email.as_str(),
        investor = %investor.email.as_str(),
        listing_id = %listing.id,
        status = %listing.status,
        "Seed completed"
    );
    Ok(())
}

fn actor(user: &User) -> AuthUser {
    AuthUser {
        user_id: user.id,
        role: user.role,
        email: user.email.as_str().to_string(),
    }
}

async fn verify(users: &Arc<PgUserRepository>, user: User) -> anyhow::Result<User> {
    if user.is_kyc_verified() {
        return Ok(user);
    }
    let user = UpdateKycUseCase::new(users.clone())
        .execute(KycTarget::User(user.id), KycStatus::Verified, Some("seed".to_string()))
        .await?;
    Ok(user)
}

/// Registration refuses ADMIN, so the admin row is written directly
async fn ensure_admin(users: &Arc<PgUserRepository>, email: &str, password: &str) -> anyhow::Result<User> {
    let email = Email::new(email)?;
    let user = match users.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let password = UserPassword::from_new(&NewPassword::new(password.to_string())?, None)?;
            let user = User::new(email, password, UserRole::Admin, Some("Deedify Admin".to_string()), None);
            users.create(&user).await?;
            tracing::info!(user_id = %user.id, "Admin created");
            user
        }
    };
    verify(users, user).await
}

async fn ensure_user(
    users: &Arc<PgUserRepository>,
    config: &Arc<AuthConfig>,
    email: &str,
    password: &str,
    role: UserRole,
) -> anyhow::Result<User> {
    let user = match users.find_by_email(&Email::new(email)?).await? {
        Some(user) => user,
        None => {
            let output = RegisterUseCase::new(users.clone(), config.clone())
                .execute(RegisterInput {
                    email: email.to_string(),
                    password: password.to_string(),
                    display_name: None,
                    role: Some(role),
                    wallet_address: None,
                })
                .await?;
            tracing::info!(user_id = %output.user.id, role = %role, "User registered");
            output.user
        }
    };
    verify(users, user).await
}
