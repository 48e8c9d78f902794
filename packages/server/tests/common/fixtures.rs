//! Test fixtures for creating accounts, cases and tokens.

use anyhow::Result;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use rescue_core::common::{GeoPoint, NgoProfileId, Role, UserId};
use rescue_core::domains::accounts::{NgoProfile, User};
use rescue_core::domains::auth::Claims;
use rescue_core::domains::cases::models::{CaseKind, CaseSeverity, NewCase};
use rescue_core::kernel::MemoryCaseStore;
use sqlx::PgPool;

pub const TEST_JWT_SECRET: &str = "test_secret_key";
pub const TEST_JWT_ISSUER: &str = "test_issuer";

/// Central Bengaluru; test cases are placed relative to it.
pub const ORIGIN: GeoPoint = GeoPoint {
    latitude: 12.9716,
    longitude: 77.5946,
};

fn user(role: Role, name: &str) -> User {
    let id = UserId::new();
    User {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", id),
        role,
        created_at: Utc::now(),
    }
}

fn profile_for(user: &User) -> NgoProfile {
    NgoProfile {
        id: NgoProfileId::new(),
        user_id: user.id,
        name: user.name.clone(),
        phone: "+91-80-0000-0000".to_string(),
        verified: true,
        created_at: Utc::now(),
    }
}

/// An injured-animal report `north_km` north of [`ORIGIN`].
pub fn injured_case(title: &str, severity: CaseSeverity, north_km: f64) -> NewCase {
    NewCase::builder()
        .title(title)
        .description("Reported by a passer-by")
        .kind(CaseKind::Injured)
        .severity(severity)
        .location(GeoPoint {
            latitude: ORIGIN.latitude + north_km / 111.19,
            longitude: ORIGIN.longitude,
        })
        .tags(vec!["dog".to_string(), "injured".to_string()])
        .build()
}

pub fn adoption_listing(title: &str) -> NewCase {
    NewCase::builder()
        .title(title)
        .description("Vaccinated and friendly")
        .kind(CaseKind::Adoption)
        .location(ORIGIN)
        .animal_type("cat")
        .animal_count(2)
        .build()
}

// =============================================================================
// In-memory store
// =============================================================================

pub async fn seed_citizen(store: &MemoryCaseStore, name: &str) -> User {
    let user = user(Role::Citizen, name);
    store.insert_account(user.clone(), None).await;
    user
}

pub async fn seed_ngo(store: &MemoryCaseStore, name: &str) -> (User, NgoProfile) {
    let user = user(Role::Ngo, name);
    let profile = profile_for(&user);
    store
        .insert_account(user.clone(), Some(profile.clone()))
        .await;
    (user, profile)
}

// =============================================================================
// Postgres
// =============================================================================

pub async fn create_citizen(pool: &PgPool, name: &str) -> Result<User> {
    insert_user(pool, user(Role::Citizen, name)).await
}

pub async fn create_ngo(pool: &PgPool, name: &str) -> Result<(User, NgoProfile)> {
    let user = insert_user(pool, user(Role::Ngo, name)).await?;
    let profile = profile_for(&user);

    let profile = sqlx::query_as::<_, NgoProfile>(
        "INSERT INTO ngo_profiles (id, user_id, name, phone, verified)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, user_id, name, phone, verified, created_at",
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.name)
    .bind(&profile.phone)
    .bind(profile.verified)
    .fetch_one(pool)
    .await?;

    Ok((user, profile))
}

async fn insert_user(pool: &PgPool, user: User) -> Result<User> {
    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, name, email, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email, role, created_at",
    )
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(user.role)
    .fetch_one(pool)
    .await?;
    Ok(user)
}

// =============================================================================
// Tokens
// =============================================================================

/// A bearer token as the auth service would issue it.
pub fn bearer_for(user: &User) -> String {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        user_id: user.id.into_uuid(),
        role: user.role,
        exp: (now + chrono::Duration::hours(1)).timestamp(),
        iat: now.timestamp(),
        iss: TEST_JWT_ISSUER.to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("test token should encode");
    format!("Bearer {}", token)
}
