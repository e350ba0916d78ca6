use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};

use crate::core::filters::normalize_tags;
use crate::core::session::SwipeBackend;
use crate::error::AppError;
use crate::models::{
    AgentProfile, Candidate, Gender, Match, MatchmakerRecord, Photo, Swipe, SwipeDirection,
    SwipeFilter, SwipeOutcome, User,
};

/// Maximum photos per user.
const MAX_PHOTOS: i64 = 6;

/// PostgreSQL store for users, swipes, matches, and the matchmaker pipeline.
///
/// All multi-entity writes (swipe + match + matchmaker records) run inside a
/// single transaction serialized per user pair, so concurrent reciprocal
/// swipes cannot double-create a match.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store from a connection string and run migrations.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a store from settings.
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, AppError> {
        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection.
    pub async fn health_check(&self) -> Result<bool, AppError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    // -----------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------

    /// Create an account and its agent profile in one transaction.
    ///
    /// A duplicate email fails with `Conflict`.
    pub async fn create_user(
        &self,
        email: &str,
        password_digest: &str,
        password_salt: &str,
        name: &str,
        gender: Gender,
        age: i32,
    ) -> Result<User, AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (email, password_digest, password_salt, name, gender, age)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(email)
        .bind(password_digest)
        .bind(password_salt)
        .bind(name)
        .bind(gender)
        .bind(age)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Email already registered".to_string())
            }
            other => AppError::Storage(other),
        })?;

        let user_id: i32 = row.get("id");

        // Agent profile lifecycle is tied to the account lifecycle
        sqlx::query(
            r#"
            INSERT INTO agent_profiles (user_id, name, status)
            VALUES ($1, $2, 'active')
            "#,
        )
        .bind(user_id)
        .bind(format!("{}'s Agent", name))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Registered user {} ({})", user_id, email);
        self.get_user(user_id).await
    }

    /// Fetch a user by id, or fail with `NotFound`.
    pub async fn get_user(&self, user_id: i32) -> Result<User, AppError> {
        let row = sqlx::query(&user_select("u.id = $1"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| user_from_row(&r))
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
    }

    /// Look up a user by email for login. `None` when unknown.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query(&user_select("u.email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| user_from_row(&r)))
    }

    /// Apply a partial profile update; absent fields are left as they are.
    pub async fn update_profile(
        &self,
        user_id: i32,
        location: Option<&str>,
        bio: Option<&str>,
        tags: Option<&str>,
    ) -> Result<User, AppError> {
        // Tags are stored in their normalized comma-separated form
        let normalized_tags = tags.map(|raw| normalize_tags(raw).join(","));

        let result = sqlx::query(
            r#"
            UPDATE users
            SET location = COALESCE($2, location),
                bio      = COALESCE($3, bio),
                tags     = COALESCE($4, tags)
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(location)
        .bind(bio)
        .bind(normalized_tags)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        self.get_user(user_id).await
    }

    // -----------------------------------------------------------------
    // Photos
    // -----------------------------------------------------------------

    pub async fn list_photos(&self, user_id: i32) -> Result<Vec<Photo>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, url, display_order
            FROM user_photos
            WHERE user_id = $1
            ORDER BY display_order, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| Photo {
                id: r.get("id"),
                url: r.get("url"),
                display_order: r.get("display_order"),
            })
            .collect())
    }

    /// Attach a photo reference, enforcing the per-user maximum.
    pub async fn add_photo(&self, user_id: i32, url: &str) -> Result<Photo, AppError> {
        let mut tx = self.pool.begin().await?;

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM user_photos WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?
            .get("n");

        if count >= MAX_PHOTOS {
            return Err(AppError::Validation(format!(
                "Cannot exceed {} photos total (you already have {})",
                MAX_PHOTOS, count
            )));
        }

        let row = sqlx::query(
            r#"
            INSERT INTO user_photos (user_id, url, display_order)
            VALUES ($1, $2, $3)
            RETURNING id, url, display_order
            "#,
        )
        .bind(user_id)
        .bind(url)
        .bind(count as i32)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Photo {
            id: row.get("id"),
            url: row.get("url"),
            display_order: row.get("display_order"),
        })
    }

    /// Remove a photo owned by `user_id`. Fails with `NotFound` for photos
    /// that do not exist or belong to someone else.
    pub async fn delete_photo(&self, user_id: i32, photo_id: i32) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM user_photos WHERE id = $1 AND user_id = $2")
            .bind(photo_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Photo not found".to_string()));
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------

    /// All candidate ids the user has already swiped on, either direction.
    pub async fn swiped_ids(&self, actor_id: i32) -> Result<HashSet<i32>, AppError> {
        let rows = sqlx::query("SELECT candidate_id FROM swipes WHERE actor_id = $1")
            .bind(actor_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(|r| r.get("candidate_id")).collect())
    }

    /// Fetch the discovery pool for a user with the cheap constraints pushed
    /// into SQL (self/swiped exclusion, gender, age bounds). Tag matching
    /// runs in the resolver, which re-applies the full predicate set.
    pub async fn search_pool(
        &self,
        actor_id: i32,
        filter: &SwipeFilter,
    ) -> Result<Vec<User>, AppError> {
        let sql = user_select(
            r#"
            u.id <> $1
            AND u.id NOT IN (SELECT candidate_id FROM swipes WHERE actor_id = $1)
            AND ($2::gender IS NULL OR u.gender = $2)
            AND ($3::integer IS NULL OR u.age >= $3)
            AND ($4::integer IS NULL OR u.age <= $4)
            "#,
        );

        let rows = sqlx::query(&sql)
            .bind(actor_id)
            .bind(filter.gender)
            .bind(filter.min_age)
            .bind(filter.max_age)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            "Discovery pool for user {}: {} rows before resolution",
            actor_id,
            rows.len()
        );

        Ok(rows.iter().map(user_from_row).collect())
    }

    // -----------------------------------------------------------------
    // Swipe recording
    // -----------------------------------------------------------------

    /// Record a swipe decision exactly once per (actor, candidate) pair and
    /// detect a mutual like.
    ///
    /// The insert, the reciprocal lookup, and the match/matchmaker creation
    /// run in one transaction holding an advisory lock on the unordered
    /// pair, so two users swiping right on each other at the same instant
    /// produce exactly one match and one matchmaker record per side. The
    /// unique constraints on swipes, matches, and matchmaker_records back
    /// this up at the storage level; losing a creation race is success.
    pub async fn record_swipe(
        &self,
        actor_id: i32,
        candidate_id: i32,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, AppError> {
        if actor_id == candidate_id {
            return Err(AppError::NotFound(
                "Cannot swipe on yourself".to_string(),
            ));
        }

        let (lo, hi) = (actor_id.min(candidate_id), actor_id.max(candidate_id));

        let mut tx = self.pool.begin().await?;

        // Serialize both sides of the pair for the rest of this transaction
        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(lo)
            .bind(hi)
            .execute(&mut *tx)
            .await?;

        let exists: bool = sqlx::query("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1) AS e")
            .bind(candidate_id)
            .fetch_one(&mut *tx)
            .await?
            .get("e");

        if !exists {
            return Err(AppError::NotFound(format!(
                "User {} not found",
                candidate_id
            )));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO swipes (actor_id, candidate_id, direction)
            VALUES ($1, $2, $3)
            ON CONFLICT (actor_id, candidate_id) DO NOTHING
            RETURNING id, swiped_at
            "#,
        )
        .bind(actor_id)
        .bind(candidate_id)
        .bind(direction)
        .fetch_optional(&mut *tx)
        .await?;

        // Swipes are immutable facts; a second attempt is an error, not an
        // idempotent success
        let row = inserted.ok_or(AppError::DuplicateSwipe)?;

        let swipe = Swipe {
            id: row.get("id"),
            actor_id,
            candidate_id,
            direction,
            swiped_at: row.get("swiped_at"),
        };

        let mut match_formed = false;

        if direction == SwipeDirection::Right {
            let reciprocal: bool = sqlx::query(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM swipes
                    WHERE actor_id = $1 AND candidate_id = $2 AND direction = 'right'
                ) AS e
                "#,
            )
            .bind(candidate_id)
            .bind(actor_id)
            .fetch_one(&mut *tx)
            .await?
            .get("e");

            if reciprocal {
                sqlx::query(
                    r#"
                    INSERT INTO matches (user_lo, user_hi)
                    VALUES ($1, $2)
                    ON CONFLICT (user_lo, user_hi) DO NOTHING
                    "#,
                )
                .bind(lo)
                .bind(hi)
                .execute(&mut *tx)
                .await?;

                // Each side gets its own pipeline entry once the match exists
                sqlx::query(
                    r#"
                    INSERT INTO matchmaker_records (owner_user_id, target_user_id, status)
                    VALUES ($1, $2, 'pending'), ($2, $1, 'pending')
                    ON CONFLICT (owner_user_id, target_user_id) DO NOTHING
                    "#,
                )
                .bind(actor_id)
                .bind(candidate_id)
                .execute(&mut *tx)
                .await?;

                match_formed = true;
            }
        }

        tx.commit().await?;

        tracing::debug!(
            "Recorded swipe {} -> {} ({:?}), match_formed={}",
            actor_id,
            candidate_id,
            direction,
            match_formed
        );

        Ok(SwipeOutcome {
            swipe,
            match_formed,
        })
    }

    /// The user's swipe history joined with candidate summaries, most
    /// recent first.
    pub async fn swipe_history(
        &self,
        actor_id: i32,
    ) -> Result<Vec<(Swipe, Candidate)>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT s.id AS swipe_id, s.actor_id, s.candidate_id, s.direction, s.swiped_at,
                   u.id, u.name, u.gender, u.age, u.location, u.bio, u.tags,
                   (SELECT p.url FROM user_photos p
                    WHERE p.user_id = u.id
                    ORDER BY p.display_order, p.id LIMIT 1) AS photo_url
            FROM swipes s
            JOIN users u ON u.id = s.candidate_id
            WHERE s.actor_id = $1
            ORDER BY s.swiped_at DESC, s.id DESC
            "#,
        )
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| {
                let swipe = Swipe {
                    id: r.get("swipe_id"),
                    actor_id: r.get("actor_id"),
                    candidate_id: r.get("candidate_id"),
                    direction: r.get("direction"),
                    swiped_at: r.get("swiped_at"),
                };
                (swipe, candidate_from_row(r))
            })
            .collect())
    }

    /// The user's matches joined with the other side's summary, most recent
    /// first.
    pub async fn matches_for(
        &self,
        user_id: i32,
    ) -> Result<Vec<(Match, Candidate)>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT m.id AS match_id, m.user_lo, m.user_hi, m.matched_at,
                   u.id, u.name, u.gender, u.age, u.location, u.bio, u.tags,
                   (SELECT p.url FROM user_photos p
                    WHERE p.user_id = u.id
                    ORDER BY p.display_order, p.id LIMIT 1) AS photo_url
            FROM matches m
            JOIN users u
              ON u.id = CASE WHEN m.user_lo = $1 THEN m.user_hi ELSE m.user_lo END
            WHERE m.user_lo = $1 OR m.user_hi = $1
            ORDER BY m.matched_at DESC, m.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| {
                let m = Match {
                    id: r.get("match_id"),
                    user_lo: r.get("user_lo"),
                    user_hi: r.get("user_hi"),
                    matched_at: r.get("matched_at"),
                };
                (m, candidate_from_row(r))
            })
            .collect())
    }

    // -----------------------------------------------------------------
    // Matchmaker / agent pipeline (read path)
    // -----------------------------------------------------------------

    /// Matchmaker records owned by the user, most recent first, joined with
    /// the target's display fields. Statuses are returned verbatim; this
    /// core never transitions them.
    pub async fn matchmaker_records_for(
        &self,
        owner_user_id: i32,
    ) -> Result<Vec<(MatchmakerRecord, Candidate)>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT r.id AS record_id, r.owner_user_id, r.target_user_id, r.status,
                   r.contact_notes, r.created_at AS record_created_at,
                   u.id, u.name, u.gender, u.age, u.location, u.bio, u.tags,
                   (SELECT p.url FROM user_photos p
                    WHERE p.user_id = u.id
                    ORDER BY p.display_order, p.id LIMIT 1) AS photo_url
            FROM matchmaker_records r
            JOIN users u ON u.id = r.target_user_id
            WHERE r.owner_user_id = $1
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .bind(owner_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|r| {
                let record = MatchmakerRecord {
                    id: r.get("record_id"),
                    owner_user_id: r.get("owner_user_id"),
                    target_user_id: r.get("target_user_id"),
                    status: r.get("status"),
                    contact_notes: r.get("contact_notes"),
                    created_at: r.get("record_created_at"),
                };
                (record, candidate_from_row(r))
            })
            .collect())
    }

    /// The user's agent profile, or `NotFound` if the account predates the
    /// agent rollout.
    pub async fn agent_profile(&self, user_id: i32) -> Result<AgentProfile, AppError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, name, status, notes, created_at
            FROM agent_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| AgentProfile {
            id: r.get("id"),
            user_id: r.get("user_id"),
            name: r.get("name"),
            status: r.get("status"),
            notes: r.get("notes"),
            created_at: r.get("created_at"),
        })
        .ok_or_else(|| AppError::NotFound("Agent profile not found for this user".to_string()))
    }
}

#[async_trait]
impl SwipeBackend for PgStore {
    async fn resolve(
        &self,
        requester_id: i32,
        filter: &SwipeFilter,
    ) -> Result<Vec<Candidate>, AppError> {
        let pool = self.search_pool(requester_id, filter).await?;
        let swiped = self.swiped_ids(requester_id).await?;
        Ok(crate::core::resolver::resolve(
            requester_id,
            pool,
            &swiped,
            filter,
        ))
    }

    async fn record(
        &self,
        actor_id: i32,
        candidate_id: i32,
        direction: SwipeDirection,
    ) -> Result<SwipeOutcome, AppError> {
        self.record_swipe(actor_id, candidate_id, direction).await
    }
}

/// Shared SELECT for loading users with their first photo.
fn user_select(where_clause: &str) -> String {
    format!(
        r#"
        SELECT u.id, u.email, u.password_digest, u.password_salt, u.name,
               u.gender, u.age, u.location, u.bio, u.tags, u.created_at,
               (SELECT p.url FROM user_photos p
                WHERE p.user_id = u.id
                ORDER BY p.display_order, p.id LIMIT 1) AS photo_url
        FROM users u
        WHERE {}
        ORDER BY u.id
        "#,
        where_clause
    )
}

fn user_from_row(row: &PgRow) -> User {
    let tags: Option<String> = row.get("tags");
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_digest: row.get("password_digest"),
        password_salt: row.get("password_salt"),
        name: row.get("name"),
        gender: row.get("gender"),
        age: row.get("age"),
        location: row.get("location"),
        bio: row.get("bio"),
        tags: tags.as_deref().map(normalize_tags).unwrap_or_default(),
        photo_url: row.get("photo_url"),
        created_at: row.get("created_at"),
    }
}

fn candidate_from_row(row: &PgRow) -> Candidate {
    let tags: Option<String> = row.get("tags");
    Candidate {
        id: row.get("id"),
        name: row.get("name"),
        gender: row.get("gender"),
        age: row.get("age"),
        location: row.get("location"),
        bio: row.get("bio"),
        tags: tags.as_deref().map(normalize_tags).unwrap_or_default(),
        photo_url: row.get("photo_url"),
    }
}
