//! In-memory adapters backing the HTTP integration tests.
//!
//! The repositories honour the same contracts as the Diesel adapters:
//! decoration rules for single reads, newest-first orderings, idempotent
//! partnership inserts, and atomic-under-lock toggles.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use actix_web::web;
use backend::domain::business::{
    Business, BusinessId, BusinessUpdate, FeedFilters, InteractionState, NewBusiness,
};
use backend::domain::ports::{
    BusinessRepository, BusinessRepositoryError, CredentialRepository, CredentialRepositoryError,
    LocationRepository, LocationRepositoryError, TokenIssuer, UserRepository, UserRepositoryError,
};
use backend::domain::user::{EmailAddress, NewUser, User, UserId, UserProfileUpdate};
use backend::domain::{
    AuthService, BusinessService, Category, Country, Municipality, State, UserService,
};
use backend::inbound::http::HttpState;
use backend::outbound::storage::MemoryObjectStorage;
use backend::outbound::{Argon2CredentialHasher, JwtTokenIssuer};
use pagination::{PageRequest, Paginated};

/// Secret shared by the test issuer and the handlers under test.
pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";

fn timestamp(seq: u64) -> DateTime<Utc> {
    let base = Utc
        .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
        .single()
        .expect("valid base timestamp");
    base + chrono::Duration::seconds(i64::try_from(seq).unwrap_or(i64::MAX))
}

#[derive(Default)]
struct BusinessState {
    businesses: Vec<Business>,
    likes: HashSet<(Uuid, Uuid)>,
    saves: Vec<(Uuid, Uuid, u64)>,
    partnerships: Vec<(Uuid, Uuid, u64)>,
}

/// In-memory `BusinessRepository` mirroring the SQL adapter's contract.
#[derive(Default)]
pub struct InMemoryBusinessRepository {
    state: Mutex<BusinessState>,
    seq: AtomicU64,
}

impl InMemoryBusinessRepository {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of stored partnership rows for assertions.
    pub fn partnership_rows(&self) -> usize {
        self.state.lock().expect("state lock").partnerships.len()
    }

    /// Number of stored like rows for assertions.
    pub fn like_rows(&self) -> usize {
        self.state.lock().expect("state lock").likes.len()
    }

    /// The stored (undecorated) listing, for row-level assertions.
    pub fn stored(&self, id: &BusinessId) -> Option<Business> {
        self.state
            .lock()
            .expect("state lock")
            .businesses
            .iter()
            .find(|b| &b.id == id)
            .cloned()
    }

    fn decorate(state: &BusinessState, business: &Business, requester: Option<&Uuid>) -> Business {
        let id = *business.id.as_uuid();
        let like_count = state.likes.iter().filter(|(_, b)| *b == id).count() as u64;
        let saved_count = state.saves.iter().filter(|(_, b, _)| *b == id).count() as u64;
        let mut decorated = business.clone();
        decorated.interaction = InteractionState {
            is_liked: requester.map(|user| state.likes.contains(&(*user, id))),
            is_saved: requester
                .map(|user| state.saves.iter().any(|(u, b, _)| u == user && *b == id)),
            like_count: Some(like_count),
            saved_count: Some(saved_count),
        };
        decorated
    }

    fn require(
        state: &BusinessState,
        id: &BusinessId,
    ) -> Result<Business, BusinessRepositoryError> {
        state
            .businesses
            .iter()
            .find(|b| &b.id == id)
            .cloned()
            .ok_or_else(|| BusinessRepositoryError::not_found(id.as_ref()))
    }
}

#[async_trait]
impl BusinessRepository for InMemoryBusinessRepository {
    async fn create(&self, data: &NewBusiness) -> Result<Business, BusinessRepositoryError> {
        let seq = self.next_seq();
        let created_at = timestamp(seq);
        let business = Business {
            id: BusinessId::random(),
            owner_id: data.owner_id.clone(),
            name: data.name.clone(),
            description: data.description.clone(),
            investment: data.investment,
            profit_percentage: data.profit_percentage,
            category_id: data.category_id,
            municipality_id: data.municipality_id.clone(),
            business_model: data.business_model.clone(),
            monthly_income: data.monthly_income,
            image_url: data.image_url.clone(),
            interaction: InteractionState::default(),
            created_at,
            updated_at: created_at,
        };

        let mut state = self.state.lock().expect("state lock");
        state.businesses.push(business.clone());
        Ok(Self::decorate(
            &state,
            &business,
            Some(data.owner_id.as_uuid()),
        ))
    }

    async fn find_by_id(
        &self,
        id: &BusinessId,
        requester: Option<&UserId>,
    ) -> Result<Business, BusinessRepositoryError> {
        let state = self.state.lock().expect("state lock");
        let business = Self::require(&state, id)?;
        Ok(Self::decorate(
            &state,
            &business,
            requester.map(UserId::as_uuid),
        ))
    }

    async fn update(
        &self,
        id: &BusinessId,
        owner: &UserId,
        update: &BusinessUpdate,
    ) -> Result<Business, BusinessRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        let current = Self::require(&state, id)?;
        if current.owner_id != *owner {
            return Err(BusinessRepositoryError::not_owner(
                owner.as_ref(),
                id.as_ref(),
            ));
        }
        if update.is_empty() {
            return Ok(Self::decorate(&state, &current, Some(owner.as_uuid())));
        }

        let updated_at = timestamp(self.seq.fetch_add(1, Ordering::Relaxed));
        let Some(stored) = state.businesses.iter_mut().find(|b| &b.id == id) else {
            return Err(BusinessRepositoryError::stale(id.as_ref()));
        };
        if let Some(name) = &update.name {
            stored.name = name.clone();
        }
        if let Some(description) = &update.description {
            stored.description = description.clone();
        }
        if let Some(investment) = update.investment {
            stored.investment = investment;
        }
        if let Some(profit_percentage) = update.profit_percentage {
            stored.profit_percentage = profit_percentage;
        }
        if let Some(category_id) = update.category_id {
            stored.category_id = category_id;
        }
        if let Some(municipality_id) = &update.municipality_id {
            stored.municipality_id = municipality_id.clone();
        }
        if let Some(business_model) = &update.business_model {
            stored.business_model = business_model.clone();
        }
        if let Some(monthly_income) = update.monthly_income {
            stored.monthly_income = monthly_income;
        }
        if let Some(image_url) = &update.image_url {
            stored.image_url = Some(image_url.clone());
        }
        stored.updated_at = updated_at;
        let refreshed = stored.clone();
        Ok(Self::decorate(&state, &refreshed, Some(owner.as_uuid())))
    }

    async fn delete(
        &self,
        id: &BusinessId,
        owner: &UserId,
    ) -> Result<bool, BusinessRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        let before = state.businesses.len();
        state
            .businesses
            .retain(|b| !(&b.id == id && &b.owner_id == owner));
        let removed = state.businesses.len() < before;
        if removed {
            let uuid = *id.as_uuid();
            state.likes.retain(|(_, b)| *b != uuid);
            state.saves.retain(|(_, b, _)| *b != uuid);
            state.partnerships.retain(|(_, b, _)| *b != uuid);
        }
        Ok(removed)
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
    ) -> Result<Vec<Business>, BusinessRepositoryError> {
        let state = self.state.lock().expect("state lock");
        let mut listings: Vec<Business> = state
            .businesses
            .iter()
            .filter(|b| &b.owner_id == owner)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listings)
    }

    async fn list_partnered(
        &self,
        user: &UserId,
    ) -> Result<Vec<Business>, BusinessRepositoryError> {
        let state = self.state.lock().expect("state lock");
        let uuid = *user.as_uuid();
        let mut rows: Vec<(Uuid, u64)> = state
            .partnerships
            .iter()
            .filter(|(u, _, _)| *u == uuid)
            .map(|(_, b, seq)| (*b, *seq))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(rows
            .into_iter()
            .filter_map(|(b, _)| {
                state
                    .businesses
                    .iter()
                    .find(|business| business.id.as_uuid() == &b)
                    .cloned()
            })
            .collect())
    }

    async fn list_saved(&self, user: &UserId) -> Result<Vec<Business>, BusinessRepositoryError> {
        let state = self.state.lock().expect("state lock");
        let uuid = *user.as_uuid();
        let mut rows: Vec<(Uuid, u64)> = state
            .saves
            .iter()
            .filter(|(u, _, _)| *u == uuid)
            .map(|(_, b, seq)| (*b, *seq))
            .collect();
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(rows
            .into_iter()
            .filter_map(|(b, _)| {
                state
                    .businesses
                    .iter()
                    .find(|business| business.id.as_uuid() == &b)
                    .cloned()
            })
            .map(|mut business| {
                business.interaction = InteractionState::saved();
                business
            })
            .collect())
    }

    async fn initiate_partnership(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError> {
        let seq = self.next_seq();
        let mut state = self.state.lock().expect("state lock");
        Self::require(&state, business)?;
        let user_uuid = *user.as_uuid();
        let business_uuid = *business.as_uuid();
        let exists = state
            .partnerships
            .iter()
            .any(|(u, b, _)| *u == user_uuid && *b == business_uuid);
        if !exists {
            state.partnerships.push((user_uuid, business_uuid, seq));
        }
        Ok(true)
    }

    async fn toggle_save(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError> {
        let seq = self.next_seq();
        let mut state = self.state.lock().expect("state lock");
        Self::require(&state, business)?;
        let user_uuid = *user.as_uuid();
        let business_uuid = *business.as_uuid();
        let before = state.saves.len();
        state
            .saves
            .retain(|(u, b, _)| !(*u == user_uuid && *b == business_uuid));
        if state.saves.len() < before {
            return Ok(false);
        }
        state.saves.push((user_uuid, business_uuid, seq));
        Ok(true)
    }

    async fn toggle_like(
        &self,
        user: &UserId,
        business: &BusinessId,
    ) -> Result<bool, BusinessRepositoryError> {
        let mut state = self.state.lock().expect("state lock");
        Self::require(&state, business)?;
        let key = (*user.as_uuid(), *business.as_uuid());
        if state.likes.remove(&key) {
            return Ok(false);
        }
        state.likes.insert(key);
        Ok(true)
    }

    async fn feed(
        &self,
        filters: &FeedFilters,
        page: &PageRequest,
        requester: Option<&UserId>,
    ) -> Result<Paginated<Business>, BusinessRepositoryError> {
        let state = self.state.lock().expect("state lock");
        let mut matching: Vec<&Business> = state
            .businesses
            .iter()
            .filter(|b| {
                filters
                    .category_id
                    .is_none_or(|category| b.category_id == category)
            })
            .filter(|b| {
                filters
                    .max_investment
                    .is_none_or(|max| b.investment <= max)
            })
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        if total == 0 {
            return Ok(Paginated::empty(page));
        }

        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items: Vec<Business> = matching
            .into_iter()
            .skip(offset)
            .take(page.limit() as usize)
            .map(|b| Self::decorate(&state, b, requester.map(UserId::as_uuid)))
            .collect();

        Ok(Paginated::new(items, page, total))
    }
}

/// In-memory user directory implementing both the profile and the
/// credential ports, the way the `users` table backs both in SQL.
#[derive(Default)]
pub struct InMemoryDirectory {
    rows: Mutex<Vec<(User, String)>>,
    seq: AtomicU64,
}

impl InMemoryDirectory {
    /// Insert a user row directly, for fixtures.
    pub fn insert_user(&self, user: User, password_hash: impl Into<String>) {
        self.rows
            .lock()
            .expect("rows lock")
            .push((user, password_hash.into()));
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .find(|(user, _)| user.email == *email)
            .map(|(user, _)| user.clone()))
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .filter(|(user, _)| ids.contains(&user.id))
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: &UserProfileUpdate,
    ) -> Result<User, UserRepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let Some((user, _)) = rows.iter_mut().find(|(user, _)| &user.id == id) else {
            return Err(UserRepositoryError::not_found(id.as_ref()));
        };
        if let Some(first_name) = &update.first_name {
            user.first_name = Some(first_name.clone());
        }
        if let Some(last_name) = &update.last_name {
            user.last_name = Some(last_name.clone());
        }
        if let Some(url) = &update.profile_image_url {
            user.profile_image_url = Some(url.clone());
        }
        if let Some(biography) = &update.biography {
            user.biography = Some(biography.clone());
        }
        if let Some(linkedin) = &update.linkedin_profile {
            user.linkedin_profile = Some(linkedin.clone());
        }
        if let Some(handle) = &update.instagram_handle {
            user.instagram_handle = Some(handle.clone());
        }
        Ok(user.clone())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryDirectory {
    async fn password_hash_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<String>, CredentialRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("rows lock")
            .iter()
            .find(|(user, _)| user.email == *email)
            .map(|(_, hash)| hash.clone()))
    }

    async fn create_user(
        &self,
        profile: &NewUser,
        password_hash: &str,
    ) -> Result<User, CredentialRepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        if rows.iter().any(|(user, _)| user.email == profile.email) {
            return Err(CredentialRepositoryError::duplicate_email(
                profile.email.as_str(),
            ));
        }
        let created_at = timestamp(self.seq.fetch_add(1, Ordering::Relaxed));
        let user = User {
            id: UserId::random(),
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            birth_date: Some(profile.birth_date),
            country_id: Some(profile.country_id.clone()),
            state_id: Some(profile.state_id.clone()),
            municipality_id: Some(profile.municipality_id.clone()),
            profile_image_url: None,
            biography: None,
            linkedin_profile: None,
            instagram_handle: None,
            created_at,
            updated_at: created_at,
        };
        rows.push((user.clone(), password_hash.to_owned()));
        Ok(user)
    }
}

/// Static reference data fixture.
#[derive(Default)]
pub struct FixtureLocationRepository;

#[async_trait]
impl LocationRepository for FixtureLocationRepository {
    async fn countries(&self) -> Result<Vec<Country>, LocationRepositoryError> {
        Ok(vec![Country {
            id: "MX".to_owned(),
            name: "Mexico".to_owned(),
        }])
    }

    async fn states_by_country(
        &self,
        country_id: &str,
    ) -> Result<Vec<State>, LocationRepositoryError> {
        Ok(vec![State {
            id: "14".to_owned(),
            name: "Jalisco".to_owned(),
            country_id: country_id.to_owned(),
        }])
    }

    async fn municipalities_by_state(
        &self,
        state_id: &str,
    ) -> Result<Vec<Municipality>, LocationRepositoryError> {
        Ok(vec![Municipality {
            id: "014".to_owned(),
            name: "Guadalajara".to_owned(),
            state_id: state_id.to_owned(),
        }])
    }

    async fn categories(&self) -> Result<Vec<Category>, LocationRepositoryError> {
        Ok(vec![Category {
            id: 3,
            name: "Food & Drink".to_owned(),
            icon_key: Some("food".to_owned()),
        }])
    }
}

/// Handles to the in-memory adapters behind a test `HttpState`.
pub struct TestHarness {
    /// The dependency bundle to mount on a test app.
    pub state: web::Data<HttpState>,
    /// Business rows and relations.
    pub businesses: Arc<InMemoryBusinessRepository>,
    /// User and credential rows.
    pub directory: Arc<InMemoryDirectory>,
    /// Uploaded objects.
    pub storage: Arc<MemoryObjectStorage>,
    /// Issues tokens for fixture users without the login flow.
    pub tokens: Arc<JwtTokenIssuer>,
}

/// Build an `HttpState` over fresh in-memory adapters.
pub fn harness() -> TestHarness {
    let businesses = Arc::new(InMemoryBusinessRepository::default());
    let directory = Arc::new(InMemoryDirectory::default());
    let storage = Arc::new(MemoryObjectStorage::new());
    let tokens = Arc::new(JwtTokenIssuer::new(
        TEST_JWT_SECRET,
        Duration::from_secs(3600),
    ));

    let state = HttpState::new(
        AuthService::new(
            directory.clone(),
            directory.clone(),
            Arc::new(Argon2CredentialHasher),
            tokens.clone(),
        ),
        BusinessService::new(businesses.clone(), directory.clone(), storage.clone()),
        UserService::new(directory.clone(), storage.clone()),
        Arc::new(FixtureLocationRepository),
        tokens.clone(),
    );

    TestHarness {
        state: web::Data::new(state),
        businesses,
        directory,
        storage,
        tokens,
    }
}

/// A registered fixture user plus a valid bearer token.
pub fn fixture_user(harness: &TestHarness, email: &str) -> (UserId, String) {
    let id = UserId::random();
    let user = User {
        id: id.clone(),
        email: EmailAddress::new(email).expect("valid email"),
        first_name: Some("Ada".to_owned()),
        last_name: Some("Lovelace".to_owned()),
        birth_date: None,
        country_id: Some("MX".to_owned()),
        state_id: Some("14".to_owned()),
        municipality_id: Some("014".to_owned()),
        profile_image_url: None,
        biography: None,
        linkedin_profile: None,
        instagram_handle: None,
        created_at: timestamp(0),
        updated_at: timestamp(0),
    };
    harness.directory.insert_user(user, "unused-hash");
    let tokens = harness.tokens.issue(&id).expect("token issued");
    (id, tokens.access_token)
}
