use tokio::sync::Mutex;

use lab_core::model::{AuthUser, User, UserId, UserRole};
use storage::{PersistentStore, keys};

use crate::Clock;
use crate::error::AuthError;

/// Single resident-user sign-in for role gating.
///
/// This is not a security boundary: passwords are never checked and the
/// token is an opaque marker.
pub struct AuthService {
    clock: Clock,
    users: Vec<User>,
    store: PersistentStore,
    resident: Mutex<Option<AuthUser>>,
}

impl AuthService {
    /// Restore the resident user (if any) from the store.
    pub async fn load(clock: Clock, users: Vec<User>, store: PersistentStore) -> Self {
        let resident: Option<AuthUser> = store.load(keys::AUTH_USER, None).await;
        Self {
            clock,
            users,
            store,
            resident: Mutex::new(resident),
        }
    }

    pub async fn current_user(&self) -> Option<AuthUser> {
        self.resident.lock().await.clone()
    }

    /// Sign in a known user by email. Any non-empty password is accepted.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmptyEmail` or `AuthError::MissingPassword` for blank
    /// input, and `AuthError::NotFound` when no seed user has that email. The
    /// resident user is untouched on error.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        if email.trim().is_empty() {
            return Err(AuthError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let found = self
            .users
            .iter()
            .find(|user| user.has_email(email))
            .cloned()
            .ok_or(AuthError::NotFound)?;

        let signed_in = AuthUser::sign_in(found, self.clock.now());
        tracing::info!(user_id = %signed_in.user.id, role = %signed_in.role(), "signed in");
        self.replace_resident(Some(signed_in.clone())).await;
        Ok(signed_in)
    }

    /// Create a local account and make it the resident user.
    ///
    /// Only the current resident user's email is checked for a clash; seed
    /// accounts are not consulted.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank name, email, or password, and
    /// `AuthError::Conflict` if the resident user already has this email.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        role: UserRole,
        password: &str,
    ) -> Result<AuthUser, AuthError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyName);
        }
        if email.is_empty() {
            return Err(AuthError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let mut resident = self.resident.lock().await;
        if resident.as_ref().is_some_and(|auth| auth.user.has_email(email)) {
            return Err(AuthError::Conflict);
        }

        let now = self.clock.now();
        let user = User {
            id: UserId::generate_local(),
            name: name.to_owned(),
            email: email.to_owned(),
            role,
            created_at: now,
        };
        let registered = AuthUser::sign_in(user, now);
        tracing::info!(user_id = %registered.user.id, role = %role, "registered");

        *resident = Some(registered.clone());
        self.store.save(keys::AUTH_USER, &*resident).await;
        Ok(registered)
    }

    pub async fn logout(&self) {
        tracing::info!("signed out");
        self.replace_resident(None).await;
    }

    async fn replace_resident(&self, user: Option<AuthUser>) {
        let mut resident = self.resident.lock().await;
        *resident = user;
        self.store.save(keys::AUTH_USER, &*resident).await;
    }
}
