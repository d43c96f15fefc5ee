//! Repository for the `forumUsers` collection and the `currentUser` session.

use forum_core::error::CoreError;
use forum_core::roles::Role;
use forum_core::types::display_now;
use forum_core::validation::require_non_blank;
use serde_json::Map;

use crate::collection::{read_all, read_value, write_value, Collection};
use crate::error::DbResult;
use crate::kv::KeyValueStore;
use crate::models::user::{RegisterUser, User};
use crate::{CURRENT_USER_KEY, USERS_KEY};

const ENTITY: &str = "user";

pub const FOUNDER_USERNAME: &str = "admin";
const FOUNDER_PASSWORD: &str = "admin123";
const FOUNDER_NICKNAME: &str = "Основатель";

pub const MSG_PASSWORD_MISMATCH: &str = "Пароли не совпадают!";
pub const MSG_USERNAME_TAKEN: &str = "Пользователь с таким логином уже существует!";
pub const MSG_BAD_CREDENTIALS: &str = "Неверный логин или пароль!";
const MSG_BLANK_USERNAME: &str = "Логин не может быть пустым";
const MSG_BLANK_PASSWORD: &str = "Пароль не может быть пустым";
const MSG_BLANK_NICKNAME: &str = "Никнейм не может быть пустым";

/// Provides account and session operations.
pub struct UserRepo;

impl UserRepo {
    /// Ensure the founder account exists. Returns `true` if it was created.
    pub fn initialize<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<bool> {
        let mut users = Collection::<_, User>::load(store, USERS_KEY)?;
        if users
            .items()
            .iter()
            .any(|u| u.username == FOUNDER_USERNAME)
        {
            return Ok(false);
        }

        users.items_mut().push(User {
            username: FOUNDER_USERNAME.to_string(),
            password: FOUNDER_PASSWORD.to_string(),
            nickname: FOUNDER_NICKNAME.to_string(),
            role: Role::Founder,
            registered_at: display_now(),
            extra: Map::new(),
        });
        users.commit()?;
        tracing::info!(username = FOUNDER_USERNAME, "Founder account created");
        Ok(true)
    }

    /// List all users in registration order.
    pub fn list<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<Vec<User>> {
        Ok(read_all::<_, User>(store, USERS_KEY)?)
    }

    /// Find a user by username.
    pub fn find_by_username<S: KeyValueStore + ?Sized>(
        store: &S,
        username: &str,
    ) -> DbResult<Option<User>> {
        Ok(Self::list(store)?.into_iter().find(|u| u.username == username))
    }

    /// Register a new `player` account.
    pub fn register<S: KeyValueStore + ?Sized>(store: &S, input: &RegisterUser) -> DbResult<User> {
        if input.password != input.password_confirm {
            return Err(CoreError::Validation(MSG_PASSWORD_MISMATCH.to_string()).into());
        }
        require_non_blank(&input.username, MSG_BLANK_USERNAME)?;
        require_non_blank(&input.password, MSG_BLANK_PASSWORD)?;
        require_non_blank(&input.nickname, MSG_BLANK_NICKNAME)?;

        let mut users = Collection::<_, User>::load(store, USERS_KEY)?;
        if users.items().iter().any(|u| u.username == input.username) {
            return Err(CoreError::Conflict(MSG_USERNAME_TAKEN.to_string()).into());
        }

        let user = User {
            username: input.username.clone(),
            password: input.password.clone(),
            nickname: input.nickname.clone(),
            role: Role::Player,
            registered_at: display_now(),
            extra: Map::new(),
        };
        users.items_mut().push(user.clone());
        users.commit()?;

        tracing::info!(username = %user.username, "User registered");
        Ok(user)
    }

    /// Check credentials (plaintext) and record the user as the session.
    pub fn login<S: KeyValueStore + ?Sized>(
        store: &S,
        username: &str,
        password: &str,
    ) -> DbResult<User> {
        let user = Self::list(store)?
            .into_iter()
            .find(|u| u.username == username && u.password == password)
            .ok_or_else(|| CoreError::Unauthorized(MSG_BAD_CREDENTIALS.to_string()))?;

        write_value(store, CURRENT_USER_KEY, &user)?;
        tracing::info!(username = %user.username, role = %user.role, "User logged in");
        Ok(user)
    }

    /// The logged-in user, if any.
    pub fn current_user<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<Option<User>> {
        Ok(read_value::<_, User>(store, CURRENT_USER_KEY)?)
    }

    /// Clear the session.
    pub fn logout<S: KeyValueStore + ?Sized>(store: &S) -> DbResult<()> {
        store.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    /// Change a user's role. If that user is the one logged in, the session
    /// copy is refreshed too.
    pub fn change_role<S: KeyValueStore + ?Sized>(
        store: &S,
        username: &str,
        role: Role,
    ) -> DbResult<User> {
        let mut users = Collection::<_, User>::load(store, USERS_KEY)?;
        let user = users
            .items_mut()
            .iter_mut()
            .find(|u| u.username == username)
            .ok_or_else(|| CoreError::not_found_key(ENTITY, username))?;
        user.role = role;
        let updated = user.clone();
        users.commit()?;

        if let Some(mut current) = Self::current_user(store)? {
            if current.username == username {
                current.role = role;
                write_value(store, CURRENT_USER_KEY, &current)?;
            }
        }

        tracing::info!(username, %role, "User role changed");
        Ok(updated)
    }
}
