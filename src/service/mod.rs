//! Services
//!
//! Entity managers for users and todos, built over the store traits.

pub mod todos;
pub mod users;

pub use todos::TodoService;
pub use users::{CurrentUser, UserService};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::password::PasswordHasher;
use crate::store::{TodoStore, UserStore};
use crate::token::TokenCodec;

use std::sync::Arc;

/// Aggregated services container
pub struct AppServices {
    pub users: UserService,
    pub todos: TodoService,
}

impl AppServices {
    /// Wire both services over one store
    pub fn new<S>(store: Arc<S>, config: &AppConfig) -> Result<Self, AppError>
    where
        S: UserStore + TodoStore + 'static,
    {
        let hasher = PasswordHasher::new(config)?;
        let tokens = TokenCodec::from_config(config);

        Ok(Self {
            users: UserService::new(store.clone(), hasher, tokens, config.min_password_length),
            todos: TodoService::new(store),
        })
    }
}
