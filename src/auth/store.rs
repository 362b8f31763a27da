use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{AuthAction, AuthOperation, AuthReducer, AuthState};
use crate::api::{ApiError, AuthApi};
use crate::model::{ChangePasswordRequest, LoginRequest, ProfileUpdate, RegisterRequest, Session};
use crate::store::{Store, Subscription};

const FALLBACK: &str = "Something went wrong";

/// Session and account state.
#[derive(Clone)]
pub struct AuthStore {
    store: Store<AuthReducer>,
    api: Arc<dyn AuthApi>,
}

impl AuthStore {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self {
            store: Store::new(AuthReducer, AuthState::default()),
            api,
        }
    }

    pub fn state(&self) -> AuthState {
        self.store.get()
    }

    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&AuthState) + Send + Sync + 'static,
    {
        self.store.subscribe(callback)
    }

    /// Create an account. Fields are checked locally before sending.
    pub async fn register(&self, request: RegisterRequest) {
        self.begin(AuthOperation::Register);
        if let Err(message) = request.validate() {
            self.fail(AuthOperation::Register, &ApiError::invalid(message));
            return;
        }
        match self.api.register(&request).await {
            Ok(_) => {
                info!(email = %request.email, "registered");
                self.store.dispatch(AuthAction::Registered);
            }
            Err(error) => self.fail(AuthOperation::Register, &error),
        }
    }

    pub async fn login(&self, request: LoginRequest) {
        self.begin(AuthOperation::Login);
        match self.api.login(&request).await {
            Ok(session) => {
                info!(email = %request.email, "logged in");
                self.store.dispatch(AuthAction::SessionLoaded(session));
            }
            Err(error) => self.fail(AuthOperation::Login, &error),
        }
    }

    /// End the session. The local session is dropped even if the server
    /// rejects the request.
    pub async fn logout(&self) {
        self.begin(AuthOperation::Logout);
        match self.api.logout().await {
            Ok(()) => {
                info!("logged out");
                self.store.dispatch(AuthAction::LoggedOut);
            }
            Err(error) => self.fail(AuthOperation::Logout, &error),
        }
    }

    pub async fn forgot_password(&self, email: &str) {
        self.begin(AuthOperation::ForgotPassword);
        if email.trim().is_empty() {
            self.fail(
                AuthOperation::ForgotPassword,
                &ApiError::invalid("Email is required"),
            );
            return;
        }
        let result = self.api.forgot_password(email).await;
        self.settle_message(AuthOperation::ForgotPassword, result);
    }

    pub async fn reset_password(&self, token: &str, password: &str) {
        self.begin(AuthOperation::ResetPassword);
        let result = self.api.reset_password(token, password).await;
        self.settle_message(AuthOperation::ResetPassword, result);
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) {
        self.begin(AuthOperation::ChangePassword);
        let result = self.api.change_password(&request).await;
        self.settle_message(AuthOperation::ChangePassword, result);
    }

    pub async fn load_profile(&self) {
        self.begin(AuthOperation::Profile);
        match self.api.profile().await {
            Ok(profile) => self.store.dispatch(AuthAction::ProfileLoaded(profile)),
            Err(error) => self.fail(AuthOperation::Profile, &error),
        }
    }

    pub async fn update_profile(&self, update: ProfileUpdate) {
        self.begin(AuthOperation::UpdateProfile);
        match self.api.update_profile(&update).await {
            Ok(profile) => self.store.dispatch(AuthAction::ProfileLoaded(profile)),
            Err(error) => self.fail(AuthOperation::UpdateProfile, &error),
        }
    }

    /// Restore the session from the cookie jar.
    ///
    /// A failure means nobody is logged in; it clears the session without
    /// recording an error.
    pub async fn current_user(&self) {
        self.begin(AuthOperation::CurrentUser);
        match self.api.current_user().await {
            Ok(user) => self
                .store
                .dispatch(AuthAction::SessionLoaded(Session::for_user(user))),
            Err(error) => {
                debug!(%error, "no current user");
                self.store.dispatch(AuthAction::Rejected {
                    operation: AuthOperation::CurrentUser,
                    message: None,
                });
            }
        }
    }

    pub fn clear_messages(&self) {
        self.store.dispatch(AuthAction::ClearMessages);
    }

    fn begin(&self, operation: AuthOperation) {
        self.store.dispatch(AuthAction::Pending(operation));
    }

    fn settle_message(&self, operation: AuthOperation, result: Result<String, ApiError>) {
        match result {
            Ok(message) => self.store.dispatch(AuthAction::MessageReceived(message)),
            Err(error) => self.fail(operation, &error),
        }
    }

    fn fail(&self, operation: AuthOperation, error: &ApiError) {
        warn!(?operation, %error, "auth request failed");
        self.store.dispatch(AuthAction::Rejected {
            operation,
            message: Some(error.user_message(FALLBACK)),
        });
    }
}
