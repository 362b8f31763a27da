use crate::model::{Profile, Session};
use crate::store::Reducer;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// Logged-in session, if any.
    pub session: Option<Session>,
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
    /// Confirmation text from the password endpoints.
    pub message: Option<String>,
    /// Set once registration succeeds.
    pub registered: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Which auth request an action settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Register,
    Login,
    Logout,
    ForgotPassword,
    ResetPassword,
    ChangePassword,
    Profile,
    UpdateProfile,
    CurrentUser,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    Pending(AuthOperation),
    Registered,
    SessionLoaded(Session),
    LoggedOut,
    MessageReceived(String),
    ProfileLoaded(Profile),
    /// `message` is `None` when the failure should not be shown.
    Rejected {
        operation: AuthOperation,
        message: Option<String>,
    },
    ClearMessages,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;

    fn reduce(&self, state: &mut AuthState, action: AuthAction) {
        match action {
            AuthAction::Pending(_) => {
                state.loading = true;
                state.error = None;
            }
            AuthAction::Registered => {
                state.loading = false;
                state.session = None;
                state.registered = true;
            }
            AuthAction::SessionLoaded(session) => {
                state.loading = false;
                state.session = Some(session);
            }
            AuthAction::LoggedOut => {
                state.loading = false;
                state.session = None;
                state.profile = None;
            }
            AuthAction::MessageReceived(message) => {
                state.loading = false;
                state.message = Some(message);
            }
            AuthAction::ProfileLoaded(profile) => {
                state.loading = false;
                state.profile = Some(profile);
            }
            AuthAction::Rejected { operation, message } => {
                state.loading = false;
                state.error = message;
                match operation {
                    AuthOperation::Register
                    | AuthOperation::Login
                    | AuthOperation::CurrentUser => state.session = None,
                    AuthOperation::Logout => {
                        state.session = None;
                        state.profile = None;
                    }
                    AuthOperation::ForgotPassword
                    | AuthOperation::ResetPassword
                    | AuthOperation::ChangePassword => state.message = None,
                    AuthOperation::Profile | AuthOperation::UpdateProfile => state.profile = None,
                }
            }
            AuthAction::ClearMessages => {
                state.error = None;
                state.message = None;
            }
        }
    }
}
