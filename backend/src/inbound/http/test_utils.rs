//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;

use crate::domain::ports::{
    LoginService, MockLoginService, MockRelationsQuery, MockUserDirectory, RelationsQuery,
    UserDirectory,
};
use crate::domain::{LinkBuilder, RelationRenderer, Role, UserId, Viewer};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Public root used by handler tests.
pub const TEST_PUBLIC_URL: &str = "http://localhost:8080/api/v2";

/// User id of the account every handler test logs in as.
pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Build a session middleware configured for tests.
///
/// Uses a fresh key per invocation, names the cookie `session` and clears
/// the `Secure` flag for plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// The viewer returned by [`directory_for`].
pub fn test_viewer(role: &str) -> Viewer {
    Viewer::new(
        UserId::new(TEST_USER_ID).expect("fixture user id"),
        Role::new(role).expect("fixture role"),
    )
}

/// A user directory that knows only the test user, with `role`.
pub fn directory_for(role: &'static str) -> MockUserDirectory {
    let mut users = MockUserDirectory::new();
    users
        .expect_find_viewer()
        .returning(move |id| Ok((id.as_ref() == TEST_USER_ID).then(|| test_viewer(role))));
    users
}

/// Build handler state from mocks; unset ports reject every call.
pub fn test_state(
    login: MockLoginService,
    users: MockUserDirectory,
    relations: MockRelationsQuery,
) -> HttpState {
    let renderer =
        RelationRenderer::new(LinkBuilder::parse(TEST_PUBLIC_URL).expect("test public url"));
    let login: Arc<dyn LoginService> = Arc::new(login);
    let users: Arc<dyn UserDirectory> = Arc::new(users);
    let relations: Arc<dyn RelationsQuery> = Arc::new(relations);
    HttpState::new(
        HttpStatePorts {
            login,
            users,
            relations,
        },
        renderer,
    )
}
