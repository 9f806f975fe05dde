//! In-process users endpoint and shared world for the users BDD suite.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` stops the server
//! even if a test panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use actix_web::dev::ServerHandle;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use frontend::domain::{Error, User};
use rstest::fixture;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use url::Url;

/// Scripted reply served by the users endpoint double.
#[derive(Clone)]
pub(crate) struct ScriptedResponse {
    pub(crate) status: u16,
    pub(crate) body: String,
}

impl Default for ScriptedResponse {
    fn default() -> Self {
        Self {
            status: 200,
            body: "[]".to_owned(),
        }
    }
}

/// Shared state between the endpoint double and the test steps.
#[derive(Clone, Default)]
pub(crate) struct UsersEndpoint {
    response: Arc<Mutex<ScriptedResponse>>,
    accept_headers: Arc<Mutex<Vec<Option<String>>>>,
}

impl UsersEndpoint {
    pub(crate) fn respond_with(&self, status: u16, body: impl Into<String>) {
        *self.response.lock().expect("response lock") = ScriptedResponse {
            status,
            body: body.into(),
        };
    }

    pub(crate) fn hits(&self) -> usize {
        self.accept_headers.lock().expect("accept lock").len()
    }

    pub(crate) fn accept_headers(&self) -> Vec<Option<String>> {
        self.accept_headers.lock().expect("accept lock").clone()
    }

    fn record(&self, request: &HttpRequest) -> ScriptedResponse {
        let accept = request
            .headers()
            .get(header::ACCEPT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        self.accept_headers
            .lock()
            .expect("accept lock")
            .push(accept);
        self.response.lock().expect("response lock").clone()
    }
}

async fn list_users(request: HttpRequest, endpoint: web::Data<UsersEndpoint>) -> HttpResponse {
    let scripted = endpoint.record(&request);
    let status = StatusCode::from_u16(scripted.status).expect("scripted status is valid");
    HttpResponse::build(status)
        .content_type("application/json")
        .body(scripted.body)
}

pub(crate) struct UsersWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) server: ServerHandle,
    pub(crate) endpoint: UsersEndpoint,
    pub(crate) users_url: Url,
    pub(crate) results: Vec<Result<Vec<User>, Error>>,
    pub(crate) rendered: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<UsersWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we hold the
    // borrow while calling `block_on`. The future must not touch the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

/// Run `operation` against the world's runtime, handing it the users URL.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(Url) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let users_url = ctx.users_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(users_url))
}

/// URL on a loopback port nothing listens on.
pub(crate) fn unreachable_users_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway listener address");
    drop(listener);
    Url::parse(&format!("http://{addr}/api/v1/users")).expect("unreachable url")
}

async fn spawn_users_server(endpoint: UsersEndpoint) -> Result<(Url, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let data = web::Data::new(endpoint);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/api/v1/users", web::get().to(list_users))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    let users_url =
        Url::parse(&format!("http://{addr}/api/v1/users")).map_err(|err| err.to_string())?;
    Ok((users_url, handle))
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

#[fixture]
pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let endpoint = UsersEndpoint::default();

    let (users_url, server) = local
        .block_on(&runtime, spawn_users_server(endpoint.clone()))
        .expect("server should start");

    let world = Rc::new(RefCell::new(UsersWorld {
        runtime,
        local,
        server,
        endpoint,
        users_url,
        results: Vec::new(),
        rendered: None,
    }));

    WorldFixture { world }
}
