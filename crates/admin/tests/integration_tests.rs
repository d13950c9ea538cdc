//! Integration tests for the admin crate
//!
//! These tests drive the console end to end against a scripted backend:
//! operations issue jobs, jobs run through the session client, and
//! completions land back in the console.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use admin::api::{HttpRequest, HttpResponse, Method, MemoryTokenStore, SessionClient, SessionEvent, Transport};
use admin::list::ListRow;
use admin::viewer::{DetailPane, EMPTY_LIST_TEXT, MailTab, ViewerState};
use admin::{ConfirmChoice, Console, ImportTarget, Panel, ToastKind, View};
use serde_json::{Value, json};

/// A canned response for requests matching `method` and `path`.
///
/// A route path with a query string must match exactly; one without matches
/// any query string. Queued responses are served in order and the last one
/// repeats.
struct Route {
    method: Method,
    path: String,
    responses: VecDeque<HttpResponse>,
}

#[derive(Default)]
struct Backend {
    routes: Vec<Route>,
    requests: Vec<HttpRequest>,
}

/// Transport over a shared scripted backend
#[derive(Clone, Default)]
struct Scripted {
    backend: Arc<Mutex<Backend>>,
}

impl Scripted {
    fn route(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.route_seq(method, path, vec![(status, body)])
    }

    fn route_seq(&self, method: Method, path: &str, responses: Vec<(u16, Value)>) -> &Self {
        let responses = responses
            .into_iter()
            .map(|(status, body)| HttpResponse {
                status,
                content_type: Some("application/json".to_string()),
                body: body.to_string().into_bytes(),
            })
            .collect();
        self.backend.lock().unwrap().routes.push(Route {
            method,
            path: path.to_string(),
            responses,
        });
        self
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.backend.lock().unwrap().requests.clone()
    }

    fn request_count(&self) -> usize {
        self.backend.lock().unwrap().requests.len()
    }

    fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

fn route_matches(route: &Route, request: &HttpRequest) -> bool {
    if route.method != request.method {
        return false;
    }
    if route.path.contains('?') {
        return route.path == request.path;
    }
    let base = request.path.split('?').next().unwrap_or_default();
    base == route.path
}

impl Transport for Scripted {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, admin::ApiError> {
        let mut backend = self.backend.lock().unwrap();
        backend.requests.push(request.clone());

        let exact = backend
            .routes
            .iter()
            .position(|r| r.path == request.path && r.method == request.method);
        let index = exact.or_else(|| backend.routes.iter().position(|r| route_matches(r, request)));

        let Some(index) = index else {
            return Ok(HttpResponse {
                status: 404,
                content_type: Some("application/json".to_string()),
                body: br#"{"detail":"Not Found"}"#.to_vec(),
            });
        };
        let route = &mut backend.routes[index];
        let response = if route.responses.len() > 1 {
            route.responses.pop_front()
        } else {
            route.responses.front().cloned()
        };
        Ok(response.unwrap())
    }
}

/// Holds responses for one path until the test releases them
struct Gated {
    inner: Scripted,
    path: &'static str,
    sent: Mutex<Sender<()>>,
    release: Mutex<Receiver<()>>,
}

impl Transport for Gated {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, admin::ApiError> {
        let response = self.inner.send(request);
        if request.path.starts_with(self.path) {
            self.sent.lock().unwrap().send(()).unwrap();
            self.release.lock().unwrap().recv().unwrap();
        }
        response
    }
}

fn client(backend: &Scripted, token: Option<&str>) -> SessionClient {
    let store = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    SessionClient::new(Box::new(backend.clone()), Box::new(store))
}

/// A console already in the admin view with a valid stored session
fn signed_in(backend: &Scripted) -> (SessionClient, Console) {
    backend.route(Method::Get, "/api/auth/me", 200, json!({ "username": "admin" }));
    let client = client(backend, Some("tok"));
    let mut console = Console::new(&client);
    let jobs = console.start(&client);
    console.run_to_idle(&client, jobs);
    assert_eq!(console.view(), &View::Admin);
    (client, console)
}

fn accounts(ids: std::ops::Range<i64>) -> Vec<Value> {
    ids.map(|id| json!({ "id": id, "email": format!("user{}@outlook.com", id), "status": "active" }))
        .collect()
}

fn mail(subject: &str, body: &str) -> Value {
    json!({ "subject": subject, "from": "noreply@example.com", "date": "2024-05-01 10:00:00", "body": body })
}

#[test]
fn test_wrong_credentials_stay_on_login() {
    let backend = Scripted::default();
    backend.route(
        Method::Post,
        "/api/auth/login",
        401,
        json!({ "detail": "invalid credentials" }),
    );
    let client = client(&backend, None);
    let events = client.session().subscribe();
    let mut console = Console::new(&client);
    console.start(&client);

    let jobs = console.login("admin", "wrong");
    console.run_to_idle(&client, jobs);

    assert_eq!(
        console.view(),
        &View::Login {
            error: Some("invalid credentials".to_string())
        }
    );
    assert!(!client.has_token());
    assert!(events.try_recv().is_err());
    assert_eq!(console.epoch(), 0);
}

#[test]
fn test_login_opens_accounts_panel() {
    let backend = Scripted::default();
    backend
        .route(
            Method::Post,
            "/api/auth/login",
            200,
            json!({ "token": "fresh", "username": "root" }),
        )
        .route(
            Method::Get,
            "/api/accounts",
            200,
            json!({ "items": accounts(1..4), "total": 3, "page": 1, "page_size": 20 }),
        );
    let client = client(&backend, None);
    let mut console = Console::new(&client);
    console.start(&client);

    let jobs = console.login("root", "secret");
    console.run_to_idle(&client, jobs);

    assert_eq!(console.view(), &View::Admin);
    assert_eq!(console.username(), "root");
    assert_eq!(console.panel(), Panel::Accounts);
    assert_eq!(console.accounts().items().len(), 3);
    assert_eq!(client.session().token().as_deref(), Some("fresh"));

    let accounts_request = backend
        .requests()
        .into_iter()
        .find(|r| r.path.starts_with("/api/accounts"))
        .unwrap();
    assert_eq!(accounts_request.header("Authorization"), Some("Bearer fresh"));
}

#[test]
fn test_expired_session_returns_to_login_once() {
    let backend = Scripted::default();
    backend
        .route(Method::Get, "/api/auth/me", 200, json!({ "username": "admin" }))
        .route(Method::Get, "/api/dashboard", 401, json!({ "detail": "token expired" }))
        .route(Method::Get, "/api/logs", 200, json!({ "items": [] }));
    let client = client(&backend, Some("old"));
    let events = client.session().subscribe();
    let mut console = Console::new(&client);

    let jobs = console.start(&client);
    console.run_to_idle(&client, jobs);

    assert_eq!(console.view(), &View::Login { error: None });
    assert!(!client.has_token());
    assert_eq!(console.epoch(), 1);

    let received: Vec<SessionEvent> = events.try_iter().collect();
    assert_eq!(received, vec![SessionEvent::Expired]);

    // The logs call after expiry went out without a token and its result was dropped
    let logs = backend
        .requests()
        .into_iter()
        .find(|r| r.path.starts_with("/api/logs"))
        .unwrap();
    assert_eq!(logs.header("Authorization"), None);
    assert!(console.dashboard().is_none());
}

#[test]
fn test_late_401_for_old_token_keeps_new_session() {
    let backend = Scripted::default();
    backend
        .route(Method::Get, "/api/dashboard", 401, json!({ "detail": "token expired" }))
        .route(
            Method::Post,
            "/api/auth/login",
            200,
            json!({ "token": "NEW", "username": "admin" }),
        );
    let (sent_tx, sent_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let transport = Gated {
        inner: backend.clone(),
        path: "/api/dashboard",
        sent: Mutex::new(sent_tx),
        release: Mutex::new(release_rx),
    };
    let client = Arc::new(SessionClient::new(
        Box::new(transport),
        Box::new(MemoryTokenStore::with_token("OLD")),
    ));
    let events = client.session().subscribe();

    let in_flight = {
        let client = Arc::clone(&client);
        thread::spawn(move || client.get_json::<Value>("/api/dashboard"))
    };
    sent_rx.recv().unwrap();

    client.logout();
    client.login("admin", "secret").unwrap();
    assert_eq!(client.session().token().as_deref(), Some("NEW"));

    release_tx.send(()).unwrap();
    let result = in_flight.join().unwrap();

    assert!(matches!(result, Err(admin::ApiError::AuthExpired)));
    assert_eq!(client.session().token().as_deref(), Some("NEW"));
    let received: Vec<SessionEvent> = events.try_iter().collect();
    assert_eq!(
        received,
        vec![
            SessionEvent::LoggedOut,
            SessionEvent::LoggedIn {
                username: "admin".to_string()
            },
        ]
    );

    let dashboard = backend
        .requests()
        .into_iter()
        .find(|r| r.path.starts_with("/api/dashboard"))
        .unwrap();
    assert_eq!(dashboard.header("Authorization"), Some("Bearer OLD"));
}

#[test]
fn test_expiry_closes_open_dialog() {
    let backend = Scripted::default();
    backend
        .route(Method::Get, "/api/emails", 200, json!({ "items": [{ "id": 4, "email": "a@outlook.com" }] }))
        .route(Method::Get, "/api/email-api/balance", 401, json!({}));
    let (client, mut console) = signed_in(&backend);

    let jobs = console.show_panel(Panel::Emails);
    console.request_delete(4);
    assert!(console.modal().is_open());

    console.run_to_idle(&client, jobs);

    assert_eq!(console.view(), &View::Login { error: None });
    assert!(!console.modal().is_open());
    assert!(console.resolve_confirm(ConfirmChoice::Confirm).is_empty());
}

#[test]
fn test_accounts_filter_and_pagination() {
    let backend = Scripted::default();
    backend
        .route(
            Method::Get,
            "/api/accounts?page=1&page_size=20&status=active",
            200,
            json!({ "items": accounts(1..21), "total": 25, "page": 1, "page_size": 20 }),
        )
        .route(
            Method::Get,
            "/api/accounts?page=2&page_size=20&status=active",
            200,
            json!({ "items": accounts(21..26), "total": 25, "page": 2, "page_size": 20 }),
        );
    let (client, mut console) = signed_in(&backend);
    console.show_panel(Panel::Accounts);

    let jobs = console.set_account_filter("status", "active");
    console.run_to_idle(&client, jobs);

    let view = console.render_list(Panel::Accounts).unwrap();
    assert_eq!(view.summary, "共 25 条");
    let pager = view.pagination.unwrap();
    assert_eq!((pager.page, pager.total_pages), (1, 2));
    assert!(!pager.prev_enabled);
    assert!(pager.next_enabled);

    let jobs = console.page(1);
    console.run_to_idle(&client, jobs);

    let view = console.render_list(Panel::Accounts).unwrap();
    let pager = view.pagination.unwrap();
    assert_eq!(pager.page, 2);
    assert!(pager.prev_enabled);
    assert!(!pager.next_enabled);
    assert_eq!(view.rows.len(), 5);

    // Already on the last page: nothing to fetch
    assert!(console.page(1).is_empty());
    assert!(
        backend
            .paths()
            .contains(&"/api/accounts?page=2&page_size=20&status=active".to_string())
    );
}

#[test]
fn test_partial_import_reports_accepted_count_and_reloads() {
    let backend = Scripted::default();
    backend
        .route(Method::Post, "/api/phones/batch-import", 200, json!({ "added": 3 }))
        .route(Method::Get, "/api/phones", 200, json!({ "items": [] }));
    let (client, mut console) = signed_in(&backend);
    let jobs = console.show_panel(Panel::Phones);
    console.run_to_idle(&client, jobs);

    let before = backend.request_count();
    let jobs = console.import(ImportTarget::Phones, "13800000001\n13800000002\n13800000003\n13800000004\n13800000005");
    console.run_to_idle(&client, jobs);

    let toast = console.toasts().last().unwrap();
    assert_eq!(toast.message, "已导入 3 条");
    assert_eq!(toast.kind, ToastKind::Info);

    let issued: Vec<HttpRequest> = backend.requests().into_iter().skip(before).collect();
    assert_eq!(issued.len(), 2);
    assert_eq!(issued[0].path, "/api/phones/batch-import");
    let body: Value = serde_json::from_str(issued[0].body.as_deref().unwrap()).unwrap();
    assert_eq!(body["lines"].as_str().unwrap().lines().count(), 5);
    assert_eq!(issued[1].path, "/api/phones");
    assert!(!console.is_busy(Panel::Phones, admin::Control::Import));
}

#[test]
fn test_batch_delete_with_empty_selection_sends_nothing() {
    let backend = Scripted::default();
    backend.route(
        Method::Get,
        "/api/bank-cards",
        200,
        json!({ "items": [{ "id": 1, "card_number_masked": "**** 1111" }, { "id": 2, "card_number_masked": "**** 2222" }] }),
    );
    let (client, mut console) = signed_in(&backend);
    let jobs = console.show_panel(Panel::BankCards);
    console.run_to_idle(&client, jobs);

    let before = backend.request_count();
    assert!(console.request_batch_delete().is_empty());
    assert_eq!(backend.request_count(), before);
    assert!(!console.modal().is_open());
    assert_eq!(console.toasts().last().unwrap().message, "请先勾选要删除的卡");
}

#[test]
fn test_batch_delete_clears_selection_and_reloads() {
    let backend = Scripted::default();
    backend
        .route_seq(
            Method::Get,
            "/api/bank-cards",
            vec![
                (200, json!({ "items": [{ "id": 1 }, { "id": 2 }, { "id": 3 }] })),
                (200, json!({ "items": [{ "id": 3 }] })),
            ],
        )
        .route(Method::Post, "/api/bank-cards/batch-delete", 200, json!({ "ok": true }));
    let (client, mut console) = signed_in(&backend);
    let jobs = console.show_panel(Panel::BankCards);
    console.run_to_idle(&client, jobs);

    assert_eq!(console.toggle_selection(1), Some(true));
    assert_eq!(console.toggle_selection(2), Some(true));
    assert_eq!(console.toggle_selection(99), None);

    console.request_batch_delete();
    let jobs = console.resolve_confirm(ConfirmChoice::Confirm);
    console.run_to_idle(&client, jobs);

    let delete = backend
        .requests()
        .into_iter()
        .find(|r| r.path == "/api/bank-cards/batch-delete")
        .unwrap();
    let body: Value = serde_json::from_str(delete.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({ "ids": [1, 2] }));

    assert!(console.selection(Panel::BankCards).unwrap().is_empty());
    assert_eq!(console.bank_cards().items().len(), 1);
    assert_eq!(console.toasts().last().unwrap().message, "已删除");
}

#[test]
fn test_stale_list_response_is_dropped() {
    let backend = Scripted::default();
    backend
        .route(
            Method::Get,
            "/api/accounts?page=1&page_size=20&status=active",
            200,
            json!({ "items": accounts(1..3), "total": 2 }),
        )
        .route(
            Method::Get,
            "/api/accounts?page=1&page_size=20&status=banned",
            200,
            json!({ "items": accounts(10..11), "total": 1 }),
        );
    let (client, mut console) = signed_in(&backend);
    console.show_panel(Panel::Accounts);

    let first = console.set_account_filter("status", "active");
    let second = console.set_account_filter("status", "banned");

    // The newer request finishes first
    console.run_to_idle(&client, second);
    console.run_to_idle(&client, first);

    let items = console.accounts().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 10);
}

#[test]
fn test_empty_inbox() {
    let backend = Scripted::default();
    backend
        .route(Method::Get, "/api/emails", 200, json!({ "items": [{ "id": 9, "email": "box@outlook.com" }] }))
        .route(Method::Get, "/api/email-api/mail-list", 200, json!({ "list": [] }));
    let (client, mut console) = signed_in(&backend);
    let jobs = console.show_panel(Panel::Emails);
    console.run_to_idle(&client, jobs);

    let jobs = console.open_viewer(9);
    console.run_to_idle(&client, jobs);

    let viewer = console.modal().viewer().unwrap();
    assert_eq!(viewer.state(), &ViewerState::Empty);
    let view = viewer.render();
    assert_eq!(view.mailbox_email, "box@outlook.com");
    assert_eq!(view.list_placeholder.as_deref(), Some(EMPTY_LIST_TEXT));
    assert!(matches!(view.detail, DetailPane::Empty(_)));
    assert!(backend.paths().contains(&"/api/email-api/mail-list?email_id=9".to_string()));
}

#[test]
fn test_selecting_mail_does_not_refetch() {
    let backend = Scripted::default();
    backend.route(
        Method::Get,
        "/api/email-api/mail-list",
        200,
        json!({ "list": [mail("Welcome", "hello"), mail("Your code", "123456")] }),
    );
    let (client, mut console) = signed_in(&backend);

    let jobs = console.open_viewer(9);
    console.run_to_idle(&client, jobs);
    let before = backend.request_count();

    assert!(console.select_mail(1));
    assert!(!console.select_mail(1));
    assert!(!console.select_mail(5));

    console.set_mail_tab(MailTab::Raw);
    assert!(console.select_mail(1));
    let ViewerState::Ready(ready) = console.modal().viewer().unwrap().state() else {
        panic!("expected a loaded inbox");
    };
    assert_eq!(ready.active_tab(), MailTab::Preview);
    assert_eq!(backend.request_count(), before);

    let view = console.modal().viewer().unwrap().render();
    assert!(view.list[1].active);
    match view.detail {
        DetailPane::Mail(detail) => assert_eq!(detail.subject, "Your code"),
        other => panic!("expected a mail, got {:?}", other),
    }
}

#[test]
fn test_inbox_for_closed_viewer_is_dropped() {
    let backend = Scripted::default();
    backend.route(
        Method::Get,
        "/api/email-api/mail-list",
        200,
        json!({ "list": [mail("Hi", "there")] }),
    );
    let (client, mut console) = signed_in(&backend);

    let first = console.open_viewer(1);
    let second = console.open_viewer(2);
    console.run_to_idle(&client, first);

    let viewer = console.modal().viewer().unwrap();
    assert_eq!(viewer.mailbox_id(), 2);
    assert_eq!(viewer.state(), &ViewerState::Loading);

    console.close_modal();
    console.run_to_idle(&client, second);
    assert!(!console.modal().is_open());
}

#[test]
fn test_phone_load_failure_shows_inline_row() {
    let backend = Scripted::default();
    backend.route(Method::Get, "/api/phones", 500, json!("upstream down"));
    let (client, mut console) = signed_in(&backend);

    let jobs = console.show_panel(Panel::Phones);
    console.run_to_idle(&client, jobs);

    let view = console.render_list(Panel::Phones).unwrap();
    assert_eq!(view.rows, vec![ListRow::Message("加载失败：\"upstream down\"".to_string())]);
}

#[test]
fn test_update_login_ends_session() {
    let backend = Scripted::default();
    backend.route(Method::Put, "/api/settings/login", 200, json!({ "ok": true }));
    let (client, mut console) = signed_in(&backend);
    console.show_panel(Panel::Settings);

    let jobs = console.update_login("newadmin", "newpass");
    console.run_to_idle(&client, jobs);

    assert_eq!(console.view(), &View::Login { error: None });
    assert!(!client.has_token());
    assert!(console.toasts().all().iter().any(|t| t.message == "已修改，请重新登录"));
}
