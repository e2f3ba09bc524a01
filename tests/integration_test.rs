// Integration tests for users-manager

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use hyper::header::CONTENT_TYPE;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};

use users_manager::model::{User, UserPayload};

type Store = Arc<Mutex<Vec<User>>>;

fn temp_path(tag: &str) -> std::path::PathBuf {
    use std::time::{SystemTime, UNIX_EPOCH};
    let mut path = std::env::temp_dir();
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    path.push(format!("um_{}_{}_{}", tag, std::process::id(), nonce));
    path
}

fn json_response<T: serde::Serialize>(status: StatusCode, value: &T) -> Response<Body> {
    let mut res = Response::new(Body::from(serde_json::to_vec(value).unwrap()));
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, "application/json".parse().unwrap());
    res
}

fn empty_response(status: StatusCode) -> Response<Body> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = status;
    res
}

/// Minimal in-memory `/users` backend, ids ascending like a real table.
async fn users_backend(store: Store, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let is_json = req
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.as_bytes() == b"application/json")
        .unwrap_or(false);
    let body = hyper::body::to_bytes(req.into_body()).await.unwrap_or_default();

    let res = match (method, path.as_str()) {
        (Method::GET, "/users") => {
            let users = store.lock().unwrap().clone();
            json_response(StatusCode::OK, &users)
        }
        (Method::POST, "/users") => {
            if !is_json {
                return Ok(empty_response(StatusCode::UNSUPPORTED_MEDIA_TYPE));
            }
            let payload: UserPayload = serde_json::from_slice(&body).unwrap();
            let mut users = store.lock().unwrap();
            let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            let user = User { id, name: payload.name, email: payload.email };
            users.push(user.clone());
            json_response(StatusCode::CREATED, &user)
        }
        (method, p) if p.starts_with("/users/") => {
            let Ok(id) = p["/users/".len()..].parse::<u64>() else {
                return Ok(empty_response(StatusCode::NOT_FOUND));
            };
            let mut users = store.lock().unwrap();
            match users.iter().position(|u| u.id == id) {
                None => empty_response(StatusCode::NOT_FOUND),
                Some(i) if method == Method::PUT => {
                    let payload: UserPayload = serde_json::from_slice(&body).unwrap();
                    users[i].name = payload.name;
                    users[i].email = payload.email;
                    json_response(StatusCode::OK, &users[i])
                }
                Some(i) if method == Method::DELETE => {
                    users.remove(i);
                    empty_response(StatusCode::NO_CONTENT)
                }
                Some(_) => empty_response(StatusCode::METHOD_NOT_ALLOWED),
            }
        }
        _ => empty_response(StatusCode::NOT_FOUND),
    };
    Ok(res)
}

/// Serve `store` on an ephemeral local port and return the base URL.
fn spawn_backend(store: Store) -> String {
    let make = make_service_fn(move |_conn| {
        let store = Arc::clone(&store);
        async move {
            Ok::<_, Infallible>(service_fn(move |req| users_backend(Arc::clone(&store), req)))
        }
    });
    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make);
    let addr = server.local_addr();
    tokio::spawn(server);
    format!("http://{addr}")
}

fn seeded_store() -> Store {
    Arc::new(Mutex::new(vec![
        User { id: 1, name: "Ada".into(), email: "ada@x".into() },
        User { id: 2, name: "Brian".into(), email: "brian@x".into() },
    ]))
}

// 1) Theme config roundtrip and init
#[test]
fn theme_roundtrip_and_init() {
    use std::{fs, path::PathBuf};
    use users_manager::app::Theme;

    let path_str = temp_path("theme").with_extension("conf").to_string_lossy().to_string();

    let t = Theme::mocha();
    t.write_file(&path_str).expect("write theme");
    let t2 = Theme::from_file(&path_str).expect("read theme");
    assert_eq!(t.text, t2.text);
    assert_eq!(t.title, t2.title);
    assert_eq!(t.accent, t2.accent);

    // load_or_init creates file if missing
    let mut p2 = PathBuf::from(&path_str);
    p2.set_file_name(format!("{}_init.conf", p2.file_stem().unwrap().to_string_lossy()));
    let p2_str = p2.to_string_lossy().to_string();
    let _ = fs::remove_file(&p2_str);
    let _created = Theme::load_or_init(&p2_str);
    assert!(PathBuf::from(&p2_str).exists());

    let _ = fs::remove_file(&path_str);
    let _ = fs::remove_file(&p2_str);
}

// 2) Keybinds file written on first start and read back with overrides
#[test]
fn keybinds_init_then_override() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use users_manager::app::keymap::{KeyAction, Keymap};

    let path = temp_path("keybinds").with_extension("conf");
    let path_str = path.to_string_lossy().to_string();

    let _ = Keymap::load_or_init(&path_str);
    let written = std::fs::read_to_string(&path).expect("defaults written");
    assert!(written.contains("ExportCsv = x"));
    assert!(written.contains("DeleteSelection = Delete"));

    std::fs::write(&path, format!("{written}\nExportCsv = Ctrl+s\n")).unwrap();
    let km = Keymap::load_or_init(&path_str);
    let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
    assert_eq!(km.resolve(&ctrl_s), Some(KeyAction::ExportCsv));
    let x = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
    assert_eq!(km.resolve(&x), Some(KeyAction::ExportCsv));

    let _ = std::fs::remove_file(&path);
}

// 3) CSV export writes a dated file with the exact payload
#[test]
fn csv_export_writes_dated_file() {
    use chrono::NaiveDate;
    use users_manager::export::{ExportError, export_on};
    use users_manager::reconcile::UserList;

    let dir = temp_path("export");
    std::fs::create_dir_all(&dir).unwrap();
    let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();

    let err = export_on(&UserList::new(), &dir, date).unwrap_err();
    assert!(matches!(err, ExportError::NothingToExport));
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

    let list = UserList::from_server(vec![
        User { id: 1, name: "A, B".into(), email: "a@x".into() },
        User { id: 2, name: "Cé".into(), email: "c@x".into() },
    ]);
    let path = export_on(&list, &dir, date).unwrap();
    assert_eq!(path.file_name().unwrap(), "users_export_2025-01-31.csv");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "ID,Name,Email\n2,\"Cé\",\"c@x\"\n1,\"A, B\",\"a@x\"");

    let _ = std::fs::remove_dir_all(&dir);
}

// 4) HTTP client speaks the /users contract
#[tokio::test]
async fn http_client_round_trips_against_backend() {
    use users_manager::api::{HttpUserApi, UserApi};
    use users_manager::error::ApiError;

    let store = seeded_store();
    let api = HttpUserApi::new(format!("{}/", spawn_backend(Arc::clone(&store))));

    let listed = api.list_users().await.unwrap();
    assert_eq!(listed.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);

    let created = api
        .create_user(UserPayload { name: "Cleo".into(), email: "cleo@x".into() })
        .await
        .unwrap();
    assert_eq!(created, User { id: 3, name: "Cleo".into(), email: "cleo@x".into() });

    api.update_user(1, UserPayload { name: "Ada L".into(), email: "ada@l".into() })
        .await
        .unwrap();
    assert_eq!(store.lock().unwrap()[0].name, "Ada L");

    api.delete_user(2).await.unwrap();
    assert_eq!(store.lock().unwrap().len(), 2);

    let err = api.delete_user(99).await.unwrap_err();
    match err {
        ApiError::Rejected { method, path, status } => {
            assert_eq!(method, Method::DELETE);
            assert_eq!(path, "/users/99");
            assert_eq!(status, StatusCode::NOT_FOUND);
        }
        other => panic!("expected rejection, got {other}"),
    }
}

// 5) Full flow: keys -> dispatcher -> backend -> outcome -> list
#[tokio::test]
async fn keyboard_flow_reconciles_with_backend() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tokio::runtime::Handle;
    use users_manager::api::HttpUserApi;
    use users_manager::app::update::{Flow, apply_outcome, handle_key};
    use users_manager::app::{AppState, ModalState, Theme, keymap::Keymap};
    use users_manager::worker::Dispatcher;

    let store = seeded_store();
    let base = spawn_backend(Arc::clone(&store));
    let (dispatcher, mut outcomes) = Dispatcher::new(HttpUserApi::new(base.clone()), Handle::current());
    let mut app = AppState::new(Theme::mocha(), Keymap::default(), base, temp_path("unused"));

    let press = |app: &mut AppState, code: KeyCode| -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    };

    // initial load, newest first
    dispatcher.load();
    app.in_flight += 1;
    apply_outcome(&mut app, outcomes.recv().await.unwrap());
    assert!(!app.loading);
    let names: Vec<_> = app.users.as_slice().iter().map(|u| u.name.clone()).collect();
    assert_eq!(names, vec!["Brian", "Ada"]);

    // create through the form
    press(&mut app, KeyCode::Char('n'));
    for c in "Cleo".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Tab);
    for c in "cleo@x".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    let Flow::Dispatch(cmd) = press(&mut app, KeyCode::Enter) else {
        panic!("submit should dispatch");
    };
    dispatcher.dispatch(cmd);
    assert_eq!(app.users.len(), 2, "no optimistic insert");
    apply_outcome(&mut app, outcomes.recv().await.unwrap());
    assert!(app.modal.is_none());
    assert_eq!(app.users.get(0).unwrap().id, 3);

    // edit the last user (Ada, id 1)
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('e'));
    press(&mut app, KeyCode::Char('!'));
    let Flow::Dispatch(cmd) = press(&mut app, KeyCode::Enter) else {
        panic!("submit should dispatch");
    };
    dispatcher.dispatch(cmd);
    apply_outcome(&mut app, outcomes.recv().await.unwrap());
    assert!(!matches!(app.modal, Some(ModalState::EditUser { .. })));
    let ids: Vec<_> = app.users.as_slice().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(app.users.get(2).unwrap().name, "Ada!");

    // delete Brian
    press(&mut app, KeyCode::Up);
    let Flow::Dispatch(cmd) = press(&mut app, KeyCode::Char('d')) else {
        panic!("delete should dispatch");
    };
    dispatcher.dispatch(cmd);
    apply_outcome(&mut app, outcomes.recv().await.unwrap());
    let ids: Vec<_> = app.users.as_slice().iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(store.lock().unwrap().len(), 2);
}

// 6) Rejected mutation leaves the list and the open form untouched
#[tokio::test]
async fn rejected_update_changes_nothing() {
    use tokio::runtime::Handle;
    use users_manager::api::HttpUserApi;
    use users_manager::app::update::apply_outcome;
    use users_manager::app::{AppState, ModalState, Theme, keymap::Keymap};
    use users_manager::reconcile::Outcome;
    use users_manager::worker::{Command, Dispatcher};

    let store = seeded_store();
    let base = spawn_backend(Arc::clone(&store));
    let (dispatcher, mut outcomes) = Dispatcher::new(HttpUserApi::new(base.clone()), Handle::current());
    let mut app = AppState::new(Theme::mocha(), Keymap::default(), base, temp_path("unused"));
    apply_outcome(&mut app, Outcome::Loaded(Ok(store.lock().unwrap().clone())));
    let before = app.users.clone();

    let ghost = User { id: 42, name: "Ghost".into(), email: "g@x".into() };
    app.modal = Some(ModalState::EditUser { user: ghost.clone(), focus: Default::default() });
    app.input_mode = users_manager::app::InputMode::Modal;
    dispatcher.dispatch(Command::Update(ghost));
    apply_outcome(&mut app, outcomes.recv().await.unwrap());

    assert_eq!(app.users, before);
    assert!(matches!(app.modal, Some(ModalState::EditUser { .. })));
}
