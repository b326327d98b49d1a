use axum::{
  extract::{
    ws::{Message, WebSocket, WebSocketUpgrade},
    Query,
  },
  http::{header::USER_AGENT, HeaderMap, StatusCode},
  response::{Html, IntoResponse, Response},
  routing::get,
  Json, Router,
};
use futures::{SinkExt, StreamExt};

use crate::{
  error::ParseOsError,
  event::{ClientEvent, ServerEvent, Snapshot},
  os::SelectionMode,
  page,
  session::Session,
};

pub fn router() -> Router {
  Router::new()
    .route("/", get(index))
    .route("/api/commands", get(commands))
    .route("/ws", get(ws_handler))
    .route("/health", get(|| async { "ok" }))
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct PageQuery {
  os: Option<String>,
  ua: Option<String>,
}

impl PageQuery {
  fn selection(&self) -> Result<SelectionMode, ParseOsError> {
    self
      .os
      .as_deref()
      .map_or(Ok(SelectionMode::Auto), str::parse)
  }
}

impl IntoResponse for ParseOsError {
  fn into_response(self) -> Response {
    (StatusCode::BAD_REQUEST, self.to_string()).into_response()
  }
}

fn user_agent(headers: &HeaderMap) -> &str {
  headers
    .get(USER_AGENT)
    .and_then(|v| v.to_str().ok())
    .unwrap_or_default()
}

async fn index(
  headers: HeaderMap,
  Query(query): Query<PageQuery>,
) -> Result<Html<String>, ParseOsError> {
  let session = Session::new(user_agent(&headers), query.selection()?);
  tracing::debug!(detected = %session.detected(), selection = session.selection().label(), "render page");
  Ok(Html(page::render(&session)))
}

async fn commands(
  headers: HeaderMap,
  Query(query): Query<PageQuery>,
) -> Result<Json<Snapshot>, ParseOsError> {
  let ua = query.ua.as_deref().unwrap_or(user_agent(&headers));
  let session = Session::new(ua, query.selection()?);
  Ok(Json(session.snapshot()))
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  headers: HeaderMap,
  Query(query): Query<PageQuery>,
) -> Result<Response, ParseOsError> {
  let session = Session::new(user_agent(&headers), query.selection()?);
  Ok(ws.on_upgrade(move |socket| handle_ws(socket, session)))
}

async fn send(
  sender: &mut futures::stream::SplitSink<WebSocket, Message>,
  event: &ServerEvent,
) -> Result<(), axum::Error> {
  match event.encode() {
    Ok(text) => sender.send(Message::Text(text.into())).await,
    Err(e) => {
      tracing::error!("failed to encode server event: {e}");
      Ok(())
    }
  }
}

/// First frame of every session: the list the page should be showing.
fn greeting(session: &Session) -> ServerEvent {
  ServerEvent::Commands(session.snapshot())
}

/// Handles one text frame. Undecodable frames get an error reply and leave
/// the session untouched.
fn reply(session: &mut Session, text: &str) -> ServerEvent {
  match ClientEvent::decode(text) {
    Ok(event) => {
      if let ClientEvent::Copied { index, ok: false } = event {
        tracing::debug!(id = %session.id(), index, "clipboard write failed in browser");
      }
      session.apply(event)
    }
    Err(e) => {
      tracing::warn!(id = %session.id(), "undecodable frame: {e}");
      ServerEvent::Error {
        message: e.to_string(),
      }
    }
  }
}

async fn handle_ws(socket: WebSocket, mut session: Session) {
  let id = session.id();
  tracing::info!(%id, detected = %session.detected(), "session opened");

  let (mut sender, mut receiver) = socket.split();

  if let Err(e) = send(&mut sender, &greeting(&session)).await {
    tracing::warn!(%id, "initial snapshot not delivered: {e}");
    return;
  }

  while let Some(msg) = receiver.next().await {
    let text = match msg {
      Ok(Message::Text(text)) => text,
      Ok(Message::Close(_)) => break,
      Ok(_) => continue,
      Err(e) => {
        tracing::warn!(%id, "websocket error: {e}");
        break;
      }
    };

    if let Err(e) = send(&mut sender, &reply(&mut session, text.as_str())).await {
      tracing::warn!(%id, "reply not delivered: {e}");
      break;
    }
  }

  tracing::info!(%id, "session closed");
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::Request};
  use tower::ServiceExt;

  use super::*;
  use crate::os::OsCategory;

  const MAC_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15)";

  async fn get(uri: &str, ua: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(ua) = ua {
      request = request.header(USER_AGENT, ua);
    }
    router()
      .oneshot(request.body(Body::empty()).unwrap())
      .await
      .unwrap()
  }

  async fn body_text(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 256)
      .await
      .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
  }

  #[tokio::test]
  async fn index_detects_from_header() {
    let resp = get("/", Some(MAC_UA)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    assert!(html.contains("<h2>macOS Commands</h2>"));
    assert!(html.contains("dataos-ctl-darwin-amd64.tar.gz"));
  }

  #[tokio::test]
  async fn index_without_user_agent_asks_for_selection() {
    let html = body_text(get("/", None).await).await;
    assert!(html.contains("Your OS could not be detected."));
  }

  #[tokio::test]
  async fn index_honours_override() {
    let html = body_text(get("/?os=Windows", Some(MAC_UA)).await).await;
    assert!(html.contains("<h2>Windows Commands</h2>"));
    assert!(html.contains("Auto (macOS)"));
  }

  #[tokio::test]
  async fn bad_override_is_rejected() {
    let resp = get("/?os=amiga", Some(MAC_UA)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(resp).await.contains("amiga"));
  }

  #[tokio::test]
  async fn commands_endpoint_returns_snapshot() {
    let resp = get("/api/commands?ua=Mozilla%2F5.0%20(X11%3B%20Linux%20x86_64)", None).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["detected"], "Linux");
    assert_eq!(json["selection"], "Auto");
    assert_eq!(json["effective"], "Linux");
    let commands = json["commands"].as_array().unwrap();
    assert_eq!(commands.len(), 6);
    assert_eq!(commands[0]["description"], "Set API key");
    assert_eq!(commands[2]["description"], "Download CLI binary");
  }

  #[tokio::test]
  async fn commands_endpoint_unknown_is_empty() {
    let resp = get("/api/commands", Some("curl/8.4.0")).await;
    let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(json["effective"], "Unknown");
    assert!(json["commands"].as_array().unwrap().is_empty());
  }

  #[test]
  fn session_opens_with_a_snapshot() {
    let session = Session::new(MAC_UA, SelectionMode::Auto);
    match greeting(&session) {
      ServerEvent::Commands(snapshot) => {
        assert_eq!(snapshot.effective, OsCategory::Macos);
        assert_eq!(snapshot.commands.len(), 5);
      }
      other => panic!("expected a command snapshot, got {other:?}"),
    }
  }

  #[test]
  fn bad_frame_is_reported_and_session_continues() {
    let mut session = Session::new(MAC_UA, SelectionMode::Auto);

    let bad = reply(&mut session, "{not json");
    assert!(matches!(bad, ServerEvent::Error { .. }));
    let bad = reply(&mut session, r#"{"type":"select","os":"unknown"}"#);
    assert!(matches!(bad, ServerEvent::Error { .. }));
    assert_eq!(session.selection(), SelectionMode::Auto);

    match reply(&mut session, r#"{"type":"select","os":"linux"}"#) {
      ServerEvent::Commands(snapshot) => {
        assert_eq!(snapshot.effective, OsCategory::Linux);
        assert_eq!(snapshot.commands.len(), 6);
      }
      other => panic!("expected a command snapshot, got {other:?}"),
    }

    let copied = reply(&mut session, r#"{"type":"copied","index":4,"ok":true}"#);
    assert_eq!(copied, ServerEvent::CopyFeedback { copied: Some(4) });
  }

  #[tokio::test]
  async fn unknown_override_is_rejected() {
    let resp = get("/?os=unknown", Some(MAC_UA)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn health_is_ok() {
    let resp = get("/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "ok");
  }
}
