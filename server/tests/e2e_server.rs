use std::{collections::VecDeque, net::SocketAddr, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use server::{room_manager::RoomManager, routes, state::AppState};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream,
};

const WAIT_LIMIT: Duration = Duration::from_secs(5);

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("could not bind to the port");
    let addr = listener.local_addr().expect("listener has no local addr");
    let app = routes::app(AppState::new(RoomManager::new(100)));

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });

    addr
}

async fn create_room(addr: SocketAddr, name: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{}/api/room", addr))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("room api is down");
    let status = response.status().as_u16();

    (status, response.json().await.expect("room api sent no JSON"))
}

/// A raw websocket member of a room, values of batched frames are handed out one by one
struct Peer {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pending: VecDeque<Value>,
}

impl Peer {
    async fn connect(addr: SocketAddr, name: &str, uri: &str) -> Peer {
        let (ws, _) = connect_async(format!("ws://{}/ws?name={}&uri={}", addr, name, uri))
            .await
            .expect("could not connect to the room");

        Peer {
            ws,
            pending: VecDeque::new(),
        }
    }

    async fn send(&mut self, value: Value) {
        self.send_raw(value.to_string()).await;
    }

    async fn send_raw(&mut self, text: String) {
        self.ws
            .send(Message::text(text))
            .await
            .expect("could not write to the room");
    }

    async fn say(&mut self, message: &str) {
        self.send(json!({"action": "send-message", "message": message}))
            .await;
    }

    async fn next_value(&mut self) -> Value {
        while self.pending.is_empty() {
            let message = tokio::time::timeout(WAIT_LIMIT, self.ws.next())
                .await
                .expect("timed out waiting for the room")
                .expect("connection closed")
                .expect("connection failed");

            if let Message::Text(text) = message {
                for line in text.as_str().split('\n') {
                    self.pending
                        .push_back(serde_json::from_str(line).expect("server sent invalid JSON"));
                }
            }
        }

        self.pending.pop_front().unwrap()
    }

    async fn next_text(&mut self) -> String {
        self.next_value().await["message"]
            .as_str()
            .expect("value has no message")
            .to_owned()
    }
}

#[tokio::test]
async fn created_rooms_are_listed_with_the_seated_creator() {
    let addr = start_server().await;

    let (status, body) = create_room(addr, "alice").await;
    assert_eq!(status, 201);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["pot"], 0);
    assert_eq!(body["data"]["record"], json!({"alice": 100}));

    let uri = body["data"]["uri"].as_str().unwrap();
    let detail: Value = reqwest::get(format!("http://{}/api/room/{}", addr, uri))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["data"], body["data"]);

    let missing = reqwest::get(format!("http://{}/api/room/nope", addr))
        .await
        .unwrap();
    assert_eq!(missing.status().as_u16(), 404);
}

#[tokio::test]
async fn room_creation_needs_a_name() {
    let addr = start_server().await;

    let (status, body) = create_room(addr, "  ").await;

    assert_eq!(status, 400);
    assert_eq!(body["status"], "fail");
}

#[tokio::test]
async fn connecting_to_an_unknown_room_is_refused() {
    let addr = start_server().await;

    let result = connect_async(format!("ws://{}/ws?name=alice&uri=nope", addr)).await;

    match result {
        Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
            assert_eq!(response.status().as_u16(), 404)
        }
        other => panic!("expected a 404, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn members_share_messages_and_the_pot() {
    let addr = start_server().await;
    let (_, body) = create_room(addr, "alice").await;
    let uri = body["data"]["uri"].as_str().unwrap().to_owned();

    let mut alice = Peer::connect(addr, "alice", &uri).await;
    alice.say("anyone?").await;
    // the echo means alice is in the room
    assert_eq!(
        alice.next_value().await,
        json!({"action": "send-message", "message": "anyone?", "sender": {"name": "alice"}})
    );

    let mut bob = Peer::connect(addr, "bob", &uri).await;
    let welcome = alice.next_value().await;
    assert_eq!(welcome["action"], "send-message");
    assert_eq!(welcome["message"], "bob joined the room");
    assert_eq!(welcome["target"]["name"], uri.as_str());
    assert!(welcome.get("sender").is_none());

    bob.send(json!({"action": "add-pot", "pot": 30})).await;
    for peer in [&mut alice, &mut bob] {
        assert_eq!(
            peer.next_value().await,
            json!({"action": "update-pot", "message": "bob bet for 30", "pot": 30, "sender": {"name": "bob"}})
        );
    }

    alice
        .send(json!({"action": "retrieve-pot", "pot": 1000}))
        .await;
    let rejected = bob.next_value().await;
    assert_eq!(rejected["message"], "not enough pot to retrieved dude");
    assert_eq!(rejected["pot"], 30);

    alice.send(json!({"action": "add-pot", "pot": null})).await;
    assert_eq!(bob.next_text().await, "not enough pot to bet dude");

    let detail: Value = reqwest::get(format!("http://{}/api/room/{}", addr, uri))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["data"]["pot"], 30);
    assert_eq!(detail["data"]["record"], json!({"alice": 100, "bob": 70}));
}

#[tokio::test]
async fn left_members_are_not_heard_until_they_join_again() {
    let addr = start_server().await;
    let (_, body) = create_room(addr, "alice").await;
    let uri = body["data"]["uri"].as_str().unwrap().to_owned();

    let mut alice = Peer::connect(addr, "alice", &uri).await;
    alice.say("hello").await;
    alice.next_value().await;
    let mut bob = Peer::connect(addr, "bob", &uri).await;
    assert_eq!(alice.next_text().await, "bob joined the room");

    alice
        .send(json!({"action": "leave-room", "message": uri}))
        .await;
    alice.say("ignored").await;
    alice
        .send(json!({"action": "join-room", "message": uri}))
        .await;

    // the message sent while outside the room never reached bob
    assert_eq!(bob.next_text().await, "alice joined the room");
    bob.say("welcome back").await;

    assert_eq!(alice.next_text().await, "welcome back");
}

#[tokio::test]
async fn malformed_commands_are_skipped() {
    let addr = start_server().await;
    let (_, body) = create_room(addr, "alice").await;
    let uri = body["data"]["uri"].as_str().unwrap().to_owned();

    let mut alice = Peer::connect(addr, "alice", &uri).await;
    alice.send_raw(String::from("this is not json")).await;
    alice
        .send_raw(String::from(
            "{\"action\":\"dance\"}\n{\"action\":\"send-message\",\"message\":\"after\"}",
        ))
        .await;

    assert_eq!(alice.next_text().await, "after");
}
