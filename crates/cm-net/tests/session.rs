use cm_net::{
    private_key_from_pem, CancelSignal, ConnectConfig, Credentials, KeyStore, MemoryKeyStore,
    Operation, Role, Session, SessionState, Status,
};
use rsa::RsaPublicKey;
use std::{
    net::{IpAddr, Ipv4Addr},
    sync::Arc,
    time::Duration,
};

const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const PIN: &str = "4321";

fn key(pem: &str) -> rsa::RsaPrivateKey {
    private_key_from_pem(pem).unwrap()
}

fn alice() -> rsa::RsaPrivateKey {
    key(include_str!("fixtures/alice.pem"))
}

fn bob() -> rsa::RsaPrivateKey {
    key(include_str!("fixtures/bob.pem"))
}

fn mallory() -> rsa::RsaPrivateKey {
    key(include_str!("fixtures/mallory.pem"))
}

/// Alice's keys: her pair plus Bob's public key
fn alice_store() -> Arc<dyn KeyStore> {
    let mut store = MemoryKeyStore::new();
    store
        .add_private_key("alice", alice())
        .add_public_key("bob", RsaPublicKey::from(&bob()));
    Arc::new(store)
}

/// Bob's keys, with `alice_key` filed as Alice's public key
fn bob_store(alice_key: RsaPublicKey) -> Arc<dyn KeyStore> {
    let mut store = MemoryKeyStore::new();
    store
        .add_private_key("bob", bob())
        .add_public_key("alice", alice_key);
    Arc::new(store)
}

/// A base port whose successor is free as well
fn free_port_pair() -> u16 {
    loop {
        let first = std::net::TcpListener::bind((LOCALHOST, 0)).unwrap();
        let port = first.local_addr().unwrap().port();
        if port < u16::MAX && std::net::TcpListener::bind((LOCALHOST, port + 1)).is_ok() {
            return port;
        }
    }
}

fn config(timeout: Duration) -> ConnectConfig {
    ConnectConfig {
        timeout,
        retry_interval: Duration::from_millis(50),
    }
}

async fn establish_pair(
    server: Session,
    mut client: Session,
) -> ((Status, Session), (Status, Session)) {
    let server_task = tokio::spawn(async move {
        let mut server = server;
        let status = server.establish(&CancelSignal::new()).await;
        (status, server)
    });
    let client_status = client.establish(&CancelSignal::new()).await;
    (server_task.await.unwrap(), (client_status, client))
}

fn sessions(port: u16, client_store: Arc<dyn KeyStore>, pin: &str) -> (Session, Session) {
    let server = Session::server(alice_store(), "alice", LOCALHOST, port, PIN).unwrap();
    let credentials = Credentials::new("127.0.0.1", port, "alice", pin);
    let client = Session::client(
        client_store,
        "bob",
        &credentials,
        config(Duration::from_secs(10)),
    )
    .unwrap();
    (server, client)
}

#[tokio::test]
async fn handshake_and_message_exchange() {
    let port = free_port_pair();
    let (server, client) = sessions(port, bob_store(RsaPublicKey::from(&alice())), PIN);
    let ((server_status, mut server), (client_status, mut client)) =
        establish_pair(server, client).await;

    assert_eq!(server_status, Status::Ok);
    assert_eq!(client_status, Status::Ok);
    assert_eq!(server.state(), SessionState::Ready);
    assert_eq!(client.state(), SessionState::Ready);
    assert_eq!(server.role(), Role::Acceptor);
    assert_eq!(server.buddy(), Some("bob"));
    assert_eq!(client.buddy(), Some("alice"));

    // both cascades hold the same keys, the bundles themselves are gone
    let sealed = client.enigma().encrypt(b"same keys on both sides").unwrap();
    assert_eq!(server.enigma().decrypt(&sealed).unwrap(), b"same keys on both sides");
    assert!(!server.enigma().has_keys());
    assert!(!client.enigma().has_keys());

    let request = client
        .request(Operation::Message.id(), b"hello alice", b"")
        .await
        .unwrap();
    let received = server.read_request().await.unwrap();
    assert_eq!(received.data, b"hello alice");
    assert_eq!(received.operation(), Some(Operation::Message));
    server
        .answer(Status::Ok, &received, b"hello bob", b"")
        .await
        .unwrap();
    let answer = client.read_answer(&request).await.unwrap();
    assert_eq!(answer.data, b"hello bob");
    assert_eq!(answer.status, Some(Status::Ok));

    // the acceptor already sent one request during the handshake
    let request = server
        .request(Operation::Logout.id(), b"", b"")
        .await
        .unwrap();
    assert_eq!(request.counter, 2);
    let received = client.read_request().await.unwrap();
    client.answer(Status::Ok, &received, b"", b"").await.unwrap();
    assert_eq!(server.read_answer(&request).await.unwrap().counter, 2);

    client.close().await;
    server.close().await;
    client.close().await;
    assert_eq!(client.state(), SessionState::Closed);
    assert!(!server.enigma().is_ready());
}

#[tokio::test]
async fn wrong_buddy_key_fails_before_any_message() {
    let port = free_port_pair();
    let (server, client) = sessions(port, bob_store(RsaPublicKey::from(&mallory())), PIN);
    let ((server_status, server), (client_status, client)) = establish_pair(server, client).await;

    assert_eq!(server_status, Status::SecurityBreach);
    assert_ne!(client_status, Status::Ok);
    assert_eq!(server.state(), SessionState::Closed);
    assert_eq!(client.state(), SessionState::Closed);
    assert!(!client.enigma().is_ready());
}

#[tokio::test]
async fn wrong_pin_is_a_security_breach() {
    let port = free_port_pair();
    let (server, client) = sessions(port, bob_store(RsaPublicKey::from(&alice())), "0000");
    let ((server_status, _), (client_status, _)) = establish_pair(server, client).await;

    assert_eq!(server_status, Status::SecurityBreach);
    assert_ne!(client_status, Status::Ok);
}

#[tokio::test]
async fn cancel_while_listening() {
    let port = free_port_pair();
    let mut server = Session::server(alice_store(), "alice", LOCALHOST, port, PIN).unwrap();
    let cancel = CancelSignal::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    assert_eq!(server.establish(&cancel).await, Status::Cancel);
    assert_eq!(server.state(), SessionState::Closed);
}

#[tokio::test]
async fn dialing_nobody_times_out() {
    let port = free_port_pair();
    let credentials = Credentials::new("127.0.0.1", port, "alice", PIN);
    let mut client = Session::client(
        bob_store(RsaPublicKey::from(&alice())),
        "bob",
        &credentials,
        config(Duration::from_millis(300)),
    )
    .unwrap();

    assert_eq!(client.establish(&CancelSignal::new()).await, Status::Timeout);
    assert_eq!(client.state(), SessionState::Closed);
}
