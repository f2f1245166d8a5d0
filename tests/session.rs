use std::net::UdpSocket;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ipmi_lan::message::{self, Message};
use ipmi_lan::{AuthType, CompletionCode, Error, Negotiation, PrivilegeLevel, Session};

const REFERENCE_REQUEST: [u8; 23] = [
    0x06, 0x00, 0xFF, 0x07, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x09, 0x20,
    0x18, 0xC8, 0x81, 0x00, 0x38, 0x8E, 0x04, 0xB5,
];

/// A loopback BMC that answers `requests` datagrams using `respond` and hands
/// back what it received.
fn fake_bmc(
    requests: usize,
    respond: fn(&Message) -> Vec<u8>,
) -> (String, JoinHandle<Vec<Vec<u8>>>) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("bind");
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .expect("timeout");
    let host = socket.local_addr().expect("addr").to_string();

    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        let mut buf = [0u8; 512];
        for _ in 0..requests {
            let (n, peer) = socket.recv_from(&mut buf).expect("recv");
            let request = message::parse(&buf[..n]).expect("valid request");
            socket.send_to(&respond(&request), peer).expect("send");
            seen.push(buf[..n].to_vec());
        }
        seen
    });

    (host, handle)
}

fn caps(request: &Message, auth_type_support: u8) -> Vec<u8> {
    request
        .reply(vec![0x00, 0x01, auth_type_support, 0x04, 0x00, 0x00, 0x00, 0x00])
        .expect("reply")
        .to_bytes()
}

#[test]
fn negotiates_md5_against_loopback_bmc() {
    let (host, bmc) = fake_bmc(1, |req| caps(req, 0x95));

    let mut session = Session::open(&host).expect("open");
    let mut negotiation = Negotiation::new();
    let auth = negotiation
        .run(&mut session, PrivilegeLevel::Administrator)
        .expect("negotiate");
    assert_eq!(auth, AuthType::Md5);

    let capabilities = negotiation.capabilities().expect("known");
    assert_eq!(capabilities.channel_number, 0x01);
    assert!(capabilities.v20_data_available());
    assert!(capabilities.non_null_usernames());

    // Terminal state: no second round trip.
    assert_eq!(
        negotiation
            .run(&mut session, PrivilegeLevel::Administrator)
            .expect("cached"),
        AuthType::Md5
    );

    let seen = bmc.join().expect("bmc thread");
    assert_eq!(seen, vec![REFERENCE_REQUEST.to_vec()]);
}

#[test]
fn second_call_uses_next_sequence() {
    let (host, bmc) = fake_bmc(2, |req| caps(req, 0x01));

    let mut session = Session::open(&host).expect("open");
    assert_eq!(
        session
            .negotiate_auth(PrivilegeLevel::User)
            .expect("first"),
        AuthType::None
    );
    assert_eq!(
        session
            .negotiate_auth(PrivilegeLevel::User)
            .expect("second"),
        AuthType::None
    );

    let seen = bmc.join().expect("bmc thread");
    let first = message::parse(&seen[0]).expect("parse");
    let second = message::parse(&seen[1]).expect("parse");
    assert_eq!(first.session.sequence, 0);
    assert_eq!(second.session.sequence, 1);
    assert_eq!(second.payload, vec![0x8E, 0x02]);
}

#[test]
fn no_usable_auth_type_leaves_state_unauthenticated() {
    let (host, bmc) = fake_bmc(1, |req| caps(req, 0x02));

    let mut session = Session::open(&host).expect("open");
    let mut negotiation = Negotiation::new();
    let err = negotiation
        .run(&mut session, PrivilegeLevel::Administrator)
        .unwrap_err();
    assert!(matches!(err, Error::NoSupportedAuthType));
    assert_eq!(negotiation, Negotiation::Unauthenticated);

    bmc.join().expect("bmc thread");
}

#[test]
fn completion_code_is_reported() {
    let (host, bmc) = fake_bmc(1, |req| req.reply(vec![0xC1]).expect("reply").to_bytes());

    let mut session = Session::open(&host).expect("open");
    let err = session
        .negotiate_auth(PrivilegeLevel::Administrator)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::CompletionCode(CompletionCode::INVALID_COMMAND)
    ));

    bmc.join().expect("bmc thread");
}

#[test]
fn authenticated_reply_is_unsupported() {
    let (host, bmc) = fake_bmc(1, |req| {
        let mut reply = req
            .reply(vec![0x00, 0x01, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00])
            .expect("reply");
        reply.session.auth_type = AuthType::Md5.as_u8();
        reply.to_bytes()
    });

    let mut session = Session::open(&host).expect("open");
    let err = session
        .negotiate_auth(PrivilegeLevel::Administrator)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAuth(0x02)));

    bmc.join().expect("bmc thread");
}

#[test]
fn corrupted_reply_is_invalid() {
    let (host, bmc) = fake_bmc(1, |req| {
        let mut bytes = caps(req, 0x04);
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        bytes
    });

    let mut session = Session::open(&host).expect("open");
    let err = session
        .negotiate_auth(PrivilegeLevel::Administrator)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPacket(_)));

    bmc.join().expect("bmc thread");
}

#[test]
fn silent_bmc_times_out() {
    let silent = UdpSocket::bind("127.0.0.1:0").expect("bind");
    let host = silent.local_addr().expect("addr").to_string();

    let mut session = Session::builder(host)
        .timeout(Duration::from_millis(100))
        .open()
        .expect("open");
    let err = session
        .negotiate_auth(PrivilegeLevel::Administrator)
        .unwrap_err();
    assert!(matches!(err, Error::Timeout));

    session.close();
    session.close();
    assert!(matches!(
        session.negotiate_auth(PrivilegeLevel::Administrator),
        Err(Error::Closed)
    ));
}
