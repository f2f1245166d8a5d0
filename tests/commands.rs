use ipmi_lan::commands::{Command, GetChannelAuthCapabilities};
use ipmi_lan::message::{self, REQUEST_MESSAGE_LEN};
use ipmi_lan::{CommandCode, CompletionCode, Error, NetFn, PrivilegeLevel};

#[test]
fn get_channel_auth_capabilities_encodes_request_data() {
    let cmd = GetChannelAuthCapabilities::new(0x02, PrivilegeLevel::Administrator);
    assert_eq!(cmd.request_data(), vec![0x82, 0x04]);

    let cmd = cmd.without_v2_data();
    assert_eq!(cmd.request_data(), vec![0x02, 0x04]);
}

#[test]
fn reference_request_bytes() {
    let cmd = GetChannelAuthCapabilities::current_channel(PrivilegeLevel::Administrator);
    let bytes = message::build(&cmd.to_request(), 0, 0);
    assert_eq!(
        bytes,
        vec![
            0x06, 0x00, 0xFF, 0x07, // rmcp
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // session
            0x09, 0x20, 0x18, 0xC8, 0x81, 0x00, 0x38, // message header
            0x8E, 0x04, // channel selector, privilege
            0xB5, // checksum
        ]
    );
    assert_eq!(bytes[13], REQUEST_MESSAGE_LEN);
}

#[test]
fn built_request_parses_back() {
    let cmd = GetChannelAuthCapabilities::current_channel(PrivilegeLevel::Operator);
    let request = cmd.to_request();
    let parsed = message::parse(&message::build(&request, 3, 0)).expect("parse");

    assert_eq!(parsed.rmcp.class, 0x07);
    assert_eq!(parsed.session.sequence, 3);
    assert_eq!(parsed.header.netfn(), NetFn::App.as_u8());
    assert_eq!(
        parsed.header.command,
        CommandCode::GetChannelAuthCapabilities.as_u8()
    );
    assert_eq!(parsed.payload, request.data);
}

#[test]
fn auth_capabilities_response_parses() {
    let cmd = GetChannelAuthCapabilities::current_channel(PrivilegeLevel::Administrator);
    let caps = cmd
        .parse_response(&[0x00, 0x0E, 0x15, 0x1F, 0x00, 0xA2, 0x02, 0x09])
        .expect("parse");

    assert_eq!(caps.channel_number, 0x0E);
    assert_eq!(caps.oem_id, 0x02A2);
    assert_eq!(caps.oem_aux, 0x09);
    assert!(caps.per_message_auth_disabled());
    assert!(caps.user_level_auth_disabled());
    assert!(caps.null_usernames());
    assert!(caps.anonymous_login_enabled());
}

#[test]
fn completion_code_is_reported() {
    let cmd = GetChannelAuthCapabilities::current_channel(PrivilegeLevel::Administrator);
    let err = cmd.parse_response(&[0xD4]).expect_err("expected error");
    assert!(matches!(
        err,
        Error::CompletionCode(CompletionCode::INSUFFICIENT_PRIVILEGE)
    ));
}
