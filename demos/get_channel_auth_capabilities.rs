use ipmi_lan::{DEFAULT_PORT, Negotiation, PrivilegeLevel, Session};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example:
    //   cargo run --example get_channel_auth_capabilities -- 192.168.1.10:623 admin
    let mut args = std::env::args().skip(1);
    let host = args.next().ok_or("missing <host:port>")?;
    let privilege_str = args.next().unwrap_or_else(|| "admin".to_string());

    let host = if host.contains(':') {
        host
    } else {
        format!("{host}:{DEFAULT_PORT}")
    };
    let privilege = parse_privilege(&privilege_str)?;

    let mut session = Session::open(&host)?;
    let mut negotiation = Negotiation::new();
    let auth_type = negotiation.run(&mut session, privilege)?;

    if let Some(caps) = negotiation.capabilities() {
        println!("Channel Auth Capabilities: {caps:?}");
    }
    println!("Preferred auth type: {auth_type:?}");

    session.close();
    Ok(())
}

fn parse_privilege(s: &str) -> Result<PrivilegeLevel, Box<dyn std::error::Error>> {
    let value = s.to_ascii_lowercase();
    match value.as_str() {
        "admin" | "administrator" => Ok(PrivilegeLevel::Administrator),
        "operator" | "oper" => Ok(PrivilegeLevel::Operator),
        "user" => Ok(PrivilegeLevel::User),
        "callback" => Ok(PrivilegeLevel::Callback),
        "oem" => Ok(PrivilegeLevel::Oem),
        _ => Err("invalid privilege (admin|operator|user|callback|oem)".into()),
    }
}
