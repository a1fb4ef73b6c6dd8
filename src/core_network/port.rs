use crate::constants::PORT_ARGUMENT_PATTERN;
use crate::core_ftpcommand::handlers::{CommandOutcome, CommandResult};
use crate::server::ServerState;
use crate::session::Session;
use log::info;
use regex::Regex;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::sync::{Arc, OnceLock};

fn port_argument_regex() -> &'static Regex {
    static PORT_ARGUMENT: OnceLock<Regex> = OnceLock::new();
    PORT_ARGUMENT.get_or_init(|| {
        Regex::new(PORT_ARGUMENT_PATTERN).expect("PORT_ARGUMENT_PATTERN is a valid regex")
    })
}

/// Parses `h1,h2,h3,h4,p1,p2`. Host octets must fit a byte; only the low byte
/// of each port number counts.
pub fn parse_port_argument(arg: &str) -> Option<SocketAddrV4> {
    let caps = port_argument_regex().captures(arg.trim())?;
    let mut numbers = [0u16; 6];
    for (i, number) in numbers.iter_mut().enumerate() {
        *number = caps.get(i + 1)?.as_str().parse().ok()?;
    }

    let [h1, h2, h3, h4, p1, p2] = numbers;
    let octet = |n: u16| u8::try_from(n).ok();
    let ip = Ipv4Addr::new(octet(h1)?, octet(h2)?, octet(h3)?, octet(h4)?);
    let port = ((p1 & 0xff) << 8) | (p2 & 0xff);
    Some(SocketAddrV4::new(ip, port))
}

/// Handles the PORT (Active Mode) FTP command.
///
/// Only the target is recorded; the connection is made when a transfer is
/// bound.
pub async fn handle_port_command(
    session: &mut Session,
    _state: &Arc<ServerState>,
    arg: &str,
) -> CommandResult {
    let Some(target) = parse_port_argument(arg) else {
        session.reply(501, "Syntax error in parameters.").await?;
        return Ok(CommandOutcome::Continue);
    };

    session.data.set_active_target(SocketAddr::V4(target));
    info!("Session {}: set client address to {}", session.id, target);
    session.reply(200, "PORT command successful.").await?;
    Ok(CommandOutcome::Continue)
}
