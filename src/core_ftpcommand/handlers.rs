use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::utils::split_command;
use crate::core_ftpcommand::{
    allo, cdup, cwd, dele, list, mkd, mode, noop, pass, pwd, quit, rein, rest, retr, rmd, rnfr,
    rnto, site, size, stor, syst, type_, user,
};
use crate::core_network::{pasv, port};
use crate::server::ServerState;
use crate::session::Session;
use std::io;
use std::sync::Arc;

/// What the control loop does once a handler has replied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Continue,
    Close,
}

/// `Err` means the reply could not be written; the session is torn down.
pub type CommandResult = io::Result<CommandOutcome>;

pub const UNAUTHENTICATED_COMMANDS: &[FtpCommand] = &[
    FtpCommand::USER,
    FtpCommand::PASS,
    FtpCommand::QUIT,
    FtpCommand::REIN,
    FtpCommand::NOOP,
];

pub const AUTHENTICATED_COMMANDS: &[FtpCommand] = &[
    FtpCommand::USER,
    FtpCommand::PASS,
    FtpCommand::LIST,
    FtpCommand::PWD,
    FtpCommand::CWD,
    FtpCommand::CDUP,
    FtpCommand::SIZE,
    FtpCommand::PASV,
    FtpCommand::PORT,
    FtpCommand::TYPE,
    FtpCommand::SYST,
    FtpCommand::MODE,
    FtpCommand::RETR,
    FtpCommand::STOR,
    FtpCommand::APPE,
    FtpCommand::REST,
    FtpCommand::DELE,
    FtpCommand::MKD,
    FtpCommand::RMD,
    FtpCommand::RNFR,
    FtpCommand::RNTO,
    FtpCommand::NLST,
    FtpCommand::QUIT,
    FtpCommand::REIN,
    FtpCommand::SITE,
    FtpCommand::NOOP,
    FtpCommand::ALLO,
];

/// Looks the verb up in the table matching the session's login state and
/// runs its handler with the rest of the line.
pub async fn dispatch_command(
    session: &mut Session,
    state: &Arc<ServerState>,
    line: &str,
) -> CommandResult {
    let (verb, arg) = split_command(line);
    let table = if session.authenticated {
        AUTHENTICATED_COMMANDS
    } else {
        UNAUTHENTICATED_COMMANDS
    };

    let Some(command) = FtpCommand::from_str(&verb).filter(|command| table.contains(command)) else {
        if session.authenticated {
            session.reply(502, "Command not implemented.").await?;
        } else {
            session.reply(530, "Please login with USER and PASS.").await?;
        }
        return Ok(CommandOutcome::Continue);
    };

    let arg = arg.as_str();
    match command {
        FtpCommand::USER => user::handle_user_command(session, state, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(session, state, arg).await,
        FtpCommand::REIN => rein::handle_rein_command(session, state, arg).await,
        FtpCommand::QUIT => quit::handle_quit_command(session, state, arg).await,
        FtpCommand::SYST => syst::handle_syst_command(session, state, arg).await,
        FtpCommand::TYPE => type_::handle_type_command(session, state, arg).await,
        FtpCommand::MODE => mode::handle_mode_command(session, state, arg).await,
        FtpCommand::PWD => pwd::handle_pwd_command(session, state, arg).await,
        FtpCommand::CWD => cwd::handle_cwd_command(session, state, arg).await,
        FtpCommand::CDUP => cdup::handle_cdup_command(session, state, arg).await,
        FtpCommand::DELE => dele::handle_dele_command(session, state, arg).await,
        FtpCommand::RMD => rmd::handle_rmd_command(session, state, arg).await,
        FtpCommand::MKD => mkd::handle_mkd_command(session, state, arg).await,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(session, state, arg).await,
        FtpCommand::RNTO => rnto::handle_rnto_command(session, state, arg).await,
        FtpCommand::SIZE => size::handle_size_command(session, state, arg).await,
        FtpCommand::PASV => pasv::handle_pasv_command(session, state, arg).await,
        FtpCommand::PORT => port::handle_port_command(session, state, arg).await,
        FtpCommand::LIST => list::handle_list_command(session, state, arg).await,
        FtpCommand::NLST => list::handle_nlst_command(session, state, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(session, state, arg).await,
        FtpCommand::STOR => stor::handle_stor_command(session, state, arg).await,
        FtpCommand::APPE => stor::handle_appe_command(session, state, arg).await,
        FtpCommand::REST => rest::handle_rest_command(session, state, arg).await,
        FtpCommand::SITE => site::handle_site_command(session, state, arg).await,
        FtpCommand::NOOP => noop::handle_noop_command(session, state, arg).await,
        FtpCommand::ALLO => allo::handle_allo_command(session, state, arg).await,
    }
}
