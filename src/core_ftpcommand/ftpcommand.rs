#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    REIN,
    QUIT,
    SYST,
    TYPE,
    MODE,
    PWD,
    CWD,
    CDUP,
    DELE,
    RMD,
    MKD,
    RNFR,
    RNTO,
    SIZE,
    PASV,
    PORT,
    LIST,
    NLST,
    RETR,
    STOR,
    APPE,
    REST,
    SITE,
    NOOP,
    ALLO,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "REIN" => Some(FtpCommand::REIN),
            "QUIT" => Some(FtpCommand::QUIT),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            "MODE" => Some(FtpCommand::MODE),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "DELE" => Some(FtpCommand::DELE),
            "RMD" => Some(FtpCommand::RMD),
            "MKD" => Some(FtpCommand::MKD),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "SIZE" => Some(FtpCommand::SIZE),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "APPE" => Some(FtpCommand::APPE),
            "REST" => Some(FtpCommand::REST),
            "SITE" => Some(FtpCommand::SITE),
            "NOOP" => Some(FtpCommand::NOOP),
            "ALLO" => Some(FtpCommand::ALLO),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbs_are_case_insensitive() {
        assert_eq!(FtpCommand::from_str("noop"), Some(FtpCommand::NOOP));
        assert_eq!(FtpCommand::from_str("Rnfr"), Some(FtpCommand::RNFR));
        assert_eq!(FtpCommand::from_str("FEAT"), None);
        assert_eq!(FtpCommand::from_str(""), None);
    }
}
