// Here's the list of the FTP commands implemented
pub mod allo;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod list;
pub mod mkd;
pub mod mode;
pub mod noop;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod rein;
pub mod rest;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod site;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

pub mod ftpcommand;
pub mod handlers;

// The utils and common functions are here
pub mod utils;
