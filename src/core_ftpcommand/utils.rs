use crate::core_vfs::VfsError;
use crate::session::Session;
use std::io;

/// Splits `s` on `sep` into exactly `maxsplit + 1` fields.
///
/// The first `maxsplit` fields are single words, separators before them are
/// skipped. The last field is the remainder with internal separators kept and
/// leading and trailing ones trimmed. Missing fields are empty strings.
pub fn split(s: &str, sep: char, maxsplit: usize) -> Vec<String> {
    let mut parts = Vec::with_capacity(maxsplit + 1);
    let mut rest = s;
    while parts.len() < maxsplit {
        rest = rest.trim_start_matches(sep);
        if rest.is_empty() {
            break;
        }
        let end = rest.find(sep).unwrap_or(rest.len());
        parts.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    parts.push(rest.trim_matches(sep).to_string());
    parts.resize(maxsplit + 1, String::new());
    parts
}

/// Splits a command line into its verb and argument.
pub fn split_command(line: &str) -> (String, String) {
    let mut parts = split(line, ' ', 1).into_iter();
    let verb = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or_default();
    (verb, arg)
}

/// Text sent after a `550`, without the OS error number.
pub fn describe_error(error: &VfsError) -> String {
    let text = error.to_string();
    match text.find(" (os error") {
        Some(end) => text[..end].to_string(),
        None => text,
    }
}

pub async fn reply_with_error(session: &mut Session, error: &VfsError) -> io::Result<()> {
    session.reply(550, &describe_error(error)).await
}
