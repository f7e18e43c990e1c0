//! Host environment lookups
//!
//! Invocations never go through a shell, so the pieces a shell used to
//! provide (`whoami`, `$(id -u)`, `$HOME`) are looked up here.

use std::env;

#[cfg(unix)]
use nix::unistd::{self, Uid, User};

/// Name of the user running the process.
///
/// Reads the password database first and falls back to `$USER`.
pub fn current_user() -> String {
    #[cfg(unix)]
    {
        if let Ok(Some(user)) = User::from_uid(Uid::current()) {
            if !user.name.is_empty() {
                return user.name;
            }
        }
    }

    env::var("USER")
        .or_else(|_| env::var("USERNAME"))
        .unwrap_or_default()
}

/// Real user and group id of the process
pub fn uid_gid() -> (u32, u32) {
    #[cfg(unix)]
    {
        (unistd::getuid().as_raw(), unistd::getgid().as_raw())
    }

    #[cfg(not(unix))]
    {
        (0, 0)
    }
}

/// Expand `$VAR`, `${VAR}` and a leading `~` from the process environment
pub fn expand(value: &str) -> String {
    expand_with(value, |name| env::var(name).ok())
}

/// Expand `$VAR`, `${VAR}` and a leading `~` using `lookup`.
///
/// Unset variables expand to an empty string, as in a POSIX shell.
/// A `$` not followed by a variable name is kept literally.
pub fn expand_with<F>(value: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    if rest == "~" || rest.starts_with("~/") {
        out.push_str(&lookup("HOME").unwrap_or_default());
        rest = &rest[1..];
    }

    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let tail = &rest[i + 1..];
        if let Some(braced) = tail.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&lookup(&braced[..end]).unwrap_or_default());
                // skip `{name}`
                for _ in 0..braced[..end].chars().count() + 2 {
                    chars.next();
                }
                continue;
            }
        }

        let len = tail
            .char_indices()
            .take_while(|(j, ch)| {
                (ch.is_ascii_alphanumeric() && !(*j == 0 && ch.is_ascii_digit())) || *ch == '_'
            })
            .count();
        if len == 0 {
            out.push('$');
            continue;
        }
        out.push_str(&lookup(&tail[..len]).unwrap_or_default());
        for _ in 0..len {
            chars.next();
        }
    }

    out
}
