use std::path::PathBuf;

/// A command-line operand classified as local or remote.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    /// A path on the local filesystem.
    Local(PathBuf),
    /// A `[user@]host:path` specification.
    Remote(RemoteOperand),
}

/// The parts of a `[user@]host:path` operand.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoteOperand {
    user: Option<String>,
    host: String,
    path: String,
}

impl RemoteOperand {
    /// Creates an operand from its parts.
    #[must_use]
    pub fn new(user: Option<&str>, host: &str, path: &str) -> Self {
        Self {
            user: user.map(str::to_owned),
            host: host.to_owned(),
            path: path.to_owned(),
        }
    }

    /// Login name, when one was given before `@`.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Host name or address without brackets.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Remote path; empty means the login directory.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Classifies `arg` the way `scp` does.
///
/// An operand is remote when it contains a colon that is not preceded by a
/// `/` and is not its first character. IPv6 addresses are written in
/// brackets (`[::1]:file`).
#[must_use]
pub fn parse_operand(arg: &str) -> Operand {
    let local = || Operand::Local(PathBuf::from(arg));

    let (user, rest) = match arg.find("@[") {
        Some(at) if !arg[..at].contains([':', '/']) => (Some(&arg[..at]), &arg[at + 1..]),
        _ => (None, arg),
    };
    if let Some(bracketed) = rest.strip_prefix('[') {
        let Some((host, after)) = bracketed.split_once(']') else {
            return local();
        };
        let Some(path) = after.strip_prefix(':') else {
            return local();
        };
        let user = user.filter(|user| !user.is_empty());
        return Operand::Remote(RemoteOperand::new(user, host, path));
    }

    let (login, path) = match arg.find([':', '/']) {
        Some(index) if index > 0 && arg.as_bytes()[index] == b':' => {
            (&arg[..index], &arg[index + 1..])
        }
        _ => return local(),
    };

    match login.rsplit_once('@') {
        Some((user, host)) if !host.is_empty() => {
            let user = (!user.is_empty()).then_some(user);
            Operand::Remote(RemoteOperand::new(user, host, path))
        }
        Some(_) => local(),
        None => Operand::Remote(RemoteOperand::new(None, login, path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(arg: &str) -> RemoteOperand {
        match parse_operand(arg) {
            Operand::Remote(remote) => remote,
            Operand::Local(path) => panic!("{arg} parsed as local path {}", path.display()),
        }
    }

    #[test]
    fn plain_paths_are_local() {
        assert_eq!(
            parse_operand("notes.txt"),
            Operand::Local(PathBuf::from("notes.txt"))
        );
        assert!(matches!(parse_operand("/tmp/a:b"), Operand::Local(_)));
        assert!(matches!(parse_operand("./a:b"), Operand::Local(_)));
        assert!(matches!(parse_operand(":leading"), Operand::Local(_)));
    }

    #[test]
    fn host_and_path() {
        let operand = remote("example.com:/var/log/syslog");
        assert_eq!(operand.user(), None);
        assert_eq!(operand.host(), "example.com");
        assert_eq!(operand.path(), "/var/log/syslog");
    }

    #[test]
    fn user_host_and_empty_path() {
        let operand = remote("backup@example.com:");
        assert_eq!(operand.user(), Some("backup"));
        assert_eq!(operand.host(), "example.com");
        assert_eq!(operand.path(), "");
    }

    #[test]
    fn path_may_contain_colons() {
        assert_eq!(remote("host:a:b").path(), "a:b");
    }

    #[test]
    fn bracketed_ipv6_hosts() {
        let operand = remote("[2001:db8::1]:data");
        assert_eq!(operand.host(), "2001:db8::1");
        assert_eq!(operand.path(), "data");

        let operand = remote("ops@[2001:db8::1]:data");
        assert_eq!(operand.user(), Some("ops"));
        assert_eq!(operand.host(), "2001:db8::1");
    }

    #[test]
    fn unterminated_bracket_is_local() {
        assert!(matches!(parse_operand("[2001:db8::1"), Operand::Local(_)));
    }
}
