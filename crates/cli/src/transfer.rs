//! crates/cli/src/transfer.rs
//!
//! Turns parsed operands into a copy direction and an `ssh` invocation.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use scp_io::{Operand, RemoteOperand, RemoteShellParseError, SshCommand, parse_operand};

use crate::arguments::ParsedArgs;

/// Direction of a single copy.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Transfer {
    Download { remote: RemoteOperand, local: PathBuf },
    Upload { local: PathBuf, remote: RemoteOperand },
}

/// Reasons a pair of operands cannot be copied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum OperandError {
    Count(usize),
    BothLocal,
    BothRemote,
}

impl fmt::Display for OperandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(0) => f.write_str("missing source and target operands"),
            Self::Count(1) => f.write_str("missing target operand"),
            Self::Count(count) => {
                write!(f, "expected exactly two operands, found {count}")
            }
            Self::BothLocal => f.write_str("one operand must be remote ([user@]host:path)"),
            Self::BothRemote => f.write_str("remote-to-remote copies are not supported"),
        }
    }
}

fn classify(operand: &OsString) -> Operand {
    match operand.to_str() {
        Some(text) => parse_operand(text),
        None => Operand::Local(PathBuf::from(operand)),
    }
}

impl Transfer {
    pub(crate) fn from_operands(operands: &[OsString]) -> Result<Self, OperandError> {
        let [source, target] = operands else {
            return Err(OperandError::Count(operands.len()));
        };

        match (classify(source), classify(target)) {
            (Operand::Remote(remote), Operand::Local(local)) => {
                Ok(Self::Download { remote, local })
            }
            (Operand::Local(local), Operand::Remote(remote)) => Ok(Self::Upload { local, remote }),
            (Operand::Local(_), Operand::Local(_)) => Err(OperandError::BothLocal),
            (Operand::Remote(_), Operand::Remote(_)) => Err(OperandError::BothRemote),
        }
    }

    pub(crate) const fn remote(&self) -> &RemoteOperand {
        match self {
            Self::Download { remote, .. } | Self::Upload { remote, .. } => remote,
        }
    }

    /// Path handed to the remote `scp`; an empty path names the login directory.
    pub(crate) fn remote_path(&self) -> &str {
        match self.remote().path() {
            "" => ".",
            path => path,
        }
    }
}

/// Builds the `ssh` template for `remote` from the connection switches.
pub(crate) fn ssh_command(
    parsed: &ParsedArgs,
    remote: &RemoteOperand,
) -> Result<SshCommand, RemoteShellParseError> {
    let mut command = SshCommand::new(remote.host());
    if let Some(shell) = &parsed.remote_shell {
        command.configure_remote_shell(shell)?;
    }
    if let Some(program) = &parsed.ssh_program {
        command.set_program(program.clone());
    }
    if let Some(user) = remote.user() {
        command.set_user(user);
    }
    if let Some(port) = parsed.port {
        command.set_port(port);
    }
    if let Some(identity) = &parsed.identity {
        command.push_option("-i").push_option(identity.clone());
    }
    for option in &parsed.ssh_options {
        command.push_option("-o").push_option(option.clone());
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operands(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[test]
    fn remote_source_is_a_download() {
        let transfer = Transfer::from_operands(&operands(&["deploy@web1:logs", "out"]))
            .expect("valid operands");
        assert_eq!(
            transfer,
            Transfer::Download {
                remote: RemoteOperand::new(Some("deploy"), "web1", "logs"),
                local: PathBuf::from("out"),
            }
        );
        assert_eq!(transfer.remote_path(), "logs");
    }

    #[test]
    fn remote_target_is_an_upload() {
        let transfer =
            Transfer::from_operands(&operands(&["site", "web1:"])).expect("valid operands");
        assert!(matches!(transfer, Transfer::Upload { .. }));
        assert_eq!(transfer.remote().host(), "web1");
        assert_eq!(transfer.remote_path(), ".");
    }

    #[test]
    fn operand_shapes_are_validated() {
        assert_eq!(
            Transfer::from_operands(&operands(&["a"])),
            Err(OperandError::Count(1))
        );
        assert_eq!(
            Transfer::from_operands(&operands(&["a", "b", "c"])),
            Err(OperandError::Count(3))
        );
        assert_eq!(
            Transfer::from_operands(&operands(&["a", "./b:c"])),
            Err(OperandError::BothLocal)
        );
        assert_eq!(
            Transfer::from_operands(&operands(&["h1:a", "h2:b"])),
            Err(OperandError::BothRemote)
        );
    }

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            OperandError::Count(0).to_string(),
            "missing source and target operands"
        );
        assert!(OperandError::BothLocal.to_string().contains("remote"));
    }

    #[test]
    fn ssh_template_carries_connection_switches() {
        let parsed = ParsedArgs {
            port: Some(2222),
            identity: Some(OsString::from("id_test")),
            ssh_options: vec![OsString::from("Compression=yes")],
            ssh_program: Some(OsString::from("/opt/bin/ssh")),
            ..ParsedArgs::default()
        };
        let remote = RemoteOperand::new(Some("ops"), "db1", "/srv");
        let command = ssh_command(&parsed, &remote).expect("command");
        let rendered = format!("{command:?}");

        assert!(rendered.contains("/opt/bin/ssh"), "{rendered}");
        assert!(rendered.contains("2222"), "{rendered}");
        assert!(rendered.contains("id_test"), "{rendered}");
        assert!(rendered.contains("Compression=yes"), "{rendered}");
        assert!(rendered.contains("ops"), "{rendered}");
    }

    #[test]
    fn malformed_remote_shell_is_rejected() {
        let parsed = ParsedArgs {
            remote_shell: Some(OsString::from("ssh -o 'unterminated")),
            ..ParsedArgs::default()
        };
        let remote = RemoteOperand::new(None, "db1", "");
        assert!(ssh_command(&parsed, &remote).is_err());
    }
}
