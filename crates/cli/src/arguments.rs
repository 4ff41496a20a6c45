//! crates/cli/src/arguments.rs
//!
//! `clap` definition and the parsed form of the `oc-scp` command line.

use std::ffi::OsString;

use clap::{Arg, ArgAction, Command, builder::OsStringValueParser, value_parser};

/// Parsed command-line switches and operands.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ParsedArgs {
    pub(crate) show_help: bool,
    pub(crate) show_version: bool,
    pub(crate) recursive: bool,
    pub(crate) preserve_times: bool,
    pub(crate) quiet: bool,
    pub(crate) verbose: u8,
    pub(crate) port: Option<u16>,
    pub(crate) identity: Option<OsString>,
    pub(crate) ssh_options: Vec<OsString>,
    pub(crate) ssh_program: Option<OsString>,
    pub(crate) remote_shell: Option<OsString>,
    pub(crate) operands: Vec<OsString>,
}

/// Builds the `clap` command used for parsing.
fn clap_command() -> Command {
    Command::new("oc-scp")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("version")
                .long("version")
                .short('V')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preserve")
                .short('p')
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("quiet").short('q').action(ArgAction::SetTrue))
        .arg(Arg::new("verbose").short('v').action(ArgAction::Count))
        .arg(
            Arg::new("port")
                .short('P')
                .value_name("PORT")
                .action(ArgAction::Set)
                .value_parser(value_parser!(u16)),
        )
        .arg(
            Arg::new("identity")
                .short('i')
                .value_name("IDENTITY")
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("ssh-option")
                .short('o')
                .value_name("SSH_OPTION")
                .action(ArgAction::Append)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("program")
                .short('S')
                .value_name("PROGRAM")
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("rsh")
                .short('e')
                .long("rsh")
                .value_name("SHELL")
                .action(ArgAction::Set)
                .value_parser(OsStringValueParser::new()),
        )
        .arg(
            Arg::new("operands")
                .action(ArgAction::Append)
                .num_args(0..)
                .value_parser(OsStringValueParser::new()),
        )
}

/// Parses command-line arguments into a [`ParsedArgs`] structure.
pub(crate) fn parse_args<I, S>(arguments: I) -> Result<ParsedArgs, clap::Error>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let mut args: Vec<OsString> = arguments.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from("oc-scp"));
    }

    let mut matches = clap_command().try_get_matches_from(args)?;

    Ok(ParsedArgs {
        show_help: matches.get_flag("help"),
        show_version: matches.get_flag("version"),
        recursive: matches.get_flag("recursive"),
        preserve_times: matches.get_flag("preserve"),
        quiet: matches.get_flag("quiet"),
        verbose: matches.get_count("verbose"),
        port: matches.remove_one::<u16>("port"),
        identity: matches.remove_one::<OsString>("identity"),
        ssh_options: matches
            .remove_many::<OsString>("ssh-option")
            .map(Iterator::collect)
            .unwrap_or_default(),
        ssh_program: matches.remove_one::<OsString>("program"),
        remote_shell: matches.remove_one::<OsString>("rsh"),
        operands: matches
            .remove_many::<OsString>("operands")
            .map(Iterator::collect)
            .unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_invocation_has_defaults() {
        let parsed = parse_args(Vec::<OsString>::new()).expect("parse");
        assert_eq!(parsed, ParsedArgs::default());
    }

    #[test]
    fn recognises_transfer_switches() {
        let parsed = parse_args([
            "oc-scp", "-r", "-p", "-q", "-vv", "-P", "2222", "-i", "key", "-o",
            "Compression=yes", "-o", "ConnectTimeout=5", "-S", "/opt/ssh", "src",
            "host:dst",
        ])
        .expect("parse");

        assert!(parsed.recursive);
        assert!(parsed.preserve_times);
        assert!(parsed.quiet);
        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.port, Some(2222));
        assert_eq!(parsed.identity, Some(OsString::from("key")));
        assert_eq!(
            parsed.ssh_options,
            vec![
                OsString::from("Compression=yes"),
                OsString::from("ConnectTimeout=5")
            ]
        );
        assert_eq!(parsed.ssh_program, Some(OsString::from("/opt/ssh")));
        assert_eq!(
            parsed.operands,
            vec![OsString::from("src"), OsString::from("host:dst")]
        );
    }

    #[test]
    fn combined_short_flags_are_split() {
        let parsed = parse_args(["oc-scp", "-rpv", "a", "b"]).expect("parse");
        assert!(parsed.recursive);
        assert!(parsed.preserve_times);
        assert_eq!(parsed.verbose, 1);
    }

    #[test]
    fn remote_shell_is_kept_verbatim() {
        let parsed =
            parse_args(["oc-scp", "-e", "ssh -p 2222 -o 'User=backup'", "a", "b"]).expect("parse");
        assert_eq!(
            parsed.remote_shell,
            Some(OsString::from("ssh -p 2222 -o 'User=backup'"))
        );
    }

    #[test]
    fn rejects_invalid_port() {
        assert!(parse_args(["oc-scp", "-P", "http", "a", "b"]).is_err());
        assert!(parse_args(["oc-scp", "-P", "70000", "a", "b"]).is_err());
    }

    #[test]
    fn rejects_unknown_switches() {
        assert!(parse_args(["oc-scp", "--delete", "a", "b"]).is_err());
    }
}
