use super::connection::{STDERR_LIMIT, append_capped};
use super::{RemoteShellParseError, SshCommand, SshShell, parse_remote_shell};
use crate::session::{RemoteSession, RemoteShell};
use std::ffi::{OsStr, OsString};
use std::io::{Read, Write};

fn args_to_strings(args: &[OsString]) -> Vec<String> {
    args.iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn assembles_minimal_command_with_batch_mode() {
    let command = SshCommand::new("example.com");
    let (program, args) = command.command_parts_for_testing();

    assert_eq!(program, OsString::from("ssh"));
    assert_eq!(
        args_to_strings(&args),
        vec!["-oBatchMode=yes".to_owned(), "example.com".to_owned()]
    );
}

#[test]
fn assembles_command_with_user_port_and_remote_args() {
    let mut command = SshCommand::new("files.example.com");
    command.set_user("backup");
    command.set_port(2222);
    command.push_option("-vvv");
    command.push_remote_arg("scp -f -q .");

    let (_, args) = command.command_parts_for_testing();

    assert_eq!(
        args_to_strings(&args),
        vec![
            "-oBatchMode=yes".to_owned(),
            "-p".to_owned(),
            "2222".to_owned(),
            "-vvv".to_owned(),
            "backup@files.example.com".to_owned(),
            "scp -f -q .".to_owned(),
        ]
    );
}

#[test]
fn disables_batch_mode_when_requested() {
    let mut command = SshCommand::new("example.com");
    command.set_batch_mode(false);

    let (_, args) = command.command_parts_for_testing();
    assert_eq!(args_to_strings(&args), vec!["example.com".to_owned()]);
}

#[test]
fn ipv6_hosts_are_passed_without_brackets() {
    let mut command = SshCommand::new("2001:db8::1");
    command.set_user("backup");

    let (_, args) = command.command_parts_for_testing();

    assert_eq!(
        args_to_strings(&args),
        vec![
            "-oBatchMode=yes".to_owned(),
            "backup@2001:db8::1".to_owned()
        ]
    );
}

#[test]
fn command_parts_skip_target_when_host_and_user_missing() {
    let mut command = SshCommand::new("");
    command.set_remote_command([OsString::from("scp")]);

    let (_, args) = command.command_parts_for_testing();

    assert_eq!(
        args_to_strings(&args),
        vec!["-oBatchMode=yes".to_owned(), "scp".to_owned()]
    );
}

#[test]
fn target_override_supersedes_computed_target() {
    let mut command = SshCommand::new("example.com");
    command.set_user("backup");
    command.set_target_override(Some("custom-target"));

    let (_, args) = command.command_parts_for_testing();

    assert_eq!(
        args_to_strings(&args),
        vec!["-oBatchMode=yes".to_owned(), "custom-target".to_owned()]
    );
}

#[test]
fn empty_target_override_suppresses_target_argument() {
    let mut command = SshCommand::new("example.com");
    command.set_target_override(Some(OsString::new()));
    command.push_remote_arg("scp");

    let (_, args) = command.command_parts_for_testing();

    assert_eq!(
        args_to_strings(&args),
        vec!["-oBatchMode=yes".to_owned(), "scp".to_owned()]
    );
}

#[cfg(unix)]
fn local_shell() -> SshShell {
    let mut command = SshCommand::new("ignored");
    command.set_program("sh");
    command.set_batch_mode(false);
    command.set_target_override(Some(OsString::new()));
    command.push_option("-c");
    SshShell::new(command)
}

#[cfg(unix)]
#[test]
fn spawned_connection_forwards_io() {
    let mut connection = local_shell().exec("cat").expect("spawn cat");

    connection.write_all(b"abc").expect("write payload");
    connection.flush().expect("flush payload");

    let mut buffer = [0u8; 3];
    connection.read_exact(&mut buffer).expect("read echo");
    assert_eq!(&buffer, b"abc");

    connection.close().expect("close");
    assert_eq!(connection.exit_status(), Some(0));
    assert_eq!(connection.exit_signal(), None);
}

#[cfg(unix)]
#[test]
fn stderr_is_captured_in_background() {
    let mut connection = local_shell()
        .exec("printf 'scp: no such file\\n' >&2; exit 1")
        .expect("spawn shell");

    let mut rest = Vec::new();
    connection.read_to_end(&mut rest).expect("drain stdout");
    connection.close().expect("close");

    assert!(rest.is_empty());
    assert_eq!(connection.stderr_text(), "scp: no such file");
    assert_eq!(connection.exit_status(), Some(1));
}

#[test]
fn stderr_buffer_keeps_the_most_recent_bytes() {
    let mut buffer = Vec::new();
    append_capped(&mut buffer, b"abcd", 6);
    append_capped(&mut buffer, b"efgh", 6);
    assert_eq!(buffer, b"cdefgh");

    append_capped(&mut buffer, b"0123456789", 6);
    assert_eq!(buffer, b"456789");

    append_capped(&mut buffer, b"", 6);
    assert_eq!(buffer, b"456789");
}

#[cfg(unix)]
#[test]
fn chatty_stderr_is_capped() {
    let mut connection = local_shell()
        .exec("i=0; while [ $i -lt 2000 ]; do printf '%064d\\n' $i >&2; i=$((i+1)); done; printf 'scp: final\\n' >&2")
        .expect("spawn shell");

    let mut rest = Vec::new();
    connection.read_to_end(&mut rest).expect("drain stdout");
    connection.close().expect("close");

    let text = connection.stderr_text();
    assert!(text.len() <= STDERR_LIMIT, "{}", text.len());
    assert!(text.ends_with("scp: final"), "{}", &text[text.len().saturating_sub(40)..]);
    assert!(!text.starts_with("0000000000000000000000000000000000000000000000000000000000000000\n"));
}

#[cfg(unix)]
#[test]
fn close_is_idempotent() {
    let mut connection = local_shell().exec("exit 3").expect("spawn shell");
    connection.close().expect("first close");
    connection.close().expect("second close");
    assert_eq!(connection.exit_status(), Some(3));
}

#[cfg(unix)]
#[test]
fn killed_process_reports_signal() {
    let mut connection = local_shell().exec("kill -TERM $$").expect("spawn shell");
    connection.close().expect("close");
    assert_eq!(connection.exit_status(), None);
    assert_eq!(connection.exit_signal().as_deref(), Some("SIGTERM"));
}

#[test]
fn configure_remote_shell_updates_program_and_options() {
    let mut command = SshCommand::new("example.com");
    command
        .configure_remote_shell(OsStr::new("ssh -p 2222"))
        .expect("configure succeeds");

    let (program, args) = command.command_parts_for_testing();
    assert_eq!(program, OsString::from("ssh"));
    assert!(args.contains(&OsString::from("-p")));
    assert!(args.contains(&OsString::from("2222")));
}

#[test]
fn parse_remote_shell_with_multiple_options() {
    let spec = OsStr::new("ssh -p 2222 -o StrictHostKeyChecking=no");
    let args = parse_remote_shell(spec).expect("parsing should succeed");

    assert_eq!(
        args_to_strings(&args),
        vec!["ssh", "-p", "2222", "-o", "StrictHostKeyChecking=no"]
    );
}

#[test]
fn parse_remote_shell_with_quoted_arguments() {
    let spec = OsStr::new("ssh -i '/path/with spaces/key' -p 2222");
    let args = parse_remote_shell(spec).expect("parsing should succeed");

    assert_eq!(
        args_to_strings(&args),
        vec!["ssh", "-i", "/path/with spaces/key", "-p", "2222"]
    );
}

#[test]
fn parse_remote_shell_handles_double_quote_escapes() {
    let spec = OsStr::new(r#"ssh -o "ProxyCommand=nc \"%h\" %p""#);
    let args = parse_remote_shell(spec).expect("parsing should succeed");

    assert_eq!(args_to_strings(&args)[2], r#"ProxyCommand=nc "%h" %p"#);
}

#[test]
fn parse_remote_shell_preserves_empty_strings() {
    let spec = OsStr::new("ssh -o 'Option='");
    let args = parse_remote_shell(spec).expect("parsing should succeed");

    assert_eq!(args_to_strings(&args), vec!["ssh", "-o", "Option="]);

    let args = parse_remote_shell(OsStr::new("ssh ''")).expect("parsing should succeed");
    assert_eq!(args_to_strings(&args), vec!["ssh", ""]);
}

#[test]
fn parse_remote_shell_handles_multiple_spaces() {
    let spec = OsStr::new("ssh   -p    2222");
    let args = parse_remote_shell(spec).expect("parsing should succeed");

    assert_eq!(args_to_strings(&args), vec!["ssh", "-p", "2222"]);
}

#[test]
fn parse_remote_shell_rejects_bad_input() {
    assert_eq!(
        parse_remote_shell(OsStr::new("   ")),
        Err(RemoteShellParseError::Empty)
    );
    assert_eq!(
        parse_remote_shell(OsStr::new("ssh 'open")),
        Err(RemoteShellParseError::UnterminatedQuote('\''))
    );
    assert_eq!(
        parse_remote_shell(OsStr::new("ssh \\")),
        Err(RemoteShellParseError::DanglingEscape)
    );
}
