use super::*;

#[test]
fn reexported_parse_command_is_reachable() {
    assert_eq!(parse_command("status;").unwrap(), Command::Status);
}
