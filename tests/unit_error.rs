use std::path::PathBuf;

use todo::error::{exit_codes, Error, JsonError};
use todo::validate::validate_task_input;

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::TaskNotFound("01abc".to_string());
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let lock = Error::LockFailed(PathBuf::from(".todo.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);

    let write = Error::PersistenceWriteFailed {
        key: "todo-tasks".to_string(),
        reason: "disk full".to_string(),
    };
    assert_eq!(write.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn validation_errors_are_user_errors_with_details() {
    let err = validate_task_input("", "ok").expect_err("invalid");
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);

    let json = JsonError::from(&err);
    assert!(json.error.contains("Task name is required"));
    let details = json.details.expect("details");
    assert_eq!(details["issues"][0], "name_required");
}

#[test]
fn ambiguous_id_lists_matches() {
    let err = Error::AmbiguousTaskId {
        input: "01".to_string(),
        matches: vec!["01a".to_string(), "01b".to_string()],
    };
    assert_eq!(err.to_string(), "Ambiguous task id '01': 01a, 01b");
    let json = JsonError::from(&err);
    assert_eq!(json.code, exit_codes::USER_ERROR);
}
