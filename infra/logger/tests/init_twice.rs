use evroute_logger::{Logger, LoggerError};

#[test]
fn second_init_fails_with_subscriber_error() {
    let _logger = Logger::builder().name("integration-first").init().expect("first init succeeds");

    let err = Logger::builder()
        .name("integration-second")
        .init()
        .expect_err("second init should fail");

    assert!(matches!(err, LoggerError::Subscriber { .. }), "{err}");
}
