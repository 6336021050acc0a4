use agent_log::log::{Logger, MemorySink, Severity, install_facade};
use std::sync::Arc;

static LOGGER: Logger = Logger::new();

#[test]
fn log_macros_route_through_the_logger() {
    let sink = Arc::new(MemorySink::new());
    LOGGER.open_with_sink(sink.clone(), Severity::Warning);
    install_facade(&LOGGER).unwrap();

    log::error!("e{}", 1);
    log::warn!("w");
    log::debug!("d");
    log::trace!("t");
    log::info!("i");

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].ends_with(" e1"));
    assert!(lines[1].ends_with(" w"));
    assert!(lines[2].ends_with(" i"));

    assert!(log::log_enabled!(log::Level::Warn));
    assert!(!log::log_enabled!(log::Level::Debug));

    LOGGER.increase_verbosity();
    log::debug!("d2");
    assert!(sink.lines().last().unwrap().ends_with(" d2"));

    // Only one logger per process.
    assert!(install_facade(&LOGGER).is_err());
}
