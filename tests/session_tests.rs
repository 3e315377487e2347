// Session, resource directory and registry behaviour

use std::io::{self, Read, Write};
use std::sync::Arc;

use kbf::config::{MachineConfig, WritePolicy};
use kbf::memory::Region;
use kbf::session::registry::SessionRegistry;
use kbf::session::resource::{Mode, DEFAULT_DIR};
use kbf::session::shared::SharedSession;
use kbf::session::{Resource, ResourceDir, ResourceError, RunOutcome, Session};

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct LogBuffer(Arc<parking_lot::Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with `info!` and above captured into the returned buffer
fn capture_logs(f: impl FnOnce()) -> String {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    logs.contents()
}

/// Reader that fails after yielding a few bytes
struct FailingReader {
    sent: bool,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.sent {
            return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
        }
        self.sent = true;
        let n = buf.len().min(3);
        buf[..n].copy_from_slice(&b"+++"[..n]);
        Ok(n)
    }
}

#[test]
fn test_repeated_reads_do_not_rerun() {
    let mut session = Session::default();
    session.write_program(b",.,.").unwrap();
    session.write_input(b"AB").unwrap();

    let first = session.read_output().bytes.to_vec();
    let second = session.read_output();

    assert_eq!(first, b"AB");
    assert_eq!(second.bytes, first.as_slice());
    assert!(!second.recomputed);
    assert_eq!(session.run_count(), 1);
}

#[test]
fn test_identical_write_still_invalidates() {
    let mut session = Session::default();
    session.write_program(b"+.").unwrap();
    session.read_output();

    session.write_program(b"+.").unwrap();
    assert!(session.is_dirty());

    let view = session.read_output();
    assert!(view.recomputed);
    assert_eq!(view.bytes, &[1]);
    assert_eq!(session.run_count(), 2);
}

#[test]
fn test_input_write_invalidates() {
    let mut session = Session::default();
    session.write_program(b",.").unwrap();
    session.write_input(b"x").unwrap();
    assert_eq!(session.read_output().bytes, b"x");

    session.write_input(b"y").unwrap();
    assert_eq!(session.read_output().bytes, b"y");
    assert_eq!(session.run_count(), 2);
}

#[test]
fn test_reading_program_and_input_never_runs() {
    let mut session = Session::default();
    session.write_program(b"+.").unwrap();
    session.write_input(b"abc").unwrap();

    assert_eq!(session.read_program(), b"+.");
    assert_eq!(session.read_input(), b"abc");
    assert_eq!(session.run_count(), 0);
    assert!(session.last_run().is_none());
}

#[test]
fn test_oversize_write_truncates() {
    let mut config = MachineConfig::default();
    config.code_capacity = 4;
    let mut session = Session::new(config).unwrap();

    let stored = session.write_program(b"+++++.").unwrap();

    assert_eq!(stored, 4);
    assert_eq!(session.read_program(), b"++++");
}

#[test]
fn test_oversize_write_rejected() {
    let mut config = MachineConfig::default().with_oversize_writes(WritePolicy::Reject);
    config.input_capacity = 2;
    let mut session = Session::new(config).unwrap();
    session.write_input(b"ok").unwrap();
    session.read_output();

    let err = session.write_input(b"too long").unwrap_err();

    assert_eq!(err.region, Region::Input);
    assert_eq!(err.requested, 8);
    assert_eq!(session.read_input(), b"ok");
    assert!(!session.is_dirty());
}

#[test]
fn test_failure_reported_with_output() {
    let mut session = Session::default();
    session.write_program(b"[+").unwrap();

    let view = session.read_output();

    assert_eq!(view.bytes, b"");
    assert_eq!(view.outcome, RunOutcome::UnmatchedBracket { position: 0 });

    // The session stays usable after a failed run
    session.write_program(b"+.").unwrap();
    assert_eq!(session.read_output().outcome, RunOutcome::Completed);
}

#[test]
fn test_budget_outcome_and_snapshot() {
    let config = MachineConfig::default().with_budget(100);
    let mut session = Session::new(config).unwrap();
    session.write_program(b"+[+]").unwrap();

    let view = session.read_output();
    assert_eq!(view.outcome, RunOutcome::BudgetExhausted);
    assert_eq!(view.ops_used, 100);

    let snapshot = session.last_run().unwrap();
    assert_eq!(snapshot.run_index, 1);
    assert_eq!(snapshot.budget, 100);
    assert_eq!(snapshot.open_loops, vec![1]);
    assert_eq!(snapshot.cursors.cell_ptr, 0);
}

#[test]
fn test_output_overflow_outcome() {
    let config = MachineConfig::default().with_output_capacity(3);
    let mut session = Session::new(config).unwrap();
    session.write_program(b"+[.]").unwrap();

    let view = session.read_output();

    assert!(matches!(
        view.outcome,
        RunOutcome::CapacityExceeded(err) if err.region == Region::Output
    ));
    assert_eq!(view.bytes.len(), 3);
}

#[test]
fn test_dir_lookup() {
    let dir = ResourceDir::mount(DEFAULT_DIR, SharedSession::default());

    assert_eq!(dir.lookup("brainfuck/code").unwrap(), Resource::Program);
    assert_eq!(dir.lookup("input").unwrap(), Resource::Input);
    assert_eq!(dir.lookup("brainfuck/output").unwrap(), Resource::Output);
    assert!(matches!(
        dir.lookup("other/code"),
        Err(ResourceError::UnknownResource(_))
    ));
    assert!(matches!(
        dir.lookup("brainfuck/tape"),
        Err(ResourceError::UnknownResource(_))
    ));
}

#[test]
fn test_dir_entries() {
    let dir = ResourceDir::mount("bf", SharedSession::default());

    assert_eq!(
        dir.entries(),
        vec![
            ("bf/code".to_string(), Mode::READ_WRITE),
            ("bf/input".to_string(), Mode::READ_WRITE),
            ("bf/output".to_string(), Mode::READ_ONLY),
        ]
    );
    assert_eq!(dir.name(), "bf");
}

#[test]
fn test_dir_round_trip() {
    let dir = ResourceDir::mount(DEFAULT_DIR, SharedSession::default());
    dir.write("brainfuck/code", b",.,.").unwrap();
    dir.write("brainfuck/input", b"hi").unwrap();

    assert_eq!(dir.read("brainfuck/output").unwrap(), b"hi");
    assert_eq!(dir.read("code").unwrap(), b",.,.");
    assert!(matches!(
        dir.write("output", b"x"),
        Err(ResourceError::ReadOnly(Resource::Output))
    ));
}

#[test]
fn test_write_from_reader() {
    let dir = ResourceDir::mount(DEFAULT_DIR, SharedSession::default());
    let stored = dir.write_from("code", &b"++."[..]).unwrap();

    assert_eq!(stored, 3);
    assert_eq!(dir.read("output").unwrap(), &[2]);
}

#[test]
fn test_failed_transfer_leaves_state() {
    let dir = ResourceDir::mount(DEFAULT_DIR, SharedSession::default());
    dir.write("code", b"+.").unwrap();
    dir.read("output").unwrap();

    let err = dir
        .write_from("code", FailingReader { sent: false })
        .unwrap_err();

    assert!(matches!(
        err,
        ResourceError::Transfer {
            resource: Resource::Program,
            ..
        }
    ));
    assert_eq!(dir.read("code").unwrap(), b"+.");
    assert!(!dir.session().with(|s| s.is_dirty()));
}

#[test]
fn test_write_from_output_rejected_before_reading() {
    let dir = ResourceDir::mount(DEFAULT_DIR, SharedSession::default());
    let mut reader = FailingReader { sent: false };

    let err = dir.write_from("output", &mut reader).unwrap_err();

    assert!(matches!(err, ResourceError::ReadOnly(Resource::Output)));
    assert!(!reader.sent);
}

#[test]
fn test_registry_isolates_callers() {
    let mut registry = SessionRegistry::default();
    registry.write(1, Resource::Program, b"+++.").unwrap();
    registry.write(2, Resource::Program, b"+.").unwrap();

    assert_eq!(registry.read(1, Resource::Output), &[3]);
    assert_eq!(registry.read(2, Resource::Output), &[1]);
    assert_eq!(registry.len(), 2);

    // A write by caller 2 leaves caller 1's cache clean
    registry.write(2, Resource::Program, b"++.").unwrap();
    assert_eq!(registry.read(1, Resource::Output), &[3]);
    assert_eq!(registry.get(1).unwrap().run_count(), 1);
}

#[test]
fn test_registry_release() {
    let mut registry = SessionRegistry::default();
    registry.write(7, Resource::Program, b"+.").unwrap();

    let released = registry.release(7).unwrap();
    assert_eq!(released.read_program(), b"+.");
    assert!(registry.is_empty());
    assert!(registry.release(7).is_none());

    // A released caller starts over with an empty session
    assert_eq!(registry.read(7, Resource::Program), b"");
}

#[test]
fn test_registry_rejects_bad_config() {
    let config = MachineConfig::default().with_budget(0);
    assert!(SessionRegistry::new(config).is_err());
}

#[test]
fn test_remount_keeps_session() {
    let session = SharedSession::default();
    let dir = ResourceDir::mount(DEFAULT_DIR, session.clone());
    dir.write("code", b",.").unwrap();
    dir.write("input", b"k").unwrap();
    assert_eq!(dir.read("output").unwrap(), b"k");
    dir.unmount();

    let dir = ResourceDir::mount(DEFAULT_DIR, session.clone());
    assert_eq!(dir.read("brainfuck/code").unwrap(), b",.");
    assert_eq!(dir.read("brainfuck/output").unwrap(), b"k");
    assert_eq!(dir.entries().len(), 3);

    // Unmounting ran nothing, and the cached output survived the remount
    assert_eq!(session.with(|s| s.run_count()), 1);
}

#[test]
fn test_mount_and_unmount_are_logged() {
    let logs = capture_logs(|| {
        let dir = ResourceDir::mount(DEFAULT_DIR, SharedSession::default());
        dir.unmount();
    });

    assert_eq!(logs.matches("resource directory created").count(), 1);
    assert_eq!(logs.matches("entry created").count(), 3);
    assert!(logs.contains("brainfuck/output"));
    // Dropping after an explicit unmount must not log the removals again
    assert_eq!(logs.matches("entry removed").count(), 3);
    assert_eq!(logs.matches("resource directory removed").count(), 1);
}

#[test]
fn test_drop_unmounts() {
    let logs = capture_logs(|| {
        let _dir = ResourceDir::mount("bf", SharedSession::default());
    });

    assert_eq!(logs.matches("entry removed").count(), 3);
    assert!(logs.contains("bf/code"));
    assert_eq!(logs.matches("resource directory removed").count(), 1);
}
