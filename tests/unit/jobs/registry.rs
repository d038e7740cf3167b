use super::*;
use crate::export::progress::ExportControl;
use crate::jobs::job::JobStatus;
use std::sync::mpsc;

const LONG: Duration = Duration::from_secs(10);

fn registry() -> (JobRegistry, tempfile::TempDir) {
    let base = tempfile::tempdir().unwrap();
    let probe: Arc<dyn EncoderProbe> = Arc::new(|_: crate::encode::select::EncoderKind| false);
    let reg = JobRegistry::with_probe(probe).with_scratch_dir(base.path());
    (reg, base)
}

#[test]
fn successful_job_reaches_done_with_artifact() {
    let (reg, _base) = registry();
    let id = reg
        .spawn_job(|record, scratch| {
            record.report(40);
            let out = scratch.join("meeting.mp4");
            std::fs::write(&out, b"mp4").unwrap();
            Ok(out)
        })
        .unwrap();

    let snap = reg.wait(id, LONG).unwrap();
    assert_eq!(snap.status, JobStatus::Done);
    assert_eq!(snap.progress, 100);
    assert_eq!(snap.error, None);
    let artifact = reg.artifact(id).unwrap();
    assert_eq!(std::fs::read(artifact).unwrap(), b"mp4");
}

#[test]
fn running_job_is_not_ready_and_never_reports_100() {
    let (reg, _base) = registry();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let (reported_tx, reported_rx) = mpsc::channel::<()>();
    let id = reg
        .spawn_job(move |record, scratch| {
            record.report(100);
            reported_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            Ok(scratch.join("x.mp4"))
        })
        .unwrap();

    reported_rx.recv_timeout(LONG).unwrap();
    let snap = reg.status(id).unwrap();
    assert_eq!(snap.status, JobStatus::Running);
    assert!(snap.progress < 100);
    assert!(matches!(reg.artifact(id), Err(ComposerError::NotReady(_))));

    release_tx.send(()).unwrap();
    assert_eq!(reg.wait(id, LONG).unwrap().status, JobStatus::Done);
}

#[test]
fn failure_surfaces_message_and_drops_scratch() {
    let (reg, _base) = registry();
    let (dir_tx, dir_rx) = mpsc::channel::<PathBuf>();
    let id = reg
        .spawn_job(move |_, scratch| {
            dir_tx.send(scratch.to_path_buf()).unwrap();
            Err(ComposerError::media("'a.mp4' is unreadable"))
        })
        .unwrap();

    let snap = reg.wait(id, LONG).unwrap();
    assert_eq!(snap.status, JobStatus::Error);
    assert!(snap.error.unwrap().contains("a.mp4"));
    let scratch = dir_rx.recv().unwrap();
    assert!(!scratch.exists());
    assert!(matches!(reg.artifact(id), Err(ComposerError::NotReady(_))));
}

#[test]
fn panics_become_errors() {
    let (reg, _base) = registry();
    let id = reg
        .spawn_job(|_, _| -> ComposerResult<PathBuf> { panic!("decoder exploded") })
        .unwrap();
    let snap = reg.wait(id, LONG).unwrap();
    assert_eq!(snap.status, JobStatus::Error);
    assert!(snap.error.unwrap().contains("decoder exploded"));
}

#[test]
fn cancel_is_observed_by_the_worker() {
    let (reg, _base) = registry();
    let id = reg
        .spawn_job(|record, _| {
            let start = Instant::now();
            while !record.is_cancelled() {
                if start.elapsed() > LONG {
                    return Ok(PathBuf::from("never"));
                }
                std::thread::sleep(Duration::from_millis(5));
            }
            Err(ComposerError::Cancelled)
        })
        .unwrap();
    reg.cancel(id).unwrap();
    let snap = reg.wait(id, LONG).unwrap();
    assert_eq!(snap.status, JobStatus::Error);
    assert_eq!(snap.error.as_deref(), Some("export cancelled"));
}

#[test]
fn unknown_ids_are_not_found() {
    let (reg, _base) = registry();
    let id = JobId::new();
    assert!(matches!(reg.status(id), Err(ComposerError::NotFound(_))));
    assert!(matches!(reg.artifact(id), Err(ComposerError::NotFound(_))));
    assert!(matches!(reg.cancel(id), Err(ComposerError::NotFound(_))));
    assert!(matches!(reg.remove(id), Err(ComposerError::NotFound(_))));
}

#[test]
fn remove_prune_and_list() {
    let (reg, _base) = registry();
    let a = reg.spawn_job(|_, s| Ok(s.join("a.mp4"))).unwrap();
    std::thread::sleep(Duration::from_millis(5));
    let b = reg.spawn_job(|_, s| Ok(s.join("b.mp4"))).unwrap();
    reg.wait(a, LONG).unwrap();
    reg.wait(b, LONG).unwrap();

    let ids: Vec<JobId> = reg.list().into_iter().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![a, b]);

    reg.remove(a).unwrap();
    assert!(matches!(reg.status(a), Err(ComposerError::NotFound(_))));

    assert_eq!(reg.prune(Duration::from_secs(3600)), 0);
    std::thread::sleep(Duration::from_millis(20));
    assert_eq!(reg.prune(Duration::from_millis(1)), 1);
    assert!(reg.list().is_empty());
}

#[test]
fn start_rejects_invalid_config_without_creating_a_job() {
    let (reg, _base) = registry();
    let meeting = MeetingConfig {
        background_path: PathBuf::from("/nonexistent/bg.png"),
        speaker1_path: PathBuf::from("/nonexistent/a.mp4"),
        speaker2_path: PathBuf::from("/nonexistent/b.mp4"),
        speaker1_name: "A".to_owned(),
        speaker2_name: "B".to_owned(),
        output_path: None,
    };
    let err = reg
        .start(ExportConfig::default(), meeting, SpeakerConfig::default())
        .unwrap_err();
    assert!(matches!(err, ComposerError::Config(_)));
    assert!(reg.list().is_empty());
}
